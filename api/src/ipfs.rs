//! IPFS reference handling: hash extraction, gateway resolution and the
//! image fallback sequence.

use base64::Engine;

use crate::consts::{DEFAULT_PINATA_GATEWAY, PLACEHOLDER_SVG, PUBLIC_GATEWAYS};
use crate::error::MarketError;

/// Canonical reference stored in metadata and on-chain.
pub fn ipfs_uri(hash: &str) -> String {
    format!("ipfs://{}", hash)
}

/// The embedded image shown once every gateway failed.
pub fn placeholder_image() -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(PLACEHOLDER_SVG)
    )
}

fn is_http(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn looks_like_cid(input: &str) -> bool {
    let head = input.split(['/', '?', '#']).next().unwrap_or_default();
    if !head.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return false;
    }
    (head.starts_with("Qm") && head.len() == 46) || (head.starts_with("baf") && head.len() >= 50)
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim_start_matches('/');
    (!s.is_empty()).then_some(s)
}

/// Hash component (with any trailing path) of `Qm…`, `ipfs://…` or `…/ipfs/…`.
pub fn extract_cid(input: &str) -> Option<&str> {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("ipfs://") {
        return non_empty(rest.strip_prefix("ipfs/").unwrap_or(rest));
    }
    if let Some(idx) = input.find("/ipfs/") {
        return non_empty(&input[idx + "/ipfs/".len()..]);
    }
    if is_http(input) || !looks_like_cid(input) {
        return None;
    }
    Some(input)
}

fn normalize_gateway(gateway: &str) -> String {
    let base = gateway.trim().trim_end_matches('/');
    if base.ends_with("/ipfs") {
        format!("{}/", base)
    } else {
        format!("{}/ipfs/", base)
    }
}

/// The primary gateway plus the ordered public fallbacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gateways {
    primary: String,
    fallbacks: Vec<String>,
}

impl Default for Gateways {
    fn default() -> Self {
        Self::new(DEFAULT_PINATA_GATEWAY)
    }
}

impl Gateways {
    pub fn new(primary: &str) -> Self {
        Self::with_fallbacks(primary, PUBLIC_GATEWAYS.iter().copied())
    }

    pub fn with_fallbacks<'a>(primary: &str, fallbacks: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            primary: normalize_gateway(primary),
            fallbacks: fallbacks.into_iter().map(normalize_gateway).collect(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Fetchable URL for `uri`. HTTP(S) and data URLs come back unchanged.
    pub fn resolve(&self, uri: &str) -> Result<String, MarketError> {
        let uri = uri.trim();
        if is_http(uri) || uri.starts_with("data:") {
            return Ok(uri.to_string());
        }
        extract_cid(uri)
            .map(|cid| format!("{}{}", self.primary, cid))
            .ok_or_else(|| MarketError::InvalidIpfsReference(uri.to_string()))
    }

    /// Ordered, duplicate-free candidates for progressive image loading.
    pub fn candidates(&self, uri: &str) -> Vec<String> {
        let uri = uri.trim();
        let mut urls: Vec<String> = Vec::new();
        if is_http(uri) || uri.starts_with("data:") {
            urls.push(uri.to_string());
        }
        if let Some(cid) = extract_cid(uri) {
            for gateway in std::iter::once(&self.primary).chain(&self.fallbacks) {
                let url = format!("{}{}", gateway, cid);
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
        urls
    }
}

/// Cursor over gateway candidates for one image element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayFallback {
    candidates: Vec<String>,
    index: usize,
}

impl GatewayFallback {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            index: 0,
        }
    }

    pub fn for_uri(gateways: &Gateways, uri: &str) -> Self {
        Self::new(gateways.candidates(uri))
    }

    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.index).map(String::as_str)
    }

    /// URL to put in the image element right now.
    pub fn src(&self) -> String {
        self.current().map(str::to_string).unwrap_or_else(placeholder_image)
    }

    /// Called on each load error: moves to the next candidate.
    pub fn advance(&mut self) -> Option<&str> {
        if self.index < self.candidates.len() {
            self.index += 1;
        }
        self.current()
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.candidates.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    #[test]
    fn test_extract_cid_forms_agree() {
        let forms = [
            HASH.to_string(),
            format!("ipfs://{}", HASH),
            format!("ipfs://ipfs/{}", HASH),
            format!("https://gateway.pinata.cloud/ipfs/{}", HASH),
            format!("  https://ipfs.io/ipfs/{}  ", HASH),
        ];
        for form in &forms {
            assert_eq!(extract_cid(form), Some(HASH), "{}", form);
        }
    }

    #[test]
    fn test_extract_cid_keeps_path() {
        let uri = format!("ipfs://{}/7.json", HASH);
        assert_eq!(extract_cid(&uri), Some(format!("{}/7.json", HASH).as_str()));
    }

    #[test]
    fn test_extract_cid_rejects_non_ipfs() {
        assert_eq!(extract_cid("https://example.com/a.png"), None);
        assert_eq!(extract_cid("hello"), None);
        assert_eq!(extract_cid("ipfs://"), None);
    }

    #[test]
    fn test_resolve() {
        let gateways = Gateways::new("https://my.mypinata.cloud");
        assert_eq!(
            gateways.resolve(&format!("ipfs://{}", HASH)).unwrap(),
            format!("https://my.mypinata.cloud/ipfs/{}", HASH)
        );
        assert_eq!(
            gateways.resolve(HASH).unwrap(),
            format!("https://my.mypinata.cloud/ipfs/{}", HASH)
        );
        assert_eq!(
            gateways.resolve("https://example.com/a.png").unwrap(),
            "https://example.com/a.png"
        );
        assert!(matches!(
            gateways.resolve("not a hash"),
            Err(MarketError::InvalidIpfsReference(_))
        ));
    }

    #[test]
    fn test_candidates_unique_and_non_empty() {
        let gateways = Gateways::with_fallbacks(
            "https://gateway.pinata.cloud/ipfs/",
            ["https://ipfs.io/ipfs", "https://gateway.pinata.cloud", "https://dweb.link/ipfs/"],
        );
        let urls = gateways.candidates(HASH);
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], format!("https://gateway.pinata.cloud/ipfs/{}", HASH));
        let mut sorted = urls.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), urls.len());
    }

    #[test]
    fn test_candidates_for_gateway_url_start_with_original() {
        let original = format!("https://ipfs.io/ipfs/{}", HASH);
        let urls = Gateways::default().candidates(&original);
        assert_eq!(urls[0], original);
        assert_eq!(urls.iter().filter(|u| **u == original).count(), 1);
    }

    #[test]
    fn test_fallback_advances_one_at_a_time() {
        let mut fallback = GatewayFallback::for_uri(&Gateways::default(), HASH);
        let total = fallback.len();
        assert!(total > 1);

        let mut seen = vec![fallback.src()];
        for step in 1..total {
            assert!(!fallback.is_exhausted());
            fallback.advance();
            assert_eq!(fallback.index(), step);
            seen.push(fallback.src());
        }
        assert!(!fallback.is_exhausted());
        assert!(!seen.iter().any(|s| s.starts_with("data:")));

        assert_eq!(fallback.advance(), None);
        assert!(fallback.is_exhausted());
        assert_eq!(fallback.src(), placeholder_image());

        fallback.advance();
        assert_eq!(fallback.index(), total);
    }

    #[test]
    fn test_placeholder_is_embedded() {
        assert!(placeholder_image().starts_with("data:image/svg+xml;base64,"));
    }
}
