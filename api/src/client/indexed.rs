//! Indexed NFT data (Moralis-compatible Web API).

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::state::NftMetadata;

const SERVICE: &str = "indexed NFT data";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CursorPage<T> {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

impl<T> CursorPage<T> {
    pub fn has_more(&self) -> bool {
        self.cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IndexedNft {
    pub token_address: String,
    pub token_id: String,
    #[serde(default)]
    pub owner_of: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    /// Raw metadata JSON as a string, when the indexer has it.
    #[serde(default)]
    pub metadata: Option<String>,
}

impl IndexedNft {
    pub fn parsed_metadata(&self) -> Option<NftMetadata> {
        self.metadata
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NftTransfer {
    pub token_address: String,
    pub token_id: String,
    #[serde(default)]
    pub from_address: Option<String>,
    pub to_address: String,
    #[serde(default)]
    pub value: Option<String>,
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub block_timestamp: Option<String>,
}

#[derive(Clone, Debug)]
pub struct IndexedNftClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IndexedNftClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Without an API key the feature is reported as unavailable, not broken.
    pub fn from_config(config: &MarketConfig) -> Result<Self, MarketError> {
        let key = config
            .moralis_api_key
            .as_deref()
            .ok_or(MarketError::ServiceUnavailable(SERVICE))?;
        Ok(Self::new(&config.moralis_api_url, key))
    }

    /// Cheap authenticated request used to verify the key on first use.
    pub async fn probe(&self, chain: &str) -> Result<(), MarketError> {
        let _: serde_json::Value = self
            .get("/web3/version", &[("chain", chain.to_string())])
            .await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("X-API-Key", &self.api_key)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(MarketError::ServiceUnavailable(SERVICE));
        }
        if !status.is_success() {
            return Err(MarketError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    fn paged(chain: &str, cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("chain", chain.to_string()),
            ("format", "decimal".to_string()),
        ];
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor.to_string()));
        }
        query
    }

    pub async fn wallet_nfts(
        &self,
        wallet: &str,
        chain: &str,
        cursor: Option<&str>,
    ) -> Result<CursorPage<IndexedNft>, MarketError> {
        self.get(&format!("/{}/nft", wallet), &Self::paged(chain, cursor))
            .await
    }

    pub async fn token_metadata(
        &self,
        contract: &str,
        token_id: &str,
        chain: &str,
    ) -> Result<IndexedNft, MarketError> {
        self.get(
            &format!("/nft/{}/{}", contract, token_id),
            &[("chain", chain.to_string()), ("format", "decimal".to_string())],
        )
        .await
    }

    pub async fn contract_nfts(
        &self,
        contract: &str,
        chain: &str,
        cursor: Option<&str>,
    ) -> Result<CursorPage<IndexedNft>, MarketError> {
        self.get(&format!("/nft/{}", contract), &Self::paged(chain, cursor))
            .await
    }

    pub async fn transfers(
        &self,
        contract: &str,
        token_id: &str,
        chain: &str,
        cursor: Option<&str>,
    ) -> Result<CursorPage<NftTransfer>, MarketError> {
        self.get(
            &format!("/nft/{}/{}/transfers", contract, token_id),
            &Self::paged(chain, cursor),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_page_decodes() {
        let json = r#"{
            "total": null,
            "page": 1,
            "page_size": 100,
            "cursor": "abc",
            "result": [{
                "token_address": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "token_id": "4",
                "owner_of": "0x0000000000000000000000000000000000000001",
                "amount": "1",
                "contract_type": "ERC721",
                "name": "Market",
                "symbol": "MKT",
                "token_uri": "ipfs://QmHash",
                "metadata": "{\"name\":\"Cat\",\"image\":\"ipfs://QmImg\"}"
            }]
        }"#;
        let page: CursorPage<IndexedNft> = serde_json::from_str(json).unwrap();
        assert!(page.has_more());
        assert_eq!(page.result[0].token_id, "4");
        let meta = page.result[0].parsed_metadata().unwrap();
        assert_eq!(meta.name, "Cat");
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let page: CursorPage<NftTransfer> = serde_json::from_str(r#"{"cursor":"","result":[]}"#).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_paged_query_skips_empty_cursor() {
        assert_eq!(IndexedNftClient::paged("0x1", Some("")).len(), 2);
        assert_eq!(IndexedNftClient::paged("0x1", Some("c1")).len(), 3);
    }

    #[test]
    fn test_missing_key_is_soft() {
        let config = MarketConfig::from_lookup(|_| None).unwrap();
        let err = IndexedNftClient::from_config(&config).unwrap_err();
        assert!(err.is_soft());
    }
}
