use crate::error::MarketError;
use crate::reconcile::MetadataFetcher;
use crate::state::NftMetadata;

/// Fetches token metadata JSON over HTTP(S).
#[derive(Clone, Debug, Default)]
pub struct HttpMetadataFetcher {
    http: reqwest::Client,
}

impl HttpMetadataFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                service: "metadata gateway",
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}
