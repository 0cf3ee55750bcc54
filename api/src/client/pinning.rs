use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::ipfs::ipfs_uri;
use crate::state::NftMetadata;

/// Image bytes selected by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct PinResponse {
    pub ipfs_hash: String,
    #[serde(default)]
    pub pin_size: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PinJsonRequest<'a> {
    pinata_content: &'a NftMetadata,
    pinata_metadata: PinName<'a>,
}

#[derive(Serialize)]
struct PinName<'a> {
    name: &'a str,
}

/// Pinata pinning API, authenticated with a JWT.
#[derive(Clone, Debug)]
pub struct PinningClient {
    http: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl PinningClient {
    pub fn new(api_url: impl Into<String>, jwt: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            jwt: jwt.into(),
        }
    }

    pub fn from_config(config: &crate::config::MarketConfig) -> Result<Self, MarketError> {
        let jwt = config
            .pinata_jwt
            .as_deref()
            .ok_or(MarketError::MissingConfig("PINATA_JWT"))?;
        Ok(Self::new(&config.pinata_api_url, jwt))
    }

    async fn pin(&self, request: reqwest::RequestBuilder) -> Result<String, MarketError> {
        let response = request.bearer_auth(&self.jwt).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(MarketError::ServiceUnavailable("pinning service"));
        }
        if !status.is_success() {
            return Err(MarketError::Status {
                service: "pinning service",
                status: status.as_u16(),
            });
        }
        let pinned: PinResponse = response.json().await?;
        tracing::info!("pinned {}", pinned.ipfs_hash);
        Ok(ipfs_uri(&pinned.ipfs_hash))
    }

    /// `POST /pinning/pinFileToIPFS`; returns `ipfs://<hash>`.
    pub async fn pin_file(&self, image: &ImageUpload) -> Result<String, MarketError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("file", part);
        let url = format!("{}/pinning/pinFileToIPFS", self.api_url);
        self.pin(self.http.post(url).multipart(form)).await
    }

    /// `POST /pinning/pinJSONToIPFS`; returns `ipfs://<hash>`.
    pub async fn pin_json(&self, metadata: &NftMetadata) -> Result<String, MarketError> {
        let body = PinJsonRequest {
            pinata_content: metadata,
            pinata_metadata: PinName {
                name: &metadata.name,
            },
        };
        let url = format!("{}/pinning/pinJSONToIPFS", self.api_url);
        self.pin(self.http.post(url).json(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_response_shape() {
        let json = r#"{"IpfsHash":"QmHash","PinSize":120,"Timestamp":"2024-01-01T00:00:00Z"}"#;
        let pinned: PinResponse = serde_json::from_str(json).unwrap();
        assert_eq!(pinned.ipfs_hash, "QmHash");
        assert_eq!(pinned.pin_size, Some(120));
    }

    #[test]
    fn test_pin_json_body() {
        let metadata = NftMetadata {
            name: "Test".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(PinJsonRequest {
            pinata_content: &metadata,
            pinata_metadata: PinName { name: "Test" },
        })
        .unwrap();
        assert_eq!(body["pinataContent"]["name"], "Test");
        assert_eq!(body["pinataMetadata"]["name"], "Test");
    }
}
