use std::time::Duration;

use alloy_primitives::B256;
use nft_market_api::prelude::*;

/// Pins through the pinning service and sends through the node's unlocked account.
/// Only pinning needs `PINATA_JWT`.
pub struct CliBackend {
    pinning: Option<PinningClient>,
    rpc: EvmRpc,
}

impl CliBackend {
    pub fn from_config(config: &MarketConfig) -> Self {
        Self {
            pinning: PinningClient::from_config(config).ok(),
            rpc: EvmRpc::new(&config.rpc_url),
        }
    }

    fn pinning(&self) -> Result<&PinningClient, MarketError> {
        self.pinning
            .as_ref()
            .ok_or(MarketError::MissingConfig("PINATA_JWT"))
    }
}

impl MintBackend for CliBackend {
    async fn pin_file(&self, image: &ImageUpload) -> Result<String, MarketError> {
        self.pinning()?.pin_file(image).await
    }

    async fn pin_json(&self, metadata: &NftMetadata) -> Result<String, MarketError> {
        self.pinning()?.pin_json(metadata).await
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<B256, MarketError> {
        self.rpc.send_transaction(&tx).await
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, MarketError> {
        self.rpc
            .wait_for_receipt(
                hash,
                RECEIPT_POLL_ATTEMPTS,
                Duration::from_millis(RECEIPT_POLL_MS),
                tokio::time::sleep,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transactions_do_not_need_pinning_config() {
        let config = MarketConfig::from_lookup(|_| None).unwrap();
        let backend = CliBackend::from_config(&config);
        assert_eq!(backend.rpc.url(), config.rpc_url);

        let err = backend.pin_json(&NftMetadata::default()).await.unwrap_err();
        assert!(matches!(err, MarketError::MissingConfig("PINATA_JWT")));
    }

    #[tokio::test]
    async fn test_pinning_config_is_picked_up() {
        let config = MarketConfig::from_lookup(|name| {
            (name == "PINATA_JWT").then(|| "jwt".to_string())
        })
        .unwrap();
        assert!(CliBackend::from_config(&config).pinning().is_ok());
    }
}
