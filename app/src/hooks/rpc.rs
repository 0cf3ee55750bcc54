use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, B256};
use nft_market_api::prelude::*;

use crate::components::send_transaction;

/// Pins through the pinning service, signs in the browser wallet and polls
/// the configured node for receipts.
#[derive(Clone)]
pub struct WalletBackend {
    pinning: Option<PinningClient>,
    rpc: EvmRpc,
}

impl WalletBackend {
    pub fn new(config: &MarketConfig) -> Self {
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

    /// Send one transaction and wait until it is mined.
    pub async fn transact(&self, tx: TxRequest) -> Result<TxReceipt, MarketError> {
        let hash = self.send_transaction(tx).await?;
        self.wait_for_receipt(hash).await
    }
}

impl MintBackend for WalletBackend {
    async fn pin_file(&self, image: &ImageUpload) -> Result<String, MarketError> {
        self.pinning()?.pin_file(image).await
    }

    async fn pin_json(&self, metadata: &NftMetadata) -> Result<String, MarketError> {
        self.pinning()?.pin_json(metadata).await
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<B256, MarketError> {
        let hash = send_transaction(&tx).await.map_err(MarketError::Wallet)?;
        B256::from_str(&hash).map_err(|_| MarketError::Wallet(format!("Invalid hash {}", hash)))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, MarketError> {
        self.rpc
            .wait_for_receipt(
                hash,
                RECEIPT_POLL_ATTEMPTS,
                Duration::from_millis(RECEIPT_POLL_MS),
                |d| gloo_timers::future::TimeoutFuture::new(d.as_millis() as u32),
            )
            .await
    }
}

/// Buy a listed item at its listing price.
pub async fn buy_item(config: &MarketConfig, buyer: Address, item: &NftItem) -> Result<(), String> {
    let listing_id = item.listing_id.ok_or("Item is not listed")?;
    let price = item.price_wei().ok_or("Item has no price")?;
    let contracts = MarketContracts::from_config(config);
    let backend = WalletBackend::new(config);
    backend
        .transact(contracts.buy_tx(buyer, listing_id, price))
        .await
        .map_err(|e| e.to_string())?;
    tracing::info!("Bought token {} via listing {}", item.token_id, listing_id);
    Ok(())
}

/// Approve the marketplace for `token_id`, then list it at `price` (display units).
pub async fn list_item(
    config: &MarketConfig,
    seller: Address,
    token_id: u64,
    price: &str,
) -> Result<(), String> {
    let price = parse_price(price).map_err(|e| e.to_string())?;
    let contracts = MarketContracts::from_config(config);
    let backend = WalletBackend::new(config);
    let token = alloy_primitives::U256::from(token_id);
    backend
        .transact(contracts.approve_tx(seller, token))
        .await
        .map_err(|e| format!("Approval failed: {}", e))?;
    backend
        .transact(contracts.list_tx(seller, token, price))
        .await
        .map_err(|e| format!("Listing failed: {}", e))?;
    tracing::info!("Listed token {} at {}", token_id, format_ether(price));
    Ok(())
}
