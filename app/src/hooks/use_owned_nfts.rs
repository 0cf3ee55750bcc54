use dioxus::prelude::*;
use nft_market_api::prelude::*;

use super::LoadState;
use crate::WalletState;

/// Owned tokens of the connected wallet, split into listed and unlisted.
/// Re-runs when the wallet changes; `restart()` the resource after a listing.
pub fn use_owned_nfts() -> (Signal<LoadState<OwnedScan>>, Resource<()>) {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();
    let mut state = use_signal(LoadState::default);

    let resource = use_resource(move || {
        let config = config.clone();
        async move {
            let Some(owner) = wallet.read().address else {
                state.set(LoadState::default());
                return;
            };
            state.write().loading = true;

            let contracts = MarketContracts::from_config(&config);
            let result = scan_owned(
                &contracts,
                &HttpMetadataFetcher::new(),
                owner,
                &config.gateways(),
            )
            .await;
            if let Ok(scan) = &result {
                if !scan.skipped.is_empty() {
                    tracing::warn!("Skipped tokens {:?}", scan.skipped);
                }
            }
            state.write().apply(result);
        }
    });

    (state, resource)
}
