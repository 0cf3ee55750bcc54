use alloy_primitives::Address;
use dioxus::prelude::*;
use nft_market_api::prelude::*;

use super::LoadState;
use crate::WalletState;

/// Active listings, split into the wallet's own and everyone else's.
pub fn use_marketplace() -> (Signal<LoadState<MarketView>>, Resource<()>) {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();
    let mut state = use_signal(|| LoadState {
        loading: true,
        ..LoadState::default()
    });

    let resource = use_resource(move || {
        let config = config.clone();
        async move {
            // Without a wallet every listing is someone else's.
            let me = wallet.read().address.unwrap_or(Address::ZERO);
            state.write().loading = true;

            let contracts = MarketContracts::from_config(&config);
            let result =
                load_marketplace(&contracts, &HttpMetadataFetcher::new(), me, &config.gateways())
                    .await;
            state.write().apply(result);
        }
    });

    (state, resource)
}
