use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use nft_market_api::prelude::*;

use super::LoadState;
use crate::WalletState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExploreMode {
    #[default]
    Wallet,
    Collection,
}

/// The shared indexer client, verified with one authenticated probe on first use.
async fn indexer(
    lazy: &LazyClient<IndexedNftClient>,
    config: &MarketConfig,
) -> Result<Arc<IndexedNftClient>, MarketError> {
    lazy.init(|| async move {
        let client = IndexedNftClient::from_config(config)?;
        client.probe(&config.chain_hex()).await?;
        tracing::info!("Indexed NFT client ready");
        Ok(client)
    })
    .await
}

/// One cursor page of indexed NFTs for the wallet or the collection, plus the
/// shared client's init state mirrored into a signal so it re-renders.
pub fn use_indexed_nfts(
    mode: Signal<ExploreMode>,
    cursor: Signal<Option<String>>,
) -> (
    Signal<LoadState<CursorPage<IndexedNft>>>,
    Signal<InitState>,
    Resource<()>,
) {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();
    let lazy = use_context::<Rc<LazyClient<IndexedNftClient>>>();
    let mut state = use_signal(|| LoadState {
        loading: true,
        ..LoadState::default()
    });
    let mut init_state = use_signal({
        let lazy = lazy.clone();
        move || lazy.state()
    });

    let resource = use_resource(move || {
        let config = config.clone();
        let lazy = lazy.clone();
        async move {
            let mode = mode();
            let cursor = cursor();
            let owner = wallet.read().address;
            state.write().loading = true;

            if !lazy.is_ready() {
                init_state.set(InitState::Initializing);
            }
            let client = indexer(&lazy, &config).await;
            init_state.set(lazy.state());

            let result = async {
                let client = client?;
                let chain = config.chain_hex();
                match (mode, owner) {
                    (ExploreMode::Wallet, Some(owner)) => {
                        client
                            .wallet_nfts(&owner.to_string(), &chain, cursor.as_deref())
                            .await
                    }
                    (ExploreMode::Wallet, None) => Err(MarketError::NotConnected),
                    (ExploreMode::Collection, _) => {
                        client
                            .contract_nfts(&config.nft_address.to_string(), &chain, cursor.as_deref())
                            .await
                    }
                }
            }
            .await;
            state.write().apply(result);
        }
    });

    (state, init_state, resource)
}
