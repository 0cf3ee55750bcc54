use std::rc::Rc;

use alloy_primitives::Address;
use dioxus::prelude::*;
use nft_market_api::prelude::*;

use super::LoadState;
use crate::WalletState;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketStats {
    pub stats: Option<MarketplaceStatEntity>,
    pub listings: Vec<ListingEntity>,
    pub purchases: Vec<PurchaseEntity>,
    pub user: Option<UserEntity>,
}

/// Subgraph dashboard data, refreshed on a timer and on demand. Responses
/// that arrive after a newer request was issued are dropped.
#[derive(Clone)]
pub struct StatsPoller {
    state: Signal<LoadState<MarketStats>>,
    sequence: Rc<RequestSequence>,
    config: MarketConfig,
    wallet: Signal<WalletState>,
    page: Signal<Page>,
}

impl StatsPoller {
    pub fn state(&self) -> Signal<LoadState<MarketStats>> {
        self.state
    }

    pub fn refresh(&self) {
        let poller = self.clone();
        spawn(async move {
            poller.fetch().await;
        });
    }

    async fn fetch(&self) {
        let ticket = self.sequence.issue();
        let me = self.wallet.peek().address;
        let page = *self.page.peek();
        let mut state = self.state;
        state.write().loading = true;

        let result = fetch_stats(&self.config, me, page).await;
        if !self.sequence.is_current(ticket) {
            tracing::debug!("Dropping stale dashboard response");
            return;
        }
        state.write().apply(result);
    }
}

async fn fetch_stats(
    config: &MarketConfig,
    me: Option<Address>,
    page: Page,
) -> Result<MarketStats, MarketError> {
    let subgraph = SubgraphClient::new(&config.subgraph_url);
    let (stats, listings, purchases) = futures::join!(
        subgraph.marketplace_stats(),
        subgraph.active_listings(Page::default()),
        subgraph.purchase_history(None, page),
    );
    let user = match me {
        Some(address) => subgraph.user_stats(&address.to_string()).await?,
        None => None,
    };
    Ok(MarketStats {
        stats: stats?,
        listings: listings?,
        purchases: purchases?,
        user,
    })
}

pub fn use_market_stats(page: Signal<Page>) -> StatsPoller {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();
    let state = use_signal(|| LoadState {
        loading: true,
        ..LoadState::default()
    });
    let poller = use_hook(|| StatsPoller {
        state,
        sequence: Rc::new(RequestSequence::new()),
        config,
        wallet,
        page,
    });

    // Timer refresh; the task ends with the component.
    let timer = poller.clone();
    use_future(move || {
        let timer = timer.clone();
        async move {
            loop {
                gloo_timers::future::TimeoutFuture::new(POLL_INTERVAL_MS).await;
                timer.fetch().await;
            }
        }
    });

    // Immediate refresh on mount and whenever the page or wallet changes.
    let trigger = poller.clone();
    use_effect(move || {
        let _ = page.read();
        let _ = wallet.read();
        trigger.refresh();
    });

    poller
}
