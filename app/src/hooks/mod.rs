mod rpc;
mod use_fee_quote;
mod use_indexer;
mod use_market_stats;
mod use_marketplace;
mod use_owned_nfts;

pub use rpc::*;
pub use use_fee_quote::{use_fee_quote, FeeQuote};
pub use use_indexer::{use_indexed_nfts, ExploreMode};
pub use use_market_stats::{use_market_stats, MarketStats, StatsPoller};
pub use use_marketplace::use_marketplace;
pub use use_owned_nfts::use_owned_nfts;

use nft_market_api::prelude::MarketError;

/// Result of a background fetch as the pages render it.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// The failing service is down or not configured; shown as a soft notice.
    pub unavailable: bool,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            unavailable: false,
        }
    }
}

impl<T> LoadState<T> {
    pub fn apply(&mut self, result: Result<T, MarketError>) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.unavailable = false;
            }
            Err(e) => {
                tracing::error!("Fetch failed: {}", e);
                self.unavailable = e.is_soft();
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }
}
