use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::components::{NftCard, SoftNotice, Spinner};
use crate::hooks::{buy_item, use_marketplace};
use crate::WalletState;

#[component]
pub fn Marketplace() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();
    let (state, mut resource) = use_marketplace();
    // Listing id of the purchase in flight.
    let mut buying = use_signal(|| None::<u64>);
    let mut error = use_signal(|| None::<String>);

    let on_buy = use_callback(move |item: NftItem| {
        let Some(buyer) = wallet.read().address else {
            error.set(Some("Connect your wallet to buy".to_string()));
            return;
        };
        let config = config.clone();
        buying.set(item.listing_id);
        error.set(None);
        spawn(async move {
            let result = buy_item(&config, buyer, &item).await;
            buying.set(None);
            match result {
                Ok(()) => resource.restart(),
                Err(e) => {
                    tracing::error!("Purchase failed: {}", e);
                    error.set(Some(e));
                }
            }
        });
    });

    let state = state.read().clone();
    let connected = wallet.read().connected();

    rsx! {
        div { class: "max-w-6xl mx-auto",
            div { class: "flex justify-between items-center mb-8",
                h1 { class: "text-3xl font-bold", "Marketplace" }
                button {
                    class: "btn btn-secondary",
                    disabled: state.loading,
                    onclick: move |_| resource.restart(),
                    "Refresh"
                }
            }

            if let Some(e) = error() {
                p { class: "text-red-400 mb-4", "{e}" }
            }

            if state.unavailable {
                SoftNotice { feature: "The marketplace", on_retry: move |_| resource.restart() }
            } else if let Some(view) = state.data {
                if connected {
                    h2 { class: "text-xl font-semibold text-market-400 mb-4", "My listings" }
                    if view.mine.is_empty() {
                        p { class: "text-gray-500 mb-8", "You have nothing listed." }
                    } else {
                        div { class: "grid sm:grid-cols-2 lg:grid-cols-4 gap-6 mb-10",
                            for (key, item) in view.mine.iter().map(|item| (item.view_key(), item)) {
                                NftCard { key: "{key}", item: item.clone(),
                                    span { class: "text-xs text-gray-500", "Your listing" }
                                }
                            }
                        }
                    }
                }

                h2 { class: "text-xl font-semibold text-market-400 mb-4", "Listed NFTs" }
                if view.others.is_empty() {
                    p { class: "text-gray-500", "No NFTs are listed right now." }
                } else {
                    div { class: "grid sm:grid-cols-2 lg:grid-cols-4 gap-6",
                        for (key, item) in view.others.iter().map(|item| (item.view_key(), item)) {
                            NftCard { key: "{key}", item: item.clone(),
                                button {
                                    class: "btn btn-primary w-full",
                                    disabled: buying().is_some() || !connected,
                                    onclick: {
                                        let item = item.clone();
                                        move |_| on_buy.call(item.clone())
                                    },
                                    if buying().is_some() && buying() == item.listing_id { "Buying..." } else { "Buy" }
                                }
                            }
                        }
                    }
                }
            } else if state.loading {
                Spinner { label: "Loading listings..." }
            } else if let Some(e) = state.error {
                p { class: "text-red-400", "{e}" }
            }
        }
    }
}
