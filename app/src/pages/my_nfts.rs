use dioxus::prelude::*;
use nft_market_api::prelude::*;

use super::mint::FeeLine;
use crate::components::{NftCard, SoftNotice, Spinner};
use crate::hooks::{list_item, use_fee_quote, use_owned_nfts};
use crate::WalletState;

#[component]
pub fn MyNfts() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let (state, mut resource) = use_owned_nfts();

    let connected = wallet.read().connected();
    let state = state.read().clone();

    rsx! {
        div { class: "max-w-6xl mx-auto",
            div { class: "flex justify-between items-center mb-8",
                h1 { class: "text-3xl font-bold", "My NFTs" }
                if connected {
                    button {
                        class: "btn btn-secondary",
                        disabled: state.loading,
                        onclick: move |_| resource.restart(),
                        "Refresh"
                    }
                }
            }

            if !connected {
                div { class: "card text-center py-12",
                    p { class: "text-gray-500", "Connect your wallet to see your NFTs" }
                }
            } else if state.unavailable {
                SoftNotice { feature: "My NFTs", on_retry: move |_| resource.restart() }
            } else if let Some(scan) = state.data {
                if !scan.skipped.is_empty() {
                    p { class: "text-yellow-500 text-sm mb-4",
                        {format!("{} token(s) could not be loaded and are hidden.", scan.skipped.len())}
                    }
                }
                if scan.is_empty() {
                    div { class: "card text-center py-12",
                        p { class: "text-gray-500", "You don't own any NFTs from this collection yet." }
                    }
                }

                if !scan.unlisted.is_empty() {
                    h2 { class: "text-xl font-semibold text-market-400 mb-4", "Not listed" }
                    div { class: "grid sm:grid-cols-2 lg:grid-cols-4 gap-6 mb-10",
                        for (key, item) in scan.unlisted.iter().map(|item| (item.view_key(), item)) {
                            NftCard { key: "{key}", item: item.clone(),
                                ListForm {
                                    token_id: item.token_id,
                                    on_listed: move |_| resource.restart(),
                                }
                            }
                        }
                    }
                }

                if !scan.listed.is_empty() {
                    h2 { class: "text-xl font-semibold text-market-400 mb-4", "Listed" }
                    div { class: "grid sm:grid-cols-2 lg:grid-cols-4 gap-6",
                        for (key, item) in scan.listed.iter().map(|item| (item.view_key(), item)) {
                            NftCard { key: "{key}", item: item.clone(),
                                span { class: "text-xs text-gray-500", "On the marketplace" }
                            }
                        }
                    }
                }
            } else if state.loading {
                Spinner { label: "Scanning your tokens..." }
            } else if let Some(e) = state.error {
                p { class: "text-red-400", "{e}" }
            }
        }
    }
}

#[component]
fn ListForm(token_id: u64, on_listed: EventHandler<()>) -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();
    let mut price = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let fee = use_fee_quote(price);

    let on_list = move |_| {
        let Some(seller) = wallet.read().address else {
            return;
        };
        let config = config.clone();
        let input = price();
        busy.set(true);
        error.set(None);
        spawn(async move {
            let result = list_item(&config, seller, token_id, &input).await;
            busy.set(false);
            match result {
                Ok(()) => on_listed.call(()),
                Err(e) => {
                    tracing::error!("Listing token {} failed: {}", token_id, e);
                    error.set(Some(e));
                }
            }
        });
    };

    let quote = fee.read().clone();

    rsx! {
        div { class: "space-y-2",
            input {
                class: "input w-full font-mono",
                placeholder: "Price in ETH",
                value: "{price}",
                disabled: busy(),
                oninput: move |evt| price.set(evt.value()),
            }
            FeeLine { quote }
            button {
                class: "btn btn-primary w-full",
                disabled: busy() || price.read().trim().is_empty(),
                onclick: on_list,
                if busy() { "Listing..." } else { "List" }
            }
            if let Some(e) = error() {
                p { class: "text-xs text-red-400", "{e}" }
            }
        }
    }
}
