use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::components::{IpfsImage, SoftNotice, Spinner};
use crate::hooks::{use_indexed_nfts, ExploreMode};

#[component]
pub fn Explorer() -> Element {
    let mut mode = use_signal(ExploreMode::default);
    let mut cursor = use_signal(|| None::<String>);
    // Cursors of the pages before the current one.
    let mut history = use_signal(Vec::<Option<String>>::new);
    let (state, init_state, mut resource) = use_indexed_nfts(mode, cursor);

    let mut switch_mode = move |next: ExploreMode| {
        if mode() != next {
            history.write().clear();
            cursor.set(None);
            mode.set(next);
        }
    };

    let state = state.read().clone();
    let indexer_status = match init_state() {
        InitState::Uninitialized => "Indexer idle".to_string(),
        InitState::Initializing => "Connecting to indexer...".to_string(),
        InitState::Ready => "Indexer connected".to_string(),
        InitState::Failed(e) => format!("Indexer unavailable: {}", e),
    };
    let next_cursor = state
        .data
        .as_ref()
        .filter(|page| page.has_more())
        .and_then(|page| page.cursor.clone());

    rsx! {
        div { class: "max-w-6xl mx-auto",
            div { class: "flex justify-between items-center mb-8",
                h1 { class: "text-3xl font-bold", "Explore" }
                span { class: "text-xs text-gray-500", "{indexer_status}" }
            }

            div { class: "flex gap-2 mb-6",
                button {
                    class: if mode() == ExploreMode::Wallet { "btn btn-primary" } else { "btn btn-secondary" },
                    onclick: move |_| switch_mode(ExploreMode::Wallet),
                    "My wallet"
                }
                button {
                    class: if mode() == ExploreMode::Collection { "btn btn-primary" } else { "btn btn-secondary" },
                    onclick: move |_| switch_mode(ExploreMode::Collection),
                    "Collection"
                }
            }

            if state.unavailable {
                SoftNotice { feature: "The explorer", on_retry: move |_| resource.restart() }
            } else if let Some(page) = state.data {
                if page.result.is_empty() {
                    p { class: "text-gray-500 text-center py-12", "No NFTs found." }
                }
                div { class: "grid sm:grid-cols-2 lg:grid-cols-4 gap-6",
                    for nft in page.result.iter() {
                        IndexedCard {
                            key: "{nft.token_address}-{nft.token_id}",
                            nft: nft.clone(),
                            image: nft.parsed_metadata().map(|meta| meta.image).filter(|uri| !uri.is_empty()),
                        }
                    }
                }
                div { class: "flex justify-between items-center mt-6",
                    button {
                        class: "btn btn-secondary",
                        disabled: history.read().is_empty(),
                        onclick: move |_| {
                            let previous = history.write().pop();
                            if let Some(previous) = previous {
                                cursor.set(previous);
                            }
                        },
                        "Previous"
                    }
                    if let Some(total) = page.total {
                        span { class: "text-sm text-gray-500", "{total} total" }
                    }
                    button {
                        class: "btn btn-secondary",
                        disabled: !page.has_more(),
                        onclick: move |_| {
                            if let Some(next) = next_cursor.clone() {
                                history.write().push(cursor());
                                cursor.set(Some(next));
                            }
                        },
                        "Next"
                    }
                }
            } else if state.loading {
                Spinner { label: "Loading indexed NFTs..." }
            } else if let Some(e) = state.error {
                p { class: "text-red-400", "{e}" }
            }
        }
    }
}

#[component]
fn IndexedCard(nft: IndexedNft, image: Option<String>) -> Element {
    let title = nft
        .name
        .clone()
        .unwrap_or_else(|| "Unnamed collection".to_string());

    rsx! {
        div { class: "card overflow-hidden flex flex-col",
            if let Some(uri) = image {
                IpfsImage { key: "{uri}", uri: uri.clone(), alt: title.clone() }
            }
            div { class: "p-4 space-y-1",
                h3 { class: "font-semibold text-gray-100", "{title}" }
                p { class: "text-xs text-gray-500 font-mono", "#{nft.token_id}" }
                if let Some(kind) = &nft.contract_type {
                    p { class: "text-xs text-gray-500", "{kind}" }
                }
            }
        }
    }
}
