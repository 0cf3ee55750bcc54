use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::components::{SoftNotice, Spinner};
use crate::hooks::{use_market_stats, MarketStats};

fn short(addr: &str) -> String {
    if addr.len() > 16 {
        format!("{}...{}", &addr[..8], &addr[addr.len() - 6..])
    } else {
        addr.to_string()
    }
}

#[component]
pub fn Dashboard() -> Element {
    let mut page = use_signal(Page::default);
    let poller = use_market_stats(page);
    let state = poller.state().read().clone();
    let current = page();

    let retry = poller.clone();
    let refresh = poller.clone();

    rsx! {
        div { class: "max-w-5xl mx-auto",
            div { class: "flex justify-between items-center mb-8",
                h1 { class: "text-3xl font-bold", "Dashboard" }
                button {
                    class: "btn btn-secondary",
                    disabled: state.loading,
                    onclick: move |_| refresh.refresh(),
                    if state.loading { "Refreshing..." } else { "Refresh" }
                }
            }

            if state.unavailable {
                SoftNotice { feature: "The dashboard", on_retry: move |_| retry.refresh() }
            } else if let Some(data) = state.data {
                StatsPanel { data: data.clone() }

                div { class: "card mt-6",
                    h3 { class: "text-lg font-semibold text-market-400 mb-4", "Recent purchases" }
                    if data.purchases.is_empty() {
                        p { class: "text-gray-500 text-center py-8", "No purchases on this page." }
                    } else {
                        div { class: "grid grid-cols-4 gap-4 pb-3 border-b border-gray-700 text-sm text-gray-500",
                            div { "Token" }
                            div { "Buyer" }
                            div { "Seller" }
                            div { class: "text-right", "Price" }
                        }
                        div { class: "divide-y divide-gray-800",
                            for purchase in data.purchases.iter() {
                                div { key: "{purchase.id}", class: "grid grid-cols-4 gap-4 py-3 font-mono text-sm",
                                    div { class: "text-gray-300", "#{purchase.token_id}" }
                                    div { class: "text-gray-400", {short(&purchase.buyer)} }
                                    div { class: "text-gray-400", {short(&purchase.seller)} }
                                    div { class: "text-right text-gold", {format!("{} ETH", format_wei_str(&purchase.price))} }
                                }
                            }
                        }
                    }
                    div { class: "flex justify-between items-center mt-4",
                        button {
                            class: "btn btn-secondary",
                            disabled: current.skip == 0,
                            onclick: move |_| page.set(current.previous()),
                            "Previous"
                        }
                        span { class: "text-sm text-gray-500",
                            {format!("{} to {}", current.skip + 1, current.skip + current.first)}
                        }
                        button {
                            class: "btn btn-secondary",
                            disabled: (data.purchases.len() as u32) < current.first,
                            onclick: move |_| page.set(current.next()),
                            "Next"
                        }
                    }
                }
            } else if state.loading {
                Spinner { label: "Loading marketplace stats..." }
            } else if let Some(e) = state.error {
                p { class: "text-red-400", "Error: {e}" }
            }
        }
    }
}

#[component]
fn StatsPanel(data: MarketStats) -> Element {
    rsx! {
        div { class: "grid md:grid-cols-2 gap-6",
            div { class: "card space-y-3",
                h3 { class: "text-lg font-semibold text-market-400 mb-2", "Marketplace" }
                if let Some(stats) = &data.stats {
                    StatRow { label: "Total listings", value: stats.total_listings.clone() }
                    StatRow {
                        label: "Active listings",
                        value: stats.active_listings.clone().unwrap_or_else(|| data.listings.len().to_string()),
                    }
                    StatRow { label: "Total sales", value: stats.total_sales.clone() }
                    StatRow { label: "Volume", value: format!("{} ETH", format_wei_str(&stats.total_volume)) }
                } else {
                    p { class: "text-gray-500", "Nothing indexed yet." }
                }
            }

            div { class: "card space-y-3",
                h3 { class: "text-lg font-semibold text-market-400 mb-2", "You" }
                if let Some(user) = &data.user {
                    StatRow { label: "Listings", value: user.total_listings.clone() }
                    StatRow { label: "Purchases", value: user.total_purchases.clone() }
                    StatRow { label: "Sales", value: user.total_sales.clone() }
                    StatRow { label: "Bought", value: format!("{} ETH", format_wei_str(&user.volume_bought)) }
                    StatRow { label: "Sold", value: format!("{} ETH", format_wei_str(&user.volume_sold)) }
                } else {
                    p { class: "text-gray-500", "Connect a wallet with marketplace activity to see your stats." }
                }
            }
        }

        div { class: "card mt-6",
            h3 { class: "text-lg font-semibold text-market-400 mb-4", "Active listings" }
            if data.listings.is_empty() {
                p { class: "text-gray-500 text-center py-8", "No active listings." }
            }
            div { class: "divide-y divide-gray-800",
                for listing in data.listings.iter() {
                    div { key: "{listing.id}", class: "flex justify-between py-3 font-mono text-sm",
                        span { class: "text-gray-300", "#{listing.token_id}" }
                        span { class: "text-gray-400", {short(&listing.seller)} }
                        span { class: "text-gold", {format!("{} ETH", format_wei_str(&listing.price))} }
                    }
                }
            }
        }
    }
}

#[component]
fn StatRow(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "flex justify-between items-center",
            span { class: "text-gray-500", "{label}" }
            span { class: "font-mono text-gray-300", "{value}" }
        }
    }
}
