use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::route::Route;

#[component]
pub fn Home() -> Element {
    rsx! {
        div { class: "max-w-4xl mx-auto text-center py-16",
            // Hero
            h1 { class: "text-5xl font-bold mb-6",
                span { class: "text-market-400", "NFT" }
                span { class: "text-gray-100", " Market" }
            }

            p { class: "text-xl text-gray-400 mb-8 max-w-2xl mx-auto",
                "Mint artwork to IPFS with a random rarity, list it at your price, "
                "and buy from other collectors."
            }

            div { class: "flex justify-center gap-4 mb-16",
                Link {
                    to: Route::Mint {},
                    class: "btn btn-primary text-lg px-8 py-3",
                    "Mint an NFT"
                }
                Link {
                    to: Route::Marketplace {},
                    class: "btn btn-secondary text-lg px-8 py-3",
                    "Browse Marketplace"
                }
            }

            div { class: "grid md:grid-cols-3 gap-8 mt-16",
                FeatureCard {
                    title: "Mint",
                    description: "Your image and metadata are pinned to IPFS before minting.",
                    icon: "🎨",
                }
                FeatureCard {
                    title: "List",
                    description: "Approve once, set a price, and see the fee before you sign.",
                    icon: "🏷️",
                }
                FeatureCard {
                    title: "Trade",
                    description: "Buy listed NFTs straight from your wallet.",
                    icon: "💎",
                }
            }

            // Rarity table
            div { class: "mt-16 card max-w-xl mx-auto",
                h3 { class: "text-xl font-semibold text-market-400 mb-4", "Rarity Tiers" }
                div { class: "text-left space-y-2 text-gray-300",
                    for spec in STANDARD_TIERS.iter() {
                        p { key: "{spec.tier}", class: "flex justify-between",
                            span { style: "color: {spec.color};", "{spec.tier}" }
                            span { class: "text-gray-500", {format!("{:.1}%", spec.percentage())} }
                            span { class: "font-mono", {format!("x{:.1}", spec.multiplier)} }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FeatureCard(title: &'static str, description: &'static str, icon: &'static str) -> Element {
    rsx! {
        div { class: "card text-center",
            div { class: "text-4xl mb-4", "{icon}" }
            h3 { class: "text-lg font-semibold text-market-400 mb-2", "{title}" }
            p { class: "text-gray-400", "{description}" }
        }
    }
}
