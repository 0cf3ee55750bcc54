use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::route::Route;
use crate::components::WalletButton;

#[component]
pub fn Layout() -> Element {
    let config = use_context::<MarketConfig>();
    let wallet = use_context::<WalletConfig>();

    rsx! {
        div { class: "min-h-screen",
            style: "background-color: var(--surface-base);",
            // Navigation
            nav { class: "border-b elevated-border backdrop-blur sticky top-0 z-50",
                style: "background-color: var(--surface-base);",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div { class: "flex justify-between h-16",
                        div { class: "flex items-center",
                            Link { to: Route::Home {}, class: "flex items-center space-x-2",
                                span { class: "text-2xl font-bold text-market-400", "{wallet.app_name}" }
                            }
                        }

                        div { class: "hidden sm:flex sm:items-center sm:space-x-8",
                            NavLink { to: Route::Marketplace {}, label: "Marketplace" }
                            NavLink { to: Route::Mint {}, label: "Mint" }
                            NavLink { to: Route::MyNfts {}, label: "My NFTs" }
                            NavLink { to: Route::Dashboard {}, label: "Dashboard" }
                            NavLink { to: Route::Explorer {}, label: "Explore" }
                        }

                        div { class: "flex items-center",
                            WalletButton {}
                        }
                    }
                }
            }

            main { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8",
                Outlet::<Route> {}
            }

            footer { class: "border-t elevated-border py-8 mt-auto",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 text-center text-low",
                    p { "{wallet.app_name} - mint, list and trade on chain {config.chain_id}" }
                    p { class: "text-sm mt-2",
                        "Collection: "
                        code { class: "text-gold", "{config.nft_address}" }
                        " Marketplace: "
                        code { class: "text-gold", "{config.marketplace_address}" }
                    }
                }
            }
        }
    }
}

#[component]
fn NavLink(to: Route, label: &'static str) -> Element {
    rsx! {
        Link {
            to: to,
            class: "text-mid hover:text-gold px-3 py-2 text-sm font-medium transition-colors",
            "{label}"
        }
    }
}
