#![allow(non_snake_case)]

mod components;
mod hooks;
mod pages;
mod route;

use std::rc::Rc;

use alloy_primitives::Address;
use dioxus::prelude::*;
use nft_market_api::prelude::*;
use route::Route;

/// Build-time configuration; the wasm bundle has no process environment.
fn build_env(name: &str) -> Option<String> {
    let value = match name {
        "NFT_CONTRACT_ADDRESS" => option_env!("NFT_CONTRACT_ADDRESS"),
        "MARKETPLACE_CONTRACT_ADDRESS" => option_env!("MARKETPLACE_CONTRACT_ADDRESS"),
        "CHAIN_ID" => option_env!("CHAIN_ID"),
        "RPC_URL" => option_env!("RPC_URL"),
        "PINATA_JWT" => option_env!("PINATA_JWT"),
        "PINATA_API_URL" => option_env!("PINATA_API_URL"),
        "PINATA_GATEWAY" => option_env!("PINATA_GATEWAY"),
        "SUBGRAPH_URL" => option_env!("SUBGRAPH_URL"),
        "MORALIS_API_KEY" => option_env!("MORALIS_API_KEY"),
        "MORALIS_API_URL" => option_env!("MORALIS_API_URL"),
        "WALLETCONNECT_PROJECT_ID" => option_env!("WALLETCONNECT_PROJECT_ID"),
        "APP_NAME" => option_env!("APP_NAME"),
        _ => None,
    };
    value.map(str::to_string)
}

fn main() {
    #[cfg(feature = "web")]
    {
        tracing_wasm::set_as_global_default();
        dioxus::launch(App);
    }

    #[cfg(feature = "desktop")]
    {
        dioxus::launch(App);
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(|| {
        MarketConfig::from_lookup(build_env)
            .and_then(|market| WalletConfig::from_lookup(build_env).map(|wallet| (market, wallet)))
            .map_err(|e| e.to_string())
    });

    match config {
        Ok((market, wallet)) => rsx! {
            Configured { market, wallet }
        },
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            rsx! {
                div { class: "max-w-xl mx-auto card mt-16 text-center",
                    h1 { class: "text-2xl font-bold mb-4", "Configuration error" }
                    p { class: "text-red-400 font-mono", "{e}" }
                }
            }
        }
    }
}

#[component]
fn Configured(market: MarketConfig, wallet: WalletConfig) -> Element {
    // Global state providers
    use_context_provider(|| market.clone());
    use_context_provider(|| wallet.clone());
    use_context_provider(|| Signal::new(WalletState::default()));
    use_context_provider(|| Rc::new(LazyClient::<IndexedNftClient>::new()));

    rsx! {
        Router::<Route> {}
    }
}

// Global state types
#[derive(Clone, Default, Debug, PartialEq)]
pub struct WalletState {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

impl WalletState {
    pub fn connected(&self) -> bool {
        self.address.is_some()
    }
}
