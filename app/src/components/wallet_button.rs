use std::str::FromStr;

use alloy_primitives::Address;
use dioxus::prelude::*;
use futures::StreamExt;
use nft_market_api::prelude::*;

use crate::WalletState;

#[derive(Clone)]
enum WalletAction {
    Connect,
}

#[component]
pub fn WalletButton() -> Element {
    let mut wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();

    // Use coroutine for lifecycle-safe async operations
    let wallet_coro = use_coroutine(move |mut rx: UnboundedReceiver<WalletAction>| {
        let config = config.clone();
        async move {
            while let Some(action) = rx.next().await {
                match action {
                    WalletAction::Connect => match connect_wallet(&config).await {
                        Ok((address, chain_id)) => {
                            let mut state = wallet.write();
                            state.address = Some(address);
                            state.chain_id = Some(chain_id);
                        }
                        Err(e) => {
                            tracing::error!("Wallet connection failed: {}", e);
                        }
                    },
                }
            }
        }
    });

    let connect = move |_| {
        wallet_coro.send(WalletAction::Connect);
    };

    let disconnect = move |_| {
        wallet.set(WalletState::default());
    };

    let wallet_read = wallet.read();

    if let Some(address) = wallet_read.address {
        let address = address.to_string();
        let short = format!("{}...{}", &address[..6], &address[address.len() - 4..]);

        rsx! {
            div { class: "flex items-center space-x-2",
                span { class: "text-sm text-gray-400 font-mono", "{short}" }
                button {
                    class: "btn btn-secondary text-sm",
                    onclick: disconnect,
                    "Disconnect"
                }
            }
        }
    } else {
        rsx! {
            button {
                class: "btn btn-primary",
                onclick: connect,
                "Connect Wallet"
            }
        }
    }
}

/// Requests accounts from the injected provider and moves it to the configured chain.
async fn connect_wallet(config: &MarketConfig) -> Result<(Address, u64), String> {
    let accounts = ethereum_request("eth_requestAccounts", serde_json::json!([])).await?;
    let account = accounts
        .as_array()
        .and_then(|a| a.first())
        .and_then(|a| a.as_str())
        .ok_or("Wallet returned no accounts")?;
    let address = Address::from_str(account).map_err(|e| format!("Invalid account: {}", e))?;

    let chain = ethereum_request("eth_chainId", serde_json::json!([])).await?;
    let mut chain_id = parse_quantity(chain.as_str().unwrap_or_default()).map_err(|e| e.to_string())?;

    if chain_id != config.chain_id {
        tracing::info!("Switching wallet from chain {} to {}", chain_id, config.chain_id);
        ethereum_request(
            "wallet_switchEthereumChain",
            serde_json::json!([{ "chainId": config.chain_hex() }]),
        )
        .await?;
        chain_id = config.chain_id;
    }

    Ok((address, chain_id))
}

/// Sign and send a transaction via the injected wallet; returns the hash.
pub async fn send_transaction(tx: &TxRequest) -> Result<String, String> {
    let hash = ethereum_request("eth_sendTransaction", serde_json::json!([tx_json(tx)])).await?;
    hash.as_str()
        .map(str::to_string)
        .ok_or("Transaction hash not a string".to_string())
}

/// `window.ethereum.request({ method, params })`, with JSON in and out.
#[cfg(feature = "web")]
async fn ethereum_request(
    method: &str,
    params: serde_json::Value,
) -> Result<serde_json::Value, String> {
    use js_sys::{Function, Object, Promise, Reflect, JSON};
    use wasm_bindgen::prelude::*;

    let window = web_sys::window().ok_or("No window")?;

    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
        .map_err(|_| "Wallet not found")?;

    if ethereum.is_undefined() {
        return Err("No Ethereum wallet found. Please install one and refresh.".to_string());
    }

    let request_fn: Function = Reflect::get(&ethereum, &JsValue::from_str("request"))
        .map_err(|_| "No request method")?
        .dyn_into()
        .map_err(|_| "request is not a function")?;

    let args = Object::new();
    Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
        .map_err(|_| "Failed to set method")?;
    let params = JSON::parse(&params.to_string()).map_err(|_| "Failed to encode params")?;
    Reflect::set(&args, &JsValue::from_str("params"), &params)
        .map_err(|_| "Failed to set params")?;

    let promise: Promise = request_fn
        .call1(&ethereum, &args.into())
        .map_err(|e| format!("{} call failed: {:?}", method, e))?
        .dyn_into()
        .map_err(|_| "Not a promise")?;

    let result = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| format!("{} rejected: {:?}", method, e))?;

    if result.is_undefined() || result.is_null() {
        return Ok(serde_json::Value::Null);
    }
    let text: String = JSON::stringify(&result)
        .map_err(|_| "Failed to decode response")?
        .into();
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

#[cfg(not(feature = "web"))]
async fn ethereum_request(
    _method: &str,
    _params: serde_json::Value,
) -> Result<serde_json::Value, String> {
    Err("Browser wallet only available in web mode".to_string())
}
