use base64::Engine;
use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::hooks::{use_fee_quote, WalletBackend};
use crate::WalletState;

/// Base price the rarity multiplier is applied to for the suggested list price.
const SUGGESTED_BASE_PRICE: &str = "0.01";

#[component]
pub fn Mint() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let config = use_context::<MarketConfig>();

    let mut name = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut price = use_signal(String::new);
    let mut image = use_signal(|| None::<ImageUpload>);
    let mut step = use_signal(|| None::<MintStep>);
    let mut outcome = use_signal(|| None::<MintOutcome>);
    let mut error = use_signal(|| None::<String>);
    let fee = use_fee_quote(price);

    let on_file = move |evt: FormEvent| async move {
        let Some(file) = evt.files().into_iter().next() else {
            image.set(None);
            return;
        };
        match file.read_bytes().await {
            Ok(bytes) => image.set(Some(ImageUpload {
                file_name: file.name(),
                content_type: file
                    .content_type()
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                bytes: bytes.to_vec(),
            })),
            Err(e) => error.set(Some(format!("Could not read file: {}", e))),
        }
    };

    let on_submit = move |_| {
        let Some(owner) = wallet.read().address else {
            error.set(Some("Connect your wallet first".to_string()));
            return;
        };
        let form = MintForm {
            name: name(),
            description: description(),
            price: Some(price()),
        };
        let upload = image();
        if let Err(e) = form.validate(upload.as_ref()) {
            error.set(Some(e.to_string()));
            return;
        }

        // Roll before anything is sent so the result is fixed for this mint.
        let rarity = RarityGenerator::standard().roll(&mut rand::thread_rng());
        let config = config.clone();
        error.set(None);
        outcome.set(None);

        spawn(async move {
            let backend = WalletBackend::new(&config);
            let target = MintTarget {
                nft: config.nft_address,
                marketplace: config.marketplace_address,
                owner,
            };
            let result = run_mint(&backend, &target, &form, upload.as_ref(), rarity, |s| {
                step.set(Some(s))
            })
            .await;
            step.set(None);
            match result {
                Ok(minted) => {
                    tracing::info!("Minted token {}", minted.token_id);
                    outcome.set(Some(minted));
                }
                Err(e) => {
                    tracing::error!("Mint failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let preview = image.read().as_ref().map(|upload| {
        format!(
            "data:{};base64,{}",
            upload.content_type,
            base64::engine::general_purpose::STANDARD.encode(&upload.bytes)
        )
    });
    let busy = step.read().is_some();
    let quote = fee.read().clone();

    rsx! {
        div { class: "max-w-4xl mx-auto",
            h1 { class: "text-3xl font-bold mb-8", "Mint an NFT" }

            div { class: "grid md:grid-cols-2 gap-6",
                div { class: "card space-y-4",
                    label { class: "block text-sm text-gray-400", "Image" }
                    input {
                        r#type: "file",
                        accept: "image/*",
                        disabled: busy,
                        onchange: on_file,
                    }
                    if let Some(src) = preview {
                        img { class: "w-full rounded", src: "{src}", alt: "Preview" }
                    }

                    label { class: "block text-sm text-gray-400", "Name" }
                    input {
                        class: "input w-full",
                        value: "{name}",
                        disabled: busy,
                        oninput: move |evt| name.set(evt.value()),
                    }

                    label { class: "block text-sm text-gray-400", "Description" }
                    textarea {
                        class: "input w-full",
                        value: "{description}",
                        disabled: busy,
                        oninput: move |evt| description.set(evt.value()),
                    }

                    label { class: "block text-sm text-gray-400", "List price (ETH, optional)" }
                    input {
                        class: "input w-full font-mono",
                        placeholder: "0.05",
                        value: "{price}",
                        disabled: busy,
                        oninput: move |evt| price.set(evt.value()),
                    }
                    FeeLine { quote }

                    button {
                        class: "btn btn-primary w-full",
                        disabled: busy,
                        onclick: on_submit,
                        if busy { "Minting..." } else { "Mint" }
                    }
                }

                div { class: "card space-y-3",
                    h3 { class: "text-lg font-semibold text-market-400", "Progress" }
                    if let Some(current) = step() {
                        p { class: "text-gray-300", "{current}..." }
                    }
                    if let Some(e) = error() {
                        p { class: "text-red-400", "{e}" }
                    }
                    if let Some(minted) = outcome() {
                        MintResult { minted }
                    }
                    if step().is_none() && error().is_none() && outcome().is_none() {
                        p { class: "text-gray-500", "Rarity is rolled when you press Mint." }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FeeLine(quote: crate::hooks::FeeQuote) -> Element {
    rsx! {
        if quote.pending {
            p { class: "text-xs text-gray-500", "Calculating fee..." }
        } else if let (Some(fee), Some(proceeds)) = (&quote.fee, &quote.proceeds) {
            p { class: "text-xs text-gray-400 font-mono", "Fee {fee} ETH, you receive {proceeds} ETH" }
        } else if let Some(e) = &quote.error {
            p { class: "text-xs text-red-400", "{e}" }
        }
    }
}

#[component]
fn MintResult(minted: MintOutcome) -> Element {
    let suggested = parse_ether(SUGGESTED_BASE_PRICE)
        .map(|base| format_ether(minted.rarity.price_hint(base)))
        .unwrap_or_default();
    let color = minted.rarity.color;

    rsx! {
        div { class: "space-y-2",
            p { class: "text-green-400", "Minted token #{minted.token_id}" }
            p {
                span { class: "font-semibold", style: "color: {color};", "{minted.rarity.tier}" }
                span { class: "text-gray-500 ml-2",
                    {format!("score {} ({:.2}% chance)", minted.rarity.score, minted.rarity.percentage)}
                }
            }
            if minted.listed {
                p { class: "text-gray-300", "Listed on the marketplace" }
            } else {
                p { class: "text-gray-400", "Suggested list price: {suggested} ETH" }
            }
            div { class: "text-sm text-gray-400",
                for attribute in minted.metadata.attributes.iter() {
                    p { key: "{attribute.trait_type}",
                        span { class: "text-gray-500", "{attribute.trait_type}: " }
                        {attribute.display_value()}
                    }
                }
            }
            p { class: "text-xs font-mono text-gray-500 break-all", "{minted.token_uri}" }
        }
    }
}
