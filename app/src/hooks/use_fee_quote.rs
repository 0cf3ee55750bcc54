use std::rc::Rc;

use dioxus::prelude::*;
use nft_market_api::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeeQuote {
    pub fee: Option<String>,
    pub proceeds: Option<String>,
    pub pending: bool,
    pub error: Option<String>,
}

/// Marketplace fee for the price being typed, fetched once typing pauses.
pub fn use_fee_quote(price: Signal<String>) -> Signal<FeeQuote> {
    let config = use_context::<MarketConfig>();
    let mut quote = use_signal(FeeQuote::default);
    let sequence = use_hook(|| Rc::new(RequestSequence::new()));

    use_effect(move || {
        let input = price.read().trim().to_string();
        // A newer keystroke invalidates this one.
        let ticket = sequence.issue();
        let sequence = sequence.clone();
        let config = config.clone();

        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(FEE_DEBOUNCE_MS).await;
            if !sequence.is_current(ticket) {
                return;
            }
            if input.is_empty() {
                quote.set(FeeQuote::default());
                return;
            }
            let wei = match parse_price(&input) {
                Ok(wei) => wei,
                Err(e) => {
                    quote.set(FeeQuote {
                        error: Some(e.to_string()),
                        ..FeeQuote::default()
                    });
                    return;
                }
            };

            quote.write().pending = true;
            let result = MarketContracts::from_config(&config).calculate_fee(wei).await;
            if !sequence.is_current(ticket) {
                return;
            }
            quote.set(match result {
                Ok(fee) => FeeQuote {
                    fee: Some(format_ether(fee)),
                    proceeds: Some(format_ether(net_proceeds(wei, fee))),
                    ..FeeQuote::default()
                },
                Err(e) => FeeQuote {
                    error: Some(e.to_string()),
                    ..FeeQuote::default()
                },
            });
        });
    });

    quote
}
