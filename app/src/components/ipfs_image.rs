use dioxus::prelude::*;
use nft_market_api::prelude::*;

/// Image that walks the gateway candidates on load errors and ends on the
/// embedded placeholder. Key it by `uri` so a new reference starts over.
#[component]
pub fn IpfsImage(uri: String, alt: String, class: Option<String>) -> Element {
    let config = use_context::<MarketConfig>();
    let mut fallback = use_signal(|| GatewayFallback::for_uri(&config.gateways(), &uri));

    let src = fallback.read().src();
    let class = class.unwrap_or_else(|| "w-full aspect-square object-cover".to_string());

    rsx! {
        img {
            class: "{class}",
            src: "{src}",
            alt: "{alt}",
            onerror: move |_| {
                let mut cursor = fallback.write();
                if cursor.is_exhausted() {
                    return;
                }
                match cursor.advance() {
                    Some(next) => tracing::debug!("Image failed, trying {}", next),
                    None => tracing::debug!("All gateways failed, showing placeholder"),
                }
            },
        }
    }
}
