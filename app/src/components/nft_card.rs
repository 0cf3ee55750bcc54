use dioxus::prelude::*;
use nft_market_api::prelude::*;

use crate::components::IpfsImage;

fn rarity_badge(item: &NftItem) -> Option<(String, &'static str)> {
    let name = item
        .attributes
        .iter()
        .find(|a| a.trait_type == RARITY_TRAIT)?
        .value
        .as_str()?
        .to_string();
    let tier = RarityTier::ALL.into_iter().find(|t| t.name() == name)?;
    Some((name, tier.spec().color))
}

#[component]
pub fn NftCard(item: NftItem, children: Element) -> Element {
    let badge = rarity_badge(&item);

    rsx! {
        div { class: "card overflow-hidden flex flex-col",
            IpfsImage {
                key: "{item.image}",
                uri: item.image.clone(),
                alt: item.name.clone(),
            }
            div { class: "p-4 flex-1 flex flex-col gap-2",
                div { class: "flex justify-between items-start",
                    h3 { class: "font-semibold text-gray-100", "{item.name}" }
                    span { class: "text-xs text-gray-500 font-mono", "#{item.token_id}" }
                }
                if let Some((tier, color)) = badge {
                    span {
                        class: "text-xs font-semibold px-2 py-1 rounded w-fit",
                        style: "color: {color}; border: 1px solid {color};",
                        "{tier}"
                    }
                }
                p { class: "text-sm text-gray-400 line-clamp-2", "{item.description}" }
                if let Some(price) = &item.price {
                    p { class: "font-mono text-gold", "{price} ETH" }
                }
                div { class: "mt-auto pt-2", {children} }
            }
        }
    }
}
