use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::consts::PLACEHOLDER_DESCRIPTION;
use crate::ipfs::placeholder_image;
use crate::units::{format_ether, parse_ether};

use super::{Attribute, NftMetadata};

/// A token as shown to the user: on-chain state merged with off-chain metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NftItem {
    pub token_id: u64,
    pub name: String,
    pub description: String,

    /// Metadata image reference; resolve through the gateways before display.
    pub image: String,

    pub owner: Address,
    pub is_listed: bool,

    /// Decimal display units.
    pub price: Option<String>,

    pub listing_id: Option<u64>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl NftItem {
    pub fn from_metadata(token_id: u64, owner: Address, metadata: NftMetadata) -> Self {
        let name = if metadata.name.is_empty() {
            format!("NFT #{}", token_id)
        } else {
            metadata.name
        };
        Self {
            token_id,
            name,
            description: metadata.description,
            image: metadata.image,
            owner,
            is_listed: false,
            price: None,
            listing_id: None,
            attributes: metadata.attributes,
        }
    }

    /// Stand-in used for marketplace entries whose metadata is not fetched.
    pub fn placeholder(token_id: u64, owner: Address) -> Self {
        Self {
            token_id,
            name: format!("NFT #{}", token_id),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            image: placeholder_image(),
            owner,
            is_listed: false,
            price: None,
            listing_id: None,
            attributes: Vec::new(),
        }
    }

    pub fn listed_at(mut self, listing_id: u64, price_wei: U256) -> Self {
        self.is_listed = true;
        self.listing_id = Some(listing_id);
        self.price = Some(format_ether(price_wei));
        self
    }

    /// Stable identity for rendering. Listings are unique per listing id even
    /// when one token is listed twice; unlisted items fall back to the token id.
    pub fn view_key(&self) -> String {
        match self.listing_id {
            Some(listing_id) => format!("listing-{}", listing_id),
            None => format!("token-{}", self.token_id),
        }
    }

    /// The listing price back in wei, for `buyNFT`.
    pub fn price_wei(&self) -> Option<U256> {
        self.price.as_deref().and_then(|p| parse_ether(p).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_price_round_trips_to_wei() {
        let wei = U256::from(1_250_000_000_000_000_000u64);
        let item = NftItem::placeholder(4, Address::ZERO).listed_at(2, wei);
        assert!(item.is_listed);
        assert_eq!(item.price.as_deref(), Some("1.25"));
        assert_eq!(item.price_wei(), Some(wei));
    }

    #[test]
    fn test_unnamed_metadata_gets_token_name() {
        let item = NftItem::from_metadata(9, Address::ZERO, NftMetadata::default());
        assert_eq!(item.name, "NFT #9");
    }

    #[test]
    fn test_view_key_separates_listings_of_one_token() {
        let first = NftItem::placeholder(3, Address::ZERO).listed_at(0, U256::from(1));
        let second = NftItem::placeholder(3, Address::ZERO).listed_at(5, U256::from(2));
        assert_ne!(first.view_key(), second.view_key());
        assert_eq!(NftItem::placeholder(3, Address::ZERO).view_key(), "token-3");
    }
}
