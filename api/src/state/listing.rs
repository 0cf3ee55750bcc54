use alloy_primitives::{Address, U256};

use crate::contracts::Listing;

impl Listing {
    pub fn is_active(&self) -> bool {
        !self.isSold
    }

    pub fn is_for(&self, nft_address: Address, token_id: U256) -> bool {
        self.nftAddress == nft_address && self.tokenId == token_id
    }

    /// Active listing of this exact token by this seller.
    pub fn lists(&self, nft_address: Address, token_id: U256, seller: Address) -> bool {
        self.is_active() && self.is_for(nft_address, token_id) && self.seller == seller
    }
}

/// First active listing of `(nft_address, token_id)` by `seller`, in array order,
/// together with how many further active listings match the same key.
pub fn find_listing(
    listings: &[Listing],
    nft_address: Address,
    token_id: U256,
    seller: Address,
) -> Option<(u64, &Listing, usize)> {
    let mut matches = listings
        .iter()
        .enumerate()
        .filter(|(_, l)| l.lists(nft_address, token_id, seller));
    let (index, first) = matches.next()?;
    Some((index as u64, first, matches.count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(seller: u8, token_id: u64, sold: bool) -> Listing {
        Listing {
            seller: Address::repeat_byte(seller),
            nftAddress: Address::repeat_byte(0xcc),
            tokenId: U256::from(token_id),
            price: U256::from(100 + token_id),
            isSold: sold,
        }
    }

    #[test]
    fn test_find_listing_skips_sold_and_foreign() {
        let listings = vec![listing(1, 5, true), listing(2, 5, false), listing(1, 5, false)];
        let (id, found, dupes) =
            find_listing(&listings, Address::repeat_byte(0xcc), U256::from(5), Address::repeat_byte(1))
                .unwrap();
        assert_eq!(id, 2);
        assert_eq!(found.seller, Address::repeat_byte(1));
        assert_eq!(dupes, 0);
    }

    #[test]
    fn test_find_listing_first_match_wins() {
        let listings = vec![listing(1, 5, false), listing(1, 5, false)];
        let (id, _, dupes) =
            find_listing(&listings, Address::repeat_byte(0xcc), U256::from(5), Address::repeat_byte(1))
                .unwrap();
        assert_eq!(id, 0);
        assert_eq!(dupes, 1);
    }

    #[test]
    fn test_find_listing_none() {
        let listings = vec![listing(1, 6, false)];
        assert!(find_listing(&listings, Address::repeat_byte(0xcc), U256::from(5), Address::repeat_byte(1))
            .is_none());
    }
}
