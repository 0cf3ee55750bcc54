//! Merges on-chain ownership, marketplace listings and off-chain metadata
//! into the owned-NFT and marketplace views.

use alloy_primitives::{Address, U256};

use crate::contracts::Listing;
use crate::error::MarketError;
use crate::ipfs::Gateways;
use crate::state::{find_listing, NftItem, NftMetadata};

/// Read side of the collection and marketplace contracts.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    fn nft_address(&self) -> Address;
    async fn token_counter(&self) -> Result<u64, MarketError>;
    async fn owner_of(&self, token_id: u64) -> Result<Address, MarketError>;
    async fn token_uri(&self, token_id: u64) -> Result<String, MarketError>;
    async fn listings(&self) -> Result<Vec<Listing>, MarketError>;
}

#[allow(async_fn_in_trait)]
pub trait MetadataFetcher {
    async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnedScan {
    pub unlisted: Vec<NftItem>,
    pub listed: Vec<NftItem>,
    /// Owned or unreadable tokens dropped after a per-token failure.
    pub skipped: Vec<u64>,
    /// Active listings shadowed by an earlier listing of the same token.
    pub duplicate_listings: usize,
}

impl OwnedScan {
    pub fn len(&self) -> usize {
        self.unlisted.len() + self.listed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketView {
    pub mine: Vec<NftItem>,
    pub others: Vec<NftItem>,
}

async fn fetch_item<F: MetadataFetcher>(
    fetcher: &F,
    gateways: &Gateways,
    token_uri: &str,
) -> Result<NftMetadata, MarketError> {
    let url = gateways.resolve(token_uri)?;
    fetcher.fetch_metadata(&url).await
}

async fn load_owned<C: ChainReader, F: MetadataFetcher>(
    chain: &C,
    fetcher: &F,
    gateways: &Gateways,
    token_id: u64,
    owner: Address,
) -> Result<Option<NftItem>, MarketError> {
    if chain.owner_of(token_id).await? != owner {
        return Ok(None);
    }
    let uri = chain.token_uri(token_id).await?;
    let metadata = fetch_item(fetcher, gateways, &uri).await?;
    Ok(Some(NftItem::from_metadata(token_id, owner, metadata)))
}

/// Walks every minted token in ascending order and splits the caller's
/// tokens by whether they have an active listing of their own.
pub async fn scan_owned<C: ChainReader, F: MetadataFetcher>(
    chain: &C,
    fetcher: &F,
    owner: Address,
    gateways: &Gateways,
) -> Result<OwnedScan, MarketError> {
    let counter = chain.token_counter().await?;
    let listings = chain.listings().await?;
    let nft = chain.nft_address();
    tracing::debug!("scanning {} tokens against {} listings", counter, listings.len());

    let mut scan = OwnedScan::default();
    for token_id in 0..counter {
        let item = match load_owned(chain, fetcher, gateways, token_id, owner).await {
            Ok(Some(item)) => item,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!("skipping token {}: {}", token_id, err);
                scan.skipped.push(token_id);
                continue;
            }
        };

        match find_listing(&listings, nft, U256::from(token_id), owner) {
            Some((listing_id, listing, dupes)) => {
                if dupes > 0 {
                    tracing::warn!(
                        "token {} has {} extra active listings, using listing {}",
                        token_id,
                        dupes,
                        listing_id
                    );
                    scan.duplicate_listings += dupes;
                }
                scan.listed.push(item.listed_at(listing_id, listing.price));
            }
            None => scan.unlisted.push(item),
        }
    }
    Ok(scan)
}

/// Active listings split into the caller's own and everyone else's.
pub async fn load_marketplace<C: ChainReader, F: MetadataFetcher>(
    chain: &C,
    fetcher: &F,
    me: Address,
    gateways: &Gateways,
) -> Result<MarketView, MarketError> {
    let nft = chain.nft_address();
    let listings = chain.listings().await?;
    let mut view = MarketView::default();

    for (index, listing) in listings.iter().enumerate() {
        if !listing.is_active() {
            continue;
        }
        let listing_id = index as u64;
        let token_id = match u64::try_from(listing.tokenId) {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!("listing {} has an out of range token id", listing_id);
                continue;
            }
        };

        if listing.seller == me && listing.nftAddress != nft {
            tracing::warn!(
                "listing {} is for collection {}, showing a placeholder",
                listing_id,
                listing.nftAddress
            );
            view.mine
                .push(NftItem::placeholder(token_id, me).listed_at(listing_id, listing.price));
        } else if listing.seller == me {
            let item = match chain.token_uri(token_id).await {
                Ok(uri) => fetch_item(fetcher, gateways, &uri).await,
                Err(err) => Err(err),
            };
            let item = match item {
                Ok(metadata) => NftItem::from_metadata(token_id, me, metadata),
                Err(err) => {
                    tracing::warn!("metadata for listed token {} unavailable: {}", token_id, err);
                    NftItem::placeholder(token_id, me)
                }
            };
            view.mine.push(item.listed_at(listing_id, listing.price));
        } else {
            view.others
                .push(NftItem::placeholder(token_id, listing.seller).listed_at(listing_id, listing.price));
        }
    }
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::{BTreeSet, HashMap};

    const NFT: Address = Address::new([0xcc; 20]);
    const ME: Address = Address::new([0x01; 20]);
    const OTHER: Address = Address::new([0x02; 20]);
    const FOREIGN_NFT: Address = Address::new([0xee; 20]);
    const HASH: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    struct FakeChain {
        owners: Vec<Address>,
        listings: Vec<Listing>,
        broken: BTreeSet<u64>,
        listings_down: bool,
        uri_reads: Mutex<Vec<u64>>,
    }

    impl FakeChain {
        fn new(owners: Vec<Address>) -> Self {
            Self {
                owners,
                listings: Vec::new(),
                broken: BTreeSet::new(),
                listings_down: false,
                uri_reads: Mutex::new(Vec::new()),
            }
        }

        fn list(mut self, seller: Address, token_id: u64, price: u64, sold: bool) -> Self {
            self.listings.push(Listing {
                seller,
                nftAddress: NFT,
                tokenId: U256::from(token_id),
                price: U256::from(price),
                isSold: sold,
            });
            self
        }
    }

    impl ChainReader for FakeChain {
        fn nft_address(&self) -> Address {
            NFT
        }

        async fn token_counter(&self) -> Result<u64, MarketError> {
            Ok(self.owners.len() as u64)
        }

        async fn owner_of(&self, token_id: u64) -> Result<Address, MarketError> {
            if self.broken.contains(&token_id) {
                return Err(MarketError::Rpc {
                    code: 3,
                    message: "execution reverted".into(),
                });
            }
            Ok(self.owners[token_id as usize])
        }

        async fn token_uri(&self, token_id: u64) -> Result<String, MarketError> {
            self.uri_reads.lock().push(token_id);
            Ok(format!("ipfs://{}/{}.json", HASH, token_id))
        }

        async fn listings(&self) -> Result<Vec<Listing>, MarketError> {
            if self.listings_down {
                return Err(MarketError::Status {
                    service: "rpc",
                    status: 500,
                });
            }
            Ok(self.listings.clone())
        }
    }

    #[derive(Default)]
    struct FakeFetcher {
        missing: BTreeSet<String>,
    }

    impl MetadataFetcher for FakeFetcher {
        async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError> {
            if self.missing.contains(url) {
                return Err(MarketError::Status {
                    service: "metadata gateway",
                    status: 404,
                });
            }
            let file = url.rsplit('/').next().unwrap_or_default();
            Ok(NftMetadata {
                name: format!("Token {}", file.trim_end_matches(".json")),
                image: format!("ipfs://{}/img.png", HASH),
                ..Default::default()
            })
        }
    }

    fn ids(items: &[NftItem]) -> Vec<u64> {
        items.iter().map(|i| i.token_id).collect()
    }

    #[tokio::test]
    async fn test_partitions_are_disjoint_and_cover_owned() {
        let chain = FakeChain::new(vec![ME, OTHER, ME, ME, OTHER, ME])
            .list(ME, 2, 500, false)
            .list(OTHER, 1, 700, false)
            .list(ME, 3, 900, true)
            .list(OTHER, 5, 100, false);
        let scan = scan_owned(&chain, &FakeFetcher::default(), ME, &Gateways::default())
            .await
            .unwrap();

        assert_eq!(ids(&scan.listed), vec![2]);
        assert_eq!(ids(&scan.unlisted), vec![0, 3, 5]);

        let listed: BTreeSet<u64> = ids(&scan.listed).into_iter().collect();
        let unlisted: BTreeSet<u64> = ids(&scan.unlisted).into_iter().collect();
        assert!(listed.is_disjoint(&unlisted));
        let union: BTreeSet<u64> = listed.union(&unlisted).copied().collect();
        assert_eq!(union, BTreeSet::from([0, 2, 3, 5]));
        assert!(scan.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_listed_item_carries_listing() {
        let chain = FakeChain::new(vec![ME, ME]).list(OTHER, 0, 1, false).list(ME, 1, 2_500_000_000_000_000_000, false);
        let scan = scan_owned(&chain, &FakeFetcher::default(), ME, &Gateways::default())
            .await
            .unwrap();
        let item = &scan.listed[0];
        assert!(item.is_listed);
        assert_eq!(item.listing_id, Some(1));
        assert_eq!(item.price.as_deref(), Some("2.5"));
        assert_eq!(item.name, "Token 1");
        assert!(!scan.unlisted[0].is_listed);
    }

    #[tokio::test]
    async fn test_per_token_failures_are_skipped() {
        let mut chain = FakeChain::new(vec![ME, ME, ME]);
        chain.broken.insert(0);
        let fetcher = FakeFetcher {
            missing: BTreeSet::from([format!("https://gateway.pinata.cloud/ipfs/{}/2.json", HASH)]),
        };
        let scan = scan_owned(&chain, &fetcher, ME, &Gateways::default())
            .await
            .unwrap();
        assert_eq!(ids(&scan.unlisted), vec![1]);
        assert_eq!(scan.skipped, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_listings_failure_fails_scan() {
        let mut chain = FakeChain::new(vec![ME]);
        chain.listings_down = true;
        let result = scan_owned(&chain, &FakeFetcher::default(), ME, &Gateways::default()).await;
        assert!(matches!(result, Err(MarketError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_duplicate_listings_first_wins() {
        let chain = FakeChain::new(vec![ME]).list(ME, 0, 10, false).list(ME, 0, 20, false);
        let scan = scan_owned(&chain, &FakeFetcher::default(), ME, &Gateways::default())
            .await
            .unwrap();
        assert_eq!(scan.listed[0].listing_id, Some(0));
        assert_eq!(scan.duplicate_listings, 1);
        assert_eq!(scan.len(), 1);
    }

    #[tokio::test]
    async fn test_marketplace_split() {
        let chain = FakeChain::new(vec![ME, OTHER, OTHER, ME])
            .list(ME, 0, 1_000_000_000_000_000_000, false)
            .list(OTHER, 1, 2_000_000_000_000_000_000, false)
            .list(OTHER, 2, 3, true)
            .list(ME, 3, 4, false);
        let fetcher = FakeFetcher {
            missing: BTreeSet::from([format!("https://gateway.pinata.cloud/ipfs/{}/3.json", HASH)]),
        };
        let view = load_marketplace(&chain, &fetcher, ME, &Gateways::default())
            .await
            .unwrap();

        let mine: HashMap<u64, &NftItem> = view.mine.iter().map(|i| (i.token_id, i)).collect();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[&0].name, "Token 0");
        assert_eq!(mine[&0].price.as_deref(), Some("1"));
        assert_eq!(mine[&3].name, "NFT #3");

        assert_eq!(ids(&view.others), vec![1]);
        assert_eq!(view.others[0].name, "NFT #1");
        assert_eq!(view.others[0].owner, OTHER);
        assert_eq!(view.others[0].listing_id, Some(1));
    }

    #[tokio::test]
    async fn test_own_listing_from_another_collection_is_a_placeholder() {
        let mut chain = FakeChain::new(vec![ME; 5]).list(ME, 1, 10, false);
        chain.listings.push(Listing {
            seller: ME,
            nftAddress: FOREIGN_NFT,
            tokenId: U256::from(4),
            price: U256::from(20),
            isSold: false,
        });
        let view = load_marketplace(&chain, &FakeFetcher::default(), ME, &Gateways::default())
            .await
            .unwrap();

        assert_eq!(*chain.uri_reads.lock(), vec![1]);
        assert_eq!(view.mine.len(), 2);
        assert_eq!(view.mine[0].name, "Token 1");
        assert_eq!(view.mine[1].name, "NFT #4");
        assert_eq!(view.mine[1].listing_id, Some(1));
    }
}
