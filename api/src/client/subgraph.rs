//! Read-only queries against the marketplace subgraph.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PAGE_SIZE;
use crate::error::MarketError;

pub const ACTIVE_LISTINGS_QUERY: &str = r#"
query ActiveListings($first: Int!, $skip: Int!) {
  listings(first: $first, skip: $skip, where: { isSold: false }, orderBy: createdAt, orderDirection: desc) {
    id
    listingId
    seller
    nftAddress
    tokenId
    price
    isSold
    createdAt
  }
}
"#;

pub const PURCHASE_HISTORY_QUERY: &str = r#"
query PurchaseHistory($first: Int!, $skip: Int!) {
  purchases(first: $first, skip: $skip, orderBy: timestamp, orderDirection: desc) {
    id
    listingId
    buyer
    seller
    nftAddress
    tokenId
    price
    timestamp
    transactionHash
  }
}
"#;

pub const BUYER_PURCHASES_QUERY: &str = r#"
query BuyerPurchases($buyer: Bytes!, $first: Int!, $skip: Int!) {
  purchases(first: $first, skip: $skip, where: { buyer: $buyer }, orderBy: timestamp, orderDirection: desc) {
    id
    listingId
    buyer
    seller
    nftAddress
    tokenId
    price
    timestamp
    transactionHash
  }
}
"#;

pub const MARKETPLACE_STATS_QUERY: &str = r#"
query MarketplaceStats {
  marketplaceStats(first: 1) {
    id
    totalListings
    totalSales
    totalVolume
    activeListings
  }
}
"#;

pub const USER_STATS_QUERY: &str = r#"
query UserStats($id: ID!) {
  user(id: $id) {
    id
    totalListings
    totalPurchases
    totalSales
    volumeBought
    volumeSold
  }
}
"#;

/// `first`/`skip` pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    pub first: u32,
    pub skip: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            first: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

impl Page {
    pub fn new(first: u32, skip: u32) -> Self {
        Self { first, skip }
    }

    pub fn next(self) -> Self {
        Self {
            first: self.first,
            skip: self.skip + self.first,
        }
    }

    pub fn previous(self) -> Self {
        Self {
            first: self.first,
            skip: self.skip.saturating_sub(self.first),
        }
    }
}

// BigInt and Bytes scalars arrive as strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntity {
    pub id: String,
    pub listing_id: String,
    pub seller: String,
    pub nft_address: String,
    pub token_id: String,
    pub price: String,
    pub is_sold: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEntity {
    pub id: String,
    pub listing_id: String,
    pub buyer: String,
    pub seller: String,
    pub nft_address: String,
    pub token_id: String,
    pub price: String,
    pub timestamp: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceStatEntity {
    pub id: String,
    pub total_listings: String,
    pub total_sales: String,
    pub total_volume: String,
    #[serde(default)]
    pub active_listings: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: String,
    pub total_listings: String,
    pub total_purchases: String,
    pub total_sales: String,
    pub volume_bought: String,
    pub volume_sold: String,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize, Debug)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ListingsData {
    listings: Vec<ListingEntity>,
}

#[derive(Deserialize)]
struct PurchasesData {
    purchases: Vec<PurchaseEntity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsData {
    marketplace_stats: Vec<MarketplaceStatEntity>,
}

#[derive(Deserialize)]
struct UserData {
    user: Option<UserEntity>,
}

#[derive(Clone, Debug)]
pub struct SubgraphClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SubgraphClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, MarketError> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if matches!(status.as_u16(), 502..=504) {
            return Err(MarketError::ServiceUnavailable("subgraph"));
        }
        if !status.is_success() {
            return Err(MarketError::Status {
                service: "subgraph",
                status: status.as_u16(),
            });
        }

        let payload: GraphQlResponse<T> = response.json().await?;
        decode_graphql(payload)
    }

    pub async fn active_listings(&self, page: Page) -> Result<Vec<ListingEntity>, MarketError> {
        let data: ListingsData = self
            .query(ACTIVE_LISTINGS_QUERY, serde_json::to_value(page)?)
            .await?;
        Ok(data.listings)
    }

    pub async fn purchase_history(
        &self,
        buyer: Option<&str>,
        page: Page,
    ) -> Result<Vec<PurchaseEntity>, MarketError> {
        let data: PurchasesData = match buyer {
            Some(buyer) => {
                let variables = serde_json::json!({
                    "buyer": buyer.to_lowercase(),
                    "first": page.first,
                    "skip": page.skip,
                });
                self.query(BUYER_PURCHASES_QUERY, variables).await?
            }
            None => {
                self.query(PURCHASE_HISTORY_QUERY, serde_json::to_value(page)?)
                    .await?
            }
        };
        Ok(data.purchases)
    }

    pub async fn marketplace_stats(&self) -> Result<Option<MarketplaceStatEntity>, MarketError> {
        let data: StatsData = self
            .query(MARKETPLACE_STATS_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.marketplace_stats.into_iter().next())
    }

    /// Entity ids are lowercase hex addresses.
    pub async fn user_stats(&self, address: &str) -> Result<Option<UserEntity>, MarketError> {
        let data: UserData = self
            .query(USER_STATS_QUERY, serde_json::json!({ "id": address.to_lowercase() }))
            .await?;
        Ok(data.user)
    }
}

fn decode_graphql<T>(payload: GraphQlResponse<T>) -> Result<T, MarketError> {
    if !payload.errors.is_empty() {
        let messages: Vec<String> = payload.errors.into_iter().map(|e| e.message).collect();
        return Err(MarketError::GraphQl(messages.join("; ")));
    }
    payload
        .data
        .ok_or_else(|| MarketError::GraphQl("response carried no data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_walk() {
        let page = Page::new(10, 0).next().next();
        assert_eq!(page, Page::new(10, 20));
        assert_eq!(page.previous(), Page::new(10, 10));
        assert_eq!(Page::new(10, 5).previous(), Page::new(10, 0));
    }

    #[test]
    fn test_decode_listings() {
        let json = r#"{"data":{"listings":[{
            "id":"0x01","listingId":"1","seller":"0xabc","nftAddress":"0xdef",
            "tokenId":"3","price":"1000000000000000000","isSold":false,"createdAt":"1700000000"
        }]}}"#;
        let payload: GraphQlResponse<ListingsData> = serde_json::from_str(json).unwrap();
        let data = decode_graphql(payload).unwrap();
        assert_eq!(data.listings.len(), 1);
        assert_eq!(data.listings[0].token_id, "3");
        assert!(!data.listings[0].is_sold);
    }

    #[test]
    fn test_decode_errors() {
        let json = r#"{"data":null,"errors":[{"message":"indexing error"},{"message":"bad"}]}"#;
        let payload: GraphQlResponse<ListingsData> = serde_json::from_str(json).unwrap();
        match decode_graphql(payload) {
            Err(MarketError::GraphQl(msg)) => assert_eq!(msg, "indexing error; bad"),
            other => panic!("unexpected {:?}", other.map(|d| d.listings.len())),
        }
    }

    #[test]
    fn test_decode_stats() {
        let json = r#"{"data":{"marketplaceStats":[{"id":"global","totalListings":"12","totalSales":"4","totalVolume":"9000"}]}}"#;
        let payload: GraphQlResponse<StatsData> = serde_json::from_str(json).unwrap();
        let stats = decode_graphql(payload).unwrap().marketplace_stats;
        assert_eq!(stats[0].total_sales, "4");
        assert_eq!(stats[0].active_listings, None);
    }
}
