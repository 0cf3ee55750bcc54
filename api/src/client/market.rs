use alloy_primitives::{Address, U256};

use crate::config::MarketConfig;
use crate::contracts::{IMarketplace, INftCollection, Listing, TxRequest};
use crate::error::MarketError;
use crate::reconcile::ChainReader;

use super::EvmRpc;

fn to_u64(value: U256) -> Result<u64, MarketError> {
    u64::try_from(value).map_err(|_| MarketError::OutOfRange(value.to_string()))
}

/// The collection and marketplace contracts behind one RPC endpoint.
#[derive(Clone, Debug)]
pub struct MarketContracts {
    rpc: EvmRpc,
    pub nft: Address,
    pub marketplace: Address,
}

impl MarketContracts {
    pub fn new(rpc: EvmRpc, nft: Address, marketplace: Address) -> Self {
        Self {
            rpc,
            nft,
            marketplace,
        }
    }

    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(
            EvmRpc::new(&config.rpc_url),
            config.nft_address,
            config.marketplace_address,
        )
    }

    pub fn rpc(&self) -> &EvmRpc {
        &self.rpc
    }

    /// Marketplace fee for a prospective list price, in wei.
    pub async fn calculate_fee(&self, price: U256) -> Result<U256, MarketError> {
        let fee = self
            .rpc
            .call(self.marketplace, &IMarketplace::calculateFeeCall { price })
            .await?;
        Ok(fee._0)
    }

    pub fn mint_tx(&self, from: Address, token_uri: String) -> TxRequest {
        TxRequest::mint(from, self.nft, from, token_uri)
    }

    pub fn approve_tx(&self, from: Address, token_id: U256) -> TxRequest {
        TxRequest::approve(from, self.nft, self.marketplace, token_id)
    }

    pub fn list_tx(&self, from: Address, token_id: U256, price: U256) -> TxRequest {
        TxRequest::list(from, self.marketplace, self.nft, token_id, price)
    }

    pub fn buy_tx(&self, from: Address, listing_id: u64, price: U256) -> TxRequest {
        TxRequest::buy(from, self.marketplace, U256::from(listing_id), price)
    }
}

impl ChainReader for MarketContracts {
    fn nft_address(&self) -> Address {
        self.nft
    }

    async fn token_counter(&self) -> Result<u64, MarketError> {
        let counter = self
            .rpc
            .call(self.nft, &INftCollection::tokenCounterCall {})
            .await?;
        to_u64(counter._0)
    }

    async fn owner_of(&self, token_id: u64) -> Result<Address, MarketError> {
        let owner = self
            .rpc
            .call(
                self.nft,
                &INftCollection::ownerOfCall {
                    tokenId: U256::from(token_id),
                },
            )
            .await?;
        Ok(owner._0)
    }

    async fn token_uri(&self, token_id: u64) -> Result<String, MarketError> {
        let uri = self
            .rpc
            .call(
                self.nft,
                &INftCollection::tokenURICall {
                    tokenId: U256::from(token_id),
                },
            )
            .await?;
        Ok(uri._0)
    }

    async fn listings(&self) -> Result<Vec<Listing>, MarketError> {
        let listings = self
            .rpc
            .call(self.marketplace, &IMarketplace::getListingsCall {})
            .await?;
        Ok(listings._0)
    }
}
