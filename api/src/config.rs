use std::str::FromStr;

use alloy_primitives::Address;

use crate::consts::*;
use crate::error::MarketError;
use crate::ipfs::Gateways;

/// Addresses, endpoints and keys shared by every service call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketConfig {
    pub nft_address: Address,
    pub marketplace_address: Address,
    pub chain_id: u64,
    pub rpc_url: String,
    pub pinata_jwt: Option<String>,
    pub pinata_api_url: String,
    pub pinata_gateway: String,
    pub subgraph_url: String,
    pub moralis_api_key: Option<String>,
    pub moralis_api_url: String,
}

impl MarketConfig {
    pub fn from_env() -> Result<Self, MarketError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads every variable through `lookup`; unset values fall back to logged defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MarketError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or_default = |name: &'static str, default: &str| {
            get(name).unwrap_or_else(|| {
                tracing::warn!("{} not set, using {}", name, default);
                default.to_string()
            })
        };

        let nft_address = parse_address(
            "NFT_CONTRACT_ADDRESS",
            &or_default("NFT_CONTRACT_ADDRESS", PLACEHOLDER_NFT_ADDRESS),
        )?;
        let marketplace_address = parse_address(
            "MARKETPLACE_CONTRACT_ADDRESS",
            &or_default("MARKETPLACE_CONTRACT_ADDRESS", PLACEHOLDER_MARKETPLACE_ADDRESS),
        )?;
        let chain_id = match get("CHAIN_ID") {
            Some(raw) => raw.parse().map_err(|_| MarketError::InvalidConfig {
                name: "CHAIN_ID",
                reason: format!("{raw:?} is not a number"),
            })?,
            None => DEFAULT_CHAIN_ID,
        };

        Ok(Self {
            nft_address,
            marketplace_address,
            chain_id,
            rpc_url: or_default("RPC_URL", DEFAULT_RPC_URL),
            pinata_jwt: get("PINATA_JWT"),
            pinata_api_url: or_default("PINATA_API_URL", DEFAULT_PINATA_API_URL),
            pinata_gateway: or_default("PINATA_GATEWAY", DEFAULT_PINATA_GATEWAY),
            subgraph_url: or_default("SUBGRAPH_URL", DEFAULT_SUBGRAPH_URL),
            moralis_api_key: get("MORALIS_API_KEY"),
            moralis_api_url: or_default("MORALIS_API_URL", DEFAULT_MORALIS_API_URL),
        })
    }

    pub fn gateways(&self) -> Gateways {
        Gateways::new(&self.pinata_gateway)
    }

    /// Chain identifier in the `0x…` form the indexed-data API expects.
    pub fn chain_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

/// Wallet connection settings; the project id has no usable default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    pub walletconnect_project_id: String,
    pub app_name: String,
}

impl WalletConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MarketError> {
        let walletconnect_project_id = lookup("WALLETCONNECT_PROJECT_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(MarketError::MissingConfig("WALLETCONNECT_PROJECT_ID"))?;
        Ok(Self {
            walletconnect_project_id,
            app_name: lookup("APP_NAME").unwrap_or_else(|| "NFT Market".to_string()),
        })
    }
}

pub fn parse_address(name: &'static str, raw: &str) -> Result<Address, MarketError> {
    Address::from_str(raw.trim()).map_err(|e| MarketError::InvalidConfig {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = MarketConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.nft_address,
            Address::from_str(PLACEHOLDER_NFT_ADDRESS).unwrap()
        );
        assert_eq!(config.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(config.chain_hex(), "0xaa36a7");
        assert_eq!(config.pinata_jwt, None);
        assert_eq!(config.moralis_api_url, DEFAULT_MORALIS_API_URL);
    }

    #[test]
    fn test_reads_values() {
        let config = MarketConfig::from_lookup(lookup(&[
            ("NFT_CONTRACT_ADDRESS", "0x0000000000000000000000000000000000000001"),
            ("CHAIN_ID", "31337"),
            ("PINATA_JWT", "  jwt  "),
            ("MORALIS_API_KEY", ""),
        ]))
        .unwrap();
        assert_eq!(config.nft_address, Address::with_last_byte(1));
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.pinata_jwt.as_deref(), Some("jwt"));
        assert_eq!(config.moralis_api_key, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            MarketConfig::from_lookup(lookup(&[("CHAIN_ID", "sepolia")])),
            Err(MarketError::InvalidConfig { name: "CHAIN_ID", .. })
        ));
        assert!(matches!(
            MarketConfig::from_lookup(lookup(&[("MARKETPLACE_CONTRACT_ADDRESS", "0x12")])),
            Err(MarketError::InvalidConfig { name: "MARKETPLACE_CONTRACT_ADDRESS", .. })
        ));
    }

    #[test]
    fn test_wallet_project_id_required() {
        assert!(matches!(
            WalletConfig::from_lookup(lookup(&[])),
            Err(MarketError::MissingConfig("WALLETCONNECT_PROJECT_ID"))
        ));
        let wallet = WalletConfig::from_lookup(lookup(&[("WALLETCONNECT_PROJECT_ID", "abc")])).unwrap();
        assert_eq!(wallet.walletconnect_project_id, "abc");
    }
}
