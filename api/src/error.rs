use thiserror::Error;

use crate::mint::MintStep;

/// Input problems caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("an image is required")]
    MissingImage,

    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),
}

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("wallet not connected")]
    NotConnected,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} answered with status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("abi decoding failed: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graphql error: {0}")]
    GraphQl(String),

    #[error("{0} is temporarily unavailable")]
    ServiceUnavailable(&'static str),

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid configuration {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("mint failed while {step}: {source}")]
    MintStep {
        step: MintStep,
        #[source]
        source: Box<MarketError>,
    },

    #[error("rarity weights sum to {0} basis points, expected 10000")]
    InvalidRarityTable(u32),

    #[error("not an ipfs reference: {0:?}")]
    InvalidIpfsReference(String),

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("no receipt for transaction {0}")]
    ReceiptTimeout(String),

    #[error("receipt carried no {0} event")]
    MissingEvent(&'static str),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("wallet error: {0}")]
    Wallet(String),
}

impl MarketError {
    /// Upstream outages, shown as a soft notice with a retry action rather than an error.
    pub fn is_soft(&self) -> bool {
        match self {
            MarketError::ServiceUnavailable(_) => true,
            MarketError::Status { status, .. } => matches!(status, 502..=504),
            MarketError::MintStep { source, .. } => source.is_soft(),
            _ => false,
        }
    }

    pub(crate) fn at_step(self, step: MintStep) -> Self {
        MarketError::MintStep {
            step,
            source: Box::new(self),
        }
    }
}
