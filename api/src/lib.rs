pub mod client;
pub mod config;
pub mod consts;
pub mod contracts;
pub mod error;
pub mod ipfs;
pub mod lazy;
pub mod mint;
pub mod rarity;
pub mod reconcile;
pub mod sequence;
pub mod state;
pub mod units;

pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::consts::*;
    pub use crate::contracts::*;
    pub use crate::error::*;
    pub use crate::ipfs::*;
    pub use crate::lazy::*;
    pub use crate::mint::*;
    pub use crate::rarity::*;
    pub use crate::reconcile::*;
    pub use crate::sequence::*;
    pub use crate::state::*;
    pub use crate::units::*;
}
