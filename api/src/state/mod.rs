mod item;
mod listing;
mod metadata;

pub use item::*;
pub use listing::*;
pub use metadata::*;
