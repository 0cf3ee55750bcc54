mod indexed;
mod market;
mod metadata;
mod pinning;
mod rpc;
mod subgraph;

pub use indexed::*;
pub use market::*;
pub use metadata::*;
pub use pinning::*;
pub use rpc::*;
pub use subgraph::*;
