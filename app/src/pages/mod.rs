mod dashboard;
mod explorer;
mod home;
mod marketplace;
mod mint;
mod my_nfts;

pub use dashboard::Dashboard;
pub use explorer::Explorer;
pub use home::Home;
pub use marketplace::Marketplace;
pub use mint::Mint;
pub use my_nfts::MyNfts;
