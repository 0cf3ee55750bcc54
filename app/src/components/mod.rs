mod ipfs_image;
mod layout;
mod nft_card;
mod soft_notice;
mod wallet_button;

pub use ipfs_image::IpfsImage;
pub use layout::Layout;
pub use nft_card::NftCard;
pub use soft_notice::{SoftNotice, Spinner};
pub use wallet_button::WalletButton;
pub use wallet_button::send_transaction;
