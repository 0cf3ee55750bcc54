/// Wei per whole ether-denominated unit.
pub const WEI_DECIMALS: usize = 18;

/// Default chain (Sepolia).
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;

/// Default public JSON-RPC endpoint for the default chain.
pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Placeholder collection address used when none is configured.
pub const PLACEHOLDER_NFT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Placeholder marketplace address used when none is configured.
pub const PLACEHOLDER_MARKETPLACE_ADDRESS: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

/// Pinning service API.
pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";

/// Pinning service gateway, preferred for resolution.
pub const DEFAULT_PINATA_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs/";

/// Public gateways tried after the primary one, in order.
pub const PUBLIC_GATEWAYS: &[&str] = &[
    "https://ipfs.io/ipfs/",
    "https://cloudflare-ipfs.com/ipfs/",
    "https://dweb.link/ipfs/",
    "https://nftstorage.link/ipfs/",
];

/// Subgraph endpoint used when none is configured.
pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.studio.thegraph.com/query/00000/nft-marketplace/version/latest";

/// Indexed-NFT-data API.
pub const DEFAULT_MORALIS_API_URL: &str = "https://deep-index.moralis.io/api/v2.2";

/// Refresh interval of polling dashboards, in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 30_000;

/// Quiet period before the fee quote is recomputed, in milliseconds.
pub const FEE_DEBOUNCE_MS: u32 = 400;

/// Delay between receipt polls, in milliseconds.
pub const RECEIPT_POLL_MS: u64 = 2_000;

/// Receipt polls before giving up.
pub const RECEIPT_POLL_ATTEMPTS: u32 = 90;

/// Default page size for subgraph and indexed-data queries.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Description attached to marketplace items whose metadata is not fetched.
pub const PLACEHOLDER_DESCRIPTION: &str = "Listed on the marketplace";

/// Source of the fallback image shown when every gateway failed.
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="400" viewBox="0 0 400 400"><rect width="400" height="400" fill="#1f2937"/><path d="M120 280l60-80 45 55 35-40 60 65z" fill="#4b5563"/><circle cx="260" cy="140" r="28" fill="#6b7280"/><text x="200" y="350" font-family="sans-serif" font-size="20" fill="#9ca3af" text-anchor="middle">Image unavailable</text></svg>"##;
