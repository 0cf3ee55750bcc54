use std::{collections::BTreeMap, path::Path, str::FromStr};

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, bail, Context};
use nft_market_api::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

mod backend;

use backend::CliBackend;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = MarketConfig::from_env()?;
    let command = std::env::var("COMMAND").context("Missing COMMAND env var")?;
    match command.as_str() {
        "owned" => log_owned(&config).await,
        "marketplace" => log_marketplace(&config).await,
        "mint" => mint(&config).await,
        "list" => list(&config).await,
        "buy" => buy(&config).await,
        "fee" => log_fee(&config).await,
        "rarity" => log_rarity(),
        "resolve" => log_resolve(&config),
        "stats" => log_stats(&config).await,
        "purchases" => log_purchases(&config).await,
        "user" => log_user(&config).await,
        "wallet_nfts" => log_wallet_nfts(&config).await,
        "token" => log_token(&config).await,
        "contract_nfts" => log_contract_nfts(&config).await,
        "transfers" => log_transfers(&config).await,
        "chain" => log_chain(&config).await,
        other => bail!("Invalid command {:?}", other),
    }
}

fn env(name: &str) -> Result<String, anyhow::Error> {
    std::env::var(name).with_context(|| format!("Missing {} env var", name))
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_address(name: &'static str) -> Result<Address, anyhow::Error> {
    Ok(parse_address(name, &env(name)?)?)
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, anyhow::Error> {
    match env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid {}: {:?}", name, raw)),
        None => Ok(default),
    }
}

fn print_item(item: &NftItem) {
    match &item.price {
        Some(price) => println!(
            "  #{:<5} {:30} {} ETH (listing {})",
            item.token_id,
            item.name,
            price,
            item.listing_id.unwrap_or_default()
        ),
        None => println!("  #{:<5} {}", item.token_id, item.name),
    }
}

async fn log_owned(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let owner = env_address("OWNER")?;
    let contracts = MarketContracts::from_config(config);
    let scan = scan_owned(&contracts, &HttpMetadataFetcher::new(), owner, &config.gateways())
        .await
        .context("owned NFT scan failed")?;

    println!("Owned NFTs");
    println!("  owner: {}", owner);
    println!("  total: {}", scan.len());
    println!("Listed ({})", scan.listed.len());
    scan.listed.iter().for_each(print_item);
    println!("Unlisted ({})", scan.unlisted.len());
    scan.unlisted.iter().for_each(print_item);
    if !scan.skipped.is_empty() {
        println!("Skipped: {:?}", scan.skipped);
    }
    if scan.duplicate_listings > 0 {
        println!("Duplicate listings ignored: {}", scan.duplicate_listings);
    }
    Ok(())
}

async fn log_marketplace(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let me = env_opt("OWNER")
        .map(|raw| parse_address("OWNER", &raw))
        .transpose()?
        .unwrap_or(Address::ZERO);
    let contracts = MarketContracts::from_config(config);
    let view = load_marketplace(&contracts, &HttpMetadataFetcher::new(), me, &config.gateways())
        .await
        .context("marketplace load failed")?;

    println!("Marketplace");
    println!("  contract: {}", config.marketplace_address);
    println!("My listings ({})", view.mine.len());
    view.mine.iter().for_each(print_item);
    println!("Other listings ({})", view.others.len());
    for item in &view.others {
        print_item(item);
        println!("         seller: {}", item.owner);
    }
    Ok(())
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn mint(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let from = env_address("FROM")?;
    let path = env("IMAGE")?;
    let path = Path::new(&path);
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
    let image = ImageUpload {
        file_name: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string(),
        content_type: content_type(path).to_string(),
        bytes,
    };
    let form = MintForm {
        name: env_opt("NAME").unwrap_or_default(),
        description: env_opt("DESCRIPTION").unwrap_or_default(),
        price: env_opt("PRICE"),
    };

    let generator = RarityGenerator::standard();
    let rarity = match env_opt("SEED") {
        Some(seed) => generator.roll_seeded(seed.trim().parse().context("Invalid SEED")?),
        None => generator.roll(&mut StdRng::from_entropy()),
    };
    println!("Rolled {} (score {}, {:.2}%)", rarity.tier, rarity.score, rarity.percentage);

    let backend = CliBackend::from_config(config);
    let target = MintTarget {
        nft: config.nft_address,
        marketplace: config.marketplace_address,
        owner: from,
    };
    let outcome = run_mint(&backend, &target, &form, Some(&image), rarity, |step| {
        println!("  {}...", step)
    })
    .await?;

    println!("Minted");
    println!("  token_id: {}", outcome.token_id);
    println!("  token_uri: {}", outcome.token_uri);
    println!("  image: {}", outcome.image_uri);
    println!("  listed: {}", outcome.listed);
    Ok(())
}

async fn list(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let from = env_address("FROM")?;
    let token_id: u64 = env("TOKEN_ID")?.trim().parse().context("Invalid TOKEN_ID")?;
    let price = parse_price(&env("PRICE")?)?;
    let contracts = MarketContracts::from_config(config);
    let backend = CliBackend::from_config(config);

    let approve = contracts.approve_tx(from, U256::from(token_id));
    let hash = backend.send_transaction(approve).await?;
    backend.wait_for_receipt(hash).await.context("approval failed")?;
    println!("Approved: {}", hash);

    let list = contracts.list_tx(from, U256::from(token_id), price);
    let hash = backend.send_transaction(list).await?;
    backend.wait_for_receipt(hash).await.context("listing failed")?;
    println!("Listed token {} at {} ETH: {}", token_id, format_ether(price), hash);
    Ok(())
}

async fn buy(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let from = env_address("FROM")?;
    let listing_id: usize = env("LISTING_ID")?.trim().parse().context("Invalid LISTING_ID")?;
    let contracts = MarketContracts::from_config(config);
    let listings = contracts.listings().await?;
    let listing = listings
        .get(listing_id)
        .ok_or_else(|| anyhow!("No listing {}", listing_id))?;
    if !listing.is_active() {
        bail!("Listing {} is already sold", listing_id);
    }

    let backend = CliBackend::from_config(config);
    let tx = contracts.buy_tx(from, listing_id as u64, listing.price);
    let hash = backend.send_transaction(tx).await?;
    backend.wait_for_receipt(hash).await.context("purchase failed")?;
    println!(
        "Bought token {} for {} ETH: {}",
        listing.tokenId,
        format_ether(listing.price),
        hash
    );
    Ok(())
}

async fn log_fee(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let price = parse_price(&env("PRICE")?)?;
    let contracts = MarketContracts::from_config(config);
    let fee = contracts.calculate_fee(price).await?;
    println!("Fee");
    println!("  price: {} ETH", format_ether(price));
    println!("  fee: {} ETH", format_ether(fee));
    println!("  proceeds: {} ETH", format_ether(net_proceeds(price, fee)));
    Ok(())
}

fn log_rarity() -> Result<(), anyhow::Error> {
    let count: usize = env_parse("COUNT", 10_000)?;
    let mut rng = match env_opt("SEED") {
        Some(seed) => StdRng::seed_from_u64(seed.trim().parse().context("Invalid SEED")?),
        None => StdRng::from_entropy(),
    };
    let generator = RarityGenerator::standard();
    let mut counts: BTreeMap<RarityTier, usize> = BTreeMap::new();
    for _ in 0..count {
        *counts.entry(generator.roll(&mut rng).tier).or_default() += 1;
    }

    println!("==============================");
    println!(" Rarity distribution");
    println!(" Rolls: {}", count);
    println!("==============================\n");
    for spec in generator.tiers() {
        let seen = counts.get(&spec.tier).copied().unwrap_or_default();
        let ratio = seen as f64 / count.max(1) as f64 * 100.0;
        println!(
            "  {:10} {:7} ({:6.2}%, expected {:5.2}%)  {} x{:.1}",
            spec.tier.name(),
            seen,
            ratio,
            spec.percentage(),
            spec.color,
            spec.multiplier
        );
    }
    Ok(())
}

fn log_resolve(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let uri = env("URI")?;
    let gateways = config.gateways();
    println!("Resolve");
    println!("  cid: {}", extract_cid(&uri).unwrap_or("-"));
    println!("  url: {}", gateways.resolve(&uri)?);
    for (i, candidate) in gateways.candidates(&uri).iter().enumerate() {
        println!("  [{}] {}", i, candidate);
    }
    Ok(())
}

fn page() -> Result<Page, anyhow::Error> {
    Ok(Page::new(
        env_parse("FIRST", DEFAULT_PAGE_SIZE)?,
        env_parse("SKIP", 0)?,
    ))
}

async fn log_stats(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let subgraph = SubgraphClient::new(&config.subgraph_url);
    let Some(stats) = subgraph.marketplace_stats().await? else {
        println!("No marketplace stats indexed yet");
        return Ok(());
    };
    println!("Marketplace stats");
    println!("  total_listings: {}", stats.total_listings);
    println!("  active_listings: {}", stats.active_listings.as_deref().unwrap_or("-"));
    println!("  total_sales: {}", stats.total_sales);
    println!("  total_volume: {} ETH", format_wei_str(&stats.total_volume));

    let listings = subgraph.active_listings(page()?).await?;
    println!("Active listings ({})", listings.len());
    for listing in listings {
        println!(
            "  #{:<5} token {:<6} {} ETH  seller {}",
            listing.listing_id,
            listing.token_id,
            format_wei_str(&listing.price),
            listing.seller
        );
    }
    Ok(())
}

async fn log_purchases(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let subgraph = SubgraphClient::new(&config.subgraph_url);
    let buyer = env_opt("OWNER");
    let purchases = subgraph.purchase_history(buyer.as_deref(), page()?).await?;
    println!("Purchases ({})", purchases.len());
    for purchase in purchases {
        println!(
            "  token {:<6} {} ETH  {} -> {}  at {}",
            purchase.token_id,
            format_wei_str(&purchase.price),
            purchase.seller,
            purchase.buyer,
            purchase.timestamp
        );
    }
    Ok(())
}

async fn log_user(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let owner = env_address("OWNER")?;
    let subgraph = SubgraphClient::new(&config.subgraph_url);
    let Some(user) = subgraph.user_stats(&owner.to_string()).await? else {
        println!("No activity for {}", owner);
        return Ok(());
    };
    println!("User");
    println!("  address: {}", user.id);
    println!("  total_listings: {}", user.total_listings);
    println!("  total_purchases: {}", user.total_purchases);
    println!("  total_sales: {}", user.total_sales);
    println!("  volume_bought: {} ETH", format_wei_str(&user.volume_bought));
    println!("  volume_sold: {} ETH", format_wei_str(&user.volume_sold));
    Ok(())
}

fn print_indexed(nft: &IndexedNft) {
    let name = nft
        .parsed_metadata()
        .map(|m| m.name)
        .filter(|n| !n.is_empty())
        .or_else(|| nft.name.clone())
        .unwrap_or_else(|| "-".to_string());
    println!("  {} #{:<6} {}", nft.token_address, nft.token_id, name);
}

fn print_cursor<T>(page: &CursorPage<T>) {
    if let Some(cursor) = page.cursor.as_deref().filter(|_| page.has_more()) {
        println!("Next CURSOR={}", cursor);
    }
}

async fn log_wallet_nfts(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let owner = env_address("OWNER")?;
    let client = IndexedNftClient::from_config(config)?;
    let cursor = env_opt("CURSOR");
    let page = client
        .wallet_nfts(&owner.to_string(), &config.chain_hex(), cursor.as_deref())
        .await?;
    println!("Wallet NFTs ({})", page.result.len());
    page.result.iter().for_each(print_indexed);
    print_cursor(&page);
    Ok(())
}

async fn log_token(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let token_id = env("TOKEN_ID")?;
    let client = IndexedNftClient::from_config(config)?;
    let nft = client
        .token_metadata(&config.nft_address.to_string(), &token_id, &config.chain_hex())
        .await?;
    println!("Token");
    println!("  contract: {}", nft.token_address);
    println!("  token_id: {}", nft.token_id);
    println!("  owner: {}", nft.owner_of.as_deref().unwrap_or("-"));
    println!("  token_uri: {}", nft.token_uri.as_deref().unwrap_or("-"));
    if let Some(metadata) = nft.parsed_metadata() {
        println!("  name: {}", metadata.name);
        for attribute in &metadata.attributes {
            println!("    {}: {}", attribute.trait_type, attribute.display_value());
        }
    }
    Ok(())
}

async fn log_contract_nfts(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let client = IndexedNftClient::from_config(config)?;
    let cursor = env_opt("CURSOR");
    let page = client
        .contract_nfts(&config.nft_address.to_string(), &config.chain_hex(), cursor.as_deref())
        .await?;
    println!(
        "Collection NFTs ({} of {})",
        page.result.len(),
        page.total.map(|t| t.to_string()).unwrap_or_else(|| "?".to_string())
    );
    page.result.iter().for_each(print_indexed);
    print_cursor(&page);
    Ok(())
}

async fn log_transfers(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let token_id = env("TOKEN_ID")?;
    let client = IndexedNftClient::from_config(config)?;
    let cursor = env_opt("CURSOR");
    let page = client
        .transfers(
            &config.nft_address.to_string(),
            &token_id,
            &config.chain_hex(),
            cursor.as_deref(),
        )
        .await?;
    println!("Transfers of #{} ({})", token_id, page.result.len());
    for transfer in &page.result {
        println!(
            "  {} -> {}  {}  {}",
            transfer.from_address.as_deref().unwrap_or("-"),
            transfer.to_address,
            transfer.block_timestamp.as_deref().unwrap_or("-"),
            transfer.transaction_hash
        );
    }
    print_cursor(&page);
    Ok(())
}

async fn log_chain(config: &MarketConfig) -> Result<(), anyhow::Error> {
    let rpc = EvmRpc::new(&config.rpc_url);
    let chain_id = rpc.chain_id().await?;
    let block = rpc.block_number().await?;
    println!("Chain");
    println!("  rpc: {}", rpc.url());
    println!("  chain_id: {}", chain_id);
    println!("  block: {}", block);
    println!("  collection: {}", config.nft_address);
    println!("  marketplace: {}", config.marketplace_address);
    if chain_id != config.chain_id {
        tracing::warn!("RPC serves chain {} but CHAIN_ID is {}", chain_id, config.chain_id);
    }
    Ok(())
}
