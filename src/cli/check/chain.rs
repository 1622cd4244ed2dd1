use std::path::Path;

use crate::adapter::EvmChain;
use crate::config::Config;
use crate::domain::format_amount;
use crate::error::Result;
use crate::port::ChainClient;

/// Connect to the configured node and report what the keeper would use.
pub async fn execute_chain<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    let targets = config.targets()?;
    let chain = EvmChain::connect(&targets, config.private_key()?)?;

    println!("Testing chain connection...");
    println!("  RPC URL: {}", targets.rpc_url);
    println!();

    print!("Fetching chain ID... ");
    let chain_id = chain.chain_id().await?;
    println!("✓ {chain_id}");
    if let Some(expected) = config.chain.chain_id {
        if expected != chain_id {
            println!("⚠ Configured chain ID {expected} does not match the node");
        }
    }

    print!("Fetching head block... ");
    let head = chain.block_number().await?;
    println!("✓ {head}");

    print!("Fetching keeper balance... ");
    let balance = chain.keeper_balance().await?;
    println!("✓ {} ETH", format_amount(balance, 18));

    println!();
    println!("  Keeper: {}", chain.keeper_address());
    println!("  Order ledger: {}", chain.order_ledger());
    println!("  Price venue: {}", chain.price_venue());
    println!();
    println!("Chain connection OK.");

    Ok(())
}
