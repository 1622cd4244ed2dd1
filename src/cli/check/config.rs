use std::path::Path;

use crate::config::{Config, ENV_PRIVATE_KEY};
use crate::error::Result;

/// Validate configuration without starting the keeper or requiring a signer.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    if !path.exists() {
        println!("  (file not found, using defaults and environment only)");
    }
    println!();

    let config = Config::load(path)?;
    let targets = config.targets()?;

    println!("✓ Configuration is valid");
    println!();
    println!("Summary:");
    println!("  RPC URL: {}", targets.rpc_url);
    println!("  Order ledger: {}", targets.order_ledger);
    println!("  Price venue: {}", targets.price_venue);
    match config.chain.chain_id {
        Some(id) => println!("  Chain ID: {id}"),
        None => println!("  Chain ID: (not checked)"),
    }
    println!("  Poll interval: {}ms", config.keeper.poll_interval_ms);
    println!("  Gas limit: {}", config.keeper.gas_limit);
    println!("  Min-out margin: {} bps", config.keeper.min_out_extra_bps);
    println!("  RPC timeout: {}ms", config.keeper.rpc_timeout_ms);
    match &config.keeper.cursor_file {
        Some(file) => println!("  Cursor file: {}", file.display()),
        None => println!("  Cursor file: (not persisted)"),
    }
    println!("  Dry-run: {}", config.keeper.dry_run);
    println!();

    if config.wallet.private_key.is_some() {
        println!("✓ Keeper private key found (from {ENV_PRIVATE_KEY} env var)");
    } else {
        println!("⚠ No keeper private key configured");
        println!("  Set {ENV_PRIVATE_KEY} before running the keeper");
    }

    println!();
    println!("Configuration is ready to use.");
    Ok(())
}
