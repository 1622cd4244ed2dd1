//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use crate::adapter::{EvmChain, JsonCursorStore};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::keeper::{Keeper, KeeperPorts, StartPosition};
use crate::port::CursorStore;

/// Apply `run` flags on top of the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if args.dry_run {
        config.keeper.dry_run = true;
    }
    if let Some(ref path) = args.cursor_file {
        config.keeper.cursor_file = Some(path.clone());
    }
}

/// Execute the run command.
///
/// Returns only on a startup failure or after a shutdown signal.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args);

    config.init_logging();

    let targets = config.targets()?;
    let chain = Arc::new(EvmChain::connect(&targets, config.private_key()?)?);

    if let Some(expected) = config.chain.chain_id {
        let actual = chain.chain_id().await?;
        if actual != expected {
            return Err(ConfigError::InvalidValue {
                field: "chain_id",
                reason: format!("configured {expected}, node reports {actual}"),
            }
            .into());
        }
    }

    let settings = config.keeper_settings();
    let cursor_store = config
        .keeper
        .cursor_file
        .as_ref()
        .map(|path| Arc::new(JsonCursorStore::new(path)) as Arc<dyn CursorStore>);
    let start = args
        .from_block
        .map_or(StartPosition::Resume, StartPosition::FromBlock);

    info!(
        keeper = %chain.keeper_address(),
        order_ledger = %targets.order_ledger,
        price_venue = %targets.price_venue,
        dry_run = settings.dry_run,
        gas_limit = settings.gas_limit,
        min_out_extra_bps = settings.min_out_extra_bps,
        "slicekeeper starting"
    );
    if settings.dry_run {
        info!("Dry-run mode enabled - slices will not be submitted");
    }

    let keeper = Keeper::start(
        KeeperPorts::from_chain(chain),
        &settings,
        start,
        cursor_store,
    )
    .await?;

    tokio::select! {
        () = keeper.run() => {}
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("slicekeeper stopped");
    Ok(())
}
