//! Keeper configuration loading and validation.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables. The signer key is only ever read from
//! `KEEPER_PRIVATE_KEY`, never from the file.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::domain::MAX_EFFECTIVE_SLIPPAGE_BPS;
use crate::error::{ConfigError, Result};
use crate::keeper::KeeperSettings;

pub const ENV_RPC_URL: &str = "KEEPER_RPC_URL";
pub const ENV_PRIVATE_KEY: &str = "KEEPER_PRIVATE_KEY";
pub const ENV_ORDER_LEDGER: &str = "VWAP_ENGINE_ADDRESS";
pub const ENV_PRICE_VENUE: &str = "SIMPLE_AMM_ADDRESS";
pub const ENV_POLL_INTERVAL_MS: &str = "KEEPER_POLL_INTERVAL_MS";
pub const ENV_GAS_LIMIT: &str = "KEEPER_TX_GAS_LIMIT";
pub const ENV_MIN_OUT_EXTRA_BPS: &str = "MIN_OUT_EXTRA_BPS";
pub const ENV_RPC_TIMEOUT_MS: &str = "KEEPER_RPC_TIMEOUT_MS";
pub const ENV_CURSOR_FILE: &str = "KEEPER_CURSOR_FILE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub keeper: KeeperConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub wallet: WalletConfig,
}

/// Chain endpoint and contract addresses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint.
    #[serde(default)]
    pub rpc_url: String,
    /// Order ledger (VWAP engine) contract address.
    #[serde(default)]
    pub order_ledger: Option<String>,
    /// Price venue (AMM) contract address.
    #[serde(default)]
    pub price_venue: Option<String>,
    /// Expected chain ID. When set, `check chain` compares it with the node.
    #[serde(default)]
    pub chain_id: Option<u64>,
}

/// Scheduling and execution parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct KeeperConfig {
    /// Sleep between passes.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Gas-limit ceiling for `executeSlice`.
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Safety margin added to each order's slippage ceiling.
    #[serde(default = "default_min_out_extra_bps")]
    pub min_out_extra_bps: u32,
    /// Bound on any single read call.
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// Bound on submitting a slice and waiting for its confirmation.
    #[serde(default = "default_confirmation_timeout_ms")]
    pub confirmation_timeout_ms: u64,
    /// Largest block range fetched in one pass. Unbounded when unset.
    #[serde(default)]
    pub max_scan_blocks: Option<u64>,
    /// Where to persist the scan cursor. Not persisted when unset.
    #[serde(default)]
    pub cursor_file: Option<PathBuf>,
    /// Compute and log decisions without submitting transactions.
    #[serde(default)]
    pub dry_run: bool,
}

const fn default_poll_interval_ms() -> u64 {
    7_000
}

const fn default_gas_limit() -> u64 {
    700_000
}

const fn default_min_out_extra_bps() -> u32 {
    20
}

const fn default_rpc_timeout_ms() -> u64 {
    30_000
}

const fn default_confirmation_timeout_ms() -> u64 {
    120_000
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            gas_limit: default_gas_limit(),
            min_out_extra_bps: default_min_out_extra_bps(),
            rpc_timeout_ms: default_rpc_timeout_ms(),
            confirmation_timeout_ms: default_confirmation_timeout_ms(),
            max_scan_blocks: None,
            cursor_file: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Signer credentials.
/// Private key is loaded from `KEEPER_PRIVATE_KEY` env var at runtime (never from config file).
#[derive(Clone, Default)]
pub struct WalletConfig {
    pub private_key: Option<String>,
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validated chain endpoint and contract addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTargets {
    pub rpc_url: Url,
    pub order_ledger: Address,
    pub price_venue: Address,
}

impl Config {
    /// Load from `path` (if it exists) and the process environment.
    ///
    /// A missing file is not an error; everything can come from the
    /// environment. A file that exists but does not parse is.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(ConfigError::ReadFile(e).into()),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document without consulting the environment.
    #[allow(clippy::result_large_err)]
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` is injected so tests need not touch the process environment.
    /// Empty values are treated as unset.
    #[allow(clippy::result_large_err)]
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_RPC_URL) {
            self.chain.rpc_url = url;
        }
        if let Some(address) = get(ENV_ORDER_LEDGER) {
            self.chain.order_ledger = Some(address);
        }
        if let Some(address) = get(ENV_PRICE_VENUE) {
            self.chain.price_venue = Some(address);
        }
        if let Some(value) = get(ENV_POLL_INTERVAL_MS) {
            self.keeper.poll_interval_ms = parse_env("poll_interval_ms", &value)?;
        }
        if let Some(value) = get(ENV_GAS_LIMIT) {
            self.keeper.gas_limit = parse_env("gas_limit", &value)?;
        }
        if let Some(value) = get(ENV_MIN_OUT_EXTRA_BPS) {
            self.keeper.min_out_extra_bps = parse_env("min_out_extra_bps", &value)?;
        }
        if let Some(value) = get(ENV_RPC_TIMEOUT_MS) {
            self.keeper.rpc_timeout_ms = parse_env("rpc_timeout_ms", &value)?;
        }
        if let Some(path) = get(ENV_CURSOR_FILE) {
            self.keeper.cursor_file = Some(PathBuf::from(path));
        }

        self.wallet.private_key = get(ENV_PRIVATE_KEY);

        Ok(())
    }

    /// Check everything except the signer key.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.targets()?;

        if self.keeper.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms", "must be greater than zero"));
        }
        if self.keeper.gas_limit == 0 {
            return Err(invalid("gas_limit", "must be greater than zero"));
        }
        if self.keeper.min_out_extra_bps > MAX_EFFECTIVE_SLIPPAGE_BPS {
            return Err(invalid(
                "min_out_extra_bps",
                format!("must be at most {MAX_EFFECTIVE_SLIPPAGE_BPS}"),
            ));
        }
        if self.keeper.rpc_timeout_ms == 0 {
            return Err(invalid("rpc_timeout_ms", "must be greater than zero"));
        }
        if self.keeper.confirmation_timeout_ms == 0 {
            return Err(invalid("confirmation_timeout_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// Parse the RPC URL and both contract addresses.
    #[allow(clippy::result_large_err)]
    pub fn targets(&self) -> Result<ChainTargets> {
        if self.chain.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "rpc_url" }.into());
        }
        let rpc_url = Url::parse(self.chain.rpc_url.trim())
            .map_err(|e| invalid("rpc_url", e.to_string()))?;

        Ok(ChainTargets {
            rpc_url,
            order_ledger: parse_address("order_ledger", self.chain.order_ledger.as_deref())?,
            price_venue: parse_address("price_venue", self.chain.price_venue.as_deref())?,
        })
    }

    /// The signer key, required before the keeper may run.
    #[allow(clippy::result_large_err)]
    pub fn private_key(&self) -> Result<&str> {
        self.wallet.private_key.as_deref().ok_or_else(|| {
            ConfigError::MissingField {
                field: ENV_PRIVATE_KEY,
            }
            .into()
        })
    }

    /// Scheduling parameters for the keeper loop.
    #[must_use]
    pub fn keeper_settings(&self) -> KeeperSettings {
        KeeperSettings {
            poll_interval: Duration::from_millis(self.keeper.poll_interval_ms),
            gas_limit: self.keeper.gas_limit,
            min_out_extra_bps: self.keeper.min_out_extra_bps,
            rpc_timeout: Duration::from_millis(self.keeper.rpc_timeout_ms),
            confirmation_timeout: Duration::from_millis(self.keeper.confirmation_timeout_ms),
            max_scan_blocks: self.keeper.max_scan_blocks,
            dry_run: self.keeper.dry_run,
        }
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn parse_env<T>(field: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(field, format!("{value:?}: {e}")))
}

#[allow(clippy::result_large_err)]
fn parse_address(field: &'static str, value: Option<&str>) -> Result<Address> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingField { field })?;
    Address::from_str(value).map_err(|e| invalid(field, e.to_string()))
}
