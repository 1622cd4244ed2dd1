//! Configuration and chain validation commands.

mod chain;
mod config;

pub use chain::execute_chain;
pub use config::execute_config;
