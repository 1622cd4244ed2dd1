//! Token symbols and decimals for readable slice logs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use tracing::debug;

use super::bounded;
use crate::domain::format_amount;
use crate::error::Result;
use crate::port::TokenMetadata;

/// Display metadata for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLabel {
    pub symbol: String,
    pub decimals: u8,
}

/// Caches token labels. Lookups never block a slice: on failure the amount
/// is rendered raw and the lookup is retried next time.
pub struct TokenDirectory {
    tokens: Arc<dyn TokenMetadata>,
    timeout: Duration,
    cache: HashMap<Address, TokenLabel>,
}

impl TokenDirectory {
    pub fn new(tokens: Arc<dyn TokenMetadata>, timeout: Duration) -> Self {
        Self {
            tokens,
            timeout,
            cache: HashMap::new(),
        }
    }

    /// Label for `token`, fetched once and cached.
    pub async fn label(&mut self, token: Address) -> Option<TokenLabel> {
        if let Some(label) = self.cache.get(&token) {
            return Some(label.clone());
        }
        match self.fetch(token).await {
            Ok(label) => {
                self.cache.insert(token, label.clone());
                Some(label)
            }
            Err(e) => {
                debug!(token = %token, error = %e, "Token metadata unavailable");
                None
            }
        }
    }

    /// `amount` of `token` for humans, e.g. `"1.5 WETH"`.
    pub async fn describe(&mut self, token: Address, amount: U256) -> String {
        match self.label(token).await {
            Some(label) => format!("{} {}", format_amount(amount, label.decimals), label.symbol),
            None => amount.to_string(),
        }
    }

    async fn fetch(&self, token: Address) -> Result<TokenLabel> {
        let symbol = bounded("symbol", self.timeout, self.tokens.symbol(token)).await?;
        let decimals = bounded("decimals", self.timeout, self.tokens.decimals(token)).await?;
        Ok(TokenLabel { symbol, decimals })
    }
}
