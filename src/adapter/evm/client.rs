//! Alloy implementation of the chain-facing ports.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use alloy_provider::network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info};

use super::contracts::{IERC20Metadata, ISimpleAmm, IVwapEngine};
use crate::config::{ChainTargets, ENV_PRIVATE_KEY};
use crate::domain::{BlockRange, Order, OrderEvent, OrderEventKind, OrderId};
use crate::error::{ChainError, ConfigError, Result};
use crate::port::{ChainClient, OrderLedger, PriceVenue, SliceReceipt, TokenMetadata};

/// Order ledger, price venue and token reads over one signing HTTP provider.
pub struct EvmChain {
    provider: DynProvider,
    order_ledger: Address,
    price_venue: Address,
    keeper: Address,
}

impl EvmChain {
    /// Build the provider and signer. Does not touch the network.
    #[allow(clippy::result_large_err)]
    pub fn connect(targets: &ChainTargets, private_key: &str) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key.trim()).map_err(|e| {
            ConfigError::InvalidValue {
                field: ENV_PRIVATE_KEY,
                reason: e.to_string(),
            }
        })?;
        let keeper = signer.address();

        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(targets.rpc_url.clone())
            .erased();

        info!(
            keeper = %keeper,
            order_ledger = %targets.order_ledger,
            price_venue = %targets.price_venue,
            "Chain client ready"
        );

        Ok(Self {
            provider,
            order_ledger: targets.order_ledger,
            price_venue: targets.price_venue,
            keeper,
        })
    }

    /// Address transactions are signed and paid from.
    #[must_use]
    pub fn keeper_address(&self) -> Address {
        self.keeper
    }

    #[must_use]
    pub fn order_ledger(&self) -> Address {
        self.order_ledger
    }

    #[must_use]
    pub fn price_venue(&self) -> Address {
        self.price_venue
    }

    /// Chain ID reported by the node.
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| rpc_error("eth_chainId", e))
    }

    /// Native balance of the keeper account, in wei.
    pub async fn keeper_balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.keeper)
            .await
            .map_err(|e| rpc_error("eth_getBalance", e))
    }
}

fn rpc_error(call: &'static str, e: impl std::fmt::Display) -> crate::error::Error {
    ChainError::Rpc {
        call,
        reason: e.to_string(),
    }
    .into()
}

fn contract_error(call: &'static str, e: impl std::fmt::Display) -> crate::error::Error {
    ChainError::Contract {
        call,
        reason: e.to_string(),
    }
    .into()
}

impl From<IVwapEngine::Order> for Order {
    fn from(o: IVwapEngine::Order) -> Self {
        Self {
            owner: o.owner,
            recipient: o.recipient,
            token_in: o.tokenIn,
            token_out: o.tokenOut,
            total_amount_in: o.totalAmountIn,
            remaining_amount_in: o.remainingAmountIn,
            num_slices: o.numSlices,
            executed_slices: o.executedSlices,
            max_slippage_bps: o.maxSlippageBps,
            max_impact_bps: o.maxImpactBps,
            interval_sec: o.intervalSec,
            next_execution_time: o.nextExecutionTime,
            deadline: o.deadline,
            active: o.active,
        }
    }
}

impl From<IVwapEngine::OrderCreated> for OrderEvent {
    fn from(e: IVwapEngine::OrderCreated) -> Self {
        OrderEvent::Created {
            order_id: OrderId::new(e.orderId),
            owner: e.owner,
            recipient: e.recipient,
            token_in: e.tokenIn,
            token_out: e.tokenOut,
            total_amount_in: e.totalAmountIn,
            num_slices: e.numSlices,
            interval_sec: e.intervalSec,
        }
    }
}

impl From<IVwapEngine::OrderCancelled> for OrderEvent {
    fn from(e: IVwapEngine::OrderCancelled) -> Self {
        OrderEvent::Cancelled {
            order_id: OrderId::new(e.orderId),
            refunded_amount: e.refundedAmount,
        }
    }
}

impl From<IVwapEngine::OrderCompleted> for OrderEvent {
    fn from(e: IVwapEngine::OrderCompleted) -> Self {
        OrderEvent::Completed {
            order_id: OrderId::new(e.orderId),
            total_amount_out: e.totalAmountOut,
        }
    }
}

#[async_trait]
impl ChainClient for EvmChain {
    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| rpc_error("eth_blockNumber", e))
    }
}

#[async_trait]
impl OrderLedger for EvmChain {
    async fn events(&self, kind: OrderEventKind, range: BlockRange) -> Result<Vec<OrderEvent>> {
        let engine = IVwapEngine::new(self.order_ledger, &self.provider);
        let query_error = |e| rpc_error("eth_getLogs", e);

        let events: Vec<OrderEvent> = match kind {
            OrderEventKind::Created => engine
                .OrderCreated_filter()
                .from_block(range.from)
                .to_block(range.to)
                .query()
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|(event, _)| event.into())
                .collect(),
            OrderEventKind::Cancelled => engine
                .OrderCancelled_filter()
                .from_block(range.from)
                .to_block(range.to)
                .query()
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|(event, _)| event.into())
                .collect(),
            OrderEventKind::Completed => engine
                .OrderCompleted_filter()
                .from_block(range.from)
                .to_block(range.to)
                .query()
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|(event, _)| event.into())
                .collect(),
        };

        debug!(
            event = %kind,
            from_block = range.from,
            to_block = range.to,
            count = events.len(),
            "Fetched order events"
        );
        Ok(events)
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        let engine = IVwapEngine::new(self.order_ledger, &self.provider);
        let order = engine
            .getOrder(id.as_u256())
            .call()
            .await
            .map_err(|e| contract_error("getOrder", e))?;
        Ok(order.into())
    }

    async fn estimate_next_slice_amount(&self, id: OrderId) -> Result<U256> {
        let engine = IVwapEngine::new(self.order_ledger, &self.provider);
        engine
            .estimateNextSliceAmount(id.as_u256())
            .call()
            .await
            .map_err(|e| contract_error("estimateNextSliceAmount", e))
    }

    async fn execute_slice(
        &self,
        id: OrderId,
        min_out: U256,
        gas_limit: u64,
    ) -> Result<SliceReceipt> {
        let engine = IVwapEngine::new(self.order_ledger, &self.provider);

        let pending_tx = engine
            .executeSlice(id.as_u256(), min_out)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| contract_error("executeSlice", e))?;

        debug!(order_id = %id, tx_hash = %pending_tx.tx_hash(), "Slice transaction sent");

        let receipt = pending_tx
            .with_required_confirmations(1)
            .get_receipt()
            .await
            .map_err(|e| rpc_error("eth_getTransactionReceipt", e))?;

        Ok(SliceReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        })
    }
}

#[async_trait]
impl PriceVenue for EvmChain {
    async fn quote_out(&self, token_in: Address, amount_in: U256) -> Result<U256> {
        let amm = ISimpleAmm::new(self.price_venue, &self.provider);
        amm.quoteOut(token_in, amount_in)
            .call()
            .await
            .map_err(|e| contract_error("quoteOut", e))
    }
}

#[async_trait]
impl TokenMetadata for EvmChain {
    async fn symbol(&self, token: Address) -> Result<String> {
        let erc20 = IERC20Metadata::new(token, &self.provider);
        erc20
            .symbol()
            .call()
            .await
            .map_err(|e| contract_error("symbol", e))
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        let erc20 = IERC20Metadata::new(token, &self.provider);
        erc20
            .decimals()
            .call()
            .await
            .map_err(|e| contract_error("decimals", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> ChainTargets {
        ChainTargets {
            rpc_url: "http://localhost:8545".parse().unwrap(),
            order_ledger: Address::repeat_byte(0x11),
            price_venue: Address::repeat_byte(0x22),
        }
    }

    // Well-known first development account key; never funded on real networks.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_keeper_address_from_key() {
        let chain = EvmChain::connect(&targets(), DEV_KEY).unwrap();
        assert_eq!(
            chain.keeper_address(),
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap()
        );
        assert_eq!(chain.order_ledger(), Address::repeat_byte(0x11));
    }

    #[test]
    fn rejects_malformed_key() {
        let result = EvmChain::connect(&targets(), "not-a-key");
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::InvalidValue {
                field: ENV_PRIVATE_KEY,
                ..
            }))
        ));
    }

    #[test]
    fn converts_ledger_order() {
        let raw = IVwapEngine::Order {
            owner: Address::repeat_byte(1),
            recipient: Address::repeat_byte(2),
            tokenIn: Address::repeat_byte(3),
            tokenOut: Address::repeat_byte(4),
            totalAmountIn: U256::from(1_000),
            remainingAmountIn: U256::from(400),
            numSlices: 5,
            executedSlices: 3,
            maxSlippageBps: 150,
            maxImpactBps: 500,
            intervalSec: 30,
            nextExecutionTime: 1_700_000_000,
            deadline: 1_800_000_000,
            active: true,
        };

        let order = Order::from(raw);

        assert_eq!(order.token_in, Address::repeat_byte(3));
        assert_eq!(order.remaining_amount_in, U256::from(400));
        assert_eq!(order.next_slice(), 4);
        assert_eq!(order.max_slippage_bps, 150);
        assert!(order.active);
    }

    #[test]
    fn converts_lifecycle_events() {
        let cancelled = OrderEvent::from(IVwapEngine::OrderCancelled {
            orderId: U256::from(9),
            refundedAmount: U256::from(50),
        });
        assert_eq!(cancelled.order_id(), OrderId::from(9u64));
        assert_eq!(cancelled.kind(), OrderEventKind::Cancelled);

        let completed = OrderEvent::from(IVwapEngine::OrderCompleted {
            orderId: U256::from(10),
            totalAmountOut: U256::from(97),
        });
        assert!(completed.is_terminal());
    }
}
