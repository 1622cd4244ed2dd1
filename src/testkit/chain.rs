//! In-memory chain implementing every chain-facing port.
//!
//! [`FakeChain`] holds a block head, a log of lifecycle events, the ledger's
//! order table and a fixed quote. Every call is recorded so tests can assert
//! exactly what the keeper asked for. Failures, reverts and hangs can be
//! scripted per call kind.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{BlockRange, Order, OrderEvent, OrderEventKind, OrderId};
use crate::error::{ChainError, Result};
use crate::port::{ChainClient, OrderLedger, PriceVenue, SliceReceipt, TokenMetadata};

/// Kinds of call that can be scripted to fail or hang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeCall {
    BlockNumber,
    Events(OrderEventKind),
    GetOrder,
    EstimateNextSlice,
    Quote,
    ExecuteSlice,
    Symbol,
    Decimals,
}

impl FakeCall {
    fn name(&self) -> &'static str {
        match self {
            FakeCall::BlockNumber => "eth_blockNumber",
            FakeCall::Events(_) => "eth_getLogs",
            FakeCall::GetOrder => "getOrder",
            FakeCall::EstimateNextSlice => "estimateNextSliceAmount",
            FakeCall::Quote => "quoteOut",
            FakeCall::ExecuteSlice => "executeSlice",
            FakeCall::Symbol => "symbol",
            FakeCall::Decimals => "decimals",
        }
    }
}

/// A call the keeper made, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    BlockNumber,
    Events {
        kind: OrderEventKind,
        range: BlockRange,
    },
    GetOrder(OrderId),
    EstimateNextSlice(OrderId),
    Quote {
        token_in: Address,
        amount_in: U256,
    },
    ExecuteSlice {
        order_id: OrderId,
        min_out: U256,
        gas_limit: u64,
    },
}

#[derive(Default)]
struct FakeState {
    head: u64,
    logs: Vec<(u64, OrderEvent)>,
    orders: HashMap<OrderId, Order>,
    slice_amounts: HashMap<OrderId, U256>,
    quote: Option<U256>,
    tokens: HashMap<Address, (String, u8)>,
    failures: HashMap<FakeCall, u32>,
    hangs: HashSet<FakeCall>,
    reverts: u32,
    calls: Vec<RecordedCall>,
    tx_counter: u64,
}

/// Behaviour scripted for the next call of a kind.
enum Script {
    Proceed,
    Fail,
    Hang,
}

/// In-memory chain for keeper tests.
#[derive(Default)]
pub struct FakeChain {
    state: Mutex<FakeState>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain whose head is already at `head`.
    pub fn at_block(head: u64) -> Self {
        let chain = Self::new();
        chain.set_head(head);
        chain
    }

    pub fn set_head(&self, head: u64) {
        self.state.lock().head = head;
    }

    pub fn head(&self) -> u64 {
        self.state.lock().head
    }

    /// Move the head forward by `blocks`.
    pub fn mine(&self, blocks: u64) -> u64 {
        let mut state = self.state.lock();
        state.head += blocks;
        state.head
    }

    /// Append a raw event log at `block` without touching order state.
    pub fn emit(&self, block: u64, event: OrderEvent) {
        self.state.lock().logs.push((block, event));
    }

    /// Store `order` in the ledger and emit its `OrderCreated` at `block`.
    pub fn create_order(&self, block: u64, id: OrderId, order: Order) {
        let event = OrderEvent::Created {
            order_id: id,
            owner: order.owner,
            recipient: order.recipient,
            token_in: order.token_in,
            token_out: order.token_out,
            total_amount_in: order.total_amount_in,
            num_slices: order.num_slices,
            interval_sec: order.interval_sec,
        };
        let mut state = self.state.lock();
        state.orders.insert(id, order);
        state.logs.push((block, event));
    }

    /// Deactivate the order and emit `OrderCancelled` at `block`.
    pub fn cancel_order(&self, block: u64, id: OrderId) {
        let mut state = self.state.lock();
        let refunded_amount = match state.orders.get_mut(&id) {
            Some(order) => {
                order.active = false;
                std::mem::replace(&mut order.remaining_amount_in, U256::ZERO)
            }
            None => U256::ZERO,
        };
        state.logs.push((
            block,
            OrderEvent::Cancelled {
                order_id: id,
                refunded_amount,
            },
        ));
    }

    /// Replace the ledger's view of an order without emitting anything.
    pub fn set_order(&self, id: OrderId, order: Order) {
        self.state.lock().orders.insert(id, order);
    }

    /// Edit the ledger's view of an order in place.
    pub fn update_order(&self, id: OrderId, edit: impl FnOnce(&mut Order)) {
        if let Some(order) = self.state.lock().orders.get_mut(&id) {
            edit(order);
        }
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.state.lock().orders.get(&id).cloned()
    }

    /// Fix what `estimateNextSliceAmount` returns for an order.
    pub fn set_slice_amount(&self, id: OrderId, amount: U256) {
        self.state.lock().slice_amounts.insert(id, amount);
    }

    /// Fix what `quoteOut` returns. Unset, the venue quotes 1:1.
    pub fn set_quote(&self, amount_out: U256) {
        self.state.lock().quote = Some(amount_out);
    }

    pub fn set_token(&self, token: Address, symbol: &str, decimals: u8) {
        self.state
            .lock()
            .tokens
            .insert(token, (symbol.to_string(), decimals));
    }

    /// Make the next `times` calls of `call` fail with an RPC error.
    pub fn fail_next(&self, call: FakeCall, times: u32) {
        *self.state.lock().failures.entry(call).or_default() += times;
    }

    /// Make every call of `call` hang until the caller gives up.
    pub fn hang(&self, call: FakeCall) {
        self.state.lock().hangs.insert(call);
    }

    /// Make the next `times` slice executions mine but revert.
    pub fn revert_next_executions(&self, times: u32) {
        self.state.lock().reverts += times;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// `(order_id, min_out)` of every `executeSlice` submitted.
    pub fn executions(&self) -> Vec<(OrderId, U256)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::ExecuteSlice {
                    order_id, min_out, ..
                } => Some((order_id, min_out)),
                _ => None,
            })
            .collect()
    }

    /// Every event query, in call order.
    pub fn event_queries(&self) -> Vec<(OrderEventKind, BlockRange)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Events { kind, range } => Some((kind, range)),
                _ => None,
            })
            .collect()
    }

    pub fn quote_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RecordedCall::Quote { .. }))
            .count()
    }

    fn record(&self, call: FakeCall, recorded: Option<RecordedCall>) -> Script {
        let mut state = self.state.lock();
        if let Some(recorded) = recorded {
            state.calls.push(recorded);
        }
        if state.hangs.contains(&call) {
            return Script::Hang;
        }
        match state.failures.get_mut(&call) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Script::Fail
            }
            _ => Script::Proceed,
        }
    }

    async fn enter(&self, call: FakeCall, recorded: Option<RecordedCall>) -> Result<()> {
        match self.record(call, recorded) {
            Script::Proceed => Ok(()),
            Script::Fail => Err(ChainError::Rpc {
                call: call.name(),
                reason: "injected failure".into(),
            }
            .into()),
            Script::Hang => std::future::pending().await,
        }
    }

    fn missing_order(id: OrderId) -> ChainError {
        ChainError::Contract {
            call: "getOrder",
            reason: format!("unknown order {id}"),
        }
    }

    fn next_slice_amount(state: &FakeState, id: OrderId) -> Option<U256> {
        let order = state.orders.get(&id)?;
        if !order.active || order.remaining_amount_in.is_zero() {
            return Some(U256::ZERO);
        }
        if let Some(amount) = state.slice_amounts.get(&id) {
            return Some((*amount).min(order.remaining_amount_in));
        }
        let slices_left = order.num_slices.saturating_sub(order.executed_slices).max(1);
        Some(order.remaining_amount_in / U256::from(slices_left))
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn block_number(&self) -> Result<u64> {
        self.enter(FakeCall::BlockNumber, Some(RecordedCall::BlockNumber))
            .await?;
        Ok(self.head())
    }
}

#[async_trait]
impl OrderLedger for FakeChain {
    async fn events(&self, kind: OrderEventKind, range: BlockRange) -> Result<Vec<OrderEvent>> {
        self.enter(
            FakeCall::Events(kind),
            Some(RecordedCall::Events { kind, range }),
        )
        .await?;
        let state = self.state.lock();
        Ok(state
            .logs
            .iter()
            .filter(|(block, event)| {
                *block >= range.from && *block <= range.to && event.kind() == kind
            })
            .map(|(_, event)| event.clone())
            .collect())
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.enter(FakeCall::GetOrder, Some(RecordedCall::GetOrder(id)))
            .await?;
        self.order(id).ok_or_else(|| Self::missing_order(id).into())
    }

    async fn estimate_next_slice_amount(&self, id: OrderId) -> Result<U256> {
        self.enter(
            FakeCall::EstimateNextSlice,
            Some(RecordedCall::EstimateNextSlice(id)),
        )
        .await?;
        let state = self.state.lock();
        Self::next_slice_amount(&state, id).ok_or_else(|| Self::missing_order(id).into())
    }

    async fn execute_slice(
        &self,
        id: OrderId,
        min_out: U256,
        gas_limit: u64,
    ) -> Result<SliceReceipt> {
        self.enter(
            FakeCall::ExecuteSlice,
            Some(RecordedCall::ExecuteSlice {
                order_id: id,
                min_out,
                gas_limit,
            }),
        )
        .await?;

        let mut state = self.state.lock();
        state.tx_counter += 1;
        state.head += 1;
        let tx_hash: TxHash = B256::left_padding_from(&state.tx_counter.to_be_bytes());
        let block_number = Some(state.head);

        let quote = state.quote;
        let amount_in = Self::next_slice_amount(&state, id).unwrap_or_default();
        let amount_out = quote.unwrap_or(amount_in);
        let reverted = state.reverts > 0
            || amount_in.is_zero()
            || amount_out < min_out
            || !state.orders.get(&id).is_some_and(|o| o.active);

        if reverted {
            state.reverts = state.reverts.saturating_sub(1);
            return Ok(SliceReceipt {
                tx_hash,
                block_number,
                success: false,
            });
        }

        if let Some(order) = state.orders.get_mut(&id) {
            order.remaining_amount_in -= amount_in;
            order.executed_slices += 1;
            order.next_execution_time += order.interval_sec;
            if order.remaining_amount_in.is_zero() {
                order.active = false;
            }
        }

        Ok(SliceReceipt {
            tx_hash,
            block_number,
            success: true,
        })
    }
}

#[async_trait]
impl PriceVenue for FakeChain {
    async fn quote_out(&self, token_in: Address, amount_in: U256) -> Result<U256> {
        self.enter(
            FakeCall::Quote,
            Some(RecordedCall::Quote {
                token_in,
                amount_in,
            }),
        )
        .await?;
        Ok(self.state.lock().quote.unwrap_or(amount_in))
    }
}

#[async_trait]
impl TokenMetadata for FakeChain {
    async fn symbol(&self, token: Address) -> Result<String> {
        self.enter(FakeCall::Symbol, None).await?;
        Ok(self
            .state
            .lock()
            .tokens
            .get(&token)
            .map(|(symbol, _)| symbol.clone())
            .unwrap_or_else(|| "TKN".to_string()))
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        self.enter(FakeCall::Decimals, None).await?;
        Ok(self
            .state
            .lock()
            .tokens
            .get(&token)
            .map(|(_, decimals)| *decimals)
            .unwrap_or(18))
    }
}
