mod support;

use std::sync::Arc;

use alloy_primitives::U256;
use slicekeeper::domain::{BlockRange, Order, OrderEventKind};
use slicekeeper::keeper::KeeperSettings;
use slicekeeper::testkit::domain::{id, order, sliced_order};
use slicekeeper::testkit::{FakeCall, FakeChain, RecordedCall};
use support::keeper::{keeper_at, keeper_with, settings, NOW};

/// A chain at block 101 with `order` created at that block; the keeper
/// cursor sits at 100.
fn chain_with_order(order: Order) -> Arc<FakeChain> {
    let chain = Arc::new(FakeChain::at_block(101));
    chain.create_order(101, id(1), order);
    chain
}

fn get_order_calls(chain: &FakeChain) -> usize {
    chain
        .calls()
        .iter()
        .filter(|call| matches!(call, RecordedCall::GetOrder(_)))
        .count()
}

#[tokio::test]
async fn single_slice_executes_with_integer_min_out() {
    let chain = chain_with_order(order());
    chain.set_quote(U256::from(97));
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.scan.as_ref().map(|s| s.created), Some(1));
    assert_eq!(report.executed, 1);
    assert_eq!(chain.executions(), vec![(id(1), U256::from(95))]);
    assert!(chain.calls().contains(&RecordedCall::ExecuteSlice {
        order_id: id(1),
        min_out: U256::from(95),
        gas_limit: 700_000,
    }));
    assert_eq!(chain.order(id(1)).map(|o| o.active), Some(false));
}

#[tokio::test]
async fn slippage_ceiling_bounds_min_out() {
    let chain = chain_with_order(Order {
        max_slippage_bps: 9_000,
        ..order()
    });
    chain.set_quote(U256::from(10_000));
    let mut keeper = keeper_at(&chain, 100);

    keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(chain.executions(), vec![(id(1), U256::from(1_000))]);
}

#[tokio::test]
async fn zero_slice_amount_skips_quote_and_keeps_tracking() {
    let chain = chain_with_order(order());
    chain.set_slice_amount(id(1), U256::ZERO);
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.nothing_to_execute, 1);
    assert_eq!(chain.quote_count(), 0);
    assert!(chain.executions().is_empty());
    assert!(keeper.state().orders().contains(&id(1)));
}

#[tokio::test]
async fn failed_cancel_query_rescans_identical_range() {
    let chain = chain_with_order(order());
    chain.fail_next(FakeCall::Events(OrderEventKind::Cancelled), 1);
    let mut keeper = keeper_at(&chain, 100);

    assert!(keeper.run_once_at(NOW).await.is_err());
    assert_eq!(keeper.state().cursor(), 100);
    assert!(keeper.state().orders().is_empty());
    assert_eq!(get_order_calls(&chain), 0);

    chain.clear_calls();
    let report = keeper.run_once_at(NOW).await.unwrap();

    let range = BlockRange { from: 101, to: 101 };
    assert_eq!(
        chain.event_queries(),
        vec![
            (OrderEventKind::Created, range),
            (OrderEventKind::Cancelled, range),
            (OrderEventKind::Completed, range),
        ]
    );
    assert_eq!(keeper.state().cursor(), 101);
    assert_eq!(report.executed, 1);
}

#[tokio::test]
async fn inactive_on_fresh_read_is_dropped_without_event() {
    let chain = Arc::new(FakeChain::at_block(100));
    chain.set_order(
        id(5),
        Order {
            active: false,
            ..order()
        },
    );
    let mut keeper = keeper_at(&chain, 100);
    keeper.state_mut().orders_mut().track(id(5));

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.dropped, 1);
    assert!(!keeper.state().orders().contains(&id(5)));
    assert!(chain.executions().is_empty());
    assert_eq!(report.tracked, 0);
}

#[tokio::test]
async fn cancelled_order_is_never_executed_again() {
    let chain = chain_with_order(sliced_order(3, 100));
    let mut keeper = keeper_at(&chain, 100);

    keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(chain.executions().len(), 1);

    chain.cancel_order(chain.head(), id(1));
    let report = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(report.scan.as_ref().map(|s| s.cancelled), Some(1));
    assert!(keeper.state().orders().is_retired(&id(1)));

    // Even a ledger that reports the order live again is ignored.
    chain.update_order(id(1), |o| o.active = true);
    chain.mine(1);
    keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(chain.executions().len(), 1);
}

#[tokio::test]
async fn retired_orders_do_not_accumulate_across_passes() {
    let chain = Arc::new(FakeChain::at_block(101));
    for n in 1..=3 {
        chain.create_order(101, id(n), order());
    }
    let mut keeper = keeper_at(&chain, 100);

    let first = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(first.executed, 3);

    chain.mine(1);
    let second = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(second.tracked, 0);

    chain.mine(1);
    keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(keeper.state().orders().retired_len(), 0);
    assert!(keeper.state().orders().is_empty());
    assert_eq!(chain.executions().len(), 3);
}

#[tokio::test]
async fn sliced_order_runs_every_slice_then_is_dropped() {
    let chain = chain_with_order(sliced_order(3, 100));
    let mut keeper = keeper_at(&chain, 100);

    for _ in 0..3 {
        let report = keeper.run_once_at(NOW).await.unwrap();
        assert_eq!(report.executed, 1);
    }
    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.dropped, 1);
    assert_eq!(report.tracked, 0);
    // 1:1 quote of 100, 120 bps: floor(100 * 9880 / 10000) = 98.
    assert_eq!(
        chain.executions(),
        vec![
            (id(1), U256::from(98)),
            (id(1), U256::from(98)),
            (id(1), U256::from(98)),
        ]
    );
    assert_eq!(chain.order(id(1)).map(|o| o.executed_slices), Some(3));
}

#[tokio::test]
async fn order_not_yet_due_is_left_alone() {
    let chain = chain_with_order(Order {
        next_execution_time: NOW + 1,
        ..order()
    });
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.not_due, 1);
    assert_eq!(chain.quote_count(), 0);
    assert!(chain.executions().is_empty());
    assert!(keeper.state().orders().contains(&id(1)));
}

#[tokio::test]
async fn failure_on_one_order_does_not_stop_the_next() {
    let chain = Arc::new(FakeChain::at_block(101));
    chain.create_order(101, id(1), order());
    chain.create_order(101, id(2), order());
    chain.fail_next(FakeCall::GetOrder, 1);
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.evaluated, 2);
    assert_eq!(report.errors, 1);
    assert_eq!(report.executed, 1);
    assert_eq!(chain.executions(), vec![(id(2), U256::from(98))]);
    assert!(keeper.state().orders().contains(&id(1)));
}

#[tokio::test]
async fn failed_submission_is_retried_next_pass() {
    let chain = chain_with_order(order());
    chain.fail_next(FakeCall::ExecuteSlice, 1);
    let mut keeper = keeper_at(&chain, 100);

    let first = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(first.failed, 1);
    assert!(keeper.state().orders().contains(&id(1)));

    let second = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(second.executed, 1);
    assert_eq!(chain.executions().len(), 2);
}

#[tokio::test]
async fn reverted_slice_is_recorded_and_retried() {
    let chain = chain_with_order(order());
    chain.revert_next_executions(1);
    let mut keeper = keeper_at(&chain, 100);

    let first = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(first.reverted, 1);
    assert_eq!(first.submitted(), 1);
    assert_eq!(chain.order(id(1)).map(|o| o.executed_slices), Some(0));

    let second = keeper.run_once_at(NOW).await.unwrap();
    assert_eq!(second.executed, 1);
}

#[tokio::test]
async fn hung_submission_times_out_as_failure() {
    let chain = chain_with_order(order());
    chain.hang(FakeCall::ExecuteSlice);
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.failed, 1);
    assert!(keeper.state().orders().contains(&id(1)));
}

#[tokio::test]
async fn hung_order_read_counts_as_error() {
    let chain = chain_with_order(order());
    chain.hang(FakeCall::GetOrder);
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.errors, 1);
    assert_eq!(keeper.state().cursor(), 101);
}

#[tokio::test]
async fn failed_head_read_aborts_pass_before_decisions() {
    let chain = Arc::new(FakeChain::at_block(100));
    chain.set_order(id(1), order());
    chain.fail_next(FakeCall::BlockNumber, 1);
    let mut keeper = keeper_at(&chain, 100);
    keeper.state_mut().orders_mut().track(id(1));

    let result = keeper.run_once_at(NOW).await;

    assert!(result.is_err_and(|e| e.is_transient()));
    assert_eq!(get_order_calls(&chain), 0);
}

#[tokio::test]
async fn dry_run_plans_but_never_submits() {
    let chain = chain_with_order(order());
    chain.set_quote(U256::from(97));
    let settings = KeeperSettings {
        dry_run: true,
        ..settings()
    };
    let mut keeper = keeper_with(&chain, 100, &settings);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.dry_run, 1);
    assert_eq!(report.submitted(), 0);
    assert_eq!(chain.quote_count(), 1);
    assert!(chain.executions().is_empty());
    assert!(keeper.state().orders().contains(&id(1)));
}

#[tokio::test]
async fn token_metadata_failure_does_not_block_execution() {
    let chain = chain_with_order(order());
    chain.fail_next(FakeCall::Symbol, 10);
    chain.fail_next(FakeCall::Decimals, 10);
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert_eq!(report.executed, 1);
}

#[tokio::test]
async fn idle_pass_changes_nothing() {
    let chain = Arc::new(FakeChain::at_block(100));
    let mut keeper = keeper_at(&chain, 100);

    let report = keeper.run_once_at(NOW).await.unwrap();

    assert!(report.is_idle());
    assert!(report.scan.is_none());
    assert_eq!(keeper.state().cursor(), 100);
}

#[tokio::test]
async fn min_out_margin_follows_settings() {
    let chain = chain_with_order(order());
    chain.set_quote(U256::from(10_000));
    let settings = KeeperSettings {
        min_out_extra_bps: 0,
        ..settings()
    };
    let mut keeper = keeper_with(&chain, 100, &settings);

    keeper.run_once_at(NOW).await.unwrap();

    // 100 bps only: floor(10000 * 9900 / 10000).
    assert_eq!(chain.executions(), vec![(id(1), U256::from(9_900))]);
}
