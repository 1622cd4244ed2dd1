//! Keeper construction over the in-memory fake chain.

use std::sync::Arc;
use std::time::Duration;

use slicekeeper::keeper::{Keeper, KeeperPorts, KeeperSettings, KeeperState};
use slicekeeper::testkit::FakeChain;

/// Wall-clock time used for passes; every testkit order is due by then.
pub const NOW: u64 = 1_000;

/// Default settings with short timeouts so hung calls fail fast.
pub fn settings() -> KeeperSettings {
    KeeperSettings {
        rpc_timeout: Duration::from_millis(200),
        confirmation_timeout: Duration::from_millis(200),
        ..KeeperSettings::default()
    }
}

pub fn ports(chain: &Arc<FakeChain>) -> KeeperPorts {
    KeeperPorts::from_chain(Arc::clone(chain))
}

/// A keeper whose cursor is already at `cursor`.
pub fn keeper_at(chain: &Arc<FakeChain>, cursor: u64) -> Keeper {
    keeper_with(chain, cursor, &settings())
}

pub fn keeper_with(chain: &Arc<FakeChain>, cursor: u64, settings: &KeeperSettings) -> Keeper {
    Keeper::new(ports(chain), settings, KeeperState::new(cursor))
}
