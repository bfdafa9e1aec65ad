//! # `lazy-once` - Singleton Initialization Policies
//!
//! Four ways to hold exactly one shared value per process, each behind the
//! same [`SingletonHolder`] interface:
//!
//! | Policy | Holder | Built | Single construction under contention |
//! |---|---|---|---|
//! | [`InitPolicy::Eager`] | [`EagerCell`] | before first access | yes |
//! | [`InitPolicy::LazySafeNoLock`] | [`OnceLockCell`] | first access, via `OnceLock` | yes |
//! | [`InitPolicy::LazySafeLock`] | [`LockCell`] | first access, double-checked locking | yes |
//! | [`InitPolicy::LazyUnsafe`] | [`RacyCell`] | first access, unguarded | **no** |
//!
//! [`LazyOnce`] wraps any of the four and lets the policy be picked at
//! runtime, for example from a [`SingletonConfig`].
//!
//! ## Guarantees
//!
//! - Every holder hands out `&T` to the value it owns; nothing is copied.
//! - The three safe policies run the factory at most once and publish the
//!   value with a happens-before edge to every reader.
//! - Factory failures are sticky for the safe lazy policies: all callers get
//!   the same [`FactoryError`] and the factory is not retried. A panicking
//!   factory is retried on the next access.
//! - A factory that reads its own holder gets [`FactoryError::Reentrant`]
//!   instead of a deadlock.
//! - None of the holders synchronize mutation of the value after it is
//!   built; that belongs to the value ([`ConnectionSettings`] uses `RwLock`).
//! - A hung factory blocks every waiter of the safe lazy policies. There is
//!   no cancellation.
//!
//! ## Example
//!
//! ```rust
//! use lazy_once::{FactoryResult, LockCell};
//!
//! fn build() -> FactoryResult<Vec<u16>> {
//!     Ok(vec![5432])
//! }
//!
//! static PORTS: LockCell<Vec<u16>> = LockCell::new(build);
//!
//! let ports = PORTS.instance().unwrap();
//! assert!(std::ptr::eq(ports, PORTS.instance().unwrap()));
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature (on by default) holders emit `debug` events on
//! construction and `warn` events on failures, re-entrancy and races.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cell;
pub mod config;
pub mod demo;
pub mod error;
pub mod holder;
pub mod policy;

mod diagnostics;

pub use cell::{EagerCell, LockCell, OnceLockCell, RacyCell};
pub use config::{ConnectionConfig, SingletonConfig};
pub use demo::{ConnectionSettings, LazySafeSingleton};
pub use error::{FactoryError, FactoryResult};
pub use holder::{LazyOnce, SingletonHolder};
pub use policy::{InitPolicy, InitState};

// Compile-time layout and thread-safety checks.
const _: () = {
    use core::mem;

    // Eager holders are the value and nothing else.
    assert!(mem::size_of::<EagerCell<u64>>() == mem::size_of::<u64>());

    // The state byte round-trips through `AtomicU8`.
    assert!(mem::size_of::<InitState>() == 1);
};

const _: fn() = || {
    fn assert_sync<T: Sync>() {}

    assert_sync::<EagerCell<ConnectionSettings>>();
    assert_sync::<OnceLockCell<ConnectionSettings>>();
    assert_sync::<LockCell<ConnectionSettings>>();
    assert_sync::<RacyCell<ConnectionSettings>>();
    assert_sync::<LazyOnce<ConnectionSettings>>();
};
