//! Singleton holder family, one type per initialization policy.
//!
//! - `eager_cell` holds a value built before first access.
//! - `once_lock_cell` defers to `std::sync::OnceLock`.
//! - `lock_cell` does double-checked locking by hand.
//! - `racy_cell` skips synchronization and shows the resulting race.

pub mod eager_cell;
pub mod lock_cell;
pub mod once_lock_cell;
pub mod racy_cell;

mod owner;

pub use eager_cell::EagerCell;
pub use lock_cell::LockCell;
pub use once_lock_cell::OnceLockCell;
pub use racy_cell::RacyCell;
