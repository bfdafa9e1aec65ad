//! Initialization policies and the lifecycle state every holder reports.

use core::fmt;
use serde::{Deserialize, Serialize};

/// How a singleton holder constructs its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitPolicy {
    /// Built before any access can happen (const-evaluated static, or at holder construction).
    Eager,
    /// Built on first access through `std::sync::OnceLock`.
    LazySafeNoLock,
    /// Built on first access under a mutex, with double-checked locking.
    LazySafeLock,
    /// Built on first access with an unguarded check-then-create. Racy on purpose.
    LazyUnsafe,
}

impl InitPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Eager,
        Self::LazySafeNoLock,
        Self::LazySafeLock,
        Self::LazyUnsafe,
    ];

    /// `true` if construction is deferred to the first access.
    pub const fn is_lazy(self) -> bool {
        !matches!(self, Self::Eager)
    }

    /// `true` if the policy guarantees a single construction under concurrent first access.
    pub const fn is_thread_safe(self) -> bool {
        !matches!(self, Self::LazyUnsafe)
    }

    /// Stable name, matching the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::LazySafeNoLock => "lazy_safe_no_lock",
            Self::LazySafeLock => "lazy_safe_lock",
            Self::LazyUnsafe => "lazy_unsafe",
        }
    }
}

impl fmt::Display for InitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of a holder's value.
///
/// `Ready` and `Failed` are terminal: a holder never leaves them.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitState {
    /// No value yet; the next access runs the factory.
    Uninitialized = 0,
    /// A factory call is in flight.
    Initializing = 1,
    /// The value is published.
    Ready = 2,
    /// The factory failed and the failure is cached.
    Failed = 3,
}

impl InitState {
    #[inline]
    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Initializing,
            2 => Self::Ready,
            3 => Self::Failed,
            _ => Self::Uninitialized,
        }
    }

    /// `true` for `Ready` and `Failed`.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}
