//! The common holder interface and `LazyOnce`, which picks a policy at runtime.

use crate::cell::{EagerCell, LockCell, OnceLockCell, RacyCell};
use crate::diagnostics::debug_event;
use crate::error::FactoryResult;
use crate::policy::{InitPolicy, InitState};

/// Read access shared by every singleton holder.
pub trait SingletonHolder<T> {
    /// The policy this holder implements.
    fn policy(&self) -> InitPolicy;

    /// The shared instance, building it first if the policy is lazy.
    ///
    /// # Errors
    /// Returns the factory's failure, or [`FactoryError::Reentrant`] when
    /// called from inside the holder's own factory.
    ///
    /// [`FactoryError::Reentrant`]: crate::FactoryError::Reentrant
    fn instance(&self) -> FactoryResult<&T>;

    /// The instance if it already exists. Never runs the factory.
    fn get(&self) -> Option<&T>;

    /// Current lifecycle state.
    fn state(&self) -> InitState;

    /// `true` once the value is published.
    fn is_initialized(&self) -> bool {
        self.state() == InitState::Ready
    }
}

/// A singleton holder whose initialization policy is chosen by value.
///
/// The lazy constructors are `const fn`, so a `LazyOnce` can live in a
/// `static`:
///
/// ```
/// use lazy_once::{FactoryResult, LazyOnce, SingletonHolder};
///
/// fn build() -> FactoryResult<String> {
///     Ok(String::from("localhost"))
/// }
///
/// static HOST: LazyOnce<String> = LazyOnce::lazy_safe_lock(build);
///
/// let first = HOST.instance().unwrap();
/// let second = HOST.instance().unwrap();
/// assert!(std::ptr::eq(first, second));
/// ```
pub enum LazyOnce<T, F = fn() -> FactoryResult<T>> {
    /// See [`EagerCell`].
    Eager(EagerCell<T>),
    /// See [`OnceLockCell`].
    LazySafeNoLock(OnceLockCell<T, F>),
    /// See [`LockCell`].
    LazySafeLock(LockCell<T, F>),
    /// See [`RacyCell`].
    LazyUnsafe(RacyCell<T, F>),
}

impl<T, F> LazyOnce<T, F> {
    /// Holder around a value that already exists.
    pub const fn eager(value: T) -> Self {
        Self::Eager(EagerCell::new(value))
    }

    /// Lazy holder backed by `OnceLock`.
    pub const fn lazy_safe(factory: F) -> Self {
        Self::LazySafeNoLock(OnceLockCell::new(factory))
    }

    /// Lazy holder using double-checked locking.
    pub const fn lazy_safe_lock(factory: F) -> Self {
        Self::LazySafeLock(LockCell::new(factory))
    }

    /// Lazy holder with no construction guard.
    pub const fn lazy_unsafe(factory: F) -> Self {
        Self::LazyUnsafe(RacyCell::new(factory))
    }
}

impl<T, F> LazyOnce<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    /// Builds a holder for `policy`.
    ///
    /// For [`InitPolicy::Eager`] the factory runs here and its failure is
    /// returned; lazy policies never fail at this point.
    ///
    /// # Errors
    /// The factory's failure, for the eager policy only.
    pub fn with_policy(policy: InitPolicy, factory: F) -> FactoryResult<Self> {
        debug_event!(%policy, "creating singleton holder");
        Ok(match policy {
            InitPolicy::Eager => Self::Eager(EagerCell::build(factory)?),
            InitPolicy::LazySafeNoLock => Self::lazy_safe(factory),
            InitPolicy::LazySafeLock => Self::lazy_safe_lock(factory),
            InitPolicy::LazyUnsafe => Self::lazy_unsafe(factory),
        })
    }

    fn as_holder(&self) -> &dyn SingletonHolder<T> {
        match self {
            Self::Eager(cell) => cell,
            Self::LazySafeNoLock(cell) => cell,
            Self::LazySafeLock(cell) => cell,
            Self::LazyUnsafe(cell) => cell,
        }
    }
}

impl<T, F> SingletonHolder<T> for LazyOnce<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    fn policy(&self) -> InitPolicy {
        self.as_holder().policy()
    }

    fn instance(&self) -> FactoryResult<&T> {
        self.as_holder().instance()
    }

    fn get(&self) -> Option<&T> {
        self.as_holder().get()
    }

    fn state(&self) -> InitState {
        self.as_holder().state()
    }
}
