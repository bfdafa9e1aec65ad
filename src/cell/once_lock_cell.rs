//! `OnceLockCell` — lazy, thread-safe, delegating exactly-once to `OnceLock`.

use std::sync::OnceLock;

use super::owner::InitOwner;
use crate::diagnostics::{debug_event, trace_event, warn_event};
use crate::error::{FactoryError, FactoryResult};
use crate::holder::SingletonHolder;
use crate::policy::{InitPolicy, InitState};

/// Lazily initialized holder backed by `std::sync::OnceLock`.
///
/// The standard library primitive guarantees the factory runs at most once
/// and that every caller observes the finished value. The factory's result is
/// cached whole, so a failure is sticky: every later call returns a clone of
/// the same [`FactoryError`] and the factory is not run again.
///
/// A factory that panics leaves the cell empty; the next call retries.
pub struct OnceLockCell<T, F = fn() -> FactoryResult<T>> {
    value: OnceLock<FactoryResult<T>>,
    owner: InitOwner,
    factory: F,
}

impl<T, F> OnceLockCell<T, F> {
    /// Creates an empty cell that will call `factory` on first access.
    pub const fn new(factory: F) -> Self {
        Self {
            value: OnceLock::new(),
            owner: InitOwner::new(),
            factory,
        }
    }

    /// The value, if it has been built. Never runs the factory.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get().and_then(|result| result.as_ref().ok())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InitState {
        match self.value.get() {
            Some(Ok(_)) => InitState::Ready,
            Some(Err(_)) => InitState::Failed,
            None if self.owner.is_claimed() => InitState::Initializing,
            None => InitState::Uninitialized,
        }
    }

    /// Publishes `value` without running the factory.
    ///
    /// Fails with [`FactoryError::AlreadyInitialized`] if a value or a
    /// failure is already cached; `value` is dropped in that case.
    pub fn set(&self, value: T) -> FactoryResult<()> {
        if self.owner.is_current() {
            return Err(FactoryError::Reentrant);
        }
        self.value
            .set(Ok(value))
            .map_err(|_| FactoryError::AlreadyInitialized)
    }
}

impl<T, F> OnceLockCell<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    /// The single instance, building it on first access.
    pub fn instance(&self) -> FactoryResult<&T> {
        if let Some(result) = self.value.get() {
            return result.as_ref().map_err(FactoryError::clone);
        }

        // `OnceLock` would deadlock (or panic) if the factory came back here.
        if self.owner.is_current() {
            warn_event!("factory re-entered its OnceLockCell");
            return Err(FactoryError::Reentrant);
        }

        self.value
            .get_or_init(|| {
                let _claim = self.owner.claim();
                debug_event!(policy = %InitPolicy::LazySafeNoLock, "constructing singleton");
                let result = (self.factory)();
                match &result {
                    Ok(_) => trace_event!(policy = %InitPolicy::LazySafeNoLock, "singleton ready"),
                    Err(err) => warn_event!(policy = %InitPolicy::LazySafeNoLock, error = %err, "singleton factory failed"),
                }
                result
            })
            .as_ref()
            .map_err(FactoryError::clone)
    }
}

impl<T, F> SingletonHolder<T> for OnceLockCell<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    fn policy(&self) -> InitPolicy {
        InitPolicy::LazySafeNoLock
    }

    fn instance(&self) -> FactoryResult<&T> {
        OnceLockCell::instance(self)
    }

    fn get(&self) -> Option<&T> {
        OnceLockCell::get(self)
    }

    fn state(&self) -> InitState {
        OnceLockCell::state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_first_access_builds_once() {
        let calls = Cell::new(0);
        let cell = OnceLockCell::new(|| {
            calls.set(calls.get() + 1);
            Ok(String::from("localhost"))
        });

        assert_eq!(cell.state(), InitState::Uninitialized);
        assert_eq!(cell.get(), None);

        let first = cell.instance().unwrap();
        let second = cell.instance().unwrap();
        assert!(core::ptr::eq(first, second));
        assert_eq!(calls.get(), 1);
        assert_eq!(cell.state(), InitState::Ready);
    }

    #[test]
    fn test_failure_is_sticky() {
        let calls = AtomicUsize::new(0);
        let cell: OnceLockCell<u32, _> = OnceLockCell::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FactoryError::msg("database unreachable"))
        });

        let first = cell.instance().unwrap_err();
        let second = cell.instance().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.state(), InitState::Failed);
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn test_set_then_instance_skips_factory() {
        let cell: OnceLockCell<u32, _> = OnceLockCell::new(|| -> FactoryResult<u32> {
            unreachable!("factory must not run")
        });
        cell.set(5).unwrap();
        assert_eq!(cell.instance(), Ok(&5));
        assert_eq!(cell.set(6), Err(FactoryError::AlreadyInitialized));
    }
}
