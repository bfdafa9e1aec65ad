//! `LockCell` — lazy, thread-safe, double-checked locking.
//!
//! Layout: the hot state byte sits on its own cache line so Ready-path
//! readers do not share a line with the mutex or the slot.
//!
//! Protocol:
//! 1. load `state` (Acquire) without the lock; terminal means the slot is
//!    initialized, read it and return.
//! 2. take `lock`.
//! 3. load `state` again; another thread may have finished while we waited.
//! 4. store `Initializing`, run the factory, write the slot, then publish
//!    `Ready`/`Failed` with a Release store. The slot is never written again.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_utils::CachePadded;

use super::owner::InitOwner;
use crate::diagnostics::{debug_event, trace_event, warn_event};
use crate::error::{FactoryError, FactoryResult};
use crate::holder::SingletonHolder;
use crate::policy::{InitPolicy, InitState};

/// Lazily initialized holder guarded by a mutex, with a lock-free fast path.
///
/// Once the value is published no caller touches the mutex again. Waiters
/// block only while another thread is running the factory. Failures are
/// sticky; a panicking factory resets the cell so the next call retries.
pub struct LockCell<T, F = fn() -> FactoryResult<T>> {
    state: CachePadded<AtomicU8>,
    lock: Mutex<()>,
    owner: InitOwner,
    slot: UnsafeCell<MaybeUninit<FactoryResult<T>>>,
    factory: F,
}

// SAFETY: the slot is written once, by the thread holding `lock`, before the
// Release store of a terminal state; readers only touch it after an Acquire
// load observes that state. Values cross threads, hence `T: Send`.
unsafe impl<T: Send + Sync, F: Sync> Sync for LockCell<T, F> {}

impl<T, F> LockCell<T, F> {
    /// Creates an empty cell that will call `factory` on first access.
    pub const fn new(factory: F) -> Self {
        Self {
            state: CachePadded::new(AtomicU8::new(InitState::Uninitialized as u8)),
            lock: Mutex::new(()),
            owner: InitOwner::new(),
            slot: UnsafeCell::new(MaybeUninit::uninit()),
            factory,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> InitState {
        InitState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// The value, if it has been built. Never runs the factory or locks.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.published().and_then(Result::ok)
    }

    /// Publishes `value` without running the factory.
    pub fn set(&self, value: T) -> FactoryResult<()> {
        if self.owner.is_current() {
            return Err(FactoryError::Reentrant);
        }
        let _guard = self.acquire();
        if self.state().is_terminal() {
            return Err(FactoryError::AlreadyInitialized);
        }
        // SAFETY: we hold the lock and the state is not terminal.
        unsafe { self.publish(Ok(value)) };
        Ok(())
    }

    /// Reads the slot if a terminal state has been published.
    #[inline]
    fn published(&self) -> Option<FactoryResult<&T>> {
        if self.state().is_terminal() {
            // SAFETY: terminal states are stored after the slot write and
            // never left; the Acquire load in `state` pairs with that store.
            let result = unsafe { (*self.slot.get()).assume_init_ref() };
            Some(result.as_ref().map_err(FactoryError::clone))
        } else {
            None
        }
    }

    /// Writes the slot and publishes the matching terminal state.
    ///
    /// # Safety
    /// The caller must hold `lock` and the state must not be terminal, so no
    /// reader can hold a reference into the slot.
    unsafe fn publish(&self, result: FactoryResult<T>) {
        let terminal = if result.is_ok() {
            InitState::Ready
        } else {
            InitState::Failed
        };
        (*self.slot.get()).write(result);
        self.state.store(terminal as u8, Ordering::Release);
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The mutex guards no data; a factory panic is handled by `ResetOnUnwind`.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, F> LockCell<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    /// The single instance, building it on first access.
    pub fn instance(&self) -> FactoryResult<&T> {
        // First check, no lock.
        if let Some(result) = self.published() {
            return result;
        }

        // The factory runs with the lock held; coming back here would deadlock.
        if self.owner.is_current() {
            warn_event!("factory re-entered its LockCell");
            return Err(FactoryError::Reentrant);
        }

        let _guard = self.acquire();

        // Second check, under the lock.
        if let Some(result) = self.published() {
            return result;
        }

        self.state
            .store(InitState::Initializing as u8, Ordering::Relaxed);
        let reset = ResetOnUnwind { state: &self.state };
        let claim = self.owner.claim();
        debug_event!(policy = %InitPolicy::LazySafeLock, "constructing singleton");

        let result = (self.factory)();
        match &result {
            Ok(_) => trace_event!(policy = %InitPolicy::LazySafeLock, "singleton ready"),
            Err(err) => warn_event!(policy = %InitPolicy::LazySafeLock, error = %err, "singleton factory failed"),
        }

        drop(claim);
        core::mem::forget(reset);
        // SAFETY: we hold the lock and the state is `Initializing`.
        unsafe { self.publish(result) };

        // SAFETY: just published a terminal state on this thread.
        let result = unsafe { (*self.slot.get()).assume_init_ref() };
        result.as_ref().map_err(FactoryError::clone)
    }
}

impl<T, F> Drop for LockCell<T, F> {
    fn drop(&mut self) {
        if InitState::from_u8(*self.state.get_mut()).is_terminal() {
            // SAFETY: terminal state means the slot holds a value; `&mut self` is exclusive.
            unsafe { self.slot.get_mut().assume_init_drop() };
        }
    }
}

impl<T, F> SingletonHolder<T> for LockCell<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    fn policy(&self) -> InitPolicy {
        InitPolicy::LazySafeLock
    }

    fn instance(&self) -> FactoryResult<&T> {
        LockCell::instance(self)
    }

    fn get(&self) -> Option<&T> {
        LockCell::get(self)
    }

    fn state(&self) -> InitState {
        LockCell::state(self)
    }
}

/// Puts the cell back to `Uninitialized` if the factory unwinds.
struct ResetOnUnwind<'a> {
    state: &'a AtomicU8,
}

impl Drop for ResetOnUnwind<'_> {
    fn drop(&mut self) {
        warn_event!(policy = %InitPolicy::LazySafeLock, "singleton factory panicked");
        self.state
            .store(InitState::Uninitialized as u8, Ordering::Relaxed);
    }
}
