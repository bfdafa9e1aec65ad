//! `RacyCell` — lazy initialization with an unguarded check-then-create.
//!
//! This holder keeps the classic singleton bug on purpose: two threads that
//! both find the cell empty both run the factory, and both publish. Callers
//! can end up with different instances. What it does not give up is memory
//! safety: the instance pointer is atomic, publication is Release/Acquire,
//! and an instance that loses the race is leaked instead of freed because the
//! thread that built it still holds a reference.

use core::marker::PhantomData;
use core::ptr;
use core::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::diagnostics::{debug_event, warn_event};
use crate::error::FactoryResult;
use crate::holder::SingletonHolder;
use crate::policy::{InitPolicy, InitState};

/// Lazily initialized holder with no construction guard.
///
/// Factory failures are returned to the caller and nothing is cached, so the
/// next call runs the factory again.
pub struct RacyCell<T, F = fn() -> FactoryResult<T>> {
    instance: CachePadded<AtomicPtr<T>>,
    building: AtomicUsize,
    discarded: AtomicUsize,
    factory: F,
    _owns: PhantomData<Box<T>>,
}

// SAFETY: instances are heap allocations published through an atomic pointer
// with Release and read with Acquire; shared access hands out `&T` across
// threads and the holder may drop a value built elsewhere.
unsafe impl<T: Send + Sync, F: Sync> Sync for RacyCell<T, F> {}

impl<T, F> RacyCell<T, F> {
    /// Creates an empty cell that will call `factory` on first access.
    pub const fn new(factory: F) -> Self {
        Self {
            instance: CachePadded::new(AtomicPtr::new(ptr::null_mut())),
            building: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
            factory,
            _owns: PhantomData,
        }
    }

    /// The currently published instance, if any. Never runs the factory.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        let current = self.instance.load(Ordering::Acquire);
        // SAFETY: non-null pointers come from `Box::into_raw` and are never freed while `self` lives.
        unsafe { current.as_ref() }
    }

    /// `Ready` once any instance has been published; before that,
    /// `Initializing` while at least one factory call is in flight.
    ///
    /// Never `Failed`: failures are not cached.
    pub fn state(&self) -> InitState {
        if !self.instance.load(Ordering::Acquire).is_null() {
            InitState::Ready
        } else if self.building.load(Ordering::Relaxed) > 0 {
            InitState::Initializing
        } else {
            InitState::Uninitialized
        }
    }

    /// How many published instances were overwritten by a racing construction.
    ///
    /// Zero means the singleton held so far. Each overwritten instance is leaked.
    pub fn discarded_instances(&self) -> usize {
        self.discarded.load(Ordering::Relaxed)
    }
}

impl<T, F> RacyCell<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    /// The instance, building one if the cell looks empty.
    pub fn instance(&self) -> FactoryResult<&T> {
        if let Some(value) = self.get() {
            return Ok(value);
        }

        // Unguarded: any number of threads can be here at once.
        debug_event!(policy = %InitPolicy::LazyUnsafe, "constructing singleton");
        let value = {
            let _building = InFlight::enter(&self.building);
            (self.factory)()?
        };
        let fresh = Box::into_raw(Box::new(value));
        let previous = self.instance.swap(fresh, Ordering::AcqRel);
        if !previous.is_null() {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            warn_event!(policy = %InitPolicy::LazyUnsafe, "racing construction replaced a published instance");
        }

        // SAFETY: `fresh` came from `Box::into_raw` above and is never freed while `self` lives.
        Ok(unsafe { &*fresh })
    }
}

/// Counts a factory call as in flight until dropped, unwinding included.
struct InFlight<'a> {
    count: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::Relaxed);
        Self { count }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::Relaxed);
    }
}

impl<T, F> Drop for RacyCell<T, F> {
    fn drop(&mut self) {
        let current = *self.instance.get_mut();
        if !current.is_null() {
            // SAFETY: the published pointer came from `Box::into_raw`; `&mut self` is exclusive.
            drop(unsafe { Box::from_raw(current) });
        }
    }
}

impl<T, F> SingletonHolder<T> for RacyCell<T, F>
where
    F: Fn() -> FactoryResult<T>,
{
    fn policy(&self) -> InitPolicy {
        InitPolicy::LazyUnsafe
    }

    fn instance(&self) -> FactoryResult<&T> {
        RacyCell::instance(self)
    }

    fn get(&self) -> Option<&T> {
        RacyCell::get(self)
    }

    fn state(&self) -> InitState {
        RacyCell::state(self)
    }
}
