//! `EagerCell` — a value that exists before anyone can ask for it.

use crate::error::FactoryResult;
use crate::holder::SingletonHolder;
use crate::policy::{InitPolicy, InitState};

/// Eagerly initialized holder.
///
/// `new` is a `const fn`, so a `static EagerCell` is built at compile time
/// and is ready before the first instruction of `main`. No synchronization is
/// involved in reading it.
///
/// ```
/// use lazy_once::EagerCell;
///
/// static ANSWER: EagerCell<u32> = EagerCell::new(42);
/// assert!(std::ptr::eq(ANSWER.instance(), ANSWER.instance()));
/// ```
#[derive(Debug)]
#[repr(transparent)]
pub struct EagerCell<T> {
    value: T,
}

impl<T> EagerCell<T> {
    /// Wraps an already-built value.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Runs `factory` now and wraps its value.
    ///
    /// This is the runtime flavour of eager initialization: the failure goes
    /// to whoever builds the holder, before the holder can be shared.
    pub fn build<F>(factory: F) -> FactoryResult<Self>
    where
        F: FnOnce() -> FactoryResult<T>,
    {
        factory().map(Self::new)
    }

    /// The single instance.
    #[inline(always)]
    pub const fn instance(&self) -> &T {
        &self.value
    }

    /// Consumes the holder, returning the value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> SingletonHolder<T> for EagerCell<T> {
    fn policy(&self) -> InitPolicy {
        InitPolicy::Eager
    }

    fn instance(&self) -> FactoryResult<&T> {
        Ok(&self.value)
    }

    fn get(&self) -> Option<&T> {
        Some(&self.value)
    }

    fn state(&self) -> InitState {
        InitState::Ready
    }
}
