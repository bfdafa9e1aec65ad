//! Tracks which thread is running a holder's factory, so a factory that
//! reads its own holder fails fast instead of deadlocking.

use core::sync::atomic::{AtomicUsize, Ordering};

const NO_OWNER: usize = 0;

thread_local! {
    static THREAD_KEY: u8 = const { 0 };
}

/// Address of this thread's marker. Unique among live threads and never zero.
#[inline]
fn current_thread_key() -> usize {
    THREAD_KEY.with(|marker| core::ptr::from_ref(marker) as usize)
}

pub(crate) struct InitOwner {
    key: AtomicUsize,
}

impl InitOwner {
    pub(crate) const fn new() -> Self {
        Self {
            key: AtomicUsize::new(NO_OWNER),
        }
    }

    /// Records the calling thread as the initializer until the claim drops.
    ///
    /// Callers must already be the only initializer (inside the `OnceLock`
    /// closure or holding the holder's mutex).
    pub(crate) fn claim(&self) -> OwnerClaim<'_> {
        self.key.store(current_thread_key(), Ordering::Relaxed);
        OwnerClaim { owner: self }
    }

    /// `true` if the calling thread holds the claim.
    ///
    /// Only the claiming thread can write its own key, so a relaxed load is
    /// enough to see it.
    #[inline]
    pub(crate) fn is_current(&self) -> bool {
        self.key.load(Ordering::Relaxed) == current_thread_key()
    }

    /// Advisory: some thread is running the factory right now.
    #[inline]
    pub(crate) fn is_claimed(&self) -> bool {
        self.key.load(Ordering::Relaxed) != NO_OWNER
    }
}

/// Clears the owner on drop, including during unwinding out of a factory.
pub(crate) struct OwnerClaim<'a> {
    owner: &'a InitOwner,
}

impl Drop for OwnerClaim<'_> {
    fn drop(&mut self) {
        self.owner.key.store(NO_OWNER, Ordering::Relaxed);
    }
}
