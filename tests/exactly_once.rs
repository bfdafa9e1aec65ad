//! The thread-safe policies run their factory exactly once, however many
//! threads race on the first access.

use lazy_once::{FactoryError, FactoryResult, InitPolicy, LazyOnce, LockCell, SingletonHolder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;

struct Payload {
    serial: usize,
}

/// Races `THREADS` first accesses on a fresh holder; returns (factory calls, addresses, serials).
fn race_first_access(policy: InitPolicy) -> (usize, Vec<usize>, Vec<usize>) {
    let calls = AtomicUsize::new(0);
    let holder = LazyOnce::with_policy(policy, || {
        let serial = calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(5));
        Ok::<_, FactoryError>(Payload { serial })
    })
    .unwrap();
    let barrier = Barrier::new(THREADS);

    let seen: Vec<(usize, usize)> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let payload = holder.instance().unwrap();
                    (std::ptr::from_ref(payload) as usize, payload.serial)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let (addrs, serials) = seen.into_iter().unzip();
    (calls.load(Ordering::SeqCst), addrs, serials)
}

#[test]
fn test_thread_safe_policies_construct_exactly_once() {
    for policy in InitPolicy::ALL.into_iter().filter(|p| p.is_thread_safe()) {
        let (calls, addrs, serials) = race_first_access(policy);
        assert_eq!(calls, 1, "{policy} ran its factory {calls} times");
        assert!(addrs.iter().all(|&a| a == addrs[0]), "{policy} handed out different instances");
        assert!(serials.iter().all(|&s| s == 0), "{policy} exposed a later construction");
    }
}

fn counted_settings() -> FactoryResult<Vec<String>> {
    STATIC_CALLS.fetch_add(1, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(5));
    Ok(vec![String::from("localhost"), String::from("5432")])
}

static STATIC_CALLS: AtomicUsize = AtomicUsize::new(0);
static STATIC_HOLDER: LockCell<Vec<String>> = LockCell::new(counted_settings);

#[test]
fn test_static_lock_cell_constructs_exactly_once() {
    let barrier = Barrier::new(THREADS);
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                assert_eq!(STATIC_HOLDER.instance().unwrap()[1], "5432");
            });
        }
    });

    assert_eq!(STATIC_CALLS.load(Ordering::SeqCst), 1);
    assert!(STATIC_HOLDER.get().is_some());
}

#[test]
fn test_ready_holders_never_rebuild() {
    for policy in InitPolicy::ALL {
        let calls = AtomicUsize::new(0);
        let holder = LazyOnce::with_policy(policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FactoryError>(0_u64)
        })
        .unwrap();

        for _ in 0..100 {
            holder.instance().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1, "{policy}");
    }
}
