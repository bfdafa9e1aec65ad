use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_once::{demo, FactoryResult, InitPolicy, LazyOnce, SingletonHolder};
use std::sync::{Mutex, OnceLock};
use std::thread;

fn build() -> FactoryResult<u64> {
    Ok(5432)
}

/// Ready-path cost of each policy, single thread.
fn bench_ready_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("ready_access");

    for policy in InitPolicy::ALL {
        let factory: fn() -> FactoryResult<u64> = build;
        let Ok(holder) = LazyOnce::with_policy(policy, factory) else {
            continue;
        };
        let _ = holder.instance();

        group.bench_function(policy.name(), |b| {
            b.iter(|| black_box(holder.instance().map(|v| *v)));
        });
    }

    group.bench_function("demo_lazy_safe_lock", |b| {
        b.iter(|| black_box(demo::lazy_safe_lock().map(|s| s.database_name().len())));
    });

    // What double-checked locking saves: locking on every access.
    let always_locked: Mutex<Option<u64>> = Mutex::new(None);
    group.bench_function("std_mutex_every_access", |b| {
        b.iter(|| {
            let mut guard = always_locked.lock().unwrap();
            black_box(*guard.get_or_insert(5432))
        });
    });

    let once = OnceLock::new();
    group.bench_function("std_once_lock", |b| {
        b.iter(|| black_box(*once.get_or_init(|| 5432_u64)));
    });

    group.finish();
}

/// Ready-path access from several threads at once.
fn bench_contended_access(c: &mut Criterion) {
    const THREADS: usize = 4;
    const READS: usize = 1_000;
    let mut group = c.benchmark_group("contended_access");

    for policy in InitPolicy::ALL.into_iter().filter(|p| p.is_thread_safe()) {
        let factory: fn() -> FactoryResult<u64> = build;
        let Ok(holder) = LazyOnce::with_policy(policy, factory) else {
            continue;
        };
        let _ = holder.instance();
        let holder = &holder;

        group.bench_function(policy.name(), |b| {
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..THREADS {
                        s.spawn(move || {
                            for _ in 0..READS {
                                black_box(holder.instance().map(|v| *v)).ok();
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ready_access, bench_contended_access);
criterion_main!(benches);
