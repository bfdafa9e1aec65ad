//! Singleton Policy Tour
//!
//! Walks the four demo singletons, printing hosts before and after a write
//! through one of two references, then races the unsafe one.

use lazy_once::{demo, FactoryResult};
use std::collections::HashSet;
use std::panic;
use std::sync::Barrier;
use std::thread;

fn main() -> FactoryResult<()> {
    println!("Singleton Policy Tour");
    println!("=====================");

    println!("\n1. Eager (built at compile time):");
    let instance1 = demo::eager_safe_static();
    let instance2 = demo::eager_safe_static();
    println!("  {}\n  {}", instance1.host(), instance2.host());
    instance1.set_host("helloworld");
    println!("  {}\n  {}", instance1.host(), instance2.host());

    println!("\n2. Lazy, OnceLock:");
    let instance1 = demo::lazy_safe()?;
    let instance2 = demo::lazy_safe()?;
    println!("  {}", instance1.data().port());
    instance2.data().set_port("5678");
    println!("  {}", instance1.data().port());

    println!("\n3. Lazy, double-checked locking:");
    let instance1 = demo::lazy_safe_lock()?;
    let instance2 = demo::lazy_safe_lock()?;
    println!("  {}\n  {}", instance1.host(), instance2.host());
    instance1.set_host("helloworld");
    println!("  {}\n  {}", instance1.host(), instance2.host());

    println!("\n4. Lazy, unguarded (8 threads on first access):");
    let barrier = Barrier::new(8);
    let identities: HashSet<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    demo::lazy_unsafe().map(|settings| std::ptr::from_ref(settings) as usize)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect::<FactoryResult<_>>()
    })?;
    println!(
        "  distinct instances: {}, discarded: {}",
        identities.len(),
        demo::lazy_unsafe_discarded_instances()
    );

    Ok(())
}
