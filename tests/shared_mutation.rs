//! A write through one reference is visible through every other reference,
//! one test per demo singleton.

use lazy_once::demo;

#[test]
fn test_lazy_unsafe_single_threaded_mutation_is_shared() {
    let instance1 = demo::lazy_unsafe().unwrap();
    let instance2 = demo::lazy_unsafe().unwrap();
    println!("{}\n{}", instance1.host(), instance2.host());

    instance1.set_host("helloworld");
    println!("{}\n{}", instance1.host(), instance2.host());

    assert_eq!(instance1.host(), instance2.host());
    assert_eq!(demo::lazy_unsafe_discarded_instances(), 0);
}

#[test]
fn test_eager_safe_static_mutation_is_shared() {
    let instance1 = demo::eager_safe_static();
    let instance2 = demo::eager_safe_static();
    println!("{}\n{}", instance1.host(), instance2.host());

    instance1.set_host("helloworld");
    println!("{}\n{}", instance1.host(), instance2.host());

    assert_eq!(instance1.host(), instance2.host());
    assert_eq!(instance2.host(), "helloworld");
}

#[test]
fn test_lazy_safe_mutation_is_shared() {
    let instance1 = demo::lazy_safe().unwrap();
    let instance2 = demo::lazy_safe().unwrap();
    println!("{}", instance1.data().port());

    instance2.data().set_port("5678");
    println!("{}", instance1.data().port());

    assert_eq!(instance1.data().port(), "5678");
}

#[test]
fn test_lazy_safe_lock_mutation_from_another_thread() {
    let instance1 = demo::lazy_safe_lock().unwrap();

    std::thread::spawn(|| demo::lazy_safe_lock().unwrap().set_port("6543"))
        .join()
        .unwrap();

    assert_eq!(instance1.port(), "6543");
}
