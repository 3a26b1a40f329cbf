use super::*;
use crossbeam_utils::thread;
use lazy_singleton::{Holder, State};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

const THREADS: usize = 100;

fn address<T>(value: &T) -> usize {
    value as *const T as usize
}

#[test]
fn concurrent_first_access_constructs_exactly_once() {
    contract::init_logging();
    let constructions = AtomicUsize::new(0);
    let holder = param(|| {
        constructions.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(10));
        vec![1, 2, 3]
    });
    let barrier = Barrier::new(THREADS);
    assert!(!holder.is_initialized());

    let (holder, barrier) = (&holder, &barrier);
    let addresses = thread::scope(|scope| {
        let handles = (0..THREADS)
            .map(|_| {
                scope.spawn(move |_| {
                    barrier.wait();
                    address(holder.get())
                })
            })
            .collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    })
    .unwrap();

    assert_eq!(1, constructions.load(Ordering::SeqCst));
    assert_eq!(THREADS, addresses.len());
    assert!(addresses.iter().all(|a| *a == address(holder.get())));
    assert_eq!(&vec![1, 2, 3], holder.get());
}

#[test]
fn multiple_threads_can_access_to_the_same_property() {
    use std::thread::spawn;

    let s = Arc::new(param(|| 42));

    let handles = (0..10)
        .map(|_| {
            let ss = s.clone();
            spawn(move || assert_eq!(&42, ss.get()))
        })
        .collect::<Vec<_>>();

    for h in handles {
        h.join().unwrap()
    }
}

#[test]
fn callers_see_initializing_while_the_producer_runs() {
    let entered = Barrier::new(2);
    let release = Barrier::new(2);
    let holder = param(|| {
        entered.wait();
        release.wait();
        42
    });

    let (holder, entered, release) = (&holder, &entered, &release);
    thread::scope(|scope| {
        let getter = scope.spawn(move |_| *holder.get());

        entered.wait();
        assert_eq!(State::Initializing, holder.state());
        release.wait();

        assert_eq!(42, getter.join().unwrap());
    })
    .unwrap();

    assert_eq!(State::Ready, holder.state());
}

#[test]
fn state_is_ready_as_soon_as_a_caller_holds_the_instance() {
    let barrier = Barrier::new(THREADS);
    let holder = param(|| {
        std::thread::sleep(Duration::from_millis(5));
        42
    });

    let (holder, barrier) = (&holder, &barrier);
    let states = thread::scope(|scope| {
        let handles = (0..THREADS)
            .map(|_| {
                scope.spawn(move |_| {
                    barrier.wait();
                    holder.get();
                    holder.state()
                })
            })
            .collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    })
    .unwrap();

    assert!(states.iter().all(|state| *state == State::Ready));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn interleaved_gets_always_see_one_instance(calls in prop::collection::vec(1usize..50, 1..8)) {
        let constructions = AtomicUsize::new(0);
        let holder = param(|| {
            constructions.fetch_add(1, Ordering::SeqCst);
            String::from("shared")
        });

        let holder = &holder;
        let seen = thread::scope(|scope| {
            let handles = calls
                .iter()
                .map(|&n| scope.spawn(move |_| (0..n).map(|_| address(holder.get())).collect::<Vec<_>>()))
                .collect::<Vec<_>>();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect::<Vec<_>>()
        })
        .unwrap();

        prop_assert_eq!(1, constructions.load(Ordering::SeqCst));
        prop_assert_eq!(calls.iter().sum::<usize>(), seen.len());
        prop_assert!(seen.iter().all(|a| *a == address(holder.get())));
    }
}
