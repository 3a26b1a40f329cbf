//! Lazy initialization with an unguarded check. **Do not use.**
//!
//! This is the naive "if empty, build and store" holder shared between
//! threads. Two callers arriving together can both see an empty slot, both
//! run the producer, and the later store replaces the earlier instance while
//! its first caller still holds it. The single-instance guarantee is gone.
//!
//! Memory safety is kept: the slot is atomic, and replaced instances are
//! leaked instead of freed, so every reference already returned stays valid.
//! What is lost is only the uniqueness. [`constructions`] reports how many
//! instances the race produced.
//!
//! [`constructions`]: RacyLazy::constructions

use super::*;
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize};

pub struct RacyLazy<P: Producer> {
    instance: AtomicPtr<P::Output>,
    producer: P,
    constructions: AtomicUsize,
    progress: Progress,
    _owns: PhantomData<Box<P::Output>>,
}

// SAFETY: instances are published through the atomic slot and shared by
// reference. The producer may run on several threads at once.
unsafe impl<P: Producer + Send> Send for RacyLazy<P> where P::Output: Send {}
unsafe impl<P: Producer + Sync> Sync for RacyLazy<P> where P::Output: Send + Sync {}

impl<P: Producer> RacyLazy<P> {
    pub const fn new(producer: P) -> Self {
        RacyLazy {
            instance: AtomicPtr::new(ptr::null_mut()),
            producer,
            constructions: AtomicUsize::new(0),
            progress: Progress::new(),
            _owns: PhantomData,
        }
    }

    pub fn get(&self) -> &P::Output {
        let current = self.instance.load(Ordering::Acquire);
        if !current.is_null() {
            // SAFETY: published pointers are never freed before `drop`.
            return unsafe { &*current };
        }

        // Nothing stops another caller from passing the check above until
        // the swap below.
        let construction = self.progress.begin::<P::Output>();
        let fresh = Box::into_raw(Box::new(self.producer.produce()));
        self.constructions.fetch_add(1, Ordering::Relaxed);
        let replaced = self.instance.swap(fresh, Ordering::AcqRel);
        construction.finish();

        if !replaced.is_null() {
            warn!("{} constructed twice, an earlier instance was overwritten", std::any::type_name::<P::Output>());
        }
        // SAFETY: see above.
        unsafe { &*fresh }
    }

    /// Number of instances built so far. Anything above one is the race.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }
}

impl<P: Producer> Holder for RacyLazy<P> {
    type Output = P::Output;

    fn get(&self) -> &P::Output {
        RacyLazy::get(self)
    }

    fn state(&self) -> State {
        // A racing constructor that unwinds must not hide an instance
        // another caller already published.
        if self.instance.load(Ordering::Acquire).is_null() {
            self.progress.state()
        } else {
            State::Ready
        }
    }
}

impl<P: Producer> Drop for RacyLazy<P> {
    fn drop(&mut self) {
        let instance = *self.instance.get_mut();
        if !instance.is_null() {
            // SAFETY: `&mut self`, no outstanding references. Replaced
            // instances are not reachable from here and stay leaked.
            drop(unsafe { Box::from_raw(instance) });
        }
    }
}
