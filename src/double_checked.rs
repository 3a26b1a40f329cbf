//! Double-checked locking.
//!
//! The slot is an [`AtomicPtr`], never a plain field. The constructing thread
//! publishes the pointer with a `Release` store after the instance is fully
//! built, and the lock-free fast path reads it with an `Acquire` load. That
//! pair is what makes every write done by the producer visible to a reader
//! that sees a non-null pointer. With relaxed or plain accesses a reader could
//! observe the pointer before the fields it points to.

use super::*;
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::AtomicPtr;
use std::sync::{Mutex, PoisonError};

pub struct DoubleChecked<P: Producer> {
    instance: AtomicPtr<P::Output>,
    lock: Mutex<()>,
    producer: P,
    progress: Progress,
    _owns: PhantomData<Box<P::Output>>,
}

// SAFETY: the instance is built by whichever thread wins the lock and then
// shared by reference with all of them, so it must be both `Send` and `Sync`.
// The producer only runs under the lock.
unsafe impl<P: Producer + Send> Send for DoubleChecked<P> where P::Output: Send {}
unsafe impl<P: Producer + Send> Sync for DoubleChecked<P> where P::Output: Send + Sync {}

impl<P: Producer> DoubleChecked<P> {
    pub const fn new(producer: P) -> Self {
        DoubleChecked {
            instance: AtomicPtr::new(ptr::null_mut()),
            lock: Mutex::new(()),
            producer,
            progress: Progress::new(),
            _owns: PhantomData,
        }
    }

    pub fn get(&self) -> &P::Output {
        let instance = self.instance.load(Ordering::Acquire);
        if !instance.is_null() {
            // SAFETY: non-null pointers come from `Box::into_raw` in
            // `get_slow` and are freed only by `drop`.
            return unsafe { &*instance };
        }
        self.get_slow()
    }

    #[cold]
    fn get_slow(&self) -> &P::Output {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        trace!("lock acquired");
        // Somebody may have published while we queued on the lock.
        let mut instance = self.instance.load(Ordering::Acquire);
        if instance.is_null() {
            let construction = self.progress.begin::<P::Output>();
            instance = Box::into_raw(Box::new(self.producer.produce()));
            construction.finish();
            self.instance.store(instance, Ordering::Release);
        }
        // SAFETY: see `get`.
        unsafe { &*instance }
    }
}

impl<P: Producer> Holder for DoubleChecked<P> {
    type Output = P::Output;

    fn get(&self) -> &P::Output {
        DoubleChecked::get(self)
    }

    fn state(&self) -> State {
        self.progress.state()
    }
}

impl<P: Producer> Drop for DoubleChecked<P> {
    fn drop(&mut self) {
        let instance = *self.instance.get_mut();
        if !instance.is_null() {
            // SAFETY: `&mut self` means no reference handed out by `get` is alive.
            drop(unsafe { Box::from_raw(instance) });
        }
    }
}
