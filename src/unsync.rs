//! Lazy holder without any synchronization.
//!
//! The check-then-construct in [`Lazy::get`] is not atomic, so the type is
//! deliberately `!Sync`: the compiler refuses to share it between threads.
//! Put it in a `thread_local!` or keep it on one thread. [`RacyLazy`] shows
//! what the same algorithm does once threads do share it.
//!
//! [`RacyLazy`]: crate::RacyLazy

use super::*;
use std::cell::UnsafeCell;

/// Not shareable between threads:
///
/// ```compile_fail
/// use lazy_singleton::unsync::Lazy;
///
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<Lazy<fn() -> i32>>();
/// ```
pub struct Lazy<P: Producer> {
    value: UnsafeCell<Option<P::Output>>,
    producer: P,
    progress: Progress,
}

impl<P: Producer> Lazy<P> {
    pub const fn new(producer: P) -> Self {
        Lazy { value: UnsafeCell::new(None), producer, progress: Progress::new() }
    }

    /// # Panics
    ///
    /// If the producer calls back into `get` of the holder it is building.
    pub fn get(&self) -> &P::Output {
        // SAFETY: `Lazy` is `!Sync`; the slot is only written while empty,
        // and no reference into an empty slot can exist.
        if let Some(value) = unsafe { &*self.value.get() } {
            return value;
        }
        if self.progress.state() == State::Initializing {
            panic!("lazy value re-entered its own producer");
        }

        let construction = self.progress.begin::<P::Output>();
        let value = self.producer.produce();
        unsafe { *self.value.get() = Some(value) };
        construction.finish();

        match unsafe { &*self.value.get() } {
            Some(value) => value,
            None => unsafe { debug_unreachable!() },
        }
    }
}

impl<P: Producer> Holder for Lazy<P> {
    type Output = P::Output;

    fn get(&self) -> &P::Output {
        Lazy::get(self)
    }

    fn state(&self) -> State {
        self.progress.state()
    }
}
