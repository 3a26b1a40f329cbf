use super::*;
use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};

/// Lazy holder that takes its lock on every `get`, before and after the
/// instance exists.
///
/// Construction is totally ordered with respect to every caller, at the
/// price of one lock round-trip per access. [`DoubleChecked`] removes that
/// cost once the instance is ready.
///
/// [`DoubleChecked`]: crate::DoubleChecked
pub struct Locked<P: Producer> {
    field: Mutex<Field<P>>,
    progress: Progress,
    // References escape the lock, so sharing the holder shares `P::Output`.
    _shared: PhantomData<P::Output>,
}

impl<P: Producer> Locked<P> {
    pub const fn new(producer: P) -> Self {
        Locked { field: Mutex::new(Field::new(producer)), progress: Progress::new(), _shared: PhantomData }
    }

    pub fn get(&self) -> &P::Output {
        let mut field = self.field.lock().unwrap_or_else(|poisoned| {
            warn!("recovering lock poisoned by a failed construction");
            PoisonError::into_inner(poisoned)
        });
        trace!("lock acquired");
        if field.value.is_none() {
            let construction = self.progress.begin::<P::Output>();
            field.compute();
            construction.finish();
        }
        match field.value {
            // SAFETY: the value is written once and never moved or replaced
            // while `self` is alive, so the reference outlives the guard.
            Some(ref value) => unsafe { &*(value as *const P::Output) },
            None => unsafe { debug_unreachable!() },
        }
    }
}

impl<P: Producer> Holder for Locked<P> {
    type Output = P::Output;

    fn get(&self) -> &P::Output {
        Locked::get(self)
    }

    fn state(&self) -> State {
        self.progress.state()
    }
}
