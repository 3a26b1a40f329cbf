//! Holders that keep exactly one instance of a value, each with its own
//! initialization strategy:
//!
//! * [`Eager`]: built before anyone can observe the holder.
//! * [`unsync::Lazy`]: built on first access, single thread only.
//! * [`RacyLazy`]: built on first access with an unguarded check. Broken on purpose.
//! * [`Locked`]: built on first access, every access takes the lock.
//! * [`DoubleChecked`]: lock-free fast path, locked and re-checked slow path.
//! * [`OnceHolder`] and [`singleton!`]: call-once initialization.
//! * [`EnumSingleton`]: a closed enum with a single constant.
//!
//! Every holder implements [`Holder`], so code that needs the instance can
//! take the provider as a parameter instead of reaching for a global.

#[macro_use(debug_unreachable)]
extern crate debug_unreachable;

#[macro_use]
extern crate log;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};

mod error;

pub mod double_checked;
pub mod eager;
pub mod enumerated;
pub mod locked;
pub mod once;
pub mod racy;
pub mod unsync;

pub use double_checked::DoubleChecked;
pub use eager::Eager;
pub use enumerated::EnumSingleton;
pub use error::ConstructionError;
pub use locked::Locked;
pub use once::OnceHolder;
pub use racy::RacyLazy;

pub trait Producer {
    type Output;

    fn produce(&self) -> Self::Output;
}

impl<V, F: Fn() -> V> Producer for F {
    type Output = V;

    fn produce(&self) -> V {
        self()
    }
}

/// Where a holder is in its one-way initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Uninitialized,
    Initializing,
    Ready,
}

/// Provider of a single shared instance.
pub trait Holder {
    type Output;

    /// Returns the instance, constructing it first if this holder is lazy
    /// and nobody has asked before.
    fn get(&self) -> &Self::Output;

    fn state(&self) -> State;

    fn is_initialized(&self) -> bool {
        self.state() == State::Ready
    }

    /// Like [`get`](Holder::get), but a panicking producer is reported as
    /// [`ConstructionError::Panicked`] instead of unwinding into the caller.
    /// The holder stays uninitialized and the next call tries again.
    fn try_get(&self) -> Result<&Self::Output, ConstructionError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.get())).map_err(ConstructionError::from_panic)
    }
}

struct Field<P: Producer> {
    value: Option<P::Output>,
    producer: P,
}

impl<P: Producer> Field<P> {
    const fn new(producer: P) -> Self {
        Field { value: None, producer }
    }

    fn compute(&mut self) {
        self.value = Some(self.producer.produce())
    }
}

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

/// Observable progress of a lazy holder.
struct Progress(AtomicU8);

impl Progress {
    const fn new() -> Self {
        Progress(AtomicU8::new(UNINITIALIZED))
    }

    fn state(&self) -> State {
        match self.0.load(Ordering::Acquire) {
            UNINITIALIZED => State::Uninitialized,
            INITIALIZING => State::Initializing,
            _ => State::Ready,
        }
    }

    fn begin<T>(&self) -> Construction<'_> {
        debug!("constructing {}", std::any::type_name::<T>());
        self.0.store(INITIALIZING, Ordering::Release);
        Construction { progress: self, finished: false }
    }
}

/// Marks a construction in flight. Dropping it without [`finish`] (the
/// producer unwound) puts the holder back to uninitialized.
///
/// [`finish`]: Construction::finish
struct Construction<'a> {
    progress: &'a Progress,
    finished: bool,
}

impl Construction<'_> {
    fn finish(mut self) {
        self.progress.0.store(READY, Ordering::Release);
        self.finished = true;
        debug!("instance ready");
    }
}

impl Drop for Construction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("producer unwound, holder left uninitialized");
            self.progress.0.store(UNINITIALIZED, Ordering::Release);
        }
    }
}
