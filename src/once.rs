//! Call-once initialization.
//!
//! [`OnceHolder`] delegates the "exactly once, everybody else waits" part to
//! [`OnceLock`]. The [`singleton!`](crate::singleton) macro wraps one in a
//! function-local `static`, so nothing is built until the function is first
//! called.

use super::*;
use std::sync::OnceLock;

pub struct OnceHolder<P: Producer> {
    cell: OnceLock<P::Output>,
    producer: P,
    progress: Progress,
}

impl<P: Producer> OnceHolder<P> {
    pub const fn new(producer: P) -> Self {
        OnceHolder { cell: OnceLock::new(), producer, progress: Progress::new() }
    }

    pub fn get(&self) -> &P::Output {
        if let Some(value) = self.cell.get() {
            return value;
        }
        self.cell.get_or_init(|| {
            let construction = self.progress.begin::<P::Output>();
            let value = self.producer.produce();
            construction.finish();
            value
        })
    }
}

impl<P: Producer> Holder for OnceHolder<P> {
    type Output = P::Output;

    fn get(&self) -> &P::Output {
        OnceHolder::get(self)
    }

    fn state(&self) -> State {
        self.progress.state()
    }
}

/// Declares functions returning a lazily built `&'static` instance.
///
/// ```
/// use lazy_singleton::singleton;
///
/// singleton! {
///     pub fn greeting() -> String = "hello".repeat(2);
/// }
///
/// assert_eq!("hellohello", greeting().as_str());
/// assert!(std::ptr::eq(greeting(), greeting()));
/// ```
#[macro_export]
macro_rules! singleton {
    ($(#[$attr:meta])* $vis:vis fn $name:ident() -> $ty:ty = $init:expr; $($next:tt)*) => {
        $(#[$attr])*
        $vis fn $name() -> &'static $ty {
            fn build() -> $ty {
                $init
            }
            static HOLDER: $crate::OnceHolder<fn() -> $ty> = $crate::OnceHolder::new(build as fn() -> $ty);
            HOLDER.get()
        }
        $crate::singleton! { $($next)* }
    };
    () => {};
}
