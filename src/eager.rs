use super::*;
use std::ops::Deref;

/// Holder whose instance exists as soon as the holder does.
///
/// `new` is a `const fn`, so an `Eager` in a `static` is built by the
/// compiler: there is no first access to race on. An initializer that needs
/// a few statements is a `const` block expression:
///
/// ```
/// use lazy_singleton::Eager;
///
/// static TABLE: Eager<[u8; 4]> = Eager::new({
///     let mut table = [0; 4];
///     let mut i = 0;
///     while i < 4 {
///         table[i] = (i * i) as u8;
///         i += 1;
///     }
///     table
/// });
///
/// assert_eq!(&[0_u8, 1, 4, 9], TABLE.get());
/// ```
pub struct Eager<T>(T);

impl<T> Eager<T> {
    pub const fn new(value: T) -> Self {
        Eager(value)
    }

    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T> Deref for Eager<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Holder for Eager<T> {
    type Output = T;

    fn get(&self) -> &T {
        Eager::get(self)
    }

    fn state(&self) -> State {
        State::Ready
    }
}
