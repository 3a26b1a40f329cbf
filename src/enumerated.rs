use super::*;
use std::io::{self, Write};

pub const MESSAGE: &str = "This is a singleton object.";

/// A closed type with exactly one value.
///
/// The compiler builds enum constants; there is no constructor to call twice
/// and nothing to synchronize. Reach it as `EnumSingleton::Instance`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum EnumSingleton {
    Instance,
}

impl EnumSingleton {
    /// Every value of the type.
    pub const VALUES: [EnumSingleton; 1] = [EnumSingleton::Instance];

    /// Prints [`MESSAGE`] on standard output.
    pub fn method(&self) -> io::Result<()> {
        self.write_to(&mut io::stdout().lock())
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            EnumSingleton::Instance => writeln!(out, "{}", MESSAGE),
        }
    }
}

impl Holder for EnumSingleton {
    type Output = EnumSingleton;

    fn get(&self) -> &EnumSingleton {
        self
    }

    fn state(&self) -> State {
        State::Ready
    }
}
