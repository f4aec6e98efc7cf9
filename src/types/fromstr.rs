use std::str::FromStr;

use crate::emulator::memory;
use crate::types::*;

error_chain! {
    errors {
        Opcode(s: String) {
            description("invalid instruction")
            display("invalid instruction: {}", s)
        }
    }
}

impl FromStr for Opcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Opcode> {
        let lower = s.to_lowercase();
        CATALOG.iter()
               .find(|op| op.symbol() == lower)
               .cloned()
               .ok_or_else(|| ErrorKind::Opcode(s.into()).into())
    }
}

impl From<usize> for TileRef {
    fn from(i: usize) -> TileRef {
        TileRef::Index(i)
    }
}

/// Numeric text names a tile index, anything else is a label.
impl<'a> From<&'a str> for TileRef {
    fn from(s: &'a str) -> TileRef {
        match s.parse() {
            Ok(i) => TileRef::Index(i),
            Err(_) => TileRef::Label(s.into()),
        }
    }
}

impl From<String> for TileRef {
    fn from(s: String) -> TileRef {
        match s.parse() {
            Ok(i) => TileRef::Index(i),
            Err(_) => TileRef::Label(s),
        }
    }
}

impl<'a> From<&'a str> for Destination {
    fn from(s: &'a str) -> Destination {
        match s.parse() {
            Ok(i) => Destination::Step(i),
            Err(_) => Destination::Label(s.into()),
        }
    }
}

/// Integers first, then single characters. `"7"` is the number seven.
impl FromStr for Value {
    type Err = memory::Error;

    fn from_str(s: &str) -> memory::Result<Value> {
        if let Ok(i) = s.parse() {
            return Ok(Value::Int(i));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => Err(memory::ErrorKind::CannotStoreInvalidType(s.into()).into()),
        }
    }
}
