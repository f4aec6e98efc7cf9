use std::fmt;

use crate::types::*;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Char(c) => write!(f, "{}", c),
        }
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TileRef::Index(i) => write!(f, "{}", i),
            TileRef::Label(ref l) => write!(f, "{}", l),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.indirect {
            write!(f, "[{}]", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Destination::Step(s) => write!(f, "{:03}", s),
            Destination::Label(ref l) => write!(f, "{}", l),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = self.opcode();
        if let Some(tile) = self.tile() {
            write!(f, "{} {}", op, tile)
        } else if let Some(dest) = self.destination() {
            write!(f, "{} {}", op, dest)
        } else {
            write!(f, "{}", op)
        }
    }
}

/// Like `Display`, but letters are quoted so `'5'` and `5` differ.
pub fn repr(value: &Value) -> String {
    match *value {
        Value::Int(i) => i.to_string(),
        Value::Char(c) => format!("'{}'", c),
    }
}

pub fn repr_list<'a, I: IntoIterator<Item = &'a Value>>(values: I) -> String {
    let values: Vec<String> = values.into_iter().map(repr).collect();
    format!("[{}]", values.join(", "))
}
