mod fmt;
mod fromstr;

use std::convert::TryFrom;

use crate::emulator::memory;

pub use self::fmt::{repr, repr_list};
pub use self::fromstr::{Error as ParseError, ErrorKind as ParseErrorKind};

/// Anything a tile, the accumulator or one of the boxes can hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawValue")]
pub enum Value {
    Int(i64),
    Char(char),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            Value::Char(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Value {
        Value::Char(c)
    }
}

/// A value as it comes out of a floor description, before the type guard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Text(String),
}

impl TryFrom<RawValue> for Value {
    type Error = memory::Error;

    fn try_from(raw: RawValue) -> Result<Value, memory::Error> {
        match raw {
            RawValue::Int(i) => Ok(Value::Int(i)),
            RawValue::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(memory::ErrorKind::CannotStoreInvalidType(s).into()),
                }
            }
        }
    }
}

/// How an instruction names a tile: by number or by label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileRef {
    Index(usize),
    Label(String),
}

/// Tile operand of the memory instructions. `indirect` is the `[x]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub key: TileRef,
    pub indirect: bool,
}

impl Tile {
    pub fn direct<K: Into<TileRef>>(key: K) -> Tile {
        Tile {
            key: key.into(),
            indirect: false,
        }
    }

    pub fn indirect<K: Into<TileRef>>(key: K) -> Tile {
        Tile {
            key: key.into(),
            indirect: true,
        }
    }
}

/// Target of a jump, resolved against the jump table when the jump runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Step(usize),
    Label(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    NoOp,
    MoveFromInbox,
    MoveToOutbox,
    CopyFrom,
    CopyTo,
    Add,
    Subtract,
    BumpUp,
    BumpDown,
    Jump,
    JumpIfZero,
    JumpIfNegative,
}

pub const CATALOG: [Opcode; 12] = [
    Opcode::NoOp,
    Opcode::MoveFromInbox,
    Opcode::MoveToOutbox,
    Opcode::CopyFrom,
    Opcode::CopyTo,
    Opcode::Add,
    Opcode::Subtract,
    Opcode::BumpUp,
    Opcode::BumpDown,
    Opcode::Jump,
    Opcode::JumpIfZero,
    Opcode::JumpIfNegative,
];

impl Opcode {
    /// Assembler symbol, also used when printing.
    pub fn symbol(&self) -> &'static str {
        match *self {
            Opcode::NoOp => "no_op",
            Opcode::MoveFromInbox => "move_from_inbox",
            Opcode::MoveToOutbox => "move_to_outbox",
            Opcode::CopyFrom => "copy_from",
            Opcode::CopyTo => "copy_to",
            Opcode::Add => "add",
            Opcode::Subtract => "subtract",
            Opcode::BumpUp => "bump_up",
            Opcode::BumpDown => "bump_down",
            Opcode::Jump => "jump_to",
            Opcode::JumpIfZero => "jump_if_zero_to",
            Opcode::JumpIfNegative => "jump_if_negative_to",
        }
    }

    pub fn has_argument(&self) -> bool {
        match *self {
            Opcode::NoOp | Opcode::MoveFromInbox | Opcode::MoveToOutbox => false,
            _ => true,
        }
    }

    pub fn is_jump(&self) -> bool {
        match *self {
            Opcode::Jump | Opcode::JumpIfZero | Opcode::JumpIfNegative => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    NoOp,
    MoveFromInbox,
    MoveToOutbox,
    CopyFrom(Tile),
    CopyTo(Tile),
    Add(Tile),
    Subtract(Tile),
    BumpUp(Tile),
    BumpDown(Tile),
    Jump(Destination),
    JumpIfZero(Destination),
    JumpIfNegative(Destination),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match *self {
            Instruction::NoOp => Opcode::NoOp,
            Instruction::MoveFromInbox => Opcode::MoveFromInbox,
            Instruction::MoveToOutbox => Opcode::MoveToOutbox,
            Instruction::CopyFrom(_) => Opcode::CopyFrom,
            Instruction::CopyTo(_) => Opcode::CopyTo,
            Instruction::Add(_) => Opcode::Add,
            Instruction::Subtract(_) => Opcode::Subtract,
            Instruction::BumpUp(_) => Opcode::BumpUp,
            Instruction::BumpDown(_) => Opcode::BumpDown,
            Instruction::Jump(_) => Opcode::Jump,
            Instruction::JumpIfZero(_) => Opcode::JumpIfZero,
            Instruction::JumpIfNegative(_) => Opcode::JumpIfNegative,
        }
    }

    pub fn tile(&self) -> Option<&Tile> {
        match *self {
            Instruction::CopyFrom(ref t) |
            Instruction::CopyTo(ref t) |
            Instruction::Add(ref t) |
            Instruction::Subtract(ref t) |
            Instruction::BumpUp(ref t) |
            Instruction::BumpDown(ref t) => Some(t),
            _ => None,
        }
    }

    pub fn destination(&self) -> Option<&Destination> {
        match *self {
            Instruction::Jump(ref d) |
            Instruction::JumpIfZero(ref d) |
            Instruction::JumpIfNegative(ref d) => Some(d),
            _ => None,
        }
    }

    pub fn is_conditional_jump(&self) -> bool {
        match *self {
            Instruction::JumpIfZero(_) | Instruction::JumpIfNegative(_) => true,
            _ => false,
        }
    }
}
