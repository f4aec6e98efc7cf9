//! Text to program.
//!
//! The source is line oriented. Each line is, after removing everything from
//! `#` on and the surrounding whitespace, one of:
//!
//! - nothing, and is skipped;
//! - a label `NAME:`, which names the step of the next instruction;
//! - an instruction `opcode`, `opcode arg` or `opcode [arg]`.
//!
//! Numeric arguments become tile indexes or step numbers, anything else is
//! kept as a name and resolved when the program runs.

pub mod parser;
pub mod types;

use std::fs;
use std::path::Path;

use crate::types::{Destination, Instruction, Opcode, Tile, TileRef};
use self::parser::{Argument, ParsedLine};
pub use self::types::{JumpTable, Program};

error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        UnknownInstruction(line: usize, text: String) {
            description("unknown instruction")
            display("Unknown instruction, line {}: \"{}\"", line, text)
        }
        ArgumentRequired(line: usize, text: String) {
            description("instruction requires argument")
            display("Instruction requires argument, line {}: \"{}\"", line, text)
        }
        UnexpectedArgument(line: usize, text: String) {
            description("unexpected argument")
            display("Unexpected argument, line {}: \"{}\"", line, text)
        }
        SyntaxError(line: usize, text: String) {
            description("syntax error")
            display("Syntax error, line {}: \"{}\"", line, text)
        }
    }
}

pub fn assemble_file<P: AsRef<Path>>(path: P) -> Result<(Program, JumpTable)> {
    let source = fs::read_to_string(path)?;
    assemble(&source)
}

pub fn assemble(source: &str) -> Result<(Program, JumpTable)> {
    let mut program = Program::new();
    let mut jump_table = JumpTable::new();

    for (i, raw) in source.lines().enumerate() {
        let line_number = i + 1;
        let line = parser::clean(raw);
        if line.is_empty() {
            continue;
        }

        match parser::parse_line(line) {
            Some(ParsedLine::Label(label)) => {
                if let Some(old) = jump_table.insert(label, program.len()) {
                    warn!("line {}: label {} redefined (was step {})",
                          line_number, label, old);
                }
            }
            Some(ParsedLine::Instruction(symbol, arg)) => {
                let op: Opcode = symbol.parse().map_err(|_| {
                    ErrorKind::UnknownInstruction(line_number, line.into())
                })?;
                program.push(build(op, arg, line_number, line)?);
            }
            None => return Err(ErrorKind::SyntaxError(line_number, line.into()).into()),
        }
    }

    debug!("assembled {} instructions, {} labels",
           program.len(),
           jump_table.len());
    Ok((program, jump_table))
}

fn build(op: Opcode,
         arg: Option<Argument>,
         line_number: usize,
         line: &str) -> Result<Instruction> {
    let arg = match (op.has_argument(), arg) {
        (false, None) => {
            return Ok(match op {
                Opcode::NoOp => Instruction::NoOp,
                Opcode::MoveFromInbox => Instruction::MoveFromInbox,
                _ => Instruction::MoveToOutbox,
            });
        }
        (false, Some(_)) =>
            return Err(ErrorKind::UnexpectedArgument(line_number, line.into()).into()),
        (true, None) =>
            return Err(ErrorKind::ArgumentRequired(line_number, line.into()).into()),
        (true, Some(arg)) => arg,
    };

    if op.is_jump() {
        if arg.indirect {
            bail!(ErrorKind::SyntaxError(line_number, line.into()));
        }
        let dest = Destination::from(arg.text);
        return Ok(match op {
            Opcode::Jump => Instruction::Jump(dest),
            Opcode::JumpIfZero => Instruction::JumpIfZero(dest),
            _ => Instruction::JumpIfNegative(dest),
        });
    }

    let tile = Tile {
        key: TileRef::from(arg.text),
        indirect: arg.indirect,
    };
    Ok(match op {
        Opcode::CopyFrom => Instruction::CopyFrom(tile),
        Opcode::CopyTo => Instruction::CopyTo(tile),
        Opcode::Add => Instruction::Add(tile),
        Opcode::Subtract => Instruction::Subtract(tile),
        Opcode::BumpUp => Instruction::BumpUp(tile),
        _ => Instruction::BumpDown(tile),
    })
}
