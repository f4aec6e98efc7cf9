use nom::character::complete::{one_of, space0};
use nom::combinator::{all_consuming, opt};
use nom::sequence::{pair, preceded};
use nom::IResult;

use crate::assembler::parser::word;

pub const COMMANDS: &'static str = "abceilmoqrs?";

error_chain! {
    errors {
        UnknownCommand(cmd: String) {
            description("unknown command")
            display("unknown command \"{}\", ? lists the commands", cmd)
        }
        UnexpectedArgument(cmd: char) {
            description("unexpected argument")
            display("{} takes no argument", cmd)
        }
        InvalidCount(count: String) {
            description("invalid instruction count")
            display("\"{}\" is not a number of instructions", count)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Accumulator,
    /// Toggle at a step or label, or list them all.
    Breakpoint(Option<String>),
    Continue,
    Everything,
    Inbox,
    /// Instructions from pc, or the whole program.
    List(Option<usize>),
    /// One tile, or all of them.
    Memory(Option<String>),
    Outbox,
    Quit,
    Restart,
    Step,
    Help,
}

fn command(i: &str) -> IResult<&str, (char, Option<&str>)> {
    pair(one_of(COMMANDS), opt(preceded(space0, word)))(i)
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    match all_consuming(command)(line) {
        Ok((_, (cmd, arg))) => Command::build(cmd, arg),
        Err(_) => Err(ErrorKind::UnknownCommand(line.into()).into()),
    }
}

impl Command {
    fn build(cmd: char, arg: Option<&str>) -> Result<Command> {
        match (cmd, arg) {
            ('b', arg) => Ok(Command::Breakpoint(arg.map(String::from))),
            ('m', arg) => Ok(Command::Memory(arg.map(String::from))),
            ('l', None) => Ok(Command::List(None)),
            ('l', Some(n)) => n.parse()
                               .map(|n| Command::List(Some(n)))
                               .map_err(|_| ErrorKind::InvalidCount(n.into()).into()),
            (cmd, Some(_)) => Err(ErrorKind::UnexpectedArgument(cmd).into()),
            ('a', None) => Ok(Command::Accumulator),
            ('c', None) => Ok(Command::Continue),
            ('e', None) => Ok(Command::Everything),
            ('i', None) => Ok(Command::Inbox),
            ('o', None) => Ok(Command::Outbox),
            ('q', None) => Ok(Command::Quit),
            ('r', None) => Ok(Command::Restart),
            ('s', None) => Ok(Command::Step),
            ('?', None) => Ok(Command::Help),
            (cmd, None) => Err(ErrorKind::UnknownCommand(cmd.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("a").unwrap(), Command::Accumulator);
        assert_eq!(parse_command("  s \n").unwrap(), Command::Step);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
    }

    #[test]
    fn test_arguments() {
        assert_eq!(parse_command("b 5").unwrap(), Command::Breakpoint(Some("5".into())));
        assert_eq!(parse_command("bLOOP").unwrap(),
                   Command::Breakpoint(Some("LOOP".into())));
        assert_eq!(parse_command("b").unwrap(), Command::Breakpoint(None));
        assert_eq!(parse_command("l 3").unwrap(), Command::List(Some(3)));
        assert_eq!(parse_command("l").unwrap(), Command::List(None));
        assert_eq!(parse_command("m zero").unwrap(), Command::Memory(Some("zero".into())));
    }

    #[test]
    fn test_errors() {
        match parse_command("c 4") {
            Err(Error(ErrorKind::UnexpectedArgument('c'), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match parse_command("l many") {
            Err(Error(ErrorKind::InvalidCount(_), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match parse_command("x") {
            Err(Error(ErrorKind::UnknownCommand(_), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_command("b 1 2").is_err());
    }
}
