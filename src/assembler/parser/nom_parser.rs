use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, space1};
use nom::combinator::{all_consuming, map, opt};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::assembler::parser::{Argument, ParsedLine};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn word(i: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(i)
}

fn label_decl(i: &str) -> IResult<&str, &str> {
    terminated(word, char(':'))(i)
}

fn argument(i: &str) -> IResult<&str, Argument> {
    alt((
        map(delimited(char('['), word, char(']')),
            |text| Argument { text: text, indirect: true }),
        map(word, |text| Argument { text: text, indirect: false }),
    ))(i)
}

fn instruction(i: &str) -> IResult<&str, (&str, Option<Argument>)> {
    pair(word, opt(preceded(space1, argument)))(i)
}

pub fn line(i: &str) -> IResult<&str, ParsedLine> {
    alt((
        map(all_consuming(label_decl), ParsedLine::Label),
        map(all_consuming(instruction),
            |(op, arg)| ParsedLine::Instruction(op, arg)),
    ))(i)
}

#[cfg(test)]
const EMPTY: &'static str = "";

#[cfg(test)]
#[test]
fn test_label_decl() {
    assert_eq!(label_decl("LOOP_2:"), Ok((EMPTY, "LOOP_2")));
    assert!(label_decl(":").is_err());
}

#[cfg(test)]
#[test]
fn test_argument() {
    assert_eq!(argument("[zero]"),
               Ok((EMPTY, Argument { text: "zero", indirect: true })));
    assert_eq!(argument("12"),
               Ok((EMPTY, Argument { text: "12", indirect: false })));
    assert!(argument("[zero").is_err());
}

#[cfg(test)]
#[test]
fn test_instruction() {
    assert_eq!(instruction("copy_to [A]"),
               Ok((EMPTY, ("copy_to", Some(Argument { text: "A", indirect: true })))));
    assert_eq!(instruction("move_from_inbox"),
               Ok((EMPTY, ("move_from_inbox", None))));
    assert_eq!(instruction("add\t3"),
               Ok((EMPTY, ("add", Some(Argument { text: "3", indirect: false })))));
}

#[cfg(test)]
#[test]
fn test_line() {
    assert_eq!(line("START:"), Ok((EMPTY, ParsedLine::Label("START"))));
    assert!(line("START: move_from_inbox").is_err());
    assert!(line("copy_to [A").is_err());
    assert!(line("copy_to A B").is_err());
    assert!(line("-3").is_err());
}
