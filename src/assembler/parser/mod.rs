mod nom_parser;

pub use self::nom_parser::word;

/// Operand as written in the source. `indirect` means it was in brackets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Argument<'a> {
    pub text: &'a str,
    pub indirect: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    Label(&'a str),
    Instruction(&'a str, Option<Argument<'a>>),
}

/// Drop the comment and the surrounding whitespace.
pub fn clean(line: &str) -> &str {
    match line.find('#') {
        Some(i) => line[..i].trim(),
        None => line.trim(),
    }
}

/// `None` if the (already cleaned) line matches no known form.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    nom_parser::line(line).ok().map(|(_, parsed)| parsed)
}

#[cfg(test)]
#[test]
fn test_clean() {
    assert_eq!(clean("   add 3   # add three"), "add 3");
    assert_eq!(clean("# nothing but a comment"), "");
    assert_eq!(clean("\tLOOP:  "), "LOOP:");
}

#[cfg(test)]
#[test]
fn test_parse_line() {
    assert_eq!(parse_line("bump_up [x]"),
               Some(ParsedLine::Instruction("bump_up",
                                            Some(Argument { text: "x", indirect: true }))));
    assert_eq!(parse_line("x y z"), None);
}
