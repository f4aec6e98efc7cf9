use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::emulator::debugger::parser::COMMANDS;

/// Command letters first, then step labels and tile names.
pub struct DebuggerCompleter {
    symbols: Vec<String>,
}

impl DebuggerCompleter {
    pub fn new(symbols: Vec<String>) -> DebuggerCompleter {
        DebuggerCompleter { symbols: symbols }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        let start = before.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let word = &before[start..];
        let completions = if start == 0 {
            COMMANDS.chars()
                    .map(|c| c.to_string())
                    .filter(|cmd| cmd.starts_with(word))
                    .collect()
        } else {
            self.symbols
                .iter()
                .filter(|symbol| symbol.starts_with(word))
                .cloned()
                .collect()
        };
        (start, completions)
    }
}

impl Completer for DebuggerCompleter {
    type Candidate = String;

    fn complete(&self, line: &str, pos: usize, _: &Context<'_>)
        -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for DebuggerCompleter {
    type Hint = String;
}

impl Highlighter for DebuggerCompleter {}

impl Validator for DebuggerCompleter {}

impl Helper for DebuggerCompleter {}
