use std::io;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::emulator::computer::colorize;
use crate::emulator::debugger::completion::DebuggerCompleter;
use crate::emulator::debugger::Console;

/// Terminal console with line editing, completion and a history file.
pub struct LineEditor {
    editor: Editor<DebuggerCompleter, DefaultHistory>,
    history: Option<PathBuf>,
}

impl LineEditor {
    /// `symbols` are offered as completions after a command letter.
    pub fn new(symbols: Vec<String>, history: Option<PathBuf>) -> rustyline::Result<LineEditor> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(DebuggerCompleter::new(symbols)));
        if let Some(ref path) = history {
            match editor.load_history(path) {
                Ok(()) => (),
                Err(ReadlineError::Io(ref e)) if e.kind() == io::ErrorKind::NotFound => (),
                Err(e) => println!("Error while opening the history file: {}", e),
            }
        }
        Ok(LineEditor {
            editor: editor,
            history: history,
        })
    }
}

impl Console for LineEditor {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                            warn!("can't record history: {}", e);
                        }
                    }
                    return Some(line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return None,
                Err(e) => {
                    println!("Error: {}", e);
                    return None;
                }
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", colorize(line));
    }
}

impl Drop for LineEditor {
    fn drop(&mut self) {
        if let Some(ref path) = self.history {
            if let Err(e) = self.editor.save_history(path) {
                println!("Error while saving the history file: {}", e);
            }
        }
    }
}
