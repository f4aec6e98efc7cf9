#[macro_use]
extern crate error_chain;
extern crate hrm;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[macro_use]
mod utils;

use std::path::PathBuf;

use docopt::Docopt;

use hrm::emulator::debugger::editor::LineEditor;
use hrm::emulator::debugger::{Console, Stdio};
use hrm::emulator::{Computer, Debugger};

const USAGE: &'static str = "
Usage:
  debugger [options] <file> [--] [<inbox>...]
  debugger (--help | --version)

Options:
  <file>                 The program to debug.
  <inbox>                Inbox items, after those of the floor.
  -f, --floor <floor>    JSON floor: memory labels, tile values and inbox.
  --history <history>    History file [default: .hrm_history].
  --plain                Read commands from stdin without line editing.
  -v...                  Log more, repeat for even more.
  -h, --help             Show this message.
  --version              Show the version of debugger.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_file: String,
    arg_inbox: Vec<String>,
    flag_floor: Option<String>,
    flag_history: String,
    flag_plain: bool,
    flag_v: usize,
}

fn debug<C: Console>(computer: Computer, console: C) -> i32 {
    let mut debugger = Debugger::new(computer, console);
    match debugger.run() {
        Ok(()) => 0,
        Err(e) => die!(2, "Error after {} steps: {}", debugger.computer.steps(), e),
    }
}

fn main_ret() -> i32 {
    let args: Args = Docopt::new(USAGE)
                            .and_then(|d| d.version(Some(env!("CARGO_PKG_VERSION").into()))
                                           .deserialize())
                            .unwrap_or_else(|e| e.exit());
    utils::init_logger(args.flag_v);

    let mut computer = Computer::new();
    if let Err(e) = computer.load_program_file(&args.arg_file) {
        die!(1, "{}: {}", args.arg_file, e);
    }
    let floor = match utils::load_floor(args.flag_floor.as_ref().map(String::as_str)) {
        Ok(floor) => floor,
        Err(e) => die!(1, "Error while loading the floor: {}", e),
    };
    if let Err(e) = utils::setup(&mut computer, &floor, &args.arg_inbox) {
        die!(1, "{}", e);
    }

    if args.flag_plain {
        return debug(computer, Stdio);
    }

    let mut symbols: Vec<String> = computer.jump_table.iter().map(|e| e.0.clone()).collect();
    symbols.extend(floor.labels.keys().cloned());
    debug!("completing {} symbols", symbols.len());
    match LineEditor::new(symbols, Some(PathBuf::from(args.flag_history))) {
        Ok(editor) => debug(computer, editor),
        Err(e) => die!(1, "Can't start the line editor: {}", e),
    }
}

fn main() {
    std::process::exit(main_ret());
}
