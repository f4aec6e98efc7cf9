#[macro_use]
extern crate error_chain;
extern crate hrm;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[macro_use]
mod utils;

use docopt::Docopt;

use hrm::assembler;
use hrm::emulator::Computer;

const USAGE: &'static str = "
Usage:
  assembler [options] [<file>]
  assembler (--help | --version)

Options:
  <file>             Program to assemble instead of stdin.
  --plain            No colors in the listing.
  -v...              Log more, repeat for even more.
  -h, --help         Show this message.
  --version          Show the version of assembler.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_file: Option<String>,
    flag_plain: bool,
    flag_v: usize,
}

fn main_ret() -> i32 {
    let args: Args = Docopt::new(USAGE)
                            .and_then(|d| d.version(Some(env!("CARGO_PKG_VERSION").into()))
                                           .deserialize())
                            .unwrap_or_else(|e| e.exit());
    utils::init_logger(args.flag_v);

    let source = match utils::read_source(args.arg_file.as_ref().map(String::as_str)) {
        Ok(source) => source,
        Err(e) => die!(1, "Error while reading the program: {}", e),
    };
    let (program, jump_table) = match assembler::assemble(&source) {
        Ok(assembled) => assembled,
        Err(e) => die!(1, "{}", e),
    };
    info!("{} instructions, {} labels", program.len(), jump_table.len());

    let mut computer = Computer::new();
    computer.load(program, jump_table);
    let lines = computer.listing(0..computer.program().len(), &Default::default());
    utils::print_listing(&lines, args.flag_plain);
    0
}

fn main() {
    std::process::exit(main_ret());
}
