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

use hrm::emulator::Computer;
use hrm::types::repr_list;

const USAGE: &'static str = "
Usage:
  emulator [options] <file> [--] [<inbox>...]
  emulator (--help | --version)

Options:
  <file>                The program to run.
  <inbox>               Inbox items, after those of the floor.
  -f, --floor <floor>   JSON floor: memory labels, tile values and inbox.
  -q, --quiet           Only print the outbox.
  --plain               No colors in the listing.
  -v...                 Log more, repeat for even more.
  -h, --help            Show this message.
  --version             Show the version of emulator.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_file: String,
    arg_inbox: Vec<String>,
    flag_floor: Option<String>,
    flag_quiet: bool,
    flag_plain: bool,
    flag_v: usize,
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
    let inbox = repr_list(&computer.cpu.inbox);

    if !args.flag_quiet {
        println!("{}", args.arg_file);
        println!();
        let lines = computer.listing(0..computer.program().len(), &Default::default());
        utils::print_listing(&lines, args.flag_plain);
        println!();
        println!("Inbox:");
        println!("{}", inbox);
    }

    let res = computer.run();
    if !args.flag_quiet {
        println!("Outbox:");
    }
    println!("{}", repr_list(computer.outbox()));
    if let Err(e) = res {
        die!(2, "Error after {} steps: {}", computer.steps(), e);
    }
    if !args.flag_quiet {
        println!();
        println!("Program size: {}; Total steps executed: {}",
                 computer.program().len(),
                 computer.steps());
    }
    debug!("accumulator left at {:?}", computer.cpu.accumulator);
    0
}

fn main() {
    std::process::exit(main_ret());
}
