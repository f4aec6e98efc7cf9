use std::fs::File;
use std::io::{self, BufReader, Read};

use hrm::emulator::memory;
use hrm::emulator::{Computer, Floor};
use hrm::types::Value;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

error_chain! {
    foreign_links {
        Io(io::Error);
        Json(serde_json::Error);
    }

    links {
        Memory(memory::Error, memory::ErrorKind);
    }
}

pub fn init_logger(verbosity: usize) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = TermLogger::init(level,
                                     Config::default(),
                                     TerminalMode::Stderr,
                                     ColorChoice::Auto) {
        eprintln!("Can't initialize the logger: {}", e);
    }
}

/// Program text from a file, or stdin without one.
#[allow(dead_code)]
pub fn read_source(path: Option<&str>) -> io::Result<String> {
    let mut source = String::new();
    match path {
        Some(path) => BufReader::new(File::open(path)?).read_to_string(&mut source)?,
        None => io::stdin().read_to_string(&mut source)?,
    };
    Ok(source)
}

#[allow(dead_code)]
pub fn load_floor(path: Option<&str>) -> Result<Floor> {
    match path {
        Some(path) => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
        None => Ok(Floor::default()),
    }
}

/// Program, floor and extra inbox items, ready to run.
#[allow(dead_code)]
pub fn setup(computer: &mut Computer, floor: &Floor, extra_inbox: &[String]) -> Result<()> {
    computer.set_memory(floor.memory()?);
    let mut inbox = floor.inbox.clone();
    for item in extra_inbox {
        inbox.push(item.parse::<Value>()?);
    }
    computer.set_inbox(inbox);
    Ok(())
}

#[allow(dead_code)]
pub fn print_listing(lines: &[String], plain: bool) {
    for line in lines {
        if plain {
            println!("{}", line);
        } else {
            println!("{}", hrm::emulator::computer::colorize(line));
        }
    }
}

macro_rules! die {
    ( $exit:expr, $($x:expr),* ) => (
        {
            eprintln!($($x),*);
            return $exit;
        }
    )
}
