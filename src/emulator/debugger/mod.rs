//! Interactive control over a run.
//!
//! The debugger stops before step 0 and before every breakpoint, then reads
//! commands until one of them resumes or quits the run. When the program
//! finishes it stops once more so the final state can be inspected.

#[cfg(feature = "debugger-cli")]
pub mod completion;
#[cfg(feature = "debugger-cli")]
pub mod editor;
pub mod parser;

use std::collections::{BTreeSet, VecDeque};
use std::io::{self, Write};
use std::path::Path;

use crate::assembler;
use crate::emulator::computer::{Computer, Hook, Resume, Stop};
use crate::emulator::cpu;
use crate::emulator::debugger::parser::Command;
use crate::emulator::memory::Memory;
use crate::types::{repr, repr_list, Destination, Instruction, TileRef, Value};

error_chain! {
    links {
        Cpu(cpu::Error, cpu::ErrorKind);
        Assembler(assembler::Error, assembler::ErrorKind);
    }
}

pub const PROMPT: &'static str = "% ";

const HELP: &'static str = "\
a          show the accumulator
b [step]   toggle a breakpoint at a step or label, list them without argument
c          continue until the next breakpoint
e          show inbox, accumulator and outbox
i          show the inbox
l [n]      list n instructions from pc, or the whole program
m [tile]   show one tile, or all of memory
o          show the outbox
q          quit
r          restart with the initial inbox and memory
s          execute one instruction
?          this help
An empty line repeats the previous command.";

/// Where the debugger reads commands and writes what it has to say.
pub trait Console {
    /// `None` once there is nothing left to read.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
    fn write_line(&mut self, line: &str);
}

/// Plain standard input and output.
pub struct Stdio;

impl Console for Stdio {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        if let Err(e) = io::stdout().flush() {
            warn!("can't flush stdout: {}", e);
        }
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                error!("can't read stdin: {}", e);
                None
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Replays canned input and keeps everything written.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    input: VecDeque<String>,
    pub output: Vec<String>,
}

impl Scripted {
    pub fn new<I, S>(input: I) -> Scripted
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Scripted {
            input: input.into_iter().map(Into::into).collect(),
            output: vec![],
        }
    }
}

impl Console for Scripted {
    fn read_line(&mut self, _: &str) -> Option<String> {
        self.input.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.into());
    }
}

pub struct Debugger<C: Console> {
    pub computer: Computer,
    session: Session<C>,
}

impl<C: Console> Debugger<C> {
    pub fn new(computer: Computer, console: C) -> Debugger<C> {
        Debugger {
            computer: computer,
            session: Session::new(console),
        }
    }

    pub fn load_program(&mut self, source: &str) -> Result<()> {
        self.computer.load_program(source)?;
        self.session.reset_breakpoints();
        Ok(())
    }

    pub fn load_program_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.computer.load_program_file(path)?;
        self.session.reset_breakpoints();
        Ok(())
    }

    pub fn breakpoints(&self) -> &BTreeSet<usize> {
        &self.session.breakpoints
    }

    /// Returns whether the breakpoint is now set.
    pub fn toggle_breakpoint(&mut self, step: usize) -> bool {
        self.session.toggle(step)
    }

    pub fn console(&self) -> &C {
        &self.session.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.session.console
    }

    /// Run the loaded program under control of the console.
    pub fn run(&mut self) -> Result<()> {
        self.session.inbox = self.computer.cpu.inbox.clone();
        self.session.memory = self.computer.cpu.memory.clone();
        self.session.temporary.insert(0);
        self.computer.run_with(&mut self.session)?;
        Ok(())
    }
}

struct Session<C> {
    console: C,
    breakpoints: BTreeSet<usize>,
    /// Forgotten as soon as the debugger stops, whatever the reason.
    temporary: BTreeSet<usize>,
    inbox: VecDeque<Value>,
    memory: Memory,
    last_command: Option<Command>,
}

impl<C: Console> Hook for Session<C> {
    fn should_stop(&mut self, computer: &Computer) -> bool {
        match computer.cpu.pc {
            Some(pc) => self.breakpoints.contains(&pc) || self.temporary.contains(&pc),
            None => false,
        }
    }

    fn on_stop(&mut self, computer: &mut Computer, reason: Stop) -> cpu::Result<Resume> {
        self.temporary.clear();
        match reason {
            Stop::Break => {
                debug!("stopped at {:?}", computer.cpu.pc);
                let pc = computer.cpu.pc.unwrap_or(0);
                self.console.write_line(&format!("Stopped at step {:03}", pc));
            }
            Stop::Finished => {
                self.console.write_line(&format!("Program finished after {} steps",
                                                 computer.steps()));
                self.console.write_line(&format!("outbox: {}", repr_list(computer.outbox())));
            }
        }
        self.show_context(computer);
        Ok(self.menu(computer))
    }
}

impl<C: Console> Session<C> {
    fn new(console: C) -> Session<C> {
        Session {
            console: console,
            breakpoints: BTreeSet::new(),
            temporary: BTreeSet::new(),
            inbox: VecDeque::new(),
            memory: Memory::new(),
            last_command: None,
        }
    }

    fn reset_breakpoints(&mut self) {
        self.breakpoints.clear();
        self.temporary.clear();
        self.last_command = None;
    }

    fn toggle(&mut self, step: usize) -> bool {
        if self.breakpoints.remove(&step) {
            false
        } else {
            self.breakpoints.insert(step);
            true
        }
    }

    fn menu(&mut self, computer: &mut Computer) -> Resume {
        loop {
            let line = match self.console.read_line(PROMPT) {
                Some(line) => line,
                None => return Resume::Quit,
            };
            let command = if line.trim().is_empty() {
                match self.last_command.clone() {
                    Some(command) => command,
                    None => continue,
                }
            } else {
                match parser::parse_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        self.console.write_line(&e.to_string());
                        continue;
                    }
                }
            };
            self.last_command = Some(command.clone());
            if let Some(resume) = self.exec(computer, &command) {
                return resume;
            }
        }
    }

    /// `None` keeps the menu open.
    fn exec(&mut self, computer: &mut Computer, command: &Command) -> Option<Resume> {
        match *command {
            Command::Accumulator => {
                let line = format!("accumulator: {}", show_opt(&computer.cpu.accumulator));
                self.console.write_line(&line);
            }
            Command::Breakpoint(None) => self.list_breakpoints(),
            Command::Breakpoint(Some(ref target)) => self.toggle_at(computer, target),
            Command::Continue => return Some(Resume::Continue),
            Command::Everything => {
                let line = format!("inbox: {}; accumulator: {}; outbox: {}",
                                   repr_list(&computer.cpu.inbox),
                                   show_opt(&computer.cpu.accumulator),
                                   repr_list(computer.outbox()));
                self.console.write_line(&line);
            }
            Command::Inbox => {
                let line = format!("inbox: {}", repr_list(&computer.cpu.inbox));
                self.console.write_line(&line);
            }
            Command::List(count) => {
                let range = match (count, computer.cpu.pc) {
                    (Some(n), Some(pc)) => pc..pc.saturating_add(n),
                    _ => 0..computer.program().len(),
                };
                for line in computer.listing(range, &self.breakpoints) {
                    self.console.write_line(&line);
                }
            }
            Command::Memory(None) => self.show_memory(&computer.cpu.memory),
            Command::Memory(Some(ref key)) => {
                let memory = &computer.cpu.memory;
                let line = match memory.resolve(&TileRef::from(key.as_str())) {
                    Ok(index) => tile_line(memory, index),
                    Err(e) => e.to_string(),
                };
                self.console.write_line(&line);
            }
            Command::Outbox => {
                let line = format!("outbox: {}", repr_list(computer.outbox()));
                self.console.write_line(&line);
            }
            Command::Quit => return Some(Resume::Quit),
            Command::Restart => {
                info!("restarting");
                computer.cpu.restart(self.inbox.clone(), self.memory.clone());
                self.console.write_line("Restarted");
                self.show_context(computer);
            }
            Command::Step if computer.cpu.halted => {
                self.console.write_line("Program finished, r restarts it");
            }
            Command::Step => {
                self.arm_step(computer);
                return Some(Resume::Continue);
            }
            Command::Help => {
                for line in HELP.lines() {
                    self.console.write_line(line);
                }
            }
        }
        None
    }

    /// Stop again after one instruction, wherever it leads.
    fn arm_step(&mut self, computer: &Computer) {
        let pc = match computer.cpu.pc {
            Some(pc) => pc,
            None => return,
        };
        if let Some(instruction) = computer.current_instruction() {
            if let Some(dest) = instruction.destination() {
                let len = computer.program().len();
                if let Ok(step) = cpu::resolve_destination(dest, &computer.jump_table, len) {
                    self.temporary.insert(step);
                }
            }
            if let Instruction::Jump(_) = *instruction {
                return;
            }
        }
        self.temporary.insert(pc + 1);
    }

    fn toggle_at(&mut self, computer: &Computer, target: &str) {
        let dest = Destination::from(target);
        let len = computer.program().len();
        let line = match cpu::resolve_destination(&dest, &computer.jump_table, len) {
            Ok(step) => {
                if self.toggle(step) {
                    format!("Breakpoint set at step {:03}", step)
                } else {
                    format!("Breakpoint removed from step {:03}", step)
                }
            }
            Err(e) => e.to_string(),
        };
        self.console.write_line(&line);
    }

    fn list_breakpoints(&mut self) {
        if self.breakpoints.is_empty() {
            self.console.write_line("No breakpoints");
            return;
        }
        let steps: Vec<String> = self.breakpoints
                                     .iter()
                                     .map(|s| format!("{:03}", s))
                                     .collect();
        self.console.write_line(&format!("Breakpoints: {}", steps.join(", ")));
    }

    fn show_memory(&mut self, memory: &Memory) {
        let mut indexes: BTreeSet<usize> = memory.tiles().map(|(i, _)| *i).collect();
        indexes.extend(memory.labels().map(|(_, i)| *i));
        if indexes.is_empty() {
            self.console.write_line("Memory is empty");
        }
        for index in indexes {
            self.console.write_line(&tile_line(memory, index));
        }
    }

    /// A few instructions around pc.
    fn show_context(&mut self, computer: &Computer) {
        let pc = computer.cpu.pc.unwrap_or(0);
        let range = pc.saturating_sub(3)..pc + 4;
        for line in computer.listing(range, &self.breakpoints) {
            self.console.write_line(&line);
        }
    }
}

fn show_opt(value: &Option<Value>) -> String {
    match *value {
        Some(ref v) => repr(v),
        None => "empty".into(),
    }
}

fn tile_line(memory: &Memory, index: usize) -> String {
    let labels = memory.labels_of(index);
    let value = match memory.tile(index) {
        Some(ref v) => repr(v),
        None => "empty".into(),
    };
    if labels.is_empty() {
        format!("{:>3}: {}", index, value)
    } else {
        format!("{:>3} ({}): {}", index, labels.join(", "), value)
    }
}
