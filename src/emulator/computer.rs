use std::cmp::min;
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use crate::assembler::{self, JumpTable, Program};
use crate::emulator::cpu::{self, Cpu};
use crate::emulator::memory::Memory;
use crate::types::{Instruction, Value};

/// Why the fetch-execute loop handed control to its hook.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stop {
    /// `should_stop` said so, the instruction at pc has not run yet.
    Break,
    /// The inbox ran dry or pc left the program.
    Finished,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resume {
    Continue,
    Quit,
}

/// Lets a controller interrupt the loop before any instruction.
///
/// After a `Stop::Break`, `Resume::Continue` executes the instruction at pc
/// (whatever pc now is) without asking `should_stop` again. After a
/// `Stop::Finished` the run ends unless the hook cleared `cpu.halted`.
pub trait Hook {
    fn should_stop(&mut self, computer: &Computer) -> bool;
    fn on_stop(&mut self, computer: &mut Computer, reason: Stop) -> cpu::Result<Resume>;
}

/// Never stops.
pub struct Unattended;

impl Hook for Unattended {
    fn should_stop(&mut self, _: &Computer) -> bool {
        false
    }

    fn on_stop(&mut self, _: &mut Computer, _: Stop) -> cpu::Result<Resume> {
        Ok(Resume::Quit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Computer {
    pub cpu: Cpu,
    program: Program,
    /// Consulted by every jump at execution time.
    pub jump_table: JumpTable,
}

impl Computer {
    pub fn new() -> Computer {
        Computer::default()
    }

    pub fn load_program(&mut self, source: &str) -> assembler::Result<()> {
        let (program, jump_table) = assembler::assemble(source)?;
        self.load(program, jump_table);
        Ok(())
    }

    pub fn load_program_file<P: AsRef<Path>>(&mut self, path: P) -> assembler::Result<()> {
        let (program, jump_table) = assembler::assemble_file(path)?;
        self.load(program, jump_table);
        Ok(())
    }

    pub fn load(&mut self, program: Program, jump_table: JumpTable) {
        debug!("loading {} instructions", program.len());
        self.program = program;
        self.jump_table = jump_table;
        self.cpu.pc = None;
    }

    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    pub fn set_inbox<I: IntoIterator<Item=Value>>(&mut self, inbox: I) {
        self.cpu.set_inbox(inbox);
    }

    pub fn set_memory(&mut self, memory: Memory) {
        self.cpu.memory = memory;
    }

    pub fn outbox(&self) -> &[Value] {
        &self.cpu.outbox
    }

    pub fn steps(&self) -> u64 {
        self.cpu.steps
    }

    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.cpu.pc.and_then(|pc| self.program.get(pc))
    }

    pub fn run(&mut self) -> cpu::Result<()> {
        self.run_with(&mut Unattended)
    }

    /// Run from step 0 until the inbox runs out, pc leaves the program or
    /// the hook quits. Any other execution error aborts the run.
    pub fn run_with<H: Hook>(&mut self, hook: &mut H) -> cpu::Result<()> {
        self.cpu.reset();
        let res = self.drive(hook);
        debug!("run over after {} steps", self.cpu.steps);
        self.cpu.pc = None;
        res
    }

    fn drive<H: Hook>(&mut self, hook: &mut H) -> cpu::Result<()> {
        let mut resumed = false;
        loop {
            let running = match self.cpu.pc {
                Some(pc) => !self.cpu.halted && pc < self.program.len(),
                None => false,
            };
            if !running {
                self.cpu.halted = true;
                match hook.on_stop(self, Stop::Finished)? {
                    Resume::Continue if !self.cpu.halted => {
                        resumed = true;
                        continue;
                    }
                    _ => return Ok(()),
                }
            }

            if !resumed && hook.should_stop(self) {
                if hook.on_stop(self, Stop::Break)? == Resume::Quit {
                    return Ok(());
                }
                resumed = true;
                continue;
            }
            resumed = false;

            match self.cpu.tick(&self.program, &self.jump_table) {
                Ok(()) => (),
                Err(cpu::Error(cpu::ErrorKind::InboxEmpty, _)) => {
                    info!("inbox is empty, stopping after {} steps", self.cpu.steps);
                    self.cpu.halted = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Listing of `steps`, labels above the step they name.
    ///
    /// `!` marks a breakpoint, `@` the current step.
    pub fn listing(&self, steps: Range<usize>, breakpoints: &BTreeSet<usize>) -> Vec<String> {
        let end = min(steps.end, self.program.len());
        let mut lines = vec![];
        for step in steps.start..end {
            for label in self.jump_table.labels_at(step) {
                lines.push(format!("{}:", label));
            }
            lines.push(format!("  {}{}{:03}: {}",
                               if breakpoints.contains(&step) { '!' } else { ' ' },
                               if self.cpu.pc == Some(step) { '@' } else { ' ' },
                               step,
                               self.program[step]));
        }
        if end == self.program.len() && steps.start <= end {
            for label in self.jump_table.labels_at(end) {
                lines.push(format!("{}:", label));
            }
        }
        lines
    }

    pub fn render_listing(&self) -> String {
        self.listing(0..self.program.len(), &BTreeSet::new()).join("\n")
    }
}

/// Terminal colors for a listing line or a debugger report.
#[cfg(feature = "colored")]
pub fn colorize(line: &str) -> String {
    use colored::Colorize;

    let markers: Vec<char> = line.chars().skip(2).take(2).collect();
    if !line.starts_with(' ') && line.ends_with(':') {
        line.green().bold().to_string()
    } else if line.starts_with("  ") && markers.get(1) == Some(&'@') {
        line.yellow().bold().to_string()
    } else if line.starts_with("  ") && markers.get(0) == Some(&'!') {
        line.red().to_string()
    } else if line.starts_with("Stopped") || line.starts_with("Program finished") {
        line.cyan().to_string()
    } else {
        line.to_string()
    }
}
