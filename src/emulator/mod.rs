pub mod computer;
pub mod cpu;
pub mod debugger;
pub mod memory;

pub use crate::emulator::computer::{Computer, Hook, Resume, Stop};
pub use crate::emulator::cpu::Cpu;
pub use crate::emulator::debugger::Debugger;
pub use crate::emulator::memory::{Floor, Memory};
