#![recursion_limit = "1024"]
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate nom;
extern crate serde;
#[macro_use]
extern crate serde_derive;

#[cfg(feature = "colored")]
extern crate colored;
#[cfg(feature = "debugger-cli")]
extern crate rustyline;

pub mod assembler;
pub mod emulator;
pub mod types;
