//! Toolpath output
//!
//! The command record, its JSON form, and the synthesizer that turns
//! machine state changes into commands.

pub mod command;
pub mod synth;

pub use command::{Command, MoveTag, Toolpath};
