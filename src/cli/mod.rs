//! CLI front end
//!
//! The interactive shell is the rendering layer for the goal engine: it
//! draws rows and routes typed commands back into the store and session.

pub mod shell;

pub use shell::{Shell, ShellCommand, ShellOutcome};
