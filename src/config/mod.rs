//! Configuration module for budget-goals
//!
//! - Config directory resolution
//! - User settings persistence
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod settings;

pub use logging::init_tracing;
pub use paths::GoalPaths;
pub use settings::Settings;
