//! Display formatting for terminal output
//!
//! Provides utilities for formatting goals, summaries, and the edit form
//! for terminal display.

pub mod goal;

pub use goal::{
    format_goal_line, format_goal_table, format_percent, format_session,
    format_summary, progress_bar,
};
