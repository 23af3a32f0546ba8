//! budget-goals - savings goals with a terminal front end
//!
//! This library provides the goal engine behind the `goals` shell: an
//! in-memory collection of savings goals (Goal, Want, Emergency Fund), the
//! commands that change it, and the ordering and progress calculations that
//! feed a display.
//!
//! # Architecture
//!
//! - `models`: goals, ids, and the money type
//! - `services`: the goal store, category ordering, progress, the edit
//!   session, and per-row view-models
//! - `display`: table and progress-bar formatting
//! - `cli`: the interactive shell
//! - `config`: paths, settings, and logging
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust
//! use budget_goals::models::{GoalCategory, Money, NewGoal};
//! use budget_goals::services::{build_rows, GoalStore};
//!
//! let mut store = GoalStore::new();
//! let car = store
//!     .add_goal(NewGoal::new("Car", Money::from_dollars(500), GoalCategory::Goal))
//!     .unwrap();
//! store.fund(car, Money::from_dollars(100)).unwrap();
//!
//! let rows = build_rows(&store, Money::from_dollars(100));
//! assert_eq!(rows[0].progress, 0.2);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;

pub use error::{GoalError, GoalResult};
