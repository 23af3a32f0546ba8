//! Core data models for budget-goals
//!
//! Goals, their identifiers, and the money type used for every amount.

pub mod goal;
pub mod ids;
pub mod money;

pub use goal::{Goal, GoalCategory, GoalEdit, GoalValidationError, NewGoal, UnknownCategory};
pub use ids::GoalId;
pub use money::{Money, MoneyParseError};
