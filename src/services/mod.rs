//! Service layer for budget-goals
//!
//! The goal store owns the data; the other modules are pure functions over
//! its snapshots or short-lived state that commits back into it.

pub mod events;
pub mod ordering;
pub mod presentation;
pub mod progress;
pub mod session;
pub mod store;

pub use events::{ChangeEvent, Operation, SubscriptionId};
pub use ordering::order_by_category;
pub use presentation::{build_rows, GoalRow, RowActions};
pub use progress::{goal_progress, progress, BudgetSummary, DEGENERATE_TARGET_PROGRESS};
pub use session::{DraftField, GoalDraft, GoalEditSession, SessionMode, SessionState};
pub use store::GoalStore;
