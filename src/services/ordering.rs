//! Presentation order for goals
//!
//! Goals are stored in insertion order; display groups them by category
//! rank (Goal, Want, Emergency Fund). The sort is stable, so goals in the
//! same category keep their relative order.

use crate::models::Goal;

/// Return the goals sorted by category rank, preserving order within a category
pub fn order_by_category(goals: &[Goal]) -> Vec<Goal> {
    let mut ordered = goals.to_vec();
    sort_by_category(&mut ordered);
    ordered
}

/// Sort goals in place by category rank (stable)
pub fn sort_by_category(goals: &mut [Goal]) {
    goals.sort_by_key(|g| g.category.rank());
}
