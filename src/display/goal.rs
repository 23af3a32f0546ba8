//! Goal display formatting
//!
//! Turns presentation rows, summaries, and edit sessions into terminal text.
//! Progress bars clamp the ratio to [0, 1] for drawing; the percentage shown
//! next to them does not.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::services::presentation::GoalRow;
use crate::services::progress::BudgetSummary;
use crate::services::session::{GoalEditSession, SessionMode};

#[derive(Tabled)]
struct GoalTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Saved")]
    allocated: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Date")]
    target_date: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

/// Draw a fixed-width bar for a progress ratio
///
/// Ratios above 1 draw a full bar; negative or non-finite ratios draw an empty one.
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let fill = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fill * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Format a ratio as a whole percentage, e.g. 1.5 -> "150%"
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Format rows as a table
pub fn format_goal_table(rows: &[GoalRow], symbol: &str, bar_width: usize) -> String {
    if rows.is_empty() {
        return "No goals yet.\n\nUse 'add <title> <target>' or 'new' to create one.".to_string();
    }

    let table_rows: Vec<GoalTableRow> = rows
        .iter()
        .map(|row| GoalTableRow {
            id: row.id.short(),
            title: row.title.clone(),
            category: row.category.label().to_string(),
            allocated: row.allocated.format_with_symbol(symbol),
            target: row.target.format_with_symbol(symbol),
            target_date: row.target_date.clone(),
            progress: format!(
                "{} {}",
                progress_bar(row.progress, bar_width),
                format_percent(row.progress)
            ),
        })
        .collect();

    Table::new(table_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
        .to_string()
}

/// One-line description of a single goal row
pub fn format_goal_line(row: &GoalRow, symbol: &str) -> String {
    let mut line = format!(
        "{} [{}]: {} / {} ({})",
        row.title,
        row.category,
        row.allocated.format_with_symbol(symbol),
        row.target.format_with_symbol(symbol),
        format_percent(row.progress)
    );
    if row.complete {
        line.push_str(" - complete");
    }
    line
}

/// Header line: total saved and what remains
pub fn format_summary(summary: &BudgetSummary, symbol: &str) -> String {
    format!(
        "Total Saved: {} (remaining {}) | {} of {} goals complete",
        summary.total_allocated.format_with_symbol(symbol),
        summary.total_remaining.format_with_symbol(symbol),
        summary.completed_count,
        summary.goal_count
    )
}

/// Render the open edit form, or a note that none is open
pub fn format_session(session: &GoalEditSession) -> String {
    let (Some(heading), Some(draft)) = (session.heading(), session.draft()) else {
        return "No goal is being edited.".to_string();
    };

    let mut output = String::new();
    output.push_str(&format!("{}\n", heading));
    output.push_str(&format!("  title:     {}\n", draft.title));
    output.push_str(&format!("  allocated: {}\n", draft.allocated_input));
    output.push_str(&format!("  target:    {}\n", draft.target_input));
    output.push_str(&format!("  date:      {}\n", draft.target_date));
    output.push_str(&format!("  category:  {}\n", draft.category));

    let state = match (session.is_dirty(), session.is_valid()) {
        (_, false) => "incomplete",
        (true, true) => "unsaved changes",
        (false, true) => "no changes",
    };
    output.push_str(&format!("  ({})", state));

    if let Some(error) = session.error_message() {
        output.push_str(&format!("\n  error: {}", error));
    }
    if matches!(session.mode(), Some(SessionMode::Create)) && !session.is_dirty() {
        output.push_str("\n  Use 'set <field> <value>', then 'save' or 'cancel'.");
    }

    output
}
