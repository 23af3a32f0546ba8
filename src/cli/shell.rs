//! Interactive goal shell
//!
//! A line-oriented front end over the goal engine. Each input line is split
//! with `shell-words` and parsed with clap, then routed to a store command or
//! the edit session. The shell subscribes to the store and re-renders the
//! summary whenever a change notification arrives.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::settings::Settings;
use crate::display::{format_goal_line, format_goal_table, format_session, format_summary};
use crate::error::{GoalError, GoalResult};
use crate::models::{Goal, GoalCategory, GoalId, Money, NewGoal, UnknownCategory};
use crate::services::{
    build_rows, BudgetSummary, ChangeEvent, GoalEditSession, GoalRow, GoalStore, RowActions,
};

#[derive(Parser, Debug)]
#[command(
    name = "goals",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Commands for managing savings goals"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands accepted at the shell prompt
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Show all goals, grouped by type
    #[command(alias = "ls")]
    List,

    /// Show total saved and remaining
    Summary,

    /// Add a goal directly
    Add {
        /// Goal title (quote titles with spaces)
        title: String,
        /// Target amount (e.g., "500" or "500.00")
        target: String,
        /// Amount already saved
        #[arg(short, long, default_value = "0")]
        allocated: String,
        /// Free-form target date label (e.g., "Dec 2025")
        #[arg(short, long, default_value = "")]
        date: String,
        /// goal, want, or emergency-fund
        #[arg(short, long, default_value = "goal")]
        category: String,
    },

    /// Add money to a goal (defaults to the configured step)
    Fund {
        /// Goal title or ID
        goal: String,
        #[arg(allow_negative_numbers = true)]
        amount: Option<String>,
    },

    /// Take money from a goal (never below zero)
    Defund {
        /// Goal title or ID
        goal: String,
        #[arg(allow_negative_numbers = true)]
        amount: Option<String>,
    },

    /// Change a goal's title
    Rename {
        /// Goal title or ID
        goal: String,
        title: String,
    },

    /// Change a goal's type
    Retype {
        /// Goal title or ID
        goal: String,
        /// goal, want, or emergency-fund
        category: String,
    },

    /// Delete a goal
    #[command(alias = "rm")]
    Delete {
        /// Goal title or ID
        goal: String,
    },

    /// Open the form for a new goal
    New,

    /// Open the form for an existing goal
    Edit {
        /// Goal title or ID
        goal: String,
    },

    /// Set a field on the open form: title, allocated, target, date, category
    Set {
        field: String,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Show the open form
    Form,

    /// Save the open form
    Save,

    /// Discard the open form
    Cancel,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Result of running one line
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShellOutcome {
    pub output: String,
    pub quit: bool,
}

impl ShellOutcome {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// The goal shell: a store, an edit session, and the user's settings
pub struct Shell {
    store: GoalStore,
    session: GoalEditSession,
    settings: Settings,
    pending: Rc<RefCell<Vec<ChangeEvent>>>,
    prompt: bool,
}

impl Shell {
    pub fn new(mut store: GoalStore, settings: Settings) -> Self {
        let pending: Rc<RefCell<Vec<ChangeEvent>>> = Rc::default();
        let sink = Rc::clone(&pending);
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Self {
            store,
            session: GoalEditSession::new(),
            settings,
            pending,
            prompt: false,
        }
    }

    /// Build the starting store from settings
    pub fn from_settings(settings: Settings) -> Self {
        let store = if settings.seed_demo_goals {
            GoalStore::demo()
        } else {
            GoalStore::new()
        };
        Self::new(store, settings)
    }

    /// Print a prompt before each line (for interactive terminals)
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &GoalStore {
        &self.store
    }

    pub fn session(&self) -> &GoalEditSession {
        &self.session
    }

    /// Read lines until `quit` or end of input
    ///
    /// A line that is not valid UTF-8 is reported and skipped; only a failed
    /// read or write ends the loop early.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> GoalResult<()> {
        writeln!(output, "{}", self.render_list())?;

        let mut buf = Vec::new();
        loop {
            if self.prompt {
                write!(output, "> ")?;
                output.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let result = match std::str::from_utf8(&buf) {
                Ok(line) => self.execute_line(line.trim_end_matches(&['\n', '\r'][..])),
                Err(_) => Err(GoalError::invalid("Input line is not valid UTF-8")),
            };
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => ShellOutcome::text(format!("Error: {}", e)),
            };

            if !outcome.output.is_empty() {
                writeln!(output, "{}", outcome.output)?;
            }
            if outcome.quit {
                break;
            }
        }

        Ok(())
    }

    /// Parse and run a single input line
    pub fn execute_line(&mut self, line: &str) -> GoalResult<ShellOutcome> {
        let words = shell_words::split(line)
            .map_err(|e| GoalError::InvalidInput(format!("Could not parse line: {}", e)))?;
        if words.is_empty() {
            return Ok(ShellOutcome::default());
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            // Help requests and usage errors are shown as plain output
            Err(e) => return Ok(ShellOutcome::text(e.to_string().trim_end())),
        };

        let result = self.execute(parsed.command);
        let changes = self.take_changes();

        let mut outcome = result?;
        if changes > 0 {
            let summary = BudgetSummary::from_goals(self.store.goals());
            outcome.output.push('\n');
            outcome
                .output
                .push_str(&format_summary(&summary, &self.settings.currency_symbol));
        }
        Ok(outcome)
    }

    /// Run a parsed command
    pub fn execute(&mut self, command: ShellCommand) -> GoalResult<ShellOutcome> {
        let symbol = self.settings.currency_symbol.clone();

        let output = match command {
            ShellCommand::List => self.render_list(),

            ShellCommand::Summary => {
                let summary = BudgetSummary::from_goals(self.store.goals());
                format_summary(&summary, &symbol)
            }

            ShellCommand::Add {
                title,
                target,
                allocated,
                date,
                category,
            } => {
                let fields = NewGoal::new(title, parse_amount(&target)?, parse_category(&category)?)
                    .with_allocated(parse_amount(&allocated)?)
                    .with_target_date(date);
                let id = self.store.add_goal(fields)?;
                format!("Added {}", self.describe(id)?)
            }

            ShellCommand::Fund { goal, amount } => {
                let actions = self.actions_for(&goal)?;
                let goal = match amount {
                    Some(amount) => actions.fund_by(&mut self.store, parse_amount(&amount)?)?,
                    None => actions.fund(&mut self.store)?,
                };
                format!("Funded {}", self.describe_goal(&goal))
            }

            ShellCommand::Defund { goal, amount } => {
                let actions = self.actions_for(&goal)?;
                let goal = match amount {
                    Some(amount) => actions.defund_by(&mut self.store, parse_amount(&amount)?)?,
                    None => actions.defund(&mut self.store)?,
                };
                format!("Defunded {}", self.describe_goal(&goal))
            }

            ShellCommand::Rename { goal, title } => {
                let id = self.resolve(&goal)?;
                let goal = self.store.rename_goal(id, &title)?;
                format!("Renamed {}", self.describe_goal(&goal))
            }

            ShellCommand::Retype { goal, category } => {
                let id = self.resolve(&goal)?;
                let goal = self.store.recategorize(id, parse_category(&category)?)?;
                format!("Moved {}", self.describe_goal(&goal))
            }

            ShellCommand::Delete { goal } => {
                let actions = self.actions_for(&goal)?;
                let removed = actions.delete(&mut self.store)?;
                format!("Deleted goal '{}'", removed.title)
            }

            ShellCommand::New => {
                self.session.open_create();
                format_session(&self.session)
            }

            ShellCommand::Edit { goal } => {
                let actions = self.actions_for(&goal)?;
                actions.open_edit(&mut self.session, &self.store)?;
                format_session(&self.session)
            }

            ShellCommand::Set { field, value } => {
                let field = field.parse()?;
                self.session.set_field(field, &value.join(" "))?;
                format_session(&self.session)
            }

            ShellCommand::Form => format_session(&self.session),

            ShellCommand::Save => {
                let id = self.session.save(&mut self.store)?;
                format!("Saved {}", self.describe(id)?)
            }

            ShellCommand::Cancel => {
                if self.session.cancel() {
                    "Discarded changes.".to_string()
                } else {
                    "No goal is being edited.".to_string()
                }
            }

            ShellCommand::Quit => {
                return Ok(ShellOutcome {
                    output: String::new(),
                    quit: true,
                })
            }
        };

        Ok(ShellOutcome::text(output))
    }

    fn render_list(&self) -> String {
        let rows = build_rows(&self.store, self.settings.fund_step);
        let summary = BudgetSummary::from_goals(self.store.goals());
        format!(
            "{}\n{}",
            format_goal_table(
                &rows,
                &self.settings.currency_symbol,
                self.settings.progress_bar_width
            ),
            format_summary(&summary, &self.settings.currency_symbol)
        )
    }

    fn resolve(&self, identifier: &str) -> GoalResult<GoalId> {
        self.store
            .find(identifier)
            .map(|g| g.id)
            .ok_or_else(|| GoalError::goal_not_found(identifier))
    }

    fn actions_for(&self, identifier: &str) -> GoalResult<RowActions> {
        let id = self.resolve(identifier)?;
        Ok(RowActions::new(id, self.settings.fund_step))
    }

    fn describe(&self, id: GoalId) -> GoalResult<String> {
        self.store
            .get(id)
            .map(|goal| self.describe_goal(goal))
            .ok_or_else(|| GoalError::goal_not_found(id.to_string()))
    }

    fn describe_goal(&self, goal: &Goal) -> String {
        let row = GoalRow::from_goal(goal, self.settings.fund_step);
        format_goal_line(&row, &self.settings.currency_symbol)
    }

    fn take_changes(&mut self) -> usize {
        let events: Vec<ChangeEvent> = self.pending.borrow_mut().drain(..).collect();
        for event in &events {
            debug!(event = %event.describe(), "Store changed");
        }
        events.len()
    }
}

fn parse_amount(input: &str) -> GoalResult<Money> {
    Money::parse(input).map_err(|e| GoalError::InvalidInput(e.to_string()))
}

fn parse_category(input: &str) -> GoalResult<GoalCategory> {
    input
        .parse()
        .map_err(|e: UnknownCategory| GoalError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell {
        Shell::from_settings(Settings::default())
    }

    fn run(shell: &mut Shell, line: &str) -> String {
        shell.execute_line(line).unwrap().output
    }

    #[test]
    fn test_parse_commands() {
        let parsed = ShellLine::try_parse_from(["fund", "Car", "25"]).unwrap();
        assert_eq!(
            parsed.command,
            ShellCommand::Fund {
                goal: "Car".into(),
                amount: Some("25".into())
            }
        );

        let parsed = ShellLine::try_parse_from(["set", "date", "Dec", "2025"]).unwrap();
        assert_eq!(
            parsed.command,
            ShellCommand::Set {
                field: "date".into(),
                value: vec!["Dec".into(), "2025".into()]
            }
        );

        assert!(ShellLine::try_parse_from(["fly"]).is_err());
    }

    #[test]
    fn test_list_shows_ordered_goals() {
        let mut shell = shell();
        let out = run(&mut shell, "list");
        assert!(out.find("Car").unwrap() < out.find("Laptop").unwrap());
        assert!(out.contains("Total Saved: $550.00"));
    }

    #[test]
    fn test_fund_with_default_step() {
        let mut shell = shell();
        let out = run(&mut shell, "fund car");
        assert!(out.starts_with("Funded Car [Goal]: $400.00 / $500.00 (80%)"));
        assert!(out.contains("Total Saved: $650.00"));
    }

    #[test]
    fn test_defund_clamps() {
        let mut shell = shell();
        let out = run(&mut shell, "defund Laptop 1000");
        assert!(out.starts_with("Defunded Laptop [Want]: $0.00 / $500.00 (0%)"));
    }

    #[test]
    fn test_add_with_quoted_title() {
        let mut shell = shell();
        let out = run(
            &mut shell,
            r#"add "New Bike" 250 --category want --date "Spring 2026""#,
        );
        assert!(out.starts_with("Added New Bike [Want]: $0.00 / $250.00 (0%)"));
        let bike = shell.store().find("new bike").unwrap();
        assert_eq!(bike.target_date, "Spring 2026");
    }

    #[test]
    fn test_errors_leave_state_untouched() {
        let mut shell = shell();
        let before = shell.store().snapshot();

        assert!(shell.execute_line("fund Car -5").unwrap_err().is_invalid_input());
        assert!(shell.execute_line("defund Car -5").unwrap_err().is_invalid_input());
        assert!(shell.execute_line("fund Car lots").unwrap_err().is_invalid_input());
        assert!(shell.execute_line("fund Boat 5").unwrap_err().is_not_found());
        assert!(shell
            .execute_line("add Thing 10 --category vacation")
            .unwrap_err()
            .is_invalid_input());
        assert!(shell.execute_line("rename Car \"\"").unwrap_err().is_invalid_input());

        assert_eq!(shell.store().snapshot(), before);
    }

    #[test]
    fn test_edit_session_flow() {
        let mut shell = shell();
        let out = run(&mut shell, "edit Car");
        assert!(out.starts_with("Edit Car"));

        run(&mut shell, "set title Used Car");
        run(&mut shell, "set category want");
        assert_eq!(shell.store().find("car").unwrap().title, "Car");

        let out = run(&mut shell, "save");
        assert!(out.starts_with("Saved Used Car [Want]"));
        assert!(!shell.session().is_open());
    }

    #[test]
    fn test_new_session_invalid_save() {
        let mut shell = shell();
        run(&mut shell, "new");
        run(&mut shell, "set target 100");

        let err = shell.execute_line("save").unwrap_err();
        assert!(err.is_invalid_input());
        assert!(shell.session().is_open());
        assert_eq!(shell.store().len(), 3);

        assert_eq!(run(&mut shell, "cancel"), "Discarded changes.");
        assert_eq!(run(&mut shell, "cancel"), "No goal is being edited.");
    }

    #[test]
    fn test_delete_then_fund_neighbour() {
        let mut shell = shell();
        run(&mut shell, "delete Car");
        let out = run(&mut shell, "fund Emergency 10");
        assert!(out.starts_with("Funded Emergency [Emergency Fund]: $160.00 / $200.00 (80%)"));
        assert!(shell.store().find("car").is_none());
    }

    #[test]
    fn test_quit_and_blank_lines() {
        let mut shell = shell();
        assert_eq!(shell.execute_line("   ").unwrap(), ShellOutcome::default());
        assert!(shell.execute_line("quit").unwrap().quit);
        assert!(shell.execute_line("exit").unwrap().quit);
    }

    #[test]
    fn test_help_is_output_not_error() {
        let mut shell = shell();
        let out = run(&mut shell, "help");
        assert!(out.contains("fund"));
        assert!(out.contains("defund"));
    }

    #[test]
    fn test_run_loop() {
        let mut shell = shell();
        let input = b"fund car 100\nbogus\nquit\nfund car 100\n";
        let mut output = Vec::new();
        shell.run(&input[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Funded Car [Goal]: $400.00 / $500.00 (80%)"));
        assert!(text.contains("unrecognized subcommand"));
        // Nothing after quit runs
        assert_eq!(shell.store().find("car").unwrap().allocated, Money::from_dollars(400));
    }

    #[test]
    fn test_run_skips_undecodable_line() {
        let mut shell = shell();
        let input = b"fund car 100\n\xff\xfe\nfund car 100\r\nsummary\n";
        let mut output = Vec::new();
        shell.run(&input[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Error: Invalid input: Input line is not valid UTF-8"));
        assert!(text.contains("Funded Car [Goal]: $500.00 / $500.00 (100%) - complete"));
        assert_eq!(shell.store().find("car").unwrap().allocated, Money::from_dollars(500));
    }

    #[test]
    fn test_empty_store_without_demo() {
        let settings = Settings {
            seed_demo_goals: false,
            ..Settings::default()
        };
        let mut shell = Shell::from_settings(settings);
        assert!(run(&mut shell, "list").starts_with("No goals yet."));
    }
}
