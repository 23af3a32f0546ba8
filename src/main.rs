use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use budget_goals::cli::Shell;
use budget_goals::config::{init_tracing, paths::GoalPaths, settings::Settings};
use budget_goals::models::Money;

#[derive(Parser)]
#[command(
    name = "goals",
    version,
    about = "Track savings toward goals, wants, and emergency funds",
    long_about = "goals keeps a session's savings goals in memory: fund and defund \
                  them, edit or delete them, and watch progress toward each target. \
                  Goals are grouped as Goals, Wants, and Emergency Funds."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Start with an empty list instead of the sample goals
    #[arg(long, global = true)]
    empty: bool,

    /// Amount moved by a bare `fund`/`defund` (overrides settings)
    #[arg(long, env = "GOALS_FUND_STEP", global = true)]
    step: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (the default)
    Shell,

    /// Write a default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = GoalPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    if cli.empty {
        settings.seed_demo_goals = false;
    }
    if let Some(step) = &cli.step {
        let step = Money::parse(step).with_context(|| format!("Invalid --step '{}'", step))?;
        anyhow::ensure!(!step.is_negative(), "--step cannot be negative");
        settings.fund_step = step;
    }

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            let mut shell = Shell::from_settings(settings).with_prompt(interactive);
            shell.run(stdin.lock(), io::stdout().lock())?;
        }
        Commands::Init => {
            settings.save(&paths)?;
            println!("Wrote settings to {}", paths.settings_file().display());
        }
        Commands::Config => {
            println!("Goals Configuration");
            println!("===================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!(
                "  Fund step:         {}",
                settings.fund_step.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Seed sample goals: {}", settings.seed_demo_goals);
            println!("  Progress bar:      {} chars", settings.progress_bar_width);
        }
    }

    Ok(())
}
