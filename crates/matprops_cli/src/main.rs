//! Mechanical properties database editor.
//!
//! # Responsibility
//! - Parse command-line arguments and start file logging.
//! - Hand off to the interactive menu or run a one-shot `create`.

mod display;
mod menu;
mod prompt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use matprops_core::{create_database, default_log_level, init_logging, DbError, EditorSession};
use menu::App;
use prompt::Prompter;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "matprops")]
#[command(version)]
#[command(about = "Editor for a database of materials and their mechanical properties")]
#[command(long_about = r#"
Stores materials, their category and six mechanical properties
(density, moduli of elasticity and rigidity, yield and ultimate tensile
strength, percent elongation) in a single SQLite file.

Run without a subcommand for the interactive main menu.

Example usage:
  matprops create materials.db
  matprops edit materials.db
"#)]
struct Cli {
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty database file
    Create {
        /// Path of the database file to create
        filename: PathBuf,
    },

    /// Open an existing database file in the interactive editor
    Edit {
        /// Path of the database file to edit
        filename: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli
        .log_dir
        .unwrap_or_else(|| std::env::temp_dir().join("matprops-logs"));
    if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let prompter = Prompter::new(stdin.lock(), stdout.lock());

    match cli.command {
        None => {
            App::new(prompter).run_main().context("interactive session failed")?;
        }
        Some(Commands::Create { filename }) => {
            create_database(&filename)
                .with_context(|| format!("failed to create {}", filename.display()))?;
            println!("{} created...", filename.display());
        }
        Some(Commands::Edit { filename }) => match EditorSession::open(&filename) {
            Ok(session) => {
                App::new(prompter)
                    .run_editor(session)
                    .context("interactive session failed")?;
            }
            Err(DbError::NotFound(_)) => {
                println!("{} does not currently exist...", filename.display());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to open {}", filename.display()));
            }
        },
    }

    Ok(())
}
