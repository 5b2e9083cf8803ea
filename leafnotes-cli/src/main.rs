//! `leafnotes` command-line front end.
//!
//! Every command opens (or creates) the configured workspace, performs one
//! operation and prints the result as JSON on stdout. Diagnostics go to
//! stderr through the logger.

mod logging;
mod settings;

use clap::{Parser, Subcommand};
use leafnotes_core::{
    render_markdown_to_html, AutosaveCoordinator, CreateNote, LeafnotesError, Workspace,
};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "leafnotes")]
#[command(version, about = "Local-first markdown note tree", long_about = None)]
struct Cli {
    /// Workspace database (default: `workspacePath` from settings)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the note tree
    Tree,
    /// Print one note
    Show { id: String },
    /// Create a note or folder
    New {
        /// Create a folder instead of a note
        #[arg(long)]
        folder: bool,
        /// Parent note ID (default: root level)
        #[arg(long)]
        parent: Option<String>,
        title: Option<String>,
    },
    /// Change a note's title
    Rename { id: String, title: String },
    /// Reparent a note; use `root` to move it to the top level
    Move { id: String, parent: String },
    /// Replace a note's content
    Edit { id: String, content: String },
    /// Delete a note and all of its descendants
    Rm { id: String },
    /// Print a note's content rendered as HTML
    Render { id: String },
    /// Print the settings, or change one
    Config {
        #[arg(requires = "value")]
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Debug)]
enum CliError {
    Core(LeafnotesError),
    Settings(String),
    Output(serde_json::Error),
}

impl From<LeafnotesError> for CliError {
    fn from(err: LeafnotesError) -> Self {
        CliError::Core(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (settings, settings_error) = settings_or_default(settings::load_settings());
    let _logger = match logging::init_logging(&settings.log_level) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("warning: {err}");
            None
        }
    };
    if let Some(err) = settings_error {
        log::warn!("{err}");
    }

    match run(&settings, cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Core(err)) => {
            log::error!("{err}");
            eprintln!("error: {}", err.user_message());
            ExitCode::FAILURE
        }
        Err(CliError::Settings(msg)) => {
            eprintln!("error: {msg}");
            ExitCode::from(2)
        }
        Err(CliError::Output(err)) => {
            eprintln!("error: failed to write output: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Falls back to default settings, keeping the load error for reporting
/// after the logger has started.
fn settings_or_default(
    loaded: Result<settings::AppSettings, String>,
) -> (settings::AppSettings, Option<String>) {
    match loaded {
        Ok(settings) => (settings, None),
        Err(err) => (settings::AppSettings::default(), Some(err)),
    }
}

fn run(settings: &settings::AppSettings, cli: Cli) -> Result<(), CliError> {
    if let Commands::Config { key, value } = &cli.command {
        return match (key, value) {
            (Some(key), Some(value)) => {
                let updated = apply_setting(settings.clone(), key, value)?;
                settings::save_settings(&updated).map_err(CliError::Settings)?;
                print_json(&updated)
            }
            _ => print_json(settings),
        };
    }

    let db_path = cli.db.unwrap_or_else(|| settings.workspace_path.clone());
    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(LeafnotesError::from)?;
        }
    }
    let mut ws = Workspace::open_or_create(&db_path)?;

    match cli.command {
        Commands::Tree => print_json(&ws.list_tree()?),
        Commands::Show { id } => print_json(&ws.get_note(&id)?),
        Commands::New {
            folder,
            parent,
            title,
        } => {
            let request = if folder {
                CreateNote::folder(parent.as_deref())
            } else {
                CreateNote::note(parent.as_deref())
            };
            let request = match title {
                Some(title) => request.with_title(title),
                None => request,
            };
            print_json(&ws.create_note(request)?)
        }
        Commands::Rename { id, title } => print_json(&ws.rename_note(&id, &title)?),
        Commands::Move { id, parent } => {
            let target = (parent != "root").then_some(parent.as_str());
            print_json(&ws.move_note(&id, target)?)
        }
        Commands::Edit { id, content } => {
            let mut editor = AutosaveCoordinator::new(settings.autosave_config());
            editor.select(&ws, &id)?;
            let now = Instant::now();
            editor.edit_content(content, now);
            editor.flush(&mut ws, now)?;
            print_json(&editor.selected_note())
        }
        Commands::Rm { id } => print_json(&ws.delete_note(&id)?),
        Commands::Render { id } => {
            let note = ws.get_note(&id)?;
            print!("{}", render_markdown_to_html(&note.content));
            Ok(())
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn apply_setting(
    mut settings: settings::AppSettings,
    key: &str,
    value: &str,
) -> Result<settings::AppSettings, CliError> {
    let millis = |value: &str| {
        value
            .parse::<u64>()
            .map_err(|_| CliError::Settings(format!("{key} must be a number of milliseconds")))
    };
    match key {
        "workspacePath" => settings.workspace_path = value.to_string(),
        "logLevel" => settings.log_level = value.to_string(),
        "autosaveDelayMs" => settings.autosave_delay_ms = millis(value)?,
        "savedIndicatorMs" => settings.saved_indicator_ms = millis(value)?,
        other => return Err(CliError::Settings(format!("unknown setting: {other}"))),
    }
    Ok(settings)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
