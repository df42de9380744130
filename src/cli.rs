use std::{io, path::PathBuf};

use chrono::{DateTime, Local, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::{
    domain::{Category, Session, parse_minutes},
    error::{StorageError, ValidationError},
    stats::{FocusSummary, summarize},
    storage::{
        self, CategoryRegistry, DurationPreference, SessionStore, SharedStore,
        categories::CategoryError,
    },
    time_format::{format_hms, truncate_label},
};

#[derive(Parser, Debug)]
#[command(name = "focusline")]
#[command(about = "Focus timer with categories and reports", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Directory holding sessions and categories")]
    pub data_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Manage categories")]
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    #[command(about = "Inspect or remove recorded sessions")]
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    #[command(about = "Show focus statistics")]
    Stats,

    #[command(about = "Show or set the timer length in minutes")]
    Duration {
        #[arg(help = "New length in minutes")]
        minutes: Option<String>,
    },

    #[command(about = "Export sessions")]
    Export {
        #[arg(long, value_enum, help = "Export format")]
        format: ExportFormat,

        #[arg(long, short, help = "Output path")]
        out: Option<PathBuf>,
    },

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    #[command(about = "List categories")]
    List,
    #[command(about = "Add a category")]
    Add { name: String },
    #[command(about = "Rename a category")]
    Rename { id: String, name: String },
    #[command(about = "Delete a category (recorded sessions keep their name)")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    #[command(about = "List recorded sessions")]
    List,
    #[command(about = "Delete one session")]
    Delete { id: String },
    #[command(about = "Move a session to another existing category")]
    Recategorize { id: String, category: String },
    #[command(about = "Delete every session")]
    Clear,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported shell: {0}. Use bash, zsh, or fish.")]
    UnsupportedShell(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DataExport {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub sessions: Vec<Session>,
}

pub fn categories(store: &SharedStore, action: CategoryAction) -> Result<(), CliError> {
    let registry = CategoryRegistry::new(store.clone());
    match action {
        CategoryAction::List => {
            for category in registry.list() {
                println!("{:>15}  {}", category.id, category.name);
            }
        }
        CategoryAction::Add { name } => {
            let category = registry.add(&name)?;
            println!("Added '{}' ({})", category.name, category.id);
        }
        CategoryAction::Rename { id, name } => {
            if !registry.update(&id, &name)? {
                return Err(CliError::NotFound {
                    kind: "category",
                    id,
                });
            }
            println!("Renamed {} to '{}'", id, name.trim());
        }
        CategoryAction::Delete { id } => {
            registry.delete(&id)?;
            println!("Deleted category {}", id);
        }
    }
    Ok(())
}

pub fn sessions(store: &SharedStore, action: SessionAction) -> Result<(), CliError> {
    let sessions = SessionStore::new(store.clone());
    match action {
        SessionAction::List => print!("{}", render_session_list(&sessions.list_all())),
        SessionAction::Delete { id } => {
            sessions.delete_by_id(&id)?;
            println!("Deleted session {}", id);
        }
        SessionAction::Recategorize { id, category } => {
            let Some(target) = CategoryRegistry::new(store.clone()).find_by_name(category.trim())
            else {
                return Err(CliError::NotFound {
                    kind: "category",
                    id: category,
                });
            };
            let Some(mut session) = sessions.list_all().into_iter().find(|s| s.id == id) else {
                return Err(CliError::NotFound {
                    kind: "session",
                    id,
                });
            };
            session.category = target.name;
            if !sessions.update_by_id(session)? {
                return Err(CliError::NotFound {
                    kind: "session",
                    id,
                });
            }
            println!("Moved session {} to '{}'", id, category.trim());
        }
        SessionAction::Clear => {
            sessions.delete_all()?;
            println!("All sessions deleted");
        }
    }
    Ok(())
}

pub fn render_session_list(sessions: &[Session]) -> String {
    let mut out = String::new();
    for session in sessions {
        let when = DateTime::parse_from_rfc3339(&session.date)
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| session.date.clone());
        out.push_str(&format!(
            "{:>15}  {}  {:20} {}  {:>2} distractions  {}\n",
            session.id,
            when,
            truncate_label(&session.category, 20),
            format_hms(session.duration_sec),
            session.distractions,
            if session.completed { "done" } else { "stopped" }
        ));
    }
    out
}

pub fn stats(store: &SharedStore) -> Result<(), CliError> {
    let sessions = SessionStore::new(store.clone()).list_all();
    let summary = summarize(&sessions, Local::now().date_naive());
    print!("{}", render_stats(&summary));
    Ok(())
}

pub fn render_stats(summary: &FocusSummary) -> String {
    let mut out = String::new();
    let rule = "-".repeat(40);

    out.push_str(&format!("{:20} {}\n", "Today", format_hms(summary.today_focus_sec)));
    out.push_str(&format!(
        "{:20} {}\n",
        "All time",
        format_hms(summary.all_time_focus_sec)
    ));
    out.push_str(&format!(
        "{:20} {}\n",
        "Distractions", summary.all_time_distractions
    ));
    out.push_str(&format!(
        "{:20} {} ({} completed)\n",
        "Sessions", summary.session_count, summary.completed_count
    ));

    out.push_str("\nLast 7 days\n");
    out.push_str(&rule);
    out.push('\n');
    for bucket in &summary.last_seven_days {
        out.push_str(&format!(
            "{} {:16} {}\n",
            bucket.label,
            bucket.date.format("%Y-%m-%d"),
            format_hms(bucket.focus_sec)
        ));
    }

    out.push_str("\nBy category\n");
    out.push_str(&rule);
    out.push('\n');
    for share in &summary.by_category {
        out.push_str(&format!(
            "{:20} {} {:>4}%\n",
            truncate_label(&share.name, 20),
            format_hms(share.focus_sec),
            share.percent
        ));
    }
    out
}

pub fn duration(store: &SharedStore, minutes: Option<String>) -> Result<(), CliError> {
    let preference = DurationPreference::new(store.clone());
    match minutes {
        Some(raw) => {
            let minutes = parse_minutes(&raw)?;
            preference.save_minutes(minutes)?;
            println!("Timer length set to {} min", minutes);
        }
        None => println!("{} min", preference.load_minutes()),
    }
    Ok(())
}

pub fn build_export(store: &SharedStore) -> DataExport {
    DataExport {
        schema_version: 1,
        exported_at: Utc::now(),
        categories: CategoryRegistry::new(store.clone()).list(),
        sessions: SessionStore::new(store.clone()).list_all(),
    }
}

pub fn sessions_csv(sessions: &[Session]) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for session in sessions {
        writer.serialize(session)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn export_data(
    store: &SharedStore,
    format: ExportFormat,
    out_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let export = build_export(store);
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&export)?,
        ExportFormat::Csv => sessions_csv(&export.sessions)?,
    };

    if let Some(path) = out_path {
        storage::write_text_file(&path, &content)?;
        println!("Exported to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), CliError> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CliError::UnsupportedShell(shell.to_string())),
    };
    clap_complete::generate(shell, &mut Cli::command(), "focusline", &mut io::stdout());
    Ok(())
}

pub fn run_command(store: &SharedStore, command: Command) -> Result<(), CliError> {
    match command {
        Command::Categories { action } => categories(store, action),
        Command::Sessions { action } => sessions(store, action),
        Command::Stats => stats(store),
        Command::Duration { minutes } => duration(store, minutes),
        Command::Export { format, out } => export_data(store, format, out),
        Command::Completions { shell } => print_completions(&shell),
    }
}
