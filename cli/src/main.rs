mod table;
mod tui;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tasklist_core::{
    parse_human_date, FileRepository, FilterCriteria, FilterStatus, SnapshotRepository, TaskStore,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "A to-do list with a terminal UI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text (joined with spaces)
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// List tasks, optionally filtered
    List {
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        /// Case-insensitive substring match on the task text
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Toggle completion for a task
    Toggle { id: String },
    /// Replace a task's text
    Edit {
        id: String,
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Delete a task
    Rm { id: String },
    /// Cycle a task's priority (none -> medium -> high -> none)
    Pri { id: String },
    /// Set a task's due date (today, tomorrow, +3d, 2025-01-31); omit to clear
    Due { id: String, date: Option<String> },
    /// Move a task to a new position (1-based, as shown by `list`)
    Move { from: usize, to: usize },
    /// Mark every task completed
    CompleteAll,
    /// Delete every completed task
    ClearCompleted,
    /// Export all tasks as JSON
    Export {
        /// Output file (defaults to todos.json)
        path: Option<PathBuf>,
    },
    /// Replace all tasks from a JSON file
    Import { path: PathBuf },
    /// Show task statistics
    Stats,
    /// Open the terminal user interface
    Tui,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum StatusArg {
    All,
    Active,
    Completed,
}

impl From<StatusArg> for FilterStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::All => FilterStatus::All,
            StatusArg::Active => FilterStatus::Active,
            StatusArg::Completed => FilterStatus::Completed,
        }
    }
}

/// Tasks are addressed by unique id prefix, like the short ids `list`
/// prints.
fn resolve_id<R: SnapshotRepository>(store: &TaskStore<R>, prefix: &str) -> Result<Uuid> {
    let prefix = prefix.to_lowercase();
    let matches: Vec<Uuid> = store
        .tasks()
        .iter()
        .filter(|t| t.id.to_string().starts_with(&prefix))
        .map(|t| t.id)
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => bail!("no task matches id '{}'", prefix),
        n => bail!("ambiguous id '{}' matches {} tasks", prefix, n),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The TUI owns its own store; everything else mutates one here.
    let command = match cli.command {
        Some(Commands::Tui) | None => return tui::run(),
        Some(command) => command,
    };

    let repo = FileRepository::new(None)?;
    let mut store = TaskStore::new(repo);

    match command {
        Commands::Add { text } => {
            let text = text.join(" ");
            match store.add(&text) {
                Some(id) => {
                    if let Some(task) = store.find(id) {
                        println!("Task added: {} (ID: {})", task.text, table::short_id(task));
                    }
                }
                None => println!("Error: Task text is required."),
            }
        }
        Commands::List { status, search } => {
            let criteria = FilterCriteria {
                status: status.into(),
                query: search,
            };
            let matches = criteria.matcher();
            let visible: Vec<_> = store
                .tasks()
                .iter()
                .enumerate()
                .filter(|(_, t)| matches(t))
                .collect();
            if visible.is_empty() {
                println!("No tasks found.");
            } else {
                println!("{}", table::render_tasks(visible));
            }
        }
        Commands::Toggle { id } => {
            let id = resolve_id(&store, &id)?;
            store.toggle_complete(id);
            if let Some(task) = store.find(id) {
                let state = if task.completed { "completed" } else { "active" };
                println!("Task is now {}: {}", state, task.text);
            }
        }
        Commands::Edit { id, text } => {
            let id = resolve_id(&store, &id)?;
            let text = text.join(" ");
            if text.trim().is_empty() {
                println!("Error: Task text is required.");
            } else {
                store.edit(id, &text);
                println!("Task updated.");
            }
        }
        Commands::Rm { id } => {
            let id = resolve_id(&store, &id)?;
            store.delete(id);
            println!("Task deleted.");
        }
        Commands::Pri { id } => {
            let id = resolve_id(&store, &id)?;
            store.cycle_priority(id);
            if let Some(task) = store.find(id) {
                println!("Priority: {}", table::priority_label(task.priority));
            }
        }
        Commands::Due { id, date } => {
            let id = resolve_id(&store, &id)?;
            match date {
                Some(raw) => {
                    let due = parse_human_date(&raw)?;
                    store.set_due_date(id, Some(due));
                    println!("Due: {}", due.with_timezone(&Local).format("%Y-%m-%d"));
                }
                None => {
                    store.set_due_date(id, None);
                    println!("Due date cleared.");
                }
            }
        }
        Commands::Move { from, to } => {
            let len = store.tasks().len();
            if from == 0 || to == 0 || from > len || to > len {
                bail!("positions are 1-based and must be within 1..={}", len);
            }
            store.reorder(from - 1, to - 1);
            println!("Moved task from position {} to {}.", from, to);
        }
        Commands::CompleteAll => {
            store.bulk_complete();
            println!("Marked {} tasks completed.", store.tasks().len());
        }
        Commands::ClearCompleted => {
            let before = store.tasks().len();
            store.bulk_delete_completed();
            println!("Deleted {} completed tasks.", before - store.tasks().len());
        }
        Commands::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from("todos.json"));
            let json = store.export_snapshot()?;
            fs::write(&path, json)
                .with_context(|| format!("could not write {}", path.display()))?;
            println!("Exported {} tasks to {}", store.tasks().len(), path.display());
        }
        Commands::Import { path } => {
            let payload = fs::read_to_string(&path)
                .with_context(|| format!("could not read {}", path.display()))?;
            match store.import_snapshot(&payload) {
                Ok(()) => println!(
                    "Imported {} tasks from {}",
                    store.tasks().len(),
                    path.display()
                ),
                Err(e) => bail!("import rejected, current list unchanged: {}", e),
            }
        }
        Commands::Stats => {
            println!("{}", table::render_stats(&store.stats()));
        }
        Commands::Tui => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::MemoryRepository;

    #[test]
    fn test_resolve_id_by_prefix() {
        let mut store = TaskStore::new(MemoryRepository::new());
        let id = store.add("only task").unwrap();

        let prefix = &id.to_string()[..8];
        assert_eq!(resolve_id(&store, prefix).unwrap(), id);
        assert_eq!(resolve_id(&store, &id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_resolve_id_unknown_prefix() {
        let mut store = TaskStore::new(MemoryRepository::new());
        store.add("only task");
        assert!(resolve_id(&store, "zzzzzzzz").is_err());
    }

    #[test]
    fn test_resolve_id_ambiguous_prefix() {
        let mut store = TaskStore::new(MemoryRepository::new());
        store.add("one");
        store.add("two");
        // Every uuid matches the empty prefix.
        assert!(resolve_id(&store, "").is_err());
    }
}
