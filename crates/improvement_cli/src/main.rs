//! Command-line entry point for improvement tracking.
//!
//! # Responsibility
//! - Drive `improvement_core` services against a SQLite snapshot file.
//! - Keep output line-oriented and stable for scripting.

use clap::{Parser, Subcommand};
use improvement_core::db::open_db;
use improvement_core::worklog::{is_valid_day, today_str};
use improvement_core::{
    init_logging_from_config, CoreConfig, Improvement, ImprovementChanges, ImprovementService,
    JiraToMarkdown, Metric, MetricService, SqliteSnapshotStore, Store,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "improvement", version, about = "Track self-improvement notes per project")]
struct Cli {
    /// TOML config file; defaults apply when it does not exist.
    #[arg(long, env = "IMPROVEMENT_CONFIG", default_value = "improvement.toml")]
    config: PathBuf,
    /// Database file, overriding `data_dir`/`db_file_name` from config.
    #[arg(long)]
    db: Option<PathBuf>,
    #[arg(long, short, default_value = "default")]
    project: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an improvement and print its id.
    Add { title: String },
    /// List all improvements.
    List,
    /// Mark an improvement as done (today unless --day is given).
    Check {
        id: String,
        #[arg(long)]
        day: Option<String>,
    },
    /// Toggle the repeat flag.
    Repeat { id: String },
    /// Turn the repeat flag off.
    NoRepeat { id: String },
    Update {
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Hide from today's banner.
    Hide { id: String },
    ClearHidden,
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Record the day's metric and the improvements picked for tomorrow.
    Track {
        #[arg(long)]
        day: Option<String>,
        #[arg(long = "tomorrow")]
        tomorrow: Vec<String>,
    },
    /// Show the improvements suggested for today.
    Banner,
    /// Convert Jira markup to Markdown (reads stdin when TEXT is omitted).
    Jira { text: Option<String> },
    Ping,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Check { day: Some(day), .. } | Command::Track { day: Some(day), .. }
            if !is_valid_day(day) =>
        {
            return Err(format!("invalid day {day:?}, expected YYYY-MM-DD").into());
        }
        Command::Ping => {
            println!("improvement_core ping={}", improvement_core::ping());
            println!("improvement_core version={}", improvement_core::core_version());
            return Ok(());
        }
        Command::Jira { text } => {
            let input = match text {
                Some(text) => text.clone(),
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let output = JiraToMarkdown.transform(Some(input.as_str()));
            println!("{}", output.as_deref().unwrap_or_default());
            return Ok(());
        }
        _ => {}
    }

    let config = CoreConfig::load(&cli.config)?;
    init_logging_from_config(&config)?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path());
    let conn = open_db(&db_path)?;

    let store = Arc::new(Store::default());
    let improvements =
        ImprovementService::new(Arc::clone(&store), SqliteSnapshotStore::new(&conn));
    let metrics = MetricService::new(Arc::clone(&store), SqliteSnapshotStore::new(&conn));
    improvements.load_state_for_project(&cli.project)?;
    metrics.load_state_for_project(&cli.project)?;
    let mut mutated = improvements.clear_hidden_if_new_day(&today_str());

    match cli.command {
        Command::Add { title } => {
            println!("{}", improvements.add_improvement(title));
            mutated = true;
        }
        Command::List => {
            for improvement in improvements.improvements().latest().unwrap_or_default() {
                print_improvement(&improvement);
            }
        }
        Command::Check { id, day } => {
            improvements.add_checked_day(&id, day.as_deref());
            mutated = true;
        }
        Command::Repeat { id } => {
            improvements.toggle_improvement_repeat(&id);
            mutated = true;
        }
        Command::NoRepeat { id } => {
            improvements.disable_improvement_repeat(&id);
            mutated = true;
        }
        Command::Update { id, title } => {
            improvements.update_improvement(&id, ImprovementChanges::title(title));
            mutated = true;
        }
        Command::Hide { id } => {
            improvements.hide_improvement(&id);
            mutated = true;
        }
        Command::ClearHidden => {
            improvements.clear_hidden_improvements();
            mutated = true;
        }
        Command::Delete { ids } => {
            improvements.delete_improvements(&ids);
            mutated = true;
        }
        Command::Track { day, tomorrow } => {
            let mut metric = Metric::for_day(day.unwrap_or_else(today_str));
            metric.improvements_tomorrow = tomorrow;
            metrics.upsert_metric(metric);
            mutated = true;
        }
        Command::Banner => {
            for improvement in improvements
                .improvement_banner_improvements()
                .latest()
                .unwrap_or_default()
            {
                print_improvement(&improvement);
            }
        }
        Command::Jira { .. } | Command::Ping => {}
    }

    if mutated {
        improvements.save_state_for_project(&cli.project)?;
        metrics.save_state_for_project(&cli.project)?;
        info!("event=cli_save module=cli status=ok");
    }
    Ok(())
}

fn print_improvement(improvement: &Improvement) {
    let repeat = if improvement.is_repeat { "repeat" } else { "once" };
    let last_checked = improvement
        .checked_days
        .last()
        .map_or("-", String::as_str);
    println!(
        "{}\t{}\t{}\t{}",
        improvement.id, repeat, last_checked, improvement.title
    );
}
