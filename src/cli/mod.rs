pub mod activities;
pub mod entries;
pub mod metrics;

use std::{
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

use activities::{process_activities_command, ActivitiesCommand};
use ansi_term::Colour;
use anyhow::Result;
use clap::{Parser, Subcommand};
use entries::{process_add_command, process_delete_command, process_list_command, AddCommand};
use metrics::{process_metrics_command, MetricsCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    journal::Journal,
    storage::{entities::Mood, key_value::FileStore},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        id::UuidGenerator,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Reflectr", version, long_about = None)]
#[command(about = "Journal for tracking mood, energy and activities", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record how you are feeling right now, or at another time")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Show all entries, newest first")]
    List {},
    #[command(about = "Delete an entry by its id")]
    Delete {
        #[arg(help = "Id printed by `add` and `list`")]
        id: String,
    },
    #[command(about = "Show or add activities offered for entries")]
    Activities {
        #[command(subcommand)]
        command: Option<ActivitiesCommand>,
    },
    #[command(about = "Summaries of energy, engagement and moods")]
    Metrics {
        #[command(flatten)]
        command: MetricsCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let journal = open_journal(&app_dir)?;

    match args.commands {
        Commands::Add { command } => process_add_command(&journal, command).await,
        Commands::List {} => process_list_command(&journal).await,
        Commands::Delete { id } => process_delete_command(&journal, id).await,
        Commands::Activities { command } => {
            process_activities_command(&journal, command.unwrap_or_default()).await
        }
        Commands::Metrics { command } => process_metrics_command(&journal, command).await,
    }
}

/// Journal kept in the `store` directory of the application directory.
pub fn open_journal(app_dir: &Path) -> Result<Journal<FileStore>> {
    let store = FileStore::new(app_dir.join("store"))?;
    Ok(Journal::new(
        store,
        Box::new(DefaultClock),
        Box::new(UuidGenerator),
    ))
}

/// Colours are only used when printing straight into a terminal.
fn use_colors() -> bool {
    io::stdout().is_terminal()
}

fn paint_mood(mood: Mood, colors: bool) -> String {
    if colors {
        let (r, g, b) = mood.color();
        Colour::RGB(r, g, b).bold().paint(mood.to_string()).to_string()
    } else {
        mood.to_string()
    }
}

fn flow_marker(flow: bool, colors: bool) -> String {
    match (flow, colors) {
        (false, _) => String::new(),
        (true, true) => Colour::RGB(0x10, 0xb9, 0x81).paint("flow").to_string(),
        (true, false) => "flow".to_string(),
    }
}
