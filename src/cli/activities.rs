use anyhow::Result;
use clap::{CommandFactory, Subcommand};

use crate::{journal::Journal, storage::key_value::KeyValueStore};

use super::Args;

#[derive(Debug, Default, Subcommand)]
pub enum ActivitiesCommand {
    #[default]
    #[command(about = "List known activities")]
    List,
    #[command(about = "Remember a new activity. Existing ones are matched ignoring case and spacing")]
    Add {
        #[arg(help = "Activity label, for example \"Deep work\"")]
        label: String,
    },
}

pub async fn process_activities_command(
    journal: &Journal<impl KeyValueStore>,
    command: ActivitiesCommand,
) -> Result<()> {
    match command {
        ActivitiesCommand::List => {
            for activity in journal.activities().await {
                println!("{activity}");
            }
            Ok(())
        }
        ActivitiesCommand::Add { label } => {
            let added = journal.add_activity(&label).await;
            if added.is_empty() {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        "Activity can't be empty",
                    )
                    .into());
            }
            println!("{added}");
            Ok(())
        }
    }
}
