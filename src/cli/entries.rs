use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::debug;

use crate::{
    journal::Journal,
    storage::{
        entities::{Entry, EntryDraft, Mood},
        key_value::KeyValueStore,
    },
    utils::level::{Energy, Engagement},
};

use super::{flow_marker, paint_mood, use_colors, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(
        short,
        long,
        help = "What you are doing. Unknown activities are remembered for next time"
    )]
    activity: String,
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = Mood::Neutral)]
    mood: Mood,
    #[arg(
        short,
        long,
        default_value = "0",
        allow_negative_numbers = true,
        help = "How energized you feel, from -1 (drained) to 1 (energized)"
    )]
    energy: Energy,
    #[arg(
        short = 'g',
        long,
        default_value = "0.5",
        help = "How engaged you are, from 0 (detached) to 1 (absorbed)"
    )]
    engagement: Engagement,
    #[arg(short, long, help = "You are in a state of deep focus")]
    flow: bool,
    #[arg(short, long, help = "Anything else worth remembering")]
    notes: Option<String>,
    #[arg(
        long,
        help = "When it happened. Defaults to now. Examples are \"1 hour ago\", \"yesterday 18:00\", \"15/03/2025\""
    )]
    at: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `add`. Validation happens here, the journal stores whatever it gets.
pub async fn process_add_command(
    journal: &Journal<impl KeyValueStore>,
    AddCommand {
        activity,
        mood,
        energy,
        engagement,
        flow,
        notes,
        at,
        date_style,
    }: AddCommand,
) -> Result<()> {
    if activity.trim().is_empty() {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                "Activity can't be empty",
            )
            .into());
    }

    let timestamp = at.map(|at| parse_moment(&at, date_style)).transpose()?;

    // Picking an activity also registers it, so the entry carries the known display form.
    let activity = journal.add_activity(&activity).await;

    let mut draft = EntryDraft::new(activity)
        .with_mood(mood)
        .with_energy(*energy)
        .with_engagement(*engagement)
        .with_flow(flow);
    if let Some(timestamp) = timestamp {
        draft = draft.with_timestamp(timestamp);
    }
    if let Some(notes) = notes.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        draft = draft.with_notes(notes);
    }

    let entry = journal.add_entry(draft).await?;
    println!("Added {}", entry.id);
    Ok(())
}

fn parse_moment(value: &str, date_style: DateStyle) -> Result<DateTime<Utc>> {
    match parse_date_string(value, Local::now(), date_style.into()) {
        Ok(v) => {
            debug!("Parsed {value:?} as {v}");
            Ok(v.to_utc())
        }
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate time {value:?}: {e}"),
            )
            .into()),
    }
}

pub async fn process_list_command(journal: &Journal<impl KeyValueStore>) -> Result<()> {
    let entries = journal.entries_newest_first().await;
    if entries.is_empty() {
        println!("No entries yet. Create your first one with `reflectr add`");
        return Ok(());
    }

    let colors = use_colors();
    println!("Entries ({})", entries.len());
    for entry in entries {
        print_entry(&entry, colors);
    }
    Ok(())
}

/// Day first and year first never get confused, whatever `--date-style` was used for input.
const LISTING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn listing_time<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format(LISTING_TIME_FORMAT)
        .to_string()
}

fn print_entry(entry: &Entry, colors: bool) {
    println!(
        "{}\t{}\t{:+.2}\t{:.2}\t{}\t{}\t{}",
        listing_time(entry.timestamp, &Local),
        paint_mood(entry.mood, colors),
        entry.energy,
        entry.engagement,
        entry.activity,
        flow_marker(entry.flow, colors),
        entry.id
    );
    if let Some(notes) = &entry.notes {
        println!("\t{notes}");
    }
}

pub async fn process_delete_command(
    journal: &Journal<impl KeyValueStore>,
    id: String,
) -> Result<()> {
    if journal.delete_entry(&id).await {
        println!("Deleted {id}");
    } else {
        println!("No entry {id}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::listing_time;

    #[test]
    fn listing_time_is_year_first() {
        let moment = Utc.with_ymd_and_hms(2025, 3, 4, 23, 30, 0).unwrap();

        assert_eq!(listing_time(moment, &Utc), "2025-03-04 23:30");
        let kyiv = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(listing_time(moment, &kyiv), "2025-03-05 01:30");
    }
}
