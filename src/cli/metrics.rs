use std::fmt::Display;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};

use crate::{
    journal::Journal,
    metrics::{MetricsReport, TimeSlot},
    storage::key_value::KeyValueStore,
};

use super::{flow_marker, paint_mood, use_colors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricsView {
    Flow,
    Trend,
    Activities,
    Moods,
    Heatmap,
    All,
}

impl Display for MetricsView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsView::Flow => write!(f, "flow"),
            MetricsView::Trend => write!(f, "trend"),
            MetricsView::Activities => write!(f, "activities"),
            MetricsView::Moods => write!(f, "moods"),
            MetricsView::Heatmap => write!(f, "heatmap"),
            MetricsView::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct MetricsCommand {
    #[arg(short, long, default_value_t = MetricsView::All, help = "Which summary to show")]
    view: MetricsView,
    #[arg(long, help = "Print JSON instead of tables")]
    json: bool,
}

pub async fn process_metrics_command(
    journal: &Journal<impl KeyValueStore>,
    MetricsCommand { view, json }: MetricsCommand,
) -> Result<()> {
    let report = journal.metrics(&Local).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&select_view(&report, view)?)?);
        return Ok(());
    }

    if report.flow_map.is_empty() {
        println!("No data yet. Add some entries to see your metrics!");
        return Ok(());
    }

    let colors = use_colors();
    let show = |v: MetricsView| view == MetricsView::All || view == v;
    if show(MetricsView::Flow) {
        print_flow_map(&report, colors);
    }
    if show(MetricsView::Trend) {
        print_trend(&report);
    }
    if show(MetricsView::Activities) {
        print_activities(&report);
    }
    if show(MetricsView::Moods) {
        print_moods(&report, colors);
    }
    if show(MetricsView::Heatmap) {
        print_heatmap(&report);
    }
    Ok(())
}

fn select_view(report: &MetricsReport, view: MetricsView) -> Result<serde_json::Value> {
    Ok(match view {
        MetricsView::Flow => serde_json::to_value(&report.flow_map)?,
        MetricsView::Trend => serde_json::to_value(&report.trend)?,
        MetricsView::Activities => serde_json::to_value(&report.activities)?,
        MetricsView::Moods => serde_json::to_value(&report.moods)?,
        MetricsView::Heatmap => serde_json::to_value(&report.heatmap)?,
        MetricsView::All => serde_json::to_value(report)?,
    })
}

fn print_flow_map(report: &MetricsReport, colors: bool) {
    println!("Flow map (engagement, energy)");
    for point in &report.flow_map {
        println!(
            "{:.2}\t{:+.2}\t{}\t{}",
            point.engagement,
            point.energy,
            paint_mood(point.mood, colors),
            flow_marker(point.flow, colors)
        );
    }
    println!();
}

fn print_trend(report: &MetricsReport) {
    println!("Last 30 days (date, energy, engagement, flow)");
    if report.trend.is_empty() {
        println!("Nothing recorded in the last 30 days");
    }
    for day in &report.trend {
        println!(
            "{}\t{:+.2}\t{:.2}\t{}",
            day.date.format("%b %d"),
            day.energy,
            day.engagement,
            day.flow
        );
    }
    println!();
}

fn print_activities(report: &MetricsReport) {
    println!("By activity (energy, engagement, entries)");
    for activity in &report.activities {
        println!(
            "{:+.2}\t{:.2}\t{}\t{}",
            activity.energy, activity.engagement, activity.entries, activity.activity
        );
    }
    println!();
}

fn print_moods(report: &MetricsReport, colors: bool) {
    let total: usize = report.moods.iter().map(|v| v.count).sum();
    println!("Mood mix");
    for mood in &report.moods {
        println!(
            "{}%\t{}\t{}",
            mood.count * 100 / total.max(1),
            mood.count,
            paint_mood(mood.mood, colors)
        );
    }
    println!();
}

fn print_heatmap(report: &MetricsReport) {
    println!("Energy / engagement by time of day");
    let header = TimeSlot::ALL
        .iter()
        .map(|v| format!("{v:>11}"))
        .collect::<String>();
    println!("   {header}");
    for row in report.heatmap.chunks(TimeSlot::ALL.len()) {
        let Some(first) = row.first() else {
            continue;
        };
        let cells = row
            .iter()
            .map(|v| format!("{:>11}", format!("{:+.2}/{:.2}", v.energy, v.engagement)))
            .collect::<String>();
        println!("{}{cells}", first.day);
    }
    println!();
}
