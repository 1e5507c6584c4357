//! Summaries derived from a snapshot of the whole journal. Everything here is a pure function of
//! the entries handed in, storage is never touched.
//!
//! Calendar fields (dates, weekdays, hours) are read in the time zone supplied by the caller,
//! which is [chrono::Local] outside of tests.

pub mod grouping;
pub mod heatmap;
pub mod trend;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::storage::entities::{Entry, Mood};

pub use grouping::{activity_averages, mood_distribution, ActivityAverage, MoodCount};
pub use heatmap::{time_of_day_grid, HeatmapCell, TimeSlot};
pub use trend::{daily_trend, DailyTrend, TREND_WINDOW};

/// Point of the energy/engagement scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowPoint {
    pub id: String,
    pub engagement: f64,
    pub energy: f64,
    pub mood: Mood,
    pub flow: bool,
}

/// Maps every entry to a scatter point, one to one.
pub fn flow_map(entries: &[Entry]) -> Vec<FlowPoint> {
    entries
        .iter()
        .map(|entry| FlowPoint {
            id: entry.id.clone(),
            engagement: entry.engagement,
            energy: entry.energy,
            mood: entry.mood,
            flow: entry.flow,
        })
        .collect()
}

/// Every metric view computed from the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub flow_map: Vec<FlowPoint>,
    pub trend: Vec<DailyTrend>,
    pub activities: Vec<ActivityAverage>,
    pub moods: Vec<MoodCount>,
    pub heatmap: Vec<HeatmapCell>,
}

impl MetricsReport {
    pub fn compute<Tz: TimeZone>(entries: &[Entry], now: DateTime<Utc>, tz: &Tz) -> Self {
        Self {
            flow_map: flow_map(entries),
            trend: daily_trend(entries, now, tz),
            activities: activity_averages(entries),
            moods: mood_distribution(entries),
            heatmap: time_of_day_grid(entries, tz),
        }
    }
}

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Empty means report 0.
    pub(crate) fn value(&self) -> f64 {
        if self.count == 0 {
            0.
        } else {
            self.sum / self.count as f64
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
pub(crate) mod test_entries {
    use chrono::{DateTime, Utc};

    use crate::storage::entities::{Entry, EntryDraft, Mood};

    pub fn entry(
        id: &str,
        timestamp: DateTime<Utc>,
        mood: Mood,
        energy: f64,
        engagement: f64,
        activity: &str,
    ) -> Entry {
        EntryDraft::new(activity)
            .with_mood(mood)
            .with_energy(energy)
            .with_engagement(engagement)
            .into_entry(id.into(), timestamp)
    }
}
