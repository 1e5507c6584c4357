use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::trace;

use crate::storage::entities::Entry;

use super::Mean;

/// How far back the daily trend looks from the moment it is computed.
pub const TREND_WINDOW: Duration = Duration::days(30);

/// Averages of a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub energy: f64,
    pub engagement: f64,
    /// Number of entries of the day marked as flow.
    pub flow: usize,
    pub entries: usize,
}

#[derive(Default)]
struct DayAccumulator {
    energy: Mean,
    engagement: Mean,
    flow: usize,
}

/// Groups entries from the last [TREND_WINDOW] by their calendar date in `tz`. Days without
/// entries are left out instead of being reported as zeros. The result is ordered by date.
pub fn daily_trend<Tz: TimeZone>(
    entries: &[Entry],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<DailyTrend> {
    let window_start = now - TREND_WINDOW;
    trace!("Trend window starts at {window_start}");

    let mut days = BTreeMap::<NaiveDate, DayAccumulator>::new();
    for entry in entries.iter().filter(|v| v.timestamp >= window_start) {
        let date = entry.timestamp.with_timezone(tz).date_naive();
        let day = days.entry(date).or_default();
        day.energy.push(entry.energy);
        day.engagement.push(entry.engagement);
        if entry.flow {
            day.flow += 1;
        }
    }

    days.into_iter()
        .map(|(date, day)| DailyTrend {
            date,
            energy: day.energy.value(),
            engagement: day.engagement.value(),
            flow: day.flow,
            entries: day.energy.count(),
        })
        .collect()
}
