use std::fmt::Display;

use chrono::{Datelike, TimeZone, Timelike, Weekday};
use serde::Serialize;

use crate::storage::entities::Entry;

use super::Mean;

/// Part of the day an entry falls into, by local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeSlot {
    /// 05:00 to 12:00
    Morning,
    /// 12:00 to 17:00
    Afternoon,
    /// 17:00 to 21:00
    Evening,
    /// 21:00 to 05:00, wrapping over midnight
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..12 => TimeSlot::Morning,
            12..17 => TimeSlot::Afternoon,
            17..21 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }

    fn index(&self) -> usize {
        match self {
            TimeSlot::Morning => 0,
            TimeSlot::Afternoon => 1,
            TimeSlot::Evening => 2,
            TimeSlot::Night => 3,
        }
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Night => "Night",
        };
        f.pad(name)
    }
}

/// Week order of the grid rows.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub day: Weekday,
    pub slot: TimeSlot,
    pub energy: f64,
    pub engagement: f64,
}

/// Average energy and engagement for every weekday and [TimeSlot] pair. The grid is always dense:
/// 28 cells, Sunday first, slots in day order. A cell without entries reports 0 for both values,
/// which can't be told apart from a cell whose entries really average to 0.
pub fn time_of_day_grid<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> Vec<HeatmapCell> {
    let mut cells = [[(Mean::default(), Mean::default()); 4]; 7];

    for entry in entries {
        let local = entry.timestamp.with_timezone(tz);
        let day = local.weekday().num_days_from_sunday() as usize;
        let slot = TimeSlot::from_hour(local.hour()).index();
        let (energy, engagement) = &mut cells[day][slot];
        energy.push(entry.energy);
        engagement.push(entry.engagement);
    }

    WEEK.iter()
        .zip(cells)
        .flat_map(|(day, row)| {
            TimeSlot::ALL
                .iter()
                .zip(row)
                .map(move |(slot, (energy, engagement))| HeatmapCell {
                    day: *day,
                    slot: *slot,
                    energy: energy.value(),
                    engagement: engagement.value(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc, Weekday};

    use crate::{metrics::test_entries::entry, storage::entities::Mood};

    use super::{time_of_day_grid, TimeSlot};

    #[test]
    fn slot_boundaries() {
        assert_eq!(TimeSlot::from_hour(0), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(4), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(5), TimeSlot::Morning);
        assert_eq!(TimeSlot::from_hour(11), TimeSlot::Morning);
        assert_eq!(TimeSlot::from_hour(12), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::from_hour(17), TimeSlot::Evening);
        assert_eq!(TimeSlot::from_hour(20), TimeSlot::Evening);
        assert_eq!(TimeSlot::from_hour(21), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(23), TimeSlot::Night);
    }

    #[test]
    fn grid_is_dense_and_sunday_first() {
        let grid = time_of_day_grid(&[], &Utc);

        assert_eq!(grid.len(), 28);
        assert_eq!((grid[0].day, grid[0].slot), (Weekday::Sun, TimeSlot::Morning));
        assert_eq!((grid[3].day, grid[3].slot), (Weekday::Sun, TimeSlot::Night));
        assert_eq!((grid[4].day, grid[4].slot), (Weekday::Mon, TimeSlot::Morning));
        assert_eq!((grid[27].day, grid[27].slot), (Weekday::Sat, TimeSlot::Night));
    }

    #[test]
    fn empty_cell_looks_like_zero_average() {
        // 2025-03-17 is a Monday
        let monday_morning = Utc.with_ymd_and_hms(2025, 3, 17, 8, 0, 0).unwrap();
        let entries = vec![entry("a", monday_morning, Mood::Neutral, 0., 0., "work")];

        let grid = time_of_day_grid(&entries, &Utc);
        let filled = grid
            .iter()
            .find(|v| v.day == Weekday::Mon && v.slot == TimeSlot::Morning)
            .unwrap();
        let empty = grid
            .iter()
            .find(|v| v.day == Weekday::Tue && v.slot == TimeSlot::Morning)
            .unwrap();

        assert_eq!((filled.energy, filled.engagement), (0., 0.));
        assert_eq!((empty.energy, empty.engagement), (0., 0.));
    }

    #[test]
    fn cells_average_by_local_time() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        // Saturday 20:30 UTC is Saturday 22:30 two hours east
        let saturday = Utc.with_ymd_and_hms(2025, 3, 22, 20, 30, 0).unwrap();
        let entries = vec![
            entry("a", saturday, Mood::Happy, 1., 0.5, "social"),
            entry("b", saturday, Mood::Happy, 0.5, 1., "social"),
        ];

        let utc_grid = time_of_day_grid(&entries, &Utc);
        let east_grid = time_of_day_grid(&entries, &east);

        let evening = utc_grid
            .iter()
            .find(|v| v.day == Weekday::Sat && v.slot == TimeSlot::Evening)
            .unwrap();
        assert_eq!((evening.energy, evening.engagement), (0.75, 0.75));

        let night = east_grid
            .iter()
            .find(|v| v.day == Weekday::Sat && v.slot == TimeSlot::Night)
            .unwrap();
        assert_eq!(night.energy, 0.75);
    }
}
