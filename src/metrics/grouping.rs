use std::collections::HashMap;

use serde::Serialize;

use crate::storage::entities::{Entry, Mood};

use super::Mean;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityAverage {
    pub activity: String,
    pub energy: f64,
    pub engagement: f64,
    pub entries: usize,
}

impl ActivityAverage {
    fn new(activity: String) -> Self {
        Self {
            activity,
            energy: 0.,
            engagement: 0.,
            entries: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodCount {
    pub mood: Mood,
    pub count: usize,
}

/// Average energy and engagement of every activity, most energizing first. Labels are compared
/// exactly as stored, "Work" and "work" are separate groups here.
pub fn activity_averages(entries: &[Entry]) -> Vec<ActivityAverage> {
    let mut index = HashMap::<&str, usize>::new();
    let mut groups: Vec<(ActivityAverage, Mean, Mean)> = vec![];

    for entry in entries {
        let position = *index.entry(entry.activity.as_str()).or_insert_with(|| {
            groups.push((
                ActivityAverage::new(entry.activity.clone()),
                Mean::default(),
                Mean::default(),
            ));
            groups.len() - 1
        });
        let (_, energy, engagement) = &mut groups[position];
        energy.push(entry.energy);
        engagement.push(entry.engagement);
    }

    let mut averages = groups
        .into_iter()
        .map(|(average, energy, engagement)| ActivityAverage {
            energy: energy.value(),
            engagement: engagement.value(),
            entries: energy.count(),
            ..average
        })
        .collect::<Vec<_>>();
    // stable, ties keep the order activities were first seen in
    averages.sort_by(|a, b| b.energy.total_cmp(&a.energy));
    averages
}

/// Number of entries per mood. Moods that never occur are left out, the rest keep the order they
/// first appear in.
pub fn mood_distribution(entries: &[Entry]) -> Vec<MoodCount> {
    let mut counts: Vec<MoodCount> = vec![];
    for entry in entries {
        match counts.iter_mut().find(|v| v.mood == entry.mood) {
            Some(v) => v.count += 1,
            None => counts.push(MoodCount {
                mood: entry.mood,
                count: 1,
            }),
        }
    }
    counts
}
