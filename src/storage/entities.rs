use std::fmt::Display;

use chrono::{DateTime, SubsecRound, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::time::iso_millis;

/// Owner tag stamped on every entry. The journal has a single local user.
pub const LOCAL_USER: &str = "local_user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Mood {
    Happy,
    Calm,
    Stressed,
    Tired,
    Excited,
    Neutral,
}

impl Mood {
    /// RGB colour the mood is displayed with.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Mood::Happy => (0xfb, 0xbf, 0x24),
            Mood::Calm => (0x60, 0xa5, 0xfa),
            Mood::Stressed => (0xf8, 0x71, 0x71),
            Mood::Tired => (0xa7, 0x8b, 0xfa),
            Mood::Excited => (0xfb, 0x92, 0x3c),
            Mood::Neutral => (0x94, 0xa3, 0xb8),
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mood::Happy => write!(f, "Happy"),
            Mood::Calm => write!(f, "Calm"),
            Mood::Stressed => write!(f, "Stressed"),
            Mood::Tired => write!(f, "Tired"),
            Mood::Excited => write!(f, "Excited"),
            Mood::Neutral => write!(f, "Neutral"),
        }
    }
}

/// One journaled observation. This is also the exact shape stored on disk, field order included.
///
/// Energy is expected in [-1, 1] and engagement in [0, 1], but stored values are taken as they
/// are. Range checks only happen where the user types them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub mood: Mood,
    #[serde(serialize_with = "compact_number")]
    pub energy: f64,
    #[serde(serialize_with = "compact_number")]
    pub engagement: f64,
    pub flow: bool,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Writes whole numbers without a fractional part, the way browsers do, so journals written
/// elsewhere keep their bytes when saved again.
fn compact_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.;
    if value.is_finite() && value.fract() == 0. && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Everything the user fills in for a new entry. Identity and owner are assigned by the journal,
/// a missing timestamp means "now".
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub timestamp: Option<DateTime<Utc>>,
    pub mood: Mood,
    pub energy: f64,
    pub engagement: f64,
    pub flow: bool,
    pub activity: String,
    pub notes: Option<String>,
}

impl EntryDraft {
    pub fn new(activity: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            mood: Mood::Neutral,
            energy: 0.,
            engagement: 0.5,
            flow: false,
            activity: activity.into(),
            notes: None,
        }
    }

    pub fn with_mood(self, mood: Mood) -> Self {
        Self { mood, ..self }
    }

    pub fn with_energy(self, energy: f64) -> Self {
        Self { energy, ..self }
    }

    pub fn with_engagement(self, engagement: f64) -> Self {
        Self { engagement, ..self }
    }

    pub fn with_flow(self, flow: bool) -> Self {
        Self { flow, ..self }
    }

    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..self
        }
    }

    pub fn with_notes(self, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..self
        }
    }

    pub(crate) fn into_entry(self, id: String, now: DateTime<Utc>) -> Entry {
        let EntryDraft {
            timestamp,
            mood,
            energy,
            engagement,
            flow,
            activity,
            notes,
        } = self;
        Entry {
            id,
            user_id: LOCAL_USER.to_string(),
            // storage keeps milliseconds only
            timestamp: timestamp.unwrap_or(now).trunc_subsecs(3),
            mood,
            energy,
            engagement,
            flow,
            activity,
            notes,
        }
    }
}
