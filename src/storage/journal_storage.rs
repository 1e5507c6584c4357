use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{entities::Entry, key_value::KeyValueStore};

pub const ENTRIES_KEY: &str = "reflectr_entries";
pub const ACTIVITIES_KEY: &str = "reflectr_activities";

/// Activities offered before the user adds any of their own.
pub const DEFAULT_ACTIVITIES: [&str; 6] = ["work", "study", "exercise", "social", "commute", "chores"];

/// Classification of whatever sits under a key. Only the accessor decides how failures are
/// recovered from.
#[derive(Debug)]
pub enum StoredValue<T> {
    Absent,
    Parsed(T),
    Malformed(serde_json::Error),
    Unreadable(anyhow::Error),
}

/// Reads and writes journal collections. Reads never fail: broken data is reported through logs and
/// replaced by an empty collection or the default activities. Writes are best effort and only
/// logged when they fail.
pub struct JournalStorage<S> {
    store: S,
}

impl<S: KeyValueStore> JournalStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> StoredValue<T> {
        match self.store.get(key).await {
            Ok(None) => StoredValue::Absent,
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(v) => StoredValue::Parsed(v),
                Err(e) => StoredValue::Malformed(e),
            },
            Err(e) => StoredValue::Unreadable(e),
        }
    }

    /// Serializes and stores `value`, returning whatever went wrong instead of logging it.
    pub async fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }

    #[instrument(skip(self))]
    pub async fn load_entries(&self) -> Vec<Entry> {
        match self.read::<Vec<Entry>>(ENTRIES_KEY).await {
            StoredValue::Parsed(entries) => {
                debug!("Loaded {} entries", entries.len());
                entries
            }
            StoredValue::Absent => vec![],
            StoredValue::Malformed(e) => {
                warn!("Stored entries are malformed, treating them as empty: {e}");
                vec![]
            }
            StoredValue::Unreadable(e) => {
                warn!("Failed to read entries, treating them as empty: {e:?}");
                vec![]
            }
        }
    }

    #[instrument(skip_all, fields(entries = entries.len()))]
    pub async fn save_entries(&self, entries: &[Entry]) {
        if let Err(e) = self.try_write(ENTRIES_KEY, entries).await {
            error!("Failed to save entries: {e:?}");
        }
    }

    /// Stored activity labels. The first read that finds nothing usable stores
    /// [DEFAULT_ACTIVITIES] and returns them.
    #[instrument(skip(self))]
    pub async fn load_activities(&self) -> Vec<String> {
        match self.read::<Vec<String>>(ACTIVITIES_KEY).await {
            StoredValue::Parsed(activities) => return activities,
            StoredValue::Absent => {
                debug!("No activities stored yet, seeding defaults");
            }
            StoredValue::Malformed(e) => {
                warn!("Stored activities are malformed, replacing them with defaults: {e}");
            }
            StoredValue::Unreadable(e) => {
                warn!("Failed to read activities, replacing them with defaults: {e:?}");
            }
        }

        let defaults = DEFAULT_ACTIVITIES.map(String::from).to_vec();
        self.save_activities(&defaults).await;
        defaults
    }

    #[instrument(skip_all, fields(activities = activities.len()))]
    pub async fn save_activities(&self, activities: &[String]) {
        if let Err(e) = self.try_write(ACTIVITIES_KEY, activities).await {
            error!("Failed to save activities: {e:?}");
        }
    }
}
