//! Commands the presentation layer runs against the journal. Each one is a full
//! read-modify-write of a single collection, entries and activities never share a write.

pub mod activity;

use anyhow::{bail, Result};
use chrono::TimeZone;
use tracing::{info, instrument, warn};

use crate::{
    metrics::MetricsReport,
    storage::{
        entities::{Entry, EntryDraft},
        journal_storage::JournalStorage,
        key_value::KeyValueStore,
    },
    utils::{clock::Clock, id::IdGenerator},
};

use activity::find_activity;

/// Fresh identities are drawn again when they clash with a stored one. Random UUIDs never get
/// close to this limit.
const MAX_ID_ATTEMPTS: usize = 8;

pub struct Journal<S> {
    storage: JournalStorage<S>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl<S: KeyValueStore> Journal<S> {
    pub fn new(store: S, clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            storage: JournalStorage::new(store),
            clock,
            ids,
        }
    }

    /// Materializes `draft` into a new entry and stores it. The draft isn't validated, callers
    /// are expected to have rejected blank activities already.
    #[instrument(skip(self))]
    pub async fn add_entry(&self, draft: EntryDraft) -> Result<Entry> {
        let mut entries = self.storage.load_entries().await;

        let id = self.fresh_id(&entries)?;
        let entry = draft.into_entry(id, self.clock.time());
        entries.push(entry.clone());
        self.storage.save_entries(&entries).await;

        info!("Added entry {} for {}", entry.id, entry.activity);
        Ok(entry)
    }

    fn fresh_id(&self, entries: &[Entry]) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if entries.iter().all(|v| v.id != id) {
                return Ok(id);
            }
            warn!("Generated id {id} is already taken");
        }
        bail!("Couldn't generate a unique entry id in {MAX_ID_ATTEMPTS} attempts")
    }

    /// Removes every entry with `id` and tells whether anything matched. Unknown ids are not an
    /// error.
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: &str) -> bool {
        let mut entries = self.storage.load_entries().await;
        let before = entries.len();
        entries.retain(|v| v.id != id);
        let removed = entries.len() != before;
        if !removed {
            info!("No entry with id {id}");
        }
        self.storage.save_entries(&entries).await;
        removed
    }

    /// Registers an activity label and returns the form it should be displayed in. A label that
    /// matches a known activity up to case and spacing returns the known one unchanged. Blank input
    /// gives back an empty string and stores nothing.
    #[instrument(skip(self))]
    pub async fn add_activity(&self, label: &str) -> String {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let mut activities = self.storage.load_activities().await;
        if let Some(existing) = find_activity(&activities, trimmed) {
            return existing.clone();
        }

        activities.push(trimmed.to_string());
        self.storage.save_activities(&activities).await;
        info!("Added activity {trimmed}");
        trimmed.to_string()
    }

    /// Entries in the order they were stored.
    pub async fn entries(&self) -> Vec<Entry> {
        self.storage.load_entries().await
    }

    /// Entries ordered for display, latest first.
    pub async fn entries_newest_first(&self) -> Vec<Entry> {
        let mut entries = self.storage.load_entries().await;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub async fn activities(&self) -> Vec<String> {
        self.storage.load_activities().await
    }

    /// Computes every metric view from a fresh snapshot at the current time.
    pub async fn metrics<Tz: TimeZone>(&self, tz: &Tz) -> MetricsReport {
        let entries = self.storage.load_entries().await;
        MetricsReport::compute(&entries, self.clock.time(), tz)
    }
}

#[cfg(test)]
mod journal_tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use anyhow::Result;
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::{
        storage::{
            entities::{EntryDraft, Mood, LOCAL_USER},
            journal_storage::DEFAULT_ACTIVITIES,
            key_value::MemoryStore,
        },
        utils::{
            clock::FixedClock,
            id::{IdGenerator, MockIdGenerator, UuidGenerator},
            logging::TEST_LOGGING,
        },
    };

    use super::Journal;

    const TEST_DATE_TIME: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    );

    fn test_now() -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_DATE_TIME)
    }

    fn test_journal(store: Arc<MemoryStore>) -> Journal<Arc<MemoryStore>> {
        journal_with_ids(store, UuidGenerator)
    }

    fn journal_with_ids(
        store: Arc<MemoryStore>,
        ids: impl IdGenerator,
    ) -> Journal<Arc<MemoryStore>> {
        Journal::new(store, Box::new(FixedClock(test_now())), Box::new(ids))
    }

    #[tokio::test]
    async fn add_entry_appends_new_identity() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));
        let first = journal.add_entry(EntryDraft::new("work")).await?;

        let prior = journal.entries().await;
        let second = journal
            .add_entry(EntryDraft::new("study").with_mood(Mood::Happy))
            .await?;
        let after = journal.entries().await;

        assert_eq!(after.len(), prior.len() + 1);
        assert!(prior.iter().all(|v| v.id != second.id));
        assert_ne!(first.id, second.id);
        assert_eq!(after.last(), Some(&second));
        Ok(())
    }

    #[tokio::test]
    async fn add_entry_fills_owner_and_time() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));
        let chosen = test_now() - Duration::hours(3);

        let defaulted = journal.add_entry(EntryDraft::new("work")).await?;
        let backdated = journal
            .add_entry(
                EntryDraft::new("exercise")
                    .with_timestamp(chosen)
                    .with_energy(0.75)
                    .with_notes("ran 5k"),
            )
            .await?;

        assert_eq!(defaulted.user_id, LOCAL_USER);
        assert_eq!(defaulted.timestamp, test_now());
        assert_eq!(backdated.timestamp, chosen);
        assert_eq!(backdated.energy, 0.75);
        assert_eq!(backdated.notes.as_deref(), Some("ran 5k"));
        Ok(())
    }

    #[tokio::test]
    async fn add_entry_keeps_out_of_range_values() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));

        let entry = journal
            .add_entry(EntryDraft::new("work").with_energy(3.).with_engagement(-1.))
            .await?;

        assert_eq!((entry.energy, entry.engagement), (3., -1.));
        Ok(())
    }

    #[tokio::test]
    async fn colliding_ids_are_redrawn() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::new());
        let mut ids = MockIdGenerator::new();
        let calls = AtomicUsize::new(0);
        ids.expect_next_id().returning(move || {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => "same".to_string(),
                _ => "other".to_string(),
            }
        });
        let journal = journal_with_ids(store, ids);

        let first = journal.add_entry(EntryDraft::new("work")).await?;
        let second = journal.add_entry(EntryDraft::new("work")).await?;

        assert_eq!(first.id, "same");
        assert_eq!(second.id, "other");
        Ok(())
    }

    #[tokio::test]
    async fn stuck_id_generator_fails() -> Result<()> {
        *TEST_LOGGING;
        let mut ids = MockIdGenerator::new();
        ids.expect_next_id().returning(|| "same".to_string());
        let journal = journal_with_ids(Arc::new(MemoryStore::new()), ids);

        journal.add_entry(EntryDraft::new("work")).await?;
        assert!(journal.add_entry(EntryDraft::new("work")).await.is_err());
        assert_eq!(journal.entries().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));
        let kept = journal.add_entry(EntryDraft::new("work")).await?;
        let removed = journal.add_entry(EntryDraft::new("study")).await?;

        assert!(journal.delete_entry(&removed.id).await);
        let once = journal.entries().await;
        assert!(!journal.delete_entry(&removed.id).await);
        let twice = journal.entries().await;

        assert_eq!(once, vec![kept]);
        assert_eq!(once, twice);
        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_is_noop() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));
        journal.add_entry(EntryDraft::new("work")).await?;

        assert!(!journal.delete_entry("missing").await);

        assert_eq!(journal.entries().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn add_activity_deduplicates_by_canonical_form() {
        let journal = test_journal(Arc::new(MemoryStore::new()));

        assert_eq!(journal.add_activity("Work Out").await, "Work Out");
        let length = journal.activities().await.len();

        assert_eq!(journal.add_activity("  work   out ").await, "Work Out");
        assert_eq!(journal.add_activity("WORK-OUT").await, "Work Out");
        assert_eq!(journal.activities().await.len(), length);
    }

    #[tokio::test]
    async fn add_activity_returns_first_casing() {
        let store = Arc::new(MemoryStore::new());
        let journal = test_journal(store);
        // seed holds "work" in lower case
        assert_eq!(journal.add_activity("Work").await, "work");

        assert_eq!(journal.add_activity("Reading").await, "Reading");
        let length = journal.activities().await.len();
        assert_eq!(journal.add_activity("  reading ").await, "Reading");
        assert_eq!(journal.activities().await.len(), length);
        assert_eq!(journal.activities().await.last().map(String::as_str), Some("Reading"));
    }

    #[tokio::test]
    async fn blank_activity_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let journal = test_journal(store.clone());

        assert_eq!(journal.add_activity("   ").await, "");
        assert_eq!(journal.activities().await, DEFAULT_ACTIVITIES.to_vec());
    }

    #[tokio::test]
    async fn activity_over_quota_is_still_returned() {
        *TEST_LOGGING;
        // the seeded defaults fit, nothing longer does
        let store = Arc::new(MemoryStore::with_quota(80));
        let journal = test_journal(store);

        let label = journal
            .add_activity("  A very long activity label that will not fit ")
            .await;

        assert_eq!(label, "A very long activity label that will not fit");
        assert_eq!(journal.activities().await, DEFAULT_ACTIVITIES.to_vec());
    }

    #[tokio::test]
    async fn listing_is_newest_first() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));
        let older = journal
            .add_entry(EntryDraft::new("work").with_timestamp(test_now() - Duration::days(1)))
            .await?;
        let newer = journal.add_entry(EntryDraft::new("study")).await?;
        let oldest = journal
            .add_entry(EntryDraft::new("chores").with_timestamp(test_now() - Duration::days(7)))
            .await?;

        assert_eq!(journal.entries().await, vec![older.clone(), newer.clone(), oldest.clone()]);
        assert_eq!(journal.entries_newest_first().await, vec![newer, older, oldest]);
        Ok(())
    }

    #[tokio::test]
    async fn metrics_use_clock() -> Result<()> {
        let journal = test_journal(Arc::new(MemoryStore::new()));
        journal
            .add_entry(EntryDraft::new("work").with_timestamp(test_now() - Duration::days(40)))
            .await?;
        journal.add_entry(EntryDraft::new("work")).await?;

        let report = journal.metrics(&Utc).await;

        assert_eq!(report.flow_map.len(), 2);
        assert_eq!(report.trend.len(), 1);
        assert_eq!(report.activities[0].entries, 2);
        Ok(())
    }
}
