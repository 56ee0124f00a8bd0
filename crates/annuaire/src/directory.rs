//! The record store.
//!
//! `Directory` keeps the people in memory, in insertion order, and writes the
//! whole list back to its [`KeyValueStore`] after every successful mutation.
//! Display order is never stored; it comes from a [`Query`].

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::person::{NewPerson, Person, PersonId, PersonUpdate};
use crate::query::Query;
use crate::seed::demo_people;
use crate::stats::{DirectoryStats, StatsOptions};
use crate::storage::{KeyValueStore, PEOPLE_BACKUP_KEY, PEOPLE_KEY, PRESENTATION_SEEN_KEY};

/// In-memory directory mirrored to a key-value store.
#[derive(Debug)]
pub struct Directory<S> {
    store: S,
    people: Vec<Person>,
}

impl<S: KeyValueStore> Directory<S> {
    /// Load the directory from `store`.
    ///
    /// When nothing has been persisted yet, the directory starts from the
    /// demo dataset (or empty when `seed_demo_data` is false) and that
    /// starting state is saved.
    ///
    /// Stored data is decoded record by record. Records that cannot be read
    /// are skipped; if the value is not a list at all, the directory starts
    /// over as above. In both cases the stored value is first copied to
    /// [`PEOPLE_BACKUP_KEY`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn load(store: S, seed_demo_data: bool) -> Result<Self> {
        let persisted = store.get(PEOPLE_KEY)?;
        let mut directory = Self {
            store,
            people: Vec::new(),
        };

        let Some(raw) = persisted else {
            directory.start_over(seed_demo_data)?;
            return Ok(directory);
        };

        match decode_people(&raw) {
            Ok((people, 0)) => {
                debug!("Loaded {} people", people.len());
                directory.people = people;
            }
            Ok((people, skipped)) => {
                warn!(
                    "Skipped {} unreadable records, kept {}; stored data copied to {}",
                    skipped,
                    people.len(),
                    PEOPLE_BACKUP_KEY
                );
                directory.store.set(PEOPLE_BACKUP_KEY, &raw)?;
                directory.people = people;
                directory.save()?;
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable directory data ({}); copied to {}",
                    e, PEOPLE_BACKUP_KEY
                );
                directory.store.set(PEOPLE_BACKUP_KEY, &raw)?;
                directory.start_over(seed_demo_data)?;
            }
        }

        Ok(directory)
    }

    fn start_over(&mut self, seed_demo_data: bool) -> Result<()> {
        self.people = starting_people(seed_demo_data, Utc::now());
        info!("Starting a new directory with {} people", self.people.len());
        self.save()
    }

    /// All people, in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Person] {
        &self.people
    }

    /// Look up one person.
    #[must_use]
    pub fn get(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    /// Number of people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Check whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Add a person with a fresh id, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be persisted.
    pub fn add(&mut self, fields: NewPerson) -> Result<Person> {
        let person = Person::new(fields);
        debug!("Adding person {}", person.id);
        self.people.push(person.clone());
        self.save()?;
        Ok(person)
    }

    /// Merge `update` into the person with the given id.
    ///
    /// Returns the updated record, or `None` (without persisting anything)
    /// when no person has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be persisted.
    pub fn update(&mut self, id: &PersonId, update: PersonUpdate) -> Result<Option<Person>> {
        let Some(person) = self.people.iter_mut().find(|p| &p.id == id) else {
            debug!("Update ignored, no person {}", id);
            return Ok(None);
        };

        person.apply(update);
        let updated = person.clone();
        debug!("Updated person {}", id);
        self.save()?;
        Ok(Some(updated))
    }

    /// Remove the person with the given id.
    ///
    /// Returns `false` (without persisting anything) when no person has
    /// that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be persisted.
    pub fn remove(&mut self, id: &PersonId) -> Result<bool> {
        let before = self.people.len();
        self.people.retain(|p| &p.id != id);
        if self.people.len() == before {
            debug!("Remove ignored, no person {}", id);
            return Ok(false);
        }

        debug!("Removed person {}", id);
        self.save()?;
        Ok(true)
    }

    /// Replace every record with the demo dataset, or clear the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be persisted.
    pub fn reset(&mut self, seed_demo_data: bool) -> Result<()> {
        self.people = starting_people(seed_demo_data, Utc::now());
        info!("Directory reset to {} people", self.people.len());
        self.save()
    }

    /// Filtered and sorted view of the directory.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<&Person> {
        query.apply(&self.people)
    }

    /// Summary statistics as of `now`.
    #[must_use]
    pub fn stats(&self, options: &StatsOptions, now: DateTime<Utc>) -> DirectoryStats {
        DirectoryStats::compute(&self.people, options, now)
    }

    /// Whether the one-time welcome has already been shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn presentation_seen(&self) -> Result<bool> {
        Ok(self.store.get(PRESENTATION_SEEN_KEY)?.as_deref() == Some("true"))
    }

    /// Record that the one-time welcome has been shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn mark_presentation_seen(&mut self) -> Result<()> {
        self.store.set(PRESENTATION_SEEN_KEY, "true")
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the directory and return its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn save(&mut self) -> Result<()> {
        let serialized = serde_json::to_string(&self.people)?;
        self.store.set(PEOPLE_KEY, &serialized)
    }
}

/// Decode a stored list, returning the readable records and how many were
/// skipped.
fn decode_people(raw: &str) -> serde_json::Result<(Vec<Person>, usize)> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();

    let people: Vec<Person> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Person>(value) {
            Ok(person) => Some(person),
            Err(e) => {
                warn!("Skipping unreadable record: {}", e);
                None
            }
        })
        .collect();

    let skipped = total - people.len();
    Ok((people, skipped))
}

fn starting_people(seed_demo_data: bool, now: DateTime<Utc>) -> Vec<Person> {
    if seed_demo_data {
        demo_people(now)
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterBy, SortBy};
    use crate::storage::{MemoryStore, SqliteStore};

    fn seeded() -> Directory<MemoryStore> {
        Directory::load(MemoryStore::new(), true).expect("failed to load directory")
    }

    fn empty() -> Directory<MemoryStore> {
        Directory::load(MemoryStore::new(), false).expect("failed to load directory")
    }

    fn persisted(directory: &Directory<MemoryStore>) -> Vec<Person> {
        let raw = directory.store().get(PEOPLE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_load_empty_store_seeds_demo_data() {
        let directory = seeded();
        assert_eq!(directory.len(), 5);
        assert_eq!(persisted(&directory).len(), 5);
    }

    #[test]
    fn test_load_empty_store_without_seed() {
        let directory = empty();
        assert!(directory.is_empty());
        assert_eq!(
            directory.store().get(PEOPLE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_load_malformed_data_falls_back() {
        crate::logging::init_test_logging();
        let mut store = MemoryStore::new();
        store.set(PEOPLE_KEY, "{not json").unwrap();

        let directory = Directory::load(store, true).unwrap();
        assert_eq!(directory.len(), 5);
        assert_eq!(persisted(&directory).len(), 5);
        assert_eq!(
            directory.store().get(PEOPLE_BACKUP_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_load_keeps_records_without_date() {
        let raw = r#"[
            {"id": "a", "name": "Ana", "job": "Dev", "email": "ana@x.io", "dateAdded": "2024-05-29T16:26:40Z"},
            {"id": "b", "name": "Bo", "job": "Dev", "email": "bo@x.io"}
        ]"#;
        let mut store = MemoryStore::new();
        store.set(PEOPLE_KEY, raw).unwrap();

        let directory = Directory::load(store, true).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.get(&PersonId::from("b")).unwrap().date_added.is_none());
        // Fully readable data is neither rewritten nor backed up.
        assert_eq!(directory.store().get(PEOPLE_KEY).unwrap().as_deref(), Some(raw));
        assert_eq!(directory.store().get(PEOPLE_BACKUP_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_skips_unreadable_records() {
        crate::logging::init_test_logging();
        let raw = r#"[
            {"id": "a", "name": "Ana", "job": "Dev", "email": "ana@x.io"},
            {"id": "b", "name": 42},
            "garbage"
        ]"#;
        let mut store = MemoryStore::new();
        store.set(PEOPLE_KEY, raw).unwrap();

        let directory = Directory::load(store, true).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(persisted(&directory)[0].name, "Ana");
        assert_eq!(
            directory.store().get(PEOPLE_BACKUP_KEY).unwrap().as_deref(),
            Some(raw)
        );
    }

    #[test]
    fn test_load_persisted_empty_list_stays_empty() {
        let mut store = MemoryStore::new();
        store.set(PEOPLE_KEY, "[]").unwrap();

        let directory = Directory::load(store, true).unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_load_legacy_numeric_ids() {
        let mut store = MemoryStore::new();
        store
            .set(
                PEOPLE_KEY,
                r#"[{"id": 1717000000000.25, "name": "Ana", "job": "Dev", "email": "ana@x.io", "dateAdded": "2024-05-29T16:26:40.000Z"}]"#,
            )
            .unwrap();

        let directory = Directory::load(store, true).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.list()[0].name, "Ana");
    }

    #[test]
    fn test_add_increases_size_by_one() {
        let mut directory = seeded();
        let before = directory.len();

        let added = directory
            .add(NewPerson::new("A", "B", "a@b.com"))
            .unwrap();

        assert_eq!(directory.len(), before + 1);
        assert!(!added.id.as_str().is_empty());
        assert!((Utc::now() - added.date_added.unwrap()).num_seconds() < 1);
        assert_eq!(directory.list().last(), Some(&added));
        assert_eq!(persisted(&directory).len(), before + 1);
    }

    #[test]
    fn test_add_does_not_deduplicate() {
        let mut directory = empty();
        let fields = NewPerson::new("Twin", "Dev", "twin@x.io");
        let a = directory.add(fields.clone()).unwrap();
        let b = directory.add(fields).unwrap();

        assert_eq!(directory.len(), 2);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut directory = seeded();
        let before = directory.list().to_vec();

        assert!(!directory.remove(&PersonId::from("missing")).unwrap());
        assert_eq!(directory.list(), before.as_slice());
    }

    #[test]
    fn test_remove_existing() {
        let mut directory = seeded();
        let id = PersonId::from("2");

        assert!(directory.remove(&id).unwrap());
        assert!(directory.get(&id).is_none());
        assert!(persisted(&directory).iter().all(|p| p.id != id));
    }

    #[test]
    fn test_update_preserves_unspecified_fields() {
        let mut directory = seeded();
        let id = PersonId::from("3");
        let original = directory.get(&id).unwrap().clone();

        let updated = directory
            .update(
                &id,
                PersonUpdate {
                    email: Some("sophie@nouvelle.fr".to_string()),
                    ..PersonUpdate::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.email, "sophie@nouvelle.fr");
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.job, original.job);
        assert_eq!(updated.date_added, original.date_added);
        assert_eq!(directory.get(&id), Some(&updated));
        assert!(persisted(&directory).contains(&updated));
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut directory = seeded();
        let before = directory.list().to_vec();

        let result = directory
            .update(
                &PersonId::from("missing"),
                PersonUpdate {
                    name: Some("Nobody".to_string()),
                    ..PersonUpdate::default()
                },
            )
            .unwrap();

        assert!(result.is_none());
        assert_eq!(directory.list(), before.as_slice());
    }

    #[test]
    fn test_update_keeps_position() {
        let mut directory = seeded();
        let id = PersonId::from("1");
        directory
            .update(
                &id,
                PersonUpdate {
                    name: Some("Zoé Dubois".to_string()),
                    ..PersonUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(directory.list()[0].id, id);
    }

    #[test]
    fn test_query_and_stats_over_seed() {
        let directory = seeded();

        let view = directory.query(&Query::new("designer", FilterBy::Job, SortBy::Name));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].job, "Designer UX/UI");

        let recent = directory.query(&Query::new("", FilterBy::All, SortBy::Recent));
        let order: Vec<&str> = recent.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["4", "3", "1", "5", "2"]);

        let stats = directory.stats(&StatsOptions::default(), Utc::now());
        assert_eq!(stats.total_people, 5);
        assert_eq!(stats.unique_jobs, 5);
        assert_eq!(stats.recent_additions, 5);
        assert_eq!(stats.most_common_domain, "entreprise.com");
        assert!((stats.average_additions_per_day - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let mut directory = seeded();
        directory.reset(false).unwrap();
        assert!(directory.is_empty());
        assert!(persisted(&directory).is_empty());

        directory.reset(true).unwrap();
        assert_eq!(directory.len(), 5);
    }

    #[test]
    fn test_presentation_flag() {
        let mut directory = seeded();
        assert!(!directory.presentation_seen().unwrap());

        directory.mark_presentation_seen().unwrap();
        assert!(directory.presentation_seen().unwrap());
    }

    #[test]
    fn test_reload_from_sqlite_store() {
        let mut directory = Directory::load(SqliteStore::open_in_memory().unwrap(), false).unwrap();
        let added = directory
            .add(NewPerson::new("Léa Petit", "Data Analyst", "lea@corp.fr"))
            .unwrap();

        let reloaded = Directory::load(directory.into_store(), true).unwrap();
        assert_eq!(reloaded.list(), &[added]);
    }
}
