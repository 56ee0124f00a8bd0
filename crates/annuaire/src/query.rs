//! Filtered and sorted views over the directory.
//!
//! A `Query` is a pure projection: it borrows the records, never mutates or
//! persists them, and is recomputed every time a view is shown.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::person::Person;

/// Which fields the search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterBy {
    /// Name, job or email.
    #[default]
    All,
    /// Name only.
    Name,
    /// Job only.
    Job,
}

/// Display order of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Alphabetical by job.
    Job,
    /// Most recently added first.
    Recent,
}

impl std::fmt::Display for FilterBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Name => write!(f, "name"),
            Self::Job => write!(f, "job"),
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Job => write!(f, "job"),
            Self::Recent => write!(f, "recent"),
        }
    }
}

/// Search, filter and sort settings for one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Case-insensitive substring to look for. Empty matches everything.
    pub search: String,
    /// Fields the search applies to.
    pub filter_by: FilterBy,
    /// Order of the results.
    pub sort_by: SortBy,
}

impl Query {
    /// Create a query.
    #[must_use]
    pub fn new(search: impl Into<String>, filter_by: FilterBy, sort_by: SortBy) -> Self {
        Self {
            search: search.into(),
            filter_by,
            sort_by,
        }
    }

    /// Check whether a single record passes the filter.
    #[must_use]
    pub fn matches(&self, person: &Person) -> bool {
        let needle = self.search.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        match self.filter_by {
            FilterBy::Name => contains(&person.name),
            FilterBy::Job => contains(&person.job),
            FilterBy::All => {
                contains(&person.name) || contains(&person.job) || contains(&person.email)
            }
        }
    }

    /// Filter and sort `people` into a new view.
    #[must_use]
    pub fn apply<'a>(&self, people: &'a [Person]) -> Vec<&'a Person> {
        let mut view: Vec<&Person> = people.iter().filter(|p| self.matches(p)).collect();

        match self.sort_by {
            SortBy::Name => view.sort_by(|a, b| locale_compare(&a.name, &b.name)),
            SortBy::Job => view.sort_by(|a, b| locale_compare(&a.job, &b.job)),
            SortBy::Recent => view.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        }

        view
    }

    /// Check whether a search term is active.
    #[must_use]
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Compare two strings the way a reader expects in a sorted list.
///
/// Accents and case are ignored at first; strings that are equal under that
/// folding are ordered by their raw form so the result is total.
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::{NewPerson, PersonId};
    use chrono::{Duration, Utc};

    fn person(id: &str, name: &str, job: &str, email: &str, days_ago: i64) -> Person {
        Person::with_id(
            PersonId::from(id),
            NewPerson::new(name, job, email),
            Utc::now() - Duration::days(days_ago),
        )
    }

    fn directory() -> Vec<Person> {
        vec![
            person("1", "Marie Dubois", "Développeuse Frontend", "marie@entreprise.com", 2),
            person("2", "Pierre Martin", "Designer UX/UI", "pierre@studio.fr", 5),
            person("3", "Émile Zola", "Écrivain", "emile@lettres.fr", 0),
        ]
    }

    fn ids(view: &[&Person]) -> Vec<String> {
        view.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_job_filter_is_case_insensitive() {
        let people = directory();
        let view = Query::new("designer", FilterBy::Job, SortBy::Name).apply(&people);
        assert_eq!(ids(&view), vec!["2"]);
    }

    #[test]
    fn test_name_filter_ignores_job_and_email() {
        let people = directory();
        let view = Query::new("studio", FilterBy::Name, SortBy::Name).apply(&people);
        assert!(view.is_empty());
    }

    #[test]
    fn test_all_filter_matches_email() {
        let people = directory();
        let view = Query::new("STUDIO", FilterBy::All, SortBy::Name).apply(&people);
        assert_eq!(ids(&view), vec!["2"]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let people = directory();
        let view = Query::default().apply(&people);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_blank_search_is_an_active_search() {
        let people = directory();
        let query = Query::new("  ", FilterBy::All, SortBy::Name);
        assert!(query.has_search());
        assert!(query.apply(&people).is_empty());
    }

    #[test]
    fn test_recent_puts_undated_records_last() {
        let mut undated = person("u", "Undated", "X", "u@x.io", 0);
        undated.date_added = None;
        let people = vec![undated, person("d", "Dated", "X", "d@x.io", 400)];

        let view = Query::new("", FilterBy::All, SortBy::Recent).apply(&people);
        assert_eq!(ids(&view), vec!["d", "u"]);
    }

    #[test]
    fn test_sort_by_name_ignores_accents() {
        let people = directory();
        let view = Query::new("", FilterBy::All, SortBy::Name).apply(&people);
        // "Émile" sorts with E, before "Marie" and "Pierre".
        assert_eq!(ids(&view), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_sort_by_job() {
        let people = directory();
        let view = Query::new("", FilterBy::All, SortBy::Job).apply(&people);
        assert_eq!(ids(&view), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_sort_by_recent_descending() {
        let people = vec![
            person("a", "Day Five", "X", "a@x.io", 5),
            person("b", "Day Zero", "X", "b@x.io", 0),
            person("c", "Day Two", "X", "c@x.io", 2),
        ];
        let view = Query::new("", FilterBy::All, SortBy::Recent).apply(&people);
        assert_eq!(ids(&view), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let people = vec![
            person("first", "Same", "X", "a@x.io", 1),
            person("second", "Same", "X", "b@x.io", 1),
        ];
        let view = Query::new("", FilterBy::All, SortBy::Name).apply(&people);
        assert_eq!(ids(&view), vec!["first", "second"]);
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("éa", "eb"), Ordering::Less);
        assert_eq!(locale_compare("alice", "Bob"), Ordering::Less);
        assert_eq!(locale_compare("Zoé", "zoe"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let people = directory();
        let before = people.clone();
        let _ = Query::new("a", FilterBy::All, SortBy::Recent).apply(&people);
        assert_eq!(people, before);
    }
}
