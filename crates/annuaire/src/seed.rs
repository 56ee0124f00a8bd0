//! Demo records used when no directory has been persisted yet.

use chrono::{DateTime, Duration, Utc};

use crate::person::{NewPerson, Person, PersonId};

/// (id, name, job, email, days before `now`)
const DEMO_PEOPLE: &[(&str, &str, &str, &str, i64)] = &[
    (
        "1",
        "Marie Dubois",
        "Développeuse Frontend",
        "marie.dubois@entreprise.com",
        2,
    ),
    (
        "2",
        "Pierre Martin",
        "Designer UX/UI",
        "pierre.martin@entreprise.com",
        5,
    ),
    (
        "3",
        "Sophie Laurent",
        "Chef de Projet",
        "sophie.laurent@entreprise.com",
        1,
    ),
    (
        "4",
        "Thomas Durand",
        "Développeur Backend",
        "thomas.durand@entreprise.com",
        0,
    ),
    (
        "5",
        "Claire Moreau",
        "Data Analyst",
        "claire.moreau@entreprise.com",
        3,
    ),
];

/// Build the demo dataset with timestamps relative to `now`.
#[must_use]
pub fn demo_people(now: DateTime<Utc>) -> Vec<Person> {
    DEMO_PEOPLE
        .iter()
        .map(|&(id, name, job, email, days_ago)| {
            Person::with_id(
                PersonId::from(id),
                NewPerson::new(name, job, email),
                now - Duration::days(days_ago),
            )
        })
        .collect()
}
