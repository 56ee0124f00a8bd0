//! Text rendering of directory views.
//!
//! Both layouts go through [`render`]; the [`ViewMode`] only decides how each
//! record is laid out.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::Person;

/// Layout of a rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One card per person.
    #[default]
    Grid,
    /// One aligned row per person.
    List,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Up to two upper-cased initials taken from the words of `name`.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Human-readable age of a record.
#[must_use]
pub fn time_ago(date_added: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - date_added).num_days().max(0);
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => plural(days / 7, "week"),
        _ => plural(days / 30, "month"),
    }
}

/// Age label for a record, `"recently"` when its date is unknown.
#[must_use]
pub fn added_label(person: &Person, now: DateTime<Utc>) -> String {
    person
        .date_added
        .map_or_else(|| "recently".to_string(), |added| time_ago(added, now))
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Render `people` in the given layout.
#[must_use]
pub fn render(people: &[&Person], mode: ViewMode, now: DateTime<Utc>) -> String {
    match mode {
        ViewMode::Grid => render_cards(people, now),
        ViewMode::List => render_rows(people, now),
    }
}

/// Render the result of a search, with a header or a "no results" notice.
#[must_use]
pub fn render_results(
    people: &[&Person],
    search: &str,
    mode: ViewMode,
    now: DateTime<Utc>,
) -> String {
    if search.is_empty() {
        return render(people, mode, now);
    }
    if people.is_empty() {
        return format!("No results for \"{search}\".\nCheck the spelling or try a broader term.\n");
    }

    let noun = if people.len() == 1 { "result" } else { "results" };
    format!(
        "{} {noun} for \"{search}\"\n\n{}",
        people.len(),
        render(people, mode, now)
    )
}

fn render_cards(people: &[&Person], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (i, person) in people.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}] {}", initials(&person.name), person.name);
        let _ = writeln!(out, "     {}", person.job);
        let _ = writeln!(out, "     {}", person.email);
        let _ = writeln!(
            out,
            "     added {} (id {})",
            added_label(person, now),
            person.id
        );
    }
    out
}

fn render_rows(people: &[&Person], now: DateTime<Utc>) -> String {
    let name_w = column_width(people, "NAME", |p| p.name.as_str());
    let job_w = column_width(people, "JOB", |p| p.job.as_str());
    let email_w = column_width(people, "EMAIL", |p| p.email.as_str());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_w$}  {:<job_w$}  {:<email_w$}  ADDED",
        "NAME", "JOB", "EMAIL"
    );
    for person in people {
        let _ = writeln!(
            out,
            "{:<name_w$}  {:<job_w$}  {:<email_w$}  {}",
            person.name,
            person.job,
            person.email,
            added_label(person, now)
        );
    }
    out
}

fn column_width(people: &[&Person], header: &str, field: impl Fn(&Person) -> &str) -> usize {
    people
        .iter()
        .map(|p| field(p).chars().count())
        .fold(header.chars().count(), usize::max)
}
