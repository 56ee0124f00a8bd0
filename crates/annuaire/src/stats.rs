//! Summary statistics over the directory.
//!
//! Everything here is recomputed from the full record list on demand; there
//! is no caching and no incremental update.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::person::Person;

/// Placeholder reported when no email domain can be determined.
pub const NO_DOMAIN: &str = "N/A";

/// Windows and limits used when computing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsOptions {
    /// Width of the "recent additions" window, in days.
    pub recent_days: u32,
    /// Width of the window used for the daily average, in days.
    pub average_window_days: u32,
    /// Number of entries kept in the job distribution.
    pub top_jobs: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            recent_days: 7,
            average_window_days: 30,
            top_jobs: 5,
        }
    }
}

/// One row of the job distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobShare {
    /// Normalized job with its first letter capitalized.
    pub job: String,
    /// Number of people holding it.
    pub count: usize,
    /// Share of the whole directory, rounded to the nearest percent.
    pub percentage: u32,
}

/// Aggregate figures for a list of people.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryStats {
    /// Number of records.
    pub total_people: usize,
    /// Number of distinct jobs, compared lower-cased and trimmed.
    pub unique_jobs: usize,
    /// Records added within the recent window.
    pub recent_additions: usize,
    /// Most frequent jobs, most common first.
    pub job_distribution: Vec<JobShare>,
    /// Records added per day over the averaging window, one decimal.
    pub average_additions_per_day: f64,
    /// Most frequent email domain, or [`NO_DOMAIN`].
    pub most_common_domain: String,
}

impl DirectoryStats {
    /// Compute statistics for `people` as of `now`.
    #[must_use]
    pub fn compute(people: &[Person], options: &StatsOptions, now: DateTime<Utc>) -> Self {
        if people.is_empty() {
            return Self::empty();
        }

        let total_people = people.len();
        let job_counts = count_in_order(people.iter().map(Person::normalized_job));
        let unique_jobs = job_counts.len();

        let recent_additions = count_within(people, now, options.recent_days);

        let mut job_distribution: Vec<JobShare> = job_counts
            .into_iter()
            .map(|(job, count)| JobShare {
                job: capitalize(&job),
                count,
                percentage: percentage(count, total_people),
            })
            .collect();
        job_distribution.sort_by(|a, b| b.count.cmp(&a.count));
        job_distribution.truncate(options.top_jobs);

        let average_additions_per_day = if options.average_window_days == 0 {
            0.0
        } else {
            let in_window = count_within(people, now, options.average_window_days);
            per_day(in_window, options.average_window_days)
        };

        let most_common_domain = count_in_order(
            people
                .iter()
                .filter_map(Person::email_domain)
                .map(str::to_string),
        )
        .into_iter()
        .fold(None::<(String, usize)>, |best, (domain, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((domain, count)),
        })
        .map_or_else(|| NO_DOMAIN.to_string(), |(domain, _)| domain);

        Self {
            total_people,
            unique_jobs,
            recent_additions,
            job_distribution,
            average_additions_per_day,
            most_common_domain,
        }
    }

    /// Statistics of an empty directory.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_people: 0,
            unique_jobs: 0,
            recent_additions: 0,
            job_distribution: Vec::new(),
            average_additions_per_day: 0.0,
            most_common_domain: NO_DOMAIN.to_string(),
        }
    }
}

/// Count occurrences, keeping keys in the order they were first seen.
fn count_in_order(values: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        if let Some(&i) = index.get(&value) {
            counts[i].1 += 1;
        } else {
            index.insert(value.clone(), counts.len());
            counts.push((value, 1));
        }
    }

    counts
}

/// Records whose `date_added` lies in `[now - days, now]`.
///
/// A window reaching past the earliest representable date has no lower bound.
fn count_within(people: &[Person], now: DateTime<Utc>, days: u32) -> usize {
    let since = now.checked_sub_signed(Duration::days(i64::from(days)));
    people
        .iter()
        .filter_map(|p| p.date_added)
        .filter(|added| since.map_or(true, |since| *added >= since) && *added <= now)
        .count()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> u32 {
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Average over `days`, rounded to one decimal.
#[allow(clippy::cast_precision_loss)]
fn per_day(count: usize, days: u32) -> f64 {
    let value = count as f64 / f64::from(days);
    (value * 10.0).round() / 10.0
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
