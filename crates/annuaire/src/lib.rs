//! `annuaire` - A small employee directory
//!
//! This library provides the record store, search and sort, statistics and
//! persistence behind the `annuaire` command-line tool.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod person;
pub mod query;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod validation;
pub mod view;

pub use config::Config;
pub use directory::Directory;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use person::{NewPerson, Person, PersonId, PersonUpdate};
pub use query::{FilterBy, Query, SortBy};
pub use stats::{DirectoryStats, StatsOptions};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use view::ViewMode;
