//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::person::{NewPerson, PersonUpdate};
use crate::query::{FilterBy, SortBy};
use crate::view::ViewMode;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Full name
    #[arg(short, long)]
    pub name: String,

    /// Job title
    #[arg(short, long)]
    pub job: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AddCommand {
    /// The submitted fields.
    #[must_use]
    pub fn fields(&self) -> NewPerson {
        NewPerson::new(&self.name, &self.job, &self.email)
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the person to edit
    pub id: String,

    /// New full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New job title
    #[arg(short, long)]
    pub job: Option<String>,

    /// New email address
    #[arg(short, long)]
    pub email: Option<String>,
}

impl EditCommand {
    /// The fields to merge into the record.
    #[must_use]
    pub fn update(&self) -> PersonUpdate {
        PersonUpdate {
            name: self.name.clone(),
            job: self.job.clone(),
            email: self.email.clone(),
        }
    }
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the person to remove
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the person to show
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Case-insensitive text to search for
    #[arg(default_value = "")]
    pub search: String,

    /// Fields the search applies to (defaults to configuration)
    #[arg(short, long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Result order (defaults to configuration)
    #[arg(short, long, value_enum)]
    pub sort: Option<SortArg>,

    /// Layout (defaults to configuration)
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Clear the directory instead of restoring the demo people
    #[arg(long)]
    pub empty: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Search field argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Name, job or email
    All,
    /// Name only
    Name,
    /// Job only
    Job,
}

impl From<FilterArg> for FilterBy {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Name => Self::Name,
            FilterArg::Job => Self::Job,
        }
    }
}

/// Sort order argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Alphabetical by name
    Name,
    /// Alphabetical by job
    Job,
    /// Most recently added first
    Recent,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => Self::Name,
            SortArg::Job => Self::Job,
            SortArg::Recent => Self::Recent,
        }
    }
}

/// Layout argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    /// One card per person
    Grid,
    /// One row per person
    List,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Grid => Self::Grid,
            ViewArg::List => Self::List,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
