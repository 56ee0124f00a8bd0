//! Command-line interface for annuaire.
//!
//! This module provides the CLI structure for the `annuaire` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, EditCommand, FilterArg, ListCommand, OutputFormat, RemoveCommand,
    ResetCommand, ShowCommand, SortArg, StatsCommand, ViewArg,
};

use crate::logging::Verbosity;

/// annuaire - A small employee directory
///
/// Add, edit, remove, search and summarize the people of your team. The
/// directory is kept in a local database and starts with demo data.
#[derive(Debug, Parser)]
#[command(name = "annuaire")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a person
    Add(AddCommand),

    /// Edit fields of a person
    Edit(EditCommand),

    /// Remove a person
    #[command(alias = "rm")]
    Remove(RemoveCommand),

    /// Show one person
    Show(ShowCommand),

    /// Search, filter and sort the directory
    #[command(alias = "ls")]
    List(ListCommand),

    /// Show directory statistics
    Stats(StatsCommand),

    /// Restore the demo people or clear the directory
    Reset(ResetCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
