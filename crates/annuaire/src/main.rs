//! `annuaire` - CLI for the employee directory
//!
//! This binary provides the command-line interface for adding, editing,
//! searching and summarizing the people stored in the directory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use annuaire::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ListCommand, OutputFormat,
    RemoveCommand, ResetCommand, ShowCommand,
};
use annuaire::validation::{validate_new_person, validate_update};
use annuaire::view::{added_label, render_results, ViewMode};
use annuaire::{init_logging, Config, Directory, Error, PersonId, Query, SqliteStore};

type Store = SqliteStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands load the file themselves so a broken one can be inspected
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(cli.config, config_cmd),
        command => command,
    };

    let config = Config::load_from(cli.config.clone())?;

    let db_path = config.database_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("cannot open directory at {}", db_path.display()))?;
    let mut directory = Directory::load(store, config.directory.seed_demo_data)?;

    if !cli.quiet && !directory.presentation_seen()? {
        eprintln!("Welcome to annuaire. Run `annuaire list` to browse the directory,");
        eprintln!("`annuaire add --help` to add someone, or `annuaire stats` for a summary.");
        eprintln!();
        directory.mark_presentation_seen()?;
    }

    match command {
        Command::Add(cmd) => handle_add(&mut directory, &cmd),
        Command::Edit(cmd) => handle_edit(&mut directory, &cmd),
        Command::Remove(cmd) => handle_remove(&mut directory, &cmd),
        Command::Show(cmd) => handle_show(&directory, &cmd),
        Command::List(cmd) => handle_list(&directory, &config, &cmd),
        Command::Stats(cmd) => handle_stats(&directory, &config, cmd.json),
        Command::Reset(cmd) => handle_reset(&mut directory, &cmd),
        Command::Config(_) => Ok(()),
    }
}

fn handle_add(directory: &mut Directory<Store>, cmd: &AddCommand) -> anyhow::Result<()> {
    let fields = cmd.fields().normalized();
    validate_new_person(&fields).map_err(Error::from)?;

    let person = directory.add(fields)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&person)?);
    } else {
        println!("Added {} ({})", person.name, person.id);
    }
    Ok(())
}

fn handle_edit(directory: &mut Directory<Store>, cmd: &EditCommand) -> anyhow::Result<()> {
    let update = cmd.update().normalized();
    if update.is_empty() {
        println!("Nothing to change. Pass --name, --job or --email.");
        return Ok(());
    }
    validate_update(&update).map_err(Error::from)?;

    let id = PersonId::from(cmd.id.as_str());
    match directory.update(&id, update)? {
        Some(person) => println!("Updated {} ({})", person.name, person.id),
        None => return Err(Error::NotFound(id).into()),
    }
    Ok(())
}

fn handle_remove(directory: &mut Directory<Store>, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let id = PersonId::from(cmd.id.as_str());
    let Some(person) = directory.get(&id) else {
        return Err(Error::NotFound(id).into());
    };

    if !cmd.yes {
        println!("This will remove {} ({}).", person.name, person.id);
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let name = person.name.clone();
    directory.remove(&id)?;
    println!("Removed {name} ({id})");
    Ok(())
}

fn handle_show(directory: &Directory<Store>, cmd: &ShowCommand) -> anyhow::Result<()> {
    let id = PersonId::from(cmd.id.as_str());
    let person = directory.get(&id).ok_or(Error::NotFound(id))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(person)?);
    } else {
        println!("{}", person.name);
        println!("  Id:     {}", person.id);
        println!("  Job:    {}", person.job);
        println!("  Email:  {}", person.email);
        match person.date_added {
            Some(added) => println!(
                "  Added:  {} ({})",
                added.format("%Y-%m-%d"),
                added_label(person, Utc::now())
            ),
            None => println!("  Added:  unknown"),
        }
    }
    Ok(())
}

fn handle_list(
    directory: &Directory<Store>,
    config: &Config,
    cmd: &ListCommand,
) -> anyhow::Result<()> {
    let query = Query::new(
        cmd.search.as_str(),
        cmd.filter.map_or(config.display.filter_by, Into::into),
        cmd.sort.map_or(config.display.sort_by, Into::into),
    );
    let mode: ViewMode = cmd.view.map_or(config.display.view_mode, Into::into);
    let people = directory.query(&query);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&people)?),
        OutputFormat::Plain => {
            if directory.is_empty() {
                println!("The directory is empty. Add someone with `annuaire add`.");
            } else {
                print!("{}", render_results(&people, &query.search, mode, Utc::now()));
            }
        }
    }
    Ok(())
}

fn handle_stats(directory: &Directory<Store>, config: &Config, json: bool) -> anyhow::Result<()> {
    let stats = directory.stats(&config.stats, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Directory statistics");
    println!("--------------------");
    println!("People:              {}", stats.total_people);
    println!("Distinct jobs:       {}", stats.unique_jobs);
    println!(
        "Added last {} days:   {}",
        config.stats.recent_days, stats.recent_additions
    );
    println!(
        "Additions per day:   {:.1} (last {} days)",
        stats.average_additions_per_day, config.stats.average_window_days
    );
    println!("Main email domain:   {}", stats.most_common_domain);

    if !stats.job_distribution.is_empty() {
        println!();
        println!("Top jobs");
        for share in &stats.job_distribution {
            println!(
                "  {:<24} {:>3}  {:>3}%",
                share.job, share.count, share.percentage
            );
        }
    }
    Ok(())
}

fn handle_reset(directory: &mut Directory<Store>, cmd: &ResetCommand) -> anyhow::Result<()> {
    let what = if cmd.empty {
        "remove every person from the directory"
    } else {
        "replace the directory with the demo people"
    };

    if !cmd.yes {
        println!("This will {what}.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    directory.reset(!cmd.empty)?;
    println!("Directory reset ({} people).", directory.len());
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Directory]");
                println!("  Seed demo data:     {}", config.directory.seed_demo_data);
                println!();
                println!("[Stats]");
                println!("  Recent days:        {}", config.stats.recent_days);
                println!("  Average window:     {}", config.stats.average_window_days);
                println!("  Top jobs:           {}", config.stats.top_jobs);
                println!();
                println!("[Display]");
                println!("  View mode:          {}", config.display.view_mode);
                println!("  Filter by:          {}", config.display.filter_by);
                println!("  Sort by:            {}", config.display.sort_by);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("{} is not a valid configuration", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
