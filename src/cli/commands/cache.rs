//! `plancache cache` command - Inspect and maintain the cache database
//!
//! The cache is a local SQLite database holding, per project, the captured
//! records, taxonomy tables, favorites, and recents.

use clap::Subcommand;
use console::style;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{print_structured, resolve_project, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics for the selected project
    Status,

    /// List every project with cached data
    Projects,

    /// Remove everything cached for the selected project
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Execute SQL query against cache (read-only)
    Query {
        /// SQL query to execute
        sql: String,
    },
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        CacheCommands::Status => run_status(&session, global),
        CacheCommands::Projects => run_projects(&session, global),
        CacheCommands::Clear { yes } => run_clear(&session, global, yes),
        CacheCommands::Query { sql } => run_query(&session, global, &sql),
    }
}

fn run_status(session: &Session, global: &GlobalOpts) -> Result<()> {
    let store = session.cache.store();
    let project = resolve_project(global, &session.config).ok();

    let stats = match &project {
        Some(p) => Some(session.cache.statistics(p)?),
        None => None,
    };
    if let Some(stats) = &stats {
        if print_structured(stats, session.format(global))? {
            return Ok(());
        }
    }

    println!("{}", style("Cache Status").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Location:        {}", session.workspace.cache_path().display());
    println!(
        "  Database size:   {} KB",
        style(store.db_size_bytes() / 1024).cyan()
    );
    println!(
        "  Projects:        {}",
        style(session.cache.projects()?.len()).cyan()
    );

    match stats {
        Some(stats) => {
            println!();
            println!("  {} {}", style("Project").bold(), style(&stats.project).cyan());
            for count in &stats.records {
                println!("    {:<16} {}", count.kind.as_str(), count.count);
            }
            println!("    {:<16} {}", "disciplines", stats.disciplines);
            println!("    {:<16} {}", "divisions", stats.divisions);
            println!(
                "    {:<16} {} ({} drawing(s))",
                "favorites", stats.favorite_folders, stats.favorite_drawings
            );
            println!("    {:<16} {}", "recents", stats.recents);
        }
        None => {
            println!();
            println!(
                "  {}",
                style("No project selected; pass --project-id for per-project counts").dim()
            );
        }
    }
    Ok(())
}

fn run_projects(session: &Session, global: &GlobalOpts) -> Result<()> {
    let projects = session.cache.projects()?;
    if print_structured(&projects, session.format(global))? {
        return Ok(());
    }
    for project in projects {
        println!("{}", project);
    }
    Ok(())
}

fn run_clear(session: &Session, global: &GlobalOpts, yes: bool) -> Result<()> {
    let project = session.project(global)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all cached data for project {}?", project))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    session.cache.clear_project(&project)?;
    if !global.quiet {
        println!(
            "{} Cleared cache for project {}",
            style("✓").green(),
            style(&project).cyan()
        );
    }
    Ok(())
}

fn run_query(session: &Session, global: &GlobalOpts, sql: &str) -> Result<()> {
    let store = session.cache.store();
    let columns = store.query_columns(sql)?;
    let rows = store.query_raw(sql)?;

    match session.format(global) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned().map(serde_json::Value::String))
                        .collect()
                })
                .collect();
            print_structured(&objects, format)?;
        }
        format @ (OutputFormat::Csv | OutputFormat::Md) => {
            // Column keys must be 'static for the formatter
            let defs: Vec<ColumnDef> = columns
                .iter()
                .map(|c| {
                    let name: &'static str = Box::leak(c.clone().into_boxed_str());
                    ColumnDef::new(name, name, 60)
                })
                .collect();
            let table_rows: Vec<TableRow> = rows
                .iter()
                .map(|row| {
                    defs.iter()
                        .zip(row)
                        .fold(TableRow::new(), |acc, (def, value)| {
                            acc.cell(def.key, CellValue::Text(value.clone()))
                        })
                })
                .collect();
            TableFormatter::new(&defs, "row").output(&table_rows, format)?;
        }
        _ => {
            println!("{}", columns.join("\t"));
            for row in rows {
                println!("{}", row.join("\t"));
            }
        }
    }
    Ok(())
}
