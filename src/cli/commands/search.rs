//! `plancache search` command - Search drawings and RFIs
//!
//! The query prefix picks the mode: `?` searches RFIs, `*` favorites, `@`
//! disciplines, an empty query lists recents, and anything else matches
//! drawings and RFIs together.

use console::style;
use miette::Result;

use crate::cli::helpers::{print_structured, truncate_str, Session};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::search::{SearchItem, SearchResults, MAX_RESULTS};

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search query (empty lists recently opened drawings)
    #[arg(default_value = "")]
    pub query: String,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("group", "GROUP", 20),
    ColumnDef::new("type", "TYPE", 8),
    ColumnDef::new("number", "NUMBER", 16),
    ColumnDef::new("title", "TITLE", 44),
    ColumnDef::new("extra", "STATUS", 10),
];

/// Run the search command
pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(global)?;
    let results = session.cache.search(&project, &args.query)?;

    if args.count {
        println!("{}", results.len());
        return Ok(());
    }

    let format = session.format(global);
    if print_structured(&results, format)? {
        return Ok(());
    }

    if results.is_empty() {
        if !global.quiet {
            println!("No results found for '{}'.", style(&args.query).yellow());
        }
        return Ok(());
    }

    match format {
        OutputFormat::Csv | OutputFormat::Md => {
            let rows: Vec<TableRow> = results.items().map(|(g, item)| item_row(g, item)).collect();
            TableFormatter::new(COLUMNS, "result").output(&rows, format)
        }
        _ => {
            print_grouped(&results, &args.query, global.quiet);
            Ok(())
        }
    }
}

fn item_row(group: &str, item: &SearchItem) -> TableRow {
    let row = TableRow::new().cell("group", CellValue::Group(group.to_string()));
    match item {
        SearchItem::Drawing(hit) => row
            .cell("type", CellValue::Text("drawing".into()))
            .cell("number", CellValue::Id(hit.drawing.num.clone()))
            .cell("title", CellValue::Text(hit.drawing.title.clone()))
            .cell(
                "extra",
                CellValue::Marks {
                    favorite: hit.favorite,
                    recent: hit.recent,
                },
            ),
        SearchItem::Rfi(rfi) => row
            .cell("type", CellValue::Text("rfi".into()))
            .cell("number", CellValue::Id(rfi.number.clone()))
            .cell("title", CellValue::Text(rfi.subject.clone()))
            .cell("extra", CellValue::Status(rfi.status.clone())),
    }
}

fn print_grouped(results: &SearchResults, query: &str, quiet: bool) {
    if !quiet {
        let shown = if query.trim().is_empty() {
            style("recent".to_string()).yellow()
        } else {
            style(format!("'{}'", query)).yellow()
        };
        println!("{} results for {}:", style(results.len()).cyan(), shown);
    }

    for group in &results.groups {
        println!();
        println!(
            "{} {}",
            style(&group.label).bold().magenta(),
            style(format!("({})", group.items.len())).dim()
        );
        for item in &group.items {
            match item {
                SearchItem::Drawing(hit) => {
                    let mut marks = String::new();
                    if hit.favorite {
                        marks.push('★');
                    }
                    if hit.recent {
                        marks.push('•');
                    }
                    println!(
                        "  {:<16} {:<44} {}",
                        style(&hit.drawing.num).cyan(),
                        truncate_str(&hit.drawing.title, 42),
                        style(marks).yellow()
                    );
                }
                SearchItem::Rfi(rfi) => {
                    let status = if rfi.is_open() {
                        style(rfi.status.clone()).green()
                    } else {
                        style(rfi.status.clone()).dim()
                    };
                    println!(
                        "  {:<16} {:<44} {}",
                        style(format!("RFI #{}", rfi.number)).cyan(),
                        truncate_str(&rfi.subject, 42),
                        status
                    );
                }
            }
        }
    }

    if !quiet && results.len() >= MAX_RESULTS {
        println!();
        println!(
            "{}",
            style(format!("Showing the first {} results; refine the query to narrow it.", MAX_RESULTS)).dim()
        );
    }
}
