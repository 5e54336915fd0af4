//! `plancache list` command - Show cached records and taxonomy tables

use clap::ValueEnum;
use miette::Result;

use crate::cli::helpers::{print_structured, Session};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{ProjectId, Record, SqliteStore, TaxonomyKind};
use crate::core::cache::MergeCache;
use crate::entities::{Commitment, DisciplineMap, Drawing, Rfi, Specification, TaxonomyMap};
use crate::search::{fuzzy_match_any, GENERAL_DISCIPLINE};

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub target: ListTarget,

    /// Keep only rows whose number or title fuzzy-matches this pattern
    #[arg(long, short = 's')]
    pub filter: Option<String>,

    /// Only open RFIs
    #[arg(long)]
    pub open: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListTarget {
    Drawings,
    Rfis,
    Commitments,
    Specifications,
    Disciplines,
    Divisions,
}

const DRAWING_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("num", "NUMBER", 16),
    ColumnDef::new("title", "TITLE", 44),
    ColumnDef::new("discipline", "DISCIPLINE", 20),
];

const RFI_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "NUMBER", 10),
    ColumnDef::new("subject", "SUBJECT", 44),
    ColumnDef::new("status", "STATUS", 10),
    ColumnDef::new("due", "DUE", 12),
    ColumnDef::new("assignee", "ASSIGNEE", 20),
];

const COMMITMENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "NUMBER", 12),
    ColumnDef::new("title", "TITLE", 36),
    ColumnDef::new("vendor", "VENDOR", 24),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("approved", "APPROVED", 14),
];

const SPEC_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "NUMBER", 12),
    ColumnDef::new("title", "TITLE", 44),
    ColumnDef::new("division", "DIVISION", 24),
];

const TAXONOMY_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("key", "ID", 12),
    ColumnDef::new("name", "NAME", 36),
    ColumnDef::new("index", "ORDER", 8),
];

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(global)?;
    let format = session.format(global);
    let cache = &session.cache;
    let filter = args.filter.as_deref().unwrap_or("");

    match args.target {
        ListTarget::Drawings => {
            let disciplines = cache.get_taxonomy(&project, TaxonomyKind::Discipline)?;
            let drawings = load::<Drawing>(cache, &project, filter, |_| true, args.limit)?;
            emit(&args, global, format, &drawings, DRAWING_COLUMNS, "drawing", |d| {
                drawing_row(d, &disciplines)
            })
        }
        ListTarget::Rfis => {
            let rfis = load::<Rfi>(cache, &project, filter, |r| !args.open || r.is_open(), args.limit)?;
            emit(&args, global, format, &rfis, RFI_COLUMNS, "RFI", rfi_row)
        }
        ListTarget::Commitments => {
            let commitments = load::<Commitment>(cache, &project, filter, |_| true, args.limit)?;
            emit(&args, global, format, &commitments, COMMITMENT_COLUMNS, "commitment", commitment_row)
        }
        ListTarget::Specifications => {
            let divisions = cache.get_taxonomy(&project, TaxonomyKind::Division)?;
            let specs = load::<Specification>(cache, &project, filter, |_| true, args.limit)?;
            emit(&args, global, format, &specs, SPEC_COLUMNS, "specification", |s| {
                spec_row(s, &divisions)
            })
        }
        ListTarget::Disciplines => list_taxonomy(&args, global, format, cache, &project, TaxonomyKind::Discipline),
        ListTarget::Divisions => list_taxonomy(&args, global, format, cache, &project, TaxonomyKind::Division),
    }
}

/// Stored records whose number or title fuzzy-matches `filter`
fn load<R: Record>(
    cache: &MergeCache<SqliteStore>,
    project: &ProjectId,
    filter: &str,
    keep: impl Fn(&R) -> bool,
    max: Option<usize>,
) -> Result<Vec<R>> {
    let records: Vec<R> = cache
        .get::<R>(project)?
        .into_iter()
        .filter(|r| keep(r))
        .filter(|r| fuzzy_match_any([r.number(), r.title()], filter))
        .collect();
    Ok(limit(records, max))
}

fn limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(n) = limit {
        items.truncate(n);
    }
    items
}

fn emit<T: serde::Serialize>(
    args: &ListArgs,
    global: &GlobalOpts,
    format: OutputFormat,
    items: &[T],
    columns: &[ColumnDef],
    entity_name: &'static str,
    to_row: impl Fn(&T) -> TableRow,
) -> Result<()> {
    if args.count {
        println!("{}", items.len());
        return Ok(());
    }
    if print_structured(items, format)? {
        return Ok(());
    }

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    let rows: Vec<TableRow> = items.iter().map(to_row).collect();
    TableFormatter::new(columns, entity_name)
        .with_config(config)
        .output(&rows, format)
}

fn list_taxonomy(
    args: &ListArgs,
    global: &GlobalOpts,
    format: OutputFormat,
    cache: &MergeCache<SqliteStore>,
    project: &ProjectId,
    kind: TaxonomyKind,
) -> Result<()> {
    let map = cache.get_taxonomy(project, kind)?;
    let filter = args.filter.as_deref().unwrap_or("");
    let entries: Vec<TaxonomyRow> = map
        .sorted()
        .into_iter()
        .filter(|(_, e)| fuzzy_match_any([e.name.as_str()], filter))
        .map(|(key, e)| TaxonomyRow {
            key: key.clone(),
            name: e.name.clone(),
            index: e.index,
        })
        .collect();
    let entries = limit(entries, args.limit);

    let name = match kind {
        TaxonomyKind::Discipline => "discipline",
        TaxonomyKind::Division => "division",
    };
    emit(args, global, format, &entries, TAXONOMY_COLUMNS, name, |e| {
        TableRow::new()
            .cell("key", CellValue::Id(e.key.clone()))
            .cell("name", CellValue::Text(e.name.clone()))
            .cell("index", CellValue::Number(e.index))
    })
}

#[derive(Debug, serde::Serialize)]
struct TaxonomyRow {
    key: String,
    name: String,
    index: i64,
}

fn drawing_row(drawing: &Drawing, disciplines: &DisciplineMap) -> TableRow {
    let discipline = drawing
        .discipline
        .and_then(|id| disciplines.name_of(&id.to_string()).map(str::to_string))
        .or_else(|| drawing.discipline_name.clone())
        .unwrap_or_else(|| GENERAL_DISCIPLINE.to_string());

    TableRow::new()
        .cell("num", CellValue::Id(drawing.num.clone()))
        .cell("title", CellValue::Text(drawing.title.clone()))
        .cell("discipline", CellValue::Group(discipline))
}

fn rfi_row(rfi: &Rfi) -> TableRow {
    TableRow::new()
        .cell("number", CellValue::Id(rfi.number.clone()))
        .cell("subject", CellValue::Text(rfi.subject.clone()))
        .cell("status", CellValue::Status(rfi.status.clone()))
        .cell("due", CellValue::opt_text(rfi.due_date.as_deref()))
        .cell("assignee", CellValue::opt_text(rfi.assignee.as_deref()))
}

fn commitment_row(commitment: &Commitment) -> TableRow {
    TableRow::new()
        .cell("number", CellValue::Id(commitment.number.clone()))
        .cell("title", CellValue::Text(commitment.title.clone()))
        .cell("vendor", CellValue::opt_text(commitment.display_vendor()))
        .cell(
            "status",
            commitment
                .status
                .clone()
                .map(CellValue::Status)
                .unwrap_or(CellValue::Empty),
        )
        .cell("approved", CellValue::Amount(commitment.approved_amount))
}

fn spec_row(spec: &Specification, divisions: &TaxonomyMap) -> TableRow {
    let division = spec
        .division_id
        .as_deref()
        .and_then(|id| divisions.name_of(id).or(Some(id)))
        .map(|name| CellValue::Group(name.to_string()))
        .unwrap_or(CellValue::Empty);

    TableRow::new()
        .cell("number", CellValue::Id(spec.number.clone()))
        .cell("title", CellValue::Text(spec.title.clone()))
        .cell("division", division)
}
