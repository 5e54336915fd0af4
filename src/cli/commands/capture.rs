//! `plancache capture` command - Ingest captured API responses
//!
//! Each JSON document is one observed network response. The URL it came from
//! steers classification, so it must be given explicitly.

use std::io::Read;
use std::path::{Path, PathBuf};

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::capture::{IngestReport, Ingestor};
use crate::cli::helpers::{print_structured, Session};
use crate::cli::GlobalOpts;
use crate::core::{ProjectId, RecordStore};

#[derive(clap::Args, Debug)]
pub struct CaptureArgs {
    /// URL the response was captured from
    #[arg(long)]
    pub url: String,

    /// JSON file to ingest ("-" or omitted reads stdin)
    #[arg(conflicts_with = "dir")]
    pub file: Option<PathBuf>,

    /// Ingest every *.json file under this directory
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Report for one ingested document
#[derive(Debug, Serialize)]
struct CaptureResult {
    source: String,
    #[serde(flatten)]
    report: IngestReport,
}

pub fn run(args: CaptureArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(global)?;
    let ingestor = Ingestor::new(&session.cache);

    let results = match &args.dir {
        Some(dir) => ingest_dir(&ingestor, &project, dir, &args.url)?,
        None => {
            let (source, text) = read_input(args.file.as_deref())?;
            let payload: Value = serde_json::from_str(&text).map_err(|e| {
                miette::miette!(
                    help = "capture expects one JSON document per file",
                    "{} is not valid JSON: {}",
                    source,
                    e
                )
            })?;
            let report = ingestor.ingest(&project, &payload, &args.url)?;
            vec![CaptureResult { source, report }]
        }
    };

    let format = session.format(global);
    if print_structured(&results, format)? {
        return Ok(());
    }
    if !global.quiet {
        for result in &results {
            print_report(result);
        }
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<(String, String)> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| miette::miette!("failed to read {}: {}", path.display(), e))?;
            Ok((path.display().to_string(), text))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).into_diagnostic()?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}

fn ingest_dir<S: RecordStore>(
    ingestor: &Ingestor<'_, S>,
    project: &ProjectId,
    dir: &Path,
    url: &str,
) -> Result<Vec<CaptureResult>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(&path).into_diagnostic()?;
        let payload: Value = match serde_json::from_str(&text) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping invalid JSON");
                continue;
            }
        };
        let report = ingestor.ingest(project, &payload, url)?;
        results.push(CaptureResult {
            source: path.display().to_string(),
            report,
        });
    }
    Ok(results)
}

fn print_report(result: &CaptureResult) {
    let report = &result.report;
    match report.kind {
        Some(kind) if report.routed > 0 => {
            println!(
                "{} {}: {} {}(s), {} new, {} stored",
                style("✓").green(),
                style(&result.source).dim(),
                style(report.routed).cyan(),
                kind.label(),
                style(report.added).green(),
                report.total
            );
        }
        _ if report.disciplines + report.divisions > 0 => {}
        _ => {
            println!(
                "{} {}: no records recognized",
                style("!").yellow(),
                style(&result.source).dim()
            );
        }
    }
    if report.disciplines > 0 {
        println!("  Disciplines: {}", style(report.disciplines).cyan());
    }
    if report.divisions > 0 {
        println!("  Divisions:   {}", style(report.divisions).cyan());
    }
}
