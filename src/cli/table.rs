//! Table formatting for CLI list and search output
//!
//! One formatter renders typed rows as TSV (colored on a terminal), CSV, or a
//! markdown table. JSON and YAML bypass this module and serialize the records
//! themselves.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 drawing(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Record number (drawing number, RFI number, ...), cyan
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Discipline or division label
    Group(String),
    /// Workflow status; open is green, closed/void are dimmed
    Status(String),
    /// Money amount with two decimals
    Amount(Option<f64>),
    Number(i64),
    /// Favorite/recent markers for a drawing
    Marks { favorite: bool, recent: bool },
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Optional text, `Empty` when missing or blank
    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => CellValue::Text(s.to_string()),
            _ => CellValue::Empty,
        }
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Group(g) => {
                let truncated = truncate_str(g, width.saturating_sub(2));
                format!("{:<width$}", style(truncated).magenta(), width = width)
            }
            CellValue::Status(s) => {
                let styled = match s.to_lowercase().as_str() {
                    "open" => style(s).green(),
                    "closed" | "void" | "voided" => style(s).dim(),
                    "draft" => style(s).yellow(),
                    _ => style(s).white(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Amount(Some(a)) => format!("{:>width$.2}", a, width = width),
            CellValue::Amount(None) => format!("{:>width$}", "-", width = width),
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Marks { .. } => {
                format!("{:<width$}", style(self.raw()).yellow(), width = width)
            }
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Empty | CellValue::Amount(None) => "-".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Unstyled value, used for CSV and for width calculation
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Group(s) | CellValue::Status(s) => {
                s.clone()
            }
            CellValue::Amount(a) => a.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Marks { favorite, recent } => {
                let mut marks = String::new();
                if *favorite {
                    marks.push('★');
                }
                if *recent {
                    marks.push('•');
                }
                marks
            }
            CellValue::Empty => String::new(),
        }
    }

    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) -> Result<()> {
        print!("{}", self.render(rows, format)?);
        Ok(())
    }

    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => Ok(self.render_md(rows)),
            _ => Ok(self.render_tsv(rows)),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);

                // +2 leaves room for the truncation buffer in format_tsv
                let natural_width = col.header.len().max(max_content.saturating_add(2));
                natural_width.min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| {
                    row.get(col.key)
                        .unwrap_or(&CellValue::Empty)
                        .format_tsv(*w)
                })
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found\n",
                style(rows.len()).cyan(),
                self.entity_name
            ));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;

        for row in rows {
            writer
                .write_record(self.columns.iter().map(|col| {
                    row.get(col.key).map(CellValue::raw).unwrap_or_default()
                }))
                .into_diagnostic()?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("failed to write CSV: {}", e))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(self.columns.iter().map(|col| {
                row.get(col.key)
                    .map(CellValue::format_md)
                    .unwrap_or_else(|| "-".to_string())
            }));
        }
        let mut out = builder.build().with(Style::markdown()).to_string();
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("num", "NUMBER", 12),
        ColumnDef::new("title", "TITLE", 30),
        ColumnDef::new("amount", "AMOUNT", 14),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new()
                .cell("num", CellValue::Id("A-101".into()))
                .cell("title", CellValue::Text("Floor Plan, Level 1".into()))
                .cell("amount", CellValue::Amount(Some(1250.5))),
            TableRow::new()
                .cell("num", CellValue::Id("A-102".into()))
                .cell("title", CellValue::Text("Roof | Plan".into())),
        ]
    }

    #[test]
    fn test_cell_raw_values() {
        assert_eq!(CellValue::Amount(Some(3.0)).raw(), "3.00");
        assert_eq!(CellValue::Amount(None).raw(), "");
        assert_eq!(
            CellValue::Marks {
                favorite: true,
                recent: true
            }
            .raw(),
            "★•"
        );
        assert_eq!(CellValue::opt_text(Some("  ")), CellValue::Empty);
    }

    #[test]
    fn test_md_escapes_pipes() {
        let cell = CellValue::Text("a|b|c".to_string());
        assert_eq!(cell.format_md(), "a\\|b\\|c");
        assert_eq!(CellValue::Empty.format_md(), "-");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = TableFormatter::new(COLUMNS, "drawing")
            .render(&rows(), OutputFormat::Csv)
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "num,title,amount");
        assert_eq!(lines[1], "A-101,\"Floor Plan, Level 1\",1250.50");
        assert_eq!(lines[2], "A-102,Roof | Plan,");
    }

    #[test]
    fn test_md_table() {
        let out = TableFormatter::new(COLUMNS, "drawing")
            .render(&rows(), OutputFormat::Md)
            .unwrap();
        assert!(out.contains("NUMBER"));
        assert!(out.contains("Roof \\| Plan"));
    }

    #[test]
    fn test_tsv_summary_toggle() {
        let with = TableFormatter::new(COLUMNS, "drawing")
            .render(&rows(), OutputFormat::Tsv)
            .unwrap();
        assert!(with.contains("drawing(s) found"));
        assert!(with.contains("A-101"));

        let without = TableFormatter::new(COLUMNS, "drawing")
            .with_config(TableConfig::for_pipe())
            .render(&rows(), OutputFormat::Tsv)
            .unwrap();
        assert!(!without.contains("found"));
    }

    #[test]
    fn test_column_def() {
        let col = ColumnDef::new("title", "TITLE", 30);
        assert_eq!(col.key, "title");
        assert_eq!(col.header, "TITLE");
        assert_eq!(col.width, 30);
    }
}
