//! List output in tabular formats
//!
//! Commands describe their columns once with [`ColumnDef`] and hand rows of
//! cell text to a [`TableFormatter`], which renders TSV, CSV, a bordered
//! table, or bare IDs. The first column of every row is the record ID.

use miette::{IntoDiagnostic, Result};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;

/// A list column: lookup key, header text, and display width for TSV
#[derive(Debug, Clone, Copy)]
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

pub struct TableFormatter {
    columns: &'static [ColumnDef],
    entity_name: &'static str,
}

impl TableFormatter {
    pub fn new(columns: &'static [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
        }
    }

    /// Print rows in the given format (Auto resolves to TSV)
    pub fn output(&self, rows: Vec<Vec<String>>, format: OutputFormat) -> Result<()> {
        let rendered = self.render(&rows, format)?;
        print!("{}", rendered);
        Ok(())
    }

    pub fn render(&self, rows: &[Vec<String>], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Table => Ok(self.render_table(rows)),
            OutputFormat::Id => Ok(rows
                .iter()
                .filter_map(|r| r.first())
                .map(|id| format!("{}\n", id))
                .collect()),
            _ => Ok(self.render_tsv(rows)),
        }
    }

    fn render_tsv(&self, rows: &[Vec<String>]) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(row)
                .map(|(col, cell)| truncate_str(&cell.replace(['\t', '\n'], " "), col.width))
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out.push_str(&format!("\n{} {}(s) found.\n", rows.len(), self.entity_name));
        out
    }

    fn render_csv(&self, rows: &[Vec<String>]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            writer.write_record(row).into_diagnostic()?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("Failed to write CSV: {}", e))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    fn render_table(&self, rows: &[Vec<String>]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(row.iter().cloned());
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        format!("{}\n", table)
    }
}
