//! Report writers.
//!
//! A [`ReportWriter`] renders a [`ReportTable`] to any byte sink. The CSV
//! writer emits display strings formatted by each column's hint; the JSON
//! writer keeps typed values and ships the hints alongside them so a
//! downstream renderer can style the data itself.

use crate::error::ExportError;
use crate::table::ReportTable;
use serde_json::{Map, Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::PrettyJson,
            _ => Self::Csv,
        }
    }

    /// Writer for this format.
    pub fn writer(&self) -> Box<dyn ReportWriter> {
        match self {
            Self::Csv => Box::new(CsvReportWriter),
            Self::Json => Box::new(JsonReportWriter { pretty: false }),
            Self::PrettyJson => Box::new(JsonReportWriter { pretty: true }),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Renders a report table.
pub trait ReportWriter {
    /// Write the table to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write_table(&self, table: &ReportTable, out: &mut dyn Write) -> Result<(), ExportError>;

    /// Render the table to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn render(&self, table: &ReportTable) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.write_table(table, &mut buf)?;
        String::from_utf8(buf).map_err(|e| ExportError::InvalidFormat(e.to_string()))
    }
}

/// CSV with one header row and display-formatted cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportWriter;

impl ReportWriter for CsvReportWriter {
    fn write_table(&self, table: &ReportTable, out: &mut dyn Write) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(table.headers())?;
        for row in table.rendered_rows() {
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// JSON document with column metadata and typed row objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportWriter {
    /// Indent the output.
    pub pretty: bool,
}

impl JsonReportWriter {
    fn document(table: &ReportTable) -> Value {
        let columns: Vec<Value> = table
            .columns()
            .iter()
            .map(|c| {
                json!({
                    "key": c.key,
                    "header": c.header,
                    "format": c.format.as_str(),
                })
            })
            .collect();

        let rows: Vec<Value> = table
            .rows()
            .iter()
            .map(|row| {
                let object: Map<String, Value> = table
                    .columns()
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.key.clone(), cell.to_json()))
                    .collect();
                Value::Object(object)
            })
            .collect();

        json!({ "columns": columns, "rows": rows })
    }
}

impl ReportWriter for JsonReportWriter {
    fn write_table(&self, table: &ReportTable, out: &mut dyn Write) -> Result<(), ExportError> {
        let document = Self::document(table);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &document)?;
        } else {
            serde_json::to_writer(&mut *out, &document)?;
        }
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl Exporter for ReportTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        format.writer().render(self)
    }
}
