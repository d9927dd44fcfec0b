//! Integration tests for report export.

use chrono::NaiveDate;
use std::fs;
use trendscan_output::{
    Cell, ColumnFormat, ColumnId, Exporter, ExportFormat, ReportRow, ReportTable, report_columns,
};

struct Row {
    symbol: &'static str,
    sector: &'static str,
    relative_strength: f64,
    percentile: f64,
    eps: Vec<Option<f64>>,
    earnings: Option<NaiveDate>,
    passes: bool,
}

impl ReportRow for Row {
    fn cell(&self, column: ColumnId) -> Cell {
        match column {
            ColumnId::Symbol => Cell::from(self.symbol),
            ColumnId::Sector => Cell::from(self.sector),
            ColumnId::RelativeStrength => Cell::from(self.relative_strength),
            ColumnId::PercentileMarket => Cell::from(self.percentile),
            ColumnId::TrendTemplatePass => Cell::from(self.passes),
            ColumnId::Eps(q) => Cell::from(self.eps.get(q).copied().flatten()),
            ColumnId::NextEarningsDate => Cell::from(self.earnings),
            _ => Cell::Empty,
        }
    }
}

fn rows() -> Vec<Row> {
    vec![
        Row {
            symbol: "MSFT",
            sector: "Technology",
            relative_strength: 5.4321,
            percentile: 1.0,
            eps: vec![Some(3.3), Some(2.94), None],
            earnings: NaiveDate::from_ymd_opt(2025, 1, 29),
            passes: true,
        },
        Row {
            symbol: "XOM",
            sector: "Energy",
            relative_strength: 3.9,
            percentile: 0.5,
            eps: vec![Some(1.92)],
            earnings: None,
            passes: false,
        },
    ]
}

fn column_index(table: &ReportTable, header: &str) -> usize {
    table.headers().iter().position(|h| *h == header).unwrap()
}

#[test]
fn test_csv_applies_format_hints() {
    let table = ReportTable::from_records(report_columns(3), &rows());
    let csv = table.export_to_string(ExportFormat::Csv).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);

    let msft = &records[0];
    assert_eq!(&msft[column_index(&table, "Symbol")], "MSFT");
    assert_eq!(&msft[column_index(&table, "Relative Strength")], "5.43");
    assert_eq!(&msft[column_index(&table, "RS Pctl (Market)")], "100.0%");
    assert_eq!(&msft[column_index(&table, "Trend Template")], "TRUE");
    assert_eq!(&msft[column_index(&table, "EPS Q1")], "2.94");
    assert_eq!(&msft[column_index(&table, "EPS Q2")], "");
    assert_eq!(&msft[column_index(&table, "Next Earnings")], "2025-01-29");

    let xom = &records[1];
    assert_eq!(&xom[column_index(&table, "RS Pctl (Market)")], "50.0%");
    assert_eq!(&xom[column_index(&table, "Next Earnings")], "");
}

#[test]
fn test_json_keeps_typed_values() {
    let table = ReportTable::from_records(report_columns(2), &rows());
    let json = table.export_to_string(ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let columns = value["columns"].as_array().unwrap();
    assert_eq!(columns.len(), report_columns(2).len());
    let pct = columns
        .iter()
        .find(|c| c["key"] == "percentile_market")
        .unwrap();
    assert_eq!(pct["format"], ColumnFormat::Percent.as_str());

    let first = &value["rows"][0];
    assert_eq!(first["symbol"], "MSFT");
    assert_eq!(first["percentile_market"], 1.0);
    assert_eq!(first["trend_template_pass"], true);
    assert!(first["eps_q2"].is_null());
    assert_eq!(value["rows"][1]["eps_q0"], 1.92);
}

#[test]
fn test_export_to_file() {
    let table = ReportTable::from_records(report_columns(1), &rows());
    let path = std::env::temp_dir().join("trendscan_export_test.csv");

    table.export_to_file(&path, ExportFormat::Csv).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Symbol,Name,Sector"));
    assert!(content.contains("XOM"));

    fs::remove_file(path).ok();
}
