//! Macro indicator window over a local monthly CSV
//!
//! The dataset (`macro_data.csv`) has one row per month keyed by `date`
//! (`YYYY-MM-DD`) plus numeric indicator columns such as CPI, INFLATION,
//! FEDERAL_FUNDS_RATE, REAL_GDP, REAL_GDP_PER_CAPITA, UNEMPLOYMENT,
//! NONFARM_PAYROLL, DURABLES and RETAIL_SALES. It is read fresh on every call.

use analyst_core::{Error, Result};
use analyst_tools::VendorBackend;
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::StringRecord;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::window::{DATE_FORMAT, MACRO_LOOKBACK_YEARS, TrailingWindow, parse_date};

/// File name of the dataset inside the data directory
pub const MACRO_DATASET_FILE: &str = "macro_data.csv";

const DATE_COLUMN: &str = "date";

/// Three years of macro indicators ending at `curr_date`, as model-readable text
///
/// The anchor is validated before the dataset is touched. Rows are kept when
/// their date lies in `[curr_date - 3 years, curr_date]`. Numeric columns are
/// rendered with two decimals. An empty window yields a sentence naming both
/// bounds rather than an error.
pub fn retrieve_macro_window(dataset: &Path, curr_date: &str) -> Result<String> {
    let anchor = parse_date(curr_date, "curr_date")?;
    let window = TrailingWindow::years(anchor, MACRO_LOOKBACK_YEARS)?;

    if !dataset.exists() {
        return Err(Error::ResourceUnavailable(format!(
            "Macro data file not found at {}",
            dataset.display()
        )));
    }

    let table = MacroTable::load(dataset)?;
    let rows: Vec<&MacroRow> = table.rows.iter().filter(|r| window.contains(r.date)).collect();
    debug!(
        window = %window,
        total_rows = table.rows.len(),
        window_rows = rows.len(),
        "Filtered macro dataset"
    );

    if rows.is_empty() {
        return Ok(format!(
            "No macroeconomic data available between {} and {}.",
            window.start.format(DATE_FORMAT),
            window.end.format(DATE_FORMAT)
        ));
    }

    let body = table.render_csv(&rows)?;
    Ok(format!(
        "## Macroeconomic indicators (monthly)\nWindow: {window}\nColumns: {}\n\n{body}",
        table.headers.join(", ")
    ))
}

struct MacroRow {
    date: NaiveDate,
    record: StringRecord,
}

struct MacroTable {
    headers: Vec<String>,
    date_index: usize,
    numeric: Vec<bool>,
    rows: Vec<MacroRow>,
}

impl MacroTable {
    fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::ResourceUnavailable(format!("Failed to open {}: {e}", path.display())))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::SchemaViolation(format!("Unreadable header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let date_index = headers
            .iter()
            .position(|h| h == DATE_COLUMN)
            .ok_or_else(|| Error::SchemaViolation(format!("{MACRO_DATASET_FILE} must contain a 'date' column")))?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| Error::SchemaViolation(format!("Malformed row {}: {e}", line + 2)))?;
            let raw = record.get(date_index).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                Error::SchemaViolation(format!("Row {} has invalid date '{raw}'", line + 2))
            })?;
            rows.push(MacroRow { date, record });
        }

        let numeric = (0..headers.len())
            .map(|col| col != date_index && is_numeric_column(&rows, col))
            .collect();

        Ok(Self {
            headers,
            date_index,
            numeric,
            rows,
        })
    }

    fn render_csv(&self, rows: &[&MacroRow]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(&self.headers).map_err(serialize_error)?;
        for row in rows {
            let fields: Vec<String> = (0..self.headers.len())
                .map(|col| self.render_cell(row, col))
                .collect();
            writer.write_record(&fields).map_err(serialize_error)?;
        }

        let bytes = writer.into_inner().map_err(|e| serialize_error(e.error()))?;
        String::from_utf8(bytes).map_err(|e| Error::SchemaViolation(format!("Non UTF-8 output: {e}")))
    }

    fn render_cell(&self, row: &MacroRow, col: usize) -> String {
        if col == self.date_index {
            return row.date.format(DATE_FORMAT).to_string();
        }
        let raw = row.record.get(col).unwrap_or_default();
        if !self.numeric[col] || raw.is_empty() {
            return raw.to_string();
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => format!("{v:.2}"),
            // NaN and infinities are gaps in the source series
            Ok(_) => String::new(),
            Err(_) => raw.to_string(),
        }
    }
}

/// A column is numeric when it has at least one value and every non-empty cell parses as a float
fn is_numeric_column(rows: &[MacroRow], col: usize) -> bool {
    let mut seen = false;
    for row in rows {
        let cell = row.record.get(col).unwrap_or_default();
        if cell.is_empty() {
            continue;
        }
        if cell.parse::<f64>().is_err() {
            return false;
        }
        seen = true;
    }
    seen
}

fn serialize_error(e: impl std::fmt::Display) -> Error {
    Error::SchemaViolation(format!("Failed to serialize macro window: {e}"))
}

#[derive(Debug, Deserialize)]
struct MacroParams {
    curr_date: String,
}

/// Serves `get_macro_ind` from a local dataset file
#[derive(Debug, Clone)]
pub struct LocalMacroBackend {
    dataset: PathBuf,
}

impl LocalMacroBackend {
    /// Backend reading the dataset at `dataset`
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
        }
    }

    /// Path of the dataset file
    pub fn dataset(&self) -> &Path {
        &self.dataset
    }
}

#[async_trait]
impl VendorBackend for LocalMacroBackend {
    async fn call(&self, args: &Value) -> Result<String> {
        let params: MacroParams = serde_json::from_value(args.clone())
            .map_err(|e| Error::MalformedInput(format!("Invalid parameters: {e}")))?;
        info!(curr_date = %params.curr_date, dataset = %self.dataset.display(), "Retrieving macro window");
        retrieve_macro_window(&self.dataset, &params.curr_date)
    }
}
