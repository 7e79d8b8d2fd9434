use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::DatasetError;
use super::model::{AuditDataset, AuditRecord, Column};

/// File name looked for when a directory contains no other CSV file.
pub const DEFAULT_DATASET_FILE: &str = "big4_financial_risk_compliance.csv";

type Result<T> = std::result::Result<T, DatasetError>;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an audit dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (recommended)
/// * `.json`    – `[{ "Firm_Name": "...", "Year": 2024, ... }, ...]`
/// * `.parquet` – one column per field, as written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<AuditDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(AuditDataset::from_records(records))
}

/// Find the dataset to load inside `dir`.
///
/// The first `.csv` file by name wins; failing that, [`DEFAULT_DATASET_FILE`]
/// is used if it exists.
pub fn discover_dataset(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))?;

    let mut csv_files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DatasetError::io(dir, e))?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            csv_files.push(path);
        }
    }
    csv_files.sort();

    if let Some(first) = csv_files.into_iter().next() {
        log::debug!("Discovered dataset {}", first.display());
        return Ok(first);
    }

    let fallback = dir.join(DEFAULT_DATASET_FILE);
    if fallback.is_file() {
        Ok(fallback)
    } else {
        Err(DatasetError::NoDatasetFound(dir.to_path_buf()))
    }
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Position of every required column inside a file's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [usize; Column::COUNT],
}

impl ColumnIndex {
    /// Locate every required column in `headers`.
    ///
    /// Exact names win. Otherwise a header that matches after normalisation
    /// (trimmed, case-insensitive, spaces/hyphens as underscores) is accepted
    /// with a warning. A column found neither way is a hard error.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut positions = [0usize; Column::COUNT];

        for col in Column::ALL {
            let wanted = col.name();
            let exact = headers.iter().position(|h| h.as_ref() == wanted);
            let pos = match exact {
                Some(pos) => pos,
                None => {
                    let key = normalize(wanted);
                    let pos = headers
                        .iter()
                        .position(|h| normalize(h.as_ref()) == key)
                        .ok_or_else(|| DatasetError::MissingColumn {
                            column: wanted,
                            available: headers.iter().map(|h| h.as_ref().to_string()).collect(),
                        })?;
                    log::warn!(
                        "Column '{}' matched header '{}' after normalisation",
                        wanted,
                        headers[pos].as_ref()
                    );
                    pos
                }
            };
            positions[col.index()] = pos;
        }

        Ok(ColumnIndex { positions })
    }

    pub fn position(&self, col: Column) -> usize {
        self.positions[col.index()]
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cell parsing (shared by CSV and JSON)
// ---------------------------------------------------------------------------

fn parse_text(raw: &str, row: usize, col: Column) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(DatasetError::NullValue {
            row,
            column: col.name(),
        });
    }
    Ok(raw.to_string())
}

fn parse_number(raw: &str, row: usize, col: Column) -> Result<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(DatasetError::NullValue {
            row,
            column: col.name(),
        });
    }
    s.parse::<f64>().map_err(|_| DatasetError::InvalidValue {
        row,
        column: col.name(),
        value: raw.to_string(),
    })
}

/// Years may arrive as `2024` or, from float-typed columns, `2024.0`.
fn parse_year(raw: &str, row: usize, col: Column) -> Result<i64> {
    let s = raw.trim();
    if let Ok(year) = s.parse::<i64>() {
        return Ok(year);
    }
    let f = parse_number(raw, row, col)?;
    integral_year(f).ok_or_else(|| DatasetError::InvalidValue {
        row,
        column: col.name(),
        value: raw.to_string(),
    })
}

fn integral_year(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Build one record from a cell accessor. `cell` returns the raw text for a
/// column.
fn build_record<'a, F>(row: usize, cell: F) -> Result<AuditRecord>
where
    F: Fn(Column) -> &'a str,
{
    let number = |col: Column| parse_number(cell(col), row, col);
    let text = |col: Column| parse_text(cell(col), row, col);

    Ok(AuditRecord {
        firm_name: text(Column::FirmName)?,
        year: parse_year(cell(Column::Year), row, Column::Year)?,
        industry_affected: text(Column::IndustryAffected)?,
        ai_used_for_auditing: text(Column::AiUsedForAuditing)?,
        total_audit_engagements: number(Column::TotalAuditEngagements)?,
        compliance_violations: number(Column::ComplianceViolations)?,
        fraud_cases_detected: number(Column::FraudCasesDetected)?,
        employee_workload: number(Column::EmployeeWorkload)?,
        total_revenue_impact: number(Column::TotalRevenueImpact)?,
        high_risk_cases: number(Column::HighRiskCases)?,
        audit_effectiveness_score: number(Column::AuditEffectivenessScore)?,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line. Columns
/// beyond the required ones are ignored.
fn load_csv(path: &Path) -> Result<Vec<AuditRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let raw = result?;
        let rec = build_record(row_no, |col| raw.get(index.position(col)).unwrap_or(""))?;
        records.push(rec);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Firm_Name": "Deloitte", "Year": 2024, "Industry_Affected": "Tech", ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<AuditRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root
        .as_array()
        .ok_or_else(|| DatasetError::MalformedJson("expected a top-level array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    // Key per column, reused while rows keep the same keys.
    let mut names: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DatasetError::MalformedJson(format!("row {i} is not an object")))?;
        if names.is_empty() || !names.iter().all(|name| obj.contains_key(name)) {
            names = json_key_names(obj)?;
        }

        let cells: Vec<String> = names.iter().map(|name| json_cell(obj, name)).collect();
        records.push(build_record(i, |col| cells[col.index()].as_str())?);
    }
    Ok(records)
}

/// The object key holding each column, in `Column::ALL` order.
fn json_key_names(obj: &Map<String, JsonValue>) -> Result<Vec<String>> {
    let keys: Vec<&String> = obj.keys().collect();
    let index = ColumnIndex::resolve(&keys)?;
    Ok(Column::ALL
        .iter()
        .map(|&col| keys[index.position(col)].clone())
        .collect())
}

/// Render a JSON cell as the text the CSV path would have seen.
fn json_cell(obj: &Map<String, JsonValue>, key: &str) -> String {
    match obj.get(key) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Text columns must be Utf8 or LargeUtf8; numeric columns may be any of
/// Int32, Int64, Float32 or Float64. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<AuditRecord>> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let index = ColumnIndex::resolve(&headers)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let col = |c: Column| batch.column(index.position(c));

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let text = |c: Column| extract_text(col(c), row, row_no, c);
            let number = |c: Column| extract_number(col(c), row, row_no, c);

            let year_raw = number(Column::Year)?;
            let year = integral_year(year_raw).ok_or_else(|| DatasetError::InvalidValue {
                row: row_no,
                column: Column::Year.name(),
                value: year_raw.to_string(),
            })?;

            records.push(AuditRecord {
                firm_name: text(Column::FirmName)?,
                year,
                industry_affected: text(Column::IndustryAffected)?,
                ai_used_for_auditing: text(Column::AiUsedForAuditing)?,
                total_audit_engagements: number(Column::TotalAuditEngagements)?,
                compliance_violations: number(Column::ComplianceViolations)?,
                fraud_cases_detected: number(Column::FraudCasesDetected)?,
                employee_workload: number(Column::EmployeeWorkload)?,
                total_revenue_impact: number(Column::TotalRevenueImpact)?,
                high_risk_cases: number(Column::HighRiskCases)?,
                audit_effectiveness_score: number(Column::AuditEffectivenessScore)?,
            });
        }
    }
    Ok(records)
}

// -- Parquet / Arrow helpers --

fn type_mismatch(arr: &Arc<dyn Array>, row_no: usize, c: Column) -> DatasetError {
    DatasetError::InvalidValue {
        row: row_no,
        column: c.name(),
        value: format!("unsupported column type {:?}", arr.data_type()),
    }
}

/// Extract a string cell from a Utf8 / LargeUtf8 column.
fn extract_text(arr: &Arc<dyn Array>, row: usize, row_no: usize, c: Column) -> Result<String> {
    if arr.is_null(row) {
        return Err(DatasetError::NullValue {
            row: row_no,
            column: c.name(),
        });
    }
    let value = match arr.data_type() {
        DataType::Utf8 => arr
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => arr
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|s| s.value(row).to_string()),
        _ => None,
    };
    let value = value.ok_or_else(|| type_mismatch(arr, row_no, c))?;
    parse_text(&value, row_no, c)
}

/// Extract a numeric cell as `f64` from any integer or float column.
fn extract_number(arr: &Arc<dyn Array>, row: usize, row_no: usize, c: Column) -> Result<f64> {
    if arr.is_null(row) {
        return Err(DatasetError::NullValue {
            row: row_no,
            column: c.name(),
        });
    }
    let any = arr.as_any();
    let value = match arr.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    };
    value.ok_or_else(|| type_mismatch(arr, row_no, c))
}
