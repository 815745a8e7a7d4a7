use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{PovertyDataset, PppVersion, Record, ReportingLevel, WelfareType};

/// Columns every source file must carry, in canonical display order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "country",
    "year",
    "welfare_type",
    "reporting_level",
    "ppp_version",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Fatal at startup when the source was
/// requested explicitly; shown as a status message when loading interactively.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("dataset has no numeric indicator columns")]
    NoIndicatorColumns,
    #[error("dataset has no rows")]
    Empty,
    #[error("malformed dataset: {0}")]
    Malformed(anyhow::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the poverty table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited table with a header row (the native format)
/// * `.json`    – records orientation, `df.to_json(orient='records')`
/// * `.parquet` – flat columnar table written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<PovertyDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Shared finalization
// ---------------------------------------------------------------------------

/// Keep only indicator columns that held at least one numeric value and never
/// held a textual one, preserving `candidates` order. Text columns beyond the
/// required five (region names and the like) are dropped silently.
fn finish(
    mut records: Vec<Record>,
    candidates: Vec<String>,
    textual: BTreeSet<String>,
) -> Result<PovertyDataset, DataLoadError> {
    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for rec in &records {
        seen.extend(rec.indicators.keys().map(String::as_str));
    }
    let qualified: Vec<String> = candidates
        .into_iter()
        .filter(|c| !textual.contains(c) && seen.contains(c.as_str()))
        .collect();
    if qualified.is_empty() {
        return Err(DataLoadError::NoIndicatorColumns);
    }

    let keep: BTreeSet<&str> = qualified.iter().map(String::as_str).collect();
    for rec in &mut records {
        rec.indicators.retain(|k, _| keep.contains(k.as_str()));
    }

    Ok(PovertyDataset::from_records(records, qualified))
}

fn parse_welfare(s: &str, row: usize) -> anyhow::Result<WelfareType> {
    WelfareType::parse(s).ok_or_else(|| anyhow!("row {row}: unknown welfare_type '{s}'"))
}

fn parse_level(s: &str, row: usize) -> anyhow::Result<ReportingLevel> {
    ReportingLevel::parse(s).ok_or_else(|| anyhow!("row {row}: unknown reporting_level '{s}'"))
}

fn parse_ppp(year: i64, row: usize) -> anyhow::Result<PppVersion> {
    PppVersion::from_year(year).ok_or_else(|| anyhow!("row {row}: unknown ppp_version '{year}'"))
}

/// An absent measurement in the source file, as Pandas writes it.
fn is_missing_cell(s: &str) -> bool {
    matches!(s, "" | "NA" | "NaN" | "nan" | "null")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<PovertyDataset, DataLoadError> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(file)
}

/// CSV layout: header row naming the five required columns plus any number of
/// indicator columns holding plain floats.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<PovertyDataset, DataLoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| DataLoadError::Malformed(e.into()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut required_idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in required_idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataLoadError::MissingColumn(name))?;
    }
    let candidates: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !required_idx.contains(i))
        .map(|(_, h)| h.clone())
        .collect();

    let mut records = Vec::new();
    let mut textual: BTreeSet<String> = BTreeSet::new();

    for (row_no, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|e| DataLoadError::Malformed(e.into()))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let record = (|| -> anyhow::Result<Record> {
            let country = cell(required_idx[0]).to_string();
            let year: i32 = cell(required_idx[1])
                .parse()
                .with_context(|| format!("row {row_no}: invalid year"))?;
            let welfare_type = parse_welfare(cell(required_idx[2]), row_no)?;
            let reporting_level = parse_level(cell(required_idx[3]), row_no)?;
            let ppp_year: i64 = cell(required_idx[4])
                .parse()
                .with_context(|| format!("row {row_no}: invalid ppp_version"))?;

            let mut indicators = BTreeMap::new();
            for (col_idx, header) in headers.iter().enumerate() {
                if required_idx.contains(&col_idx) {
                    continue;
                }
                let value = cell(col_idx);
                if is_missing_cell(value) {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(v) => {
                        indicators.insert(header.clone(), v);
                    }
                    Err(_) => {
                        textual.insert(header.clone());
                    }
                }
            }

            Ok(Record {
                country,
                year,
                welfare_type,
                reporting_level,
                ppp_version: parse_ppp(ppp_year, row_no)?,
                indicators,
            })
        })()
        .map_err(DataLoadError::Malformed)?;

        records.push(record);
    }

    finish(records, candidates, textual)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One raw row in records-oriented JSON. Indicator columns land in `extra`.
#[derive(Debug, Deserialize)]
struct RawJsonRecord {
    country: String,
    year: i32,
    welfare_type: String,
    reporting_level: String,
    ppp_version: i64,
    #[serde(flatten)]
    extra: BTreeMap<String, JsonValue>,
}

fn load_json(path: &Path) -> Result<PovertyDataset, DataLoadError> {
    let text = std::fs::read_to_string(path)?;
    load_json_str(&text)
}

pub fn load_json_str(text: &str) -> Result<PovertyDataset, DataLoadError> {
    let raw: Vec<RawJsonRecord> = serde_json::from_str(text)
        .context("parsing records-oriented JSON")
        .map_err(DataLoadError::Malformed)?;

    let mut records = Vec::with_capacity(raw.len());
    let mut candidates: Vec<String> = Vec::new();
    let mut textual: BTreeSet<String> = BTreeSet::new();

    for (row_no, row) in raw.into_iter().enumerate() {
        let mut indicators = BTreeMap::new();
        for (key, val) in &row.extra {
            if !candidates.contains(key) {
                candidates.push(key.clone());
            }
            match val {
                JsonValue::Number(n) => {
                    if let Some(v) = n.as_f64() {
                        indicators.insert(key.clone(), v);
                    }
                }
                JsonValue::Null => {}
                _ => {
                    textual.insert(key.clone());
                }
            }
        }

        let record = (|| -> anyhow::Result<Record> {
            Ok(Record {
                country: row.country,
                year: row.year,
                welfare_type: parse_welfare(&row.welfare_type, row_no)?,
                reporting_level: parse_level(&row.reporting_level, row_no)?,
                ppp_version: parse_ppp(row.ppp_version, row_no)?,
                indicators,
            })
        })()
        .map_err(DataLoadError::Malformed)?;

        records.push(record);
    }

    finish(records, candidates, textual)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Required columns must be Utf8 (country,
/// welfare_type, reporting_level) or integer (year, ppp_version); every other
/// numeric column becomes an indicator column.
fn load_parquet(path: &Path) -> Result<PovertyDataset, DataLoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")
        .map_err(DataLoadError::Malformed)?;
    let reader = builder
        .build()
        .context("building parquet reader")
        .map_err(DataLoadError::Malformed)?;

    let mut records = Vec::new();
    let mut candidates: Vec<String> = Vec::new();
    let mut textual: BTreeSet<String> = BTreeSet::new();

    for batch_result in reader {
        let batch = batch_result
            .context("reading parquet record batch")
            .map_err(DataLoadError::Malformed)?;
        let schema = batch.schema();

        let mut required_idx = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in required_idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = schema
                .index_of(name)
                .map_err(|_| DataLoadError::MissingColumn(name))?;
        }

        let extra_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| !required_idx.contains(i))
            .map(|(i, f)| (i, f.name().clone()))
            .collect();
        for (_, name) in &extra_cols {
            if !candidates.contains(name) {
                candidates.push(name.clone());
            }
        }

        for row in 0..batch.num_rows() {
            let record = (|| -> anyhow::Result<Record> {
                let country = extract_string(batch.column(required_idx[0]), row)
                    .with_context(|| format!("row {row}: reading country"))?;
                let year = extract_int(batch.column(required_idx[1]), row)
                    .with_context(|| format!("row {row}: reading year"))?
                    as i32;
                let welfare = extract_string(batch.column(required_idx[2]), row)
                    .with_context(|| format!("row {row}: reading welfare_type"))?;
                let level = extract_string(batch.column(required_idx[3]), row)
                    .with_context(|| format!("row {row}: reading reporting_level"))?;
                let ppp_year = extract_int(batch.column(required_idx[4]), row)
                    .with_context(|| format!("row {row}: reading ppp_version"))?;

                let mut indicators = BTreeMap::new();
                for (col_idx, col_name) in &extra_cols {
                    let col = batch.column(*col_idx);
                    if col.is_null(row) {
                        continue;
                    }
                    match extract_float(col, row) {
                        Some(v) => {
                            indicators.insert(col_name.clone(), v);
                        }
                        None => {
                            textual.insert(col_name.clone());
                        }
                    }
                }

                Ok(Record {
                    country,
                    year,
                    welfare_type: parse_welfare(&welfare, row)?,
                    reporting_level: parse_level(&level, row)?,
                    ppp_version: parse_ppp(ppp_year, row)?,
                    indicators,
                })
            })()
            .map_err(DataLoadError::Malformed)?;

            records.push(record);
        }
    }

    finish(records, candidates, textual)
}

// -- Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    let arr = col
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("expected Utf8 column, got {:?}", col.data_type()))?;
    Ok(arr.value(row).to_string())
}

fn extract_int(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected integer column, got {other:?}"),
    }
}

/// Numeric value of any supported arrow type at `row`, or None for
/// non-numeric columns.
fn extract_float(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
country,year,welfare_type,reporting_level,ppp_version,headcount_ratio_international_povline,region
China,2015,consumption,national,2017,9.8,Asia
China,2016,consumption,national,2017,7.2,Asia
India,2015,consumption,rural,2011,24.8,Asia
";

    #[test]
    fn csv_loads_rows_and_classifies_columns() {
        let ds = load_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.countries, vec!["China", "India"]);
        assert_eq!((ds.year_min, ds.year_max), (2015, 2016));
        // "region" is textual and must not become an indicator column
        assert_eq!(
            ds.indicator_columns,
            vec!["headcount_ratio_international_povline"]
        );
        assert_eq!(
            ds.records[0].indicator("headcount_ratio_international_povline"),
            Some(9.8)
        );
        assert!(ds.records[0].indicators.get("region").is_none());
    }

    #[test]
    fn csv_missing_cells_are_absent_not_zero() {
        let csv = "\
country,year,welfare_type,reporting_level,ppp_version,hc
China,2015,consumption,national,2017,
China,2016,consumption,national,2017,3.5
";
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].indicator("hc"), None);
        assert_eq!(ds.records[1].indicator("hc"), Some(3.5));
    }

    #[test]
    fn csv_missing_required_column_fails() {
        let csv = "country,year,welfare_type,reporting_level,hc\nChina,2015,consumption,national,1.0\n";
        match load_csv_reader(csv.as_bytes()) {
            Err(DataLoadError::MissingColumn(col)) => assert_eq!(col, "ppp_version"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_zero_rows_fails() {
        let csv = "country,year,welfare_type,reporting_level,ppp_version,hc\n";
        assert!(matches!(
            load_csv_reader(csv.as_bytes()),
            Err(DataLoadError::Empty)
        ));
    }

    #[test]
    fn csv_bad_categorical_fails() {
        let csv = "\
country,year,welfare_type,reporting_level,ppp_version,hc
China,2015,wealth,national,2017,1.0
";
        assert!(matches!(
            load_csv_reader(csv.as_bytes()),
            Err(DataLoadError::Malformed(_))
        ));
    }

    #[test]
    fn csv_without_indicator_columns_fails() {
        let csv = "\
country,year,welfare_type,reporting_level,ppp_version,region
China,2015,consumption,national,2017,Asia
";
        assert!(matches!(
            load_csv_reader(csv.as_bytes()),
            Err(DataLoadError::NoIndicatorColumns)
        ));
    }

    #[test]
    fn json_records_orientation_loads() {
        let json = r#"[
            {"country": "China", "year": 2015, "welfare_type": "consumption",
             "reporting_level": "national", "ppp_version": 2017,
             "headcount_ratio_international_povline": 9.8},
            {"country": "India", "year": 2016, "welfare_type": "income",
             "reporting_level": "urban", "ppp_version": 2011,
             "headcount_ratio_international_povline": null}
        ]"#;
        let ds = load_json_str(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].welfare_type, WelfareType::Income);
        assert_eq!(
            ds.records[1].indicator("headcount_ratio_international_povline"),
            None
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("dataset.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn csv_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pip.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        drop(f);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[2].country, "India");
    }

    #[test]
    fn parquet_flat_table_round_trip() {
        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("year", DataType::Int64, false),
            Field::new("welfare_type", DataType::Utf8, false),
            Field::new("reporting_level", DataType::Utf8, false),
            Field::new("ppp_version", DataType::Int64, false),
            Field::new("headcount_ratio_international_povline", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["China", "China"])),
                Arc::new(Int64Array::from(vec![2015, 2016])),
                Arc::new(StringArray::from(vec!["consumption", "consumption"])),
                Arc::new(StringArray::from(vec!["national", "national"])),
                Arc::new(Int64Array::from(vec![2017, 2017])),
                Arc::new(Float64Array::from(vec![Some(9.8), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pip.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.records[0].indicator("headcount_ratio_international_povline"),
            Some(9.8)
        );
        assert_eq!(
            ds.records[1].indicator("headcount_ratio_international_povline"),
            None
        );
    }
}
