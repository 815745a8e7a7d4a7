use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

/// Welfare measurement basis of a survey row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelfareType {
    Consumption,
    Income,
}

impl WelfareType {
    pub const ALL: [WelfareType; 2] = [WelfareType::Consumption, WelfareType::Income];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consumption" => Some(WelfareType::Consumption),
            "income" => Some(WelfareType::Income),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WelfareType::Consumption => "consumption",
            WelfareType::Income => "income",
        }
    }
}

impl fmt::Display for WelfareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation level a survey row reports at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingLevel {
    National,
    Rural,
    Urban,
}

impl ReportingLevel {
    pub const ALL: [ReportingLevel; 3] = [
        ReportingLevel::National,
        ReportingLevel::Rural,
        ReportingLevel::Urban,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "national" => Some(ReportingLevel::National),
            "rural" => Some(ReportingLevel::Rural),
            "urban" => Some(ReportingLevel::Urban),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingLevel::National => "national",
            ReportingLevel::Rural => "rural",
            ReportingLevel::Urban => "urban",
        }
    }
}

impl fmt::Display for ReportingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchasing-power-parity reference year used to normalize monetary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PppVersion {
    Ppp2011,
    Ppp2017,
}

impl PppVersion {
    pub const ALL: [PppVersion; 2] = [PppVersion::Ppp2011, PppVersion::Ppp2017];

    pub fn from_year(year: i64) -> Option<Self> {
        match year {
            2011 => Some(PppVersion::Ppp2011),
            2017 => Some(PppVersion::Ppp2017),
            _ => None,
        }
    }

    pub fn year(&self) -> i64 {
        match self {
            PppVersion::Ppp2011 => 2011,
            PppVersion::Ppp2017 => 2017,
        }
    }
}

impl fmt::Display for PppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the poverty table
// ---------------------------------------------------------------------------

/// One observation row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    pub welfare_type: WelfareType,
    pub reporting_level: ReportingLevel,
    pub ppp_version: PppVersion,
    /// Numeric indicator columns present for this row. A column missing from
    /// the map means the source cell was empty, not zero.
    pub indicators: BTreeMap<String, f64>,
}

impl Record {
    /// Value of a named indicator column, if the row has it.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.indicators.get(name).copied()
    }
}

// ---------------------------------------------------------------------------
// PovertyDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed facet indices. Read-only after
/// construction; there are no mutation operations.
#[derive(Debug, Clone)]
pub struct PovertyDataset {
    /// All rows in source order.
    pub records: Vec<Record>,
    /// Distinct country names, sorted.
    pub countries: Vec<String>,
    /// Numeric indicator column names, in source column order.
    pub indicator_columns: Vec<String>,
    /// Observed year bounds.
    pub year_min: i32,
    pub year_max: i32,
}

impl PovertyDataset {
    /// Build facet indices from loaded rows. `indicator_columns` keeps the
    /// source header order so the controls list columns as the file does.
    pub fn from_records(records: Vec<Record>, indicator_columns: Vec<String>) -> Self {
        let mut countries: BTreeSet<String> = BTreeSet::new();
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;

        for rec in &records {
            countries.insert(rec.country.clone());
            year_min = year_min.min(rec.year);
            year_max = year_max.max(rec.year);
        }
        if records.is_empty() {
            year_min = 0;
            year_max = 0;
        }

        PovertyDataset {
            records,
            countries: countries.into_iter().collect(),
            indicator_columns,
            year_min,
            year_max,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `name` is one of the dataset's numeric indicator columns.
    pub fn has_indicator(&self, name: &str) -> bool {
        self.indicator_columns.iter().any(|c| c == name)
    }
}
