use std::convert::TryFrom;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::{AnalysisError, Result};

/// Header names every insurance dataset has to carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "age", "sex", "bmi", "children", "smoker", "region", "charges",
];

/// One csv row exactly as it appears in the file, before coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub age: String,
    pub sex: String,
    pub bmi: String,
    pub children: String,
    pub smoker: String,
    pub region: String,
    pub charges: String,
}

/// A row whose numeric fields all parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceRecord {
    pub age: u32,
    pub sex: String,
    pub bmi: f64,
    pub children: u32,
    pub smoker: String,
    pub region: String,
    pub charges: f64,
}

/// The field that refused to coerce, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionFailure {
    pub field: &'static str,
}

impl TryFrom<RawRecord> for InsuranceRecord {
    type Error = CoercionFailure;

    fn try_from(raw: RawRecord) -> std::result::Result<Self, Self::Error> {
        Ok(InsuranceRecord {
            age: parse_field(&raw.age, "age")?,
            sex: raw.sex,
            bmi: parse_positive(&raw.bmi, "bmi")?,
            children: parse_field(&raw.children, "children")?,
            smoker: raw.smoker,
            region: raw.region,
            charges: parse_positive(&raw.charges, "charges")?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(
    text: &str,
    field: &'static str,
) -> std::result::Result<T, CoercionFailure> {
    text.trim().parse().map_err(|_| CoercionFailure { field })
}

/// Measurements must be finite and strictly positive.
fn parse_positive(text: &str, field: &'static str) -> std::result::Result<f64, CoercionFailure> {
    let value: f64 = parse_field(text, field)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CoercionFailure { field })
    }
}

/// Every row that survived coercion, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<InsuranceRecord>,
    skipped: usize,
}

impl Dataset {
    pub fn new(records: Vec<InsuranceRecord>) -> Self {
        Dataset {
            records,
            skipped: 0,
        }
    }

    pub fn records(&self) -> &[InsuranceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows discarded while loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn ages(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.age).collect()
    }

    pub fn bmis(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.bmi).collect()
    }

    pub fn charges(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.charges).collect()
    }
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(path.as_ref())?;
    let dataset = from_reader(file)?;
    info!(
        "loaded {} records from {} ({} rows skipped)",
        dataset.len(),
        path.as_ref().display(),
        dataset.skipped()
    );
    Ok(dataset)
}

/// Reads a header-led csv stream. Rows that fail to parse or coerce are
/// dropped and only counted; a missing required column fails the whole load.
pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|h| h == **name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::MissingColumns { columns: missing });
    }
    let headers = last_occurrence_wins(&headers);

    let mut dataset = Dataset::default();
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("dropping unreadable row: {}", e);
                dataset.skipped += 1;
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let raw: RawRecord = match row.deserialize(Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("dropping line {}: {}", line, e);
                dataset.skipped += 1;
                continue;
            }
        };

        match InsuranceRecord::try_from(raw) {
            Ok(record) => dataset.records.push(record),
            Err(failure) => {
                debug!("dropping line {}: bad {} value", line, failure.field);
                dataset.skipped += 1;
            }
        }
    }

    Ok(dataset)
}

/// Renames every earlier copy of a repeated column so that only its last
/// occurrence is deserialized.
fn last_occurrence_wins(headers: &csv::StringRecord) -> csv::StringRecord {
    let names: Vec<&str> = headers.iter().collect();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if names[i + 1..].contains(name) {
                warn!("column {:?} repeats, using its last occurrence", name);
                format!("{}#{}", name, i)
            } else {
                name.to_string()
            }
        })
        .collect()
}
