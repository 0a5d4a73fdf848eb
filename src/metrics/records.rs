//! Backend records
//!
//! Numeric fields are lenient: a missing or non-numeric value decodes to
//! `None` and is charted as a gap. Only `date` is required.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// One blood pressure reading
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BloodPressureRecord {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub systolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub diastolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pulse: Option<f64>,
}

/// One weight measurement in kilograms
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightRecord {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
}

/// One scheduled medication dose
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MedicationRecord {
    pub date: String,
    #[serde(default)]
    pub medication: Option<String>,
    /// "Taken"; any other value counts as missed
    #[serde(default)]
    pub status: Option<String>,
}

impl MedicationRecord {
    pub fn is_taken(&self) -> bool {
        self.status.as_deref() == Some("Taken")
    }
}

/// Errors turning a payload into records
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid record at index {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
