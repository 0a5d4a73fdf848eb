//! Metric Chart Variants
//!
//! Each dashboard chart is a [`ChartVariant`]: the endpoint it reads, how
//! its payload is checked, how records become a [`ChartSeries`], and the
//! chart it is drawn as.
//!
//! | Variant | Endpoint | Chart | Series |
//! |---------|----------|-------|--------|
//! | [`BloodPressure`] | `/blood_pressure/data` | line | systolic, diastolic, pulse |
//! | [`Weight`] | `/weight/data` | line | weight |
//! | [`Medications`] | `/medications/data` | bar | taken, missed per day |

mod adherence;
mod blood_pressure;
mod medications;
mod records;
mod weight;

pub use adherence::{calendar_day, AdherenceCounts, AdherenceTally};
pub use blood_pressure::BloodPressure;
pub use medications::Medications;
pub use records::{BloodPressureRecord, MedicationRecord, RecordError, WeightRecord};
pub use weight::Weight;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::render::ChartConfig;
use crate::series::ChartSeries;

/// Loader text after any failure that is reported to the user
pub const FAILURE_MESSAGE: &str = "Failed to load data.";

/// Loader markup when a range has no records
pub const NO_DATA_MESSAGE: &str =
    "<span class='text-danger'>No data available for the selected range.</span>";

/// Which dashboard chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    BloodPressure,
    Weight,
    Medications,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::BloodPressure => "blood_pressure",
            MetricKind::Weight => "weight",
            MetricKind::Medications => "medications",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "blood_pressure" | "bp" => Ok(MetricKind::BloodPressure),
            "weight" => Ok(MetricKind::Weight),
            "medications" | "meds" => Ok(MetricKind::Medications),
            other => Err(format!("Unknown metric: {}", other)),
        }
    }
}

/// How a payload is checked before its records are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadCheck {
    /// An object with a truthy `error` field is a backend failure
    ErrorField,
    /// Anything but a non-empty array means "no data"
    NonEmptyArray,
}

/// Outcome of [`PayloadCheck::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Raw records, in backend order
    Records(Vec<Value>),
    /// Backend reported an error
    BackendError(String),
    NoData,
    /// Neither records nor a recognised error
    Malformed(String),
}

impl PayloadCheck {
    pub fn validate(&self, payload: Value) -> Validation {
        match self {
            PayloadCheck::ErrorField => {
                if let Some(error) = payload.get("error").filter(|e| is_truthy(e)) {
                    let message = match error {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    return Validation::BackendError(message);
                }
                match payload {
                    Value::Array(items) => Validation::Records(items),
                    other => Validation::Malformed(format!(
                        "expected an array of records, got {}",
                        json_type(&other)
                    )),
                }
            }
            PayloadCheck::NonEmptyArray => match payload {
                Value::Array(items) if !items.is_empty() => Validation::Records(items),
                _ => Validation::NoData,
            },
        }
    }
}

/// What the loader element shows when the fetch itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureFeedback {
    /// Set the loader text to [`FAILURE_MESSAGE`]
    ShowMessage,
    /// Leave the loader untouched
    LogOnly,
}

/// One dashboard chart
pub trait ChartVariant: Send + Sync {
    type Record: DeserializeOwned + Send;

    fn kind(&self) -> MetricKind;

    /// Backend path, without query
    fn endpoint(&self) -> &'static str;

    /// Identifier of the canvas this chart is drawn on
    fn canvas_id(&self) -> &'static str;

    fn payload_check(&self) -> PayloadCheck;

    fn fetch_failure_feedback(&self) -> FailureFeedback;

    /// Shape decoded records into series
    fn to_series(&self, records: &[Self::Record]) -> Result<ChartSeries, RecordError>;

    /// Chart type, colours and axes around a series
    fn chart_config(&self, series: ChartSeries) -> ChartConfig;

    /// Decode raw records in order
    fn decode(&self, items: Vec<Value>) -> Result<Vec<Self::Record>, RecordError> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|source| RecordError::Decode { index, source })
            })
            .collect()
    }
}

/// `null`, `false`, `0` and `""` do not signal an error
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
