//! Chart Series
//!
//! Label axis plus named numeric datasets, the shape every chart variant
//! reduces its records to before handing them to a renderer.

use serde::Serialize;

/// Fixed colour of a dataset, as a CSS colour string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesColor {
    /// Line / bar colour
    pub border: &'static str,
    /// Fill colour (translucent for line charts)
    pub background: &'static str,
}

impl SeriesColor {
    pub const fn new(border: &'static str, background: &'static str) -> Self {
        Self { border, background }
    }

    /// Same colour for border and fill (bar charts)
    pub const fn solid(color: &'static str) -> Self {
        Self {
            border: color,
            background: color,
        }
    }
}

/// One named ordered sequence of values plotted against the label axis.
///
/// `None` marks a value the backend did not supply. It is passed to the
/// renderer as a gap instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub color: SeriesColor,
}

impl Dataset {
    pub fn new(label: impl Into<String>, color: SeriesColor) -> Self {
        Self {
            label: label.into(),
            values: Vec::new(),
            color,
        }
    }

    /// Attach values
    pub fn values(mut self, values: Vec<Option<f64>>) -> Self {
        self.values = values;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Labels paired with one or more datasets of the same length
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            datasets: Vec::new(),
        }
    }

    /// Add a dataset
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Number of points on the label axis
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up a dataset by its label
    pub fn get(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }

    /// True when every dataset has exactly one value per label
    pub fn is_aligned(&self) -> bool {
        self.datasets.iter().all(|d| d.len() == self.labels.len())
    }
}

/// Turn a backend timestamp into an axis label.
///
/// Only the first `T` separator is replaced: `2024-01-02T08:00:00`
/// becomes `2024-01-02 08:00:00`.
pub fn date_label(date: &str) -> String {
    date.replacen('T', " ", 1)
}
