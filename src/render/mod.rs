//! Chart Rendering
//!
//! The loader never draws anything itself. It builds a [`ChartConfig`] and
//! hands it to a [`ChartRenderer`], which returns a handle to whatever it
//! produced.
//!
//! ## Renderers
//!
//! - [`ChartJsRenderer`]: writes a Chart.js configuration (JSON or a
//!   standalone HTML page)
//! - [`RecordingRenderer`]: keeps every configuration it receives

mod chartjs;
mod recording;

pub use chartjs::{ChartJsRenderer, OutputFormat};
pub use recording::RecordingRenderer;

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::series::ChartSeries;

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
        }
    }
}

/// Tooltip text for one hovered value: `"<series label>: <value><suffix>"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TooltipFormat {
    pub suffix: Option<&'static str>,
}

impl TooltipFormat {
    pub const fn plain() -> Self {
        Self { suffix: None }
    }

    pub const fn with_suffix(suffix: &'static str) -> Self {
        Self {
            suffix: Some(suffix),
        }
    }

    pub fn format(&self, series_label: &str, value: Option<f64>) -> String {
        let value = value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        format!("{}: {}{}", series_label, value, self.suffix.unwrap_or(""))
    }
}

/// Everything a renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    /// Identifier of the target canvas (e.g. `weightChart`)
    pub canvas_id: String,
    pub kind: ChartKind,
    pub series: ChartSeries,
    pub tooltip: TooltipFormat,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Pin the value axis at zero (count charts)
    pub begin_at_zero: bool,
}

impl ChartConfig {
    pub fn new(canvas_id: impl Into<String>, kind: ChartKind, series: ChartSeries) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            kind,
            series,
            tooltip: TooltipFormat::plain(),
            x_axis_title: "Date".to_string(),
            y_axis_title: "Value".to_string(),
            begin_at_zero: false,
        }
    }

    pub fn tooltip(mut self, tooltip: TooltipFormat) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn y_axis(mut self, title: impl Into<String>) -> Self {
        self.y_axis_title = title.into();
        self
    }

    pub fn begin_at_zero(mut self) -> Self {
        self.begin_at_zero = true;
        self
    }

    /// Tooltip lines for the point at `index`, one per dataset
    pub fn tooltip_lines(&self, index: usize) -> Vec<String> {
        self.series
            .datasets
            .iter()
            .map(|d| {
                let value = d.values.get(index).copied().flatten();
                self.tooltip.format(&d.label, value)
            })
            .collect()
    }
}

/// Handle to a rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: Uuid,
    pub kind: ChartKind,
    /// File the renderer wrote, if any
    pub path: Option<PathBuf>,
}

impl ChartHandle {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            path: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Renderer port
pub trait ChartRenderer: Send + Sync {
    fn render(&self, config: &ChartConfig) -> Result<ChartHandle, RenderError>;
}

/// Errors raised by renderers
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}
