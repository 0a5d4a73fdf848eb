//! # Healthsome Charts
//!
//! Dashboard charts for Healthsome: blood pressure, weight trend and
//! medication adherence, each loaded from a time-ranged backend endpoint
//! and handed to a chart renderer.
//!
//! ## Modules
//!
//! - [`loader`]: the fetch-validate-shape-render cycle
//! - [`metrics`]: the three chart variants and their records
//! - [`source`]: where payloads come from (HTTP backend)
//! - [`render`]: renderer port, Chart.js output and a recording double
//! - [`mount`]: injected loader/canvas element handles
//! - [`range`]: the `range` query token
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthsome_charts::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpDataSource::new(SourceConfig::default())?;
//!     let renderer = ChartJsRenderer::new("./charts", OutputFormat::Html);
//!     let (_loader, _canvas, mount) = memory_mount("weightChart");
//!
//!     let loader = MetricChartLoader::new(Weight, Arc::new(source), Arc::new(renderer), mount);
//!     let outcome = loader.load_page("http://localhost:5000/weight/?range=last_month").await;
//!
//!     println!("Rendered: {}", outcome.is_rendered());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod loader;
pub mod metrics;
pub mod mount;
pub mod range;
pub mod render;
pub mod series;
pub mod source;

pub use config::{
    generate_default_config, BackendConfig, ChartsConfig, Config, ConfigError, LoggingConfig,
};

pub use loader::{LoadError, LoadOutcome, MetricChartLoader};

pub use metrics::{
    AdherenceCounts, AdherenceTally, BloodPressure, ChartVariant, FailureFeedback, Medications,
    MetricKind, PayloadCheck, RecordError, Validation, Weight, FAILURE_MESSAGE, NO_DATA_MESSAGE,
};

pub use mount::{memory_mount, ChartMount, Element, ElementState, MemoryElement, HIDDEN_CLASS};

pub use range::{RangeSelector, DEFAULT_RANGE};

pub use render::{
    ChartConfig, ChartHandle, ChartJsRenderer, ChartKind, ChartRenderer, OutputFormat,
    RecordingRenderer, RenderError, TooltipFormat,
};

pub use series::{date_label, ChartSeries, Dataset, SeriesColor};

pub use source::{DataSource, FetchError, HttpDataSource, SourceConfig};
