//! Metric Chart Loader
//!
//! One fetch-and-render cycle for one chart:
//!
//! 1. read the range token
//! 2. GET `<endpoint>?range=<token>`
//! 3. check the payload for the variant
//! 4. shape records into series
//! 5. render, then swap loader and canvas visibility
//!
//! Every failure ends the cycle. Nothing is retried and no error escapes
//! [`MetricChartLoader::load`]; the returned [`LoadOutcome`] says what
//! happened.

use std::sync::Arc;
use thiserror::Error;

use crate::metrics::{
    ChartVariant, FailureFeedback, PayloadCheck, RecordError, Validation, FAILURE_MESSAGE,
    NO_DATA_MESSAGE,
};
use crate::mount::ChartMount;
use crate::range::RangeSelector;
use crate::render::{ChartHandle, ChartRenderer, RenderError};
use crate::series::ChartSeries;
use crate::source::{DataSource, FetchError};

/// Why a load failed
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result of one load
#[derive(Debug)]
pub enum LoadOutcome {
    /// Chart drawn, canvas visible
    Rendered {
        handle: ChartHandle,
        series: ChartSeries,
    },
    /// Backend answered with an `error` payload
    BackendError(String),
    /// Range has no records
    NoData,
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered { .. })
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        match self {
            LoadOutcome::Rendered { series, .. } => Some(series),
            _ => None,
        }
    }

    pub fn handle(&self) -> Option<&ChartHandle> {
        match self {
            LoadOutcome::Rendered { handle, .. } => Some(handle),
            _ => None,
        }
    }
}

/// Loader for one chart variant, wired to its collaborators
pub struct MetricChartLoader<V: ChartVariant> {
    variant: V,
    source: Arc<dyn DataSource>,
    renderer: Arc<dyn ChartRenderer>,
    mount: ChartMount,
}

impl<V: ChartVariant> MetricChartLoader<V> {
    pub fn new(
        variant: V,
        source: Arc<dyn DataSource>,
        renderer: Arc<dyn ChartRenderer>,
        mount: ChartMount,
    ) -> Self {
        Self {
            variant,
            source,
            renderer,
            mount,
        }
    }

    pub fn variant(&self) -> &V {
        &self.variant
    }

    /// Load using the `range` parameter of the page URL
    pub async fn load_page(&self, page_url: &str) -> LoadOutcome {
        self.load(&RangeSelector::from_page_url(page_url)).await
    }

    /// Run one fetch-and-render cycle
    pub async fn load(&self, range: &RangeSelector) -> LoadOutcome {
        let kind = self.variant.kind();
        let path = range.request_path(self.variant.endpoint());
        tracing::info!("Loading {} chart: {}", kind, path);

        let payload = match self.source.fetch(&path).await {
            Ok(payload) => payload,
            Err(err) => {
                // Error-aware variants read `{error}` bodies even on non-OK statuses
                if let (PayloadCheck::ErrorField, Some(message)) =
                    (self.variant.payload_check(), err.error_payload())
                {
                    let message = message.to_string();
                    return self.backend_error(message);
                }
                return self.fail(err.into());
            }
        };

        let items = match self.variant.payload_check().validate(payload) {
            Validation::Records(items) => items,
            Validation::BackendError(message) => return self.backend_error(message),
            Validation::NoData => {
                tracing::warn!("No {} data for range {}", kind, range);
                self.mount.loader().set_html(NO_DATA_MESSAGE);
                return LoadOutcome::NoData;
            }
            Validation::Malformed(reason) => return self.fail(LoadError::Malformed(reason)),
        };

        let series = match self
            .variant
            .decode(items)
            .and_then(|records| self.variant.to_series(&records))
        {
            Ok(series) => series,
            Err(err) => return self.fail(err.into()),
        };

        let config = self.variant.chart_config(series.clone());
        let handle = match self.renderer.render(&config) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::error!("Error rendering {} chart: {}", kind, err);
                self.mount.loader().set_text(FAILURE_MESSAGE);
                return LoadOutcome::Failed(err.into());
            }
        };

        self.mount.reveal_chart();
        tracing::info!(
            "Rendered {} chart ({} points, {} series)",
            kind,
            series.len(),
            series.datasets.len()
        );

        LoadOutcome::Rendered { handle, series }
    }

    fn backend_error(&self, message: String) -> LoadOutcome {
        tracing::warn!("Backend error for {} chart: {}", self.variant.kind(), message);
        self.mount.loader().set_text(FAILURE_MESSAGE);
        LoadOutcome::BackendError(message)
    }

    fn fail(&self, err: LoadError) -> LoadOutcome {
        tracing::error!("Error fetching {} data: {}", self.variant.kind(), err);
        if self.variant.fetch_failure_feedback() == FailureFeedback::ShowMessage {
            self.mount.loader().set_text(FAILURE_MESSAGE);
        }
        LoadOutcome::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BloodPressure, Medications, Weight};
    use crate::mount::{memory_mount, Element, MemoryElement};
    use crate::render::{ChartConfig, RecordingRenderer};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Serves one canned response and remembers what was requested
    struct CannedSource {
        response: Mutex<Option<Result<Value, FetchError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedSource {
        fn ok(payload: Value) -> Arc<Self> {
            Self::with(Ok(payload))
        }

        fn with(response: Result<Value, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(response)),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DataSource for CannedSource {
        async fn fetch(&self, path_and_query: &str) -> Result<Value, FetchError> {
            self.requested.lock().unwrap().push(path_and_query.to_string());
            self.response
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(FetchError::Timeout))
        }
    }

    struct BrokenRenderer;

    impl ChartRenderer for BrokenRenderer {
        fn render(&self, _config: &ChartConfig) -> Result<ChartHandle, RenderError> {
            Err(RenderError::Unavailable("no context".to_string()))
        }
    }

    struct Harness<V: ChartVariant> {
        loader: MetricChartLoader<V>,
        source: Arc<CannedSource>,
        renderer: Arc<RecordingRenderer>,
        loader_el: MemoryElement,
        canvas_el: MemoryElement,
    }

    fn harness<V: ChartVariant>(variant: V, source: Arc<CannedSource>) -> Harness<V> {
        let renderer = Arc::new(RecordingRenderer::new());
        let (loader_el, canvas_el, mount) = memory_mount(variant.canvas_id());
        let loader = MetricChartLoader::new(variant, source.clone(), renderer.clone(), mount);
        Harness {
            loader,
            source,
            renderer,
            loader_el,
            canvas_el,
        }
    }

    #[tokio::test]
    async fn test_weight_success() {
        let h = harness(
            Weight,
            CannedSource::ok(json!([{"date": "2024-01-01T00:00:00", "weight": 70.5}])),
        );

        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(outcome.is_rendered());

        let series = outcome.series().unwrap();
        assert_eq!(series.labels, vec!["2024-01-01 00:00:00"]);
        assert_eq!(series.datasets.len(), 1);
        assert_eq!(series.datasets[0].values, vec![Some(70.5)]);

        assert!(h.loader_el.is_hidden());
        assert!(!h.canvas_el.is_hidden());
        assert_eq!(h.renderer.count(), 1);
        assert_eq!(h.renderer.last().unwrap().series, *series);
    }

    #[tokio::test]
    async fn test_backend_error_payload() {
        let h = harness(Weight, CannedSource::ok(json!({"error": "db down"})));

        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::BackendError(ref m) if m == "db down"));
        assert_eq!(h.loader_el.content(), FAILURE_MESSAGE);
        assert!(!h.loader_el.is_hidden());
        assert!(h.canvas_el.is_hidden());
        assert_eq!(h.renderer.count(), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_status_is_error_payload() {
        let h = harness(
            BloodPressure,
            CannedSource::with(Err(FetchError::Status {
                status: 401,
                body: Some(json!({"error": "Unauthorized"})),
            })),
        );

        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::BackendError(ref m) if m == "Unauthorized"));
        assert_eq!(h.loader_el.content(), FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_medications() {
        let h = harness(Medications, CannedSource::ok(json!([])));

        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::NoData));

        let state = h.loader_el.snapshot();
        assert_eq!(state.content, NO_DATA_MESSAGE);
        assert!(state.is_html);
        assert!(h.canvas_el.is_hidden());
        assert_eq!(h.renderer.count(), 0);
    }

    #[tokio::test]
    async fn test_empty_weight_renders_empty_chart() {
        let h = harness(Weight, CannedSource::ok(json!([])));

        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(outcome.is_rendered());
        assert!(outcome.series().unwrap().is_empty());
        assert!(!h.canvas_el.is_hidden());
    }

    #[tokio::test]
    async fn test_default_range_request() {
        let h = harness(Weight, CannedSource::ok(json!([])));
        h.loader.load_page("http://localhost:5000/weight/").await;
        assert_eq!(h.source.requested(), vec!["/weight/data?range=last_week"]);
    }

    #[tokio::test]
    async fn test_range_from_page_url() {
        let h = harness(Medications, CannedSource::ok(json!([])));
        h.loader
            .load_page("http://localhost:5000/medications/?range=last_month")
            .await;
        assert_eq!(h.source.requested(), vec!["/medications/data?range=last_month"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_feedback_per_variant() {
        let h = harness(Weight, CannedSource::with(Err(FetchError::Timeout)));
        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Fetch(_))));
        assert_eq!(h.loader_el.content(), FAILURE_MESSAGE);

        let h = harness(BloodPressure, CannedSource::with(Err(FetchError::Timeout)));
        h.loader.load(&RangeSelector::default()).await;
        assert_eq!(h.loader_el.content(), FAILURE_MESSAGE);

        let h = harness(
            Medications,
            CannedSource::with(Err(FetchError::Status {
                status: 401,
                body: Some(json!({"error": "Unauthorized"})),
            })),
        );
        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Fetch(_))));
        assert_eq!(h.loader_el.content(), "Loading...");
        assert!(h.canvas_el.is_hidden());
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let h = harness(BloodPressure, CannedSource::ok(json!({"rows": []})));
        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Malformed(_))));
        assert!(h.canvas_el.is_hidden());

        let h = harness(Weight, CannedSource::ok(json!([{"weight": 70}])));
        let outcome = h.loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Record(_))));
        assert_eq!(h.loader_el.content(), FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_render_failure_keeps_canvas_hidden() {
        let (loader_el, canvas_el, mount) = memory_mount("weightChart");
        let loader = MetricChartLoader::new(
            Weight,
            CannedSource::ok(json!([{"date": "2024-01-01", "weight": 70}])),
            Arc::new(BrokenRenderer),
            mount,
        );

        let outcome = loader.load(&RangeSelector::default()).await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Render(_))));
        assert_eq!(loader_el.content(), FAILURE_MESSAGE);
        assert!(canvas_el.is_hidden());
    }

    #[tokio::test]
    async fn test_same_response_same_series() {
        let payload = json!([
            {"date": "2024-01-01 08:00:00", "status": "Taken"},
            {"date": "2024-01-01 20:00:00", "status": "Missed"},
            {"date": "2024-01-02 08:00:00", "status": "Taken"}
        ]);

        let first = harness(Medications, CannedSource::ok(payload.clone()));
        let second = harness(Medications, CannedSource::ok(payload));

        let a = first.loader.load(&RangeSelector::default()).await;
        let b = second.loader.load(&RangeSelector::default()).await;
        assert_eq!(a.series(), b.series());
        assert_eq!(a.series().unwrap().labels, vec!["2024-01-01", "2024-01-02"]);
    }
}
