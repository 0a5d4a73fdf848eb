//! Recording renderer
//!
//! Captures configurations instead of drawing them.

use std::sync::Mutex;

use super::{ChartConfig, ChartHandle, ChartRenderer, RenderError};

/// Renderer that remembers every chart it was asked to draw
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    charts: Mutex<Vec<ChartConfig>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<ChartConfig> {
        self.charts.lock().ok().and_then(|c| c.last().cloned())
    }

    pub fn count(&self) -> usize {
        self.charts.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        self.charts
            .lock()
            .map_err(|e| RenderError::Unavailable(e.to_string()))?
            .push(config.clone());

        tracing::debug!(
            "Recorded {} chart for {} ({} points)",
            config.kind.as_str(),
            config.canvas_id,
            config.series.len()
        );

        Ok(ChartHandle::new(config.kind))
    }
}
