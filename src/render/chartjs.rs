//! Chart.js renderer
//!
//! Writes a Chart.js configuration for each chart into an output directory,
//! either as bare JSON or wrapped in a self-contained HTML page.

use serde_json::{json, Value};
use std::path::PathBuf;

use super::{ChartConfig, ChartHandle, ChartKind, ChartRenderer, RenderError};

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// File format written by [`ChartJsRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Renderer producing Chart.js configuration files
#[derive(Debug, Clone)]
pub struct ChartJsRenderer {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl ChartJsRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Where the chart for `canvas_id` will be written
    pub fn path_for(&self, canvas_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", canvas_id, self.format.extension()))
    }
}

impl ChartRenderer for ChartJsRenderer {
    fn render(&self, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let chart = chart_js_config(config);
        let body = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&chart)?,
            OutputFormat::Html => html_page(config, &chart)?,
        };

        let path = self.path_for(&config.canvas_id);
        std::fs::write(&path, body)?;

        tracing::info!(
            "Wrote {} chart {} to {:?}",
            config.kind.as_str(),
            config.canvas_id,
            path
        );

        Ok(ChartHandle::new(config.kind).with_path(path))
    }
}

/// Build the `new Chart(ctx, <config>)` argument
pub fn chart_js_config(config: &ChartConfig) -> Value {
    let datasets: Vec<Value> = config
        .series
        .datasets
        .iter()
        .map(|d| match config.kind {
            ChartKind::Line => json!({
                "label": d.label,
                "data": d.values,
                "borderColor": d.color.border,
                "backgroundColor": d.color.background,
                "borderWidth": 2,
                "tension": 0.4,
            }),
            ChartKind::Bar => json!({
                "label": d.label,
                "data": d.values,
                "backgroundColor": d.color.background,
            }),
        })
        .collect();

    let mut y_scale = json!({
        "title": { "display": true, "text": config.y_axis_title },
    });
    if config.begin_at_zero {
        y_scale["beginAtZero"] = json!(true);
    }

    let mut chart = json!({
        "type": config.kind.as_str(),
        "data": {
            "labels": config.series.labels,
            "datasets": datasets,
        },
        "options": {
            "responsive": true,
            "plugins": {
                "legend": { "display": true, "position": "top" },
            },
            "scales": {
                "x": { "title": { "display": true, "text": config.x_axis_title } },
                "y": y_scale,
            },
        },
    });

    // Chart.js takes tooltip formatting as a callback; the unit travels as
    // data and the HTML page wires it into the callback.
    if let Some(suffix) = config.tooltip.suffix {
        chart["options"]["plugins"]["tooltip"] = json!({ "valueSuffix": suffix });
    }

    chart
}

fn html_page(config: &ChartConfig, chart: &Value) -> Result<String, RenderError> {
    // Keep the embedded JSON from closing the script element early
    let chart_json = serde_json::to_string(chart)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{id}</title>
<script src="{cdn}"></script>
</head>
<body>
<canvas id="{id}"></canvas>
<script>
const config = {chart_json};
const tooltip = config.options.plugins.tooltip || {{}};
const suffix = tooltip.valueSuffix || "";
tooltip.callbacks = {{
    label: (context) => `${{context.dataset.label}}: ${{context.raw}}${{suffix}}`
}};
config.options.plugins.tooltip = tooltip;
new Chart(document.getElementById("{id}").getContext("2d"), config);
</script>
</body>
</html>
"#,
        id = config.canvas_id,
        cdn = CHART_JS_CDN,
        chart_json = chart_json,
    ))
}
