//! Healthsome Charts CLI
//!
//! Runs one chart load against the Healthsome backend and writes the chart:
//! - Render a blood pressure, weight or medications chart
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use healthsome_charts::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "healthsome-charts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render Healthsome dashboard charts from the metrics backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL (overrides config)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load one chart and render it
    Render {
        /// Chart to render (blood-pressure, weight, medications)
        metric: MetricKind,
        /// Range token (last_week, last_month, all_time)
        #[arg(short, long)]
        range: Option<String>,
        /// Page URL to read the `range` parameter from
        #[arg(long, conflicts_with = "range")]
        page_url: Option<String>,
        /// Output format (json, html)
        #[arg(short, long, default_value = "html")]
        format: OutputFormat,
        /// Output directory (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Fetch and shape the data without writing a chart
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default().context("Failed to load config")?,
    };
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Render {
            metric,
            range,
            page_url,
            format,
            output_dir,
            dry_run,
        } => {
            let range = match (range, page_url) {
                (Some(token), _) => RangeSelector::new(token),
                (None, Some(url)) => RangeSelector::from_page_url(&url),
                (None, None) => RangeSelector::new(config.charts.default_range.clone()),
            };

            if !range.is_known() {
                tracing::warn!(
                    "Unknown range {:?}; the backend treats it as all_time",
                    range.as_str()
                );
            }

            let http = HttpDataSource::new(SourceConfig::from(&config.backend))
                .context("Failed to create HTTP client")?;
            tracing::info!("Using backend {}", http.base_url());
            let source: Arc<dyn DataSource> = Arc::new(http);
            let renderer: Arc<dyn ChartRenderer> = if dry_run {
                Arc::new(RecordingRenderer::new())
            } else {
                let dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.charts.output_dir));
                Arc::new(ChartJsRenderer::new(dir, format))
            };

            let outcome = match metric {
                MetricKind::BloodPressure => render(BloodPressure, source, renderer, &range).await,
                MetricKind::Weight => render(Weight, source, renderer, &range).await,
                MetricKind::Medications => render(Medications, source, renderer, &range).await,
            };

            report(metric, &range, outcome)?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("healthsome_charts={}", logging.level)),
    );

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Final state of one load, as seen on the page
struct PageState {
    outcome: LoadOutcome,
    loader: ElementState,
    canvas: ElementState,
    /// Tooltip text for the most recent point
    latest: Vec<String>,
}

async fn render<V: ChartVariant>(
    variant: V,
    source: Arc<dyn DataSource>,
    renderer: Arc<dyn ChartRenderer>,
    range: &RangeSelector,
) -> PageState {
    let (loader_el, canvas_el, mount) = memory_mount(variant.canvas_id());
    let loader = MetricChartLoader::new(variant, source, renderer, mount);
    let outcome = loader.load(range).await;

    let latest = match outcome.series() {
        Some(series) if !series.is_empty() => loader
            .variant()
            .chart_config(series.clone())
            .tooltip_lines(series.len() - 1),
        _ => Vec::new(),
    };

    PageState {
        outcome,
        loader: loader_el.snapshot(),
        canvas: canvas_el.snapshot(),
        latest,
    }
}

fn report(metric: MetricKind, range: &RangeSelector, page: PageState) -> anyhow::Result<()> {
    let visible = |state: &ElementState| !state.classes.contains(HIDDEN_CLASS);

    println!("Chart:   {} ({})", metric, range);
    println!(
        "Loader:  {} {:?}",
        if visible(&page.loader) { "visible" } else { "hidden" },
        page.loader.content
    );
    println!(
        "Canvas:  {}",
        if visible(&page.canvas) { "visible" } else { "hidden" }
    );

    match page.outcome {
        LoadOutcome::Rendered { handle, series } => {
            println!(
                "Points:  {} across {} series",
                series.len(),
                series.datasets.len()
            );
            for dataset in &series.datasets {
                println!("  {:<18} {}", dataset.label, format_values(&dataset.values));
            }
            if let Some(label) = series.labels.last() {
                println!("Latest:  {}", label);
                for line in &page.latest {
                    println!("  {}", line);
                }
            }
            if let Some(path) = handle.path {
                println!("Written: {}", path.display());
            }
            Ok(())
        }
        LoadOutcome::BackendError(message) => bail!("Backend error: {}", message),
        LoadOutcome::NoData => bail!("No data available for range {}", range),
        LoadOutcome::Failed(err) => Err(err.into()),
    }
}

fn format_values(values: &[Option<f64>]) -> String {
    values
        .iter()
        .map(|v| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}
