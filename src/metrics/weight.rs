//! Weight trend chart

use super::records::{RecordError, WeightRecord};
use super::{ChartVariant, FailureFeedback, MetricKind, PayloadCheck};
use crate::render::{ChartConfig, ChartKind, TooltipFormat};
use crate::series::{date_label, ChartSeries, Dataset, SeriesColor};

const WEIGHT_COLOR: SeriesColor = SeriesColor::new("hsl(183, 44%, 41%)", "hsla(183, 44%, 41%, 0.2)");

#[derive(Debug, Clone, Copy, Default)]
pub struct Weight;

impl ChartVariant for Weight {
    type Record = WeightRecord;

    fn kind(&self) -> MetricKind {
        MetricKind::Weight
    }

    fn endpoint(&self) -> &'static str {
        "/weight/data"
    }

    fn canvas_id(&self) -> &'static str {
        "weightChart"
    }

    fn payload_check(&self) -> PayloadCheck {
        PayloadCheck::ErrorField
    }

    fn fetch_failure_feedback(&self) -> FailureFeedback {
        FailureFeedback::ShowMessage
    }

    fn to_series(&self, records: &[WeightRecord]) -> Result<ChartSeries, RecordError> {
        let labels = records.iter().map(|r| date_label(&r.date)).collect();
        let values = records.iter().map(|r| r.weight).collect();

        Ok(ChartSeries::new(labels).dataset(Dataset::new("Weight (kg)", WEIGHT_COLOR).values(values)))
    }

    fn chart_config(&self, series: ChartSeries) -> ChartConfig {
        ChartConfig::new(self.canvas_id(), ChartKind::Line, series)
            .tooltip(TooltipFormat::with_suffix(" kg"))
            .y_axis("Weight (kg)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_series() {
        let records = Weight
            .decode(vec![json!({"date": "2024-01-01T00:00:00", "weight": 70.5})])
            .unwrap();
        let series = Weight.to_series(&records).unwrap();

        assert_eq!(series.labels, vec!["2024-01-01 00:00:00"]);
        assert_eq!(series.datasets.len(), 1);
        assert_eq!(series.datasets[0].values, vec![Some(70.5)]);
    }

    #[test]
    fn test_empty_records_give_empty_series() {
        let series = Weight.to_series(&[]).unwrap();
        assert!(series.is_empty());
        assert!(series.is_aligned());
        assert_eq!(series.datasets.len(), 1);
    }

    #[test]
    fn test_tooltip_unit() {
        let config = Weight.chart_config(ChartSeries::default());
        assert_eq!(config.tooltip.format("Weight (kg)", Some(71.0)), "Weight (kg): 71 kg");
    }
}
