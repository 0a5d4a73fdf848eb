//! Medication adherence chart

use super::adherence::AdherenceTally;
use super::records::{MedicationRecord, RecordError};
use super::{ChartVariant, FailureFeedback, MetricKind, PayloadCheck};
use crate::render::{ChartConfig, ChartKind, TooltipFormat};
use crate::series::{ChartSeries, Dataset, SeriesColor};

const TAKEN_COLOR: SeriesColor = SeriesColor::solid("hsl(120, 100%, 25%)");
const MISSED_COLOR: SeriesColor = SeriesColor::solid("hsl(0, 100%, 50%)");

/// Taken vs missed doses per day
#[derive(Debug, Clone, Copy, Default)]
pub struct Medications;

impl ChartVariant for Medications {
    type Record = MedicationRecord;

    fn kind(&self) -> MetricKind {
        MetricKind::Medications
    }

    fn endpoint(&self) -> &'static str {
        "/medications/data"
    }

    fn canvas_id(&self) -> &'static str {
        "medicationsChart"
    }

    fn payload_check(&self) -> PayloadCheck {
        PayloadCheck::NonEmptyArray
    }

    fn fetch_failure_feedback(&self) -> FailureFeedback {
        FailureFeedback::LogOnly
    }

    fn to_series(&self, records: &[MedicationRecord]) -> Result<ChartSeries, RecordError> {
        let tally = AdherenceTally::from_records(records)?;

        let labels = tally
            .iter()
            .map(|(day, _)| day.format("%Y-%m-%d").to_string())
            .collect();
        let taken = tally.iter().map(|(_, c)| Some(f64::from(c.taken))).collect();
        let missed = tally.iter().map(|(_, c)| Some(f64::from(c.missed))).collect();

        Ok(ChartSeries::new(labels)
            .dataset(Dataset::new("Taken", TAKEN_COLOR).values(taken))
            .dataset(Dataset::new("Missed", MISSED_COLOR).values(missed)))
    }

    fn chart_config(&self, series: ChartSeries) -> ChartConfig {
        ChartConfig::new(self.canvas_id(), ChartKind::Bar, series)
            .tooltip(TooltipFormat::plain())
            .y_axis("Number of Medications")
            .begin_at_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_daily_counts() {
        let records = Medications
            .decode(vec![
                json!({"date": "2024-01-01 08:00:00", "medication": "A", "status": "Taken"}),
                json!({"date": "2024-01-01 20:00:00", "medication": "A", "status": "Missed"}),
                json!({"date": "2024-01-02 08:00:00", "medication": "A", "status": "Taken"}),
                json!({"date": "2024-01-02 08:00:00", "medication": "B", "status": "Taken"}),
            ])
            .unwrap();

        let series = Medications.to_series(&records).unwrap();
        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.get("Taken").unwrap().values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(series.get("Missed").unwrap().values, vec![Some(1.0), Some(0.0)]);

        let total: f64 = series
            .datasets
            .iter()
            .flat_map(|d| d.values.iter().flatten())
            .sum();
        assert_eq!(total, records.len() as f64);
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let records = Medications
            .decode(vec![json!({"date": "soon", "status": "Taken"})])
            .unwrap();
        assert!(matches!(
            Medications.to_series(&records),
            Err(RecordError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_bar_chart_from_zero() {
        let config = Medications.chart_config(ChartSeries::default());
        assert_eq!(config.kind, ChartKind::Bar);
        assert!(config.begin_at_zero);
        assert_eq!(config.y_axis_title, "Number of Medications");
    }
}
