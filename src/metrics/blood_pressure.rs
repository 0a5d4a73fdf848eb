//! Blood pressure chart

use super::records::{BloodPressureRecord, RecordError};
use super::{ChartVariant, FailureFeedback, MetricKind, PayloadCheck};
use crate::render::{ChartConfig, ChartKind, TooltipFormat};
use crate::series::{date_label, ChartSeries, Dataset, SeriesColor};

const SYSTOLIC_COLOR: SeriesColor = SeriesColor::new("hsl(183, 47%, 49%)", "hsla(183, 47%, 49%, 0.2)");
const DIASTOLIC_COLOR: SeriesColor = SeriesColor::new("hsl(338, 71%, 68%)", "hsla(338, 71%, 68%, 0.2)");
const PULSE_COLOR: SeriesColor = SeriesColor::new("hsl(39, 84%, 48%)", "hsla(39, 84%, 48%, 0.2)");

/// Systolic, diastolic and pulse over time
#[derive(Debug, Clone, Copy, Default)]
pub struct BloodPressure;

impl ChartVariant for BloodPressure {
    type Record = BloodPressureRecord;

    fn kind(&self) -> MetricKind {
        MetricKind::BloodPressure
    }

    fn endpoint(&self) -> &'static str {
        "/blood_pressure/data"
    }

    fn canvas_id(&self) -> &'static str {
        "bloodPressureChart"
    }

    fn payload_check(&self) -> PayloadCheck {
        PayloadCheck::ErrorField
    }

    fn fetch_failure_feedback(&self) -> FailureFeedback {
        FailureFeedback::ShowMessage
    }

    fn to_series(&self, records: &[BloodPressureRecord]) -> Result<ChartSeries, RecordError> {
        let labels = records.iter().map(|r| date_label(&r.date)).collect();

        Ok(ChartSeries::new(labels)
            .dataset(
                Dataset::new("Systolic (mmHg)", SYSTOLIC_COLOR)
                    .values(records.iter().map(|r| r.systolic).collect()),
            )
            .dataset(
                Dataset::new("Diastolic (mmHg)", DIASTOLIC_COLOR)
                    .values(records.iter().map(|r| r.diastolic).collect()),
            )
            .dataset(
                Dataset::new("Pulse (bpm)", PULSE_COLOR)
                    .values(records.iter().map(|r| r.pulse).collect()),
            ))
    }

    fn chart_config(&self, series: ChartSeries) -> ChartConfig {
        ChartConfig::new(self.canvas_id(), ChartKind::Line, series)
            .tooltip(TooltipFormat::plain())
            .y_axis("Value")
    }
}
