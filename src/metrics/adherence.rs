//! Medication adherence buckets
//!
//! Doses are tallied per calendar day. Days keep the order in which they
//! were first seen, so a backend sorted by time yields a sorted axis.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use super::records::{MedicationRecord, RecordError};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Taken and missed doses for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdherenceCounts {
    pub taken: u32,
    pub missed: u32,
}

impl AdherenceCounts {
    pub fn total(&self) -> u32 {
        self.taken + self.missed
    }
}

/// Day buckets in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdherenceTally {
    days: Vec<(NaiveDate, AdherenceCounts)>,
    index: HashMap<NaiveDate, usize>,
}

impl AdherenceTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold records into day buckets
    pub fn from_records(records: &[MedicationRecord]) -> Result<Self, RecordError> {
        let mut tally = Self::new();
        for record in records {
            tally.record(calendar_day(&record.date)?, record.is_taken());
        }
        Ok(tally)
    }

    /// Count one dose on `day`
    pub fn record(&mut self, day: NaiveDate, taken: bool) {
        let slot = match self.index.get(&day) {
            Some(&slot) => slot,
            None => {
                self.days.push((day, AdherenceCounts::default()));
                self.index.insert(day, self.days.len() - 1);
                self.days.len() - 1
            }
        };

        let counts = &mut self.days[slot].1;
        if taken {
            counts.taken += 1;
        } else {
            counts.missed += 1;
        }
    }

    pub fn get(&self, day: NaiveDate) -> Option<AdherenceCounts> {
        self.index.get(&day).map(|&slot| self.days[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, AdherenceCounts)> + '_ {
        self.days.iter().copied()
    }

    /// Number of distinct days
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Doses counted across all days
    pub fn total(&self) -> u32 {
        self.days.iter().map(|(_, c)| c.total()).sum()
    }
}

/// Calendar day of a backend timestamp, as written (no timezone shift).
///
/// Accepts RFC 3339, `YYYY-MM-DD[T| ]HH:MM[:SS[.f]]` and bare dates.
pub fn calendar_day(date: &str) -> Result<NaiveDate, RecordError> {
    let date = date.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Ok(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Ok(dt.date());
        }
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RecordError::InvalidDate(date.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dose(date: &str, status: &str) -> MedicationRecord {
        MedicationRecord {
            date: date.to_string(),
            medication: None,
            status: Some(status.to_string()),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_calendar_day_formats() {
        assert_eq!(calendar_day("2024-01-02T08:00:00").unwrap(), day("2024-01-02"));
        assert_eq!(calendar_day("2024-01-02 23:59:59").unwrap(), day("2024-01-02"));
        assert_eq!(calendar_day("2024-01-02 08:00").unwrap(), day("2024-01-02"));
        assert_eq!(calendar_day("2024-01-02T08:00:00.250").unwrap(), day("2024-01-02"));
        assert_eq!(calendar_day("2024-01-02").unwrap(), day("2024-01-02"));
        assert_eq!(
            calendar_day("2024-01-02T23:30:00-05:00").unwrap(),
            day("2024-01-02")
        );
    }

    #[test]
    fn test_calendar_day_rejects_garbage() {
        assert!(matches!(
            calendar_day("yesterday"),
            Err(RecordError::InvalidDate(_))
        ));
        assert!(calendar_day("").is_err());
    }

    #[test]
    fn test_tally_first_seen_order() {
        let records = vec![
            dose("2024-01-02 08:00:00", "Taken"),
            dose("2024-01-01 08:00:00", "Missed"),
            dose("2024-01-02 20:00:00", "Missed"),
            dose("2024-01-01 20:00:00", "Taken"),
            dose("2024-01-03 08:00:00", "Skipped"),
        ];

        let tally = AdherenceTally::from_records(&records).unwrap();
        let days: Vec<_> = tally.iter().map(|(d, _)| d).collect();
        assert_eq!(days, vec![day("2024-01-02"), day("2024-01-01"), day("2024-01-03")]);

        assert_eq!(
            tally.get(day("2024-01-02")),
            Some(AdherenceCounts { taken: 1, missed: 1 })
        );
        assert_eq!(
            tally.get(day("2024-01-03")),
            Some(AdherenceCounts { taken: 0, missed: 1 })
        );
        assert_eq!(tally.total(), records.len() as u32);
    }

    #[test]
    fn test_every_record_counted_once() {
        let records: Vec<_> = (0..50)
            .map(|i| {
                let status = if i % 3 == 0 { "Taken" } else { "Missed" };
                dose(&format!("2024-02-{:02}T10:00:00", i % 7 + 1), status)
            })
            .collect();

        let tally = AdherenceTally::from_records(&records).unwrap();
        assert_eq!(tally.total(), 50);
        assert_eq!(tally.len(), 7);

        for (d, _) in tally.iter() {
            let key = d.format("%Y-%m-%d").to_string();
            assert!(records.iter().any(|r| r.date.starts_with(&key)));
        }
    }

    #[test]
    fn test_bad_date_fails_whole_tally() {
        let records = vec![dose("2024-01-01", "Taken"), dose("not a date", "Taken")];
        assert!(AdherenceTally::from_records(&records).is_err());
    }
}
