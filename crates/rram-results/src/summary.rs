//! Headline numbers for a stored or freshly computed run.

use serde::Serialize;

use crate::types::StepRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub time_range: (f64, f64),
    pub gap_range: (f64, f64),
    pub final_gap: f64,
    /// Largest terminal current magnitude (A)
    pub peak_current: f64,
    /// Largest terminal voltage magnitude (V)
    pub peak_voltage: f64,
}

/// `None` for an empty run.
pub fn summarize(records: &[StepRecord]) -> Option<RunSummary> {
    let first = records.first()?;
    let last = records.last()?;

    let mut gap_range = (first.gap, first.gap);
    let mut peak_current = 0.0_f64;
    let mut peak_voltage = 0.0_f64;
    for r in records {
        gap_range.0 = gap_range.0.min(r.gap);
        gap_range.1 = gap_range.1.max(r.gap);
        peak_current = peak_current.max(r.itb.abs());
        peak_voltage = peak_voltage.max(r.vtb.abs());
    }

    Some(RunSummary {
        steps: records.len(),
        time_range: (first.time_s, last.time_s),
        gap_range,
        final_gap: last.gap,
        peak_current,
        peak_voltage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time_s: f64, vtb: f64, itb: f64, gap: f64) -> StepRecord {
        StepRecord {
            time_s,
            vtb,
            itb,
            gap,
            gamma: 0.0,
            gap_ddt: 0.0,
        }
    }

    #[test]
    fn empty_run_has_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn tracks_extremes_by_magnitude() {
        let records = [
            record(0.0, 0.0, 0.0, 1.7e-9),
            record(1e-9, -1.2, -3e-3, 1.0e-9),
            record(2e-9, 0.8, 1e-3, 1.2e-9),
        ];
        let s = summarize(&records).unwrap();
        assert_eq!(s.steps, 3);
        assert_eq!(s.time_range, (0.0, 2e-9));
        assert_eq!(s.gap_range, (1.0e-9, 1.7e-9));
        assert_eq!(s.final_gap, 1.2e-9);
        assert_eq!(s.peak_current, 3e-3);
        assert_eq!(s.peak_voltage, 1.2);
    }
}
