//! Result data types.

use rram_device::{DeviceParams, Excitation, TransientHistory};
use serde::{Deserialize, Serialize};

pub type RunId = String;

/// Everything needed to identify and re-run a stored transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    /// Test bench that produced the run (e.g. `butterfly-voltage`)
    pub bench: String,
    /// RFC 3339 creation time
    pub timestamp: String,
    pub excitation: Excitation,
    pub steps: usize,
    pub time_step_s: f64,
    pub seed: u64,
    pub params: DeviceParams,
    #[serde(default = "default_completed")]
    pub completed: bool,
    pub version: String,
}

fn default_completed() -> bool {
    true
}

/// One recorded step, as stored in `timeseries.jsonl`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub time_s: f64,
    pub vtb: f64,
    pub itb: f64,
    pub gap: f64,
    pub gamma: f64,
    pub gap_ddt: f64,
}

/// Flatten a column-oriented history into per-step records.
pub fn records_from_history(history: &TransientHistory) -> Vec<StepRecord> {
    (0..history.len())
        .map(|i| StepRecord {
            time_s: history.time[i],
            vtb: history.vtb[i],
            itb: history.itb[i],
            gap: history.gap[i],
            gamma: history.gamma[i],
            gap_ddt: history.gap_ddt[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rram_device::DeviceModel;

    #[test]
    fn records_follow_history_order() {
        let mut model = DeviceModel::new(DeviceParams::default(), None);
        let history = model
            .transient(&[0.0, 1e-9, 2e-9], &[0.0, 0.5, -0.5], Excitation::Voltage)
            .unwrap();
        let records = records_from_history(&history);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].time_s, 1e-9);
        assert_eq!(records[1].vtb, 0.5);
        assert_eq!(records[2].itb, history.itb[2]);
        assert_eq!(records[2].gap, history.gap[2]);
    }

    #[test]
    fn manifest_without_completed_flag_loads_as_complete() {
        let manifest = RunManifest {
            run_id: "abc".to_string(),
            bench: "program-pulse".to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            excitation: Excitation::Voltage,
            steps: 10,
            time_step_s: 1e-9,
            seed: 0,
            params: DeviceParams::default(),
            completed: true,
            version: "0.1.0".to_string(),
        };
        let mut value = serde_json::to_value(&manifest).unwrap();
        value.as_object_mut().unwrap().remove("completed");
        let back: RunManifest = serde_json::from_value(value).unwrap();
        assert_eq!(back, manifest);
    }
}
