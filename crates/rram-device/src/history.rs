//! Per-step record of a transient run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::DeviceState;

/// External key names of the recorded quantities, in recording order.
pub const HISTORY_KEYS: [&str; 5] = ["gap_ddt", "gamma", "gap", "Itb", "Vtb"];

/// Column-oriented history, one entry per stimulus sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransientHistory {
    /// Stimulus time points, carried through for correlation (s)
    pub time: Vec<f64>,
    /// Deterministic gap rate (m/s)
    pub gap_ddt: Vec<f64>,
    pub gamma: Vec<f64>,
    /// Gap after the step (m)
    pub gap: Vec<f64>,
    /// Terminal current (A)
    pub itb: Vec<f64>,
    /// Terminal voltage (V)
    pub vtb: Vec<f64>,
    /// False when the run was stopped before the end of the stimulus.
    pub completed: bool,
}

impl TransientHistory {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            gap_ddt: Vec::with_capacity(n),
            gamma: Vec::with_capacity(n),
            gap: Vec::with_capacity(n),
            itb: Vec::with_capacity(n),
            vtb: Vec::with_capacity(n),
            completed: false,
        }
    }

    /// Append the state left by the step at time `t`.
    pub fn record(&mut self, t: f64, state: &DeviceState) {
        self.time.push(t);
        self.gap_ddt.push(state.gap_rate);
        self.gamma.push(state.gamma);
        self.gap.push(state.gap);
        self.itb.push(state.terminal_current);
        self.vtb.push(state.terminal_voltage);
    }

    pub fn len(&self) -> usize {
        self.gap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gap.is_empty()
    }

    /// Column by external key name.
    pub fn get(&self, key: &str) -> Option<&[f64]> {
        match key {
            "gap_ddt" => Some(&self.gap_ddt),
            "gamma" => Some(&self.gamma),
            "gap" => Some(&self.gap),
            "Itb" => Some(&self.itb),
            "Vtb" => Some(&self.vtb),
            _ => None,
        }
    }

    /// `(key, column)` pairs in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[f64])> + '_ {
        HISTORY_KEYS.into_iter().map(move |key| {
            let column = match key {
                "gap_ddt" => &self.gap_ddt,
                "gamma" => &self.gamma,
                "gap" => &self.gap,
                "Itb" => &self.itb,
                _ => &self.vtb,
            };
            (key, column.as_slice())
        })
    }

    /// Mapping from external key name to column.
    pub fn into_map(self) -> BTreeMap<&'static str, Vec<f64>> {
        BTreeMap::from([
            ("gap_ddt", self.gap_ddt),
            ("gamma", self.gamma),
            ("gap", self.gap),
            ("Itb", self.itb),
            ("Vtb", self.vtb),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceParams;

    fn sample() -> TransientHistory {
        let p = DeviceParams::default();
        let mut h = TransientHistory::with_capacity(2);
        let mut s = DeviceState::initial(&p);
        h.record(0.0, &s);
        s.terminal_voltage = 0.5;
        s.terminal_current = 1e-4;
        s.gap_rate = -1.0;
        s.gamma = 12.0;
        h.record(1e-9, &s);
        h
    }

    #[test]
    fn record_appends_every_column() {
        let h = sample();
        assert_eq!(h.len(), 2);
        assert_eq!(h.time, vec![0.0, 1e-9]);
        assert_eq!(h.get("Vtb").unwrap(), &[0.0, 0.5]);
        assert_eq!(h.get("Itb").unwrap(), &[0.0, 1e-4]);
        assert_eq!(h.get("gap_ddt").unwrap(), &[0.0, -1.0]);
        assert!(h.get("temperature").is_none());
    }

    #[test]
    fn map_has_exactly_the_external_keys() {
        let map = sample().into_map();
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["Itb", "Vtb", "gamma", "gap", "gap_ddt"]);
        assert!(map.values().all(|col| col.len() == 2));
    }

    #[test]
    fn iter_follows_recording_order() {
        let h = sample();
        let keys: Vec<_> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, HISTORY_KEYS.to_vec());
        let (_, gamma) = h.iter().nth(1).unwrap();
        assert_eq!(gamma, &[0.0, 12.0]);
    }
}
