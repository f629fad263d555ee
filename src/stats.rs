//! Helpers for collecting statistics.

use std::cmp::Reverse;
use std::collections::*;
use bitvec::prelude::*;
use itertools::*;
use serde::Serialize;

use crate::predictor::Source;

/// Returns `num / den`, or zero when `den` is zero.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Running counters accumulated while evaluating a trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Number of loads evaluated
    pub total_loads: u64,

    /// Number of loads allowed to consume a prediction
    pub eligible_loads: u64,

    /// Number of loads where some table offered a prediction
    pub preds: u64,

    /// Number of predictions passing the confidence/eligibility gate.
    /// NOTE: This is incremented under the same condition as `used`.
    pub confident: u64,

    /// Number of predictions that would have been consumed
    pub used: u64,

    /// Number of consumed predictions that were correct
    pub correct: u64,

    pub used_lv: u64,
    pub correct_lv: u64,
    pub used_ls: u64,
    pub correct_ls: u64,
}
impl Counters {
    /// Record a prediction that was used.
    pub fn record_used(&mut self, source: Source, correct: bool) {
        self.confident += 1;
        self.used += 1;
        if correct { self.correct += 1; }
        match source {
            Source::LastValue => {
                self.used_lv += 1;
                if correct { self.correct_lv += 1; }
            },
            Source::LastStride => {
                self.used_ls += 1;
                if correct { self.correct_ls += 1; }
            },
        }
    }
}

/// Final results of an evaluation, including derived ratios.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_loads: u64,
    pub eligible_loads: u64,
    pub preds: u64,
    pub confident: u64,
    pub used: u64,
    pub correct: u64,

    /// Fraction of used predictions that were correct
    pub accuracy: f64,

    /// Fraction of all loads that used a prediction
    pub coverage_overall: f64,

    /// Fraction of eligible loads that used a prediction
    pub coverage_eligible: f64,

    /// Fraction of all loads that used a correct prediction
    pub effective: f64,

    pub used_lv: u64,
    pub correct_lv: u64,
    pub used_ls: u64,
    pub correct_ls: u64,
    pub accuracy_lv: f64,
    pub accuracy_ls: f64,
}
impl From<Counters> for Summary {
    fn from(c: Counters) -> Self {
        Self {
            total_loads: c.total_loads,
            eligible_loads: c.eligible_loads,
            preds: c.preds,
            confident: c.confident,
            used: c.used,
            correct: c.correct,
            accuracy: ratio(c.correct, c.used),
            coverage_overall: ratio(c.used, c.total_loads),
            coverage_eligible: ratio(c.used, c.eligible_loads),
            effective: ratio(c.correct, c.total_loads),
            used_lv: c.used_lv,
            correct_lv: c.correct_lv,
            used_ls: c.used_ls,
            correct_ls: c.correct_ls,
            accuracy_lv: ratio(c.correct_lv, c.used_lv),
            accuracy_ls: ratio(c.correct_ls, c.used_ls),
        }
    }
}

/// Container for per-load statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressData {
    /// Order in which this load was first observed
    pub first_seen: usize,

    /// Number of times this load was executed
    pub total: u64,

    /// Number of times a prediction was used
    pub used: u64,

    /// Number of used predictions that were correct
    pub correct: u64,

    /// Outcome of each used prediction (set when correct)
    pub pat: BitVec,
}
impl AddressData {
    pub fn new(first_seen: usize) -> Self {
        Self {
            first_seen,
            total: 0,
            used: 0,
            correct: 0,
            pat: BitVec::new(),
        }
    }

    /// Return the accuracy of used predictions for this load.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.used)
    }

    /// Render the most recent `n` used-prediction outcomes, oldest first.
    pub fn recent_pattern(&self, n: usize) -> String {
        let start = self.pat.len().saturating_sub(n);
        self.pat[start..].iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .collect()
    }
}

/// Per-load statistics (indexed by program counter value).
#[derive(Clone, Debug, Default)]
pub struct PerAddressStats {
    pub data: BTreeMap<u64, AddressData>,
}
impl PerAddressStats {
    pub fn new() -> Self { Self::default() }

    /// Returns a reference to data collected for a particular load.
    pub fn get(&self, pc: u64) -> Option<&AddressData> {
        self.data.get(&pc)
    }

    /// Returns a mutable reference to data collected for a particular load.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, pc: u64) -> &mut AddressData {
        let next = self.data.len();
        self.data.entry(pc).or_insert_with(|| AddressData::new(next))
    }

    /// Record one execution of a load.
    pub fn update(&mut self, pc: u64, used: bool, correct: bool) {
        let data = self.get_mut(pc);
        data.total += 1;
        if used {
            data.used += 1;
            data.pat.push(correct);
            if correct { data.correct += 1; }
        }
    }

    /// Returns the number of unique observed loads.
    pub fn num_unique_loads(&self) -> usize { self.data.len() }

    /// Returns the `n` loads with the most used predictions. Ties are
    /// broken by the order in which loads were first observed.
    pub fn top_by_used(&self, n: usize) -> Vec<(u64, &AddressData)> {
        self.data.iter()
            .sorted_by_key(|(_, d)| (Reverse(d.used), d.first_seen))
            .take(n)
            .map(|(pc, d)| (*pc, d))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ratios_with_no_loads() {
        let s = Summary::from(Counters::default());
        assert_eq!(s.accuracy, 0.0);
        assert_eq!(s.coverage_overall, 0.0);
        assert_eq!(s.coverage_eligible, 0.0);
        assert_eq!(s.effective, 0.0);
        assert_eq!(s.accuracy_lv, 0.0);
        assert_eq!(s.accuracy_ls, 0.0);
    }

    #[test]
    fn ratios() {
        let mut c = Counters {
            total_loads: 10,
            eligible_loads: 8,
            preds: 6,
            ..Default::default()
        };
        c.record_used(Source::LastValue, true);
        c.record_used(Source::LastValue, false);
        c.record_used(Source::LastStride, true);
        c.record_used(Source::LastStride, true);
        assert_eq!(c.confident, c.used);

        let s = Summary::from(c);
        assert_eq!(s.used, 4);
        assert_eq!(s.correct, 3);
        assert_eq!(s.accuracy, 0.75);
        assert_eq!(s.coverage_overall, 0.4);
        assert_eq!(s.coverage_eligible, 0.5);
        assert_eq!(s.effective, 0.3);
        assert_eq!(s.accuracy_lv, 0.5);
        assert_eq!(s.accuracy_ls, 1.0);
    }

    #[test]
    fn summary_json_keys() {
        let s = Summary::from(Counters::default());
        let v = serde_json::to_value(s).unwrap();
        for key in ["total_loads", "eligible_loads", "preds", "confident",
            "used", "correct", "accuracy", "coverage_overall",
            "coverage_eligible", "effective", "used_lv", "correct_lv",
            "used_ls", "correct_ls", "accuracy_lv", "accuracy_ls"]
        {
            assert!(v.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn per_address_updates() {
        let mut s = PerAddressStats::new();
        s.update(0x10, false, false);
        s.update(0x10, true, true);
        s.update(0x10, true, false);
        let d = s.get(0x10).unwrap();
        assert_eq!((d.total, d.used, d.correct), (3, 2, 1));
        assert_eq!(d.recent_pattern(8), "10");
        assert_eq!(d.accuracy(), 0.5);
        assert!(s.get(0x20).is_none());
    }

    #[test]
    fn top_by_used_is_stable() {
        let mut s = PerAddressStats::new();
        // First-seen order: 0x30, 0x10, 0x20
        s.update(0x30, true, true);
        s.update(0x10, true, true);
        s.update(0x20, true, true);
        s.update(0x20, true, true);

        let top: Vec<u64> = s.top_by_used(3).iter().map(|(pc, _)| *pc).collect();
        assert_eq!(top, vec![0x20, 0x30, 0x10]);
        assert_eq!(s.top_by_used(1).len(), 1);
        assert_eq!(s.num_unique_loads(), 3);
    }
}
