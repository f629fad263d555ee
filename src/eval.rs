//! Trace-driven evaluation of the combined LV/LS predictor.

use crate::error::*;
use crate::load::*;
use crate::predictor::*;
use crate::stats::*;

/// Configuration for building an [`Evaluator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Geometry shared by both tables
    pub table: TableConfig,

    /// Minimum confidence required to use a prediction
    pub confidence_threshold: u8,

    /// Confidence margin required for LS to win over an LV hit
    pub chooser_bias: u8,

    /// Name of the trace column holding the eligibility flag
    pub eligibility_field: String,
}
impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            confidence_threshold: 2,
            chooser_bias: 1,
            eligibility_field: "eligible".to_string(),
        }
    }
}
impl EvalConfig {
    /// Use this configuration to create a new [`Evaluator`].
    pub fn build(&self) -> Result<Evaluator, ConfigError> {
        let geometry = self.table.build()?;
        if self.confidence_threshold > 3 {
            log::warn!("confidence threshold {} is unreachable; no prediction will be used",
                self.confidence_threshold
            );
        }
        Ok(Evaluator {
            lv: LastValueTable::new(geometry),
            ls: LastStrideTable::new(geometry),
            chooser: Chooser::new(self.chooser_bias),
            threshold: self.confidence_threshold,
            counters: Counters::default(),
            per_pc: PerAddressStats::new(),
        })
    }
}

/// Container for output from [`Evaluator::step`], describing what happened
/// for a single load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// The prediction offered by the chooser (if any)
    pub choice: Option<Choice>,

    /// Whether the prediction would have been consumed
    pub used: bool,

    /// Whether a consumed prediction matched the loaded value
    pub correct: bool,
}

/// Results of an evaluation run.
#[derive(Clone, Debug)]
pub struct Report {
    pub summary: Summary,
    pub per_pc: PerAddressStats,
}

/// Drives load records through the predictors, one at a time.
pub struct Evaluator {
    lv: LastValueTable,
    ls: LastStrideTable,
    chooser: Chooser,
    threshold: u8,
    counters: Counters,
    per_pc: PerAddressStats,
}
impl Evaluator {
    pub fn lv_table(&self) -> &LastValueTable { &self.lv }
    pub fn ls_table(&self) -> &LastStrideTable { &self.ls }

    /// Counters accumulated so far.
    pub fn counters(&self) -> &Counters { &self.counters }

    /// Make predictions for a load without changing any state.
    pub fn probe(&self, pc: u64) -> Probe {
        Probe {
            lv: self.lv.lookup(pc),
            ls: self.ls.lookup(pc),
        }
    }

    /// Evaluate a single load.
    ///
    /// Both tables are searched before either of them sees the loaded
    /// value, and both are trained afterwards whether or not a prediction
    /// was made.
    pub fn step(&mut self, record: &LoadRecord) -> StepOutcome {
        let width = record.width;

        // Predict
        let probe = self.probe(record.pc);
        let choice = self.chooser.choose(
            probe.lv_candidate(width),
            probe.ls_candidate(width),
        );

        let mut used = false;
        let mut correct = false;
        if let Some(c) = choice {
            self.counters.preds += 1;
            if c.confidence >= self.threshold && record.eligible {
                used = true;
                correct = c.value == record.masked_value();
                self.counters.record_used(c.source, correct);
            }
        }

        // Train
        self.lv.train(record.pc, record.value, width, &probe.lv);
        self.ls.train(record.pc, record.value, width, &probe.ls);

        self.counters.total_loads += 1;
        if record.eligible {
            self.counters.eligible_loads += 1;
        }
        self.per_pc.update(record.pc, used, correct);

        StepOutcome { choice, used, correct }
    }

    /// Evaluate every record from some source.
    ///
    /// Malformed records are skipped (with a warning) and don't affect
    /// any statistics. Any other error ends the run.
    pub fn run<I>(&mut self, records: I) -> Result<(), TraceError>
        where I: IntoIterator<Item = Result<LoadRecord, TraceError>>
    {
        let mut skipped = 0usize;
        for record in records {
            match record {
                Ok(record) => { self.step(&record); },
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping record: {}", e);
                    skipped += 1;
                },
                Err(e) => return Err(e),
            }
        }
        if skipped != 0 {
            log::warn!("Skipped {} malformed records", skipped);
        }
        log::info!("Evaluated {} loads ({} eligible)",
            self.counters.total_loads, self.counters.eligible_loads
        );
        Ok(())
    }

    /// Finish the run and compute the derived statistics.
    pub fn finish(self) -> Report {
        Report {
            summary: Summary::from(self.counters),
            per_pc: self.per_pc,
        }
    }
}
