//! Deterministic synthetic history generation.
//!
//! Produces the log set a user with a given adherence level would have
//! accumulated over a date range. Used by the stress harness and the CLI
//! `seed` command to exercise multi-year histories (tens of thousands of
//! logs) without hand-entering them. Identical seeds produce identical
//! histories, so stress results are reproducible.

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

use crate::habit::{Log, LogSource, Task};
use crate::schedule::Frequency;

/// Seeded generator of plausible habit histories.
pub struct HistoryGenerator {
    rng: Mcg128Xsl64,
}

impl HistoryGenerator {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { rng: Mcg128Xsl64::seed_from_u64(seed) }
    }

    /// Generate logs for `task` across `[from, to]`.
    ///
    /// `probability` is the per-due-date chance of a completion, clamped
    /// to [0, 1]. Fixed patterns roll once per due date; weekly quotas
    /// roll once per day with the probability scaled so a fully adherent
    /// user lands on the quota in expectation. About half of the
    /// generated logs carry a satisfaction rating.
    pub fn generate(
        &mut self,
        task: &Task,
        from: NaiveDate,
        to: NaiveDate,
        probability: f64,
    ) -> Vec<Log> {
        let probability = probability.clamp(0.0, 1.0);
        let start = from.max(task.created_on);
        let mut logs = Vec::new();
        for day in start.iter_days().take_while(|d| *d <= to) {
            let chance = match &task.frequency {
                Frequency::WeeklyTarget(target) => {
                    probability * (*target as f64 / 7.0).min(1.0)
                }
                fixed => {
                    if fixed.is_due(day) {
                        probability
                    } else {
                        0.0
                    }
                }
            };
            if chance > 0.0 && self.rng.gen_bool(chance) {
                let mut log = Log::new(task.id.clone(), day).with_source(LogSource::Synthetic);
                if self.rng.gen_bool(0.5) {
                    log = log.with_rating(self.rng.gen_range(1..=5));
                }
                logs.push(log);
            }
        }
        logs
    }
}
