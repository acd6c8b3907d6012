//! The design philosophy underlying `qzkp` is pedagogical, yet physically rigorous.
//! Each module encapsulates a discrete piece of the quantum zero-knowledge exchange,
//! illustrating how a handful of single-qubit rules compose into a checkable proof.
//!
//! This crate aspires to bridge gaps between theoretical exposition and practical engineering,
//! serving both as a didactic resource and a foundation for future cryptographic research.
//! Agreement distributions.
//!
//! Trial results are partitioned by [`Decision`] and folded into frequency
//! tables keyed by match count, so that the percentages `100 * m / n` are
//! exact keys rather than floating-point buckets.

use crate::trials::{Decision, TrialResult};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts of trials per agreement level for one partition.
///
/// Serializes as `{"key_length": n, "entries": [{"percentage", "count"}, ...]}`
/// in ascending percentage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    key_length: usize,
    counts: BTreeMap<usize, usize>,
}

impl FrequencyTable {
    fn insert(&mut self, result: &TrialResult) {
        self.key_length = result.key_length;
        *self.counts.entry(result.matches).or_insert(0) += 1;
    }

    /// `(agreement percentage, trial count)` pairs in ascending order.
    pub fn entries(&self) -> Vec<(f64, usize)> {
        self.counts
            .iter()
            .map(|(&matches, &count)| (100.0 * matches as f64 / self.key_length as f64, count))
            .collect()
    }

    /// Trials recorded with exactly `matches` agreeing positions.
    pub fn count_for(&self, matches: usize) -> usize {
        self.counts.get(&matches).copied().unwrap_or(0)
    }

    /// Total trials in the partition.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// True when no trial fell into the partition.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Serialize)]
struct FrequencyEntry {
    percentage: f64,
    count: usize,
}

impl Serialize for FrequencyTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries: Vec<FrequencyEntry> = self
            .entries()
            .into_iter()
            .map(|(percentage, count)| FrequencyEntry { percentage, count })
            .collect();
        let mut state = serializer.serialize_struct("FrequencyTable", 2)?;
        state.serialize_field("key_length", &self.key_length)?;
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

/// Descriptive statistics over agreement percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Number of trials.
    pub count: usize,
    /// Mean agreement.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Lowest agreement.
    pub min: f64,
    /// Highest agreement.
    pub max: f64,
}

impl Summary {
    /// Summarises `results`; all fields are zero for an empty slice.
    pub fn of<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a TrialResult>,
    {
        let values: Vec<f64> = results
            .into_iter()
            .map(TrialResult::agreement_percentage)
            .collect();
        if values.is_empty() {
            return Summary::default();
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Summary {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Raw results plus per-decision distributions.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate<'a> {
    /// Results in iteration order.
    pub raw: &'a [TrialResult],
    /// Distribution of honest trials.
    pub honest: FrequencyTable,
    /// Distribution of dishonest trials.
    pub dishonest: FrequencyTable,
    /// Summary of honest trials.
    pub honest_summary: Summary,
    /// Summary of dishonest trials.
    pub dishonest_summary: Summary,
    /// Summary across every trial.
    pub overall: Summary,
}

impl Aggregate<'_> {
    /// Table for `decision`.
    pub fn table(&self, decision: Decision) -> &FrequencyTable {
        match decision {
            Decision::Honest => &self.honest,
            Decision::Dishonest => &self.dishonest,
        }
    }

    /// Summary for `decision`.
    pub fn summary(&self, decision: Decision) -> &Summary {
        match decision {
            Decision::Honest => &self.honest_summary,
            Decision::Dishonest => &self.dishonest_summary,
        }
    }
}

/// Partitions `results` by decision and tabulates each partition.
pub fn aggregate(results: &[TrialResult]) -> Aggregate<'_> {
    let mut honest = FrequencyTable::default();
    let mut dishonest = FrequencyTable::default();
    for result in results {
        match result.decision {
            Decision::Honest => honest.insert(result),
            Decision::Dishonest => dishonest.insert(result),
        }
    }
    let by = |decision: Decision| {
        Summary::of(results.iter().filter(move |r| r.decision == decision))
    };
    Aggregate {
        raw: results,
        honest,
        dishonest,
        honest_summary: by(Decision::Honest),
        dishonest_summary: by(Decision::Dishonest),
        overall: Summary::of(results),
    }
}

/// Fraction of trials whose agreement percentage is at least `threshold`.
///
/// Returns `0.0` for an empty slice.
///
/// # Examples
///
/// ```
/// use qzkp::stats::acceptance_rate;
/// use qzkp::trials::{Decision, TrialResult};
///
/// let results = [
///     TrialResult { iteration: 1, matches: 4, key_length: 4, decision: Decision::Honest },
///     TrialResult { iteration: 2, matches: 2, key_length: 4, decision: Decision::Dishonest },
/// ];
/// assert_eq!(acceptance_rate(&results, 75.0), 0.5);
/// assert_eq!(acceptance_rate(&results, 50.0), 1.0);
/// ```
pub fn acceptance_rate(results: &[TrialResult], threshold: f64) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let accepted = results
        .iter()
        .filter(|r| r.agreement_percentage() >= threshold)
        .count();
    accepted as f64 / results.len() as f64
}
