//! Error type shared by the engine, the trial runner and the result sinks.

use crate::protocol::Phase;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, QzkpError>;

/// Every way a run can fail.
///
/// None of these are transient: they signal a configuration or programming
/// defect, so nothing in the crate retries.
#[derive(Error, Debug)]
pub enum QzkpError {
    /// Two index-aligned sequences disagree in length.
    #[error("length mismatch in {context}: expected {expected}, found {found}")]
    LengthMismatch {
        /// Operation that detected the mismatch.
        context: &'static str,
        /// Length the operation was set up for.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },

    /// A noise probability outside `[0, 1]`.
    #[error("invalid {channel} probability: {value}. Must be between 0.0 and 1.0")]
    InvalidProbability {
        /// Either `bit-flip` or `phase-flip`.
        channel: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Key length must be positive.
    #[error("invalid key length {0}: must be at least 1")]
    InvalidKeyLength(usize),

    /// Iteration count must be positive.
    #[error("invalid iteration count {0}: must be at least 1")]
    InvalidIterationCount(usize),

    /// A session operation was called in the wrong phase.
    #[error("session is in phase {found:?}, expected {expected:?}")]
    PhaseViolation {
        /// Phase the operation requires.
        expected: Phase,
        /// Phase the session was actually in.
        found: Phase,
    },

    /// A trial failed; the run was aborted at this iteration.
    #[error("trial {iteration} failed: {source}")]
    Trial {
        /// One-based trial index.
        iteration: usize,
        /// Underlying failure.
        #[source]
        source: Box<QzkpError>,
    },

    /// Malformed textual input (bit strings, rule names, decisions).
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem failure while writing results.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QzkpError {
    /// Tags this error with the trial it aborted.
    pub fn in_trial(self, iteration: usize) -> Self {
        QzkpError::Trial {
            iteration,
            source: Box::new(self),
        }
    }
}

/// Fails with [`QzkpError::LengthMismatch`] unless `found == expected`.
pub(crate) fn ensure_len(context: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(QzkpError::LengthMismatch {
            context,
            expected,
            found,
        });
    }
    Ok(())
}
