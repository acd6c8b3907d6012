//! Phase-by-phase record of a single protocol session.
//!
//! A [`SessionTranscript`] captures the register snapshot and the classical
//! strings visible at each phase transition.  It renders to plain lines for
//! the `trace` command and hashes to a domain-separated BLAKE2b-256 digest,
//! which makes seeded sessions easy to compare across runs.

use crate::protocol::Phase;
use blake2::digest::{consts::U32, Digest};
use serde::Serialize;

type Blake2b256 = blake2::Blake2b<U32>;

const TRANSCRIPT_DOMAIN: &[u8] = b"QZKP_TRANSCRIPT";

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// Phase the session entered.
    pub phase: Phase,
    /// What was recorded, e.g. `challenge` or `register`.
    pub label: String,
    /// Rendered value (bit string or register labels).
    pub value: String,
}

/// Ordered session record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionTranscript {
    entries: Vec<TranscriptEntry>,
}

impl SessionTranscript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&mut self, phase: Phase, label: &str, value: impl ToString) {
        self.entries.push(TranscriptEntry {
            phase,
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    /// Entries in recording order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// First value recorded under `label`, if any.
    pub fn find(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.value.as_str())
    }

    /// Human-readable lines, one per entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("[{:?}] {}: {}", entry.phase, entry.label, entry.value))
            .collect()
    }

    /// Hex-encoded BLAKE2b-256 digest over every entry.
    pub fn digest(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(TRANSCRIPT_DOMAIN);
        hasher.update((self.entries.len() as u64).to_be_bytes());
        for line in self.lines() {
            hasher.update((line.len() as u64).to_be_bytes());
            hasher.update(line.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_lookup() {
        let mut transcript = SessionTranscript::new();
        transcript.record(Phase::Prepared, "register", "0 +");
        transcript.record(Phase::Challenged, "challenge", "10");
        assert_eq!(
            transcript.lines(),
            vec!["[Prepared] register: 0 +", "[Challenged] challenge: 10"]
        );
        assert_eq!(transcript.find("challenge"), Some("10"));
        assert_eq!(transcript.find("missing"), None);
    }

    #[test]
    fn test_digest_tracks_content() {
        let mut a = SessionTranscript::new();
        a.record(Phase::Prepared, "register", "0 1");
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        b.record(Phase::Verified, "agreement", "100");
        assert_ne!(a.digest(), b.digest());
    }
}
