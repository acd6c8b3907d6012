//! The design philosophy underlying `qzkp` is pedagogical, yet physically rigorous.
//! Each module encapsulates a discrete piece of the quantum zero-knowledge exchange,
//! illustrating how a handful of single-qubit rules compose into a checkable proof.
//!
//! This crate aspires to bridge gaps between theoretical exposition and practical engineering,
//! serving both as a didactic resource and a foundation for future cryptographic research.
//! Deterministic bit streams for reproducible trial runs.
//!
//! Every output chunk is derived from a keyed BLAKE2b-256 hash of the seed
//! and an invocation counter.  Per-trial streams are derived from the run
//! seed and the trial index under their own domain tag, so two trials never
//! share randomness and a run replays bit-for-bit whether its trials execute
//! sequentially or in parallel.

use blake2::digest::{consts::U32, Digest};
use rand::RngCore;

type Blake2b256 = blake2::Blake2b<U32>;

const STREAM_DOMAIN: &[u8] = b"QZKP_STREAM";
const TRIAL_DOMAIN: &[u8] = b"QZKP_TRIAL";
const SECRET_DOMAIN: &[u8] = b"QZKP_SECRET";

/// A deterministic stream generator derived from BLAKE2b-256.
#[derive(Debug, Clone)]
pub struct BitStream {
    seed: [u8; 32],
    counter: u64,
    buffer: [u8; 32],
    offset: usize,
}

impl BitStream {
    /// Creates a stream seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::from_seed_bytes(derive_seed(STREAM_DOMAIN, &[seed]))
    }

    /// Creates a stream from a raw 32-byte seed.
    pub fn from_seed_bytes(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: 0,
            buffer: [0u8; 32],
            offset: 32,
        }
    }

    /// Independent stream for the trial at zero-based `index` of the run
    /// seeded with `run_seed`.
    pub fn for_trial(run_seed: u64, index: usize) -> Self {
        Self::from_seed_bytes(derive_seed(TRIAL_DOMAIN, &[run_seed, index as u64]))
    }

    /// Stream reserved for drawing the run-wide shared secret.
    pub fn for_secret(run_seed: u64) -> Self {
        Self::from_seed_bytes(derive_seed(SECRET_DOMAIN, &[run_seed]))
    }

    fn refill(&mut self) {
        let mut hasher = Blake2b256::new();
        hasher.update(STREAM_DOMAIN);
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.buffer.copy_from_slice(&hasher.finalize());
        self.counter = self.counter.wrapping_add(1);
        self.offset = 0;
    }

    fn next_word(&mut self) -> u64 {
        if self.offset >= self.buffer.len() {
            self.refill();
        }
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&self.buffer[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_be_bytes(chunk)
    }
}

impl RngCore for BitStream {
    fn next_u32(&mut self) -> u32 {
        (self.next_word() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_word()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_word().to_be_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Hashes a domain tag and a list of words into a 32-byte seed.
fn derive_seed(domain: &[u8], words: &[u64]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update((domain.len() as u64).to_be_bytes());
    hasher.update(domain);
    hasher.update((words.len() as u64).to_be_bytes());
    for &word in words {
        hasher.update(word.to_be_bytes());
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hasher.finalize());
    seed
}

/// Draws a fresh run seed from operating-system entropy.
pub fn entropy_seed() -> u64 {
    rand::thread_rng().next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_is_deterministic() {
        let mut a = BitStream::new(42);
        let mut b = BitStream::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_trial_streams_are_independent() {
        let mut first = BitStream::for_trial(7, 0);
        let mut second = BitStream::for_trial(7, 1);
        let mut secret = BitStream::for_secret(7);
        let a = first.next_u64();
        assert_ne!(a, second.next_u64());
        assert_ne!(a, secret.next_u64());
    }

    #[test]
    fn test_fill_bytes_handles_partial_chunks() {
        let mut stream = BitStream::new(1);
        let mut reference = BitStream::new(1);
        let mut buf = [0u8; 11];
        stream.fill_bytes(&mut buf);
        let first = reference.next_u64().to_be_bytes();
        let second = reference.next_u64().to_be_bytes();
        assert_eq!(&buf[..8], &first);
        assert_eq!(&buf[8..], &second[..3]);
    }
}
