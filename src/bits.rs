//! Fixed-length bit strings.
//!
//! Witness, basis, challenge and blinding strings are all [`BinaryString`]s.
//! Once drawn they are never mutated; index-aligned operations check lengths
//! and fail with [`QzkpError::LengthMismatch`] instead of truncating.

use crate::error::{ensure_len, QzkpError, Result};
use crate::random::RandomBitSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single classical bit.
pub type Bit = bool;

/// Immutable ordered sequence of bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryString {
    bits: Vec<Bit>,
}

impl BinaryString {
    /// Wraps an existing bit vector.
    pub fn new(bits: Vec<Bit>) -> Self {
        Self { bits }
    }

    /// Builds a string from `0`/`1` integers, treating any non-zero as `1`.
    pub fn from_u8s(values: &[u8]) -> Self {
        Self::new(values.iter().map(|&v| v != 0).collect())
    }

    /// Draws `len` independent fair bits from `rng`.
    pub fn random<R>(len: usize, rng: &mut R) -> Self
    where
        R: RandomBitSource + ?Sized,
    {
        Self::new((0..len).map(|_| rng.next_bit()).collect())
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for the empty string.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Bit> {
        self.bits.get(index).copied()
    }

    /// Bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn bit(&self, index: usize) -> Bit {
        self.bits[index]
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = Bit> + '_ {
        self.bits.iter().copied()
    }

    /// Borrows the underlying bits.
    pub fn as_slice(&self) -> &[Bit] {
        &self.bits
    }

    /// Number of ones.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Element-wise XOR.
    pub fn xor(&self, other: &BinaryString) -> Result<BinaryString> {
        ensure_len("xor", self.len(), other.len())?;
        Ok(Self::new(
            self.iter().zip(other.iter()).map(|(a, b)| a ^ b).collect(),
        ))
    }

    /// Counts positions where `self` and `other` agree.
    pub fn matches(&self, other: &BinaryString) -> Result<usize> {
        ensure_len("match count", self.len(), other.len())?;
        Ok(self
            .iter()
            .zip(other.iter())
            .filter(|(a, b)| a == b)
            .count())
    }
}

impl From<Vec<Bit>> for BinaryString {
    fn from(bits: Vec<Bit>) -> Self {
        Self::new(bits)
    }
}

impl FromIterator<Bit> for BinaryString {
    fn from_iter<I: IntoIterator<Item = Bit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for BinaryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BinaryString {
    type Err = QzkpError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(QzkpError::Parse(format!("invalid bit {other:?} in {s:?}"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(BinaryString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_and_matches() {
        let a: BinaryString = "1100".parse().unwrap();
        let b: BinaryString = "1010".parse().unwrap();
        assert_eq!(a.xor(&b).unwrap().to_string(), "0110");
        assert_eq!(a.matches(&b).unwrap(), 2);
    }

    #[test]
    fn test_accessors() {
        let bits = BinaryString::from_u8s(&[1, 0, 1, 1]);
        assert_eq!(bits.get(0), Some(true));
        assert_eq!(bits.get(1), Some(false));
        assert_eq!(bits.get(4), None);
        assert_eq!(bits.as_slice(), &[true, false, true, true]);
        assert_eq!(bits.count_ones(), 3);
        assert_eq!(BinaryString::new(Vec::new()).count_ones(), 0);
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let a = BinaryString::from_u8s(&[1, 0, 1, 0]);
        let b = BinaryString::from_u8s(&[1, 0, 1, 0, 1]);
        match a.xor(&b) {
            Err(QzkpError::LengthMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, 4);
                assert_eq!(found, 5);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_accepts_separators_and_rejects_garbage() {
        let parsed: BinaryString = "1, 0, 1".parse().unwrap();
        assert_eq!(parsed, BinaryString::from_u8s(&[1, 0, 1]));
        assert!("102".parse::<BinaryString>().is_err());
    }
}
