//! Fair-coin sources.
//!
//! The engine only ever asks for independent fair bits and, for the noise
//! channels, a uniform draw in `[0, 1)`.  Any [`rand::RngCore`] qualifies;
//! [`QuantumCoin`] additionally derives its bits by measuring `|+⟩` through
//! the qubit engine itself.

use crate::qubit::{Basis, QubitState};
use rand::{Rng, RngCore};

/// Infinite, non-failing stream of independent fair bits.
pub trait RandomBitSource {
    /// Next fair bit.
    fn next_bit(&mut self) -> bool;

    /// Next uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Returns `true` with probability `p`.
    ///
    /// The endpoints short-circuit without consuming randomness, so a
    /// zero-probability channel leaves the stream untouched.
    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.next_unit() < p
        }
    }
}

impl<R: RngCore> RandomBitSource for R {
    fn next_bit(&mut self) -> bool {
        self.gen::<bool>()
    }

    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Bit source that prepares `|0⟩`, rotates it to `|+⟩` and measures it in
/// the computational basis.
///
/// The measurement is a conjugate-basis draw, so each bit is ultimately a
/// fair coin from the wrapped source; the detour through the engine mirrors
/// how secret strings are produced on real hardware.
#[derive(Debug, Clone)]
pub struct QuantumCoin<S> {
    inner: S,
}

impl<S: RandomBitSource> QuantumCoin<S> {
    /// Wraps `inner` as the measurement randomness.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RandomBitSource> RandomBitSource for QuantumCoin<S> {
    fn next_bit(&mut self) -> bool {
        let mut qubit = QubitState::prepare(false);
        qubit.apply_h();
        qubit.measure(Basis::Computational, &mut self.inner)
    }

    fn next_unit(&mut self) -> f64 {
        self.inner.next_unit()
    }
}
