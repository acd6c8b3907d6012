//! Index-aligned registers of independent qubits.
//!
//! Every register operation takes the noise model and randomness explicitly
//! and follows each conditional gate with one noise event.

use crate::bits::BinaryString;
use crate::error::{ensure_len, Result};
use crate::noise::NoiseModel;
use crate::qubit::{Basis, Gate, QubitState};
use crate::random::RandomBitSource;
use serde::Serialize;
use std::fmt;

/// One qubit per secret bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QubitRegister {
    qubits: Vec<QubitState>,
}

impl QubitRegister {
    /// Wraps explicit states.
    pub fn from_states(qubits: Vec<QubitState>) -> Self {
        Self { qubits }
    }

    /// Encodes `values[i]` in basis `bases[i]`: X when the value bit is set,
    /// then H when the basis bit is set, each followed by noise.
    pub fn encode<R>(
        values: &BinaryString,
        bases: &BinaryString,
        noise: &NoiseModel,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: RandomBitSource + ?Sized,
    {
        ensure_len("register encoding", values.len(), bases.len())?;
        let mut qubits = Vec::with_capacity(values.len());
        for (value, basis) in values.iter().zip(bases.iter()) {
            let mut qubit = QubitState::prepare(false);
            if value {
                qubit.apply_x();
                noise.after_gate(&mut qubit, rng);
            }
            if basis {
                qubit.apply_h();
                noise.after_gate(&mut qubit, rng);
            }
            qubits.push(qubit);
        }
        Ok(Self { qubits })
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// True when the register holds no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Current states, in index order.
    pub fn states(&self) -> &[QubitState] {
        &self.qubits
    }

    /// Applies `gate` to qubit `index`, then one noise event.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn apply_gate<R>(&mut self, index: usize, gate: Gate, noise: &NoiseModel, rng: &mut R)
    where
        R: RandomBitSource + ?Sized,
    {
        let qubit = &mut self.qubits[index];
        qubit.apply(gate);
        noise.after_gate(qubit, rng);
    }

    /// For each index whose `mask` bit is set, applies `gate_for(index)`
    /// followed by noise.
    pub fn apply_where<R, F>(
        &mut self,
        mask: &BinaryString,
        gate_for: F,
        noise: &NoiseModel,
        rng: &mut R,
    ) -> Result<()>
    where
        R: RandomBitSource + ?Sized,
        F: Fn(usize) -> Gate,
    {
        ensure_len("masked gate", self.len(), mask.len())?;
        for (index, selected) in mask.iter().enumerate() {
            if selected {
                self.apply_gate(index, gate_for(index), noise, rng);
            }
        }
        Ok(())
    }

    /// Measures qubit `i` in basis `bases[i]`, consuming the register.
    ///
    /// A Hadamard-basis measurement is an H, one noise event, then a
    /// computational-basis readout; this is where the pre-measurement
    /// gate error lands.
    pub fn measure<R>(
        self,
        bases: &BinaryString,
        noise: &NoiseModel,
        rng: &mut R,
    ) -> Result<BinaryString>
    where
        R: RandomBitSource + ?Sized,
    {
        ensure_len("measurement", self.len(), bases.len())?;
        let mut outcomes = Vec::with_capacity(self.len());
        for (mut qubit, rotate) in self.qubits.into_iter().zip(bases.iter()) {
            if rotate {
                qubit.apply_h();
                noise.after_gate(&mut qubit, rng);
            }
            outcomes.push(qubit.measure(Basis::Computational, rng));
        }
        Ok(BinaryString::new(outcomes))
    }
}

impl fmt::Display for QubitRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, qubit) in self.qubits.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(qubit.label())?;
        }
        Ok(())
    }
}
