//! The design philosophy underlying `qzkp` is pedagogical, yet physically rigorous.
//! Each module encapsulates a discrete piece of the quantum zero-knowledge exchange,
//! illustrating how a handful of single-qubit rules compose into a checkable proof.
//!
//! This crate aspires to bridge gaps between theoretical exposition and practical engineering,
//! serving both as a didactic resource and a foundation for future cryptographic research.
//! Single-qubit state engine.
//!
//! The protocol only ever visits the four BB84 states reachable from `|0⟩`
//! under Pauli-X, Pauli-Z and Hadamard:
//!
//! ```text
//! (0, Computational) = |0⟩      (0, Hadamard) = |+⟩
//! (1, Computational) = |1⟩      (1, Hadamard) = |−⟩
//! ```
//!
//! The value label is chosen so that `H` maps `|0⟩ ↔ |+⟩` and `|1⟩ ↔ |−⟩`
//! without touching the value.  `X` acts on `|+⟩`/`|−⟩` and `Z` acts on
//! `|0⟩`/`|1⟩` only through a global phase, which no measurement in this
//! protocol can observe, so those cases are identities here.  The reduction
//! is exact: it reproduces every outcome distribution the full state-vector
//! simulation would give on this subspace.

use crate::random::RandomBitSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding / measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Eigenbasis of Z: `|0⟩`, `|1⟩`.
    Computational,
    /// Eigenbasis of X: `|+⟩`, `|−⟩`.
    Hadamard,
}

impl Basis {
    /// Maps a basis-string bit to a basis (`1` selects Hadamard).
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Basis::Hadamard
        } else {
            Basis::Computational
        }
    }

    /// Inverse of [`Basis::from_bit`].
    pub fn as_bit(self) -> bool {
        matches!(self, Basis::Hadamard)
    }

    /// The conjugate basis.
    pub fn toggled(self) -> Self {
        match self {
            Basis::Computational => Basis::Hadamard,
            Basis::Hadamard => Basis::Computational,
        }
    }
}

/// Gates the engine can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Pauli-X (bit flip).
    X,
    /// Pauli-Z (phase flip).
    Z,
    /// Hadamard.
    H,
}

impl Gate {
    /// The Pauli that flips the value of a state encoded in `basis`:
    /// X for the computational basis, Z for the Hadamard basis.
    pub fn value_flip(basis: Basis) -> Self {
        match basis {
            Basis::Computational => Gate::X,
            Basis::Hadamard => Gate::Z,
        }
    }
}

/// One of the four BB84 states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QubitState {
    value: bool,
    basis: Basis,
}

impl QubitState {
    /// `|0⟩` or `|1⟩`.
    pub fn prepare(value: bool) -> Self {
        Self {
            value,
            basis: Basis::Computational,
        }
    }

    /// Builds a state directly from its label.
    pub fn new(value: bool, basis: Basis) -> Self {
        Self { value, basis }
    }

    /// Value label.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Basis the state is an eigenstate of.
    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Pauli-X: flips `|0⟩ ↔ |1⟩`, leaves `|±⟩` unchanged.
    pub fn apply_x(&mut self) {
        if self.basis == Basis::Computational {
            self.value = !self.value;
        }
    }

    /// Pauli-Z: flips `|+⟩ ↔ |−⟩`, leaves `|0⟩`, `|1⟩` unchanged.
    pub fn apply_z(&mut self) {
        if self.basis == Basis::Hadamard {
            self.value = !self.value;
        }
    }

    /// Hadamard: swaps the basis, keeps the value.
    pub fn apply_h(&mut self) {
        self.basis = self.basis.toggled();
    }

    /// Applies `gate`.
    pub fn apply(&mut self, gate: Gate) {
        match gate {
            Gate::X => self.apply_x(),
            Gate::Z => self.apply_z(),
            Gate::H => self.apply_h(),
        }
    }

    /// Projective single-shot measurement in `basis`.
    ///
    /// Deterministic when `basis` matches the state's eigenbasis; otherwise a
    /// fair coin from `rng`, independent of the value.  Consumes the state.
    pub fn measure<R>(self, basis: Basis, rng: &mut R) -> bool
    where
        R: RandomBitSource + ?Sized,
    {
        if basis == self.basis {
            self.value
        } else {
            rng.next_bit()
        }
    }

    /// Ket label: `0`, `1`, `+` or `-`.
    pub fn label(&self) -> &'static str {
        match (self.basis, self.value) {
            (Basis::Computational, false) => "0",
            (Basis::Computational, true) => "1",
            (Basis::Hadamard, false) => "+",
            (Basis::Hadamard, true) => "-",
        }
    }
}

impl fmt::Display for QubitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
