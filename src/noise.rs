//! Independent bit-flip / phase-flip channel.
//!
//! A noise event is one bit-flip draw followed by one phase-flip draw, both
//! independent of each other, of other qubits and of earlier events.  The
//! protocol layers call [`NoiseModel::after_gate`] wherever a physical gate
//! or channel use would sit.

use crate::error::{QzkpError, Result};
use crate::qubit::QubitState;
use crate::random::RandomBitSource;
use serde::{Deserialize, Serialize};

/// Error probabilities for one run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    /// Probability of an X error after each gate.
    pub p_bit_flip: f64,
    /// Probability of a Z error after each gate.
    pub p_phase_flip: f64,
}

impl NoiseParameters {
    /// Noiseless channel.
    pub const NONE: NoiseParameters = NoiseParameters {
        p_bit_flip: 0.0,
        p_phase_flip: 0.0,
    };

    /// Validated constructor.
    pub fn new(p_bit_flip: f64, p_phase_flip: f64) -> Result<Self> {
        let params = Self {
            p_bit_flip,
            p_phase_flip,
        };
        params.validate()?;
        Ok(params)
    }

    /// Fails with [`QzkpError::InvalidProbability`] unless both values lie
    /// in `[0, 1]`.  NaN is rejected.
    pub fn validate(&self) -> Result<()> {
        check_probability("bit-flip", self.p_bit_flip)?;
        check_probability("phase-flip", self.p_phase_flip)
    }

    /// True when both channels are off.
    pub fn is_noiseless(&self) -> bool {
        self.p_bit_flip == 0.0 && self.p_phase_flip == 0.0
    }
}

fn check_probability(channel: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(QzkpError::InvalidProbability { channel, value })
    }
}

/// Applies X with probability `p_bit_flip`.
pub fn maybe_bit_flip<R>(state: &mut QubitState, p_bit_flip: f64, rng: &mut R)
where
    R: RandomBitSource + ?Sized,
{
    if rng.chance(p_bit_flip) {
        state.apply_x();
    }
}

/// Applies Z with probability `p_phase_flip`.
pub fn maybe_phase_flip<R>(state: &mut QubitState, p_phase_flip: f64, rng: &mut R)
where
    R: RandomBitSource + ?Sized,
{
    if rng.chance(p_phase_flip) {
        state.apply_z();
    }
}

/// Noise channel bound to validated parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseModel {
    params: NoiseParameters,
}

impl NoiseModel {
    /// Wraps validated parameters.
    pub fn new(params: NoiseParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The no-op model.
    pub fn noiseless() -> Self {
        Self {
            params: NoiseParameters::NONE,
        }
    }

    /// Underlying probabilities.
    pub fn params(&self) -> NoiseParameters {
        self.params
    }

    /// One noise event: a possible bit flip, then a possible phase flip.
    pub fn after_gate<R>(&self, state: &mut QubitState, rng: &mut R)
    where
        R: RandomBitSource + ?Sized,
    {
        maybe_bit_flip(state, self.params.p_bit_flip, rng);
        maybe_phase_flip(state, self.params.p_phase_flip, rng);
    }
}
