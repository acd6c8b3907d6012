//! Provers and the honest response constructions.
//!
//! A prover receives the challenged register and answers with a
//! [`ProofMessage`].  Two honest constructions are available behind
//! [`ResponseRule`]:
//!
//! * [`ResponseRule::BlindedApproximation`]: the prover draws a blinding
//!   string `p`, flips the value of every qubit with `p[i] = 1` inside its
//!   secret basis, measures in `θ`, and sends
//!   `c'[i] = p[i] ⊕ (outcome[i] ≠ w[i])`.  With no noise the outcome is
//!   `w ⊕ c ⊕ p`, so `c' = c` exactly.
//! * [`ResponseRule::CombinedTransform`]: the prover applies Z where
//!   `θ[i] = 1`, H where `(w ⊕ θ)[i] = 1`, Z where `w[i] = 1`, and returns
//!   the register.  This rotates each qubit into basis `w` carrying value
//!   `θ ⊕ c`; the verifier measures in `w` and recovers `c = θ ⊕ outcome`.
//!
//! The two are not the same map on the register and should not be treated
//! as interchangeable when noise is present: they place a different number
//! of noisy gates on each index.

use crate::bits::BinaryString;
use crate::error::{ensure_len, QzkpError, Result};
use crate::noise::NoiseModel;
use crate::protocol::{challenge_gate, Phase, SharedSecret};
use crate::qubit::Gate;
use crate::random::RandomBitSource;
use crate::register::QubitRegister;
use crate::transcript::SessionTranscript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a prover sends back to the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofMessage {
    /// Challenge approximation `c'`, already reconstructed by the prover.
    Approximation(BinaryString),
    /// Register for the verifier to measure in basis `w`.
    ProofState(QubitRegister),
}

impl ProofMessage {
    /// Number of positions carried by the message.
    pub fn len(&self) -> usize {
        match self {
            ProofMessage::Approximation(bits) => bits.len(),
            ProofMessage::ProofState(register) => register.len(),
        }
    }

    /// True for an empty message.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Noise, randomness and transcript handed to a prover for one response.
pub struct ProverContext<'a> {
    /// Channel applied after every prover gate.
    pub noise: &'a NoiseModel,
    /// Prover-side randomness.
    pub rng: &'a mut dyn RandomBitSource,
    transcript: Option<&'a mut SessionTranscript>,
}

impl<'a> ProverContext<'a> {
    /// Bundles the per-response collaborators.
    pub fn new(
        noise: &'a NoiseModel,
        rng: &'a mut dyn RandomBitSource,
        transcript: Option<&'a mut SessionTranscript>,
    ) -> Self {
        Self {
            noise,
            rng,
            transcript,
        }
    }

    /// Records a prover-side value when the session is recording.
    pub fn note(&mut self, phase: Phase, label: &str, value: impl ToString) {
        if let Some(transcript) = self.transcript.as_deref_mut() {
            transcript.record(phase, label, value);
        }
    }
}

/// A party answering the verifier's challenge.
pub trait Prover {
    /// Short identifier used in logs and transcripts.
    fn name(&self) -> &'static str;

    /// Transforms the challenged register into a proof message.
    fn respond(&self, challenged: QubitRegister, ctx: &mut ProverContext<'_>)
        -> Result<ProofMessage>;
}

/// Honest response construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseRule {
    /// Blind, measure in `θ`, send the approximation `c'`.
    #[default]
    BlindedApproximation,
    /// Rotate into basis `w` and send the register back.
    CombinedTransform,
}

impl ResponseRule {
    /// Stable name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseRule::BlindedApproximation => "blinded",
            ResponseRule::CombinedTransform => "combined",
        }
    }
}

impl fmt::Display for ResponseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseRule {
    type Err = QzkpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blinded" | "blinded_approximation" => Ok(ResponseRule::BlindedApproximation),
            "combined" | "combined_transform" => Ok(ResponseRule::CombinedTransform),
            other => Err(QzkpError::Parse(format!(
                "unknown response rule {other:?} (expected blinded or combined)"
            ))),
        }
    }
}

/// Prover that holds the shared secret.
#[derive(Debug, Clone)]
pub struct HonestProver {
    secret: SharedSecret,
    rule: ResponseRule,
    fixed_blinding: Option<BinaryString>,
}

impl HonestProver {
    /// Honest prover answering with `rule`.
    pub fn new(secret: SharedSecret, rule: ResponseRule) -> Self {
        Self {
            secret,
            rule,
            fixed_blinding: None,
        }
    }

    /// Blinded-approximation prover with a predetermined blinding string,
    /// for scripted sessions.
    pub fn with_blinding(secret: SharedSecret, blinding: BinaryString) -> Self {
        Self {
            secret,
            rule: ResponseRule::BlindedApproximation,
            fixed_blinding: Some(blinding),
        }
    }

    /// Construction in use.
    pub fn rule(&self) -> ResponseRule {
        self.rule
    }

    fn check_secret_len(&self, register_len: usize) -> Result<()> {
        ensure_len("prover secret", register_len, self.secret.key_length())
    }

    fn blinded_approximation(
        &self,
        mut register: QubitRegister,
        ctx: &mut ProverContext<'_>,
    ) -> Result<ProofMessage> {
        self.check_secret_len(register.len())?;
        let witness = self.secret.witness();
        let basis = self.secret.basis();
        let blinding = match &self.fixed_blinding {
            Some(fixed) => fixed.clone(),
            None => BinaryString::random(register.len(), &mut *ctx.rng),
        };
        register.apply_where(
            &blinding,
            |i| challenge_gate(basis.bit(i)),
            ctx.noise,
            &mut *ctx.rng,
        )?;
        ctx.note(Phase::Blinded, "blinding", &blinding);
        ctx.note(Phase::Blinded, "register", &register);

        let outcomes = register.measure(basis, ctx.noise, &mut *ctx.rng)?;
        ctx.note(Phase::Measured, "prover measurement", &outcomes);

        let approximation = blinding
            .iter()
            .zip(outcomes.iter().zip(witness.iter()))
            .map(|(p, (outcome, w))| p ^ (outcome != w))
            .collect();
        Ok(ProofMessage::Approximation(approximation))
    }

    fn combined_transform(
        &self,
        mut register: QubitRegister,
        ctx: &mut ProverContext<'_>,
    ) -> Result<ProofMessage> {
        self.check_secret_len(register.len())?;
        let witness = self.secret.witness();
        let basis = self.secret.basis();
        let leak = self.secret.leak();
        register.apply_where(basis, |_| Gate::Z, ctx.noise, &mut *ctx.rng)?;
        register.apply_where(&leak, |_| Gate::H, ctx.noise, &mut *ctx.rng)?;
        register.apply_where(witness, |_| Gate::Z, ctx.noise, &mut *ctx.rng)?;
        Ok(ProofMessage::ProofState(register))
    }
}

impl Prover for HonestProver {
    fn name(&self) -> &'static str {
        match self.rule {
            ResponseRule::BlindedApproximation => "honest-blinded",
            ResponseRule::CombinedTransform => "honest-combined",
        }
    }

    fn respond(
        &self,
        challenged: QubitRegister,
        ctx: &mut ProverContext<'_>,
    ) -> Result<ProofMessage> {
        match self.rule {
            ResponseRule::BlindedApproximation => self.blinded_approximation(challenged, ctx),
            ResponseRule::CombinedTransform => self.combined_transform(challenged, ctx),
        }
    }
}
