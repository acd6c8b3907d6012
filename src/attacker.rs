//! Dishonest provers.
//!
//! [`AttackerProver::Interceptor`] models an eavesdropper who has learned
//! `w ⊕ θ` but neither string on its own.  Without `θ` she cannot pick the
//! right measurement basis, so she measures the challenged register in
//! random bases, folds the outcomes into an estimate of `θ ⊕ c`, and
//! re-encodes that estimate in fresh random bases.  Each wrong guess turns a
//! position into a fair coin, which is what the verifier's agreement score
//! picks up.
//!
//! [`AttackerProver::RandomGuess`] has no quantum capability at all and
//! simply answers with a random challenge approximation.

use crate::bits::BinaryString;
use crate::error::Result;
use crate::protocol::Phase;
use crate::prover::{ProofMessage, Prover, ProverContext};
use crate::register::QubitRegister;

/// A prover that does not hold the shared secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackerProver {
    /// Intercept-and-resend with a leaked `w ⊕ θ`.
    Interceptor {
        /// The leaked fragment `w ⊕ θ`.
        leaked: BinaryString,
    },
    /// Uniformly random answer.
    RandomGuess,
}

impl AttackerProver {
    /// Intercept-and-resend attacker holding `leaked = w ⊕ θ`.
    pub fn interceptor(leaked: BinaryString) -> Self {
        AttackerProver::Interceptor { leaked }
    }

    /// Attacker that guesses the challenge.
    pub fn random_guess() -> Self {
        AttackerProver::RandomGuess
    }

    fn intercept(
        leaked: &BinaryString,
        challenged: QubitRegister,
        ctx: &mut ProverContext<'_>,
    ) -> Result<ProofMessage> {
        let n = challenged.len();
        let guess_bases = BinaryString::random(n, &mut *ctx.rng);
        let measured = challenged.measure(&guess_bases, ctx.noise, &mut *ctx.rng)?;
        let estimate = leaked.xor(&measured)?;
        ctx.note(Phase::Blinded, "attacker bases", &guess_bases);
        ctx.note(Phase::Blinded, "attacker estimate", &estimate);

        let resend_bases = BinaryString::random(n, &mut *ctx.rng);
        let forged = QubitRegister::encode(&estimate, &resend_bases, ctx.noise, &mut *ctx.rng)?;
        ctx.note(Phase::Blinded, "resend bases", &resend_bases);
        Ok(ProofMessage::ProofState(forged))
    }
}

impl Prover for AttackerProver {
    fn name(&self) -> &'static str {
        match self {
            AttackerProver::Interceptor { .. } => "interceptor",
            AttackerProver::RandomGuess => "random-guess",
        }
    }

    fn respond(
        &self,
        challenged: QubitRegister,
        ctx: &mut ProverContext<'_>,
    ) -> Result<ProofMessage> {
        match self {
            AttackerProver::Interceptor { leaked } => Self::intercept(leaked, challenged, ctx),
            AttackerProver::RandomGuess => {
                let guess = BinaryString::random(challenged.len(), &mut *ctx.rng);
                Ok(ProofMessage::Approximation(guess))
            }
        }
    }
}
