//! The design philosophy underlying `qzkp` is pedagogical, yet physically rigorous.
//! Each module encapsulates a discrete piece of the quantum zero-knowledge exchange,
//! illustrating how a handful of single-qubit rules compose into a checkable proof.
//!
//! This crate aspires to bridge gaps between theoretical exposition and practical engineering,
//! serving both as a didactic resource and a foundation for future cryptographic research.
//! Challenge-response session state machine.
//!
//! A [`ProtocolSession`] walks one register of `n` qubits through
//!
//! ```text
//! Init → Prepared → Challenged → Blinded → Measured → Verified
//! ```
//!
//! 1. **Prepared**: the initiator encodes witness bit `w[i]` in basis `θ[i]`.
//! 2. **Challenged**: the verifier draws `c` and, wherever `c[i] = 1`, flips
//!    the encoded value inside its own eigenbasis (X when `θ[i] = 0`, Z when
//!    `θ[i] = 1`).
//! 3. **Blinded**: the prover transforms the register and answers with a
//!    [`ProofMessage`].
//! 4. **Measured**: either the prover already measured (and sent `c'`), or
//!    the verifier measures the returned register in basis `w` and sets
//!    `c' = θ ⊕ outcomes`.
//! 5. **Verified**: the verifier counts positions where `c'` agrees with `c`.
//!
//! The engine reports the raw agreement only; acceptance thresholds belong to
//! the analysis layer (see [`crate::stats::acceptance_rate`]).

use crate::bits::BinaryString;
use crate::error::{ensure_len, QzkpError, Result};
use crate::noise::NoiseModel;
use crate::prover::{ProofMessage, Prover, ProverContext};
use crate::qubit::{Basis, Gate};
use crate::random::RandomBitSource;
use crate::register::QubitRegister;
use crate::transcript::SessionTranscript;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Session phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Secret held, nothing encoded yet.
    Init,
    /// Register encodes the secret.
    Prepared,
    /// Challenge applied.
    Challenged,
    /// Prover answered.
    Blinded,
    /// Challenge approximation available.
    Measured,
    /// Agreement computed; terminal.
    Verified,
}

/// Witness and basis strings shared by initiator and honest prover.
///
/// How the two parties came to share them (for example over QKD) is outside
/// the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSecret {
    witness: BinaryString,
    basis: BinaryString,
}

impl SharedSecret {
    /// Validates that both strings are non-empty and equally long.
    pub fn new(witness: BinaryString, basis: BinaryString) -> Result<Self> {
        if witness.is_empty() {
            return Err(QzkpError::InvalidKeyLength(0));
        }
        ensure_len("shared secret", witness.len(), basis.len())?;
        Ok(Self { witness, basis })
    }

    /// Draws both strings from `rng`.
    pub fn random<R>(key_length: usize, rng: &mut R) -> Result<Self>
    where
        R: RandomBitSource + ?Sized,
    {
        if key_length == 0 {
            return Err(QzkpError::InvalidKeyLength(0));
        }
        let basis = BinaryString::random(key_length, rng);
        let witness = BinaryString::random(key_length, rng);
        Self::new(witness, basis)
    }

    /// Witness bits `w`.
    pub fn witness(&self) -> &BinaryString {
        &self.witness
    }

    /// Basis bits `θ`.
    pub fn basis(&self) -> &BinaryString {
        &self.basis
    }

    /// Key length `n`.
    pub fn key_length(&self) -> usize {
        self.witness.len()
    }

    /// `w ⊕ θ`, the fragment an eavesdropper is assumed to hold.
    pub fn leak(&self) -> BinaryString {
        self.witness
            .iter()
            .zip(self.basis.iter())
            .map(|(w, b)| w ^ b)
            .collect()
    }
}

/// Gate the verifier applies at a challenged index: the value flip of the
/// qubit's encoding basis.
pub fn challenge_gate(basis_bit: bool) -> Gate {
    Gate::value_flip(Basis::from_bit(basis_bit))
}

/// Result of a verified session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    /// Challenge `c` drawn by the verifier.
    pub challenge: BinaryString,
    /// Reconstructed challenge `c'`.
    pub recovered: BinaryString,
    /// Positions where `c'[i] == c[i]`.
    pub matches: usize,
}

impl SessionOutcome {
    /// Key length of the session.
    pub fn key_length(&self) -> usize {
        self.challenge.len()
    }

    /// `100 * matches / n`.
    pub fn agreement_percentage(&self) -> f64 {
        100.0 * self.matches as f64 / self.key_length() as f64
    }
}

/// One run of the challenge-response exchange.
#[derive(Debug)]
pub struct ProtocolSession {
    secret: SharedSecret,
    noise: NoiseModel,
    phase: Phase,
    register: Option<QubitRegister>,
    challenge: Option<BinaryString>,
    message: Option<ProofMessage>,
    transcript: Option<SessionTranscript>,
}

impl ProtocolSession {
    /// Opens a session over explicit witness and basis strings.
    pub fn new(witness: BinaryString, basis: BinaryString, noise: NoiseModel) -> Result<Self> {
        Ok(Self::with_secret(SharedSecret::new(witness, basis)?, noise))
    }

    /// Opens a session over an already validated secret.
    pub fn with_secret(secret: SharedSecret, noise: NoiseModel) -> Self {
        Self {
            secret,
            noise,
            phase: Phase::Init,
            register: None,
            challenge: None,
            message: None,
            transcript: None,
        }
    }

    /// Enables phase-by-phase recording.
    pub fn recording(mut self) -> Self {
        self.transcript = Some(SessionTranscript::new());
        self
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Key length `n`.
    pub fn key_length(&self) -> usize {
        self.secret.key_length()
    }

    /// Secret this session proves knowledge of.
    pub fn secret(&self) -> &SharedSecret {
        &self.secret
    }

    /// Current register, between preparation and the prover's answer.
    pub fn register(&self) -> Option<&QubitRegister> {
        self.register.as_ref()
    }

    /// Recorded transcript, if recording was enabled.
    pub fn transcript(&self) -> Option<&SessionTranscript> {
        self.transcript.as_ref()
    }

    /// Consumes the session and returns its transcript.
    pub fn into_transcript(self) -> Option<SessionTranscript> {
        self.transcript
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase != expected {
            return Err(QzkpError::PhaseViolation {
                expected,
                found: self.phase,
            });
        }
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = ?self.phase, to = ?phase, n = self.key_length(), "session transition");
        self.phase = phase;
    }

    fn note(&mut self, label: &str, value: impl ToString) {
        let phase = self.phase;
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.record(phase, label, value);
        }
    }

    /// `Init → Prepared`: encodes the secret into a fresh register.
    pub fn prepare<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: RandomBitSource + ?Sized,
    {
        self.expect_phase(Phase::Init)?;
        let register =
            QubitRegister::encode(self.secret.witness(), self.secret.basis(), &self.noise, rng)?;
        self.enter(Phase::Prepared);
        if self.transcript.is_some() {
            self.note("witness", self.secret.witness().clone());
            self.note("basis", self.secret.basis().clone());
            self.note("register", &register);
        }
        self.register = Some(register);
        Ok(())
    }

    /// `Prepared → Challenged` with a freshly drawn challenge.
    pub fn draw_challenge<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: RandomBitSource + ?Sized,
    {
        let challenge = BinaryString::random(self.key_length(), rng);
        self.issue_challenge(challenge, rng)
    }

    /// `Prepared → Challenged` with a caller-chosen challenge.
    pub fn issue_challenge<R>(&mut self, challenge: BinaryString, rng: &mut R) -> Result<()>
    where
        R: RandomBitSource + ?Sized,
    {
        self.expect_phase(Phase::Prepared)?;
        ensure_len("challenge", self.key_length(), challenge.len())?;
        let Some(register) = self.register.as_mut() else {
            return Err(QzkpError::PhaseViolation {
                expected: Phase::Prepared,
                found: self.phase,
            });
        };
        let basis = self.secret.basis();
        register.apply_where(
            &challenge,
            |i| challenge_gate(basis.bit(i)),
            &self.noise,
            rng,
        )?;
        self.enter(Phase::Challenged);
        if self.transcript.is_some() {
            let snapshot = self.register.as_ref().map(ToString::to_string);
            self.note("challenge", challenge.clone());
            if let Some(snapshot) = snapshot {
                self.note("register", snapshot);
            }
        }
        self.challenge = Some(challenge);
        Ok(())
    }

    /// `Challenged → Blinded`: hands the challenged register to `prover`.
    ///
    /// The register is consumed either way; if the prover fails or answers
    /// with the wrong length the session stays in `Challenged` and cannot be
    /// resumed.
    pub fn respond<P, R>(&mut self, prover: &P, rng: &mut R) -> Result<()>
    where
        P: Prover + ?Sized,
        R: RandomBitSource,
    {
        self.expect_phase(Phase::Challenged)?;
        let Some(register) = self.register.take() else {
            return Err(QzkpError::PhaseViolation {
                expected: Phase::Challenged,
                found: self.phase,
            });
        };
        let message = {
            let mut ctx = ProverContext::new(&self.noise, rng, self.transcript.as_mut());
            prover.respond(register, &mut ctx)?
        };
        ensure_len("proof message", self.key_length(), message.len())?;
        self.enter(Phase::Blinded);
        self.note("prover", prover.name());
        if let ProofMessage::ProofState(proof) = &message {
            let snapshot = proof.to_string();
            self.note("proof state", snapshot);
        }
        self.message = Some(message);
        Ok(())
    }

    /// `Blinded → Measured → Verified`: reconstructs `c'` and scores it
    /// against the challenge.
    pub fn verify<R>(&mut self, rng: &mut R) -> Result<SessionOutcome>
    where
        R: RandomBitSource + ?Sized,
    {
        self.expect_phase(Phase::Blinded)?;
        let (Some(message), Some(challenge)) = (self.message.take(), self.challenge.take()) else {
            return Err(QzkpError::PhaseViolation {
                expected: Phase::Blinded,
                found: self.phase,
            });
        };
        let recovered = match message {
            ProofMessage::Approximation(approx) => approx,
            ProofMessage::ProofState(register) => {
                let outcomes = register.measure(self.secret.witness(), &self.noise, rng)?;
                self.secret.basis().xor(&outcomes)?
            }
        };
        self.enter(Phase::Measured);
        self.note("recovered challenge", recovered.clone());

        let matches = challenge.matches(&recovered)?;
        let outcome = SessionOutcome {
            challenge,
            recovered,
            matches,
        };
        self.enter(Phase::Verified);
        self.note("agreement", outcome.agreement_percentage());
        Ok(outcome)
    }

    /// Drives every phase with a fresh challenge.
    pub fn run<P, R>(mut self, prover: &P, rng: &mut R) -> Result<(SessionOutcome, Self)>
    where
        P: Prover + ?Sized,
        R: RandomBitSource,
    {
        self.prepare(rng)?;
        self.draw_challenge(rng)?;
        self.respond(prover, rng)?;
        let outcome = self.verify(rng)?;
        Ok((outcome, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacker::AttackerProver;
    use crate::noise::NoiseParameters;
    use crate::prng::BitStream;
    use crate::prover::{HonestProver, ResponseRule};
    use proptest::prelude::*;

    fn bits(values: &[u8]) -> BinaryString {
        BinaryString::from_u8s(values)
    }

    fn honest_session(
        secret: &SharedSecret,
        rule: ResponseRule,
        noise: NoiseModel,
        rng: &mut BitStream,
    ) -> SessionOutcome {
        let prover = HonestProver::new(secret.clone(), rule);
        let session = ProtocolSession::with_secret(secret.clone(), noise);
        session.run(&prover, rng).unwrap().0
    }

    fn mean_agreement<F>(trials: usize, mut f: F) -> f64
    where
        F: FnMut() -> f64,
    {
        (0..trials).map(|_| f()).sum::<f64>() / trials as f64
    }

    #[test]
    fn test_concrete_single_qubit_trace() {
        let mut rng = BitStream::new(0);
        let secret = SharedSecret::new(bits(&[1]), bits(&[1])).unwrap();
        let prover = HonestProver::with_blinding(secret.clone(), bits(&[0]));
        let mut session =
            ProtocolSession::with_secret(secret, NoiseModel::noiseless()).recording();

        session.prepare(&mut rng).unwrap();
        let prepared = session.register().unwrap().states()[0];
        assert_eq!(prepared.basis(), Basis::Hadamard);
        assert!(prepared.value());
        assert_eq!(prepared.label(), "-");

        session.issue_challenge(bits(&[0]), &mut rng).unwrap();
        assert_eq!(session.register().unwrap().to_string(), "-");

        session.respond(&prover, &mut rng).unwrap();
        let outcome = session.verify(&mut rng).unwrap();
        assert_eq!(outcome.recovered, bits(&[0]));
        assert_eq!(outcome.agreement_percentage(), 100.0);
        assert_eq!(session.phase(), Phase::Verified);

        let transcript = session.transcript().unwrap();
        assert_eq!(transcript.find("blinding"), Some("0"));
        assert_eq!(transcript.find("prover measurement"), Some("1"));
        assert_eq!(transcript.find("recovered challenge"), Some("0"));
    }

    #[test]
    fn test_length_mismatch_rejects_session() {
        let err = ProtocolSession::new(
            bits(&[1, 0, 1, 0]),
            bits(&[1, 0, 1, 0, 1]),
            NoiseModel::noiseless(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QzkpError::LengthMismatch {
                expected: 4,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let err = SharedSecret::new(bits(&[]), bits(&[])).unwrap_err();
        assert!(matches!(err, QzkpError::InvalidKeyLength(0)));
    }

    #[test]
    fn test_challenge_length_is_checked() {
        let mut rng = BitStream::new(1);
        let mut session =
            ProtocolSession::new(bits(&[1, 0]), bits(&[0, 1]), NoiseModel::noiseless()).unwrap();
        session.prepare(&mut rng).unwrap();
        let err = session.issue_challenge(bits(&[1]), &mut rng).unwrap_err();
        assert!(matches!(err, QzkpError::LengthMismatch { .. }));
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let mut rng = BitStream::new(1);
        let mut session =
            ProtocolSession::new(bits(&[1, 0]), bits(&[0, 1]), NoiseModel::noiseless()).unwrap();
        let err = session.draw_challenge(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            QzkpError::PhaseViolation {
                expected: Phase::Prepared,
                found: Phase::Init
            }
        ));
        session.prepare(&mut rng).unwrap();
        assert!(session.prepare(&mut rng).is_err());
        assert!(session.verify(&mut rng).is_err());
    }

    #[test]
    fn test_challenge_flips_value_in_encoding_basis() {
        let mut rng = BitStream::new(4);
        let mut session =
            ProtocolSession::new(bits(&[0, 0, 1, 1]), bits(&[0, 1, 0, 1]), NoiseModel::noiseless())
                .unwrap();
        session.prepare(&mut rng).unwrap();
        assert_eq!(session.register().unwrap().to_string(), "0 + 1 -");
        session.issue_challenge(bits(&[1, 1, 1, 0]), &mut rng).unwrap();
        assert_eq!(session.register().unwrap().to_string(), "1 - 0 -");
    }

    #[test]
    fn test_failed_response_does_not_advance_phase() {
        let mut rng = BitStream::new(6);
        let secret = SharedSecret::new(bits(&[1, 0, 1]), bits(&[0, 1, 1])).unwrap();
        let prover = HonestProver::with_blinding(secret.clone(), bits(&[1]));
        let mut session = ProtocolSession::with_secret(secret, NoiseModel::noiseless());
        session.prepare(&mut rng).unwrap();
        session.draw_challenge(&mut rng).unwrap();
        assert!(matches!(
            session.respond(&prover, &mut rng),
            Err(QzkpError::LengthMismatch { .. })
        ));
        assert_eq!(session.phase(), Phase::Challenged);
        assert!(matches!(
            session.verify(&mut rng),
            Err(QzkpError::PhaseViolation {
                expected: Phase::Blinded,
                found: Phase::Challenged
            })
        ));
    }

    #[test]
    fn test_leak_is_witness_xor_basis() {
        let secret = SharedSecret::new(bits(&[1, 1, 0, 0]), bits(&[1, 0, 1, 0])).unwrap();
        assert_eq!(secret.leak(), bits(&[0, 1, 1, 0]));
    }

    proptest! {
        #[test]
        fn prop_honest_blinded_path_is_perfect(
            raw in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..48),
            seed in any::<u64>(),
        ) {
            let (w, t): (Vec<bool>, Vec<bool>) = raw.into_iter().unzip();
            let secret = SharedSecret::new(w.into(), t.into()).unwrap();
            let mut rng = BitStream::new(seed);
            let outcome = honest_session(
                &secret,
                ResponseRule::BlindedApproximation,
                NoiseModel::noiseless(),
                &mut rng,
            );
            prop_assert_eq!(outcome.agreement_percentage(), 100.0);
        }

        #[test]
        fn prop_honest_combined_path_is_perfect(
            raw in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..48),
            seed in any::<u64>(),
        ) {
            let (w, t): (Vec<bool>, Vec<bool>) = raw.into_iter().unzip();
            let secret = SharedSecret::new(w.into(), t.into()).unwrap();
            let mut rng = BitStream::new(seed);
            let outcome = honest_session(
                &secret,
                ResponseRule::CombinedTransform,
                NoiseModel::noiseless(),
                &mut rng,
            );
            prop_assert_eq!(outcome.agreement_percentage(), 100.0);
        }
    }

    #[test]
    fn test_noise_lowers_honest_agreement_monotonically() {
        let mut rng = BitStream::new(2718);
        let secret = SharedSecret::random(16, &mut rng).unwrap();
        let trials = 1_000;
        for rule in [ResponseRule::BlindedApproximation, ResponseRule::CombinedTransform] {
            let mut previous = f64::INFINITY;
            for p in [0.0, 0.1, 0.3] {
                let noise = NoiseModel::new(NoiseParameters::new(p, p).unwrap()).unwrap();
                let mean = mean_agreement(trials, || {
                    honest_session(&secret, rule, noise, &mut rng).agreement_percentage()
                });
                assert!(
                    mean <= previous + 0.5,
                    "{rule:?}: mean {mean} at p={p} rose above {previous}"
                );
                previous = mean;
            }
            assert!(previous < 95.0, "{rule:?}: noise had no visible effect");
        }
    }

    #[test]
    fn test_bit_flip_alone_degrades_agreement() {
        let mut rng = BitStream::new(99);
        let secret = SharedSecret::random(16, &mut rng).unwrap();
        let mut previous = f64::INFINITY;
        for p in [0.0, 0.1, 0.3] {
            let noise = NoiseModel::new(NoiseParameters::new(p, 0.0).unwrap()).unwrap();
            let mean = mean_agreement(1_000, || {
                honest_session(&secret, ResponseRule::BlindedApproximation, noise, &mut rng)
                    .agreement_percentage()
            });
            assert!(mean <= previous + 0.5, "mean {mean} at p={p}");
            previous = mean;
        }
    }

    #[test]
    fn test_interceptor_is_detectable() {
        let mut rng = BitStream::new(31337);
        let secret = SharedSecret::random(32, &mut rng).unwrap();
        let attacker = AttackerProver::interceptor(secret.leak());
        let trials = 1_000;
        let mean = mean_agreement(trials, || {
            let session = ProtocolSession::with_secret(secret.clone(), NoiseModel::noiseless());
            session
                .run(&attacker, &mut rng)
                .unwrap()
                .0
                .agreement_percentage()
        });
        assert!(mean < 100.0);
        assert!((mean - 62.5).abs() < 5.0, "mean agreement {mean}");
    }

    #[test]
    fn test_random_guess_averages_half() {
        let mut rng = BitStream::new(4242);
        let secret = SharedSecret::random(32, &mut rng).unwrap();
        let guesser = AttackerProver::random_guess();
        let mean = mean_agreement(1_000, || {
            let session = ProtocolSession::with_secret(secret.clone(), NoiseModel::noiseless());
            session
                .run(&guesser, &mut rng)
                .unwrap()
                .0
                .agreement_percentage()
        });
        assert!((mean - 50.0).abs() < 5.0, "mean agreement {mean}");
    }
}
