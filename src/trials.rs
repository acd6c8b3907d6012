//! The design philosophy underlying `qzkp` is pedagogical, yet physically rigorous.
//! Each module encapsulates a discrete piece of the quantum zero-knowledge exchange,
//! illustrating how a handful of single-qubit rules compose into a checkable proof.
//!
//! This crate aspires to bridge gaps between theoretical exposition and practical engineering,
//! serving both as a didactic resource and a foundation for future cryptographic research.
//! Repeated sessions.
//!
//! A [`TrialRunner`] validates a [`RunConfig`], fixes a run seed, draws the
//! shared secret through a [`QuantumCoin`], and then executes independent
//! sessions.  Trial `i` draws all of its randomness from
//! [`BitStream::for_trial`]`(seed, i)`, so the result sequence depends only
//! on the seed and configuration, never on scheduling.

use crate::attacker::AttackerProver;
use crate::config::RunConfig;
use crate::error::Result;
use crate::noise::NoiseModel;
use crate::prng::{entropy_seed, BitStream};
use crate::protocol::{ProtocolSession, SessionOutcome, SharedSecret};
use crate::prover::{HonestProver, Prover};
use crate::random::{QuantumCoin, RandomBitSource};
use crate::transcript::SessionTranscript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Which kind of prover answered a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Prover holding the secret.
    Honest,
    /// Attacker or guesser.
    Dishonest,
}

impl Decision {
    /// Fair-coin mapping: `0` honest, `1` dishonest.
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Decision::Dishonest
        } else {
            Decision::Honest
        }
    }

    /// Numeric label used in tabular output.
    pub fn as_u8(self) -> u8 {
        match self {
            Decision::Honest => 0,
            Decision::Dishonest => 1,
        }
    }

    /// Lower-case name.
    pub fn label(self) -> &'static str {
        match self {
            Decision::Honest => "honest",
            Decision::Dishonest => "dishonest",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score of one completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    /// One-based trial index.
    pub iteration: usize,
    /// Positions where the recovered challenge matched.
    pub matches: usize,
    /// Session key length.
    pub key_length: usize,
    /// Prover kind.
    pub decision: Decision,
}

impl TrialResult {
    /// `100 * matches / key_length`.
    pub fn agreement_percentage(&self) -> f64 {
        100.0 * self.matches as f64 / self.key_length as f64
    }
}

/// Receives a completion tick after every trial.
///
/// Implementations must return promptly; the runner never waits on them
/// beyond the call itself.
pub trait ProgressSink: Sync {
    /// `completed` trials out of `total` are done.
    fn trial_completed(&self, completed: usize, total: usize);
}

/// Sink that ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn trial_completed(&self, _completed: usize, _total: usize) {}
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Sync,
{
    fn trial_completed(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// A single recorded trial, for inspection.
#[derive(Debug, Clone)]
pub struct TrialTrace {
    /// Prover kind.
    pub decision: Decision,
    /// Scored outcome.
    pub outcome: SessionOutcome,
    /// Phase-by-phase record.
    pub transcript: SessionTranscript,
}

/// Executes batches of independent sessions.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    config: RunConfig,
    noise: NoiseModel,
    seed: u64,
    secret: SharedSecret,
}

impl TrialRunner {
    /// Validates `config`, fixes the seed and draws the run-wide secret.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let noise = NoiseModel::new(config.noise)?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let mut coin = QuantumCoin::new(BitStream::for_secret(seed));
        let secret = SharedSecret::random(config.key_length, &mut coin)?;
        Ok(Self {
            config,
            noise,
            seed,
            secret,
        })
    }

    /// Validated configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Seed every trial stream derives from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run-wide shared secret.
    pub fn secret(&self) -> &SharedSecret {
        &self.secret
    }

    /// Runs every trial, discarding progress.
    pub fn run(&self) -> Result<Vec<TrialResult>> {
        self.run_with_progress(&NoProgress)
    }

    /// Runs every trial in iteration order, ticking `progress` after each.
    ///
    /// The first failing trial aborts the run; no partial sequence is
    /// returned.
    pub fn run_with_progress<P>(&self, progress: &P) -> Result<Vec<TrialResult>>
    where
        P: ProgressSink + ?Sized,
    {
        self.run_all(progress, &|decision, secret: &SharedSecret| {
            self.prover_for(decision, secret)
        })
    }

    fn run_all<P, F>(&self, progress: &P, provers: &F) -> Result<Vec<TrialResult>>
    where
        P: ProgressSink + ?Sized,
        F: Fn(Decision, &SharedSecret) -> Box<dyn Prover> + Sync,
    {
        let total = self.config.iterations;
        info!(
            seed = self.seed,
            key_length = self.config.key_length,
            iterations = total,
            mode = %self.config.mode_label(),
            rule = %self.config.response_rule,
            p_bit_flip = self.config.noise.p_bit_flip,
            p_phase_flip = self.config.noise.p_phase_flip,
            "starting trial run"
        );
        let start = Instant::now();
        let completed = AtomicUsize::new(0);
        let tick = |result: Result<TrialResult>| {
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.trial_completed(done, total);
            result
        };

        let results = self.map_trials(total, |index| tick(self.run_trial_with(index, provers)))?;
        info!(
            trials = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "trial run finished"
        );
        Ok(results)
    }

    fn map_trials<F>(&self, total: usize, run_one: F) -> Result<Vec<TrialResult>>
    where
        F: Fn(usize) -> Result<TrialResult> + Sync + Send,
    {
        let use_parallel = {
            #[cfg(not(target_arch = "wasm32"))]
            {
                self.config.parallel && rayon::current_num_threads() > 1
            }
            #[cfg(target_arch = "wasm32")]
            {
                false
            }
        };
        if use_parallel {
            #[cfg(not(target_arch = "wasm32"))]
            {
                (0..total).into_par_iter().map(&run_one).collect()
            }
            #[cfg(target_arch = "wasm32")]
            {
                (0..total).map(&run_one).collect()
            }
        } else {
            (0..total).map(run_one).collect()
        }
    }

    /// Runs the trial at zero-based `index`.
    pub fn run_trial(&self, index: usize) -> Result<TrialResult> {
        self.run_trial_with(index, &|decision, secret: &SharedSecret| {
            self.prover_for(decision, secret)
        })
    }

    fn run_trial_with<F>(&self, index: usize, provers: &F) -> Result<TrialResult>
    where
        F: Fn(Decision, &SharedSecret) -> Box<dyn Prover>,
    {
        let iteration = index + 1;
        let (decision, outcome, _) = self
            .execute(index, false, provers)
            .map_err(|err| err.in_trial(iteration))?;
        debug!(
            iteration,
            decision = %decision,
            matches = outcome.matches,
            agreement = outcome.agreement_percentage(),
            "trial complete"
        );
        Ok(TrialResult {
            iteration,
            matches: outcome.matches,
            key_length: outcome.key_length(),
            decision,
        })
    }

    /// Re-runs the trial at zero-based `index` with recording enabled.
    ///
    /// Uses the same stream as [`TrialRunner::run_trial`], so the outcome
    /// matches the corresponding entry of [`TrialRunner::run`].
    pub fn trace_trial(&self, index: usize) -> Result<TrialTrace> {
        let (decision, outcome, transcript) = self
            .execute(index, true, &|decision, secret: &SharedSecret| {
                self.prover_for(decision, secret)
            })
            .map_err(|err| err.in_trial(index + 1))?;
        Ok(TrialTrace {
            decision,
            outcome,
            transcript: transcript.unwrap_or_default(),
        })
    }

    fn prover_for(&self, decision: Decision, secret: &SharedSecret) -> Box<dyn Prover> {
        match decision {
            Decision::Honest => Box::new(HonestProver::new(
                secret.clone(),
                self.config.response_rule,
            )),
            Decision::Dishonest if self.config.attack => {
                Box::new(AttackerProver::interceptor(secret.leak()))
            }
            Decision::Dishonest => Box::new(AttackerProver::random_guess()),
        }
    }

    fn execute<F>(
        &self,
        index: usize,
        record: bool,
        provers: &F,
    ) -> Result<(Decision, SessionOutcome, Option<SessionTranscript>)>
    where
        F: Fn(Decision, &SharedSecret) -> Box<dyn Prover>,
    {
        let mut rng = BitStream::for_trial(self.seed, index);
        let decision = self.decide(&mut rng);
        let secret = if self.config.fresh_secret_per_trial {
            SharedSecret::random(self.config.key_length, &mut QuantumCoin::new(&mut rng))?
        } else {
            self.secret.clone()
        };

        let prover = provers(decision, &secret);

        let mut session = ProtocolSession::with_secret(secret, self.noise);
        if record {
            session = session.recording();
        }
        let (outcome, session) = session.run(prover.as_ref(), &mut rng)?;
        Ok((decision, outcome, session.into_transcript()))
    }

    fn decide<R>(&self, rng: &mut R) -> Decision
    where
        R: RandomBitSource + ?Sized,
    {
        if self.config.mixed_decisions {
            Decision::from_bit(rng.next_bit())
        } else if self.config.attack {
            Decision::Dishonest
        } else {
            Decision::Honest
        }
    }
}

/// Validates `config` and runs all of its trials.
pub fn run_trials(config: &RunConfig) -> Result<Vec<TrialResult>> {
    TrialRunner::new(config.clone())?.run()
}
