#![deny(missing_docs)]

//! The design philosophy underlying `qzkp` is pedagogical, yet physically rigorous.
//! Each module encapsulates a discrete piece of the quantum zero-knowledge exchange,
//! illustrating how a handful of single-qubit rules compose into a checkable proof.
//!
//! This crate aspires to bridge gaps between theoretical exposition and practical engineering,
//! serving both as a didactic resource and a foundation for future cryptographic research.
//! # qzkp
//!
//! **qzkp** simulates a challenge-response quantum zero-knowledge proof in
//! which a prover convinces a verifier that it holds a secret bit string `w`
//! encoded in secret bases `θ`, without revealing either.  Qubits are
//! restricted to the four BB84 states, so every state is a `(value, basis)`
//! pair and the simulation is exact and classical.
//!
//! ## Features
//!
//! * **Qubit engine**: [`QubitState`](qubit/struct.QubitState.html) with
//!   X, Z and H gates and basis-aware measurement, plus a
//!   [`QubitRegister`](register/struct.QubitRegister.html) of independent
//!   qubits.
//! * **Noise**: an independent bit-flip / phase-flip channel applied after
//!   every gate ([`noise`](noise/index.html)).
//! * **Protocol**: a phase-checked
//!   [`ProtocolSession`](protocol/struct.ProtocolSession.html) with two
//!   honest response constructions and two dishonest provers.
//! * **Trials and statistics**: a reproducible, optionally parallel
//!   [`TrialRunner`](trials/struct.TrialRunner.html) and per-decision
//!   agreement distributions ([`stats`](stats/index.html)).
//! * **Transcripts**: phase-by-phase session records with a BLAKE2b digest.
//!
//! ## Usage
//!
//! ```rust
//! use qzkp::{run_trials, stats::aggregate, RunConfig};
//!
//! // 200 honest, noiseless sessions over 16 qubits.
//! let config = RunConfig::new(16, 200).with_seed(7);
//! let results = run_trials(&config).unwrap();
//! let agg = aggregate(&results);
//! assert_eq!(agg.honest_summary.mean, 100.0);
//! ```
//!
//! An intercept-and-resend attacker lands well below full agreement:
//!
//! ```rust
//! use qzkp::{run_trials, stats::aggregate, RunConfig};
//!
//! let config = RunConfig::new(32, 500).with_attack(true).with_seed(11);
//! let results = run_trials(&config).unwrap();
//! assert!(aggregate(&results).dishonest_summary.mean < 90.0);
//! ```

pub mod attacker;
pub mod bits;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod noise;
pub mod prng;
pub mod protocol;
pub mod prover;
pub mod qubit;
pub mod random;
pub mod register;
pub mod stats;
pub mod transcript;
pub mod trials;

pub use attacker::AttackerProver;
pub use bits::{BinaryString, Bit};
pub use config::RunConfig;
pub use error::{QzkpError, Result};
pub use io::{default_output_name, write_summary_json, write_trials_csv};
pub use noise::{NoiseModel, NoiseParameters};
pub use prng::BitStream;
pub use protocol::{Phase, ProtocolSession, SessionOutcome, SharedSecret};
pub use prover::{HonestProver, ProofMessage, Prover, ProverContext, ResponseRule};
pub use qubit::{Basis, Gate, QubitState};
pub use random::{QuantumCoin, RandomBitSource};
pub use register::QubitRegister;
pub use stats::{acceptance_rate, aggregate, Aggregate, FrequencyTable, Summary};
pub use transcript::{SessionTranscript, TranscriptEntry};
pub use trials::{
    run_trials, Decision, NoProgress, ProgressSink, TrialResult, TrialRunner, TrialTrace,
};
