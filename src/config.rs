//! Run parameters.
//!
//! [`RunConfig`] is the single source of truth for a batch of trials.  It is
//! validated once, before any session runs, and can be loaded from a JSON
//! file so that long experiments are reproducible from a checked-in config.

use crate::error::{QzkpError, Result};
use crate::noise::NoiseParameters;
use crate::prover::ResponseRule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters for one batch of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of qubits per session.
    pub key_length: usize,
    /// Number of sessions.
    pub iterations: usize,
    /// Channel error probabilities.
    pub noise: NoiseParameters,
    /// Dishonest trials intercept and resend instead of guessing.
    pub attack: bool,
    /// Draw an honest/dishonest decision per trial.
    pub mixed_decisions: bool,
    /// Honest construction.
    pub response_rule: ResponseRule,
    /// Run seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Map trials over the rayon pool.
    pub parallel: bool,
    /// Redraw the shared secret for every session instead of once per run.
    pub fresh_secret_per_trial: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            key_length: 16,
            iterations: 1_000,
            noise: NoiseParameters::NONE,
            attack: false,
            mixed_decisions: false,
            response_rule: ResponseRule::default(),
            seed: None,
            parallel: false,
            fresh_secret_per_trial: false,
        }
    }
}

impl RunConfig {
    /// Configuration for `iterations` honest, noiseless sessions of
    /// `key_length` qubits.
    pub fn new(key_length: usize, iterations: usize) -> Self {
        Self {
            key_length,
            iterations,
            ..Self::default()
        }
    }

    /// Sets the noise probabilities.
    pub fn with_noise(mut self, p_bit_flip: f64, p_phase_flip: f64) -> Self {
        self.noise = NoiseParameters {
            p_bit_flip,
            p_phase_flip,
        };
        self
    }

    /// Enables or disables the intercept-and-resend attacker.
    pub fn with_attack(mut self, attack: bool) -> Self {
        self.attack = attack;
        self
    }

    /// Enables or disables per-trial honest/dishonest decisions.
    pub fn with_mixed_decisions(mut self, mixed: bool) -> Self {
        self.mixed_decisions = mixed;
        self
    }

    /// Selects the honest construction.
    pub fn with_rule(mut self, rule: ResponseRule) -> Self {
        self.response_rule = rule;
        self
    }

    /// Fixes the run seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables the parallel trial loop.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Redraws the secret per trial when set.
    pub fn with_fresh_secret_per_trial(mut self, fresh: bool) -> Self {
        self.fresh_secret_per_trial = fresh;
        self
    }

    /// Checks every parameter; the first violation wins.
    pub fn validate(&self) -> Result<()> {
        if self.key_length == 0 {
            return Err(QzkpError::InvalidKeyLength(self.key_length));
        }
        if self.iterations == 0 {
            return Err(QzkpError::InvalidIterationCount(self.iterations));
        }
        self.noise.validate()
    }

    /// Loads and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: RunConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Label used in output file names: `honest`, `attack`, `guess`, or
    /// `mixed_attack` / `mixed_guess`, with a `noise` prefix when either
    /// channel is on.
    pub fn mode_label(&self) -> String {
        let dishonest = if self.attack { "attack" } else { "guess" };
        let base = match (self.mixed_decisions, self.attack) {
            (true, _) => format!("mixed_{dishonest}"),
            (false, true) => "attack".to_string(),
            (false, false) => "honest".to_string(),
        };
        if self.noise.is_noiseless() {
            base
        } else {
            format!("noise_{base}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn test_validation_reports_each_violation() {
        assert!(matches!(
            RunConfig::new(0, 10).validate(),
            Err(QzkpError::InvalidKeyLength(0))
        ));
        assert!(matches!(
            RunConfig::new(4, 0).validate(),
            Err(QzkpError::InvalidIterationCount(0))
        ));
        assert!(matches!(
            RunConfig::new(4, 10).with_noise(0.1, 2.0).validate(),
            Err(QzkpError::InvalidProbability { .. })
        ));
        assert!(RunConfig::new(4, 10).with_noise(0.1, 0.2).validate().is_ok());
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(RunConfig::new(4, 1).mode_label(), "honest");
        assert_eq!(RunConfig::new(4, 1).with_attack(true).mode_label(), "attack");
        assert_eq!(
            RunConfig::new(4, 1)
                .with_mixed_decisions(true)
                .with_noise(0.1, 0.0)
                .mode_label(),
            "noise_mixed_guess"
        );
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("qzkp_config_{unique}.json"));
        fs::write(
            &path,
            r#"{"key_length": 8, "iterations": 50, "attack": true,
                "noise": {"p_bit_flip": 0.05, "p_phase_flip": 0.0},
                "response_rule": "combined_transform"}"#,
        )
        .unwrap();
        let config = RunConfig::from_json_file(&path).unwrap();
        assert_eq!(config.key_length, 8);
        assert_eq!(config.iterations, 50);
        assert!(config.attack);
        assert_eq!(config.noise.p_bit_flip, 0.05);
        assert_eq!(config.response_rule, ResponseRule::CombinedTransform);
        assert!(!config.parallel);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_json_file_validates() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("qzkp_bad_config_{unique}.json"));
        fs::write(&path, r#"{"key_length": 0}"#).unwrap();
        assert!(matches!(
            RunConfig::from_json_file(&path),
            Err(QzkpError::InvalidKeyLength(0))
        ));
        fs::remove_file(&path).unwrap();
    }
}
