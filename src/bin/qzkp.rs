//! Command-line driver for the quantum zero-knowledge simulator.
//!
//! `qzkp run` executes a batch of trials and writes the per-trial CSV and an
//! aggregate JSON summary; `qzkp trace` replays a single session and prints
//! its phase-by-phase transcript.

use clap::{ArgAction, Args, Parser, Subcommand};
use qzkp::{
    acceptance_rate, aggregate, default_output_name, logging, write_summary_json,
    write_trials_csv, Decision, ResponseRule, RunConfig, Summary, TrialRunner,
};
use std::path::{Path, PathBuf};
use tracing::info;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Quantum zero-knowledge proof simulator", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of trials and write CSV and JSON results
    Run {
        #[command(flatten)]
        params: ParamArgs,
        /// Number of sessions
        #[arg(short = 'n', long)]
        iterations: Option<usize>,
        /// Map trials over all cores
        #[arg(long)]
        parallel: bool,
        /// Directory for the result files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
        /// Also report the fraction of trials at or above this agreement
        #[arg(long, value_name = "PERCENT")]
        threshold: Option<f64>,
    },
    /// Replay one session with a full transcript
    Trace {
        #[command(flatten)]
        params: ParamArgs,
        /// One-based trial to replay
        #[arg(long, default_value_t = 1)]
        trial: usize,
    },
}

/// Flags shared by both subcommands; each overrides the config file.
#[derive(Args)]
struct ParamArgs {
    /// JSON run configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Qubits per session
    #[arg(short, long)]
    key_length: Option<usize>,
    /// Bit-flip probability after each gate
    #[arg(long)]
    p_bit_flip: Option<f64>,
    /// Phase-flip probability after each gate
    #[arg(long)]
    p_phase_flip: Option<f64>,
    /// Dishonest trials intercept and resend
    #[arg(long)]
    attack: bool,
    /// Draw honest or dishonest per trial
    #[arg(long)]
    mixed: bool,
    /// Honest construction: blinded or combined
    #[arg(long)]
    rule: Option<ResponseRule>,
    /// Run seed
    #[arg(long)]
    seed: Option<u64>,
    /// Redraw the shared secret for every session
    #[arg(long)]
    fresh_secret: bool,
}

impl ParamArgs {
    fn resolve(&self) -> CliResult<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(k) = self.key_length {
            config.key_length = k;
        }
        if let Some(p) = self.p_bit_flip {
            config.noise.p_bit_flip = p;
        }
        if let Some(p) = self.p_phase_flip {
            config.noise.p_phase_flip = p;
        }
        if let Some(rule) = self.rule {
            config.response_rule = rule;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.attack |= self.attack;
        config.mixed_decisions |= self.mixed;
        config.fresh_secret_per_trial |= self.fresh_secret;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {err}");
    }
    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Run {
            params,
            iterations,
            parallel,
            out_dir,
            threshold,
        } => {
            let mut config = params.resolve()?;
            if let Some(n) = iterations {
                config.iterations = n;
            }
            config.parallel |= parallel;
            run_batch(config, &out_dir, threshold)
        }
        Commands::Trace { params, trial } => {
            let mut config = params.resolve()?;
            config.iterations = config.iterations.max(trial);
            run_trace(config, trial)
        }
    }
}

fn run_batch(config: RunConfig, out_dir: &Path, threshold: Option<f64>) -> CliResult<()> {
    let runner = TrialRunner::new(config)?;
    let total = runner.config().iterations;
    let step = (total / 10).max(1);
    let results = runner.run_with_progress(&|done: usize, total: usize| {
        if done % step == 0 || done == total {
            info!(done, total, "progress");
        }
    })?;

    let agg = aggregate(&results);
    let csv_path = out_dir.join(default_output_name(runner.config()));
    let json_path = csv_path.with_extension("json");
    write_trials_csv(&csv_path, &results)?;
    write_summary_json(&json_path, &agg)?;

    println!("seed: {}", runner.seed());
    println!("mode: {}", runner.config().mode_label());
    for decision in [Decision::Honest, Decision::Dishonest] {
        print_summary(decision, agg.summary(decision));
        for (percentage, count) in agg.table(decision).entries() {
            println!("    {percentage:>6.2}%  {count}");
        }
    }
    if let Some(threshold) = threshold {
        println!(
            "acceptance at >= {threshold}%: {:.4}",
            acceptance_rate(&results, threshold)
        );
    }
    println!("wrote {}", csv_path.display());
    println!("wrote {}", json_path.display());
    Ok(())
}

fn print_summary(decision: Decision, summary: &Summary) {
    if summary.count == 0 {
        return;
    }
    println!(
        "{decision}: {} trials, mean {:.2}%, std {:.2}, min {:.2}%, max {:.2}%",
        summary.count, summary.mean, summary.std_dev, summary.min, summary.max
    );
}

fn run_trace(config: RunConfig, trial: usize) -> CliResult<()> {
    if trial == 0 {
        return Err("trial numbers start at 1".into());
    }
    let runner = TrialRunner::new(config)?;
    let trace = runner.trace_trial(trial - 1)?;
    println!("seed: {}", runner.seed());
    println!("trial {trial} ({})", trace.decision);
    for line in trace.transcript.lines() {
        println!("  {line}");
    }
    println!(
        "matches: {}/{} ({:.2}%)",
        trace.outcome.matches,
        trace.outcome.key_length(),
        trace.outcome.agreement_percentage()
    );
    println!("digest: {}", trace.transcript.digest());
    Ok(())
}
