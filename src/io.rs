//! File sinks for trial results.

use crate::config::RunConfig;
use crate::error::Result;
use crate::stats::Aggregate;
use crate::trials::TrialResult;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column header of the per-trial CSV.
pub const CSV_HEADER: &str = "Iteration,Decision,Percentage";

/// File name for a run: `iter_<mode>_data_<key_length>_<iterations>.csv`.
pub fn default_output_name(config: &RunConfig) -> String {
    format!(
        "iter_{}_data_{}_{}.csv",
        config.mode_label(),
        config.key_length,
        config.iterations
    )
}

fn create_in_parent(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Writes one row per trial, in order, under [`CSV_HEADER`].
///
/// The decision column carries `0` for honest and `1` for dishonest trials.
pub fn write_trials_csv(path: impl AsRef<Path>, results: &[TrialResult]) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut writer = create_in_parent(path)?;
    writeln!(writer, "{CSV_HEADER}")?;
    for result in results {
        writeln!(
            writer,
            "{},{},{}",
            result.iteration,
            result.decision.as_u8(),
            result.agreement_percentage()
        )?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Writes `aggregate` as pretty-printed JSON.
pub fn write_summary_json(path: impl AsRef<Path>, aggregate: &Aggregate<'_>) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut writer = create_in_parent(path)?;
    serde_json::to_writer_pretty(&mut writer, aggregate)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::aggregate;
    use crate::trials::Decision;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(tag: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("qzkp_{tag}_{unique}"))
    }

    fn sample() -> Vec<TrialResult> {
        vec![
            TrialResult {
                iteration: 1,
                matches: 8,
                key_length: 8,
                decision: Decision::Honest,
            },
            TrialResult {
                iteration: 2,
                matches: 5,
                key_length: 8,
                decision: Decision::Dishonest,
            },
        ]
    }

    #[test]
    fn test_write_trials_csv() {
        let dir = temp_dir("csv");
        let path = write_trials_csv(dir.join("nested").join("out.csv"), &sample()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Iteration,Decision,Percentage\n1,0,100\n2,1,62.5\n"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_summary_json() {
        let dir = temp_dir("json");
        let results = sample();
        let path = write_summary_json(dir.join("summary.json"), &aggregate(&results)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["raw"].as_array().unwrap().len(), 2);
        assert_eq!(value["raw"][1]["decision"], "dishonest");
        assert_eq!(value["honest_summary"]["count"], 1);
        assert_eq!(value["dishonest_summary"]["mean"], 62.5);
        assert_eq!(value["dishonest"]["entries"][0]["percentage"], 62.5);
        assert_eq!(value["dishonest"]["entries"][0]["count"], 1);
        assert_eq!(value["honest"]["entries"][0]["percentage"], 100.0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_output_name() {
        let config = RunConfig::new(16, 500).with_attack(true).with_noise(0.1, 0.1);
        assert_eq!(
            default_output_name(&config),
            "iter_noise_attack_data_16_500.csv"
        );
    }
}
