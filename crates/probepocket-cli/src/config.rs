use crate::cli::DetectArgs;
use crate::error::{CliError, Result};
use probepocket::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialProbeConfig {
    radius: Option<f64>,
    #[serde(rename = "weed-distance-sq")]
    weed_distance_sq: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBurialConfig {
    threshold: Option<usize>,
    radius: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAccretionConfig {
    radius: Option<f64>,
    #[serde(rename = "max-passes")]
    max_passes: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSelectionConfig {
    cutoff: Option<f64>,
    #[serde(rename = "min-dense-neighbors")]
    min_dense_neighbors: Option<usize>,
    #[serde(rename = "lining-margin")]
    lining_margin: Option<f64>,
}

/// Detection parameters as read from a TOML file, before CLI overrides.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDetectionConfig {
    probe: Option<PartialProbeConfig>,
    burial: Option<PartialBurialConfig>,
    accretion: Option<PartialAccretionConfig>,
    selection: Option<PartialSelectionConfig>,
}

impl PartialDetectionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &DetectArgs) -> Result<core_config::PocketConfig> {
        self.apply_set_values(&args.set_values)?;

        let probe = self.probe.take().unwrap_or_default();
        let burial = self.burial.take().unwrap_or_default();
        let accretion = self.accretion.take().unwrap_or_default();
        let selection = self.selection.take().unwrap_or_default();

        let mut builder = core_config::PocketConfigBuilder::new();
        if let Some(radius) = args.probe_radius.or(probe.radius) {
            builder = builder.probe_radius(radius);
        }
        if let Some(distance_sq) = args.weed_distance_sq.or(probe.weed_distance_sq) {
            builder = builder.weed_distance_sq(distance_sq);
        }
        if let Some(threshold) = args.burial_threshold.or(burial.threshold) {
            builder = builder.burial_threshold(threshold);
        }
        if let Some(radius) = args.burial_radius.or(burial.radius) {
            builder = builder.burial_radius(radius);
        }
        if let Some(radius) = args.accretion_radius.or(accretion.radius) {
            builder = builder.accretion_radius(radius);
        }
        if let Some(passes) = accretion.max_passes {
            builder = builder.max_accretion_passes(passes);
        }
        if let Some(cutoff) = selection.cutoff {
            builder = builder.selection_cutoff(cutoff);
        }
        if let Some(count) = selection.min_dense_neighbors {
            builder = builder.min_dense_neighbors(count);
        }
        if let Some(margin) = selection.lining_margin {
            builder = builder.lining_margin(margin);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "probe.radius" => {
                    self.probe.get_or_insert_with(Default::default).radius =
                        Some(parse_value(key, value_str)?);
                }
                "probe.weed-distance-sq" => {
                    self.probe
                        .get_or_insert_with(Default::default)
                        .weed_distance_sq = Some(parse_value(key, value_str)?);
                }
                "burial.threshold" => {
                    self.burial.get_or_insert_with(Default::default).threshold =
                        Some(parse_value(key, value_str)?);
                }
                "burial.radius" => {
                    self.burial.get_or_insert_with(Default::default).radius =
                        Some(parse_value(key, value_str)?);
                }
                "accretion.radius" => {
                    self.accretion.get_or_insert_with(Default::default).radius =
                        Some(parse_value(key, value_str)?);
                }
                "accretion.max-passes" => {
                    self.accretion
                        .get_or_insert_with(Default::default)
                        .max_passes = Some(parse_value(key, value_str)?);
                }
                "selection.cutoff" => {
                    self.selection.get_or_insert_with(Default::default).cutoff =
                        Some(parse_value(key, value_str)?);
                }
                "selection.min-dense-neighbors" => {
                    self.selection
                        .get_or_insert_with(Default::default)
                        .min_dense_neighbors = Some(parse_value(key, value_str)?);
                }
                "selection.lining-margin" => {
                    self.selection
                        .get_or_insert_with(Default::default)
                        .lining_margin = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    const FULL_CONFIG: &str = r#"
        [probe]
        radius = 1.4
        weed-distance-sq = 1.0

        [burial]
        threshold = 40
        radius = 8.0

        [accretion]
        radius = 0.7

        [selection]
        cutoff = 2.5
    "#;

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn detect_args(config_path: Option<&Path>, extra: &[&str]) -> DetectArgs {
        let mut argv = vec![
            "probepocket".to_string(),
            "detect".to_string(),
            "-i".to_string(),
            "atoms.xyzr".to_string(),
            "-o".to_string(),
            "pockets.pdb".to_string(),
        ];
        if let Some(path) = config_path {
            argv.push("-c".to_string());
            argv.push(path.to_str().unwrap().to_string());
        }
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Detect(args) => args,
        }
    }

    #[test]
    fn load_from_file_and_merge_with_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "full.toml", FULL_CONFIG);
        let args = detect_args(Some(&path), &[]);

        let config = PartialDetectionConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.probe_radius, 1.4);
        assert_eq!(config.weed_distance_sq, 1.0);
        assert_eq!(config.burial.threshold, 40);
        assert_eq!(config.burial.radius, 8.0);
        assert_eq!(config.accretion.radius, 0.7);
        assert_eq!(
            config.accretion.max_passes,
            core_config::DEFAULT_MAX_ACCRETION_PASSES
        );
        assert_eq!(
            config.selection.min_dense_neighbors,
            core_config::DEFAULT_MIN_DENSE_NEIGHBORS
        );
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "full.toml", FULL_CONFIG);
        let args = detect_args(
            Some(&path),
            &["--probe-radius", "1.2", "--burial-threshold", "55"],
        );

        let config = PartialDetectionConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.probe_radius, 1.2);
        assert_eq!(config.burial.threshold, 55);
        assert_eq!(config.burial.radius, 8.0);
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "full.toml", FULL_CONFIG);
        let args = detect_args(
            Some(&path),
            &[
                "-S",
                "selection.cutoff=3.0",
                "-S",
                "accretion.max-passes=12",
                "-S",
                "selection.lining-margin=0.25",
            ],
        );

        let config = PartialDetectionConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.selection.cutoff, 3.0);
        assert_eq!(config.accretion.max_passes, 12);
        assert_eq!(config.selection.lining_margin, 0.25);
    }

    #[test]
    fn cli_flags_alone_are_enough_without_a_file() {
        let args = detect_args(
            None,
            &[
                "--probe-radius",
                "1.4",
                "--burial-threshold",
                "30",
                "--burial-radius",
                "9",
                "--weed-distance-sq",
                "1",
                "--accretion-radius",
                "0.8",
            ],
        );
        let config = PartialDetectionConfig::default()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config.burial.radius, 9.0);
        assert_eq!(config.accretion.radius, 0.8);
    }

    #[test]
    fn missing_required_field_returns_error() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "partial.toml",
            "[probe]\nradius = 1.4\nweed-distance-sq = 1.0\n[burial]\nradius = 8.0\n",
        );
        let args = detect_args(Some(&path), &[]);

        let result = PartialDetectionConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args);
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("burial_threshold")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "typo.toml", "[probe]\nradus = 1.4\n");
        assert!(matches!(
            PartialDetectionConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let args = detect_args(None, &["-S", "probe.radus=1.4"]);
        assert!(matches!(
            PartialDetectionConfig::default().merge_with_cli(&args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["probe.radius", "burial.threshold=many"] {
            let args = detect_args(None, &["-S", bad]);
            assert!(matches!(
                PartialDetectionConfig::default().merge_with_cli(&args),
                Err(CliError::Config(_))
            ));
        }
    }
}
