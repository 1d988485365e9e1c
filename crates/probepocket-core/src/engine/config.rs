use thiserror::Error;

pub const DEFAULT_SELECTION_CUTOFF: f64 = 2.5;
pub const DEFAULT_MIN_DENSE_NEIGHBORS: usize = 4;
pub const DEFAULT_MAX_ACCRETION_PASSES: usize = 200;
pub const DEFAULT_LINING_MARGIN: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurialConfig {
    /// Atoms closer than this to a probe center count toward its burial (Rbc).
    pub radius: f64,
    /// Minimum burial count for a probe to be kept (BCthreshold).
    pub threshold: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccretionConfig {
    /// Radius of the satellite probes grown after layer 0 (Raccretion).
    pub radius: f64,
    /// Safety cap on accretion passes; reaching it is a convergence failure.
    pub max_passes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Pair distance below which two probes count as density neighbors.
    pub cutoff: f64,
    /// Neighbor count a probe needs in both density passes.
    pub min_dense_neighbors: usize,
    /// Extra contact distance when collecting atoms lining a pocket.
    pub lining_margin: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PocketConfig {
    /// Solvent probe radius (Rprobe).
    pub probe_radius: f64,
    /// Squared distance under which two probes are duplicates (Rweed).
    pub weed_distance_sq: f64,
    pub burial: BurialConfig,
    pub accretion: AccretionConfig,
    pub selection: SelectionConfig,
}

#[derive(Default)]
pub struct PocketConfigBuilder {
    probe_radius: Option<f64>,
    burial_threshold: Option<usize>,
    burial_radius: Option<f64>,
    weed_distance_sq: Option<f64>,
    accretion_radius: Option<f64>,
    max_accretion_passes: Option<usize>,
    selection_cutoff: Option<f64>,
    min_dense_neighbors: Option<usize>,
    lining_margin: Option<f64>,
}

impl PocketConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe_radius(mut self, radius: f64) -> Self {
        self.probe_radius = Some(radius);
        self
    }
    pub fn burial_threshold(mut self, threshold: usize) -> Self {
        self.burial_threshold = Some(threshold);
        self
    }
    pub fn burial_radius(mut self, radius: f64) -> Self {
        self.burial_radius = Some(radius);
        self
    }
    pub fn weed_distance_sq(mut self, distance_sq: f64) -> Self {
        self.weed_distance_sq = Some(distance_sq);
        self
    }
    pub fn accretion_radius(mut self, radius: f64) -> Self {
        self.accretion_radius = Some(radius);
        self
    }
    pub fn max_accretion_passes(mut self, passes: usize) -> Self {
        self.max_accretion_passes = Some(passes);
        self
    }
    pub fn selection_cutoff(mut self, cutoff: f64) -> Self {
        self.selection_cutoff = Some(cutoff);
        self
    }
    pub fn min_dense_neighbors(mut self, count: usize) -> Self {
        self.min_dense_neighbors = Some(count);
        self
    }
    pub fn lining_margin(mut self, margin: f64) -> Self {
        self.lining_margin = Some(margin);
        self
    }

    pub fn build(self) -> Result<PocketConfig, ConfigError> {
        let probe_radius = positive(
            "probe_radius",
            self.probe_radius
                .ok_or(ConfigError::MissingParameter("probe_radius"))?,
        )?;
        let burial = BurialConfig {
            radius: positive(
                "burial_radius",
                self.burial_radius
                    .ok_or(ConfigError::MissingParameter("burial_radius"))?,
            )?,
            threshold: self
                .burial_threshold
                .ok_or(ConfigError::MissingParameter("burial_threshold"))?,
        };
        let weed_distance_sq = positive(
            "weed_distance_sq",
            self.weed_distance_sq
                .ok_or(ConfigError::MissingParameter("weed_distance_sq"))?,
        )?;

        let max_passes = self
            .max_accretion_passes
            .unwrap_or(DEFAULT_MAX_ACCRETION_PASSES);
        if max_passes == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_accretion_passes",
                value: 0.0,
                reason: "at least one pass is required",
            });
        }
        let accretion = AccretionConfig {
            radius: positive(
                "accretion_radius",
                self.accretion_radius
                    .ok_or(ConfigError::MissingParameter("accretion_radius"))?,
            )?,
            max_passes,
        };

        let lining_margin = self.lining_margin.unwrap_or(DEFAULT_LINING_MARGIN);
        if !lining_margin.is_finite() || lining_margin < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "lining_margin",
                value: lining_margin,
                reason: "must be finite and non-negative",
            });
        }
        let selection = SelectionConfig {
            cutoff: positive(
                "selection_cutoff",
                self.selection_cutoff.unwrap_or(DEFAULT_SELECTION_CUTOFF),
            )?,
            min_dense_neighbors: self
                .min_dense_neighbors
                .unwrap_or(DEFAULT_MIN_DENSE_NEIGHBORS),
            lining_margin,
        };

        Ok(PocketConfig {
            probe_radius,
            weed_distance_sq,
            burial,
            accretion,
            selection,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be finite and positive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> PocketConfigBuilder {
        PocketConfigBuilder::new()
            .probe_radius(1.4)
            .burial_threshold(40)
            .burial_radius(8.0)
            .weed_distance_sq(1.0)
            .accretion_radius(0.7)
    }

    #[test]
    fn build_applies_defaults_for_optional_parameters() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.probe_radius, 1.4);
        assert_eq!(config.burial.threshold, 40);
        assert_eq!(config.burial.radius, 8.0);
        assert_eq!(config.weed_distance_sq, 1.0);
        assert_eq!(config.accretion.radius, 0.7);
        assert_eq!(config.accretion.max_passes, DEFAULT_MAX_ACCRETION_PASSES);
        assert_eq!(config.selection.cutoff, DEFAULT_SELECTION_CUTOFF);
        assert_eq!(
            config.selection.min_dense_neighbors,
            DEFAULT_MIN_DENSE_NEIGHBORS
        );
        assert_eq!(config.selection.lining_margin, DEFAULT_LINING_MARGIN);
    }

    #[test]
    fn each_required_parameter_is_reported_when_missing() {
        let cases: [(&str, PocketConfigBuilder); 5] = [
            (
                "probe_radius",
                PocketConfigBuilder::new()
                    .burial_threshold(1)
                    .burial_radius(8.0)
                    .weed_distance_sq(1.0)
                    .accretion_radius(0.7),
            ),
            (
                "burial_threshold",
                PocketConfigBuilder::new()
                    .probe_radius(1.4)
                    .burial_radius(8.0)
                    .weed_distance_sq(1.0)
                    .accretion_radius(0.7),
            ),
            (
                "burial_radius",
                PocketConfigBuilder::new()
                    .probe_radius(1.4)
                    .burial_threshold(1)
                    .weed_distance_sq(1.0)
                    .accretion_radius(0.7),
            ),
            (
                "weed_distance_sq",
                PocketConfigBuilder::new()
                    .probe_radius(1.4)
                    .burial_threshold(1)
                    .burial_radius(8.0)
                    .accretion_radius(0.7),
            ),
            (
                "accretion_radius",
                PocketConfigBuilder::new()
                    .probe_radius(1.4)
                    .burial_threshold(1)
                    .burial_radius(8.0)
                    .weed_distance_sq(1.0),
            ),
        ];

        for (name, builder) in cases {
            assert_eq!(
                builder.build().unwrap_err(),
                ConfigError::MissingParameter(name)
            );
        }
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let err = complete_builder().probe_radius(0.0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "probe_radius",
                ..
            }
        ));

        let err = complete_builder()
            .accretion_radius(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "accretion_radius",
                ..
            }
        ));
    }

    #[test]
    fn zero_pass_cap_and_negative_margin_are_rejected() {
        assert!(matches!(
            complete_builder().max_accretion_passes(0).build(),
            Err(ConfigError::InvalidParameter {
                name: "max_accretion_passes",
                ..
            })
        ));
        assert!(matches!(
            complete_builder().lining_margin(-0.1).build(),
            Err(ConfigError::InvalidParameter {
                name: "lining_margin",
                ..
            })
        ));
    }

    #[test]
    fn optional_overrides_are_honored() {
        let config = complete_builder()
            .selection_cutoff(3.0)
            .min_dense_neighbors(6)
            .max_accretion_passes(10)
            .lining_margin(0.0)
            .build()
            .unwrap();
        assert_eq!(config.selection.cutoff, 3.0);
        assert_eq!(config.selection.min_dense_neighbors, 6);
        assert_eq!(config.accretion.max_passes, 10);
        assert_eq!(config.selection.lining_margin, 0.0);
    }
}
