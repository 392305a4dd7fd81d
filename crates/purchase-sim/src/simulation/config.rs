use super::domain::InvalidInput;
use super::metric::DistanceMetric;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.1;
pub const DEFAULT_NOISE_STDEV: f64 = 0.1;
pub const DEFAULT_SAMPLE_COUNT: usize = 10;
/// Upper bound on profiles generated for a single simulation.
pub const MAX_SAMPLE_COUNT: usize = 100_000;

/// Matching and augmentation knobs for the profile generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub threshold: f64,
    pub stdev: f64,
    pub metric: DistanceMetric,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            stdev: DEFAULT_NOISE_STDEV,
            metric: DistanceMetric::Euclidean,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        non_negative("threshold", self.threshold)?;
        non_negative("stdev", self.stdev)?;
        Ok(())
    }
}

/// Defaults applied when a simulation request leaves a knob unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub sample_count: usize,
    pub seed: Option<u64>,
    pub generator: GeneratorConfig,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            seed: None,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Reject counts outside `1..=MAX_SAMPLE_COUNT`.
pub fn validate_sample_count(count: usize) -> Result<(), InvalidInput> {
    if count == 0 || count > MAX_SAMPLE_COUNT {
        return Err(InvalidInput::OutOfRange {
            field: "count",
            reason: format!("must be between 1 and {MAX_SAMPLE_COUNT}, got {count}"),
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NonFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInput::OutOfRange {
            field,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}
