use super::config::{validate_sample_count, GeneratorConfig};
use super::domain::{BehavioralVector, SimulationError, SyntheticProfile};
use super::personas::{Persona, PersonaSet};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;

/// Persona that fell within the match threshold, with its distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaMatch<'a> {
    pub persona: &'a Persona,
    pub distance: f64,
}

/// Matches a reference vector against the persona catalog and augments the
/// matched personas into synthetic profiles.
pub struct ProfileGenerator<'a> {
    personas: &'a PersonaSet,
    config: GeneratorConfig,
}

impl<'a> ProfileGenerator<'a> {
    pub fn new(personas: &'a PersonaSet, config: GeneratorConfig) -> Self {
        Self { personas, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Personas strictly closer than `threshold`, in catalog order.
    pub fn matched_cluster(
        &self,
        reference: &BehavioralVector,
        threshold: f64,
    ) -> Vec<PersonaMatch<'a>> {
        let metric = self.config.metric;
        self.personas
            .iter()
            .map(|persona| PersonaMatch {
                persona,
                distance: metric.distance(reference, &persona.vector),
            })
            .filter(|candidate| candidate.distance < threshold)
            .collect()
    }

    /// Produce exactly `count` profiles spread over the matched cluster.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        reference: &BehavioralVector,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<SyntheticProfile>, SimulationError> {
        self.config.validate()?;
        reference.validate()?;
        let cluster = self.matched_cluster(reference, self.config.threshold);
        self.generate_from_cluster(&cluster, count, rng)
    }

    /// Augment an already matched cluster into exactly `count` profiles.
    pub fn generate_from_cluster<R: Rng + ?Sized>(
        &self,
        cluster: &[PersonaMatch<'a>],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<SyntheticProfile>, SimulationError> {
        self.config.validate()?;
        validate_sample_count(count)?;

        let allocation = allocate_samples(count, cluster.len()).ok_or(
            SimulationError::EmptyCluster {
                threshold: self.config.threshold,
            },
        )?;

        let stdev = self.config.stdev;
        let mut profiles = Vec::with_capacity(count);
        for (matched, samples) in cluster.iter().zip(allocation) {
            for _ in 0..samples {
                profiles.push(SyntheticProfile {
                    persona: matched.persona.name.clone(),
                    vector: perturb(&matched.persona.vector, stdev, rng),
                });
            }
        }

        Ok(profiles)
    }
}

/// Samples per matched persona: an even split with the remainder going one
/// apiece to the leading personas. `None` when nothing matched.
pub(crate) fn allocate_samples(count: usize, matched: usize) -> Option<Vec<usize>> {
    if matched == 0 {
        return None;
    }
    let base = count / matched;
    let remainder = count % matched;
    Some(
        (0..matched)
            .map(|index| base + usize::from(index < remainder))
            .collect(),
    )
}

fn perturb<R: Rng + ?Sized>(vector: &BehavioralVector, stdev: f64, rng: &mut R) -> BehavioralVector {
    BehavioralVector::new(
        vector.risk_seeking + gaussian(rng, 0.0, stdev),
        vector.market_susceptibility + gaussian(rng, 0.0, stdev),
        vector.income + gaussian(rng, 0.0, stdev),
    )
}

/// Box-Muller draw from N(mean, stdev^2).
pub(crate) fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, stdev: f64) -> f64 {
    // `gen` samples [0, 1); flipping keeps the log argument away from zero.
    let u = 1.0 - rng.gen::<f64>();
    let v = rng.gen::<f64>();
    let z = (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos();
    z * stdev + mean
}
