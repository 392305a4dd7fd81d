use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::config::{GeneratorConfig, SimulationSettings};
use super::domain::{BehavioralVector, EnvironmentVector, PurchaseDecision, SimulationError};
use super::evaluation::{DecisionBatch, DecisionEvaluator};
use super::generator::ProfileGenerator;
use super::personas::PersonaSet;
use super::report::{PersonaMatchView, ProfileDecisionView, SimulationReport, SimulationRequest};

/// Service composing the persona catalog, the profile generator, and the
/// decision evaluator. Holds nothing mutable, so one instance serves every
/// request.
pub struct SimulationService {
    personas: Arc<PersonaSet>,
    evaluator: DecisionEvaluator,
    settings: SimulationSettings,
}

impl SimulationService {
    pub fn new(personas: Arc<PersonaSet>, settings: SimulationSettings) -> Self {
        Self {
            personas,
            evaluator: DecisionEvaluator::new(),
            settings,
        }
    }

    pub fn personas(&self) -> &PersonaSet {
        &self.personas
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Run a simulation with a random source seeded from the request, the
    /// configured seed, or entropy, in that order.
    pub fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationReport, SimulationError> {
        let seed = request.seed.or(self.settings.seed);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut report = self.simulate_with(request, &mut rng)?;
        report.seed = seed;
        Ok(report)
    }

    /// Run a simulation drawing noise from the supplied random source.
    pub fn simulate_with<R: Rng + ?Sized>(
        &self,
        request: &SimulationRequest,
        rng: &mut R,
    ) -> Result<SimulationReport, SimulationError> {
        let reference = request
            .scale
            .apply(BehavioralVector::try_from(request.reference.as_slice())?);
        let environment = EnvironmentVector::try_from(request.environment.as_slice())?;
        let generator_config = self.generator_config(request);
        let count = request.count.unwrap_or(self.settings.sample_count);

        generator_config.validate()?;

        let generator = ProfileGenerator::new(&self.personas, generator_config);
        let cluster = generator.matched_cluster(&reference, generator_config.threshold);
        let profiles = match generator.generate_from_cluster(&cluster, count, rng) {
            Ok(profiles) => profiles,
            Err(err) => {
                warn!(
                    ?reference,
                    threshold = generator_config.threshold,
                    %err,
                    "profile generation failed"
                );
                return Err(err);
            }
        };

        let decisions = self.evaluator.evaluate(&environment, &profiles)?;
        let batch =
            DecisionBatch::from_decisions(decisions).ok_or(SimulationError::EmptyCluster {
                threshold: generator_config.threshold,
            })?;

        let matched_personas = cluster
            .iter()
            .map(|candidate| {
                let name = &candidate.persona.name;
                let mut samples = 0;
                let mut bought = 0;
                for (profile, decision) in profiles.iter().zip(&batch.decisions) {
                    if &profile.persona == name {
                        samples += 1;
                        if *decision == PurchaseDecision::Bought {
                            bought += 1;
                        }
                    }
                }
                PersonaMatchView {
                    name: name.clone(),
                    distance: candidate.distance,
                    samples,
                    bought,
                }
            })
            .collect();

        let profile_views = if request.include_profiles {
            let views = profiles
                .iter()
                .map(|profile| -> Result<ProfileDecisionView, SimulationError> {
                    let trace = self.evaluator.explain(&environment, &profile.vector)?;
                    Ok(ProfileDecisionView {
                        persona: profile.persona.clone(),
                        vector: profile.vector,
                        decision: trace.decision,
                        reasoning: trace.reasoning(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(views)
        } else {
            None
        };

        info!(
            matched = cluster.len(),
            total = batch.total,
            bought = batch.bought,
            confidence = batch.confidence,
            "simulation evaluated"
        );
        debug!(decisions = ?batch.binary(), "per-profile decisions");

        Ok(SimulationReport {
            evaluated_at: Utc::now(),
            reference,
            environment,
            threshold: generator_config.threshold,
            stdev: generator_config.stdev,
            metric: generator_config.metric,
            seed: None,
            matched_personas,
            bought: batch.bought,
            total: batch.total,
            confidence: batch.confidence,
            verdict: batch.verdict,
            profiles: profile_views,
        })
    }

    /// Classify caller-supplied profiles without generating any.
    pub fn decide(
        &self,
        environment: &[f64],
        profiles: &[Vec<f64>],
    ) -> Result<DecisionBatch, SimulationError> {
        let batch = self.evaluator.evaluate_raw(environment, profiles)?;
        info!(
            total = batch.total,
            bought = batch.bought,
            confidence = batch.confidence,
            "decision batch evaluated"
        );
        Ok(batch)
    }

    fn generator_config(&self, request: &SimulationRequest) -> GeneratorConfig {
        let defaults = self.settings.generator;
        GeneratorConfig {
            threshold: request.threshold.unwrap_or(defaults.threshold),
            stdev: request.stdev.unwrap_or(defaults.stdev),
            metric: request.metric.unwrap_or(defaults.metric),
        }
    }
}
