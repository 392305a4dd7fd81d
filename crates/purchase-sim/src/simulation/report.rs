use super::domain::{BehavioralVector, EnvironmentVector, PurchaseDecision};
use super::metric::DistanceMetric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit convention of an incoming reference vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceScale {
    /// Risk-seeking and market susceptibility already on 0-100.
    #[default]
    Percent,
    /// Risk-seeking and market susceptibility supplied as 0-1 slider fractions.
    Fraction,
}

impl ReferenceScale {
    pub fn apply(self, vector: BehavioralVector) -> BehavioralVector {
        match self {
            Self::Percent => vector,
            Self::Fraction => BehavioralVector::from_fractions(
                vector.risk_seeking,
                vector.market_susceptibility,
                vector.income,
            ),
        }
    }
}

/// One simulation run as requested by the CLI or the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub reference: Vec<f64>,
    pub environment: Vec<f64>,
    #[serde(default)]
    pub scale: ReferenceScale,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub stdev: Option<f64>,
    #[serde(default)]
    pub metric: Option<DistanceMetric>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub include_profiles: bool,
}

impl SimulationRequest {
    pub fn new(reference: Vec<f64>, environment: Vec<f64>) -> Self {
        Self {
            reference,
            environment,
            scale: ReferenceScale::default(),
            count: None,
            threshold: None,
            stdev: None,
            metric: None,
            seed: None,
            include_profiles: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaMatchView {
    pub name: String,
    pub distance: f64,
    pub samples: usize,
    pub bought: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDecisionView {
    pub persona: String,
    pub vector: BehavioralVector,
    pub decision: PurchaseDecision,
    pub reasoning: String,
}

/// Outcome of a simulation: matched personas, aggregate and optional detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub evaluated_at: DateTime<Utc>,
    pub reference: BehavioralVector,
    pub environment: EnvironmentVector,
    pub threshold: f64,
    pub stdev: f64,
    pub metric: DistanceMetric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub matched_personas: Vec<PersonaMatchView>,
    pub bought: usize,
    pub total: usize,
    pub confidence: f64,
    pub verdict: PurchaseDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<ProfileDecisionView>>,
}

impl SimulationReport {
    /// Confidence rounded to a whole percentage, as shown on the result card.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
