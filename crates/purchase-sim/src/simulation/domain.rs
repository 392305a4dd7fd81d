use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features in a behavioral vector.
pub const BEHAVIORAL_DIMENSIONS: usize = 3;

/// Number of features in an environment vector.
pub const ENVIRONMENT_DIMENSIONS: usize = 2;

/// Identifies which vector an input error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorKind {
    Behavioral,
    Environment,
}

impl VectorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Behavioral => "behavioral",
            Self::Environment => "environment",
        }
    }

    pub const fn dimensions(self) -> usize {
        match self {
            Self::Behavioral => BEHAVIORAL_DIMENSIONS,
            Self::Environment => ENVIRONMENT_DIMENSIONS,
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected input, reported before any evaluation takes place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{kind} vector must have {expected} components, got {actual}")]
    Dimension {
        kind: VectorKind,
        expected: usize,
        actual: usize,
    },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} {reason}")]
    OutOfRange { field: &'static str, reason: String },
    #[error("at least one profile is required")]
    NoProfiles,
    #[error("persona catalog must contain at least one persona")]
    EmptyPersonaSet,
    #[error("persona '{name}' appears more than once in the catalog")]
    DuplicatePersona { name: String },
}

/// Error raised by the simulation core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("no persona lies within distance {threshold} of the reference vector")]
    EmptyCluster { threshold: f64 },
}

fn ensure_finite(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInput::NonFinite { field })
    }
}

fn ensure_dimensions(kind: VectorKind, values: &[f64]) -> Result<(), InvalidInput> {
    if values.len() == kind.dimensions() {
        Ok(())
    } else {
        Err(InvalidInput::Dimension {
            kind,
            expected: kind.dimensions(),
            actual: values.len(),
        })
    }
}

/// Customer behavior on the canonical scale: risk-seeking and market
/// susceptibility in 0-100, income in raw currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehavioralVector {
    pub risk_seeking: f64,
    pub market_susceptibility: f64,
    pub income: f64,
}

impl BehavioralVector {
    pub const fn new(risk_seeking: f64, market_susceptibility: f64, income: f64) -> Self {
        Self {
            risk_seeking,
            market_susceptibility,
            income,
        }
    }

    /// Build a vector from sliders that report the first two features as 0-1 fractions.
    pub fn from_fractions(risk_seeking: f64, market_susceptibility: f64, income: f64) -> Self {
        Self::new(risk_seeking * 100.0, market_susceptibility * 100.0, income)
    }

    pub const fn components(&self) -> [f64; BEHAVIORAL_DIMENSIONS] {
        [self.risk_seeking, self.market_susceptibility, self.income]
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        ensure_finite("risk_seeking", self.risk_seeking)?;
        ensure_finite("market_susceptibility", self.market_susceptibility)?;
        ensure_finite("income", self.income)?;
        Ok(())
    }
}

impl TryFrom<&[f64]> for BehavioralVector {
    type Error = InvalidInput;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        ensure_dimensions(VectorKind::Behavioral, values)?;
        let vector = Self::new(values[0], values[1], values[2]);
        vector.validate()?;
        Ok(vector)
    }
}

/// Market conditions fed into the decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentVector {
    pub original_price: f64,
    pub price_change_percent: f64,
}

impl EnvironmentVector {
    pub const fn new(original_price: f64, price_change_percent: f64) -> Self {
        Self {
            original_price,
            price_change_percent,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        let price = ensure_finite("original_price", self.original_price)?;
        ensure_finite("price_change_percent", self.price_change_percent)?;
        if price <= 0.0 {
            return Err(InvalidInput::OutOfRange {
                field: "original_price",
                reason: format!("must be positive, got {price}"),
            });
        }
        Ok(())
    }
}

impl TryFrom<&[f64]> for EnvironmentVector {
    type Error = InvalidInput;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        ensure_dimensions(VectorKind::Environment, values)?;
        let environment = Self::new(values[0], values[1]);
        environment.validate()?;
        Ok(environment)
    }
}

/// Noisy variant of a persona, standing in for one simulated customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticProfile {
    pub persona: String,
    pub vector: BehavioralVector,
}

/// Binary purchase outcome for a single profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseDecision {
    NotBought,
    Bought,
}

impl PurchaseDecision {
    pub const fn from_bool(bought: bool) -> Self {
        if bought {
            Self::Bought
        } else {
            Self::NotBought
        }
    }

    pub const fn as_binary(self) -> u8 {
        match self {
            Self::NotBought => 0,
            Self::Bought => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotBought => "NOT_BOUGHT",
            Self::Bought => "BOUGHT",
        }
    }

    /// Verdict for a batch: a confidence of one half or more reads as a purchase.
    pub fn verdict(confidence: f64) -> Self {
        Self::from_bool(confidence >= 0.5)
    }
}

impl fmt::Display for PurchaseDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fraction of decisions that came out as a purchase; `None` for an empty batch.
pub fn confidence(decisions: &[PurchaseDecision]) -> Option<f64> {
    if decisions.is_empty() {
        return None;
    }
    let bought = decisions
        .iter()
        .filter(|decision| **decision == PurchaseDecision::Bought)
        .count();
    Some(bought as f64 / decisions.len() as f64)
}
