mod tree;

pub use tree::{Feature, SplitStep};

use super::domain::{
    confidence, BehavioralVector, EnvironmentVector, InvalidInput, PurchaseDecision,
    SimulationError, SyntheticProfile,
};
use serde::{Deserialize, Serialize};
use tree::{walk, FeatureRow, Node, PURCHASE_TREE};

/// Stateless evaluator that walks the purchase tree for each profile.
pub struct DecisionEvaluator {
    tree: &'static Node,
}

impl Default for DecisionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionEvaluator {
    pub fn new() -> Self {
        Self {
            tree: &PURCHASE_TREE,
        }
    }

    /// Classify a single profile. Inputs are validated first.
    pub fn decide(
        &self,
        environment: &EnvironmentVector,
        profile: &BehavioralVector,
    ) -> Result<PurchaseDecision, SimulationError> {
        environment.validate()?;
        profile.validate()?;
        Ok(walk(self.tree, &FeatureRow::new(environment, profile), None))
    }

    /// Classify every profile against the same environment, preserving order.
    pub fn evaluate(
        &self,
        environment: &EnvironmentVector,
        profiles: &[SyntheticProfile],
    ) -> Result<Vec<PurchaseDecision>, SimulationError> {
        environment.validate()?;
        profiles
            .iter()
            .map(|profile| -> Result<PurchaseDecision, SimulationError> {
                profile.vector.validate()?;
                Ok(walk(
                    self.tree,
                    &FeatureRow::new(environment, &profile.vector),
                    None,
                ))
            })
            .collect()
    }

    /// Entry point for untyped input such as a JSON payload; dimensions are
    /// checked before anything is evaluated.
    pub fn evaluate_raw(
        &self,
        environment: &[f64],
        profiles: &[Vec<f64>],
    ) -> Result<DecisionBatch, SimulationError> {
        let environment = EnvironmentVector::try_from(environment)?;
        if profiles.is_empty() {
            return Err(InvalidInput::NoProfiles.into());
        }
        let vectors = profiles
            .iter()
            .map(|values| BehavioralVector::try_from(values.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;

        let decisions = vectors
            .iter()
            .map(|vector| walk(self.tree, &FeatureRow::new(&environment, vector), None))
            .collect();

        DecisionBatch::from_decisions(decisions)
            .ok_or_else(|| SimulationError::from(InvalidInput::NoProfiles))
    }

    /// Classify a profile and record the splits that led to the decision.
    pub fn explain(
        &self,
        environment: &EnvironmentVector,
        profile: &BehavioralVector,
    ) -> Result<DecisionTrace, SimulationError> {
        environment.validate()?;
        profile.validate()?;
        let mut steps = Vec::new();
        let decision = walk(
            self.tree,
            &FeatureRow::new(environment, profile),
            Some(&mut steps),
        );
        Ok(DecisionTrace { decision, steps })
    }
}

/// Decision together with the path taken through the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub decision: PurchaseDecision,
    pub steps: Vec<SplitStep>,
}

impl DecisionTrace {
    pub fn reasoning(&self) -> String {
        let path: Vec<String> = self.steps.iter().map(SplitStep::describe).collect();
        format!("{} because {}", self.decision.label(), path.join(", "))
    }
}

/// Non-empty set of decisions with its aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBatch {
    pub decisions: Vec<PurchaseDecision>,
    pub bought: usize,
    pub total: usize,
    pub confidence: f64,
    pub verdict: PurchaseDecision,
}

impl DecisionBatch {
    pub fn from_decisions(decisions: Vec<PurchaseDecision>) -> Option<Self> {
        let confidence = confidence(&decisions)?;
        let bought = decisions
            .iter()
            .filter(|decision| **decision == PurchaseDecision::Bought)
            .count();
        Some(Self {
            total: decisions.len(),
            bought,
            confidence,
            verdict: PurchaseDecision::verdict(confidence),
            decisions,
        })
    }

    /// Binary view (0 = not bought, 1 = bought) in input order.
    pub fn binary(&self) -> Vec<u8> {
        self.decisions
            .iter()
            .map(|decision| decision.as_binary())
            .collect()
    }
}
