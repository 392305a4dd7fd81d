//! Persona matching, synthetic profile generation, and purchase decisions.
//!
//! A reference behavioral vector is matched against the persona catalog, the
//! matched personas are augmented into noisy synthetic profiles, and every
//! profile is classified by a fixed decision tree. The aggregate confidence
//! is the share of profiles that bought.

pub mod config;
pub mod domain;
pub mod evaluation;
pub mod generator;
pub mod metric;
pub mod personas;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{GeneratorConfig, SimulationSettings};
pub use domain::{
    confidence, BehavioralVector, EnvironmentVector, InvalidInput, PurchaseDecision,
    SimulationError, SyntheticProfile, VectorKind,
};
pub use evaluation::{DecisionBatch, DecisionEvaluator, DecisionTrace, Feature, SplitStep};
pub use generator::{PersonaMatch, ProfileGenerator};
pub use metric::DistanceMetric;
pub use personas::{Persona, PersonaImportError, PersonaSet};
pub use report::{
    PersonaMatchView, ProfileDecisionView, ReferenceScale, SimulationReport, SimulationRequest,
};
pub use router::{simulation_router, DecisionRequest};
pub use service::SimulationService;
