use std::sync::Arc;

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::simulation::{
    simulation_router, BehavioralVector, EnvironmentVector, GeneratorConfig, Persona, PersonaSet,
    SimulationService, SimulationSettings, SyntheticProfile,
};

pub(super) fn personas() -> PersonaSet {
    PersonaSet::new(vec![
        Persona::new("saver", BehavioralVector::new(10.0, 20.0, 40_000.0)),
        Persona::new("saver_twin", BehavioralVector::new(12.0, 22.0, 42_000.0)),
        Persona::new("mainstream", BehavioralVector::new(50.0, 50.0, 65_000.0)),
        Persona::new("thrill_seeker", BehavioralVector::new(90.0, 85.0, 150_000.0)),
    ])
    .expect("fixture catalog is valid")
}

pub(super) fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

pub(super) fn profile(risk: f64, market: f64, income: f64) -> SyntheticProfile {
    SyntheticProfile {
        persona: "fixture".to_string(),
        vector: BehavioralVector::new(risk, market, income),
    }
}

pub(super) fn flat_environment() -> EnvironmentVector {
    EnvironmentVector::new(100.0, 0.0)
}

pub(super) fn settings() -> SimulationSettings {
    SimulationSettings {
        sample_count: 12,
        seed: Some(11),
        generator: GeneratorConfig::default(),
    }
}

pub(super) fn build_service() -> SimulationService {
    SimulationService::new(Arc::new(personas()), settings())
}

pub(super) fn router() -> axum::Router {
    simulation_router(Arc::new(build_service()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
