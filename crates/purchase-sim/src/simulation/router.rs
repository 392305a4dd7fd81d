use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::personas::Persona;
use super::report::SimulationRequest;
use super::service::SimulationService;

/// Caller-supplied profiles to classify against one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub environment: Vec<f64>,
    pub profiles: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct PersonaCatalogView<'a> {
    total: usize,
    personas: Vec<&'a Persona>,
}

/// Router builder exposing the simulation endpoints.
pub fn simulation_router(service: Arc<SimulationService>) -> Router {
    Router::new()
        .route("/api/v1/personas", get(personas_handler))
        .route("/api/v1/simulations", post(simulate_handler))
        .route("/api/v1/decisions", post(decide_handler))
        .with_state(service)
}

pub(crate) async fn personas_handler(State(service): State<Arc<SimulationService>>) -> Response {
    let personas = service.personas();
    let view = PersonaCatalogView {
        total: personas.len(),
        personas: personas.iter().collect(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn simulate_handler(
    State(service): State<Arc<SimulationService>>,
    Json(request): Json<SimulationRequest>,
) -> Response {
    match service.simulate(&request) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn decide_handler(
    State(service): State<Arc<SimulationService>>,
    Json(request): Json<DecisionRequest>,
) -> Response {
    match service.decide(&request.environment, &request.profiles) {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
