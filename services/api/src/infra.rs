use metrics_exporter_prometheus::PrometheusHandle;
use purchase_sim::config::AppConfig;
use purchase_sim::error::AppError;
use purchase_sim::simulation::{PersonaSet, SimulationService};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the persona catalog from CSV when a path is given, otherwise fall
/// back to the bundled catalog.
pub(crate) fn load_personas(path: Option<&Path>) -> Result<PersonaSet, AppError> {
    match path {
        Some(path) => {
            let personas = PersonaSet::from_path(path)?;
            info!(path = %path.display(), personas = personas.len(), "persona catalog imported");
            Ok(personas)
        }
        None => Ok(PersonaSet::standard()),
    }
}

pub(crate) fn build_service(
    config: &AppConfig,
    personas_csv: Option<&Path>,
) -> Result<SimulationService, AppError> {
    let path = personas_csv.or(config.personas_csv.as_deref());
    let personas = load_personas(path)?;
    Ok(SimulationService::new(Arc::new(personas), config.simulation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_uses_bundled_catalog() {
        let personas = load_personas(None).expect("bundled catalog");
        assert_eq!(personas, PersonaSet::standard());
    }

    #[test]
    fn unreadable_catalog_is_reported() {
        let result = load_personas(Some(Path::new("does/not/exist.csv")));
        assert!(matches!(result, Err(AppError::Personas(_))));
    }
}
