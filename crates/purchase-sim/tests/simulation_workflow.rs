//! End-to-end scenarios for the purchase simulation: persona matching, profile
//! augmentation, and tree evaluation driven through the public service facade.

mod common {
    use std::sync::Arc;

    use purchase_sim::simulation::{
        GeneratorConfig, PersonaSet, SimulationService, SimulationSettings,
    };

    pub(super) fn quiet_settings() -> SimulationSettings {
        SimulationSettings {
            sample_count: 20,
            seed: Some(2024),
            generator: GeneratorConfig {
                stdev: 0.0,
                ..GeneratorConfig::default()
            },
        }
    }

    pub(super) fn standard_service(settings: SimulationSettings) -> SimulationService {
        SimulationService::new(Arc::new(PersonaSet::standard()), settings)
    }
}

use common::*;
use purchase_sim::simulation::{
    PurchaseDecision, ReferenceScale, SimulationError, SimulationRequest, SimulationSettings,
};

#[test]
fn balanced_household_buys_at_a_stable_price() {
    let service = standard_service(quiet_settings());
    let request = SimulationRequest::new(vec![50.0, 50.0, 64_000.0], vec![100.0, 0.0]);

    let report = service.simulate(&request).expect("simulation runs");

    assert_eq!(report.matched_personas.len(), 1);
    assert_eq!(report.matched_personas[0].name, "balanced_household");
    assert_eq!(report.total, 20);
    assert_eq!(report.confidence, 1.0);
    assert_eq!(report.confidence_percent(), 100);
    assert_eq!(report.verdict, PurchaseDecision::Bought);
}

#[test]
fn cautious_saver_passes_on_a_stable_price() {
    let service = standard_service(quiet_settings());
    let mut request = SimulationRequest::new(vec![0.12, 0.2, 42_000.0], vec![100.0, 0.0]);
    request.scale = ReferenceScale::Fraction;

    let report = service.simulate(&request).expect("simulation runs");

    assert_eq!(report.matched_personas[0].name, "cautious_saver");
    assert_eq!(report.confidence, 0.0);
    assert_eq!(report.verdict, PurchaseDecision::NotBought);
}

#[test]
fn wider_threshold_pulls_in_more_personas() {
    let service = standard_service(quiet_settings());
    let narrow = SimulationRequest::new(vec![50.0, 50.0, 64_000.0], vec![100.0, 0.0]);
    let mut wide = narrow.clone();
    wide.threshold = Some(0.5);

    let narrow_report = service.simulate(&narrow).expect("simulation runs");
    let wide_report = service.simulate(&wide).expect("simulation runs");

    assert!(wide_report.matched_personas.len() > narrow_report.matched_personas.len());
    assert_eq!(wide_report.total, 20);
    let allocated: usize = wide_report
        .matched_personas
        .iter()
        .map(|view| view.samples)
        .sum();
    assert_eq!(allocated, 20);
}

#[test]
fn noisy_runs_are_reproducible_with_a_seed() {
    let settings = SimulationSettings {
        seed: Some(5),
        ..SimulationSettings::default()
    };
    let service = standard_service(settings);
    let mut request = SimulationRequest::new(vec![60.0, 48.0, 80_000.0], vec![150.0, 12.0]);
    request.threshold = Some(0.4);
    request.include_profiles = true;

    let first = service.simulate(&request).expect("simulation runs");
    let second = service.simulate(&request).expect("simulation runs");

    assert_eq!(first.profiles, second.profiles);
    assert_eq!(first.confidence, second.confidence);
}

#[test]
fn isolated_reference_reports_empty_cluster() {
    let service = standard_service(quiet_settings());
    let request = SimulationRequest::new(vec![0.0, 100.0, 1_000_000.0], vec![100.0, 0.0]);

    let err = service.simulate(&request).expect_err("no persona nearby");

    assert!(matches!(err, SimulationError::EmptyCluster { .. }));
}

#[test]
fn direct_decisions_follow_the_tree() {
    let service = standard_service(quiet_settings());

    let batch = service
        .decide(
            &[100.0, 0.0],
            &[
                vec![10.0, 10.0, 10.0],
                vec![80.0, 80.0, 10.0],
                vec![0.0, 0.0, 200_000.0],
            ],
        )
        .expect("valid batch");

    assert_eq!(batch.binary(), vec![0, 1, 0]);
    assert!((batch.confidence - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(batch.verdict, PurchaseDecision::NotBought);

    let err = service
        .decide(&[100.0, 0.0], &[vec![10.0, 10.0]])
        .expect_err("short profile");
    assert!(matches!(err, SimulationError::InvalidInput(_)));
}
