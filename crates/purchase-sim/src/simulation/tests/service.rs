use super::common::*;

use crate::simulation::{
    InvalidInput, PurchaseDecision, ReferenceScale, SimulationError, SimulationRequest,
};

fn saver_request() -> SimulationRequest {
    SimulationRequest::new(vec![10.0, 20.0, 40_000.0], vec![100.0, 0.0])
}

#[test]
fn configured_sample_count_is_split_across_the_cluster() {
    let service = build_service();

    let report = service.simulate(&saver_request()).expect("simulation runs");

    assert_eq!(report.total, 12);
    let samples: Vec<_> = report
        .matched_personas
        .iter()
        .map(|view| (view.name.as_str(), view.samples))
        .collect();
    assert_eq!(samples, vec![("saver", 6), ("saver_twin", 6)]);
    assert_eq!(
        report
            .matched_personas
            .iter()
            .map(|view| view.bought)
            .sum::<usize>(),
        report.bought
    );
}

#[test]
fn confidence_matches_the_share_that_bought() {
    let service = build_service();

    let report = service.simulate(&saver_request()).expect("simulation runs");

    assert_eq!(report.confidence, report.bought as f64 / report.total as f64);
    assert_eq!(report.verdict, PurchaseDecision::verdict(report.confidence));
}

#[test]
fn configured_seed_makes_runs_repeatable() {
    let service = build_service();

    let first = service.simulate(&saver_request()).expect("simulation runs");
    let second = service.simulate(&saver_request()).expect("simulation runs");

    assert_eq!(first.seed, Some(11));
    assert_eq!(first.matched_personas, second.matched_personas);
    assert_eq!(first.confidence, second.confidence);
}

#[test]
fn request_overrides_take_precedence() {
    let service = build_service();
    let mut request = saver_request();
    request.count = Some(3);
    request.seed = Some(99);
    request.stdev = Some(0.0);

    let report = service.simulate(&request).expect("simulation runs");

    assert_eq!(report.total, 3);
    assert_eq!(report.seed, Some(99));
    assert_eq!(report.stdev, 0.0);
    // Both savers sit below the risk split on a stable price.
    assert_eq!(report.bought, 0);
    assert_eq!(report.verdict, PurchaseDecision::NotBought);
}

#[test]
fn fraction_scale_is_converted_to_percent() {
    let service = build_service();
    let mut request = SimulationRequest::new(vec![0.1, 0.2, 40_000.0], vec![100.0, 0.0]);
    request.scale = ReferenceScale::Fraction;

    let report = service.simulate(&request).expect("simulation runs");

    assert!((report.reference.risk_seeking - 10.0).abs() < 1e-9);
    assert!((report.reference.market_susceptibility - 20.0).abs() < 1e-9);
    assert_eq!(report.matched_personas.len(), 2);
}

#[test]
fn unmatched_reference_surfaces_empty_cluster() {
    let service = build_service();
    let request = SimulationRequest::new(vec![100.0, 0.0, 500_000.0], vec![100.0, 0.0]);

    let err = service.simulate(&request).expect_err("no persona nearby");

    assert_eq!(err, SimulationError::EmptyCluster { threshold: 0.1 });
}

#[test]
fn malformed_environment_is_rejected() {
    let service = build_service();
    let request = SimulationRequest::new(vec![10.0, 20.0, 40_000.0], vec![0.0, 5.0]);

    let err = service.simulate(&request).expect_err("price must be positive");

    assert!(matches!(
        err,
        SimulationError::InvalidInput(InvalidInput::OutOfRange {
            field: "original_price",
            ..
        })
    ));
}

#[test]
fn included_profiles_carry_reasoning() {
    let service = build_service();
    let mut request = saver_request();
    request.include_profiles = true;

    let report = service.simulate(&request).expect("simulation runs");

    let profiles = report.profiles.expect("profiles requested");
    assert_eq!(profiles.len(), 12);
    for view in &profiles {
        assert!(view.reasoning.starts_with(view.decision.label()));
    }
}

#[test]
fn profiles_are_omitted_unless_requested() {
    let report = build_service()
        .simulate(&saver_request())
        .expect("simulation runs");

    assert!(report.profiles.is_none());
}

#[test]
fn decide_classifies_supplied_profiles() {
    let service = build_service();

    let batch = service
        .decide(
            &[100.0, 0.0],
            &[vec![10.0, 10.0, 10.0], vec![80.0, 80.0, 10.0]],
        )
        .expect("valid batch");

    assert_eq!(batch.binary(), vec![0, 1]);
    assert_eq!(batch.confidence, 0.5);
}

#[test]
fn oversized_count_is_rejected() {
    let service = build_service();
    let mut request = saver_request();
    request.count = Some(usize::MAX / 2);

    let err = service.simulate(&request).expect_err("count is capped");

    assert!(matches!(
        err,
        SimulationError::InvalidInput(InvalidInput::OutOfRange { field: "count", .. })
    ));
}

#[test]
fn invalid_threshold_is_rejected_before_matching() {
    let service = build_service();
    let mut request = saver_request();
    request.threshold = Some(f64::NAN);

    let err = service.simulate(&request).expect_err("threshold must be finite");

    assert!(matches!(
        err,
        SimulationError::InvalidInput(InvalidInput::NonFinite { field: "threshold" })
    ));
}

#[test]
fn persona_views_account_for_every_sample() {
    let service = build_service();
    let mut request = saver_request();
    request.count = Some(7);

    let report = service.simulate(&request).expect("simulation runs");

    let allocated: usize = report
        .matched_personas
        .iter()
        .map(|view| view.samples)
        .sum();
    assert_eq!(allocated, report.total);
    assert_eq!(report.matched_personas[0].samples, 4);
}
