//! End-to-end planning-session flow against the bundled catalog and the
//! synthetic calculator.

use std::path::PathBuf;

use gentso_rust::archive::bundled::BundledArchive;
use gentso_rust::archive::ExoplanetArchive;
use gentso_rust::calculator::synthetic::SyntheticCalculator;
use gentso_rust::models::{
    Instrument, InstrumentConfig, ObservationType, SedModel,
};
use gentso_rust::services::{self, orchestrator, SimulationError};
use gentso_rust::session::{Session, SessionError};

fn repo_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn bundled_archive() -> BundledArchive {
    BundledArchive::from_dir(&repo_data_dir()).expect("Failed to load bundled catalog")
}

fn nirspec_g395h() -> InstrumentConfig {
    InstrumentConfig {
        instrument: Some(Instrument::Nirspec),
        disperser: Some("G395H".to_string()),
        filter: Some("F290LP".to_string()),
        subarray: Some("SUB2048".to_string()),
        readout: Some("NRSRAPID".to_string()),
        groups: Some(4),
        integrations: None,
        saturation: None,
    }
}

/// The canonical walkthrough: resolve WASP-39 b, configure a PHOENIX
/// transit for six hours, and simulate.
#[tokio::test]
async fn test_wasp39b_transit_walkthrough() {
    let archive = bundled_archive();
    let session = Session::new();

    // Resolve and load the target
    let resolved = services::resolve_target(&archive, "WASP-39 b").await.unwrap();
    assert_eq!(resolved.target.teff, Some(5400.0));
    assert!(resolved.provenance.has_jwst_observations);
    session.load_target(resolved.target);

    // Configure the scene
    session.set_sed(SedModel::Phoenix).unwrap();
    session.set_observation(ObservationType::Transit);
    session.set_duration(6.0).unwrap();

    // Configure the instrument and match integrations to the duration
    session.configure_instrument(nirspec_g395h()).unwrap();
    let integrations = session.set_match_duration(true).unwrap().unwrap();
    assert!(integrations > 0);

    // Simulate
    let calculator = SyntheticCalculator::new();
    let run = orchestrator::run(&session, &calculator).await.unwrap();

    assert!(!run.spectrum.wavelength.is_empty());
    assert!(!run.spectrum.depth.is_empty());
    assert!(!run.sn_curve.snr.is_empty());
    assert!(run.sn_curve.snr.iter().all(|&s| s > 0.0));
    assert_eq!(run.scene.target.name, "WASP-39 b");
    assert_eq!(run.instrument.integrations, integrations);
    assert_eq!(session.run_count(), 1);
}

#[tokio::test]
async fn test_sed_choice_requires_resolved_target() {
    let session = Session::new();
    let err = session.set_sed(SedModel::Phoenix).unwrap_err();
    assert!(matches!(err, SessionError::InvalidState(_)));
}

#[tokio::test]
async fn test_incomplete_configurations_never_record_runs() {
    let archive = bundled_archive();
    let calculator = SyntheticCalculator::new();

    // Missing everything
    let session = Session::new();
    assert!(matches!(
        orchestrator::run(&session, &calculator).await.unwrap_err(),
        SimulationError::Session(SessionError::IncompleteConfig { .. })
    ));

    // Target only
    let target = archive.resolve("WASP-80 b").await.unwrap();
    session.load_target(target);
    assert!(matches!(
        orchestrator::run(&session, &calculator).await.unwrap_err(),
        SimulationError::Session(SessionError::IncompleteConfig { .. })
    ));

    // Scene complete, instrument missing integrations
    session.set_sed(SedModel::Phoenix).unwrap();
    session.set_observation(ObservationType::Transit);
    session.set_duration(5.0).unwrap();
    session.configure_instrument(nirspec_g395h()).unwrap();
    let err = orchestrator::run(&session, &calculator).await.unwrap_err();
    match err {
        SimulationError::Session(SessionError::IncompleteConfig { missing }) => {
            assert_eq!(missing, vec!["integrations".to_string()]);
        }
        other => panic!("expected IncompleteConfig, got {:?}", other),
    }

    assert_eq!(session.run_count(), 0, "no partial run may be recorded");
}

#[tokio::test]
async fn test_run_history_preserves_completion_order() {
    let archive = bundled_archive();
    let calculator = SyntheticCalculator::new();
    let session = Session::new();

    let target = archive.resolve("WASP-69 b").await.unwrap();
    session.load_target(target);
    session.set_sed(SedModel::Phoenix).unwrap();
    session.set_observation(ObservationType::Transit);
    session.set_duration(4.0).unwrap();
    let mut config = nirspec_g395h();
    config.integrations = Some(200);
    session.configure_instrument(config.clone()).unwrap();

    let run1 = orchestrator::run(&session, &calculator).await.unwrap();

    // A different configuration for the second run
    config.groups = Some(6);
    session.configure_instrument(config).unwrap();
    let run2 = orchestrator::run(&session, &calculator).await.unwrap();

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, run1.id);
    assert_eq!(history[1].id, run2.id);
    assert!(history[0].id < history[1].id);
    assert_ne!(run1.key, run2.key);
}

#[tokio::test]
async fn test_match_integrations_toggle_is_idempotent() {
    let archive = bundled_archive();
    let session = Session::new();
    let target = archive.resolve("GJ 486 b").await.unwrap();
    session.load_target(target);
    session.set_sed(SedModel::Phoenix).unwrap();
    session.set_observation(ObservationType::Eclipse);
    session.set_duration(3.5).unwrap();
    session.configure_instrument(nirspec_g395h()).unwrap();

    let first = session.set_match_duration(true).unwrap();
    let second = session.set_match_duration(true).unwrap();
    assert_eq!(first, second);

    // Duration times integrations stays within one integration of the
    // request
    let integrations = first.unwrap() as f64;
    let t_int = 5.0 * 0.902;
    assert!((integrations * t_int - 3.5 * 3600.0).abs() <= t_int);
}

#[tokio::test]
async fn test_saturation_advisory_flow() {
    let archive = bundled_archive();
    let calculator = SyntheticCalculator::new();
    let session = Session::new();

    // 55 Cnc is very bright: the advisory should flag the ramp
    let target = archive.resolve("55 Cnc e").await.unwrap();
    session.load_target(target);
    session.set_sed(SedModel::Kurucz).unwrap();
    session.set_observation(ObservationType::Eclipse);
    session.set_duration(4.0).unwrap();
    session.configure_instrument(nirspec_g395h()).unwrap();

    let level = services::check_saturation(&session, &calculator).await.unwrap();
    assert!(level.is_saturated());

    // Advisory only: the session is untouched until the caller records it
    assert!(session.instrument().saturation.is_none());
    session.record_saturation(level);
    assert_eq!(session.instrument().saturation, Some(level));
    assert_eq!(session.run_count(), 0);
}

#[tokio::test]
async fn test_uploaded_spectrum_feeds_the_simulation() {
    let archive = bundled_archive();
    let calculator = SyntheticCalculator::new();
    let session = Session::new();

    let target = archive.resolve("WASP-80 b").await.unwrap();
    session.load_target(target);
    session.set_sed(SedModel::Phoenix).unwrap();
    session.set_observation(ObservationType::Transit);
    session.set_duration(5.0).unwrap();
    let mut config = nirspec_g395h();
    config.integrations = Some(100);
    session.configure_instrument(config).unwrap();

    let spectrum = gentso_rust::models::read_spectrum_file(
        &repo_data_dir().join("models").join("wasp80b_transit.dat"),
    )
    .unwrap();
    session.set_spectrum(spectrum);

    let run = orchestrator::run(&session, &calculator).await.unwrap();
    // Depths come from the model file, not a flat floor
    let min = run.spectrum.depth.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = run.spectrum.depth.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(min >= 0.029, "min depth {}", min);
    assert!(max <= 0.0297, "max depth {}", max);
    assert!(max > min);
}
