use std::fs;
use std::path::PathBuf;

use pulse_assets::{load_assets, load_model, parse_scaler_str};
use pulse_core::{PatientObservation, Profile, PulseConfig, PulseError, Verdict};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

fn fixture_config() -> PulseConfig {
    PulseConfig {
        assets_dir: fixture_dir(),
        ..PulseConfig::default()
    }
}

#[test]
fn loads_fixture_pair_from_disk() {
    let predictor = load_assets(&fixture_config()).expect("assets load");

    assert_eq!(predictor.model().name.as_deref(), Some("lifepulse-fixture"));
    assert_eq!(predictor.model().reported_accuracy, Some(0.9935));
    assert_eq!(predictor.model().architecture(), "Neural Network (1 Hidden Layer)");
    assert_eq!(predictor.threshold(), 0.5);
}

#[test]
fn scaled_vector_matches_fitted_scaler() {
    let predictor = load_assets(&fixture_config()).expect("assets load");
    let features = predictor
        .feature_vector(&PatientObservation::profile(Profile::HighRisk))
        .expect("scaled");

    let expected = [
        1.165380374862183,
        1.0,
        0.0,
        1.620433789954337,
        1.0467144795503003,
        1.0,
        2.0,
        -2.1352173913043484,
        1.0,
        1.2170212765957447,
        1.0,
        2.0,
        1.0,
    ];
    for (idx, (actual, expected)) in features.iter().zip(expected).enumerate() {
        assert!(
            (actual - expected).abs() < 1e-12,
            "feature {idx}: {actual} != {expected}"
        );
    }
}

#[test]
fn fixture_probabilities_are_deterministic() {
    let predictor = load_assets(&fixture_config()).expect("assets load");

    let healthy = predictor
        .predict(&PatientObservation::profile(Profile::Healthy))
        .unwrap();
    let risk = predictor
        .predict(&PatientObservation::profile(Profile::HighRisk))
        .unwrap();
    let default = predictor.predict(&PatientObservation::default()).unwrap();

    assert!((healthy - 0.9934868619721966).abs() < 1e-9);
    assert!((risk - 2.1507271912167332e-05).abs() < 1e-9);
    assert!((default - 0.9985341167758565).abs() < 1e-9);

    let again = load_assets(&fixture_config()).expect("assets reload");
    assert_eq!(
        again
            .predict(&PatientObservation::profile(Profile::Healthy))
            .unwrap()
            .to_bits(),
        healthy.to_bits()
    );
}

#[test]
fn verdicts_follow_profiles() {
    let predictor = load_assets(&fixture_config()).expect("assets load");

    let healthy = predictor
        .assess(&PatientObservation::profile(Profile::Healthy))
        .unwrap();
    let risk = predictor
        .assess(&PatientObservation::profile(Profile::HighRisk))
        .unwrap();

    assert_eq!(healthy.verdict, Verdict::Healthy);
    assert_eq!(healthy.confidence_label(), "99.3%");
    assert_eq!(risk.verdict, Verdict::HighRisk);
    assert_eq!(risk.confidence_label(), "100.0%");
}

#[test]
fn missing_assets_are_reported_together() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let config = PulseConfig {
        assets_dir: tmp.path().to_path_buf(),
        ..PulseConfig::default()
    };

    match load_assets(&config) {
        Err(PulseError::AssetsMissing { paths }) => {
            assert_eq!(paths, vec![config.model_path(), config.scaler_path()]);
        }
        other => panic!("expected missing assets, got {other:?}"),
    }
}

#[test]
fn missing_scaler_alone_is_fatal() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    fs::copy(
        fixture_dir().join("heart_disease_nn_model.json"),
        tmp.path().join("heart_disease_nn_model.json"),
    )
    .expect("copy model");
    let config = PulseConfig {
        assets_dir: tmp.path().to_path_buf(),
        ..PulseConfig::default()
    };

    match load_assets(&config) {
        Err(PulseError::AssetsMissing { paths }) => {
            assert_eq!(paths, vec![config.scaler_path()]);
        }
        other => panic!("expected missing scaler, got {other:?}"),
    }
}

#[test]
fn malformed_model_names_the_file() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("model.json");
    fs::write(&path, r#"{"layers": "not a list"}"#).expect("write");

    match load_model(&path) {
        Err(PulseError::AssetUnreadable { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected unreadable asset, got {other:?}"),
    }
}

#[test]
fn scaler_with_unknown_kind_is_rejected() {
    let err = parse_scaler_str(
        r#"{"kind": "robust", "columns": [], "center": [], "scale": []}"#,
    )
    .unwrap_err();
    assert!(matches!(err, PulseError::InvalidAsset(_)));
}

#[test]
fn min_max_scaler_export_parses() {
    let scaler = parse_scaler_str(
        r#"{
            "kind": "min_max",
            "columns": ["age", "trestbps", "chol", "thalach", "oldpeak"],
            "min": [-0.3, -0.7, -0.2, -0.4, 0.0],
            "scale": [0.02, 0.008, 0.002, 0.006, 0.16]
        }"#,
    )
    .expect("min/max scaler");
    assert_eq!(scaler.columns().len(), 5);
}
