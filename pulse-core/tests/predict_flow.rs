use pulse_core::{
    Activation, DenseLayer, DenseModel, FeatureScaler, PatientObservation, Predictor, Profile,
    PulseConfig, PulseError, Verdict, SCALED_FEATURES,
};

fn reference_scaler() -> FeatureScaler {
    FeatureScaler::Standard {
        columns: SCALED_FEATURES.iter().map(|c| c.to_string()).collect(),
        mean: vec![50.0, 120.0, 200.0, 150.0, 1.0],
        scale: vec![10.0, 20.0, 50.0, 25.0, 0.5],
    }
}

fn logistic(weights: [f64; 13], bias: f64) -> DenseModel {
    DenseModel {
        name: Some("logistic".to_string()),
        features: None,
        reported_accuracy: None,
        layers: vec![DenseLayer {
            units: 1,
            activation: Activation::Sigmoid,
            kernel: weights.iter().map(|w| vec![*w]).collect(),
            bias: vec![bias],
        }],
    }
}

#[test]
fn scaled_vector_keeps_discrete_fields() {
    let predictor =
        Predictor::new(logistic([0.0; 13], 0.0), reference_scaler(), &PulseConfig::default())
            .expect("predictor");

    let observation = PatientObservation::profile(Profile::Healthy);
    let features = predictor.feature_vector(&observation).expect("scaled");

    assert_eq!(
        features,
        [0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.4, 0.0, -2.0, 0.0, 0.0, 1.0]
    );
}

#[test]
fn zero_logit_resolves_to_healthy() {
    let predictor =
        Predictor::new(logistic([0.0; 13], 0.0), reference_scaler(), &PulseConfig::default())
            .expect("predictor");

    let assessment = predictor
        .assess(&PatientObservation::profile(Profile::HighRisk))
        .expect("assessment");

    assert_eq!(assessment.probability, 0.5);
    assert_eq!(assessment.verdict, Verdict::Healthy);
}

#[test]
fn output_is_reproducible() {
    let mut weights = [0.0; 13];
    weights[0] = -0.8;
    weights[7] = 0.6;
    weights[8] = -1.1;
    let predictor = Predictor::new(logistic(weights, 0.3), reference_scaler(), &PulseConfig::default())
        .expect("predictor");
    let observation = PatientObservation::profile(Profile::HighRisk);

    let first = predictor.predict(&observation).unwrap();
    for _ in 0..10 {
        assert_eq!(predictor.predict(&observation).unwrap().to_bits(), first.to_bits());
    }
    assert!(first < 0.5);
}

#[test]
fn invalid_observation_never_reaches_model() {
    let predictor =
        Predictor::new(logistic([0.0; 13], 0.0), reference_scaler(), &PulseConfig::default())
            .expect("predictor");
    let observation = PatientObservation {
        thalach: 250,
        ..PatientObservation::default()
    };

    match predictor.predict(&observation) {
        Err(PulseError::Validation(violations)) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "thalach");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn linear_output_outside_unit_interval_is_an_inference_error() {
    let mut model = logistic([0.0; 13], 2.0);
    model.layers[0].activation = Activation::Linear;
    let predictor =
        Predictor::new(model, reference_scaler(), &PulseConfig::default()).expect("predictor");

    assert!(matches!(
        predictor.predict(&PatientObservation::default()),
        Err(PulseError::Inference(_))
    ));
}

#[test]
fn custom_threshold_is_respected() {
    let config = PulseConfig {
        risk_threshold: 0.6,
        ..PulseConfig::default()
    };
    let predictor =
        Predictor::new(logistic([0.0; 13], 0.0), reference_scaler(), &config).expect("predictor");

    let assessment = predictor.assess(&PatientObservation::default()).unwrap();
    assert_eq!(assessment.verdict, Verdict::HighRisk);
    assert_eq!(assessment.confidence, 0.5);
}
