use std::fs;

use cvd_agent::{
    config::ModelConfig,
    features::CML_CVD_FEATURES,
    inference::{FeatureRecord, ModelArtifacts},
};
use uuid::Uuid;

fn write_artifacts(body: &serde_json::Value) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("cvd-agent-artifacts-test-{}", Uuid::now_v7()));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    let path = dir.join("artifacts.json");
    fs::write(&path, serde_json::to_string_pretty(body).expect("json")).expect("artifacts file");
    path
}

#[test]
fn given_linear_artifacts_when_running_inference_then_contributions_follow_the_fitted_transforms() {
    let path = write_artifacts(&serde_json::json!({
        "feature_names": ["age", "glucose"],
        "imputer": { "statistics": [60.0, 100.0] },
        "scaler": { "mean": [50.0, 100.0], "scale": [10.0, 0.0] },
        "explainer": {
            "intercept": -1.0,
            "coefficients": [0.8, 0.5],
            "background": [0.0, 0.0]
        }
    }));

    let pipeline = ModelArtifacts::load(&path)
        .and_then(ModelArtifacts::into_pipeline)
        .expect("artifacts should build a pipeline");
    let result = pipeline
        .run_inference(FeatureRecord::new().with("age", 70.0).with_missing("glucose"))
        .expect("inference should succeed");

    // age: (70 - 50) / 10 = 2 -> 1.6; glucose imputed to 100, zero scale -> 0.
    assert!((result.contribution("age").unwrap() - 1.6).abs() < 1e-12);
    assert!(result.contribution("glucose").unwrap().abs() < 1e-12);
    assert!((result.base_value + 1.0).abs() < 1e-12);
    assert!((result.raw_score - 0.6).abs() < 1e-12);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn given_artifact_width_disagreeing_with_feature_names_when_loading_then_load_fails() {
    let path = write_artifacts(&serde_json::json!({
        "feature_names": ["age", "glucose"],
        "imputer": { "statistics": [60.0] },
        "scaler": { "mean": [50.0, 100.0], "scale": [10.0, 1.0] },
        "explainer": {
            "intercept": 0.0,
            "coefficients": [0.8, 0.5],
            "background": [0.0, 0.0]
        }
    }));

    let err = ModelArtifacts::load(&path).expect_err("width mismatch should fail");
    assert!(err.to_string().contains("imputer.statistics"));

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn given_cml_cvd_feature_names_when_building_pipeline_then_schema_keeps_trained_order() {
    let width = CML_CVD_FEATURES.len();
    let artifacts = ModelArtifacts {
        feature_names: CML_CVD_FEATURES.iter().map(|k| k.to_string()).collect(),
        imputer: cvd_agent::inference::MedianImputer {
            statistics: vec![0.0; width],
        },
        scaler: cvd_agent::inference::StandardScaler {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        },
        explainer: cvd_agent::inference::LinearExplainer {
            intercept: 0.0,
            coefficients: vec![0.1; width],
            background: vec![0.0; width],
        },
    };

    let pipeline = artifacts.into_pipeline().expect("pipeline should build");

    assert_eq!(pipeline.schema().keys()[0], "anchor_age");
    assert_eq!(pipeline.schema().keys()[width - 1], "ruxolitinib_dose");
}

#[test]
fn given_model_config_with_artifacts_path_when_loading_then_configured_file_builds_the_pipeline() {
    let path = write_artifacts(&serde_json::json!({
        "feature_names": ["age"],
        "imputer": { "statistics": [60.0] },
        "scaler": { "mean": [50.0], "scale": [10.0] },
        "explainer": { "intercept": 0.0, "coefficients": [1.0], "background": [0.0] }
    }));

    let artifacts = ModelArtifacts::from_config(&ModelConfig {
        artifacts_path: Some(path.clone()),
    })
    .expect("configured artifacts should load");
    assert_eq!(artifacts.feature_names, vec!["age"]);

    let missing = ModelArtifacts::from_config(&ModelConfig::default())
        .expect_err("no artifacts path configured");
    assert!(missing.to_string().contains("model.artifacts_path"));

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
