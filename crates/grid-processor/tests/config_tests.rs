//! Tests for engine configuration loading.

use grid_processor::{
    EngineConfig, GaussianInfo, GridTemplateShape, InterpMethod, NeighborhoodEngine,
    ProcessorError,
};
use std::io::Write;
use vx_common::{SingleThresh, ThreshOp};

#[test]
fn test_json_file_round_trip() {
    let config = EngineConfig {
        interp_method: InterpMethod::MaxGauss,
        width: 5,
        shape: GridTemplateShape::Circle,
        wrap_lon: true,
        vld_thresh: 0.5,
        threshold: SingleThresh::new(ThreshOp::Ge, 2.54),
        gaussian: GaussianInfo::new(50.0, 12.0, 3.0),
        west_longitude_positive: true,
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    config.to_json_file(&path).unwrap();

    let loaded = EngineConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_json_file_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ \"width\": ").unwrap();
    assert!(matches!(
        EngineConfig::from_json_file(file.path()),
        Err(ProcessorError::Json(_))
    ));

    assert!(matches!(
        EngineConfig::from_json_file("/nonexistent/engine.json"),
        Err(ProcessorError::Io(_))
    ));
}

const ENV_VARS: [&str; 8] = [
    "VX_INTERP_METHOD",
    "VX_INTERP_WIDTH",
    "VX_INTERP_SHAPE",
    "VX_THRESHOLD",
    "VX_VLD_THRESH",
    "VX_GAUSSIAN_RADIUS",
    "VX_GAUSSIAN_TRUNC",
    "VX_WEST_LONGITUDE_POSITIVE",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn assert_env_rejected(var: &str, value: &str) {
    std::env::set_var(var, value);
    match EngineConfig::from_env() {
        Err(ProcessorError::Config(msg)) => assert!(msg.contains(var), "{}", msg),
        other => panic!("{}={} gave {:?}", var, value, other),
    }
    assert!(matches!(
        NeighborhoodEngine::from_env(),
        Err(ProcessorError::Config(_))
    ));
    std::env::remove_var(var);
}

#[test]
fn test_from_env() {
    // the only test in this binary that touches the environment
    clear_env();
    assert_eq!(EngineConfig::from_env().unwrap(), EngineConfig::default());

    std::env::set_var("VX_INTERP_METHOD", "median");
    std::env::set_var("VX_INTERP_WIDTH", "7");
    std::env::set_var("VX_INTERP_SHAPE", "CIRCLE");
    std::env::set_var("VX_THRESHOLD", ">=10");
    std::env::set_var("VX_VLD_THRESH", "0.5");
    std::env::set_var("VX_WEST_LONGITUDE_POSITIVE", "true");

    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.interp_method, InterpMethod::Median);
    assert_eq!(config.width, 7);
    assert_eq!(config.shape, GridTemplateShape::Circle);
    assert_eq!(config.threshold, SingleThresh::new(ThreshOp::Ge, 10.0));
    assert_eq!(config.vld_thresh, 0.5);
    assert!(config.west_longitude_positive);

    let engine = NeighborhoodEngine::from_env().unwrap();
    assert_eq!(engine.template().unwrap().width(), 7);
    assert_eq!(engine.config().interp_method, InterpMethod::Median);
    clear_env();

    // set but unparseable values never fall back to the default
    assert_env_rejected("VX_INTERP_METHOD", "NOT_A_METHOD");
    assert_env_rejected("VX_INTERP_WIDTH", "three");
    assert_env_rejected("VX_INTERP_SHAPE", "TRIANGLE");
    assert_env_rejected("VX_VLD_THRESH", "not-a-number");
    assert_env_rejected("VX_THRESHOLD", "~5");
    assert_env_rejected("VX_GAUSSIAN_RADIUS", "far");
    assert_env_rejected("VX_GAUSSIAN_TRUNC", "");

    clear_env();
}
