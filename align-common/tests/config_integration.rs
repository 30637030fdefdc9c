/// Integration tests for configuration loading and saving
use align_common::{default_config, load_defaults, save_defaults, AlignerDefaults};
use tempfile::NamedTempFile;

#[test]
fn test_config_loads_partial_toml_with_defaults() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "epsilon = 0.01\n").unwrap();

    let config = load_defaults(file.path()).unwrap();
    assert_eq!(config.epsilon, 0.01);
    assert_eq!(config.gaps.open_internal_insertion, default_config().gaps.open_internal_insertion);
    assert_eq!(config.gaps.extend_right_deletion, default_config().gaps.extend_right_deletion);
}

#[test]
fn test_config_invalid_toml_fails() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "epsilon = \"not a number\"").unwrap();

    assert!(load_defaults(file.path()).is_err());
}

#[test]
fn test_config_round_trip_preserves_values() {
    let file = NamedTempFile::new().unwrap();
    let mut config = AlignerDefaults::default();
    config.epsilon = 1e-4;
    config.gaps.open_left_insertion = 12.5;
    config.gaps.open_right_deletion = 9.0;
    config.gaps.extend_internal_insertion = 2.5;

    save_defaults(file.path(), &config).unwrap();
    let reloaded = load_defaults(file.path()).unwrap();

    assert_eq!(reloaded.epsilon, config.epsilon);
    assert_eq!(reloaded.gaps.open_left_insertion, config.gaps.open_left_insertion);
    assert_eq!(reloaded.gaps.open_right_deletion, config.gaps.open_right_deletion);
    assert_eq!(reloaded.gaps.extend_internal_insertion, config.gaps.extend_internal_insertion);
}

#[test]
fn test_default_config_is_sane() {
    let config = default_config();
    assert!(config.epsilon > 0.0);
    assert!(config.gaps.open_internal_insertion > 0.0);
    assert!(config.gaps.extend_internal_insertion > 0.0);
}
