//! Tests for GraphConfig loading and validation.

use std::path::Path;

use figment::Jail;

use crate::config::{ConfigError, GraphConfig, DEFAULT_MAX_DEGREE};

#[test]
fn test_defaults() {
    let config = GraphConfig::default();
    assert_eq!(config.name, "nngraph");
    assert_eq!(config.max_degree, DEFAULT_MAX_DEGREE);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_overrides_defaults() {
    let config = GraphConfig::from_toml_str("max_degree = 16").unwrap();
    assert_eq!(config.name, "nngraph");
    assert_eq!(config.max_degree, 16);
}

#[test]
fn test_from_toml_str_rejects_zero_degree() {
    let result = GraphConfig::from_toml_str("max_degree = 0");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_from_toml_str_rejects_wrong_type() {
    let result = GraphConfig::from_toml_str("max_degree = \"many\"");
    assert!(matches!(result, Err(ConfigError::Extraction(_))));
}

#[test]
fn test_validate_rejects_newline_in_name() {
    let config = GraphConfig {
        name: "bad\nname".to_string(),
        max_degree: 4,
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_toml_roundtrip() {
    let config = GraphConfig {
        name: "metagenomes".to_string(),
        max_degree: 7,
    };
    let rendered = config.to_toml_string().unwrap();
    assert_eq!(GraphConfig::from_toml_str(&rendered).unwrap(), config);
}

#[test]
fn test_load_layers_file_then_env() {
    Jail::expect_with(|jail| {
        jail.create_file("nngraph.toml", "name = \"from-file\"\nmax_degree = 4")?;
        let config = GraphConfig::load(Some(Path::new("nngraph.toml"))).unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.max_degree, 4);

        jail.set_env("NNGRAPH_MAX_DEGREE", "12");
        let config = GraphConfig::load(Some(Path::new("nngraph.toml"))).unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.max_degree, 12);
        Ok(())
    });
}

#[test]
fn test_load_without_file_uses_defaults() {
    Jail::expect_with(|_jail| {
        let config = GraphConfig::load(None).unwrap();
        assert_eq!(config, GraphConfig::default());
        Ok(())
    });
}
