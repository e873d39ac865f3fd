//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;

    #[test]
    fn test_model_config_defaults() {
        let config: ModelConfig = toml::from_str("").unwrap();
        assert_eq!(config.sequence_length, 75);
        // One named hidden width; the original carried conflicting
        // defaults (100 vs 150) and 100 is what its endpoint used.
        assert_eq!(config.hidden_size, 100);
        assert!(config.bidirectional);
        assert_eq!(config.dropout, 0.1);
        assert_eq!(config.epochs, 50);
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_model_config_overrides() {
        let toml_str = r#"
sequence_length = 20
hidden_size = 16
bidirectional = false
epochs = 5
"#;
        let config: ModelConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sequence_length, 20);
        assert_eq!(config.hidden_size, 16);
        assert!(!config.bidirectional);
        assert_eq!(config.epochs, 5);
        // Untouched fields keep their defaults
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_server_config_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_provider_config_defaults() {
        let config: ProviderConfig = toml::from_str("").unwrap();
        assert_eq!(config.ticker_suffix, ".NS");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.base_url.starts_with("https://"));
    }

    #[test]
    fn test_consolidator_config_defaults() {
        let config: ConsolidatorConfig = toml::from_str("").unwrap();
        assert_eq!(config.mode, ConsolidatorMode::Random);
        assert_eq!(config.hidden1, 64);
        assert_eq!(config.hidden2, 32);
        assert_eq!(config.output_size, 1);
    }

    #[test]
    fn test_consolidator_static_mode() {
        let config: ConsolidatorConfig = toml::from_str(r#"mode = "static""#).unwrap();
        assert_eq!(config.mode, ConsolidatorMode::Static);
    }

    #[test]
    fn test_full_config_from_toml() {
        let toml_str = r#"
[server]
port = 9000

[provider]
ticker_suffix = ".BO"

[model]
hidden_size = 50

[consolidator]
mode = "static"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.provider.ticker_suffix, ".BO");
        assert_eq!(config.model.hidden_size, 50);
        assert_eq!(config.consolidator.mode, ConsolidatorMode::Static);
    }

    #[test]
    fn test_empty_config_is_complete() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.model.sequence_length, 75);
        assert_eq!(config.consolidator.mode, ConsolidatorMode::Random);
    }
}
