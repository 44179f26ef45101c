//! Configuration loading tests
//!
//! YAML files on disk through `BedrockConfig::from_file`, and building a
//! model from what was loaded.

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use bedrock_llm::{BedrockConfig, BedrockLlm, ProviderError, ProviderKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_from_yaml() {
        let file = write_config(
            r#"
model: anthropic.claude-v2
region: us-west-2
temperature: 0.7
max_tokens: 256
streaming: true
timeout_seconds: 30
"#,
        );

        let config = BedrockConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.model, "anthropic.claude-v2");
        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(256));
        assert!(config.streaming);
        assert_eq!(config.timeout_seconds, 30);

        let llm = BedrockLlm::new(config).unwrap();
        assert_eq!(llm.provider(), ProviderKind::Anthropic);
        assert_eq!(llm.region(), "us-west-2");
        assert!(llm.is_streaming());
    }

    #[tokio::test]
    async fn test_partial_yaml_uses_defaults() {
        let file = write_config("region: eu-central-1\n");

        let config = BedrockConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config, BedrockConfig::default().with_region("eu-central-1"));
    }

    #[tokio::test]
    async fn test_yaml_round_trip_of_saved_config() {
        let original = BedrockConfig::new("ai21.j2-mid")
            .with_region("us-east-1")
            .with_endpoint_url("http://localhost:4566");
        let file = write_config(&serde_yaml::to_string(&original).unwrap());

        assert_eq!(BedrockConfig::from_file(file.path()).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_invalid_yaml() {
        let file = write_config("model: [unterminated\n");

        let err = assert_err!(BedrockConfig::from_file(file.path()).await);
        assert!(matches!(err, ProviderError::Configuration { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[tokio::test]
    async fn test_invalid_values_rejected() {
        let file = write_config("timeout_seconds: 0\n");
        assert_err!(BedrockConfig::from_file(file.path()).await);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(BedrockConfig::from_file(dir.path().join("absent.yaml")).await);
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[tokio::test]
    async fn test_unknown_model_in_file() {
        let file = write_config("model: meta.llama2-13b-chat-v1\nregion: us-east-1\n");

        let config = BedrockConfig::from_file(file.path()).await.unwrap();
        let err = assert_err!(BedrockLlm::new(config));
        assert!(err.to_string().contains("only these are supported: ai21,anthropic,amazon"));
    }
}
