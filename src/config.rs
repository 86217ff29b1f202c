use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_collection() -> String {
    "legal_cases".to_string()
}

fn default_dimension() -> usize {
    768
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_llm_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_llm_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub logging: LoggingConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;

        // The generation API key may come from the environment instead of
        // the config file, matching how deployments keep it out of VCS.
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                config.llm.api_key = key;
            }
        }

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::CourtIqError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get the vector store base URL
    pub fn store_url(&self) -> String {
        format!("http://{}:{}", self.store.host, self.store.port)
    }

    /// Get the collection name
    pub fn collection(&self) -> &str {
        &self.store.collection
    }

    /// Get embedding dimensionality
    pub fn dimension(&self) -> usize {
        self.store.dimension
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM API key
    pub fn llm_key(&self) -> &str {
        &self.llm.api_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get maximum output tokens per generation call
    pub fn max_tokens(&self) -> u32 {
        self.llm.max_tokens
    }

    /// Get number of cases retrieved per query
    pub fn retrieval_limit(&self) -> usize {
        self.retrieval.limit
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                host: "localhost".to_string(),
                port: 19530,
                collection: default_collection(),
                dimension: default_dimension(),
            },
            llm: LlmConfig {
                endpoint: default_llm_endpoint(),
                api_key: String::new(),
                model: default_llm_model(),
                max_tokens: default_max_tokens(),
            },
            retrieval: RetrievalConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let toml_str = r#"
            [store]
            host = "milvus.internal"
            port = 19530

            [llm]
            api_key = "sk-test"

            [logging]
            level = "debug"
            backtrace = false
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.collection(), "legal_cases");
        assert_eq!(config.dimension(), 768);
        assert_eq!(config.retrieval_limit(), 2);
        assert_eq!(config.max_tokens(), 500);
        assert_eq!(config.llm_model(), "claude-3-haiku-20240307");
        assert_eq!(config.store_url(), "http://milvus.internal:19530");
    }

    #[test]
    fn test_from_file_round_trip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serialized.as_bytes()).unwrap();

        let loaded = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.store.host, config.store.host);
        assert_eq!(loaded.retrieval_limit(), config.retrieval_limit());
    }

    #[test]
    fn test_missing_store_section_is_an_error() {
        let toml_str = r#"
            [logging]
            level = "info"
            backtrace = true
        "#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }
}
