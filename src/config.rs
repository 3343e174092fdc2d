use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_QUESTION_COUNT: usize = 7;
const DEFAULT_TRUE_FALSE_BIAS: f64 = 0.7;
const DEFAULT_SUMMARY_MAX_CHUNKS: usize = 5;
const DEFAULT_SUMMARY_TARGET_WORDS: usize = 500;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the study guide server and CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Backend used for condensation and free-text generation.
    pub generation_provider: GenerationProvider,
    /// Optional Ollama base URL (defaults to the local runtime).
    pub ollama_url: Option<String>,
    /// Model used for per-chunk condensation.
    pub summarization_model: String,
    /// Model used to expand short summaries.
    pub generation_model: String,
    /// Number of questions generated per requested type.
    pub question_count: usize,
    /// Probability that a true/false item is emitted as a true statement.
    pub true_false_bias: f64,
    /// Shuffle multiple-choice options instead of always keying option A.
    pub shuffle_choices: bool,
    /// Fixed RNG seed; entropy is used when absent.
    pub generation_seed: Option<u64>,
    /// Maximum number of chunks condensed per summary.
    pub summary_max_chunks: usize,
    /// Word count below which a summary is expanded.
    pub summary_target_words: usize,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

/// Supported backends for the generation capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    /// Deterministic extractive condensation, no free-text generation.
    #[default]
    None,
    /// Local Ollama runtime.
    Ollama,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            generation_provider: GenerationProvider::None,
            ollama_url: None,
            summarization_model: DEFAULT_MODEL.to_string(),
            generation_model: DEFAULT_MODEL.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
            true_false_bias: DEFAULT_TRUE_FALSE_BIAS,
            shuffle_choices: false,
            generation_seed: None,
            summary_max_chunks: DEFAULT_SUMMARY_MAX_CHUNKS,
            summary_target_words: DEFAULT_SUMMARY_TARGET_WORDS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let question_count = parse_optional("QUESTION_COUNT")?.unwrap_or(defaults.question_count);
        if question_count == 0 {
            return Err(ConfigError::InvalidValue("QUESTION_COUNT".into()));
        }
        let true_false_bias: f64 =
            parse_optional("TRUE_FALSE_BIAS")?.unwrap_or(defaults.true_false_bias);
        if !(0.0..=1.0).contains(&true_false_bias) {
            return Err(ConfigError::InvalidValue("TRUE_FALSE_BIAS".into()));
        }
        let summary_max_chunks =
            parse_optional("SUMMARY_MAX_CHUNKS")?.unwrap_or(defaults.summary_max_chunks);
        if summary_max_chunks == 0 {
            return Err(ConfigError::InvalidValue("SUMMARY_MAX_CHUNKS".into()));
        }

        Ok(Self {
            server_port: parse_optional("SERVER_PORT")?,
            generation_provider: load_env_optional("GENERATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("GENERATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or_default(),
            ollama_url: load_env_optional("OLLAMA_URL"),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or(defaults.summarization_model),
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            question_count,
            true_false_bias,
            shuffle_choices: load_env_optional("SHUFFLE_CHOICES")
                .map(|value| {
                    parse_flag(&value)
                        .ok_or_else(|| ConfigError::InvalidValue("SHUFFLE_CHOICES".into()))
                })
                .transpose()?
                .unwrap_or(defaults.shuffle_choices),
            generation_seed: parse_optional("GENERATION_SEED")?,
            summary_max_chunks,
            summary_target_words: parse_optional("SUMMARY_TARGET_WORDS")?
                .unwrap_or(defaults.summary_target_words),
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl FromStr for GenerationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "extractive" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        server_port = ?config.server_port,
        generation_provider = ?config.generation_provider,
        question_count = config.question_count,
        shuffle_choices = config.shuffle_choices,
        seeded = config.generation_seed.is_some(),
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_known_values() {
        assert_eq!(
            "Ollama".parse::<GenerationProvider>(),
            Ok(GenerationProvider::Ollama)
        );
        assert_eq!(
            "none".parse::<GenerationProvider>(),
            Ok(GenerationProvider::None)
        );
        assert_eq!(
            "extractive".parse::<GenerationProvider>(),
            Ok(GenerationProvider::None)
        );
        assert!("openai".parse::<GenerationProvider>().is_err());
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.question_count, 7);
        assert_eq!(config.summary_max_chunks, 5);
        assert_eq!(config.summary_target_words, 500);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.shuffle_choices);
        assert_eq!(config.generation_provider, GenerationProvider::None);
    }
}
