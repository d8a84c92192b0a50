use std::path::{Path, PathBuf};

use linkx_codec::tokenizer::{TokenizerOptions, DEFAULT_MAX_TOKENS};
use serde::Deserialize;

use crate::error::DispatchError;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Persisted index resource read by `Dispatcher::from_config`.
    pub index_path: Option<PathBuf>,
    /// Walk the whole index once after loading it.
    pub verify_index: bool,
    pub max_tokens: usize,
    pub log_filter: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            verify_index: true,
            max_tokens: DEFAULT_MAX_TOKENS,
            log_filter: "info".to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, DispatchError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            max_tokens: self.max_tokens,
        }
    }
}
