use std::path::Path;

use bytes::Bytes;
use linkx_codec::Tokenizer;
use linkx_dsa::{MatchIndex, MatchResult, QueryToken};

use crate::config::DispatchConfig;
use crate::error::DispatchError;

/// Resolves application URIs to registered templates.
///
/// Holds an immutable [`MatchIndex`]; cloning shares the underlying buffer, and
/// any number of threads may dispatch through the same instance concurrently.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    index: MatchIndex,
    tokenizer: Tokenizer,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(index: MatchIndex, config: DispatchConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config.tokenizer_options()),
            index,
            config,
        }
    }

    /// Loads the index resource named by `config.index_path`.
    ///
    /// With `verify_index` set the whole index is validated up front, so a
    /// corrupt resource fails here instead of on some later dispatch.
    pub fn from_config(config: DispatchConfig) -> Result<Self, DispatchError> {
        let path = config
            .index_path
            .clone()
            .ok_or(DispatchError::MissingIndexPath)?;
        let bytes = std::fs::read(&path)?;
        let index = MatchIndex::new(bytes)?;

        if config.verify_index {
            let stats = index.validate()?;
            tracing::info!(
                "Loaded match index from {} ({} bytes, {} templates, depth {})",
                path.display(),
                index.len(),
                stats.terminals,
                stats.max_depth
            );
        } else {
            tracing::info!(
                "Loaded match index from {} ({} bytes, unverified)",
                path.display(),
                index.len()
            );
        }
        Ok(Self::new(index, config))
    }

    /// Tokenizes `uri` and matches it against the index.
    ///
    /// `Ok(None)` means no template matches; callers fall through to other
    /// handling. An `Err` is either an unparsable URI or a corrupt index.
    pub fn dispatch(&self, uri: &str) -> Result<Option<MatchResult>, DispatchError> {
        let tokens = self.tokenizer.tokenize(uri)?;
        let result = self.dispatch_tokens(&tokens)?;
        match &result {
            Some(hit) => tracing::debug!(uri, match_id = hit.match_id, "dispatched"),
            None => tracing::debug!(uri, "no template matched"),
        }
        Ok(result)
    }

    /// Matches tokens produced by an external tokenizer.
    pub fn dispatch_tokens(
        &self,
        tokens: &[QueryToken],
    ) -> Result<Option<MatchResult>, DispatchError> {
        if tokens.len() > self.config.max_tokens {
            return Err(DispatchError::TooManyTokens {
                count: tokens.len(),
                max: self.config.max_tokens,
            });
        }
        self.index.match_tokens(tokens).map_err(|fault| {
            tracing::error!("Match index fault: {}", fault);
            DispatchError::from(fault)
        })
    }

    pub fn index(&self) -> &MatchIndex {
        &self.index
    }

    pub fn index_bytes(&self) -> Bytes {
        self.index.to_bytes()
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Writes the index buffer so it can be shipped as an application resource.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), DispatchError> {
        std::fs::write(path.as_ref(), self.index.as_bytes())?;
        tracing::info!("Persisted match index to {}", path.as_ref().display());
        Ok(())
    }
}
