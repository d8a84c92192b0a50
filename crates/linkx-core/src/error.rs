use linkx_codec::TokenizeError;
use linkx_dsa::{BuildError, IndexError};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The index bytes violate the format. Never returned for a plain miss.
    #[error("malformed match index: {0}")]
    MalformedIndex(#[from] IndexError),
    #[error("rejected template: {0}")]
    Template(#[from] BuildError),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("query has {count} tokens, more than the limit of {max}")]
    TooManyTokens { count: usize, max: usize },
    #[error("no index_path configured")]
    MissingIndexPath,
    #[error("index I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
