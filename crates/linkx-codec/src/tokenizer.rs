use linkx_dsa::{NodeType, QueryToken};
use url::Url;

/// Default bound on the number of tokens a single URI may produce.
pub const DEFAULT_MAX_TOKENS: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("invalid URI: {0}")]
    Parse(#[from] url::ParseError),
    #[error("URI has no host")]
    MissingHost,
    #[error("URI produces {count} tokens, more than the limit of {max}")]
    TooManyTokens { count: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Upper bound on tokens per URI. Also bounds the matcher's recursion depth.
    pub max_tokens: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Splits a URI into the ordered, typed tokens the match index is keyed on.
///
/// Token order is scheme, username, password, host, port, path segments,
/// query pairs, fragment. Optional components are omitted when absent, and a
/// port equal to the scheme's default counts as absent. Values keep their
/// percent-encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    options: TokenizerOptions,
}

impl Tokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    pub fn tokenize(&self, uri: &str) -> Result<Vec<QueryToken>, TokenizeError> {
        let url = Url::parse(uri)?;
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or(TokenizeError::MissingHost)?;

        let mut tokens = Vec::new();
        tokens.push(QueryToken::new(NodeType::Scheme, url.scheme()));
        if !url.username().is_empty() {
            tokens.push(QueryToken::new(NodeType::Username, url.username()));
        }
        if let Some(password) = url.password() {
            tokens.push(QueryToken::new(NodeType::Password, password));
        }
        tokens.push(QueryToken::new(NodeType::Host, host));
        if let Some(port) = url.port() {
            tokens.push(QueryToken::new(NodeType::Port, port.to_string()));
        }

        // Empty segments come from "//" runs and trailing slashes.
        if let Some(segments) = url.path_segments() {
            tokens.extend(
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| QueryToken::new(NodeType::PathSegment, segment)),
            );
        }

        // Pairs are sorted so that parameter order in the URI does not matter.
        if let Some(query) = url.query() {
            let mut pairs: Vec<Vec<u8>> = query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(normalize_pair)
                .collect();
            pairs.sort();
            tokens.extend(
                pairs
                    .into_iter()
                    .map(|pair| QueryToken::new(NodeType::QueryNameValue, pair)),
            );
        }

        if let Some(fragment) = url.fragment().filter(|fragment| !fragment.is_empty()) {
            tokens.push(QueryToken::new(NodeType::Fragment, fragment));
        }

        if tokens.len() > self.options.max_tokens {
            return Err(TokenizeError::TooManyTokens {
                count: tokens.len(),
                max: self.options.max_tokens,
            });
        }
        tracing::trace!(uri, tokens = tokens.len(), "tokenized");
        Ok(tokens)
    }
}

/// A bare `name` becomes `name=`.
fn normalize_pair(pair: &str) -> Vec<u8> {
    let mut encoded = pair.as_bytes().to_vec();
    if !pair.contains('=') {
        encoded.push(b'=');
    }
    encoded
}

/// Tokenizes with default options.
pub fn tokenize(uri: &str) -> Result<Vec<QueryToken>, TokenizeError> {
    Tokenizer::default().tokenize(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_query_name_gets_empty_value() {
        assert_eq!(normalize_pair("flag"), b"flag=".to_vec());
        assert_eq!(normalize_pair("a=b=c"), b"a=b=c".to_vec());
    }
}
