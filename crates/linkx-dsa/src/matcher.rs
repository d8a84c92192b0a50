use alloc::string::String;
use alloc::vec::Vec;

use crate::error::IndexError;
use crate::index::{Comparison, MatchIndex};
use crate::node::{NodeType, NO_MATCH_ID};

/// One typed component of a query URI.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryToken {
    pub node_type: NodeType,
    pub value: Vec<u8>,
}

impl QueryToken {
    pub fn new(node_type: NodeType, value: impl Into<Vec<u8>>) -> Self {
        Self {
            node_type,
            value: value.into(),
        }
    }
}

/// The template a query resolved to, with the values bound to its placeholders
/// in root-to-leaf order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub match_id: u16,
    pub placeholders: Vec<String>,
}

impl MatchIndex {
    /// Finds the first template whose components correspond one-to-one with
    /// `tokens`.
    ///
    /// Siblings are tried in stored order and the first terminal success wins,
    /// so precedence between a literal and a placeholder sibling is decided
    /// entirely by the index layout. The builder stores literals first.
    ///
    /// Returns `Ok(None)` when nothing matches. A structural violation met on
    /// the way is an error, never a silent miss.
    pub fn match_tokens(&self, tokens: &[QueryToken]) -> Result<Option<MatchResult>, IndexError> {
        if tokens.is_empty() {
            return Ok(None);
        }
        let Some(start) = self.children_start(0)? else {
            return Ok(None);
        };
        let boundary = self.boundary(0)?;

        // Token indices of the captured placeholders along the current path.
        // Truncated back to its snapshot whenever a branch fails, so a sibling
        // attempt never sees values captured by an abandoned branch.
        let mut captured = Vec::with_capacity(tokens.len());
        let found = self.match_siblings(tokens, 0, start, boundary, &mut captured)?;

        let result = found.map(|match_id| MatchResult {
            match_id,
            placeholders: captured
                .iter()
                .map(|&i| String::from_utf8_lossy(&tokens[i].value).into_owned())
                .collect(),
        });
        tracing::debug!(
            tokens = tokens.len(),
            matched = ?result.as_ref().map(|r| r.match_id),
            "match"
        );
        Ok(result)
    }

    fn match_siblings(
        &self,
        tokens: &[QueryToken],
        depth: usize,
        mut pos: usize,
        parent_boundary: usize,
        captured: &mut Vec<usize>,
    ) -> Result<Option<u16>, IndexError> {
        let token = &tokens[depth];
        loop {
            let end = self.boundary(pos)?;
            if end > parent_boundary {
                tracing::error!(
                    pos,
                    end,
                    boundary = parent_boundary,
                    "malformed match index: node overruns its parent"
                );
                return Err(IndexError::SiblingOverrun {
                    pos,
                    end,
                    boundary: parent_boundary,
                });
            }

            let comparison = self.compare(pos, token.node_type, &token.value)?;
            tracing::trace!(depth, pos, ?comparison, "compare");

            if comparison != Comparison::NotEqual {
                let snapshot = captured.len();
                if comparison == Comparison::Placeholder {
                    captured.push(depth);
                }
                if let Some(match_id) = self.descend(tokens, depth, pos, end, captured)? {
                    return Ok(Some(match_id));
                }
                captured.truncate(snapshot);
            }

            if end == parent_boundary {
                return Ok(None);
            }
            pos = end;
        }
    }

    fn descend(
        &self,
        tokens: &[QueryToken],
        depth: usize,
        pos: usize,
        end: usize,
        captured: &mut Vec<usize>,
    ) -> Result<Option<u16>, IndexError> {
        if depth + 1 == tokens.len() {
            let match_id = self.match_id(pos)?;
            return Ok((match_id != NO_MATCH_ID).then_some(match_id));
        }
        match self.children_start(pos)? {
            Some(start) => self.match_siblings(tokens, depth + 1, start, end, captured),
            None => Ok(None),
        }
    }
}


#[cfg(kani)]
mod proofs {
    use super::*;

    #[kani::proof]
    #[kani::unwind(8)]
    fn prove_match_is_total() {
        let raw: [u8; 24] = kani::any();
        // Formally prove that arbitrary bytes either fail construction or
        // produce a typed result; no read escapes the buffer.
        if let Ok(index) = MatchIndex::new(Vec::from(raw)) {
            let tokens = [QueryToken::new(NodeType::Scheme, alloc::vec![b'a'])];
            let _ = index.match_tokens(&tokens);
        }
    }
}
