use alloc::vec::Vec;
use core::fmt;

use bytes::Bytes;

use crate::error::IndexError;
use crate::node::{
    NodeType, CHILDREN_SPAN_OFFSET, HEADER_LEN, MATCH_ID_OFFSET, NO_MATCH_ID, PLACEHOLDER,
    ROOT_VALUE, VALUE_LEN_OFFSET,
};

/// Outcome of comparing one node against one query token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Placeholder,
    NotEqual,
}

/// Summary produced by [`MatchIndex::validate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Nodes in the index, root included.
    pub nodes: usize,
    /// Nodes on which some template terminates.
    pub terminals: usize,
    pub placeholders: usize,
    /// Deepest level below the root, i.e. the longest template in components.
    pub max_depth: usize,
}

/// A read-only, byte-packed trie of URI templates.
///
/// The buffer is reference counted and never mutated, so a `MatchIndex` can be
/// cloned freely and shared across threads without coordination.
///
/// All accessors take the byte offset of a node and are bounds-checked: a read
/// outside the buffer is an [`IndexError::OutOfBounds`] fault.
#[derive(Clone)]
pub struct MatchIndex {
    bytes: Bytes,
}

impl fmt::Debug for MatchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchIndex")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MatchIndex {
    /// Wraps an index buffer after checking its root node.
    ///
    /// The root must be a `Root` node with value `"r"` whose subtree covers the
    /// whole buffer. Deeper corruption is only detected when a match walks into
    /// it, or up front through [`MatchIndex::validate`].
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, IndexError> {
        let index = Self {
            bytes: bytes.into(),
        };
        index.check_root()?;
        Ok(index)
    }

    pub fn from_static(bytes: &'static [u8]) -> Result<Self, IndexError> {
        Self::new(Bytes::from_static(bytes))
    }

    /// For buffers produced by [`crate::IndexBuilder`], which are valid by construction.
    pub(crate) fn from_trusted(bytes: Bytes) -> Self {
        Self { bytes }
    }

    fn check_root(&self) -> Result<(), IndexError> {
        if self.bytes.len() < HEADER_LEN {
            return Err(IndexError::InvalidRoot {
                reason: "buffer is shorter than a node header",
            });
        }
        if self.node_type(0)? != NodeType::Root.tag() {
            return Err(IndexError::InvalidRoot {
                reason: "first node is not a root node",
            });
        }
        if self.value(0)? != ROOT_VALUE {
            return Err(IndexError::InvalidRoot {
                reason: "root value is not \"r\"",
            });
        }
        if self.boundary(0)? != self.bytes.len() {
            return Err(IndexError::InvalidRoot {
                reason: "root subtree does not cover the whole buffer",
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed index; the root header alone is 8 bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A cheap handle on the underlying buffer, e.g. for persisting it.
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    #[inline]
    fn read<const N: usize>(&self, pos: usize) -> Result<[u8; N], IndexError> {
        pos.checked_add(N)
            .and_then(|end| self.bytes.get(pos..end))
            .and_then(|field| field.try_into().ok())
            .ok_or(IndexError::OutOfBounds {
                pos,
                len: N,
                buffer_len: self.bytes.len(),
            })
    }

    #[inline]
    pub fn node_type(&self, pos: usize) -> Result<u8, IndexError> {
        Ok(self.read::<1>(pos)?[0])
    }

    #[inline]
    pub fn value_len(&self, pos: usize) -> Result<usize, IndexError> {
        Ok(self.read::<1>(pos.saturating_add(VALUE_LEN_OFFSET))?[0] as usize)
    }

    #[inline]
    pub fn children_span(&self, pos: usize) -> Result<usize, IndexError> {
        let span = self.read::<4>(pos.saturating_add(CHILDREN_SPAN_OFFSET))?;
        Ok(u32::from_be_bytes(span) as usize)
    }

    #[inline]
    pub fn match_id(&self, pos: usize) -> Result<u16, IndexError> {
        Ok(u16::from_be_bytes(
            self.read::<2>(pos.saturating_add(MATCH_ID_OFFSET))?,
        ))
    }

    /// The literal bytes stored on the node (the marker byte for placeholders).
    pub fn value(&self, pos: usize) -> Result<&[u8], IndexError> {
        let len = self.value_len(pos)?;
        let start = pos.saturating_add(HEADER_LEN);
        start
            .checked_add(len)
            .and_then(|end| self.bytes.get(start..end))
            .ok_or(IndexError::OutOfBounds {
                pos: start,
                len,
                buffer_len: self.bytes.len(),
            })
    }

    /// Offset of the first child, or `None` for a leaf.
    pub fn children_start(&self, pos: usize) -> Result<Option<usize>, IndexError> {
        if self.children_span(pos)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.value_end(pos)?))
    }

    /// First offset past this node's subtree: the next sibling, or the end of
    /// the parent's children region.
    pub fn boundary(&self, pos: usize) -> Result<usize, IndexError> {
        let span = self.children_span(pos)?;
        self.value_end(pos)?
            .checked_add(span)
            .ok_or(IndexError::OutOfBounds {
                pos,
                len: span,
                buffer_len: self.bytes.len(),
            })
    }

    fn value_end(&self, pos: usize) -> Result<usize, IndexError> {
        let len = self.value_len(pos)?;
        pos.checked_add(HEADER_LEN + len)
            .ok_or(IndexError::OutOfBounds {
                pos,
                len: HEADER_LEN + len,
                buffer_len: self.bytes.len(),
            })
    }

    #[inline]
    pub fn is_placeholder(&self, pos: usize) -> Result<bool, IndexError> {
        if self.value_len(pos)? != 1 {
            return Ok(false);
        }
        Ok(self.read::<1>(pos.saturating_add(HEADER_LEN))?[0] == PLACEHOLDER)
    }

    /// Compares the node at `pos` with a query token.
    ///
    /// A placeholder node matches any token regardless of its type or value.
    /// Otherwise the type tag and every value byte must agree.
    pub fn compare(
        &self,
        pos: usize,
        query_type: NodeType,
        query_value: &[u8],
    ) -> Result<Comparison, IndexError> {
        if self.is_placeholder(pos)? {
            return Ok(Comparison::Placeholder);
        }
        if self.node_type(pos)? == query_type.tag() && self.value(pos)? == query_value {
            Ok(Comparison::Equal)
        } else {
            Ok(Comparison::NotEqual)
        }
    }

    /// Walks every node once and checks the format invariants.
    ///
    /// Intended for indexes read from disk: after a successful validation no
    /// match against this index can raise a fault.
    pub fn validate(&self) -> Result<IndexStats, IndexError> {
        let mut stats = IndexStats {
            nodes: 1,
            ..IndexStats::default()
        };
        let mut stack: Vec<(usize, usize, usize)> = Vec::new();
        if let Some(start) = self.children_start(0)? {
            stack.push((start, self.boundary(0)?, 1));
        }

        while let Some((mut pos, parent_boundary, depth)) = stack.pop() {
            while pos != parent_boundary {
                let end = self.boundary(pos)?;
                if end > parent_boundary {
                    return Err(IndexError::SiblingOverrun {
                        pos,
                        end,
                        boundary: parent_boundary,
                    });
                }

                let tag = self.node_type(pos)?;
                match NodeType::from_tag(tag) {
                    Some(NodeType::Root) | None => {
                        return Err(IndexError::UnknownNodeType {
                            pos: Some(pos),
                            tag,
                        })
                    }
                    Some(_) => {}
                }

                if self.is_placeholder(pos)? {
                    stats.placeholders += 1;
                } else if self.value(pos)?.first() == Some(&PLACEHOLDER) {
                    return Err(IndexError::ReservedMarker { pos });
                }
                if self.match_id(pos)? != NO_MATCH_ID {
                    stats.terminals += 1;
                }
                stats.nodes += 1;
                stats.max_depth = stats.max_depth.max(depth);

                if let Some(start) = self.children_start(pos)? {
                    stack.push((start, end, depth + 1));
                }
                pos = end;
            }
        }

        tracing::debug!(
            nodes = stats.nodes,
            terminals = stats.terminals,
            max_depth = stats.max_depth,
            "match index validated"
        );
        Ok(stats)
    }
}
