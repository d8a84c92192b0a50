use crate::node::NodeType;

/// A malformed-index fault.
///
/// Raised only when the supplied bytes violate the index format. Never a
/// stand-in for "no match": a query that matches no template is `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("read of {len} bytes at offset {pos} exceeds index of {buffer_len} bytes")]
    OutOfBounds {
        pos: usize,
        len: usize,
        buffer_len: usize,
    },
    #[error("node at offset {pos} ends at {end}, past its parent boundary {boundary}")]
    SiblingOverrun {
        pos: usize,
        end: usize,
        boundary: usize,
    },
    #[error("invalid node type tag {tag} (offset {pos:?})")]
    UnknownNodeType { pos: Option<usize>, tag: u8 },
    #[error("literal value at offset {pos} starts with the placeholder marker")]
    ReservedMarker { pos: usize },
    #[error("invalid root node: {reason}")]
    InvalidRoot { reason: &'static str },
}

/// Rejection of a template or of the index being built from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("template has no components")]
    EmptyTemplate,
    #[error("template must start with a scheme")]
    MissingScheme,
    #[error("{node_type} component at position {position} is out of URI order")]
    ComponentOrder { position: usize, node_type: NodeType },
    #[error("component at position {position} is {len} bytes, longer than 255")]
    ValueTooLong { position: usize, len: usize },
    #[error("literal component at position {position} is empty")]
    EmptyValue { position: usize },
    #[error("literal component at position {position} starts with the placeholder marker")]
    ReservedMarker { position: usize },
    #[error("query placeholder at position {position}: query pairs only match as literals")]
    QueryPlaceholder { position: usize },
    #[error("port at position {position} is the default port of the scheme")]
    DefaultPort { position: usize },
    #[error("match id 0xFFFF is reserved for non-terminal nodes")]
    ReservedMatchId,
    #[error("template for match id {match_id} duplicates the template registered as {existing}")]
    DuplicateTemplate { match_id: u16, existing: u16 },
    #[error("children region of {span} bytes does not fit the 32-bit span field")]
    SpanOverflow { span: usize },
}
