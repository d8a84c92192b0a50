//! Node layout of the packed match index.
//!
//! Every node is a fixed 8-byte header followed by its value bytes and then
//! the contiguous region holding its children:
//!
//! ```text
//! | type (1) | value_len (1) | children_span (4, BE) | match_id (2, BE) | value | children |
//! ```
//!
//! The node at offset 0 is the root (`NodeType::Root`, value `"r"`). Depth grows
//! by one per query token, in the fixed component order of [`NodeType`].

use core::fmt;

use crate::error::IndexError;

/// Size of the fixed node header preceding the value bytes.
pub const HEADER_LEN: usize = 8;

/// Offset of the value length byte inside the header.
pub const VALUE_LEN_OFFSET: usize = 1;

/// Offset of the big-endian children span inside the header.
pub const CHILDREN_SPAN_OFFSET: usize = 2;

/// Offset of the big-endian match id inside the header.
pub const MATCH_ID_OFFSET: usize = 6;

/// Value byte marking a node that matches any token value and captures it (ASCII SUB).
pub const PLACEHOLDER: u8 = 0x1A;

/// Value stored on the root node.
pub const ROOT_VALUE: &[u8] = b"r";

/// Longest value a node can carry; the length field is a single byte.
pub const MAX_VALUE_LEN: usize = u8::MAX as usize;

/// Match id written on nodes where no template terminates.
pub const NO_MATCH_ID: u16 = u16::MAX;

static_assertions::const_assert_eq!(HEADER_LEN, MATCH_ID_OFFSET + 2);
static_assertions::const_assert_eq!(MATCH_ID_OFFSET, CHILDREN_SPAN_OFFSET + 4);
static_assertions::const_assert!(PLACEHOLDER < b' ');

/// URI component class of a node or query token.
///
/// The numeric tags are part of the binary format and must never change.
/// Declaration order is also the order components appear in a URI, and so the
/// order in which they nest in the trie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NodeType {
    Root = 0,
    Scheme = 1,
    Username = 2,
    Password = 3,
    Host = 4,
    Port = 5,
    PathSegment = 6,
    QueryNameValue = 7,
    Fragment = 8,
}

impl NodeType {
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Whether a template or query may carry more than one component of this type.
    pub const fn repeatable(self) -> bool {
        matches!(self, NodeType::PathSegment | NodeType::QueryNameValue)
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => NodeType::Root,
            1 => NodeType::Scheme,
            2 => NodeType::Username,
            3 => NodeType::Password,
            4 => NodeType::Host,
            5 => NodeType::Port,
            6 => NodeType::PathSegment,
            7 => NodeType::QueryNameValue,
            8 => NodeType::Fragment,
            _ => return None,
        })
    }
}

impl TryFrom<u8> for NodeType {
    type Error = IndexError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        NodeType::from_tag(tag).ok_or(IndexError::UnknownNodeType { pos: None, tag })
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Root => "root",
            NodeType::Scheme => "scheme",
            NodeType::Username => "username",
            NodeType::Password => "password",
            NodeType::Host => "host",
            NodeType::Port => "port",
            NodeType::PathSegment => "path segment",
            NodeType::QueryNameValue => "query pair",
            NodeType::Fragment => "fragment",
        };
        f.write_str(name)
    }
}
