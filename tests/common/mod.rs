//! Hand-packed index fixtures, independent of `IndexBuilder`.

#![allow(dead_code)]

use linkx_dsa::node::{NO_MATCH_ID, PLACEHOLDER};
use linkx_dsa::{NodeType, QueryToken};

/// Encodes one node with its already-encoded children.
pub fn node(ty: NodeType, value: &[u8], match_id: u16, children: &[u8]) -> Vec<u8> {
    let mut buf = vec![ty.tag(), value.len() as u8];
    buf.extend_from_slice(&(children.len() as u32).to_be_bytes());
    buf.extend_from_slice(&match_id.to_be_bytes());
    buf.extend_from_slice(value);
    buf.extend_from_slice(children);
    buf
}

pub fn inner(ty: NodeType, value: &[u8], children: &[u8]) -> Vec<u8> {
    node(ty, value, NO_MATCH_ID, children)
}

pub fn leaf(ty: NodeType, value: &[u8], match_id: u16) -> Vec<u8> {
    node(ty, value, match_id, &[])
}

pub fn placeholder(ty: NodeType, match_id: u16, children: &[u8]) -> Vec<u8> {
    node(ty, &[PLACEHOLDER], match_id, children)
}

pub fn root(children: &[u8]) -> Vec<u8> {
    inner(NodeType::Root, b"r", children)
}

pub fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}

/// `dld://host/x` bound to 7:
/// root@0, scheme@9, host@20, path@32, end 41.
pub fn dld_host_x() -> Vec<u8> {
    root(&inner(
        NodeType::Scheme,
        b"dld",
        &inner(NodeType::Host, b"host", &leaf(NodeType::PathSegment, b"x", 7)),
    ))
}

pub fn tokens(parts: &[(NodeType, &str)]) -> Vec<QueryToken> {
    parts
        .iter()
        .map(|&(ty, value)| QueryToken::new(ty, value))
        .collect()
}

pub fn dld_host(path: &[&str]) -> Vec<QueryToken> {
    let mut tokens = vec![
        QueryToken::new(NodeType::Scheme, "dld"),
        QueryToken::new(NodeType::Host, "host"),
    ];
    tokens.extend(path.iter().map(|s| QueryToken::new(NodeType::PathSegment, *s)));
    tokens
}
