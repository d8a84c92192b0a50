//! Construction of a packed [`MatchIndex`] from typed templates.
//!
//! Templates are merged into a shared prefix tree and serialized depth-first.
//! At every level literal siblings are written before placeholder siblings,
//! which is what gives literal templates precedence in the matcher.

use alloc::string::ToString;
use alloc::vec::Vec;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::BuildError;
use crate::index::MatchIndex;
use crate::node::{NodeType, HEADER_LEN, MAX_VALUE_LEN, NO_MATCH_ID, PLACEHOLDER, ROOT_VALUE};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(Vec<u8>),
    Placeholder,
}

impl Segment {
    fn encoded(&self) -> &[u8] {
        match self {
            Segment::Literal(value) => value,
            Segment::Placeholder => &[PLACEHOLDER],
        }
    }

    fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateComponent {
    pub node_type: NodeType,
    pub segment: Segment,
}

/// A registered URI pattern: typed components in URI order, each either a
/// literal or a placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Template {
    components: Vec<TemplateComponent>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn literal(mut self, node_type: NodeType, value: impl Into<Vec<u8>>) -> Self {
        self.components.push(TemplateComponent {
            node_type,
            segment: Segment::Literal(value.into()),
        });
        self
    }

    pub fn placeholder(mut self, node_type: NodeType) -> Self {
        self.components.push(TemplateComponent {
            node_type,
            segment: Segment::Placeholder,
        });
        self
    }

    pub fn scheme(self, scheme: &str) -> Self {
        self.literal(NodeType::Scheme, scheme)
    }

    pub fn username(self, username: &str) -> Self {
        self.literal(NodeType::Username, username)
    }

    pub fn password(self, password: &str) -> Self {
        self.literal(NodeType::Password, password)
    }

    pub fn host(self, host: &str) -> Self {
        self.literal(NodeType::Host, host)
    }

    pub fn host_placeholder(self) -> Self {
        self.placeholder(NodeType::Host)
    }

    pub fn port(self, port: u16) -> Self {
        self.literal(NodeType::Port, port.to_string())
    }

    pub fn path(self, segment: &str) -> Self {
        self.literal(NodeType::PathSegment, segment)
    }

    pub fn path_placeholder(self) -> Self {
        self.placeholder(NodeType::PathSegment)
    }

    /// A literal query pair, stored as `name=value`.
    pub fn query(self, name: &str, value: &str) -> Self {
        let mut pair = Vec::with_capacity(name.len() + value.len() + 1);
        pair.extend_from_slice(name.as_bytes());
        pair.push(b'=');
        pair.extend_from_slice(value.as_bytes());
        self.literal(NodeType::QueryNameValue, pair)
    }

    pub fn fragment(self, fragment: &str) -> Self {
        self.literal(NodeType::Fragment, fragment)
    }

    pub fn components(&self) -> &[TemplateComponent] {
        &self.components
    }

    /// Checks the component order and value constraints of the index format.
    ///
    /// Query placeholders are rejected: query pairs are matched as a set, so a
    /// placeholder pair has no fixed depth to bind at. An explicit port equal to
    /// the default port of a `url` special scheme is rejected as well, since the
    /// parser drops it and no tokenized URI could reach the node.
    pub fn validate(&self) -> Result<(), BuildError> {
        let first = self.components.first().ok_or(BuildError::EmptyTemplate)?;
        if first.node_type != NodeType::Scheme {
            return Err(BuildError::MissingScheme);
        }

        let mut previous: Option<NodeType> = None;
        for (position, component) in self.components.iter().enumerate() {
            let node_type = component.node_type;
            let out_of_order = node_type == NodeType::Root
                || previous.is_some_and(|prev| {
                    node_type < prev || (node_type == prev && !node_type.repeatable())
                });
            if out_of_order {
                return Err(BuildError::ComponentOrder {
                    position,
                    node_type,
                });
            }
            previous = Some(node_type);

            if node_type == NodeType::QueryNameValue && component.segment.is_placeholder() {
                return Err(BuildError::QueryPlaceholder { position });
            }

            if let Segment::Literal(value) = &component.segment {
                match value.first() {
                    None => return Err(BuildError::EmptyValue { position }),
                    Some(&PLACEHOLDER) => return Err(BuildError::ReservedMarker { position }),
                    Some(_) if value.len() > MAX_VALUE_LEN => {
                        return Err(BuildError::ValueTooLong {
                            position,
                            len: value.len(),
                        })
                    }
                    Some(_) => {}
                }
                if node_type == NodeType::Port
                    && self.scheme_default_port() == Some(value.as_slice())
                {
                    return Err(BuildError::DefaultPort { position });
                }
            }
        }
        Ok(())
    }

    fn scheme_default_port(&self) -> Option<&'static [u8]> {
        match &self.components.first()?.segment {
            Segment::Literal(scheme) => match scheme.as_slice() {
                b"http" | b"ws" => Some(&b"80"[..]),
                b"https" | b"wss" => Some(&b"443"[..]),
                b"ftp" => Some(&b"21"[..]),
                _ => None,
            },
            Segment::Placeholder => None,
        }
    }

    /// Components as stored in the index: query pairs sorted by their encoded
    /// bytes, so that query parameters match as a set against tokens sorted the
    /// same way.
    fn canonical_components(&self) -> Vec<TemplateComponent> {
        let mut components = self.components.clone();
        let query_start = components
            .iter()
            .position(|c| c.node_type == NodeType::QueryNameValue);
        if let Some(start) = query_start {
            let end = components[start..]
                .iter()
                .position(|c| c.node_type != NodeType::QueryNameValue)
                .map_or(components.len(), |offset| start + offset);
            components[start..end].sort_by(|a, b| a.segment.encoded().cmp(b.segment.encoded()));
        }
        components
    }
}

#[derive(Debug)]
struct BuildNode {
    node_type: NodeType,
    segment: Segment,
    match_id: u16,
    children: Vec<BuildNode>,
}

impl BuildNode {
    fn new(node_type: NodeType, segment: Segment) -> Self {
        Self {
            node_type,
            segment,
            match_id: NO_MATCH_ID,
            children: Vec::new(),
        }
    }

    fn encoded_len(&self) -> usize {
        HEADER_LEN + self.segment.encoded().len() + self.children_len()
    }

    fn children_len(&self) -> usize {
        self.children.iter().map(BuildNode::encoded_len).sum()
    }

    /// Literal children in insertion order, then placeholder children.
    fn ordered_children(&self) -> impl Iterator<Item = &BuildNode> {
        let literals = self.children.iter().filter(|c| !c.segment.is_placeholder());
        let placeholders = self.children.iter().filter(|c| c.segment.is_placeholder());
        literals.chain(placeholders)
    }

    fn write(&self, buf: &mut BytesMut) -> Result<(), BuildError> {
        let children_len = self.children_len();
        let span = u32::try_from(children_len).map_err(|_| BuildError::SpanOverflow {
            span: children_len,
        })?;
        let value = self.segment.encoded();

        buf.put_u8(self.node_type.tag());
        buf.put_u8(value.len() as u8);
        buf.put_u32(span);
        buf.put_u16(self.match_id);
        buf.put_slice(value);
        for child in self.ordered_children() {
            child.write(buf)?;
        }
        Ok(())
    }
}

/// Accumulates templates and serializes them into a [`MatchIndex`].
#[derive(Debug)]
pub struct IndexBuilder {
    root: BuildNode,
    templates: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            root: BuildNode::new(NodeType::Root, Segment::Literal(ROOT_VALUE.to_vec())),
            templates: 0,
        }
    }

    /// Number of templates inserted so far.
    pub fn len(&self) -> usize {
        self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates == 0
    }

    /// Merges `template` into the tree and binds its last component to `match_id`.
    ///
    /// Valid ids are `0..=0xFFFE`. [`NO_MATCH_ID`] (`0xFFFF`) marks nodes where
    /// no template ends and is rejected with [`BuildError::ReservedMatchId`].
    pub fn insert(&mut self, template: &Template, match_id: u16) -> Result<(), BuildError> {
        if match_id == NO_MATCH_ID {
            return Err(BuildError::ReservedMatchId);
        }
        template.validate()?;

        let mut node = &mut self.root;
        for component in template.canonical_components() {
            let existing = node
                .children
                .iter()
                .position(|c| c.node_type == component.node_type && c.segment == component.segment);
            let idx = match existing {
                Some(idx) => idx,
                None => {
                    node.children
                        .push(BuildNode::new(component.node_type, component.segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }

        if node.match_id != NO_MATCH_ID {
            return Err(BuildError::DuplicateTemplate {
                match_id,
                existing: node.match_id,
            });
        }
        node.match_id = match_id;
        self.templates += 1;
        Ok(())
    }

    /// Serializes the tree into the packed index layout.
    pub fn build_bytes(&self) -> Result<Bytes, BuildError> {
        let mut buf = BytesMut::with_capacity(self.root.encoded_len());
        self.root.write(&mut buf)?;
        tracing::info!(
            templates = self.templates,
            bytes = buf.len(),
            "built match index"
        );
        Ok(buf.freeze())
    }

    pub fn build(&self) -> Result<MatchIndex, BuildError> {
        Ok(MatchIndex::from_trusted(self.build_bytes()?))
    }
}
