#![no_std]
extern crate alloc;

pub mod builder;
pub mod error;
pub mod index;
pub mod matcher;
pub mod node;

pub use builder::{IndexBuilder, Segment, Template, TemplateComponent};
pub use error::{BuildError, IndexError};
pub use index::{Comparison, IndexStats, MatchIndex};
pub use matcher::{MatchResult, QueryToken};
pub use node::NodeType;
