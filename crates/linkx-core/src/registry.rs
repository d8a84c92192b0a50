use linkx_dsa::{IndexBuilder, MatchIndex, Template};

use crate::error::DispatchError;

/// The TemplateRegistry binds application URI templates to match ids.
///
/// Registration merges each template into a shared prefix tree; taking the
/// index serializes that tree once, so dispatch never scans templates
/// linearly.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    builder: IndexBuilder,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            builder: IndexBuilder::new(),
        }
    }

    /// Registers a template under `match_id`.
    ///
    /// Literal templates take precedence over placeholder templates that would
    /// match the same URI, whatever the registration order.
    pub fn route(&mut self, template: &Template, match_id: u16) -> Result<(), DispatchError> {
        self.builder.insert(template, match_id)?;
        tracing::debug!(match_id, components = template.components().len(), "registered template");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// Consumes the registry and returns the packed index.
    pub fn take_index(self) -> Result<MatchIndex, DispatchError> {
        Ok(self.builder.build()?)
    }
}
