pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod registry;

pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use registry::TemplateRegistry;

pub use linkx_dsa::{MatchIndex, MatchResult, NodeType, QueryToken, Template};

/// A unified builder for link dispatchers.
///
/// Templates are merged into the packed index at build time, so dispatch only
/// walks the shared prefixes that a URI actually touches.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    pub registry: TemplateRegistry,
    pub config: DispatchConfig,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            registry: TemplateRegistry::new(),
            config: DispatchConfig::default(),
        }
    }

    /// Registers a template under `match_id`.
    pub fn route(mut self, template: Template, match_id: u16) -> Result<Self, DispatchError> {
        self.registry.route(&template, match_id)?;
        Ok(self)
    }

    /// Overrides the default dispatch configuration.
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        let templates = self.registry.len();
        let index = self.registry.take_index()?;
        tracing::info!("Built dispatcher: {} templates, {} index bytes", templates, index.len());
        Ok(Dispatcher::new(index, self.config))
    }
}
