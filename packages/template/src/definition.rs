use async_trait::async_trait;
use clause_model::Node;
use serde_json::Value;

use crate::error::TemplateResult;

/// Options for regenerating a clause's computed values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftOptions {
    /// Structured data produced by [`TemplateDefinition::parse`]
    pub data: Value,
}

impl DraftOptions {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

/// A resolved template: validates clause text and regenerates clause content.
///
/// Implementations are shared between tasks, so both operations take
/// `&self`; any per-parse state belongs in the returned data.
#[async_trait]
pub trait TemplateDefinition: Send + Sync {
    /// Package name the template is registered under
    fn name(&self) -> &str;

    /// Parse clause text into structured data
    fn parse(&self, text: &str) -> TemplateResult<Value>;

    /// Redraft the clause content, recomputing every formula
    async fn regenerate_computed_values(&self, options: DraftOptions) -> TemplateResult<Vec<Node>>;
}
