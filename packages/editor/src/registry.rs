//! # Template Registry
//!
//! Name → template definition lookup shared between the party that loads
//! templates and the coordinators that resolve clauses against them.
//!
//! Clones share one map. Reads are single snapshot lookups, so the owner may
//! keep adding templates while reparses are running.

use clause_template::TemplateDefinition;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Lookup seam used by the coordinator
pub trait TemplateResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn TemplateDefinition>>;
}

#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: Arc<RwLock<HashMap<String, Arc<dyn TemplateDefinition>>>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its package name, replacing any previous
    /// template with that name
    pub fn add_template(
        &self,
        template: Arc<dyn TemplateDefinition>,
    ) -> Option<Arc<dyn TemplateDefinition>> {
        let name = template.name().to_string();
        tracing::info!(template = %name, "added template to the registry");

        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, template)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn TemplateDefinition>> {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateResolver for TemplateRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn TemplateDefinition>> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.names())
            .finish()
    }
}
