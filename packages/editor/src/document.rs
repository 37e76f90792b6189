//! # Contract Document
//!
//! An ordered list of top-level nodes: prose blocks and the clauses inserted
//! between them. Documents can be:
//! - **Memory-backed**: drafts and tests
//! - **File-backed**: JSON on disk, tracking unsaved changes
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Insert clause → Edit → Reparse → Replace clause → Save
//!   ↓         ↓                              ↓               ↓
//! File    version+1                       version+1         File
//! ```

use clause_model::{
    find_nodes, from_markdown, walk_node_mut, walk_nodes_mut, CiceroMarkdown, Fragment,
    FragmentToText, Node, VisitorMut,
};
use clause_template::GrammarTemplate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::EditorError;

/// Editable contract
#[derive(Debug)]
pub struct ContractDocument {
    /// Current version number (increments on each change)
    pub version: u64,

    storage: DocumentStorage,
}

/// Storage backend for a document
#[derive(Debug)]
pub enum DocumentStorage {
    Memory {
        nodes: Vec<Node>,
    },

    File {
        path: PathBuf,
        nodes: Vec<Node>,
        dirty: bool,
    },
}

/// On-disk form of a document
#[derive(Serialize, Deserialize)]
struct StoredDocument {
    nodes: Vec<Node>,
}

impl ContractDocument {
    /// Memory-backed document over `nodes`
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            version: 0,
            storage: DocumentStorage::Memory { nodes },
        }
    }

    pub fn from_markdown(text: &str) -> Self {
        Self::new(from_markdown(text))
    }

    /// New file-backed document; nothing is written until [`save`](Self::save)
    pub fn create(path: impl Into<PathBuf>, nodes: Vec<Node>) -> Self {
        Self {
            version: 0,
            storage: DocumentStorage::File {
                path: path.into(),
                nodes,
                dirty: true,
            },
        }
    }

    /// Load a document saved as JSON
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)?;
        let stored: StoredDocument = serde_json::from_str(&source)?;

        Ok(Self {
            version: 0,
            storage: DocumentStorage::File {
                path,
                nodes: stored.nodes,
                dirty: false,
            },
        })
    }

    pub fn nodes(&self) -> &[Node] {
        match &self.storage {
            DocumentStorage::Memory { nodes } | DocumentStorage::File { nodes, .. } => nodes,
        }
    }

    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        self.version += 1;
        match &mut self.storage {
            DocumentStorage::Memory { nodes } => nodes,
            DocumentStorage::File { nodes, dirty, .. } => {
                *dirty = true;
                nodes
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::File { path, .. } => Some(path),
            DocumentStorage::Memory { .. } => None,
        }
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory { .. } => false,
        }
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::File { path, nodes, dirty } => {
                let json = serde_json::to_string_pretty(&StoredDocument {
                    nodes: nodes.clone(),
                })?;
                std::fs::write(path, json)?;
                *dirty = false;
                Ok(())
            }
            DocumentStorage::Memory { .. } => Err(EditorError::NotFileBacked),
        }
    }

    /// Append a clause followed by trailing prose
    pub fn insert_clause(&mut self, fragment: Fragment, trailing: &str) {
        let trailing = from_markdown(trailing);
        let nodes = self.nodes_mut();
        nodes.push(Node::Clause(fragment));
        nodes.extend(trailing);
    }

    /// Clause with `id`, at any depth
    pub fn find_clause(&self, id: &str) -> Option<&Fragment> {
        self.clauses().into_iter().find(|clause| clause.id == id)
    }

    /// Every clause, depth first
    pub fn clauses(&self) -> Vec<&Fragment> {
        find_nodes(self.nodes(), |node| matches!(node, Node::Clause(_)))
            .into_iter()
            .filter_map(|node| match node {
                Node::Clause(fragment) => Some(fragment),
                _ => None,
            })
            .collect()
    }

    /// Swap the clause with `id` for `fragment`
    pub fn replace_clause(&mut self, id: &str, fragment: Fragment) -> Result<u64, EditorError> {
        if self.find_clause(id).is_none() {
            return Err(EditorError::FragmentNotFound(id.to_string()));
        }

        let mut replacer = ClauseReplacer {
            id,
            replacement: Some(fragment),
        };
        walk_nodes_mut(&mut replacer, self.nodes_mut());
        Ok(self.version)
    }

    pub fn to_markdown(&self) -> Result<String, EditorError> {
        Ok(CiceroMarkdown::new().to_text(self.nodes())?)
    }
}

struct ClauseReplacer<'a> {
    id: &'a str,
    replacement: Option<Fragment>,
}

impl VisitorMut for ClauseReplacer<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        if let Node::Clause(fragment) = node {
            if fragment.id == self.id {
                if let Some(replacement) = self.replacement.take() {
                    *fragment = replacement;
                }
                return;
            }
        }
        walk_node_mut(self, node);
    }
}

/// Draft a new clause from a template's sample data.
///
/// The clause gets a fresh id and points back at the template's archive
/// under `base_uri`.
pub fn new_clause(template: &GrammarTemplate, base_uri: &str) -> Result<Fragment, EditorError> {
    let children = template.draft_sample()?;
    let id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(clause = %id, template = %template.archive().name, "drafted new clause");

    Ok(Fragment::clause(id, template.archive().uri(base_uri), children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clause_template::{acceptance_of_delivery, DEFAULT_ARCHIVE_BASE};

    fn sample_clause() -> Fragment {
        let template = GrammarTemplate::from_archive(acceptance_of_delivery()).unwrap();
        new_clause(&template, DEFAULT_ARCHIVE_BASE).unwrap()
    }

    #[test]
    fn test_create_memory_document() {
        let doc = ContractDocument::from_markdown("# Supply Agreement\nThe parties agree.");
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert_eq!(doc.nodes().len(), 2);
        assert!(doc.clauses().is_empty());
    }

    #[test]
    fn test_new_clause_points_at_archive() {
        let clause = sample_clause();
        assert_eq!(
            clause.src.as_deref(),
            Some("https://templates.accordproject.org/archives/acceptance-of-delivery@0.14.0.cta")
        );
        assert_eq!(clause.template_name(), Some("acceptance-of-delivery"));
        assert!(clause.has_formulas());
        assert_ne!(clause.id, sample_clause().id);
    }

    #[test]
    fn test_insert_clause_then_trailing_text() {
        let mut doc = ContractDocument::from_markdown("Intro.");
        let clause = sample_clause();
        let id = clause.id.clone();

        doc.insert_clause(clause, "Closing remarks.");

        assert_eq!(doc.version, 1);
        assert_eq!(doc.nodes().len(), 3);
        assert!(matches!(&doc.nodes()[1], Node::Clause(f) if f.id == id));
        assert_eq!(
            doc.nodes()[2],
            Node::paragraph(vec![Node::text("Closing remarks.")])
        );
    }

    #[test]
    fn test_replace_clause_bumps_version() {
        let mut doc = ContractDocument::new(vec![]);
        let clause = sample_clause();
        let id = clause.id.clone();
        doc.insert_clause(clause.clone(), "");

        let replacement = clause.with_children(vec![Node::paragraph(vec![Node::text("x")])]);
        let version = doc.replace_clause(&id, replacement.clone()).unwrap();

        assert_eq!(version, 2);
        assert_eq!(doc.find_clause(&id), Some(&replacement));
    }

    #[test]
    fn test_replace_nested_clause() {
        let inner = Fragment::new("inner", vec![Node::text("old")]);
        let outer = Fragment::new("outer", vec![Node::Clause(inner)]);
        let mut doc = ContractDocument::new(vec![Node::Clause(outer)]);

        doc.replace_clause("inner", Fragment::new("inner", vec![Node::text("new")]))
            .unwrap();

        assert_eq!(doc.clauses().len(), 2);
        assert_eq!(
            doc.find_clause("inner").unwrap().children,
            vec![Node::text("new")]
        );
    }

    #[test]
    fn test_replace_missing_clause() {
        let mut doc = ContractDocument::new(vec![]);
        let err = doc
            .replace_clause("nope", Fragment::new("nope", vec![]))
            .unwrap_err();
        assert!(matches!(err, EditorError::FragmentNotFound(id) if id == "nope"));
        assert_eq!(doc.version, 0);
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = ContractDocument::new(vec![]);
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }
}
