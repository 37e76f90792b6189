//! # Clause Content Tree
//!
//! A contract is an ordered list of [`Node`]s. Clauses are [`Fragment`]s:
//! blocks carrying a stable id and, when they were produced by a template,
//! the template's source reference.
//!
//! ```text
//! Fragment { id, src: ".../acceptance-of-delivery@0.14.0.cta" }
//!   └─ Paragraph
//!        ├─ Text "Delivery of "
//!        ├─ Variable deliverable = "Widgets"
//!        ├─ Text " is due in "
//!        └─ Formula days_left = "12"
//! ```

use serde::{Deserialize, Serialize};

use crate::source::extract_template_name;
use crate::visitor::{walk_nodes, Visitor};

/// One node of editable content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Plain text run
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "is_false")]
        bold: bool,
        #[serde(default, skip_serializing_if = "is_false")]
        italic: bool,
        #[serde(default, skip_serializing_if = "is_false")]
        code: bool,
    },

    /// Template variable bound to a value
    Variable { name: String, value: String },

    /// Computed-value placeholder
    Formula {
        name: String,
        code: String,
        value: String,
    },

    Paragraph { children: Vec<Node> },

    Heading { level: u8, children: Vec<Node> },

    Link { href: String, children: Vec<Node> },

    /// Nested clause
    Clause(Fragment),
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Node {
    /// Plain text run without marks
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            bold: false,
            italic: false,
            code: false,
        }
    }

    pub fn variable(name: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Variable {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn formula(
        name: impl Into<String>,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Node::Formula {
            name: name.into(),
            code: code.into(),
            value: value.into(),
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    /// Child nodes, if this node is a container
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::Link { children, .. } => Some(children),
            Node::Clause(fragment) => Some(&fragment.children),
            Node::Text { .. } | Node::Variable { .. } | Node::Formula { .. } => None,
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Node::Formula { .. })
    }
}

/// One editable clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Stable identifier within the document
    pub id: String,

    /// Source reference of the template that produced this clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    pub children: Vec<Node>,
}

impl Fragment {
    /// Fragment with no template reference (plain prose)
    pub fn new(id: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            src: None,
            children,
        }
    }

    /// Fragment produced by the template at `src`
    pub fn clause(id: impl Into<String>, src: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            src: Some(src.into()),
            children,
        }
    }

    /// Template name derived from the source reference
    pub fn template_name(&self) -> Option<&str> {
        self.src.as_deref().map(extract_template_name)
    }

    /// Whether any node in the tree is a computed-value placeholder
    pub fn has_formulas(&self) -> bool {
        let mut finder = FormulaFinder::default();
        walk_nodes(&mut finder, &self.children);
        finder.found
    }

    /// Deep copy with the children replaced; id and source are kept
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        Self {
            id: self.id.clone(),
            src: self.src.clone(),
            children,
        }
    }
}

#[derive(Default)]
struct FormulaFinder {
    found: bool,
}

impl Visitor for FormulaFinder {
    fn visit_node(&mut self, node: &Node) {
        if self.found {
            return;
        }
        if node.is_formula() {
            self.found = true;
            return;
        }
        crate::visitor::walk_node(self, node);
    }
}
