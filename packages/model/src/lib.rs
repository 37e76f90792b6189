//! # Clause Model
//!
//! Content tree shared by the template engine and the editor.
//!
//! - [`Node`] / [`Fragment`]: editable content and clauses
//! - [`Visitor`] / [`VisitorMut`]: tree traversal
//! - [`FragmentToText`]: the text form template engines parse
//! - [`from_markdown`]: prose around clauses
//! - [`extract_template_name`]: source reference → template name

pub mod error;
pub mod markdown;
pub mod node;
pub mod source;
pub mod text;
pub mod visitor;

pub use error::{ModelError, ModelResult};
pub use markdown::{from_markdown, parse_inline};
pub use node::{Fragment, Node};
pub use source::extract_template_name;
pub use text::{CiceroMarkdown, FragmentToText};
pub use visitor::{find_nodes, walk_node, walk_node_mut, walk_nodes, walk_nodes_mut, Visitor, VisitorMut};
