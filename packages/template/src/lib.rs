//! # Clause Templates
//!
//! Template definitions the editor resolves clauses against.
//!
//! ```text
//! TemplateArchive ──▶ Grammar ──▶ GrammarTemplate: TemplateDefinition
//!                                   ├─ parse(text) → data
//!                                   └─ regenerate_computed_values(data) → nodes
//! ```
//!
//! [`TemplateDefinition`] is the seam; [`GrammarTemplate`] is the engine the
//! workbench ships with.

pub mod archive;
pub mod definition;
pub mod error;
pub mod formula;
pub mod grammar;
pub mod grammar_template;

pub use archive::{acceptance_of_delivery, TemplateArchive, TemplateType, DEFAULT_ARCHIVE_BASE};
pub use definition::{DraftOptions, TemplateDefinition};
pub use error::{FormulaError, FormulaResult, TemplateError, TemplateResult};
pub use grammar::{Grammar, Segment};
pub use grammar_template::GrammarTemplate;
