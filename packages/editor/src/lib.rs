//! # Clause Editor
//!
//! Keeps template clauses in a contract consistent with their templates
//! while they are being edited.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: clause edited in the document      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ debounce: wait for a quiet period           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ coordinator: resolve → text → parse         │
//! │  - regenerate formulas if the clause has any│
//! │  - failures reported, never raised          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: apply result or flag the clause    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clause_editor::{ReparseCoordinator, TemplateRegistry};
//! use clause_model::CiceroMarkdown;
//!
//! let registry = TemplateRegistry::new();
//! registry.add_template(Arc::new(template));
//!
//! let coordinator = ReparseCoordinator::new(Arc::new(registry), Arc::new(CiceroMarkdown::new()));
//! let result = coordinator.reparse(&fragment).await;
//!
//! if let Some(node) = result.node {
//!     document.replace_clause(&node.id.clone(), node)?;
//! }
//! ```

mod cancel;
mod config;
mod coordinator;
mod debounce;
mod document;
mod errors;
mod registry;
mod result;
mod session;

pub use cancel::CancellationToken;
pub use config::{EditorConfig, DEFAULT_DEBOUNCE_MS};
pub use coordinator::ReparseCoordinator;
pub use debounce::{DebounceScope, Debounced, DebouncedReparser, PendingReparse};
pub use document::{new_clause, ContractDocument, DocumentStorage};
pub use errors::{EditorError, ReparseError};
pub use registry::{TemplateRegistry, TemplateResolver};
pub use result::{Operation, ReparseResult};
pub use session::{Applied, EditSession};
