//! # Edit Session Management
//!
//! An EditSession owns one open contract and applies reparse outcomes to it.
//! Failed reparses never touch the document; they leave an error indicator
//! on the clause until a later reparse of that clause succeeds.

use clause_model::Fragment;
use std::collections::BTreeMap;

use crate::coordinator::ReparseCoordinator;
use crate::debounce::{DebouncedReparser, PendingReparse};
use crate::document::ContractDocument;
use crate::errors::{EditorError, ReparseError};
use crate::result::ReparseResult;

/// What applying a reparse result did to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Clause already valid, nothing to rewrite
    Unchanged,
    /// Clause rewritten; document is now at `version`
    Replaced { version: u64 },
    /// Clause kept as is and flagged
    Failed(ReparseError),
    /// Rewrite available but the session is read-only
    Skipped,
}

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: ContractDocument,

    read_only: bool,

    /// Latest reparse error per clause id
    indicators: BTreeMap<String, ReparseError>,
}

impl EditSession {
    pub fn new(id: impl Into<String>, document: ContractDocument) -> Self {
        Self {
            id: id.into(),
            document,
            read_only: false,
            indicators: BTreeMap::new(),
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Record a user edit to a clause and queue it for reparsing
    pub fn edit_clause(
        &mut self,
        fragment: Fragment,
        reparser: &DebouncedReparser,
    ) -> Result<PendingReparse, EditorError> {
        if self.read_only {
            return Err(EditorError::ReadOnly);
        }

        let id = fragment.id.clone();
        self.document.replace_clause(&id, fragment.clone())?;
        Ok(reparser.notify(fragment))
    }

    /// Apply the outcome of reparsing clause `fragment_id`
    pub fn apply(
        &mut self,
        fragment_id: &str,
        result: ReparseResult,
    ) -> Result<Applied, EditorError> {
        if let Some(error) = result.error {
            tracing::debug!(session = %self.id, clause = %fragment_id, %error, "flagging clause");
            self.indicators.insert(fragment_id.to_string(), error.clone());
            return Ok(Applied::Failed(error));
        }

        self.indicators.remove(fragment_id);

        match result.node {
            None => Ok(Applied::Unchanged),
            Some(_) if self.read_only => Ok(Applied::Skipped),
            Some(node) => {
                let version = self.document.replace_clause(fragment_id, node)?;
                Ok(Applied::Replaced { version })
            }
        }
    }

    /// Reparse clause `fragment_id` right away and apply the outcome
    pub async fn reparse_clause(
        &mut self,
        fragment_id: &str,
        coordinator: &ReparseCoordinator,
    ) -> Result<Applied, EditorError> {
        let fragment = self
            .document
            .find_clause(fragment_id)
            .cloned()
            .ok_or_else(|| EditorError::FragmentNotFound(fragment_id.to_string()))?;

        let result = coordinator.reparse(&fragment).await;
        self.apply(fragment_id, result)
    }

    /// Error indicator shown on a clause, if any
    pub fn error_for(&self, fragment_id: &str) -> Option<&ReparseError> {
        self.indicators.get(fragment_id)
    }

    /// Every flagged clause, ordered by id
    pub fn errors(&self) -> impl Iterator<Item = (&str, &ReparseError)> {
        self.indicators
            .iter()
            .map(|(id, error)| (id.as_str(), error))
    }
}
