//! # Clause Reparse Coordinator
//!
//! Re-validates an edited clause against its template:
//!
//! ```text
//! fragment ─▶ src? ─no─▶ unchanged
//!               │
//!               ▼
//!        template name ─▶ resolve ─▶ to_text ─▶ parse ─▶ formulas? ─no─▶ unchanged
//!                                                          │
//!                                                          ▼
//!                                            regenerate ─▶ copy with new children
//! ```
//!
//! Every failure is captured in the returned [`ReparseResult`]. Only the
//! regeneration step awaits; it can be bounded by a timeout and is raced
//! against a [`CancellationToken`].

use clause_model::{extract_template_name, Fragment, FragmentToText};
use clause_template::{DraftOptions, TemplateDefinition};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::cancel::CancellationToken;
use crate::errors::ReparseError;
use crate::registry::TemplateResolver;
use crate::result::ReparseResult;

pub struct ReparseCoordinator {
    resolver: Arc<dyn TemplateResolver>,
    converter: Arc<dyn FragmentToText>,
    regeneration_timeout: Option<Duration>,
}

impl ReparseCoordinator {
    pub fn new(resolver: Arc<dyn TemplateResolver>, converter: Arc<dyn FragmentToText>) -> Self {
        Self {
            resolver,
            converter,
            regeneration_timeout: None,
        }
    }

    /// Bound the regeneration step; `None` waits indefinitely
    pub fn with_regeneration_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.regeneration_timeout = timeout;
        self
    }

    /// Reparse a clause after its content changed
    pub async fn reparse(&self, fragment: &Fragment) -> ReparseResult {
        self.reparse_with_cancel(fragment, &CancellationToken::new())
            .await
    }

    /// Reparse, abandoning regeneration if `cancel` fires
    pub async fn reparse_with_cancel(
        &self,
        fragment: &Fragment,
        cancel: &CancellationToken,
    ) -> ReparseResult {
        let Some(src) = fragment.src.as_deref() else {
            tracing::trace!(fragment = %fragment.id, reason = %ReparseError::NoTemplateReference, "skipping reparse");
            return ReparseResult::unchanged();
        };
        let name = extract_template_name(src);

        match self.try_reparse(name, fragment, cancel).await {
            Ok(Some(node)) => {
                tracing::info!(clause = %name, fragment = %fragment.id, "regenerated clause formulas");
                ReparseResult::updated(node)
            }
            Ok(None) => ReparseResult::unchanged(),
            Err(error) => {
                tracing::warn!(clause = %name, fragment = %fragment.id, %error, "clause parse error");
                ReparseResult::failed(error)
            }
        }
    }

    async fn try_reparse(
        &self,
        name: &str,
        fragment: &Fragment,
        cancel: &CancellationToken,
    ) -> Result<Option<Fragment>, ReparseError> {
        let template = self
            .resolver
            .resolve(name)
            .ok_or_else(|| ReparseError::TemplateNotFound {
                name: name.to_string(),
            })?;

        let text = self.converter.to_text(&fragment.children)?;
        let data = template.parse(&text).map_err(ReparseError::Parse)?;
        tracing::info!(clause = %name, data = %data, "parsed clause");

        if !fragment.has_formulas() {
            return Ok(None);
        }

        let children = self.regenerate(template.as_ref(), data, cancel).await?;
        Ok(Some(fragment.with_children(children)))
    }

    async fn regenerate(
        &self,
        template: &dyn TemplateDefinition,
        data: Value,
        cancel: &CancellationToken,
    ) -> Result<Vec<clause_model::Node>, ReparseError> {
        let work = template.regenerate_computed_values(DraftOptions::new(data));

        let bounded = async {
            match self.regeneration_timeout {
                Some(after) => tokio::time::timeout(after, work)
                    .await
                    .map_err(|_| ReparseError::TimedOut { after })?
                    .map_err(ReparseError::Regeneration),
                None => work.await.map_err(ReparseError::Regeneration),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ReparseError::Cancelled),
            result = bounded => result,
        }
    }
}
