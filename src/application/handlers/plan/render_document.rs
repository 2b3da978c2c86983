//! RenderDocumentHandler - Resolves a plan and streams it as a PDF.
//!
//! The handler owns the resolve step; the byte production is behind the
//! `DocumentRenderer` port so the application layer never sees PDF
//! internals.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrganizationId};
use crate::ports::{DocumentRenderer, DocumentStream, PlanStore};

use super::resolve_plan::resolve_plan;

/// Command to render one organization's plan document.
#[derive(Debug, Clone)]
pub struct RenderDocumentCommand {
    pub organization_id: OrganizationId,
}

/// A started render: the byte stream plus response metadata.
pub struct RenderDocumentResult {
    pub stream: DocumentStream,
    /// Suggested download filename.
    pub filename: String,
    pub content_type: &'static str,
}

/// Error type for starting a render.
#[derive(Debug, Clone)]
pub enum RenderDocumentError {
    /// Organization not found.
    NotFound(OrganizationId),
    /// Infrastructure error.
    Infrastructure(String),
}

impl std::fmt::Display for RenderDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderDocumentError::NotFound(id) => write!(f, "Organization not found: {}", id),
            RenderDocumentError::Infrastructure(msg) => {
                write!(f, "Infrastructure error: {}", msg)
            }
        }
    }
}

impl std::error::Error for RenderDocumentError {}

impl From<DomainError> for RenderDocumentError {
    fn from(err: DomainError) -> Self {
        RenderDocumentError::Infrastructure(err.message)
    }
}

/// Handler for starting a plan document render.
pub struct RenderDocumentHandler {
    store: Arc<dyn PlanStore>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl RenderDocumentHandler {
    pub fn new(store: Arc<dyn PlanStore>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { store, renderer }
    }

    pub async fn handle(
        &self,
        command: RenderDocumentCommand,
    ) -> Result<RenderDocumentResult, RenderDocumentError> {
        let plan = resolve_plan(self.store.as_ref(), command.organization_id)
            .await?
            .ok_or(RenderDocumentError::NotFound(command.organization_id))?;

        let filename = format!("plano-de-gestao-{}.pdf", slugify(&plan.organization.name));

        tracing::info!(
            organization_id = %command.organization_id,
            organization = %plan.organization.name,
            "Starting plan document render"
        );

        let stream = self.renderer.render(plan).await?;

        Ok(RenderDocumentResult {
            stream,
            filename,
            content_type: "application/pdf",
        })
    }
}

/// Filename-safe slug: lowercase ASCII alphanumerics joined by hyphens.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        "organizacao".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::plan::testing::{seeded_store, template};
    use crate::domain::plan::ResolvedPlan;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct StubRenderer;

    #[async_trait]
    impl DocumentRenderer for StubRenderer {
        async fn render(&self, _plan: ResolvedPlan) -> Result<DocumentStream, DomainError> {
            let (tx, rx) = mpsc::channel(4);
            tx.send(Ok(b"%PDF-1.4".to_vec())).await.ok();
            Ok(rx)
        }
    }

    #[tokio::test]
    async fn streams_bytes_for_an_existing_organization() {
        let (store, org_id) = seeded_store(vec![template("SAUDE", None, 1)]);
        let handler = RenderDocumentHandler::new(Arc::new(store), Arc::new(StubRenderer));

        let mut result = handler
            .handle(RenderDocumentCommand {
                organization_id: org_id,
            })
            .await
            .unwrap();

        assert_eq!(result.content_type, "application/pdf");
        assert!(result.filename.starts_with("plano-de-gestao-"));
        assert!(result.filename.ends_with(".pdf"));

        let first = result.stream.recv().await.unwrap().unwrap();
        assert!(first.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn unknown_organization_is_rejected_before_rendering() {
        let (store, _org_id) = seeded_store(vec![]);
        let handler = RenderDocumentHandler::new(Arc::new(store), Arc::new(StubRenderer));

        let result = handler
            .handle(RenderDocumentCommand {
                organization_id: OrganizationId::new(),
            })
            .await;

        assert!(matches!(result, Err(RenderDocumentError::NotFound(_))));
    }

    #[test]
    fn slugify_collapses_punctuation_and_accents() {
        assert_eq!(slugify("Associação Boa Vista"), "associa-o-boa-vista");
        assert_eq!(slugify("  --  "), "organizacao");
        assert_eq!(slugify("Quilombo2025"), "quilombo2025");
    }
}
