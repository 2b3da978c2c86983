//! Document Renderer Port - Streaming PDF generation interface.
//!
//! The application layer hands a resolved plan to this port and receives a
//! byte stream back. The PDF adapter provides the implementation.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::foundation::DomainError;
use crate::domain::plan::ResolvedPlan;

/// Chunked document bytes. An `Err` item terminates the stream; the bytes
/// received before it must be treated as a truncated document.
pub type DocumentStream = mpsc::Receiver<Result<Vec<u8>, DomainError>>;

/// Port for rendering a resolved plan into a streamed document.
///
/// # Contract
///
/// Implementations must:
/// - Return the receiver before rendering completes (true streaming)
/// - Stop generating promptly when the receiver is dropped
/// - Terminate the stream with an error item on internal failure rather
///   than ending it silently
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Start rendering `plan` and return the byte stream.
    async fn render(&self, plan: ResolvedPlan) -> Result<DocumentStream, DomainError>;
}
