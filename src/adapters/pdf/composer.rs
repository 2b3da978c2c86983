//! Document composer: drives the section renderers in a fixed order and
//! streams the result through a channel-backed sink.
//!
//! Rendering runs on a blocking task; a small channel gives the consumer
//! backpressure, and a dropped receiver aborts generation.

use std::io::{self, Write};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

use crate::domain::foundation::DomainError;
use crate::domain::plan::{Evidence, EvidenceKind, ResolvedPlan};
use crate::ports::{ArtifactStore, DocumentRenderer, DocumentStream};

use super::context::RenderContext;
use super::sections;
use super::writer::ImageXObject;
use super::RenderError;

const CHUNK_BYTES: usize = 16 * 1024;
const CHANNEL_CAPACITY: usize = 8;

/// `io::Write` sink that forwards chunks into the response channel.
///
/// A dropped receiver surfaces as `BrokenPipe`, which the render loop
/// maps to `RenderError::StreamAborted`.
struct ChannelSink {
    tx: mpsc::Sender<Result<Vec<u8>, DomainError>>,
    buffer: Vec<u8>,
}

impl ChannelSink {
    fn new(tx: mpsc::Sender<Result<Vec<u8>, DomainError>>) -> Self {
        Self {
            tx,
            buffer: Vec::with_capacity(CHUNK_BYTES),
        }
    }

    fn send_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::replace(&mut self.buffer, Vec::with_capacity(CHUNK_BYTES));
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "consumer disconnected"))
    }
}

impl Write for ChannelSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        if self.buffer.len() >= CHUNK_BYTES {
            self.send_buffer()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffer()
    }
}

/// Streaming PDF implementation of the `DocumentRenderer` port.
pub struct PdfDocumentRenderer {
    artifacts: Arc<dyn ArtifactStore>,
}

impl PdfDocumentRenderer {
    pub fn new(artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { artifacts }
    }
}

#[async_trait]
impl DocumentRenderer for PdfDocumentRenderer {
    async fn render(&self, plan: ResolvedPlan) -> Result<DocumentStream, DomainError> {
        // Artifact reads are async; fetch them before handing the plan to
        // the blocking render thread. Unreadable artifacts become
        // placeholders, never a failed render.
        let mut photo_bytes: Vec<(Evidence, Option<Vec<u8>>)> = Vec::new();
        for evidence in plan
            .evidence
            .iter()
            .filter(|e| e.kind == EvidenceKind::Photo)
        {
            let bytes = match self.artifacts.read(&evidence.storage_path).await {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    tracing::warn!(
                        evidence_id = %evidence.id,
                        path = %evidence.storage_path,
                        error = %err,
                        "Artifact unavailable; rendering a placeholder"
                    );
                    None
                }
            };
            photo_bytes.push((evidence.clone(), bytes));
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let error_tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            match compose(&plan, photo_bytes, ChannelSink::new(tx)) {
                Ok(()) => {}
                Err(RenderError::StreamAborted) => {
                    tracing::debug!("Render aborted: consumer disconnected");
                }
                Err(err) => {
                    tracing::error!(error = %err, "Plan document render failed");
                    // Terminate the stream with an explicit error item so
                    // the client never mistakes a truncated document for a
                    // complete one.
                    let _ = error_tx.blocking_send(Err(DomainError::internal(format!(
                        "document render failed: {}",
                        err
                    ))));
                }
            }
        });

        Ok(rx)
    }
}

/// Fixed section order; every top-level section after the first starts on
/// a fresh page.
fn compose(
    plan: &ResolvedPlan,
    photo_bytes: Vec<(Evidence, Option<Vec<u8>>)>,
    sink: ChannelSink,
) -> Result<(), RenderError> {
    let today = Utc::now().date_naive();
    let mut ctx = RenderContext::new(sink)?;
    ctx.set_continuation_label("Plano de Gestão (continuação)");

    sections::render_header(&mut ctx, plan, today);
    sections::render_summary(&mut ctx, &plan.statistics(today))?;

    if !plan.draft.is_empty() || !plan.synthetic_report.is_empty() {
        ctx.break_page()?;
        sections::render_free_text(&mut ctx, "Rascunho", &plan.draft)?;
        sections::render_free_text(&mut ctx, "Relatório Sintético", &plan.synthetic_report)?;
    }

    ctx.break_page()?;
    let groups = plan.renderable_groups();
    if groups.is_empty() {
        sections::render_no_actions_notice(&mut ctx)?;
    } else {
        let mut current_category: Option<&str> = None;
        for group in groups {
            if current_category.is_some() && current_category != Some(group.category.as_str()) {
                ctx.break_page()?;
            }
            current_category = Some(group.category.as_str());
            sections::render_group_table(&mut ctx, group, today)?;
        }
    }

    let photos: Vec<(Evidence, Option<ImageXObject>)> = photo_bytes
        .into_iter()
        .map(|(evidence, bytes)| {
            let image = bytes.and_then(|b| match ImageXObject::decode(&b) {
                Ok(image) => Some(image),
                Err(err) => {
                    tracing::warn!(
                        evidence_id = %evidence.id,
                        error = %err,
                        "Artifact is not a decodable image; rendering a placeholder"
                    );
                    None
                }
            });
            (evidence, image)
        })
        .collect();
    let attendance_lists: Vec<Evidence> = plan
        .evidence
        .iter()
        .filter(|e| e.kind == EvidenceKind::AttendanceList)
        .cloned()
        .collect();

    // An empty gallery draws nothing, so it gets no page either.
    if !photos.is_empty() || !attendance_lists.is_empty() {
        ctx.break_page()?;
        sections::render_gallery(&mut ctx, &photos, &attendance_lists)?;
    }

    ctx.finish()?;
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
