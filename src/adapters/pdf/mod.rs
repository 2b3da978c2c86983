//! PDF rendering adapter: streaming plan documents.
//!
//! The writer emits PDF objects incrementally into any `io::Write` sink;
//! the composer bridges that into a channel consumed by the HTTP layer.

mod composer;
mod context;
mod sections;
mod text;
mod writer;

pub use composer::PdfDocumentRenderer;

use thiserror::Error;

/// Errors inside a render run.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The byte stream consumer went away; stop generating.
    #[error("output stream aborted by the consumer")]
    StreamAborted,

    /// IO failure writing to the sink.
    #[error("render io error: {0}")]
    Io(std::io::Error),

    /// An artifact could not be decoded as an image.
    #[error("image error: {0}")]
    Image(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        // The channel sink reports a dropped receiver as BrokenPipe.
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            RenderError::StreamAborted
        } else {
            RenderError::Io(err)
        }
    }
}
