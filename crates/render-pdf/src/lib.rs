//! Document rendering engine boundary.
//!
//! The composer hands over a data-only [`ScreeningReport`]; everything about
//! typesetting (fonts, spacing, pagination) lives behind the
//! [`DocumentRenderer`] trait. There is exactly one production
//! implementation, [`PdfRenderer`]; swapping engines means providing another
//! implementor, not plugin discovery.

use ph_report::ScreeningReport;
use thiserror::Error;

pub mod pdf;

pub use pdf::PdfRenderer;

/// Errors returned by a rendering engine.
///
/// Retryable with identical input (the caller re-invokes the whole
/// pipeline); the engine detail is for logs only and must never reach the
/// end user verbatim.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document generation failed: {0}")]
    Engine(String),
}

/// A typesetting engine turning a report into printable bytes.
///
/// Implementations must be side-effect free: bytes out is the whole
/// deliverable, and on failure nothing partial may escape.
pub trait DocumentRenderer {
    /// Render the report as a complete document byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the engine cannot produce bytes.
    fn render(&self, report: &ScreeningReport) -> Result<Vec<u8>, RenderError>;
}
