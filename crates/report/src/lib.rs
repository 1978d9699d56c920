//! Screening report composition.
//!
//! This crate turns a frozen intake record plus the classifier's output into
//! a *data-only* document description: a fixed sequence of titled sections
//! holding label/value rows and conditional blocks, plus header and footer
//! blocks and a content-derived filename. Typesetting, fonts, and pagination
//! belong to the rendering engine behind `ph-render-pdf`; nothing in here is
//! presentation markup.
//!
//! Section order and wording are part of the document's compatibility
//! contract and are covered by golden tests in [`compose`].

pub mod compose;
pub mod document;
pub mod format;
pub mod reference;

use thiserror::Error;

pub use compose::{compose, suggested_filename, Branding};
pub use document::{Block, FooterBlock, HeaderBlock, Row, ScreeningReport, Section};
pub use reference::ReferenceId;

/// Errors returned by the `ph-report` crate.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid reference ID: {0}")]
    InvalidReferenceId(String),
}
