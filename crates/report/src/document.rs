//! Data-only document model.
//!
//! A [`ScreeningReport`] is the contract between the composer and the
//! rendering engine: logical sections, rows, and blocks with every value
//! already formatted as display text. The model is serialisable so tests can
//! snapshot it and so the composer's idempotence is observable byte-for-byte.

use serde::{Deserialize, Serialize};

/// A complete screening report ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub header: HeaderBlock,
    pub sections: Vec<Section>,
    pub footer: FooterBlock,
}

/// Branding block opening the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub brand_name: String,
    pub tagline: String,
    pub contact_email: String,
    pub website: String,
    pub title: String,
    pub subtitle: String,
    /// Long-form generation date, e.g. "3 March 1975".
    pub generated_on: String,
    pub reference_id: String,
}

/// Footer repeated on every rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterBlock {
    pub generated_at: String,
    pub reference_id: String,
    pub brand_line: String,
    pub confidentiality: String,
}

/// A titled section in its fixed position within the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Section {
            title: title.into(),
            blocks,
        }
    }
}

/// A logical content block within a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// A run of label/value rows (a table in the rendered output).
    Rows(Vec<Row>),
    /// The risk tier badge.
    Badge { tier: String },
    /// A one-line note, e.g. the guideline citation.
    Note(String),
    /// A bulleted list, e.g. the contributing risk factors.
    List(Vec<String>),
    /// A highlighted warning block.
    Warning { title: String, text: String },
}

/// A single label/value row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    pub value: String,
}

impl Row {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Row {
            label: label.into(),
            value: value.into(),
        }
    }
}
