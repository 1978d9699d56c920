//! printpdf-backed renderer.
//!
//! A4 portrait, built-in Helvetica faces, a single top-down cursor with
//! automatic page breaks. The footer block is stamped onto every page at a
//! fixed position; body content never descends into the footer band.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::io::BufWriter;

use ph_report::{Block, FooterBlock, Row, ScreeningReport};

use crate::{DocumentRenderer, RenderError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const TOP_Y: f32 = PAGE_HEIGHT - MARGIN;
/// Body content stops here; below is the footer band.
const BOTTOM_Y: f32 = 26.0;
/// Indent for row values relative to the left margin.
const VALUE_X: f32 = 85.0;
/// Character budget for wrapped 9pt body text across the content width.
const WRAP_COLUMNS: usize = 95;

/// Production renderer. Stateless; safe to share across requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        PdfRenderer
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, report: &ScreeningReport) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            &report.header.title,
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );

        let fonts = Fonts {
            regular: add_font(&doc, BuiltinFont::Helvetica)?,
            bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
            mono: add_font(&doc, BuiltinFont::Courier)?,
        };

        {
            let mut writer = PageWriter {
                doc: &doc,
                fonts: &fonts,
                footer: &report.footer,
                layer: doc.get_page(page).get_layer(layer),
                y: Mm(TOP_Y),
            };
            writer.stamp_footer();
            writer.write_header(&report.header);
            for section in &report.sections {
                writer.write_section(section);
            }
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| RenderError::Engine(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| RenderError::Engine(format!("PDF buffer error: {e}")))
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, RenderError> {
    doc.add_builtin_font(font)
        .map_err(|e| RenderError::Engine(format!("PDF font error: {e}")))
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    fonts: &'a Fonts,
    footer: &'a FooterBlock,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageWriter<'_> {
    /// Start a fresh page when fewer than `needed` millimetres remain.
    fn ensure_space(&mut self, needed: f32) {
        if self.y.0 - needed < BOTTOM_Y {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP_Y);
            self.stamp_footer();
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, font: Font) {
        let font = match font {
            Font::Regular => &self.fonts.regular,
            Font::Bold => &self.fonts.bold,
            Font::Mono => &self.fonts.mono,
        };
        self.layer.use_text(text, size, Mm(x), self.y, font);
    }

    fn line(&mut self, text: &str, size: f32, x: f32, font: Font, advance: f32) {
        self.ensure_space(advance);
        self.text(text, size, x, font);
        self.y -= Mm(advance);
    }

    fn gap(&mut self, dy: f32) {
        self.y -= Mm(dy);
    }

    /// Footer band at a fixed position; written once per page.
    fn stamp_footer(&mut self) {
        let saved = self.y;
        self.y = Mm(14.0);
        self.text(
            &format!("Generated: {}", self.footer.generated_at),
            7.0,
            MARGIN,
            Font::Regular,
        );
        self.text(&self.footer.brand_line, 7.0, 150.0, Font::Regular);
        self.y = Mm(10.0);
        self.text(
            &format!("Reference: {}", self.footer.reference_id),
            7.0,
            MARGIN,
            Font::Regular,
        );
        self.text(&self.footer.confidentiality, 7.0, 150.0, Font::Regular);
        self.y = saved;
    }

    fn write_header(&mut self, header: &ph_report::HeaderBlock) {
        self.line(&header.brand_name, 20.0, MARGIN, Font::Bold, 8.0);
        self.line(&header.tagline, 9.0, MARGIN, Font::Regular, 5.0);
        self.line(
            &format!("{}  |  {}", header.contact_email, header.website),
            8.0,
            MARGIN,
            Font::Regular,
            8.0,
        );
        self.line(&header.title, 14.0, MARGIN, Font::Bold, 6.0);
        self.line(&header.subtitle, 9.0, MARGIN, Font::Regular, 6.0);
        self.line(
            &format!("Reference: {}", header.reference_id),
            9.0,
            MARGIN,
            Font::Mono,
            5.0,
        );
        self.line(
            &format!("Date issued: {}", header.generated_on),
            9.0,
            MARGIN,
            Font::Mono,
            10.0,
        );
    }

    fn write_section(&mut self, section: &ph_report::Section) {
        // Keep the section title attached to at least its first row.
        self.ensure_space(16.0);
        self.line(&section.title.to_uppercase(), 11.0, MARGIN, Font::Bold, 7.0);
        for block in &section.blocks {
            self.write_block(block);
        }
        self.gap(6.0);
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Rows(rows) => {
                for row in rows {
                    self.write_row(row);
                }
            }
            Block::Badge { tier } => {
                self.line(&format!("Risk Profile: {tier}"), 12.0, MARGIN, Font::Bold, 6.0);
            }
            Block::Note(note) => {
                for wrapped in wrap_text(note, WRAP_COLUMNS) {
                    self.line(&wrapped, 8.0, MARGIN, Font::Regular, 4.0);
                }
                self.gap(1.0);
            }
            Block::List(items) => {
                for item in items {
                    for wrapped in wrap_text(&format!("- {item}"), WRAP_COLUMNS) {
                        self.line(&wrapped, 9.0, MARGIN + 2.0, Font::Regular, 4.5);
                    }
                }
                self.gap(1.0);
            }
            Block::Warning { title, text } => {
                self.gap(2.0);
                self.line(&format!("! {title}"), 10.0, MARGIN, Font::Bold, 5.0);
                for wrapped in wrap_text(text, WRAP_COLUMNS) {
                    self.line(&wrapped, 9.0, MARGIN, Font::Regular, 4.5);
                }
            }
        }
    }

    fn write_row(&mut self, row: &Row) {
        let wrapped = wrap_text(&row.value, 55);
        self.ensure_space(5.0 * wrapped.len() as f32);
        self.text(&row.label, 9.0, MARGIN, Font::Bold);
        for (i, part) in wrapped.iter().enumerate() {
            if i > 0 {
                self.y -= Mm(4.5);
            }
            self.text(part, 9.0, VALUE_X, Font::Regular);
        }
        self.y -= Mm(5.5);
    }
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Mono,
}

/// Greedy word wrap on a character budget. Words longer than the budget get
/// a line of their own rather than being split mid-word.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use ph_core::{classify, IntakeBuilder, YesNo};
    use ph_report::{compose, Branding, ReferenceId};
    use ph_types::NonEmptyText;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn sample_report() -> ScreeningReport {
        let record = IntakeBuilder::new()
            .first_name(NonEmptyText::new("John").expect("name"))
            .last_name(NonEmptyText::new("Baker").expect("name"))
            .date_of_birth(date(1960, 6, 15))
            .previous_psa(YesNo::No)
            .previous_biopsy(YesNo::No)
            .previous_mri(YesNo::No)
            .build(date(2025, 6, 1))
            .expect("valid record");
        let assessment = classify(&record, date(2025, 6, 1)).expect("classification");
        let generated_at = Utc
            .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let reference = ReferenceId::generate(date(2025, 6, 1), &mut StdRng::seed_from_u64(3));
        compose(
            &record,
            &assessment,
            generated_at,
            &reference,
            &Branding::default(),
        )
        .expect("composition")
    }

    #[test]
    fn renders_a_complete_pdf_byte_stream() {
        let bytes = PdfRenderer::new()
            .render(&sample_report())
            .expect("render succeeds");
        assert!(bytes.starts_with(b"%PDF"), "missing PDF header");
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(64)..]).to_string();
        assert!(tail.contains("%%EOF"), "missing PDF trailer");
    }

    #[test]
    fn long_factor_lists_spill_onto_further_pages() {
        let mut report = sample_report();
        // Inflate one section until it cannot fit a single A4 page.
        let factors: Vec<String> = (0..200)
            .map(|i| format!("Synthetic contributing factor number {i}"))
            .collect();
        report.sections[1]
            .blocks
            .push(ph_report::Block::List(factors));

        let single = PdfRenderer::new()
            .render(&sample_report())
            .expect("render succeeds");
        let multi = PdfRenderer::new().render(&report).expect("render succeeds");
        assert!(multi.starts_with(b"%PDF"));
        // 200 extra wrapped lines cannot fit on one A4 page; the document
        // must have grown by at least another page's worth of content.
        assert!(
            multi.len() > single.len() + 1_000,
            "expected a substantially larger multi-page document ({} vs {})",
            multi.len(),
            single.len()
        );
    }

    #[test]
    fn wrap_text_respects_the_budget() {
        let wrapped = wrap_text("one two three four five", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four five"]);
        assert!(wrapped.iter().all(|l| l.len() <= 9));

        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("unbreakablelongword", 5), vec!["unbreakablelongword"]);
    }
}
