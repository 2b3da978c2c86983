//! Render context: page geometry, cursor and page lifecycle.
//!
//! All drawing helpers take y as a distance from the page top and convert
//! to PDF coordinates internally. The cursor and page counter are request
//! local; nothing here is shared between renders.

use std::io::Write;

use super::text::{self, Font};
use super::writer::{encode_text, ImageXObject, PdfWriter};
use super::RenderError;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 42.0;

/// Usable width between the side margins.
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const FOOTER_BASELINE: f32 = PAGE_HEIGHT - 26.0;
const CONTINUATION_SIZE: f32 = 8.0;

pub type Color = (f32, f32, f32);

pub const BLACK: Color = (0.0, 0.0, 0.0);
pub const WHITE: Color = (1.0, 1.0, 1.0);
pub const GRAY_TEXT: Color = (0.45, 0.45, 0.45);
pub const LIGHT_FILL: Color = (0.93, 0.93, 0.93);

pub struct RenderContext<W: Write> {
    writer: PdfWriter<W>,
    content: String,
    page_images: Vec<u32>,
    cursor: f32,
    page_number: u32,
    /// Heading redrawn by callers after a break; owned by the section
    /// currently rendering, cleared between sections.
    continuation_label: String,
}

impl<W: Write> RenderContext<W> {
    pub fn new(sink: W) -> Result<Self, RenderError> {
        let writer = PdfWriter::new(sink, (PAGE_WIDTH, PAGE_HEIGHT))?;
        Ok(Self {
            writer,
            content: String::new(),
            page_images: Vec::new(),
            cursor: MARGIN,
            page_number: 1,
            continuation_label: String::new(),
        })
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Label drawn as the light continuation marker after a page break.
    pub fn set_continuation_label(&mut self, label: impl Into<String>) {
        self.continuation_label = label.into();
    }

    /// Moves the cursor down. Callers must have checked space already.
    pub fn advance(&mut self, height: f32) {
        self.cursor += height;
    }

    /// Breaks the page if `needed` does not fit above the bottom margin.
    ///
    /// Returns `true` when a break happened, so callers can redraw their
    /// section headers before resuming.
    pub fn ensure_space(&mut self, needed: f32) -> Result<bool, RenderError> {
        if self.cursor + needed <= PAGE_HEIGHT - MARGIN {
            return Ok(false);
        }
        self.break_page()?;
        Ok(true)
    }

    /// Unconditionally starts a fresh page (top-level section boundary).
    pub fn break_page(&mut self) -> Result<(), RenderError> {
        self.finish_page()?;
        self.page_number += 1;
        self.cursor = MARGIN;
        if !self.continuation_label.is_empty() {
            let label = self.continuation_label.clone();
            self.draw_text_line(
                MARGIN,
                self.cursor,
                Font::HelveticaOblique,
                CONTINUATION_SIZE,
                GRAY_TEXT,
                &label,
            );
            self.advance(text::line_height(CONTINUATION_SIZE) + 4.0);
        }
        Ok(())
    }

    /// Flushes the finished document.
    pub fn finish(mut self) -> Result<(), RenderError> {
        self.finish_page()?;
        self.writer.finish()?;
        Ok(())
    }

    fn finish_page(&mut self) -> Result<(), RenderError> {
        let footer = format!("Página {}", self.page_number);
        let width = Font::Helvetica.text_width(8.0, &footer);
        self.draw_text_baseline(
            PAGE_WIDTH - MARGIN - width,
            FOOTER_BASELINE,
            Font::Helvetica,
            8.0,
            GRAY_TEXT,
            &footer,
        );
        let content = std::mem::take(&mut self.content);
        let images = std::mem::take(&mut self.page_images);
        self.writer.add_page(&content, &images)?;
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Drawing helpers (y measured from the page top)
    // ───────────────────────────────────────────────────────────────

    /// One text line whose top edge sits at `y`.
    pub fn draw_text_line(
        &mut self,
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Color,
        line: &str,
    ) {
        self.draw_text_baseline(x, y + size, font, size, color, line);
    }

    fn draw_text_baseline(
        &mut self,
        x: f32,
        baseline: f32,
        font: Font,
        size: f32,
        color: Color,
        line: &str,
    ) {
        let y = PAGE_HEIGHT - baseline;
        self.content.push_str(&format!(
            "BT /{} {:.2} Tf {:.3} {:.3} {:.3} rg 1 0 0 1 {:.2} {:.2} Tm ({}) Tj ET\n",
            font.resource_name(),
            size,
            color.0,
            color.1,
            color.2,
            x,
            y,
            encode_text(line)
        ));
    }

    /// Word-wrapped text block starting at (x, y). Returns the height
    /// drawn, which equals `text_block_height` for the same inputs.
    pub fn draw_wrapped(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        font: Font,
        size: f32,
        color: Color,
        body: &str,
    ) -> f32 {
        let lines = text::wrap_lines(font, size, body, width);
        let lh = text::line_height(size);
        for (i, line) in lines.iter().enumerate() {
            if !line.is_empty() {
                self.draw_text_line(x, y + i as f32 * lh, font, size, color, line);
            }
        }
        lines.len() as f32 * lh
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let py = PAGE_HEIGHT - y - h;
        self.content.push_str(&format!(
            "{:.3} {:.3} {:.3} rg {:.2} {:.2} {:.2} {:.2} re f\n",
            color.0, color.1, color.2, x, py, w, h
        ));
    }

    pub fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
        self.content.push_str(&format!(
            "{:.3} {:.3} {:.3} RG {:.2} w {:.2} {:.2} m {:.2} {:.2} l S\n",
            color.0,
            color.1,
            color.2,
            width,
            x1,
            PAGE_HEIGHT - y1,
            x2,
            PAGE_HEIGHT - y2,
        ));
    }

    /// Embeds the image object now and returns its id for `draw_image`.
    pub fn add_image(&mut self, image: &ImageXObject) -> Result<u32, RenderError> {
        let id = self.writer.add_image(image)?;
        Ok(id)
    }

    /// Places an already-embedded image with its top-left corner at (x, y).
    pub fn draw_image(&mut self, id: u32, x: f32, y: f32, w: f32, h: f32) {
        if !self.page_images.contains(&id) {
            self.page_images.push(id);
        }
        let py = PAGE_HEIGHT - y - h;
        self.content.push_str(&format!(
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{} Do Q\n",
            w, h, x, py, id
        ));
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut RenderContext<&mut Vec<u8>>)>(f: F) -> String {
        let mut out = Vec::new();
        let mut ctx = RenderContext::new(&mut out).unwrap();
        f(&mut ctx);
        ctx.finish().unwrap();
        String::from_utf8_lossy(&out).to_string()
    }

    #[test]
    fn ensure_space_breaks_only_at_the_bottom() {
        let mut out = Vec::new();
        let mut ctx = RenderContext::new(&mut out).unwrap();

        assert!(!ctx.ensure_space(100.0).unwrap());
        assert_eq!(ctx.page_number(), 1);

        // Push the cursor to the bottom and ask again.
        ctx.advance(PAGE_HEIGHT);
        assert!(ctx.ensure_space(100.0).unwrap());
        assert_eq!(ctx.page_number(), 2);
        assert_eq!(ctx.cursor(), MARGIN);
        ctx.finish().unwrap();
    }

    #[test]
    fn every_finished_page_carries_a_footer() {
        let text = render(|ctx| {
            ctx.break_page().unwrap();
            ctx.break_page().unwrap();
        });
        assert!(text.contains(&format!("(P\\341gina {})", 1)));
        assert!(text.contains(&format!("(P\\341gina {})", 2)));
        assert!(text.contains(&format!("(P\\341gina {})", 3)));
    }

    #[test]
    fn continuation_label_appears_after_breaks() {
        let text = render(|ctx| {
            ctx.set_continuation_label("SAÚDE (continuação)");
            ctx.break_page().unwrap();
        });
        assert!(text.contains("continua\\347\\343o"));
    }

    #[test]
    fn draw_wrapped_height_matches_measurement() {
        let mut out = Vec::new();
        let mut ctx = RenderContext::new(&mut out).unwrap();
        let body = "um texto comprido o bastante para quebrar em várias linhas no bloco";
        let drawn = ctx.draw_wrapped(MARGIN, MARGIN, 150.0, Font::Helvetica, 10.0, BLACK, body);
        let measured = text::text_block_height(Font::Helvetica, 10.0, body, 150.0);
        assert_eq!(drawn, measured);
        ctx.finish().unwrap();
    }

    #[test]
    fn cursor_starts_below_the_marker_on_continuation_pages() {
        let mut out = Vec::new();
        let mut ctx = RenderContext::new(&mut out).unwrap();
        ctx.set_continuation_label("Plano de Gestão (continuação)");
        ctx.break_page().unwrap();
        assert!(ctx.cursor() > MARGIN);
        ctx.finish().unwrap();
    }
}
