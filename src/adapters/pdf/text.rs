//! Text measurement for the base-14 Helvetica family.
//!
//! Widths come from the Adobe AFM files, expressed in 1/1000 em. Accented
//! Latin letters share the width of their base letter in Helvetica, so
//! measurement strips the accent before the table lookup.

/// The three font faces the documents use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl Font {
    /// BaseFont name as it appears in the PDF font dictionary.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Resource name inside content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::HelveticaOblique => "F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            // Oblique shares the roman metrics.
            Font::Helvetica | Font::HelveticaOblique => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one character in 1/1000 em.
    pub fn char_width(self, c: char) -> u16 {
        let base = strip_accent(c);
        let code = base as u32;
        if (0x20..=0x7e).contains(&code) {
            self.widths()[(code - 0x20) as usize]
        } else {
            DEFAULT_WIDTH
        }
    }

    /// Width of a string at the given size, in points.
    pub fn text_width(self, size: f32, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Line height used everywhere: 1.2 × font size.
pub fn line_height(size: f32) -> f32 {
    size * 1.2
}

/// Greedy word wrap. A word wider than the line is emitted on its own
/// line and allowed to overflow rather than split mid-word.
pub fn wrap_lines(font: Font, size: f32, text: &str, max_width: f32) -> Vec<String> {
    let max_width = max_width.max(1.0);
    let space_width = font.text_width(size, " ");
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        if segment.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_width = 0.0f32;
        for word in segment.split_whitespace() {
            let word_width = font.text_width(size, word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else {
                let next_width = current_width + space_width + word_width;
                if next_width <= max_width {
                    current.push(' ');
                    current.push_str(word);
                    current_width = next_width;
                } else {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                    current_width = word_width;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Height of word-wrapped text at the given column width.
///
/// Monotonic in width: widening the column never increases the height.
pub fn text_block_height(font: Font, size: f32, text: &str, width: f32) -> f32 {
    wrap_lines(font, size, text, width).len() as f32 * line_height(size)
}

/// Maps accented Latin letters onto their unaccented base for width lookup.
fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{00b7}' | '\u{2022}' => '.',
        other => other,
    }
}

const DEFAULT_WIDTH: u16 = 556;

// Helvetica AFM widths for codes 0x20..=0x7e.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// Helvetica-Bold AFM widths for codes 0x20..=0x7e.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
