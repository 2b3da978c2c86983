//! Incremental PDF 1.4 writer.
//!
//! Objects are flushed to the sink as soon as they are complete, so pages
//! reach the consumer while later pages are still being rendered. Only the
//! xref table, pages tree and catalog are written at the end. Content
//! streams stay uncompressed; images carry their own filter.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::ImageDecoder;

use super::RenderError;

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const FONT_IDS: [u32; 3] = [3, 4, 5];
const FONT_BASE_NAMES: [&str; 3] = ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"];

pub struct PdfWriter<W: Write> {
    sink: W,
    offset: u64,
    /// Byte offset per object id (index id-1); 0 means not yet written.
    offsets: Vec<u64>,
    next_id: u32,
    page_ids: Vec<u32>,
    page_size: (f32, f32),
}

impl<W: Write> PdfWriter<W> {
    pub fn new(mut sink: W, page_size: (f32, f32)) -> io::Result<Self> {
        // Binary comment line per the PDF spec recommendation.
        let header = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n";
        sink.write_all(header)?;
        Ok(Self {
            sink,
            offset: header.len() as u64,
            offsets: vec![0; 5],
            next_id: 6,
            page_ids: Vec::new(),
            page_size,
        })
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes)?;
        self.offset += bytes.len() as u64;
        Ok(())
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.offsets.push(0);
        id
    }

    fn begin_object(&mut self, id: u32) -> io::Result<()> {
        self.offsets[(id - 1) as usize] = self.offset;
        self.write_bytes(format!("{} 0 obj\n", id).as_bytes())
    }

    fn end_object(&mut self) -> io::Result<()> {
        self.write_bytes(b"endobj\n")
    }

    /// Writes an image XObject and returns its object id.
    pub fn add_image(&mut self, image: &ImageXObject) -> io::Result<u32> {
        let id = self.alloc_id();
        let filter = match image.filter {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        };
        let color_space = if image.grayscale {
            "DeviceGray"
        } else {
            "DeviceRGB"
        };
        self.begin_object(id)?;
        self.write_bytes(
            format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /{} /BitsPerComponent 8 /Filter /{} /Length {} >>\nstream\n",
                image.width,
                image.height,
                color_space,
                filter,
                image.data.len()
            )
            .as_bytes(),
        )?;
        self.write_bytes(&image.data)?;
        self.write_bytes(b"\nendstream\n")?;
        self.end_object()?;
        Ok(id)
    }

    /// Writes one finished page: its content stream and the page object.
    ///
    /// `image_ids` are the XObject ids referenced by the content via the
    /// `/ImN` resource names (N = object id).
    pub fn add_page(&mut self, content: &str, image_ids: &[u32]) -> io::Result<()> {
        let content_id = self.alloc_id();
        self.begin_object(content_id)?;
        self.write_bytes(
            format!("<< /Length {} >>\nstream\n", content.len()).as_bytes(),
        )?;
        self.write_bytes(content.as_bytes())?;
        self.write_bytes(b"\nendstream\n")?;
        self.end_object()?;

        let mut xobjects = String::new();
        for id in image_ids {
            xobjects.push_str(&format!("/Im{} {} 0 R ", id, id));
        }
        let fonts = format!(
            "/F1 {} 0 R /F2 {} 0 R /F3 {} 0 R",
            FONT_IDS[0], FONT_IDS[1], FONT_IDS[2]
        );

        let page_id = self.alloc_id();
        self.begin_object(page_id)?;
        self.write_bytes(
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << {} >> /XObject << {} >> >> /Contents {} 0 R >>\n",
                PAGES_ID, self.page_size.0, self.page_size.1, fonts, xobjects, content_id
            )
            .as_bytes(),
        )?;
        self.end_object()?;
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Writes fonts, pages tree, catalog, xref and trailer.
    pub fn finish(mut self) -> io::Result<()> {
        for (i, id) in FONT_IDS.iter().enumerate() {
            self.begin_object(*id)?;
            self.write_bytes(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\n",
                    FONT_BASE_NAMES[i]
                )
                .as_bytes(),
            )?;
            self.end_object()?;
        }

        let kids: Vec<String> = self.page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        self.begin_object(PAGES_ID)?;
        self.write_bytes(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>\n",
                kids.join(" "),
                self.page_ids.len()
            )
            .as_bytes(),
        )?;
        self.end_object()?;

        self.begin_object(CATALOG_ID)?;
        self.write_bytes(format!("<< /Type /Catalog /Pages {} 0 R >>\n", PAGES_ID).as_bytes())?;
        self.end_object()?;

        let xref_offset = self.offset;
        let count = self.next_id;
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", count);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        self.write_bytes(xref.as_bytes())?;
        self.write_bytes(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
                count, CATALOG_ID, xref_offset
            )
            .as_bytes(),
        )?;
        self.sink.flush()
    }
}

/// Encodes text for a PDF literal string in WinAnsi.
///
/// High bytes are written as octal escapes so content streams stay ASCII.
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' | '\t' => out.push(' '),
            c if (c as u32) < 0x80 => out.push(c),
            c => {
                let byte = win_ansi_byte(c).unwrap_or(b'?');
                out.push_str(&format!("\\{:03o}", byte));
            }
        }
    }
    out
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if (0xa0..=0xff).contains(&code) {
        return Some(code as u8);
    }
    match c {
        '\u{20ac}' => Some(0x80),
        '\u{2026}' => Some(0x85),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        _ => None,
    }
}

/// Which stream filter an embedded image uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// Raw JPEG bytes passed through.
    Dct,
    /// Zlib-compressed raw samples.
    Flate,
}

/// A decoded image ready for embedding.
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub grayscale: bool,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Prepares uploaded artifact bytes for embedding.
    ///
    /// RGB and grayscale JPEGs pass through untouched with DCTDecode;
    /// everything else (PNG, CMYK JPEG, ...) is decoded to RGB samples and
    /// Flate-compressed.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let format = image::guess_format(bytes)
            .map_err(|e| RenderError::Image(format!("unrecognized image data: {}", e)))?;

        if format == image::ImageFormat::Jpeg {
            let decoder = image::codecs::jpeg::JpegDecoder::new(std::io::Cursor::new(bytes))
                .map_err(|e| RenderError::Image(format!("bad JPEG: {}", e)))?;
            let (width, height) = decoder.dimensions();
            match decoder.color_type() {
                image::ColorType::Rgb8 => {
                    return Ok(Self {
                        width,
                        height,
                        grayscale: false,
                        filter: ImageFilter::Dct,
                        data: bytes.to_vec(),
                    });
                }
                image::ColorType::L8 => {
                    return Ok(Self {
                        width,
                        height,
                        grayscale: true,
                        filter: ImageFilter::Dct,
                        data: bytes.to_vec(),
                    });
                }
                _ => {} // fall through to the full decode
            }
        }

        let rgb = image::load_from_memory(bytes)
            .map_err(|e| RenderError::Image(format!("undecodable image: {}", e)))?
            .to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(rgb.as_raw())
            .and_then(|_| encoder.finish())
            .map(|data| Self {
                width,
                height,
                grayscale: false,
                filter: ImageFilter::Flate,
                data,
            })
            .map_err(|e| RenderError::Image(format!("image compression failed: {}", e)))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
