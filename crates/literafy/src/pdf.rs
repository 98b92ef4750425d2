//! PDF rendering of a [`Document`] with `lopdf`.
//!
//! Text is set in the standard Type1 Times faces with WinAnsi encoding, so no fonts need
//! to be embedded. Layout is greedy word wrapping with per-glyph widths, word-spacing
//! justification, and a new page whenever the next line would cross the bottom margin.

use lopdf::{
  content::{Content, Operation},
  dictionary, Document as PdfDocument, Object, Stream, StringFormat,
};

use super::*;

/// US Letter width in points.
pub const LETTER_WIDTH: f32 = 612.0;
/// US Letter height in points.
pub const LETTER_HEIGHT: f32 = 792.0;
/// Half an inch.
pub const DEFAULT_MARGIN: f32 = 36.0;

/// Line height as a multiple of the font size.
const LEADING: f32 = 1.2;

/// Times-Roman advance widths for bytes 32..=126, in 1/1000 em.
#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
  250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
  500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
  921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
  556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
  333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
  500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

/// Times-Bold advance widths for bytes 32..=126, in 1/1000 em.
#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
  250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
  500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
  930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
  611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
  333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
  556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// Renders documents as letter-sized PDF files.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
  /// Page width in points
  pub page_width:  f32,
  /// Page height in points
  pub page_height: f32,
  /// Margin on all four sides in points
  pub margin:      f32,
}

impl Default for PdfRenderer {
  fn default() -> Self {
    Self { page_width: LETTER_WIDTH, page_height: LETTER_HEIGHT, margin: DEFAULT_MARGIN }
  }
}

impl Renderer for PdfRenderer {
  fn render(&self, document: &Document) -> Result<Artifact> {
    let bytes = self.write(document).map_err(|e| match e {
      LiterafyError::Render(_) => e,
      other => LiterafyError::Render(other.to_string()),
    })?;
    debug!("Rendered {} blocks into {} bytes of PDF", document.blocks.len(), bytes.len());
    Ok(Artifact { bytes, media_type: "application/pdf" })
  }
}

impl PdfRenderer {
  /// Width available to a line of text.
  fn text_width(&self) -> f32 { self.page_width - 2.0 * self.margin }

  /// Lays out the blocks into per-page content operations.
  pub fn layout(&self, document: &Document) -> Vec<Vec<Operation>> {
    let mut pages = Pages::new(self.page_height - self.margin, self.margin);

    for block in &document.blocks {
      match block {
        Block::Title(text) | Block::Paragraph(text) | Block::Heading(text) => {
          let line_height = text.style.size * LEADING;
          for line in wrap(&text.content, &text.style, self.text_width()) {
            pages.reserve(line_height);
            let baseline = pages.cursor - text.style.size;
            pages.push_line(&line, &text.style, self.margin, self.text_width(), baseline);
            pages.cursor -= line_height;
          }
          pages.advance(text.style.space_after);
        },
        Block::Spacer(height) => pages.advance(*height),
        Block::PageBreak => pages.break_page(),
      }
    }

    pages.finish()
  }

  /// Builds and serializes the PDF file.
  fn write(&self, document: &Document) -> Result<Vec<u8>> {
    let mut pdf = PdfDocument::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font("Times-Roman"));
    let bold_id = pdf.add_object(font("Times-Bold"));
    let resources_id = pdf.add_object(dictionary! {
      "Font" => dictionary! {
        Weight::Regular.font_key() => regular_id,
        Weight::Bold.font_key() => bold_id,
      },
    });

    let mut kids = Vec::new();
    for operations in self.layout(document) {
      let content = Content { operations };
      let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
      let page_id = pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
      });
      kids.push(Object::Reference(page_id));
    }
    trace!("Laid out {} pages", kids.len());

    let count = kids.len() as i64;
    pdf.objects.insert(
      pages_id,
      Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
          Object::Integer(0),
          Object::Integer(0),
          self.page_width.into(),
          self.page_height.into(),
        ],
      }),
    );

    let catalog_id = pdf.add_object(dictionary! {
      "Type" => "Catalog",
      "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
      "Title" => Object::String(encode_win_ansi(&document.meta.title), StringFormat::Literal),
      "Subject" => Object::String(encode_win_ansi(&document.meta.subject), StringFormat::Literal),
      "Producer" => Object::string_literal("literafy"),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    if document.meta.compress {
      pdf.compress();
    }

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
  }
}

impl Weight {
  /// Resource name of the font for this weight.
  fn font_key(&self) -> &'static str {
    match self {
      Weight::Regular => "F1",
      Weight::Bold => "F2",
    }
  }

  /// Advance width of one encoded byte at 1000 units per em.
  fn glyph_width(&self, byte: u8) -> u16 {
    let table = match self {
      Weight::Regular => &TIMES_ROMAN,
      Weight::Bold => &TIMES_BOLD,
    };
    match byte {
      32..=126 => table[usize::from(byte - 32)],
      0x91 | 0x92 => 333,
      0x93 | 0x94 => 500,
      0x85 | 0x97 => 1000,
      _ => 500,
    }
  }

  /// Width of `bytes` set at `size` points.
  fn measure(&self, bytes: &[u8], size: f32) -> f32 {
    bytes.iter().map(|b| f32::from(self.glyph_width(*b))).sum::<f32>() * size / 1000.0
  }
}

fn font(base: &str) -> lopdf::Dictionary {
  dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => base,
    "Encoding" => "WinAnsiEncoding",
  }
}

/// Encodes text for a WinAnsi Type1 font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
  text
    .chars()
    .map(|c| match c {
      ' '..='~' => c as u8,
      '\t' | '\n' | '\r' => b' ',
      '\u{2018}' => 0x91,
      '\u{2019}' => 0x92,
      '\u{201C}' => 0x93,
      '\u{201D}' => 0x94,
      '\u{2022}' => 0x95,
      '\u{2013}' => 0x96,
      '\u{2014}' => 0x97,
      '\u{2026}' => 0x85,
      '\u{20AC}' => 0x80,
      '\u{A0}'..='\u{FF}' => c as u32 as u8,
      _ => b'?',
    })
    .collect()
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
  /// Encoded glyphs, words joined by single spaces
  pub bytes:  Vec<u8>,
  /// Natural width in points
  pub width:  f32,
  /// Number of inter-word spaces
  pub spaces: usize,
  /// Whether this is the paragraph's final line
  pub last:   bool,
}

/// Greedy word wrap of `content` into lines no wider than `max_width`.
///
/// Words wider than a whole line are split between characters.
pub fn wrap(content: &str, style: &Style, max_width: f32) -> Vec<Line> {
  let weight = style.weight;
  let space = weight.measure(b" ", style.size);
  let mut lines = Vec::new();
  let mut current: Vec<Vec<u8>> = Vec::new();
  let mut width = 0.0;

  let flush = |current: &mut Vec<Vec<u8>>, width: &mut f32, lines: &mut Vec<Line>| {
    if !current.is_empty() {
      lines.push(Line {
        bytes:  current.join(&b' '),
        width:  *width,
        spaces: current.len() - 1,
        last:   false,
      });
      current.clear();
      *width = 0.0;
    }
  };

  for word in content.split_whitespace() {
    for piece in split_long_word(encode_win_ansi(word), weight, style.size, max_width) {
      let piece_width = weight.measure(&piece, style.size);
      let needed = if current.is_empty() { piece_width } else { width + space + piece_width };
      if needed > max_width && !current.is_empty() {
        flush(&mut current, &mut width, &mut lines);
        width = piece_width;
      } else {
        width = needed;
      }
      current.push(piece);
    }
  }
  flush(&mut current, &mut width, &mut lines);

  if let Some(line) = lines.last_mut() {
    line.last = true;
  }
  lines
}

/// Splits an encoded word into pieces that each fit on a line.
fn split_long_word(word: Vec<u8>, weight: Weight, size: f32, max_width: f32) -> Vec<Vec<u8>> {
  if weight.measure(&word, size) <= max_width {
    return vec![word];
  }
  let mut pieces = Vec::new();
  let mut piece = Vec::new();
  let mut width = 0.0;
  for byte in word {
    let glyph = weight.measure(&[byte], size);
    if width + glyph > max_width && !piece.is_empty() {
      pieces.push(std::mem::take(&mut piece));
      width = 0.0;
    }
    piece.push(byte);
    width += glyph;
  }
  if !piece.is_empty() {
    pieces.push(piece);
  }
  pieces
}

/// Page accumulator tracking the vertical cursor.
struct Pages {
  /// Finished pages
  done:    Vec<Vec<Operation>>,
  /// Page being filled
  current: Vec<Operation>,
  /// Top of the writable area
  top:     f32,
  /// Bottom of the writable area
  bottom:  f32,
  /// Next free position, measured from the page bottom
  cursor:  f32,
}

impl Pages {
  fn new(top: f32, bottom: f32) -> Self {
    Self { done: Vec::new(), current: Vec::new(), top, bottom, cursor: top }
  }

  fn break_page(&mut self) {
    if !self.current.is_empty() {
      self.done.push(std::mem::take(&mut self.current));
      self.cursor = self.top;
    }
  }

  /// Starts a new page unless `height` still fits on the current one.
  fn reserve(&mut self, height: f32) {
    if self.cursor - height < self.bottom {
      self.break_page();
    }
  }

  /// Moves the cursor down; gaps never carry over to a new page.
  fn advance(&mut self, height: f32) {
    if self.cursor - height < self.bottom {
      self.break_page();
    } else {
      self.cursor -= height;
    }
  }

  fn push_line(&mut self, line: &Line, style: &Style, left: f32, available: f32, baseline: f32) {
    let slack = (available - line.width).max(0.0);
    let (x, word_spacing) = match style.alignment {
      Alignment::Left => (left, 0.0),
      Alignment::Center => (left + slack / 2.0, 0.0),
      Alignment::Justify if !line.last && line.spaces > 0 => (left, slack / line.spaces as f32),
      Alignment::Justify => (left, 0.0),
    };

    self.current.extend([
      Operation::new("BT", vec![]),
      Operation::new("Tf", vec![style.weight.font_key().into(), style.size.into()]),
      Operation::new("Tw", vec![word_spacing.into()]),
      Operation::new("Td", vec![x.into(), baseline.into()]),
      Operation::new("Tj", vec![Object::String(line.bytes.clone(), StringFormat::Literal)]),
      Operation::new("ET", vec![]),
    ]);
  }

  fn finish(mut self) -> Vec<Vec<Operation>> {
    if !self.current.is_empty() || self.done.is_empty() {
      self.done.push(self.current);
    }
    self.done
  }
}
