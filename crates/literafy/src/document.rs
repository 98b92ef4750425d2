//! Abstract document tree for the final review, and the [`Renderer`] seam that turns it
//! into bytes.
//!
//! The builder only decides *what* goes on the page and in which order. Line breaking,
//! pagination and serialization belong to the renderer (see [`crate::pdf`]).

use super::*;

/// Font weight of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weight {
  /// Times-Roman
  Regular,
  /// Times-Bold
  Bold,
}

/// Horizontal placement of the lines of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
  /// Ragged right
  Left,
  /// Centered
  Center,
  /// Flush on both sides except the last line
  Justify,
}

/// Style descriptor carried by every text block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
  /// Font weight
  pub weight:      Weight,
  /// Font size in points
  pub size:        f32,
  /// Line placement
  pub alignment:   Alignment,
  /// Vertical space after the block in points
  pub space_after: f32,
}

impl Style {
  /// Large, bold, centered document title.
  pub const TITLE: Style =
    Style { weight: Weight::Bold, size: 16.0, alignment: Alignment::Center, space_after: 12.0 };
  /// Bold section heading.
  pub const HEADING: Style =
    Style { weight: Weight::Bold, size: 14.0, alignment: Alignment::Left, space_after: 6.0 };
  /// Justified body text.
  pub const BODY: Style =
    Style { weight: Weight::Regular, size: 12.0, alignment: Alignment::Justify, space_after: 0.0 };
}

/// A run of text and how to set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
  /// Plain text, may contain spaces and newlines
  pub content: String,
  /// Style descriptor
  pub style:   Style,
}

/// One element of the document, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
  /// Document title
  Title(Text),
  /// Body text
  Paragraph(Text),
  /// Section heading
  Heading(Text),
  /// Continue on a new page
  PageBreak,
  /// Vertical gap in points
  Spacer(f32),
}

impl Block {
  /// Text of a title, paragraph or heading block.
  pub fn text(&self) -> Option<&str> {
    match self {
      Block::Title(text) | Block::Paragraph(text) | Block::Heading(text) => Some(&text.content),
      Block::PageBreak | Block::Spacer(_) => None,
    }
  }
}

/// Document-level metadata handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
  /// Title stored in the file's metadata
  pub title:    String,
  /// Subject stored in the file's metadata
  pub subject:  String,
  /// Compress content streams
  pub compress: bool,
}

/// An ordered block list ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  /// Metadata
  pub meta:   DocumentMeta,
  /// Blocks in reading order
  pub blocks: Vec<Block>,
}

impl Document {
  /// Hands the document to `renderer`.
  pub fn render(&self, renderer: &dyn Renderer) -> Result<Artifact> { renderer.render(self) }
}

/// The rendered review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  /// File contents
  pub bytes:      Vec<u8>,
  /// MIME type of `bytes`
  pub media_type: &'static str,
}

/// Turns a [`Document`] into a binary, paginated artifact.
pub trait Renderer: Send + Sync {
  /// Lays out and serializes `document`.
  ///
  /// # Errors
  ///
  /// Any failure is reported as [`LiterafyError::Render`] and is fatal to the request.
  fn render(&self, document: &Document) -> Result<Artifact>;
}

/// Builds the review's block list.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
  /// Line printed under the timestamp on the title page
  attribution: String,
  /// Forwarded to [`DocumentMeta::compress`]
  compress:    bool,
}

impl Default for DocumentBuilder {
  fn default() -> Self { Self::new(&DocumentConfig::default()) }
}

impl DocumentBuilder {
  /// Creates a builder from the document section of the configuration.
  pub fn new(config: &DocumentConfig) -> Self {
    Self { attribution: config.attribution.clone(), compress: config.compress }
  }

  /// Lays out `review` as: title page, page break, body, page break, bibliography, links.
  ///
  /// Body paragraphs are split on blank lines; every non-blank fragment becomes its own
  /// paragraph block, in order.
  pub fn build(&self, review: &ReviewDocument) -> Document {
    let mut blocks = vec![
      Block::Title(text(&review.title, Style::TITLE)),
      Block::Paragraph(text(
        &format!("Generated on: {}", review.generated_at.format("%Y-%m-%d %H:%M:%S")),
        Style::BODY,
      )),
      Block::Paragraph(text(&self.attribution, Style::BODY)),
      Block::PageBreak,
    ];

    blocks.extend(
      review
        .body_paragraphs
        .iter()
        .flat_map(|paragraph| paragraph.split("\n\n"))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| Block::Paragraph(text(fragment, Style::BODY))),
    );

    blocks.push(Block::PageBreak);
    blocks.extend(listing("Bibliography", &review.citations));
    blocks.extend(listing("Links", &review.links));

    Document {
      meta: DocumentMeta {
        title:    "Literature Review".to_string(),
        subject:  review.topic.clone(),
        compress: self.compress,
      },
      blocks,
    }
  }
}

fn text(content: &str, style: Style) -> Text { Text { content: content.to_string(), style } }

/// A heading followed by `[index] entry` paragraphs.
fn listing(heading: &str, entries: &[(usize, String)]) -> Vec<Block> {
  let mut blocks = vec![Block::Heading(text(heading, Style::HEADING)), Block::Spacer(12.0)];
  for (index, entry) in entries {
    blocks.push(Block::Paragraph(text(&format!("[{index}] {entry}"), Style::BODY)));
    blocks.push(Block::Spacer(6.0));
  }
  blocks
}
