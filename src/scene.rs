//! The capture source: a fixed-width visual tree with optional header and
//! footer bands and a vertical flow of body nodes.
//!
//! All dimensions here are CSS pixels at scale 1; the capture backend
//! multiplies by its supersampling scale when painting. The model is
//! deliberately small — the preview is static glue around the pagination
//! engine, not a layout system.

use crate::types::Color;

#[derive(Debug, Clone)]
pub struct Scene {
    /// Rendered width in CSS pixels.
    pub width: u32,
    /// The preview never renders shorter than this, mirroring a one-page
    /// document even when the body is nearly empty.
    pub min_height: u32,
    pub padding: EdgeInsets,
    pub header: Option<Band>,
    pub footer: Option<Band>,
    pub body: Vec<Node>,
}

impl Scene {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            min_height: 0,
            padding: EdgeInsets::default(),
            header: None,
            footer: None,
            body: Vec::new(),
        }
    }

    pub fn content_width(&self) -> f32 {
        (self.width as f32 - self.padding.left - self.padding.right).max(0.0)
    }

    pub fn has_content(&self) -> bool {
        self.header.is_some() || self.footer.is_some() || !self.body.is_empty()
    }

    /// Every image asset name the scene references, bands included.
    pub(crate) fn image_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        if let Some(band) = &self.header {
            collect_image_refs(&band.children, &mut refs);
        }
        collect_image_refs(&self.body, &mut refs);
        if let Some(band) = &self.footer {
            collect_image_refs(&band.children, &mut refs);
        }
        refs
    }
}

fn collect_image_refs<'a>(nodes: &'a [Node], refs: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Image(image) => refs.push(image.asset.as_str()),
            Node::Row(row) => {
                for cell in &row.cells {
                    collect_image_refs(&cell.children, refs);
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// A persistent decorative strip re-stamped on every exported page.
#[derive(Debug, Clone)]
pub struct Band {
    /// Band height in CSS pixels.
    pub height: u32,
    pub background: Fill,
    /// Horizontal inset for the band's own content.
    pub padding_x: f32,
    /// Content, vertically centered within the band.
    pub children: Vec<Node>,
}

impl Band {
    pub fn new(height: u32, background: Fill) -> Self {
        Self {
            height,
            background,
            padding_x: 0.0,
            children: Vec::new(),
        }
    }

    pub fn with_padding_x(mut self, padding_x: f32) -> Self {
        self.padding_x = padding_x;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone)]
pub enum Fill {
    Solid(Color),
    /// Left-to-right linear gradient.
    HorizontalGradient { from: Color, to: Color },
}

#[derive(Debug, Clone)]
pub enum Node {
    Text(TextNode),
    Image(ImageNode),
    Row(RowNode),
    Table(TableNode),
    /// Vertical gap in CSS pixels.
    Spacer(f32),
    Divider(DividerNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone)]
pub struct TextNode {
    pub text: String,
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
    pub align: TextAlign,
    /// Line advance in CSS pixels.
    pub line_height: f32,
}

impl TextNode {
    pub fn new(text: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            size,
            weight: FontWeight::Regular,
            color: Color::BLACK,
            align: TextAlign::Left,
            line_height: (size * 1.5).round(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn into_node(self) -> Node {
        Node::Text(self)
    }
}

#[derive(Debug, Clone)]
pub struct ImageNode {
    /// Name of an image asset in the export's bundle.
    pub asset: String,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
}

impl ImageNode {
    pub fn new(asset: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            asset: asset.into(),
            width,
            height,
            opacity: 1.0,
        }
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn into_node(self) -> Node {
        Node::Image(self)
    }
}

/// Weighted columns laid out side by side; each cell is its own vertical
/// flow. The row's height is the tallest cell.
#[derive(Debug, Clone)]
pub struct RowNode {
    pub cells: Vec<RowCell>,
}

#[derive(Debug, Clone)]
pub struct RowCell {
    pub weight: f32,
    pub children: Vec<Node>,
}

impl RowNode {
    pub fn new(cells: Vec<RowCell>) -> Node {
        Node::Row(Self { cells })
    }
}

impl RowCell {
    pub fn new(weight: f32, children: Vec<Node>) -> Self {
        Self { weight, children }
    }
}

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub weight: f32,
    pub align: TextAlign,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, weight: f32, align: TextAlign) -> Self {
        Self {
            header: header.into(),
            weight,
            align,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableNode {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub header_fill: Color,
    pub border_color: Color,
    pub text_size: f32,
    pub cell_padding: f32,
}

impl TableNode {
    pub fn new(columns: Vec<TableColumn>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            header_fill: Color::from_rgb8(229, 231, 235),
            border_color: Color::from_rgb8(209, 213, 219),
            text_size: 12.0,
            cell_padding: 8.0,
        }
    }

    pub fn into_node(self) -> Node {
        Node::Table(self)
    }
}

#[derive(Debug, Clone)]
pub struct DividerNode {
    pub color: Color,
    pub thickness: f32,
}

impl DividerNode {
    pub fn new(color: Color, thickness: f32) -> Node {
        Node::Divider(Self { color, thickness })
    }
}
