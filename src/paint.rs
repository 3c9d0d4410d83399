//! tiny-skia painter for scenes and bands.
//!
//! Measurement happens in CSS pixels; painting multiplies by the capture
//! scale so text and images stay crisp in the supersampled raster. Text is
//! shaped with rustybuzz and filled from ttf-parser outlines. On a host
//! with no usable font the painter reserves space from approximate metrics
//! and paints no glyphs, keeping capture dimensions deterministic.

use crate::error::BandPressError;
use crate::fonts::FontRegistry;
use crate::scene::{
    Band, Fill, FontWeight, Node, Scene, TableNode, TextAlign, TextNode,
};
use crate::types::Color;
use rustybuzz::{Face as HbFace, UnicodeBuffer};
use std::collections::HashMap;
use tiny_skia::{
    FillRule, FilterQuality, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap,
    PixmapPaint, Point, Rect as SkRect, SpreadMode, Transform,
};
use ttf_parser::{GlyphId, OutlineBuilder};

/// Decoded resources the painter draws from; owned by the capture stage.
pub(crate) struct PaintResources<'a> {
    pub fonts: &'a FontRegistry,
    pub images: &'a HashMap<String, Pixmap>,
}

/// Paints the whole scene: body flow between the paddings, then the bands
/// stamped over the top and bottom edges, matching their absolute
/// positioning in the preview.
pub(crate) fn paint_full_scene(
    scene: &Scene,
    scale: f32,
    background: Color,
    resources: &PaintResources<'_>,
) -> Result<Pixmap, BandPressError> {
    let content_width = scene.content_width();
    let body_height = measure_nodes(resources.fonts, &scene.body, content_width);
    let flow_height = scene.padding.top + body_height + scene.padding.bottom;
    let scene_height = flow_height.max(scene.min_height as f32);

    let mut painter = Painter::new(scene.width as f32, scene_height, scale, Some(background), resources)?;
    painter.draw_nodes(&scene.body, scene.padding.left, scene.padding.top, content_width);
    if let Some(band) = &scene.header {
        painter.draw_band(band, 0.0, scene.width as f32);
    }
    if let Some(band) = &scene.footer {
        painter.draw_band(band, scene_height - band.height as f32, scene.width as f32);
    }
    Ok(painter.into_pixmap())
}

/// Paints one band alone on a transparent surface, the way the preview's
/// brand bars are captured separately from the full document.
pub(crate) fn paint_band(
    band: &Band,
    scene_width: u32,
    scale: f32,
    resources: &PaintResources<'_>,
) -> Result<Pixmap, BandPressError> {
    let mut painter = Painter::new(
        scene_width as f32,
        band.height as f32,
        scale,
        None,
        resources,
    )?;
    painter.draw_band(band, 0.0, scene_width as f32);
    Ok(painter.into_pixmap())
}

struct Painter<'a> {
    pixmap: Pixmap,
    scale: f32,
    resources: &'a PaintResources<'a>,
}

impl<'a> Painter<'a> {
    fn new(
        width_css: f32,
        height_css: f32,
        scale: f32,
        background: Option<Color>,
        resources: &'a PaintResources<'a>,
    ) -> Result<Self, BandPressError> {
        let width_px = (width_css * scale).round() as u32;
        let height_px = (height_css * scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width_px, height_px).ok_or_else(|| {
            BandPressError::Capture(format!(
                "cannot allocate {}x{} capture surface",
                width_px, height_px
            ))
        })?;
        if let Some(color) = background {
            pixmap.fill(to_sk_color(color, 1.0));
        }
        Ok(Self {
            pixmap,
            scale,
            resources,
        })
    }

    fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn draw_band(&mut self, band: &Band, y_top: f32, width: f32) {
        self.fill_area(0.0, y_top, width, band.height as f32, &band.background);
        let inner_width = (width - 2.0 * band.padding_x).max(0.0);
        let content_height = measure_nodes(self.resources.fonts, &band.children, inner_width);
        let offset = ((band.height as f32 - content_height) / 2.0).max(0.0);
        self.draw_nodes(&band.children, band.padding_x, y_top + offset, inner_width);
    }

    /// Draws a vertical flow and returns the height it consumed (CSS px).
    fn draw_nodes(&mut self, nodes: &[Node], x: f32, y: f32, width: f32) -> f32 {
        let mut cursor = y;
        for node in nodes {
            cursor += match node {
                Node::Text(text) => self.draw_text(text, x, cursor, width),
                Node::Image(image) => {
                    self.draw_image(&image.asset, x, cursor, image.width, image.height, image.opacity);
                    image.height
                }
                Node::Row(row) => {
                    let total_weight: f32 = row.cells.iter().map(|c| c.weight.max(0.0)).sum();
                    let total_weight = if total_weight > 0.0 { total_weight } else { 1.0 };
                    let mut cell_x = x;
                    let mut row_height = 0.0f32;
                    for cell in &row.cells {
                        let cell_width = width * cell.weight.max(0.0) / total_weight;
                        let used = self.draw_nodes(&cell.children, cell_x, cursor, cell_width);
                        row_height = row_height.max(used);
                        cell_x += cell_width;
                    }
                    row_height
                }
                Node::Table(table) => self.draw_table(table, x, cursor, width),
                Node::Spacer(gap) => *gap,
                Node::Divider(divider) => {
                    self.fill_area(x, cursor, width, divider.thickness, &Fill::Solid(divider.color));
                    divider.thickness
                }
            };
        }
        cursor - y
    }

    fn draw_text(&mut self, text: &TextNode, x: f32, y: f32, width: f32) -> f32 {
        let lines = wrap_text(
            self.resources.fonts,
            &text.text,
            text.size,
            text.weight == FontWeight::Bold,
            width,
        );
        let ascent = ascent_css(self.resources.fonts, text.weight == FontWeight::Bold, text.size);
        let mut line_top = y;
        for line in &lines {
            let line_width = measure_text_width(
                self.resources.fonts,
                line,
                text.size,
                text.weight == FontWeight::Bold,
            );
            let line_x = match text.align {
                TextAlign::Left => x,
                TextAlign::Right => x + (width - line_width).max(0.0),
                TextAlign::Center => x + ((width - line_width) / 2.0).max(0.0),
            };
            self.draw_text_run(
                line,
                line_x,
                line_top + ascent,
                text.size,
                text.weight == FontWeight::Bold,
                text.color,
            );
            line_top += text.line_height;
        }
        lines.len() as f32 * text.line_height
    }

    fn draw_text_run(
        &mut self,
        text: &str,
        baseline_x: f32,
        baseline_y: f32,
        size: f32,
        bold: bool,
        color: Color,
    ) {
        let Some(font_data) = self.resources.fonts.face_data(bold) else {
            return;
        };
        let Ok(face) = ttf_parser::Face::parse(font_data, 0) else {
            return;
        };
        let placements = layout_text_glyphs(
            font_data,
            text,
            size * self.scale,
            baseline_x * self.scale,
            baseline_y * self.scale,
        );
        let mut paint = Paint::default();
        paint.shader = tiny_skia::Shader::SolidColor(to_sk_color(color, 1.0));
        paint.anti_alias = true;
        for placement in placements {
            let mut builder =
                GlyphPathBuilder::new(placement.origin_x, placement.origin_y, placement.scale);
            if face
                .outline_glyph(GlyphId(placement.glyph_id), &mut builder)
                .is_none()
            {
                continue;
            }
            let Some(path) = builder.finish() else {
                continue;
            };
            self.pixmap.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_image(&mut self, asset: &str, x: f32, y: f32, width: f32, height: f32, opacity: f32) {
        let Some(image) = self.resources.images.get(asset) else {
            log::warn!("image asset '{}' missing at paint time; skipped", asset);
            return;
        };
        let src_w = image.width() as f32;
        let src_h = image.height() as f32;
        if src_w <= 0.0 || src_h <= 0.0 || width <= 0.0 || height <= 0.0 {
            return;
        }
        let sx = width * self.scale / src_w;
        let sy = height * self.scale / src_h;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, x * self.scale, y * self.scale);
        let mut paint = PixmapPaint::default();
        paint.quality = FilterQuality::Bilinear;
        paint.opacity = opacity.clamp(0.0, 1.0);
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
    }

    fn draw_table(&mut self, table: &TableNode, x: f32, y: f32, width: f32) -> f32 {
        let layout = table_layout(self.resources.fonts, table, width);
        let line_height = (table.text_size * 1.5).round();
        let ascent = ascent_css(self.resources.fonts, false, table.text_size);
        let mut cursor = y;

        // Header row.
        self.fill_area(x, cursor, width, layout.header_height, &Fill::Solid(table.header_fill));
        let mut col_x = x;
        for (column, col_width) in table.columns.iter().zip(&layout.col_widths) {
            let text_width = measure_text_width(
                self.resources.fonts,
                &column.header,
                table.text_size,
                true,
            );
            let inner = col_width - 2.0 * table.cell_padding;
            let text_x = match column.align {
                TextAlign::Left => col_x + table.cell_padding,
                TextAlign::Right => col_x + table.cell_padding + (inner - text_width).max(0.0),
                TextAlign::Center => col_x + table.cell_padding + ((inner - text_width) / 2.0).max(0.0),
            };
            self.draw_text_run(
                &column.header,
                text_x,
                cursor + table.cell_padding + ascent,
                table.text_size,
                true,
                Color::BLACK,
            );
            col_x += col_width;
        }
        cursor += layout.header_height;

        // Body rows, separated by hairlines.
        for (row_lines, row_height) in layout.row_lines.iter().zip(&layout.row_heights) {
            self.fill_area(x, cursor, width, 1.0, &Fill::Solid(table.border_color));
            let mut col_x = x;
            for ((lines, column), col_width) in row_lines
                .iter()
                .zip(&table.columns)
                .zip(&layout.col_widths)
            {
                let inner = col_width - 2.0 * table.cell_padding;
                let mut line_top = cursor + table.cell_padding;
                for line in lines {
                    let text_width = measure_text_width(
                        self.resources.fonts,
                        line,
                        table.text_size,
                        false,
                    );
                    let text_x = match column.align {
                        TextAlign::Left => col_x + table.cell_padding,
                        TextAlign::Right => {
                            col_x + table.cell_padding + (inner - text_width).max(0.0)
                        }
                        TextAlign::Center => {
                            col_x + table.cell_padding + ((inner - text_width) / 2.0).max(0.0)
                        }
                    };
                    self.draw_text_run(
                        line,
                        text_x,
                        line_top + ascent,
                        table.text_size,
                        false,
                        Color::BLACK,
                    );
                    line_top += line_height;
                }
                col_x += col_width;
            }
            cursor += row_height;
        }

        // Outer border.
        let total_height = cursor - y;
        let border = &Fill::Solid(table.border_color);
        self.fill_area(x, y, width, 1.0, border);
        self.fill_area(x, y + total_height - 1.0, width, 1.0, border);
        self.fill_area(x, y, 1.0, total_height, border);
        self.fill_area(x + width - 1.0, y, 1.0, total_height, border);
        total_height
    }

    fn fill_area(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &Fill) {
        let Some(rect) = SkRect::from_xywh(
            x * self.scale,
            y * self.scale,
            (width * self.scale).max(0.0),
            (height * self.scale).max(0.0),
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.anti_alias = false;
        match fill {
            Fill::Solid(color) => {
                paint.shader = tiny_skia::Shader::SolidColor(to_sk_color(*color, 1.0));
            }
            Fill::HorizontalGradient { from, to } => {
                let Some(shader) = LinearGradient::new(
                    Point::from_xy(rect.left(), rect.top()),
                    Point::from_xy(rect.right(), rect.top()),
                    vec![
                        GradientStop::new(0.0, to_sk_color(*from, 1.0)),
                        GradientStop::new(1.0, to_sk_color(*to, 1.0)),
                    ],
                    SpreadMode::Pad,
                    Transform::identity(),
                ) else {
                    return;
                };
                paint.shader = shader;
            }
        }
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Height of a vertical flow in CSS pixels. Kept in lockstep with
/// `Painter::draw_nodes` so capture height never depends on paint state.
pub(crate) fn measure_nodes(fonts: &FontRegistry, nodes: &[Node], width: f32) -> f32 {
    let mut height = 0.0f32;
    for node in nodes {
        height += match node {
            Node::Text(text) => {
                let lines = wrap_text(
                    fonts,
                    &text.text,
                    text.size,
                    text.weight == FontWeight::Bold,
                    width,
                );
                lines.len() as f32 * text.line_height
            }
            Node::Image(image) => image.height,
            Node::Row(row) => {
                let total_weight: f32 = row.cells.iter().map(|c| c.weight.max(0.0)).sum();
                let total_weight = if total_weight > 0.0 { total_weight } else { 1.0 };
                let mut row_height = 0.0f32;
                for cell in &row.cells {
                    let cell_width = width * cell.weight.max(0.0) / total_weight;
                    row_height = row_height.max(measure_nodes(fonts, &cell.children, cell_width));
                }
                row_height
            }
            Node::Table(table) => {
                let layout = table_layout(fonts, table, width);
                layout.header_height + layout.row_heights.iter().sum::<f32>()
            }
            Node::Spacer(gap) => *gap,
            Node::Divider(divider) => divider.thickness,
        };
    }
    height
}

struct TableLayout {
    col_widths: Vec<f32>,
    header_height: f32,
    row_heights: Vec<f32>,
    row_lines: Vec<Vec<Vec<String>>>,
}

fn table_layout(fonts: &FontRegistry, table: &TableNode, width: f32) -> TableLayout {
    let total_weight: f32 = table.columns.iter().map(|c| c.weight.max(0.0)).sum();
    let total_weight = if total_weight > 0.0 { total_weight } else { 1.0 };
    let col_widths: Vec<f32> = table
        .columns
        .iter()
        .map(|c| width * c.weight.max(0.0) / total_weight)
        .collect();

    let line_height = (table.text_size * 1.5).round();
    let header_height = line_height + 2.0 * table.cell_padding;

    let mut row_heights = Vec::with_capacity(table.rows.len());
    let mut row_lines = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut cells = Vec::with_capacity(table.columns.len());
        let mut max_lines = 1usize;
        for (idx, _column) in table.columns.iter().enumerate() {
            let text = row.get(idx).map(String::as_str).unwrap_or("");
            let inner = (col_widths[idx] - 2.0 * table.cell_padding).max(1.0);
            let lines = wrap_text(fonts, text, table.text_size, false, inner);
            max_lines = max_lines.max(lines.len());
            cells.push(lines);
        }
        row_heights.push(max_lines as f32 * line_height + 2.0 * table.cell_padding);
        row_lines.push(cells);
    }

    TableLayout {
        col_widths,
        header_height,
        row_heights,
        row_lines,
    }
}

/// Greedy word wrap against the measured line width. Explicit newlines are
/// respected; a single word wider than the line gets its own line.
pub(crate) fn wrap_text(
    fonts: &FontRegistry,
    text: &str,
    size: f32,
    bold: bool,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let words: Vec<&str> = raw_line.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }
        let space_width = measure_text_width(fonts, " ", size, bold);
        let mut current = String::new();
        let mut current_width = 0.0f32;
        for word in words {
            let word_width = measure_text_width(fonts, word, size, bold);
            let candidate_width = if current.is_empty() {
                word_width
            } else {
                current_width + space_width + word_width
            };
            if !current.is_empty() && candidate_width > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = candidate_width;
            }
        }
        lines.push(current);
    }
    lines
}

/// Advance width of a run in CSS pixels. Shaped when a face is available;
/// otherwise a flat per-character estimate keeps layout deterministic.
pub(crate) fn measure_text_width(fonts: &FontRegistry, text: &str, size: f32, bold: bool) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let Some(font_data) = fonts.face_data(bold) else {
        return text.chars().count() as f32 * size * 0.52;
    };
    advance_width(font_data, text, size)
}

fn advance_width(font_data: &[u8], text: &str, size: f32) -> f32 {
    if let Some(face) = HbFace::from_slice(font_data, 0) {
        let units = face.units_per_em().max(1) as f32;
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&face, &[], buffer);
        let total: i32 = output.glyph_positions().iter().map(|p| p.x_advance).sum();
        return total as f32 / units * size;
    }
    if let Ok(face) = ttf_parser::Face::parse(font_data, 0) {
        let units = face.units_per_em().max(1) as f32;
        let mut total = 0.0f32;
        for ch in text.chars() {
            if let Some(gid) = face.glyph_index(ch) {
                total += face.glyph_hor_advance(gid).unwrap_or(0) as f32 / units * size;
            }
        }
        return total;
    }
    text.chars().count() as f32 * size * 0.52
}

fn ascent_css(fonts: &FontRegistry, bold: bool, size: f32) -> f32 {
    if let Some(font_data) = fonts.face_data(bold) {
        if let Ok(face) = ttf_parser::Face::parse(font_data, 0) {
            let units = face.units_per_em().max(1) as f32;
            return face.ascender() as f32 / units * size;
        }
    }
    size * 0.8
}

#[derive(Clone, Copy)]
struct GlyphPlacement {
    glyph_id: u16,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

fn layout_text_glyphs(
    font_data: &[u8],
    text: &str,
    font_size: f32,
    baseline_x: f32,
    baseline_y: f32,
) -> Vec<GlyphPlacement> {
    let Some(face) = HbFace::from_slice(font_data, 0) else {
        return layout_text_glyphs_unshaped(font_data, text, font_size, baseline_x, baseline_y);
    };
    let units = face.units_per_em().max(1) as f32;
    let scale = font_size / units;
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&face, &[], buffer);
    let infos = output.glyph_infos();
    let positions = output.glyph_positions();
    if infos.is_empty() || infos.len() != positions.len() {
        return layout_text_glyphs_unshaped(font_data, text, font_size, baseline_x, baseline_y);
    }

    let mut out = Vec::with_capacity(infos.len());
    let mut pen_x = 0.0f32;
    for (info, pos) in infos.iter().zip(positions.iter()) {
        let gid = info.glyph_id as u16;
        if gid == 0 {
            pen_x += pos.x_advance as f32 / units * font_size;
            continue;
        }
        let x_off = pos.x_offset as f32 / units * font_size;
        let y_off = pos.y_offset as f32 / units * font_size;
        out.push(GlyphPlacement {
            glyph_id: gid,
            origin_x: baseline_x + pen_x + x_off,
            origin_y: baseline_y - y_off,
            scale,
        });
        pen_x += pos.x_advance as f32 / units * font_size;
    }
    out
}

fn layout_text_glyphs_unshaped(
    font_data: &[u8],
    text: &str,
    font_size: f32,
    baseline_x: f32,
    baseline_y: f32,
) -> Vec<GlyphPlacement> {
    let Ok(face) = ttf_parser::Face::parse(font_data, 0) else {
        return Vec::new();
    };
    let units = face.units_per_em().max(1) as f32;
    let scale = font_size / units;
    let mut out = Vec::new();
    let mut pen_x = 0.0f32;
    for ch in text.chars() {
        let Some(gid) = face.glyph_index(ch) else {
            pen_x += font_size * 0.5;
            continue;
        };
        out.push(GlyphPlacement {
            glyph_id: gid.0,
            origin_x: baseline_x + pen_x,
            origin_y: baseline_y,
            scale,
        });
        pen_x += face.glyph_hor_advance(gid).unwrap_or(0) as f32 / units * font_size;
    }
    out
}

/// Glyph outlines arrive y-up from ttf-parser; the capture surface is
/// y-down, so the builder mirrors the vertical axis around the baseline.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(
            self.origin_x + x * self.scale,
            self.origin_y - y * self.scale,
        );
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(
            self.origin_x + x * self.scale,
            self.origin_y - y * self.scale,
        );
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.origin_x + x1 * self.scale,
            self.origin_y - y1 * self.scale,
            self.origin_x + x * self.scale,
            self.origin_y - y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.origin_x + x1 * self.scale,
            self.origin_y - y1 * self.scale,
            self.origin_x + x2 * self.scale,
            self.origin_y - y2 * self.scale,
            self.origin_x + x * self.scale,
            self.origin_y - y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn to_sk_color(color: Color, opacity: f32) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        opacity.clamp(0.0, 1.0),
    )
    .unwrap_or_else(|| tiny_skia::Color::from_rgba8(0, 0, 0, 255))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DividerNode, EdgeInsets, ImageNode, RowCell, RowNode};

    fn resources<'a>(
        fonts: &'a FontRegistry,
        images: &'a HashMap<String, Pixmap>,
    ) -> PaintResources<'a> {
        PaintResources { fonts, images }
    }

    #[test]
    fn fontless_measurement_is_deterministic() {
        let fonts = FontRegistry::new();
        let a = measure_text_width(&fonts, "Invoice Number", 12.0, false);
        let b = measure_text_width(&fonts, "Invoice Number", 12.0, false);
        assert_eq!(a, b);
        assert!(a > 0.0);
    }

    #[test]
    fn wrap_respects_explicit_newlines() {
        let fonts = FontRegistry::new();
        let lines = wrap_text(&fonts, "line one\nline two", 12.0, false, 10_000.0);
        assert_eq!(lines, vec!["line one".to_string(), "line two".to_string()]);
    }

    #[test]
    fn wrap_breaks_on_width() {
        let fonts = FontRegistry::new();
        // 0.52 * 12px per char; "aaaa bbbb" cannot fit in 40px.
        let lines = wrap_text(&fonts, "aaaa bbbb", 12.0, false, 40.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "aaaa");
    }

    #[test]
    fn full_scene_height_honors_min_height() {
        let fonts = FontRegistry::new();
        let images = HashMap::new();
        let mut scene = Scene::new(100);
        scene.min_height = 300;
        scene.padding = EdgeInsets::symmetric(10.0, 10.0);
        scene.body = vec![Node::Spacer(20.0)];
        let pixmap =
            paint_full_scene(&scene, 2.0, Color::WHITE, &resources(&fonts, &images)).unwrap();
        assert_eq!(pixmap.width(), 200);
        assert_eq!(pixmap.height(), 600);
    }

    #[test]
    fn full_scene_grows_past_min_height_with_content() {
        let fonts = FontRegistry::new();
        let images = HashMap::new();
        let mut scene = Scene::new(100);
        scene.min_height = 50;
        scene.body = vec![Node::Spacer(120.0)];
        let pixmap =
            paint_full_scene(&scene, 1.0, Color::WHITE, &resources(&fonts, &images)).unwrap();
        assert_eq!(pixmap.height(), 120);
    }

    #[test]
    fn band_capture_is_transparent_outside_fill() {
        let fonts = FontRegistry::new();
        let images = HashMap::new();
        let band = Band::new(40, Fill::Solid(Color::from_rgb8(10, 20, 30)));
        let pixmap = paint_band(&band, 100, 1.0, &resources(&fonts, &images)).unwrap();
        assert_eq!(pixmap.width(), 100);
        assert_eq!(pixmap.height(), 40);
        let px = pixmap.pixels()[0];
        assert_eq!(px.alpha(), 255);
        assert_eq!(px.blue(), 30);
    }

    #[test]
    fn gradient_band_interpolates_horizontally() {
        let fonts = FontRegistry::new();
        let images = HashMap::new();
        let band = Band::new(10, Fill::HorizontalGradient {
            from: Color::from_rgb8(255, 0, 0),
            to: Color::from_rgb8(0, 0, 255),
        });
        let pixmap = paint_band(&band, 100, 1.0, &resources(&fonts, &images)).unwrap();
        let left = pixmap.pixels()[0];
        let right = pixmap.pixels()[99];
        assert!(left.red() > left.blue());
        assert!(right.blue() > right.red());
    }

    #[test]
    fn row_height_is_tallest_cell() {
        let fonts = FontRegistry::new();
        let nodes = vec![RowNode::new(vec![
            RowCell::new(1.0, vec![Node::Spacer(30.0)]),
            RowCell::new(1.0, vec![Node::Spacer(80.0)]),
        ])];
        assert_eq!(measure_nodes(&fonts, &nodes, 200.0), 80.0);
    }

    #[test]
    fn divider_paints_its_row_of_pixels() {
        let fonts = FontRegistry::new();
        let images = HashMap::new();
        let mut scene = Scene::new(50);
        scene.body = vec![
            Node::Spacer(5.0),
            DividerNode::new(Color::from_rgb8(200, 0, 0), 2.0),
        ];
        let pixmap =
            paint_full_scene(&scene, 1.0, Color::WHITE, &resources(&fonts, &images)).unwrap();
        let idx = (6 * pixmap.width() + 10) as usize;
        assert_eq!(pixmap.pixels()[idx].red(), 200);
    }

    #[test]
    fn missing_image_asset_is_skipped_not_fatal() {
        let fonts = FontRegistry::new();
        let images = HashMap::new();
        let mut scene = Scene::new(50);
        scene.body = vec![ImageNode::new("nope", 10.0, 10.0).into_node()];
        let pixmap = paint_full_scene(&scene, 1.0, Color::WHITE, &resources(&fonts, &images));
        assert!(pixmap.is_ok());
    }
}
