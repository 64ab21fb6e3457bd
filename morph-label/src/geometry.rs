use ratatui::layout::Alignment;
use unicode_width::UnicodeWidthStr;

use crate::text::StyledText;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned glyph box in label coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn offset_by(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Host-side text measurement.
pub trait GlyphMetrics {
    fn measure(&self, symbol: &str, font_size: f32) -> Size;

    /// Natural height of one line of text set in the label font.
    fn line_height(&self, font_size: f32) -> f32;
}

/// Terminal metrics: a glyph spans its display width in columns and one row,
/// both scaled by font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMetrics;

impl GlyphMetrics for CellMetrics {
    fn measure(&self, symbol: &str, font_size: f32) -> Size {
        Size::new(symbol.width() as f32 * font_size, font_size)
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size
    }
}

/// Label properties that geometry depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub bounds: Size,
    pub alignment: Alignment,
    pub font_size: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub rects: Vec<Rect>,
    pub total_width: f32,
    /// `y` of a full-size glyph in the label font; the row the text rests on.
    pub line_top: f32,
}

/// One rect per glyph, in text order.
pub fn layout(text: &StyledText, params: &LayoutParams, metrics: &dyn GlyphMetrics) -> TextLayout {
    let intrinsic_height = metrics.line_height(params.font_size);
    let bounds = params.bounds;
    let mut rects = Vec::with_capacity(text.len());
    let mut left = 0.0;

    for glyph in text.glyphs() {
        let font_size = glyph.font_size.unwrap_or(params.font_size);
        let size = metrics.measure(&glyph.symbol, font_size);
        let top = (intrinsic_height - size.height) - (bounds.height - size.height) / 4.0;

        rects.push(Rect::new(left, top, size.width, size.height));
        left += size.width;
    }

    let total_width = left;
    let shift = match params.alignment {
        Alignment::Center => (bounds.width - total_width) / 2.0,
        Alignment::Right => bounds.width - total_width,
        Alignment::Left => 0.0,
    };

    for rect in &mut rects {
        rect.x += shift;
    }

    TextLayout {
        rects,
        total_width,
        line_top: -(bounds.height - intrinsic_height) / 4.0,
    }
}
