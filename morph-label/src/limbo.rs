use ratatui::style::Style;

use crate::diff::{CharacterDiff, StringDiff};
use crate::easing::Easing;
use crate::geometry::Rect;
use crate::registry::{EffectId, EffectRegistry};
use crate::text::StyledText;

/// Floor for animated font sizes so zero-size glyphs stay measurable.
pub const MIN_FONT_SIZE: f32 = 0.0001;

/// Resolved per-character attributes, after falling back to label-wide defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharAttributes {
    pub style: Style,
    pub font_size: f32,
}

/// Where and how one character is drawn in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterLimbo {
    pub symbol: String,
    pub rect: Rect,
    pub alpha: f32,
    pub font_size: f32,
    pub drawing_progress: f32,
    pub attributes: CharAttributes,
}

/// Read-only view of a morphing session, handed to the builder and to effect closures.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext<'a> {
    /// Unclamped session progress; exceeds 1 while trailing characters settle.
    pub progress: f32,
    pub character_delay: f32,
    pub font_size: f32,
    pub easing: Easing,
    pub base_style: Style,
    pub previous_text: &'a StyledText,
    pub text: &'a StyledText,
    pub previous_rects: &'a [Rect],
    pub new_rects: &'a [Rect],
    pub diff: &'a StringDiff,
}

impl EffectContext<'_> {
    /// Session progress, clamped.
    pub fn session_progress(&self) -> f32 {
        clamp01(self.progress)
    }

    pub fn previous_rect(&self, index: usize) -> Option<Rect> {
        self.previous_rects.get(index).copied()
    }

    pub fn new_rect(&self, index: usize) -> Option<Rect> {
        self.new_rects.get(index).copied()
    }

    pub fn previous_attributes(&self, index: usize) -> CharAttributes {
        self.attributes_in(self.previous_text, index)
    }

    pub fn new_attributes(&self, index: usize) -> CharAttributes {
        self.attributes_in(self.text, index)
    }

    /// Old characters lead the session by `delay * index`.
    pub fn leading_progress(&self, index: usize) -> f32 {
        clamp01(self.progress + self.character_delay * index as f32)
    }

    /// New characters trail the session by `delay * index`.
    pub fn trailing_progress(&self, index: usize) -> f32 {
        clamp01(self.progress - self.character_delay * index as f32)
    }

    fn attributes_in(&self, text: &StyledText, index: usize) -> CharAttributes {
        let glyph = text.get(index);
        let style = glyph
            .and_then(|g| g.style)
            .map_or(self.base_style, |s| self.base_style.patch(s));
        let font_size = glyph.and_then(|g| g.font_size).unwrap_or(self.font_size);

        CharAttributes {
            style,
            font_size: font_size.max(MIN_FONT_SIZE),
        }
    }
}

/// NaN collapses to zero.
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Shrinks in place while fading out, sinking by the lost size.
pub fn default_disappearance(
    ctx: &EffectContext<'_>,
    symbol: &str,
    index: usize,
    progress: f32,
) -> CharacterLimbo {
    let attributes = ctx.previous_attributes(index);
    let full = attributes.font_size;
    let font_size = (full - ctx.easing.ease(progress, 0.0, full)).max(MIN_FONT_SIZE);
    let rect = ctx
        .previous_rect(index)
        .unwrap_or_default()
        .offset_by(0.0, full - font_size);

    CharacterLimbo {
        symbol: symbol.to_owned(),
        rect,
        alpha: 1.0 - clamp01(progress),
        font_size,
        drawing_progress: 0.0,
        attributes,
    }
}

/// Grows from nothing at the new slot; opacity follows the session, not the character.
pub fn default_appearance(
    ctx: &EffectContext<'_>,
    symbol: &str,
    index: usize,
    progress: f32,
) -> CharacterLimbo {
    let attributes = ctx.new_attributes(index);
    let full = attributes.font_size;
    let font_size = ctx.easing.ease(progress, 0.0, full).max(MIN_FONT_SIZE);
    let rect = ctx
        .new_rect(index)
        .unwrap_or_default()
        .offset_by(0.0, full - font_size);

    CharacterLimbo {
        symbol: symbol.to_owned(),
        rect,
        alpha: ctx.session_progress(),
        font_size,
        drawing_progress: 0.0,
        attributes,
    }
}

/// A surviving character glides horizontally from its old slot to its new one.
fn carried(
    ctx: &EffectContext<'_>,
    symbol: &str,
    index: usize,
    offset: isize,
    progress: f32,
    from: Rect,
) -> CharacterLimbo {
    let attributes = ctx.previous_attributes(index);
    let mut rect = from;

    if let Some(to) = index.checked_add_signed(offset).and_then(|j| ctx.new_rect(j)) {
        rect.x = ctx.easing.ease(progress, from.x, to.x - from.x);
    }

    CharacterLimbo {
        symbol: symbol.to_owned(),
        rect,
        alpha: 1.0,
        font_size: attributes.font_size,
        drawing_progress: 0.0,
        attributes,
    }
}

/// Composes one frame: every old character, then the new characters that must enter.
///
/// Later entries paint over earlier ones.
pub fn build_frame(
    ctx: &EffectContext<'_>,
    effect: &EffectId,
    registry: &EffectRegistry,
) -> Vec<CharacterLimbo> {
    let mut limbo = Vec::with_capacity(ctx.previous_text.len() + ctx.text.len());
    let progress_override = registry.progress(effect);
    let disappear = registry.disappear(effect);
    let appear = registry.appear(effect);

    for (i, glyph) in ctx.previous_text.glyphs().iter().enumerate() {
        let Some(from) = ctx.previous_rect(i) else {
            break;
        };

        let progress = match progress_override {
            Some(f) => clamp01(f(ctx, i, ctx.progress, false)),
            None => ctx.leading_progress(i),
        };

        let fate = ctx.diff.results.get(i).copied().unwrap_or(CharacterDiff::Delete);
        let entry = match (fate.offset(), disappear) {
            (Some(offset), _) => carried(ctx, &glyph.symbol, i, offset, progress, from),
            (None, Some(f)) => f(ctx, &glyph.symbol, i, progress),
            (None, None) => default_disappearance(ctx, &glyph.symbol, i, progress),
        };

        limbo.push(entry);
    }

    for (j, glyph) in ctx.text.glyphs().iter().enumerate() {
        if ctx.new_rect(j).is_none() {
            break;
        }

        if ctx.diff.skips(j) || !ctx.diff.for_new_index(j).needs_entrance() {
            continue;
        }

        let progress = match progress_override {
            Some(f) => clamp01(f(ctx, j, ctx.progress, true)),
            None => ctx.trailing_progress(j),
        };

        let entry = match appear {
            Some(f) => f(ctx, &glyph.symbol, j, progress),
            None => default_appearance(ctx, &glyph.symbol, j, progress),
        };

        limbo.push(entry);
    }

    limbo
}

/// The new text at rest: its own rects, fully opaque, full size.
pub fn settled_frame(ctx: &EffectContext<'_>) -> Vec<CharacterLimbo> {
    ctx.text
        .glyphs()
        .iter()
        .zip(ctx.new_rects)
        .enumerate()
        .map(|(j, (glyph, rect))| {
            let attributes = ctx.new_attributes(j);

            CharacterLimbo {
                symbol: glyph.symbol.clone(),
                rect: *rect,
                alpha: 1.0,
                font_size: attributes.font_size,
                drawing_progress: 0.0,
                attributes,
            }
        })
        .collect()
}
