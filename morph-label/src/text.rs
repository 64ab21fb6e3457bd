use std::fmt;

use ratatui::style::Style;
use ratatui::text::Line;
use unicode_segmentation::UnicodeSegmentation;

/// One grapheme cluster plus its optional per-character attributes.
///
/// `None` fields fall back to the label-wide style and font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub symbol: String,
    pub style: Option<Style>,
    pub font_size: Option<f32>,
}

impl Glyph {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            style: None,
            font_size: None,
        }
    }
}

/// Text segmented into grapheme clusters once, then indexed by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledText {
    glyphs: Vec<Glyph>,
}

impl StyledText {
    pub fn plain(text: &str) -> Self {
        Self {
            glyphs: text.graphemes(true).map(Glyph::new).collect(),
        }
    }

    pub fn styled(text: &str, style: Style) -> Self {
        Self::from_spans([(text, style)])
    }

    pub fn from_spans<'a>(spans: impl IntoIterator<Item = (&'a str, Style)>) -> Self {
        let glyphs = spans
            .into_iter()
            .flat_map(|(content, style)| {
                content.graphemes(true).map(move |g| Glyph {
                    style: Some(style),
                    ..Glyph::new(g)
                })
            })
            .collect();

        Self { glyphs }
    }

    pub fn from_glyphs(glyphs: Vec<Glyph>) -> Self {
        Self { glyphs }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.glyphs.iter().map(|g| g.symbol.as_str()).collect()
    }

    /// Overrides the font size of every glyph in `range`.
    pub fn with_font_size(mut self, range: std::ops::Range<usize>, font_size: f32) -> Self {
        for glyph in self.glyphs.iter_mut().take(range.end).skip(range.start) {
            glyph.font_size = Some(font_size);
        }

        self
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for glyph in &self.glyphs {
            f.write_str(&glyph.symbol)?;
        }

        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::plain(&text)
    }
}

/// Span styles are patched over the line style, matching how ratatui renders a `Line`.
impl From<&Line<'_>> for StyledText {
    fn from(line: &Line<'_>) -> Self {
        Self::from_spans(
            line.spans
                .iter()
                .map(|span| (span.content.as_ref(), line.style.patch(span.style))),
        )
    }
}
