use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::label::MorphingLabel;
use crate::limbo::CharacterLimbo;
use crate::oklch;

/// Glyphs dimmer or smaller than this fraction of full strength are left out.
pub const LEGIBILITY_THRESHOLD: f32 = 0.15;

/// Draws the label's current frame. Label coordinates are cells; the resting
/// line lands on the middle row of `area`.
impl Widget for &MorphingLabel {
    fn render(self, area: Area, buf: &mut Buffer) {
        let dy = (area.height.saturating_sub(1) / 2) as f32 - self.line_top();

        for limbo in self.current_frame() {
            if self.should_suppress_draw(&limbo) || visibility(&limbo) < LEGIBILITY_THRESHOLD {
                continue;
            }

            let Some((col, row)) = cell_for(&limbo, dy, area) else {
                continue;
            };

            let bg = limbo
                .attributes
                .style
                .bg
                .or_else(|| buf.cell((col, row)).map(|cell| cell.bg))
                .unwrap_or(Color::Reset);
            let fg = limbo.attributes.style.fg.unwrap_or(Color::Reset);
            let style = limbo.attributes.style.fg(oklch::fade(fg, bg, limbo.alpha));
            let room = (area.right() - col) as usize;

            buf.set_stringn(col, row, &limbo.symbol, room, style);
        }
    }
}

fn visibility(limbo: &CharacterLimbo) -> f32 {
    let full = limbo.attributes.font_size;
    let scale = if full > 0.0 {
        (limbo.font_size / full).min(1.0)
    } else {
        1.0
    };

    limbo.alpha * scale
}

fn cell_for(limbo: &CharacterLimbo, dy: f32, area: Area) -> Option<(u16, u16)> {
    let x = limbo.rect.x.round();
    let y = (limbo.rect.y + dy).round();

    if !(x >= 0.0 && y >= 0.0 && x < area.width as f32 && y < area.height as f32) {
        return None;
    }

    Some((area.x + x as u16, area.y + y as u16))
}
