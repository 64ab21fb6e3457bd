//! Built-in morphing effects.
//!
//! `Scale` is the default pipeline and registers nothing. The others override
//! a subset of phases and fall back to the defaults in [`crate::limbo`] for
//! the rest.

use crate::easing::Easing;
use crate::limbo::{self, clamp01, CharacterLimbo, EffectContext};
use crate::registry::{EffectId, EffectRegistry};

pub fn register_builtins(registry: &mut EffectRegistry) {
    register_evaporate(registry);
    register_lift(registry);
    register_fall(registry);
    register_fade(registry);
}

/// Characters drift in a cosine wave: neighbours alternate between leading and trailing.
fn wave_progress(ctx: &EffectContext<'_>, index: usize, _progress: f32, is_new: bool) -> f32 {
    let step = ((index as f32).cos() * 1.2).round();
    let delay = if is_new {
        -ctx.character_delay
    } else {
        ctx.character_delay
    };

    clamp01(ctx.progress + delay * step)
}

fn rising_exit(
    ctx: &EffectContext<'_>,
    symbol: &str,
    index: usize,
    progress: f32,
    rise: f32,
    fades: bool,
) -> CharacterLimbo {
    let eased = ctx.easing.ease(progress, 0.0, 1.0);
    let attributes = ctx.previous_attributes(index);
    let rect = ctx
        .previous_rect(index)
        .unwrap_or_default()
        .offset_by(0.0, -rise * attributes.font_size * eased);

    CharacterLimbo {
        symbol: symbol.to_owned(),
        rect,
        alpha: if fades { 1.0 - eased } else { 1.0 },
        font_size: attributes.font_size,
        drawing_progress: 0.0,
        attributes,
    }
}

/// Rises into place from 1.2 font sizes below its slot.
fn rising_entrance(
    ctx: &EffectContext<'_>,
    symbol: &str,
    index: usize,
    progress: f32,
    alpha: f32,
) -> CharacterLimbo {
    let remaining = 1.0 - ctx.easing.ease(progress, 0.0, 1.0);
    let attributes = ctx.new_attributes(index);
    let rect = ctx
        .new_rect(index)
        .unwrap_or_default()
        .offset_by(0.0, attributes.font_size * remaining * 1.2);

    CharacterLimbo {
        symbol: symbol.to_owned(),
        rect,
        alpha,
        font_size: attributes.font_size,
        drawing_progress: 0.0,
        attributes,
    }
}

fn register_evaporate(registry: &mut EffectRegistry) {
    registry
        .on_progress(EffectId::Evaporate, wave_progress)
        .on_disappear(EffectId::Evaporate, |ctx, symbol, index, progress| {
            rising_exit(ctx, symbol, index, progress, 0.8, true)
        })
        .on_appear(EffectId::Evaporate, |ctx, symbol, index, progress| {
            rising_entrance(ctx, symbol, index, progress, ctx.session_progress())
        });
}

/// Evaporate without the fade: glyphs stay opaque while they travel.
fn register_lift(registry: &mut EffectRegistry) {
    registry
        .on_progress(EffectId::Lift, wave_progress)
        .on_disappear(EffectId::Lift, |ctx, symbol, index, progress| {
            rising_exit(ctx, symbol, index, progress, 1.0, false)
        })
        .on_appear(EffectId::Lift, |ctx, symbol, index, progress| {
            rising_entrance(ctx, symbol, index, progress, 1.0)
        });
}

fn register_fall(registry: &mut EffectRegistry) {
    registry
        .on_progress(EffectId::Fall, |ctx, index, progress, is_new| {
            if is_new {
                clamp01(progress)
            } else {
                let jitter = (index as f32).sin() * 1.7;
                clamp01(progress + ctx.character_delay * jitter)
            }
        })
        .on_disappear(EffectId::Fall, |ctx, symbol, index, progress| {
            let attributes = ctx.previous_attributes(index);
            let drop = Easing::EaseIn.ease(progress, 0.0, attributes.font_size);

            CharacterLimbo {
                symbol: symbol.to_owned(),
                rect: ctx.previous_rect(index).unwrap_or_default().offset_by(0.0, drop),
                alpha: 1.0 - progress,
                font_size: attributes.font_size,
                drawing_progress: progress,
                attributes,
            }
        })
        // Fully fallen glyphs are gone.
        .on_draw(EffectId::Fall, |limbo| limbo.drawing_progress >= 1.0);
}

fn register_fade(registry: &mut EffectRegistry) {
    registry
        .on_disappear(EffectId::Fade, |ctx, symbol, index, progress| CharacterLimbo {
            alpha: 1.0 - ctx.easing.ease(progress, 0.0, 1.0),
            ..in_place(limbo::default_disappearance(ctx, symbol, index, progress), ctx.previous_rect(index))
        })
        .on_appear(EffectId::Fade, |ctx, symbol, index, progress| CharacterLimbo {
            alpha: ctx.easing.ease(progress, 0.0, 1.0),
            ..in_place(limbo::default_appearance(ctx, symbol, index, progress), ctx.new_rect(index))
        })
        .on_skip_frames(EffectId::Fade, || 1);
}

/// Undoes the default size animation, keeping the glyph at full size in its slot.
fn in_place(limbo: CharacterLimbo, rect: Option<crate::geometry::Rect>) -> CharacterLimbo {
    CharacterLimbo {
        rect: rect.unwrap_or(limbo.rect),
        font_size: limbo.attributes.font_size,
        ..limbo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limbo::build_frame;
    use crate::limbo::tests::Fixture;

    fn frame(effect: EffectId, old: &str, new: &str, progress: f32) -> (Fixture, Vec<CharacterLimbo>) {
        let fx = Fixture::new(old, new);
        let registry = EffectRegistry::with_builtins();
        let frame = build_frame(&fx.ctx(progress), &effect, &registry);
        (fx, frame)
    }

    #[test]
    fn lift_raises_old_glyphs_while_opaque() {
        let (fx, frame) = frame(EffectId::Lift, "a", "b", 0.5);
        let old = &frame[0];

        assert!(old.rect.y < fx.previous_rects[0].y);
        assert_eq!(old.alpha, 1.0);
        assert_eq!(old.font_size, 1.0);
    }

    #[test]
    fn lift_brings_new_glyphs_up_from_below() {
        let (fx, frame) = frame(EffectId::Lift, "a", "b", 0.0);
        let new = &frame[1];

        assert!((new.rect.y - (fx.new_rects[0].y + 1.2)).abs() < 1e-5);
        assert_eq!(new.alpha, 1.0);
    }

    #[test]
    fn lift_lands_exactly_at_the_end() {
        let (fx, frame) = frame(EffectId::Lift, "a", "b", 1.0);

        assert_eq!(frame[1].rect, fx.new_rects[0]);
        assert!((frame[0].rect.y - (fx.previous_rects[0].y - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn evaporate_fades_what_it_raises() {
        let (_, frame) = frame(EffectId::Evaporate, "a", "b", 0.5);

        assert!(frame[0].alpha < 1.0);
        assert_eq!(frame[1].alpha, 0.5);
    }

    #[test]
    fn wave_progress_alternates_by_index() {
        let fx = Fixture::new("abcd", "");
        let ctx = fx.ctx(0.5);

        // round(cos(i) * 1.2) for i = 0..4 is 1, 1, 0, -1.
        assert!((wave_progress(&ctx, 0, 0.5, false) - 0.526).abs() < 1e-5);
        assert!((wave_progress(&ctx, 2, 0.5, false) - 0.5).abs() < 1e-5);
        assert!((wave_progress(&ctx, 3, 0.5, false) - 0.474).abs() < 1e-5);
        assert!((wave_progress(&ctx, 0, 0.5, true) - 0.474).abs() < 1e-5);
    }

    #[test]
    fn fall_drops_and_tracks_drawing_progress() {
        let (fx, frame) = frame(EffectId::Fall, "a", "", 0.5);
        let old = &frame[0];

        assert!(old.rect.y > fx.previous_rects[0].y);
        assert_eq!(old.drawing_progress, 0.5);
        assert_eq!(old.alpha, 0.5);
    }

    #[test]
    fn fall_draw_hook_suppresses_landed_glyphs() {
        let registry = EffectRegistry::with_builtins();
        let draw = registry.draw(&EffectId::Fall).unwrap();
        let (_, landed) = frame(EffectId::Fall, "a", "", 1.0);
        let (_, falling) = frame(EffectId::Fall, "a", "", 0.3);

        assert!(draw(&landed[0]));
        assert!(!draw(&falling[0]));
    }

    #[test]
    fn fall_uses_default_entrance() {
        let (_, fall) = frame(EffectId::Fall, "", "b", 0.4);
        let (_, scale) = frame(EffectId::Scale, "", "b", 0.4);

        assert_eq!(fall, scale);
    }

    #[test]
    fn fade_keeps_full_size_in_place() {
        let (fx, frame) = frame(EffectId::Fade, "a", "b", 0.5);

        assert_eq!(frame[0].font_size, 1.0);
        assert_eq!(frame[0].rect, fx.previous_rects[0]);
        assert_eq!(frame[1].rect, fx.new_rects[0]);
        assert!((frame[0].alpha + frame[1].alpha - 1.0).abs() < 0.1);
    }
}
