use std::cell::Cell;

use ratatui::layout::Alignment;
use ratatui::style::Style;
use tracing::{debug, warn};

use crate::config::MorphConfig;
use crate::diff::{diff_text, StringDiff};
use crate::geometry::{layout, CellMetrics, GlyphMetrics, LayoutParams, Rect, Size};
use crate::limbo::{self, CharacterLimbo, EffectContext};
use crate::registry::{EffectId, EffectRegistry};
use crate::scheduler::{ClockTick, MorphScheduler, MorphState, TickOutcome};
use crate::text::StyledText;

/// Lifecycle notifications. Every method defaults to doing nothing.
pub trait MorphObserver {
    fn on_start(&mut self) {}

    fn on_progress(&mut self, _progress: f32) {}

    fn on_complete(&mut self) {}
}

/// A label that morphs between texts.
///
/// The host feeds it clock ticks, asks for the current frame when drawing,
/// and stops its clock while [`is_clock_paused`](Self::is_clock_paused) is true.
pub struct MorphingLabel {
    config: MorphConfig,
    registry: EffectRegistry,
    scheduler: MorphScheduler,
    metrics: Box<dyn GlyphMetrics>,
    observer: Option<Box<dyn MorphObserver>>,

    bounds: Size,
    alignment: Alignment,
    font_size: f32,
    style: Style,

    previous_text: StyledText,
    text: StyledText,
    diff: StringDiff,
    previous_rects: Vec<Rect>,
    new_rects: Vec<Rect>,
    total_width: f32,
    line_top: f32,

    frames_built: Cell<u64>,
}

impl MorphingLabel {
    pub fn new(config: MorphConfig) -> Self {
        Self::with_metrics(config, CellMetrics)
    }

    pub fn with_metrics(config: MorphConfig, metrics: impl GlyphMetrics + 'static) -> Self {
        Self {
            scheduler: MorphScheduler::new(config.duration, config.character_delay),
            config,
            registry: EffectRegistry::with_builtins(),
            metrics: Box::new(metrics),
            observer: None,
            bounds: Size::default(),
            alignment: Alignment::Left,
            font_size: 1.0,
            style: Style::new(),
            previous_text: StyledText::default(),
            text: StyledText::default(),
            diff: StringDiff::default(),
            previous_rects: Vec::new(),
            new_rects: Vec::new(),
            total_width: 0.0,
            line_top: 0.0,
            frames_built: Cell::new(0),
        }
    }

    /// Assigns new text. Identical text is ignored; anything else restarts the morph.
    pub fn set_text(&mut self, text: impl Into<StyledText>) {
        let text = text.into();

        if text == self.text {
            return;
        }

        debug!(from = %self.text, to = %text, effect = %self.config.effect, "text assigned");

        self.previous_text = std::mem::replace(&mut self.text, text);
        self.diff = diff_text(&self.previous_text, &self.text);
        self.relayout();

        if !self.config.enabled {
            self.scheduler.stop();
            return;
        }

        self.scheduler.reset();

        match self.registry.start(&self.config.effect) {
            Some(start) => start(),
            None => {
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_start();
                }
            }
        }
    }

    /// Advances the running morph by one clock callback.
    pub fn tick(&mut self, tick: ClockTick) -> TickOutcome {
        let skip = self
            .registry
            .skip_frames(&self.config.effect)
            .map(|skip_frames| skip_frames());
        let outcome = self.scheduler.tick(&tick, self.text.len(), skip);

        if let Some(observer) = self.observer.as_mut() {
            match outcome {
                TickOutcome::Progressed { progress, .. } => observer.on_progress(progress),
                TickOutcome::Completed => observer.on_complete(),
                TickOutcome::Idle | TickOutcome::Waiting => {}
            }
        }

        outcome
    }

    /// Glyph placements to draw now. At rest this is the current text in place.
    pub fn current_frame(&self) -> Vec<CharacterLimbo> {
        let ctx = self.effect_context();

        if self.scheduler.is_running() {
            self.frames_built.set(self.frames_built.get() + 1);
            limbo::build_frame(&ctx, &self.config.effect, &self.registry)
        } else {
            limbo::settled_frame(&ctx)
        }
    }

    /// True when the active effect draws `limbo` itself.
    pub fn should_suppress_draw(&self, limbo: &CharacterLimbo) -> bool {
        self.scheduler.is_running()
            && self
                .registry
                .draw(&self.config.effect)
                .is_some_and(|draw| draw(limbo))
    }

    pub fn effect_context(&self) -> EffectContext<'_> {
        EffectContext {
            progress: self.scheduler.raw_progress(),
            character_delay: self.config.character_delay,
            font_size: self.font_size,
            easing: self.config.easing,
            base_style: self.style,
            previous_text: &self.previous_text,
            text: &self.text,
            previous_rects: &self.previous_rects,
            new_rects: &self.new_rects,
            diff: &self.diff,
        }
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.relayout();
        }
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.alignment != alignment {
            self.alignment = alignment;
            self.relayout();
        }
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        let font_size = font_size.max(limbo::MIN_FONT_SIZE);

        if self.font_size != font_size {
            self.font_size = font_size;
            self.relayout();
        }
    }

    /// Label-wide colour and modifiers; per-glyph styles patch over it.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_effect(&mut self, effect: EffectId) {
        if self.scheduler.is_running() && effect != self.config.effect {
            warn!(from = %self.config.effect, to = %effect, "effect switched mid-morph");
        }

        self.config.effect = effect;
    }

    /// Disabling finishes any running morph immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;

        if !enabled {
            self.scheduler.stop();
        }
    }

    /// Timing changes apply to the next morph; the effect applies from the next frame.
    pub fn set_config(&mut self, config: MorphConfig) {
        if self.scheduler.is_running() && config.effect != self.config.effect {
            warn!(from = %self.config.effect, to = %config.effect, "effect switched mid-morph");
        }

        self.scheduler.set_timing(config.duration, config.character_delay);

        if !config.enabled {
            self.scheduler.stop();
        }

        self.config = config;
    }

    pub fn set_observer(&mut self, observer: impl MorphObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn registry_mut(&mut self) -> &mut EffectRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn text(&self) -> &StyledText {
        &self.text
    }

    pub fn previous_text(&self) -> &StyledText {
        &self.previous_text
    }

    pub fn diff(&self) -> &StringDiff {
        &self.diff
    }

    pub fn state(&self) -> MorphState {
        self.scheduler.state()
    }

    pub fn progress(&self) -> f32 {
        self.scheduler.progress()
    }

    pub fn total_frames(&self) -> u32 {
        self.scheduler.total_frames()
    }

    pub fn total_delay_frames(&self) -> u32 {
        self.scheduler.total_delay_frames()
    }

    pub fn is_clock_paused(&self) -> bool {
        !self.scheduler.is_running()
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// `y` at which settled glyphs rest. Negative when the bounds are taller than a line.
    pub fn line_top(&self) -> f32 {
        self.line_top
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// How many times the limbo builder has run.
    pub fn frames_built(&self) -> u64 {
        self.frames_built.get()
    }

    fn relayout(&mut self) {
        let params = LayoutParams {
            bounds: self.bounds,
            alignment: self.alignment,
            font_size: self.font_size,
        };

        self.previous_rects = layout(&self.previous_text, &params, self.metrics.as_ref()).rects;

        let new = layout(&self.text, &params, self.metrics.as_ref());
        self.new_rects = new.rects;
        self.total_width = new.total_width;
        self.line_top = new.line_top;
    }
}

impl std::fmt::Debug for MorphingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphingLabel")
            .field("text", &self.text.to_string())
            .field("previous_text", &self.previous_text.to_string())
            .field("state", &self.scheduler.state())
            .field("progress", &self.scheduler.progress())
            .field("effect", &self.config.effect)
            .finish_non_exhaustive()
    }
}
