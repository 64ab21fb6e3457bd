//! Morphing text labels.
//!
//! A [`MorphingLabel`] diffs each new text against the previous one, then
//! produces per-character placements ([`CharacterLimbo`]) every clock tick
//! until the transition settles. Effects plug into a [`EffectRegistry`] by
//! name and phase. The crate draws through ratatui, but the core only deals in
//! fractional cell geometry, so any host that implements [`GlyphMetrics`] can
//! render the frames itself.

pub mod config;
pub mod diff;
pub mod easing;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod label;
pub mod limbo;
pub mod oklch;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod text;

pub use config::MorphConfig;
pub use diff::{CharacterDiff, StringDiff};
pub use easing::Easing;
pub use error::ConfigError;
pub use geometry::{CellMetrics, GlyphMetrics, Rect, Size};
pub use label::{MorphObserver, MorphingLabel};
pub use limbo::{CharacterLimbo, EffectContext};
pub use registry::{Behavior, EffectId, EffectRegistry, Phase};
pub use scheduler::{ClockTick, MorphState, TickOutcome};
pub use text::StyledText;
