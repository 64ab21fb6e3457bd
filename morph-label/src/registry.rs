use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::limbo::{CharacterLimbo, EffectContext};

/// Name of a morphing effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectId {
    #[default]
    Scale,
    Evaporate,
    Lift,
    Fall,
    Fade,
    Custom(String),
}

impl EffectId {
    pub const BUILTIN: [EffectId; 5] = [
        EffectId::Scale,
        EffectId::Evaporate,
        EffectId::Lift,
        EffectId::Fall,
        EffectId::Fade,
    ];

    pub fn name(&self) -> &str {
        match self {
            Self::Scale => "scale",
            Self::Evaporate => "evaporate",
            Self::Lift => "lift",
            Self::Fall => "fall",
            Self::Fade => "fade",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in names match case-insensitively; anything else is a custom effect.
impl From<&str> for EffectId {
    fn from(name: &str) -> Self {
        Self::BUILTIN
            .into_iter()
            .find(|builtin| builtin.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| Self::Custom(name.to_owned()))
    }
}

impl From<String> for EffectId {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<EffectId> for String {
    fn from(id: EffectId) -> Self {
        id.name().to_owned()
    }
}

impl FromStr for EffectId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Hook point in the per-frame pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    Appear,
    Disappear,
    Draw,
    Progress,
    SkipFrames,
}

pub type StartFn = Box<dyn Fn() + Send + Sync>;
pub type LimboFn = Box<dyn Fn(&EffectContext<'_>, &str, usize, f32) -> CharacterLimbo + Send + Sync>;
pub type ProgressFn = Box<dyn Fn(&EffectContext<'_>, usize, f32, bool) -> f32 + Send + Sync>;
pub type SkipFramesFn = Box<dyn Fn() -> u32 + Send + Sync>;
pub type DrawFn = Box<dyn Fn(&CharacterLimbo) -> bool + Send + Sync>;

/// A closure for exactly one phase.
pub enum Behavior {
    Start(StartFn),
    Appear(LimboFn),
    Disappear(LimboFn),
    Draw(DrawFn),
    Progress(ProgressFn),
    SkipFrames(SkipFramesFn),
}

impl Behavior {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Start(_) => Phase::Start,
            Self::Appear(_) => Phase::Appear,
            Self::Disappear(_) => Phase::Disappear,
            Self::Draw(_) => Phase::Draw,
            Self::Progress(_) => Phase::Progress,
            Self::SkipFrames(_) => Phase::SkipFrames,
        }
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Behavior").field(&self.phase()).finish()
    }
}

/// Every phase an effect may override. `None` means the default behavior.
#[derive(Default)]
pub struct EffectPhases {
    pub start: Option<StartFn>,
    pub appear: Option<LimboFn>,
    pub disappear: Option<LimboFn>,
    pub draw: Option<DrawFn>,
    pub progress: Option<ProgressFn>,
    pub skip_frames: Option<SkipFramesFn>,
}

impl EffectPhases {
    pub fn has(&self, phase: Phase) -> bool {
        match phase {
            Phase::Start => self.start.is_some(),
            Phase::Appear => self.appear.is_some(),
            Phase::Disappear => self.disappear.is_some(),
            Phase::Draw => self.draw.is_some(),
            Phase::Progress => self.progress.is_some(),
            Phase::SkipFrames => self.skip_frames.is_some(),
        }
    }

    /// Installs `behavior` in its phase slot, handing back what it displaced.
    fn set(&mut self, behavior: Behavior) -> Option<Behavior> {
        match behavior {
            Behavior::Start(f) => self.start.replace(f).map(Behavior::Start),
            Behavior::Appear(f) => self.appear.replace(f).map(Behavior::Appear),
            Behavior::Disappear(f) => self.disappear.replace(f).map(Behavior::Disappear),
            Behavior::Draw(f) => self.draw.replace(f).map(Behavior::Draw),
            Behavior::Progress(f) => self.progress.replace(f).map(Behavior::Progress),
            Behavior::SkipFrames(f) => self.skip_frames.replace(f).map(Behavior::SkipFrames),
        }
    }
}

impl fmt::Debug for EffectPhases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const ALL: [Phase; 6] = [
            Phase::Start,
            Phase::Appear,
            Phase::Disappear,
            Phase::Draw,
            Phase::Progress,
            Phase::SkipFrames,
        ];

        f.debug_set()
            .entries(ALL.iter().filter(|phase| self.has(**phase)))
            .finish()
    }
}

/// Table of `(effect, phase)` overrides.
///
/// Populated at setup; the animation only reads it.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    effects: FxHashMap<EffectId, EffectPhases>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::effects::register_builtins(&mut registry);
        registry
    }

    pub fn register(&mut self, effect: EffectId, behavior: Behavior) -> Option<Behavior> {
        self.effects.entry(effect).or_default().set(behavior)
    }

    pub fn phases(&self, effect: &EffectId) -> Option<&EffectPhases> {
        self.effects.get(effect)
    }

    pub fn contains(&self, effect: &EffectId, phase: Phase) -> bool {
        self.phases(effect).is_some_and(|phases| phases.has(phase))
    }

    pub fn start(&self, effect: &EffectId) -> Option<&StartFn> {
        self.phases(effect)?.start.as_ref()
    }

    pub fn appear(&self, effect: &EffectId) -> Option<&LimboFn> {
        self.phases(effect)?.appear.as_ref()
    }

    pub fn disappear(&self, effect: &EffectId) -> Option<&LimboFn> {
        self.phases(effect)?.disappear.as_ref()
    }

    pub fn draw(&self, effect: &EffectId) -> Option<&DrawFn> {
        self.phases(effect)?.draw.as_ref()
    }

    pub fn progress(&self, effect: &EffectId) -> Option<&ProgressFn> {
        self.phases(effect)?.progress.as_ref()
    }

    pub fn skip_frames(&self, effect: &EffectId) -> Option<&SkipFramesFn> {
        self.phases(effect)?.skip_frames.as_ref()
    }

    pub fn on_start(&mut self, effect: EffectId, f: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.register(effect, Behavior::Start(Box::new(f)));
        self
    }

    pub fn on_appear(
        &mut self,
        effect: EffectId,
        f: impl Fn(&EffectContext<'_>, &str, usize, f32) -> CharacterLimbo + Send + Sync + 'static,
    ) -> &mut Self {
        self.register(effect, Behavior::Appear(Box::new(f)));
        self
    }

    pub fn on_disappear(
        &mut self,
        effect: EffectId,
        f: impl Fn(&EffectContext<'_>, &str, usize, f32) -> CharacterLimbo + Send + Sync + 'static,
    ) -> &mut Self {
        self.register(effect, Behavior::Disappear(Box::new(f)));
        self
    }

    pub fn on_draw(
        &mut self,
        effect: EffectId,
        f: impl Fn(&CharacterLimbo) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.register(effect, Behavior::Draw(Box::new(f)));
        self
    }

    pub fn on_progress(
        &mut self,
        effect: EffectId,
        f: impl Fn(&EffectContext<'_>, usize, f32, bool) -> f32 + Send + Sync + 'static,
    ) -> &mut Self {
        self.register(effect, Behavior::Progress(Box::new(f)));
        self
    }

    pub fn on_skip_frames(
        &mut self,
        effect: EffectId,
        f: impl Fn() -> u32 + Send + Sync + 'static,
    ) -> &mut Self {
        self.register(effect, Behavior::SkipFrames(Box::new(f)));
        self
    }
}
