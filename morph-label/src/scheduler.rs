use tracing::{debug, trace};

/// Frames appended after the per-character delay so trailing glyphs settle.
pub const SETTLE_FRAMES: u32 = 5;

/// Absorbs float error when turning seconds into whole frames.
const FRAME_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MorphState {
    #[default]
    Idle,
    Running,
    Completed,
}

/// One display-refresh callback from the host clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Seconds between refreshes, as reported by the clock.
    pub duration: f32,
    pub preferred_fps: Option<u32>,
}

impl ClockTick {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            preferred_fps: None,
        }
    }

    pub fn at_fps(fps: u32) -> Self {
        Self {
            duration: 1.0 / fps as f32,
            preferred_fps: Some(fps),
        }
    }

    /// Seconds per animation frame. A 30 fps preference draws every other refresh.
    pub fn frame_interval(&self) -> f32 {
        match self.preferred_fps {
            Some(30) => self.duration / 2.0,
            _ => self.duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing is animating.
    Idle,
    /// The clock has not reported a usable interval yet.
    Waiting,
    Progressed { progress: f32, redraw: bool },
    Completed,
}

/// Drives session progress from clock ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphScheduler {
    duration: f32,
    character_delay: f32,
    state: MorphState,
    progress: f32,
    current_frame: u32,
    total_frames: u32,
    total_delay_frames: u32,
    skip_frames_count: u32,
}

impl MorphScheduler {
    pub fn new(duration: f32, character_delay: f32) -> Self {
        Self {
            duration,
            character_delay,
            state: MorphState::Idle,
            progress: 0.0,
            current_frame: 0,
            total_frames: 0,
            total_delay_frames: 0,
            skip_frames_count: 0,
        }
    }

    pub fn set_timing(&mut self, duration: f32, character_delay: f32) {
        self.duration = duration;
        self.character_delay = character_delay;
    }

    /// Starts a fresh run, discarding whatever was in flight.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.current_frame = 0;
        self.total_frames = 0;
        self.total_delay_frames = 0;
        self.skip_frames_count = 0;
        self.state = MorphState::Running;
    }

    /// Back to rest without running.
    pub fn stop(&mut self) {
        self.reset();
        self.state = MorphState::Idle;
    }

    /// `skip_frames` throttles redraws: one redraw per `skip_frames + 1` ticks.
    pub fn tick(&mut self, tick: &ClockTick, char_count: usize, skip_frames: Option<u32>) -> TickOutcome {
        if self.state != MorphState::Running {
            return TickOutcome::Idle;
        }

        if self.total_frames == 0 {
            let interval = tick.frame_interval();

            if !(interval > 0.0 && interval.is_finite()) {
                trace!(duration = tick.duration, "clock interval unusable, waiting");
                return TickOutcome::Waiting;
            }

            self.total_frames = whole_frames(self.duration, interval).max(1);
            self.total_delay_frames = whole_frames(char_count as f32 * self.character_delay, interval);

            debug!(
                total_frames = self.total_frames,
                total_delay_frames = self.total_delay_frames,
                interval,
                "morph frame budget"
            );
        }

        self.current_frame += 1;

        if self.current_frame >= self.frame_limit() {
            self.state = MorphState::Completed;
            debug!(frames = self.current_frame, "morph completed");
            return TickOutcome::Completed;
        }

        self.progress += 1.0 / self.total_frames as f32;

        let redraw = match skip_frames {
            Some(skip) => {
                self.skip_frames_count += 1;

                if self.skip_frames_count > skip {
                    self.skip_frames_count = 0;
                    true
                } else {
                    false
                }
            }

            None => true,
        };

        trace!(frame = self.current_frame, progress = self.progress, redraw, "morph tick");

        TickOutcome::Progressed {
            progress: self.progress(),
            redraw,
        }
    }

    pub fn state(&self) -> MorphState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MorphState::Running
    }

    /// Session progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress.clamp(0.0, 1.0)
    }

    /// Keeps growing past 1 through the delay and settle frames, so trailing
    /// characters can catch up. Per-character progress is clamped downstream.
    pub fn raw_progress(&self) -> f32 {
        self.progress
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn total_delay_frames(&self) -> u32 {
        self.total_delay_frames
    }

    /// Ticks a run lasts once the budget is known.
    pub fn frame_limit(&self) -> u32 {
        self.total_frames + self.total_delay_frames + SETTLE_FRAMES
    }
}

fn whole_frames(seconds: f32, interval: f32) -> u32 {
    let frames = (seconds / interval - FRAME_EPSILON).ceil();

    if frames.is_finite() && frames > 0.0 {
        frames as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(duration: f32, delay: f32) -> MorphScheduler {
        let mut s = MorphScheduler::new(duration, delay);
        s.reset();
        s
    }

    #[test]
    fn sixty_fps_budget() {
        let mut s = running(0.6, 0.026);
        let tick = ClockTick::at_fps(60);

        s.tick(&tick, 3, None);

        assert_eq!(s.total_frames(), 36);
        // ceil(3 * 0.026 * 60) = ceil(4.68)
        assert_eq!(s.total_delay_frames(), 5);
    }

    #[test]
    fn completes_after_frame_limit_ticks() {
        let mut s = running(0.6, 0.026);
        let tick = ClockTick::at_fps(60);
        let mut ticks = 0;

        while s.tick(&tick, 3, None) != TickOutcome::Completed {
            ticks += 1;
            assert!(ticks < 1000, "never completed");
        }

        assert_eq!(ticks + 1, 36 + 5 + SETTLE_FRAMES);
        assert_eq!(s.state(), MorphState::Completed);
        assert_eq!(s.tick(&tick, 3, None), TickOutcome::Idle);
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let mut s = running(0.3, 0.05);
        let tick = ClockTick::new(1.0 / 60.0);
        let mut last = 0.0;

        while let TickOutcome::Progressed { progress, .. } = s.tick(&tick, 10, None) {
            assert!(progress >= last, "{progress} < {last}");
            assert!((0.0..=1.0).contains(&progress));
            last = progress;
        }

        assert_eq!(last, 1.0);
    }

    #[test]
    fn raw_progress_runs_past_one_during_settle() {
        let mut s = running(0.6, 0.026);
        let tick = ClockTick::at_fps(60);

        for _ in 0..40 {
            s.tick(&tick, 3, None);
        }

        assert!((s.raw_progress() - 40.0 / 36.0).abs() < 1e-4);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn thirty_fps_preference_halves_interval() {
        let tick = ClockTick {
            duration: 1.0 / 60.0,
            preferred_fps: Some(30),
        };

        assert!((tick.frame_interval() - 1.0 / 120.0).abs() < 1e-7);

        let mut s = running(0.6, 0.0);
        s.tick(&tick, 0, None);
        assert_eq!(s.total_frames(), 72);
        assert_eq!(s.total_delay_frames(), 0);
    }

    #[test]
    fn unusable_interval_defers_budget() {
        let mut s = running(0.6, 0.026);

        assert_eq!(s.tick(&ClockTick::new(0.0), 4, None), TickOutcome::Waiting);
        assert_eq!(s.tick(&ClockTick::new(f32::NAN), 4, None), TickOutcome::Waiting);
        assert_eq!(s.total_frames(), 0);
        assert_eq!(s.current_frame(), 0);
        assert_eq!(s.progress(), 0.0);

        assert!(matches!(
            s.tick(&ClockTick::at_fps(60), 4, None),
            TickOutcome::Progressed { .. }
        ));
        assert_eq!(s.total_frames(), 36);
    }

    #[test]
    fn skip_frames_throttles_redraws() {
        let mut s = running(1.0, 0.0);
        let tick = ClockTick::at_fps(60);
        let redraws: Vec<bool> = (0..6)
            .map(|_| match s.tick(&tick, 1, Some(1)) {
                TickOutcome::Progressed { redraw, .. } => redraw,
                other => panic!("unexpected {other:?}"),
            })
            .collect();

        assert_eq!(redraws, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn zero_duration_still_takes_a_frame() {
        let mut s = running(0.0, 0.0);
        s.tick(&ClockTick::at_fps(60), 0, None);

        assert_eq!(s.total_frames(), 1);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn reset_discards_in_flight_run() {
        let mut s = running(0.6, 0.026);
        let tick = ClockTick::at_fps(60);

        for _ in 0..10 {
            s.tick(&tick, 3, None);
        }

        s.reset();

        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.current_frame(), 0);
        assert_eq!(s.total_frames(), 0);
        assert!(s.is_running());
    }

    #[test]
    fn idle_scheduler_ignores_ticks() {
        let mut s = MorphScheduler::new(0.6, 0.026);

        assert_eq!(s.tick(&ClockTick::at_fps(60), 3, None), TickOutcome::Idle);
        assert_eq!(s.current_frame(), 0);
    }
}
