use serde::{Deserialize, Serialize};

pub fn linear(t: f32) -> f32 {
    t
}

pub fn ease_in(t: f32) -> f32 {
    t * t
}

pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn ease_in_quint(t: f32) -> f32 {
    t * t * t * t * t
}

/// Fast start, long settle. The default curve for glyph motion.
pub fn ease_out_quint(t: f32) -> f32 {
    let u = t - 1.0;
    u * u * u * u * u + 1.0
}

/// Named curve, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuint,
    #[default]
    EaseOutQuint,
}

impl Easing {
    pub fn curve(self) -> fn(f32) -> f32 {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseInQuint => ease_in_quint,
            Self::EaseOutQuint => ease_out_quint,
        }
    }

    /// Maps normalized time `t` onto `start..start + delta`. `t` is clamped to `[0, 1]`.
    pub fn ease(self, t: f32, start: f32, delta: f32) -> f32 {
        start + delta * (self.curve())(t.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
    ];

    fn assert_boundaries(f: impl Fn(f32) -> f32) {
        assert!(f(0.0).abs() < 1e-6, "f(0) = {}, expected 0", f(0.0));
        assert!((f(1.0) - 1.0).abs() < 1e-6, "f(1) = {}, expected 1", f(1.0));
    }

    fn assert_monotonic(f: impl Fn(f32) -> f32) {
        let mut prev = f(0.0);

        for i in 1..=100 {
            let t = i as f32 / 100.0;
            let val = f(t);
            assert!(val >= prev - 1e-6, "non-monotonic at t={t}: {prev} > {val}");
            prev = val;
        }
    }

    #[test]
    fn linear_is_identity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((linear(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn named_curves_hit_boundaries_and_rise() {
        for easing in ALL {
            assert_boundaries(easing.curve());
            assert_monotonic(easing.curve());
        }
    }

    #[test]
    fn ease_out_quint_starts_fast() {
        assert!(ease_out_quint(0.25) > 0.7);
        assert!(ease_in_quint(0.25) < 0.01);
    }

    #[test]
    fn ease_maps_onto_range() {
        let e = Easing::EaseOutQuint;

        assert!((e.ease(0.0, 10.0, 5.0) - 10.0).abs() < 1e-6);
        assert!((e.ease(1.0, 10.0, 5.0) - 15.0).abs() < 1e-6);
        assert!((e.ease(1.0, 4.0, -4.0)).abs() < 1e-6);
    }

    #[test]
    fn ease_clamps_time() {
        let e = Easing::Linear;

        assert_eq!(e.ease(-0.5, 0.0, 2.0), 0.0);
        assert_eq!(e.ease(1.5, 0.0, 2.0), 2.0);
    }

    #[test]
    fn parses_camel_case_names() {
        let e: Easing = serde_json::from_str("\"easeInOut\"").unwrap();
        assert_eq!(e, Easing::EaseInOut);
        assert_eq!(Easing::default(), Easing::EaseOutQuint);
    }
}
