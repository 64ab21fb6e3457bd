//! Oklch colour math for fading glyphs on a terminal, which has no alpha channel.

use std::f32::consts::PI;

use ratatui::style::Color;

/// Perceptual lightness, chroma and hue (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

impl Oklch {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let [r, g, b] = [r, g, b].map(|v| srgb_to_linear(v as f32 / 255.0));

        let l = (0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b).cbrt();
        let m = (0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b).cbrt();
        let s = (0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b).cbrt();

        let lightness = 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s;
        let a = 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s;
        let b = 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s;

        let c = a.hypot(b);
        let h = if c < 1e-8 { 0.0 } else { b.atan2(a) };

        Self { l: lightness, c, h }
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        let (a, b) = (self.c * self.h.cos(), self.c * self.h.sin());

        let l = (self.l + 0.3963377774 * a + 0.2158037573 * b).powi(3);
        let m = (self.l - 0.1055613458 * a - 0.0638541728 * b).powi(3);
        let s = (self.l - 0.0894841775 * a - 1.2914855480 * b).powi(3);

        let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
        let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
        let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

        let to_u8 = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0 + 0.5) as u8;

        (to_u8(r), to_u8(g), to_u8(b))
    }

    /// `None` for colours the terminal resolves itself (`Reset`, indexed palette).
    pub fn from_color(color: Color) -> Option<Self> {
        let (r, g, b) = match color {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Black => (0, 0, 0),
            Color::Red => (128, 0, 0),
            Color::Green => (0, 128, 0),
            Color::Yellow => (128, 128, 0),
            Color::Blue => (0, 0, 128),
            Color::Magenta => (128, 0, 128),
            Color::Cyan => (0, 128, 128),
            Color::Gray => (192, 192, 192),
            Color::DarkGray => (128, 128, 128),
            Color::LightRed => (255, 0, 0),
            Color::LightGreen => (0, 255, 0),
            Color::LightYellow => (255, 255, 0),
            Color::LightBlue => (0, 0, 255),
            Color::LightMagenta => (255, 0, 255),
            Color::LightCyan => (0, 255, 255),
            Color::White => (255, 255, 255),
            Color::Reset | Color::Indexed(_) => return None,
        };

        Some(Self::from_rgb(r, g, b))
    }

    pub fn to_color(self) -> Color {
        let (r, g, b) = self.to_rgb();
        Color::Rgb(r, g, b)
    }

    /// Interpolates toward `other`; hue takes the shortest arc.
    pub fn mix(self, other: Self, t: f32) -> Self {
        let mut dh = other.h - self.h;

        if dh > PI {
            dh -= 2.0 * PI;
        } else if dh < -PI {
            dh += 2.0 * PI;
        }

        // An achromatic endpoint has no meaningful hue; keep the other's.
        let h = match (self.c < 1e-4, other.c < 1e-4) {
            (true, false) => other.h,
            (false, true) => self.h,
            _ => self.h + dh * t,
        };

        Self {
            l: self.l + (other.l - self.l) * t,
            c: self.c + (other.c - self.c) * t,
            h,
        }
    }
}

/// Blends `fg` over `bg` at opacity `alpha`. Colours without an RGB value pass through.
pub fn fade(fg: Color, bg: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);

    if alpha >= 1.0 {
        return fg;
    }

    match (Oklch::from_color(fg), Oklch::from_color(bg)) {
        (Some(fg), Some(bg)) => bg.mix(fg, alpha).to_color(),
        (Some(fg), None) => Oklch { l: fg.l * alpha, c: fg.c * alpha, h: fg.h }.to_color(),
        (None, _) => fg,
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (u8, u8, u8), b: (u8, u8, u8)) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).unsigned_abs() <= 1;
        d(a.0, b.0) && d(a.1, b.1) && d(a.2, b.2)
    }

    #[test]
    fn rgb_survives_conversion() {
        for rgb in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (128, 64, 32), (10, 200, 150), (1, 1, 1)] {
            let back = Oklch::from_rgb(rgb.0, rgb.1, rgb.2).to_rgb();
            assert!(close(rgb, back), "{rgb:?} came back as {back:?}");
        }
    }

    #[test]
    fn lightness_extremes() {
        assert!(Oklch::from_rgb(0, 0, 0).l.abs() < 1e-6);
        assert!((Oklch::from_rgb(255, 255, 255).l - 1.0).abs() < 0.01);
        assert!(Oklch::from_rgb(90, 90, 90).c < 1e-4);
    }

    #[test]
    fn palette_colours_without_rgb_are_none() {
        assert_eq!(Oklch::from_color(Color::Reset), None);
        assert_eq!(Oklch::from_color(Color::Indexed(42)), None);
        assert!(Oklch::from_color(Color::Cyan).is_some());
    }

    #[test]
    fn fade_endpoints() {
        let fg = Color::Rgb(200, 120, 40);
        let bg = Color::Rgb(0, 0, 0);

        assert_eq!(fade(fg, bg, 1.0), fg);

        let Color::Rgb(r, g, b) = fade(fg, bg, 0.0) else {
            panic!("expected rgb");
        };
        assert!(close((r, g, b), (0, 0, 0)));
    }

    #[test]
    fn half_fade_is_darker_on_black() {
        let fg = Oklch::from_rgb(255, 255, 255);
        let faded = Oklch::from_color(fade(Color::White, Color::Black, 0.5)).unwrap();

        assert!(faded.l < fg.l);
        assert!(faded.l > 0.3);
    }

    #[test]
    fn fade_without_background_dims() {
        let faded = Oklch::from_color(fade(Color::White, Color::Reset, 0.25)).unwrap();

        assert!((faded.l - 0.25).abs() < 0.02);
    }

    #[test]
    fn indexed_foreground_passes_through() {
        assert_eq!(fade(Color::Indexed(7), Color::Black, 0.3), Color::Indexed(7));
    }

    #[test]
    fn mix_keeps_hue_of_chromatic_end() {
        let red = Oklch::from_rgb(255, 0, 0);
        let black = Oklch::from_rgb(0, 0, 0);

        assert_eq!(black.mix(red, 0.5).h, red.h);
    }
}
