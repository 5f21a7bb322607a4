//! HSL boundary conversion
//!
//! Compositing and filter math are defined in RGB. HSL exists only so
//! callers holding hue/saturation/lightness colours can convert at the edge.

use super::Pixel;

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }
}

impl Pixel {
    /// Convert the colour components to HSL (alpha is dropped)
    pub fn to_hsl(&self) -> Hsl {
        let max = self.max_value() as f64;
        let r = self.r() as f64 / max;
        let g = self.g() as f64 / max;
        let b = self.b() as f64 / max;

        let hi = r.max(g).max(b);
        let lo = r.min(g).min(b);
        let l = (hi + lo) / 2.0;
        let delta = hi - lo;

        if delta == 0.0 {
            return Hsl::new(0.0, 0.0, l);
        }

        let s = delta / (1.0 - (2.0 * l - 1.0).abs());
        let h = if hi == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if hi == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        Hsl::new(h, s, l)
    }

    /// Build a pixel from an HSL colour, an alpha and a channel ceiling
    pub fn from_hsl(hsl: Hsl, alpha: u16, max_value: u16) -> Pixel {
        let hsl = Hsl::new(hsl.h, hsl.s, hsl.l);
        let chroma = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
        let sector = hsl.h / 60.0;
        let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let m = hsl.l - chroma / 2.0;

        let (r1, g1, b1) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let max = max_value.max(1) as f64;
        let scale = |c: f64| ((c + m) * max).round() as i64;
        Pixel::clamped(scale(r1), scale(g1), scale(b1), alpha as i64, max_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_primary_colours() {
        let red = Pixel::rgb(255, 0, 0, 255).unwrap().to_hsl();
        assert_relative_eq!(red.h, 0.0);
        assert_relative_eq!(red.s, 1.0);
        assert_relative_eq!(red.l, 0.5);

        let blue = Pixel::rgb(0, 0, 255, 255).unwrap().to_hsl();
        assert_relative_eq!(blue.h, 240.0);
    }

    #[test]
    fn test_grey_has_no_saturation() {
        let grey = Pixel::rgb(128, 128, 128, 255).unwrap().to_hsl();
        assert_relative_eq!(grey.s, 0.0);
        assert_relative_eq!(grey.l, 128.0 / 255.0);
    }

    #[test]
    fn test_from_hsl() {
        let green = Pixel::from_hsl(Hsl::new(120.0, 1.0, 0.5), 255, 255);
        assert_eq!(green.channels(), [0, 255, 0, 255]);

        let pale = Pixel::from_hsl(Hsl::new(0.0, 1.0, 0.75), 10, 255);
        assert_eq!(pale.channels(), [255, 128, 128, 10]);
    }

    #[test]
    fn test_roundtrip_preserves_colour() {
        for (r, g, b) in [(12, 200, 99), (255, 128, 0), (3, 3, 250)] {
            let p = Pixel::rgba(r, g, b, 90, 255).unwrap();
            let back = Pixel::from_hsl(p.to_hsl(), p.a(), 255);
            assert_eq!(back, p);
        }
    }
}
