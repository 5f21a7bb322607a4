//! RGBA Pixel
//!
//! A single colour sample with a fixed channel ceiling (`max_value`).
//! All arithmetic saturates into `[0, max_value]`; operations always
//! return a new pixel and never mutate the receiver.

use std::fmt;

use crate::error::{CollageError, Result};
use crate::filter::FilterKind;

// ============================================================================
// Constants
// ============================================================================

/// Channel ceiling used when a project does not specify one
pub const DEFAULT_MAX_VALUE: u16 = 255;

/// Rec. 709 luma weights
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

// ============================================================================
// Pixel
// ============================================================================

/// An RGBA colour sample
///
/// Invariant: `0 <= r, g, b, a <= max_value` and `max_value > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    r: u16,
    g: u16,
    b: u16,
    a: u16,
    max_value: u16,
}

impl Pixel {
    /// Create an opaque pixel, rejecting out-of-range components
    pub fn rgb(r: u16, g: u16, b: u16, max_value: u16) -> Result<Self> {
        Self::rgba(r, g, b, max_value, max_value)
    }

    /// Create a pixel with explicit alpha, rejecting out-of-range components
    ///
    /// # Errors
    /// `InvalidChannel` if `max_value` is zero or any component exceeds it.
    pub fn rgba(r: u16, g: u16, b: u16, a: u16, max_value: u16) -> Result<Self> {
        if max_value == 0 {
            return Err(CollageError::InvalidChannel {
                reason: "max value must be positive".to_string(),
            });
        }
        for (label, value) in [("r", r), ("g", g), ("b", b), ("a", a)] {
            if value > max_value {
                return Err(CollageError::InvalidChannel {
                    reason: format!("{} = {} exceeds max value {}", label, value, max_value),
                });
            }
        }
        Ok(Self {
            r,
            g,
            b,
            a,
            max_value,
        })
    }

    /// Create a pixel, saturating every component into `[0, max_value]`
    ///
    /// A zero `max_value` is raised to 1.
    pub fn clamped(r: i64, g: i64, b: i64, a: i64, max_value: u16) -> Self {
        let max_value = max_value.max(1);
        let clamp = |c: i64| c.clamp(0, max_value as i64) as u16;
        Self {
            r: clamp(r),
            g: clamp(g),
            b: clamp(b),
            a: clamp(a),
            max_value,
        }
    }

    /// Fully transparent white, the content of a freshly created layer
    pub fn transparent_white(max_value: u16) -> Self {
        let max_value = max_value.max(1);
        Self {
            r: max_value,
            g: max_value,
            b: max_value,
            a: 0,
            max_value,
        }
    }

    pub fn r(&self) -> u16 {
        self.r
    }

    pub fn g(&self) -> u16 {
        self.g
    }

    pub fn b(&self) -> u16 {
        self.b
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Components as `[r, g, b, a]`
    pub fn channels(&self) -> [u16; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether alpha is at its ceiling
    pub fn is_opaque(&self) -> bool {
        self.a == self.max_value
    }

    /// Value-copy of this pixel
    pub fn copy(&self) -> Self {
        *self
    }

    // ------------------------------------------------------------------------
    // Derived metrics
    // ------------------------------------------------------------------------

    /// Largest of the three colour components
    pub fn value(&self) -> u16 {
        self.r.max(self.g).max(self.b)
    }

    /// Mean of the colour components, truncated toward zero
    pub fn intensity(&self) -> u16 {
        ((self.r as u32 + self.g as u32 + self.b as u32) / 3) as u16
    }

    /// Rec. 709 weighted brightness, rounded to the nearest integer
    pub fn luma(&self) -> u16 {
        let luma = LUMA_R * self.r as f64 + LUMA_G * self.g as f64 + LUMA_B * self.b as f64;
        luma.round().clamp(0.0, self.max_value as f64) as u16
    }

    // ------------------------------------------------------------------------
    // Depth conversion
    // ------------------------------------------------------------------------

    /// Map every component proportionally onto another channel ceiling
    ///
    /// A zero `new_max` is raised to 1.
    pub fn rescale(&self, new_max: u16) -> Self {
        let new_max = new_max.max(1);
        if new_max == self.max_value {
            return *self;
        }
        let old = self.max_value as u64;
        let scale = |c: u16| ((c as u64 * new_max as u64 + old / 2) / old) as i64;
        Self::clamped(
            scale(self.r),
            scale(self.g),
            scale(self.b),
            scale(self.a),
            new_max,
        )
    }

    // ------------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------------

    /// Apply a filter, returning the transformed pixel
    ///
    /// `below` is the raw pixel at the same position on the layer directly
    /// beneath. Blend modes without a pixel below behave as `Normal`.
    pub fn apply(&self, filter: FilterKind, below: Option<Pixel>) -> Pixel {
        let below = below.map(|p| p.rescale(self.max_value));
        match filter {
            FilterKind::Normal => *self,
            FilterKind::RedComponent => self.with_rgb(self.r as i64, 0, 0),
            FilterKind::GreenComponent => self.with_rgb(0, self.g as i64, 0),
            FilterKind::BlueComponent => self.with_rgb(0, 0, self.b as i64),
            FilterKind::BrightenValue => self.shift(self.value() as i64),
            FilterKind::DarkenValue => self.shift(-(self.value() as i64)),
            FilterKind::BrightenIntensity => self.shift(self.intensity() as i64),
            FilterKind::DarkenIntensity => self.shift(-(self.intensity() as i64)),
            FilterKind::BrightenLuma => self.shift(self.luma() as i64),
            FilterKind::DarkenLuma => self.shift(-(self.luma() as i64)),
            FilterKind::Multiply => match below {
                Some(bottom) => self.blend(&bottom, |top, bottom, max| top * bottom / max),
                None => *self,
            },
            FilterKind::Screen => match below {
                Some(bottom) => self.blend(&bottom, |top, bottom, max| {
                    max - (max - top) * (max - bottom) / max
                }),
                None => *self,
            },
            FilterKind::Difference => match below {
                Some(bottom) => self.blend(&bottom, |top, bottom, _| (top - bottom).abs()),
                None => *self,
            },
        }
    }

    /// Same alpha, new colour components (saturated)
    fn with_rgb(&self, r: i64, g: i64, b: i64) -> Pixel {
        Pixel::clamped(r, g, b, self.a as i64, self.max_value)
    }

    /// Add `delta` to each colour component
    fn shift(&self, delta: i64) -> Pixel {
        self.with_rgb(
            self.r as i64 + delta,
            self.g as i64 + delta,
            self.b as i64 + delta,
        )
    }

    /// Combine each colour component with the matching one from `bottom`
    fn blend(&self, bottom: &Pixel, op: impl Fn(i64, i64, i64) -> i64) -> Pixel {
        let max = self.max_value as i64;
        self.with_rgb(
            op(self.r as i64, bottom.r as i64, max),
            op(self.g as i64, bottom.g as i64, max),
            op(self.b as i64, bottom.b as i64, max),
        )
    }

    // ------------------------------------------------------------------------
    // Compositing
    // ------------------------------------------------------------------------

    /// Source-over compositing of `self` on top of `below`
    ///
    /// `below` is brought to this pixel's channel ceiling first.
    pub fn merge(&self, below: &Pixel) -> Pixel {
        let below = below.rescale(self.max_value);
        if self.a == 0 {
            return below;
        }
        if self.is_opaque() {
            return *self;
        }

        let max = self.max_value as f64;
        let alpha_top = self.a as f64 / max;
        let alpha_below = below.a as f64 / max;
        let alpha_out = alpha_top + alpha_below * (1.0 - alpha_top);

        let channel = |top: u16, bottom: u16| -> i64 {
            if alpha_out > 0.0 {
                let c = (top as f64 * alpha_top
                    + bottom as f64 * alpha_below * (1.0 - alpha_top))
                    / alpha_out;
                c.round() as i64
            } else {
                0
            }
        };

        Pixel::clamped(
            channel(self.r, below.r),
            channel(self.g, below.g),
            channel(self.b, below.b),
            (alpha_out * max).round() as i64,
            self.max_value,
        )
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

// ============================================================================
// Tests
// ============================================================================
