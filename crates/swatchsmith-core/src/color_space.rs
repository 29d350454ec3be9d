// ABOUTME: Color space conversions (sRGB, CIE XYZ, CIE LAB, HSL) and perceptual distance
// ABOUTME: Stateless helpers used by ramp generation and token matching

use swatchsmith_types::Rgb;

/// D65 reference white, scaled to Y = 100.
const REF_X: f32 = 95.047;
const REF_Y: f32 = 100.0;
const REF_Z: f32 = 108.883;

/// CIE companding threshold, (6/29)^3.
const LAB_EPSILON: f32 = 0.008856;

/// CIE LAB color (L in 0..=100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// HSL color, every component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Color space helpers
pub struct ColorSpace;

impl ColorSpace {
    // ==========================
    // sRGB companding
    // ==========================
    pub fn srgb_to_linear(v: f32) -> f32 {
        if v > 0.04045 {
            ((v + 0.055) / 1.055).powf(2.4)
        } else {
            v / 12.92
        }
    }

    // ==========================
    // sRGB -> XYZ -> LAB
    // ==========================

    /// Convert gamma-encoded sRGB to CIE LAB under D65.
    pub fn rgb_to_lab(color: Rgb) -> Lab {
        let r = Self::srgb_to_linear(color.r) * 100.0;
        let g = Self::srgb_to_linear(color.g) * 100.0;
        let b = Self::srgb_to_linear(color.b) * 100.0;

        let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
        let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
        let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

        let fx = Self::lab_f(x / REF_X);
        let fy = Self::lab_f(y / REF_Y);
        let fz = Self::lab_f(z / REF_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    fn lab_f(t: f32) -> f32 {
        if t > LAB_EPSILON {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    }

    /// CIE76 distance between two LAB colors.
    pub fn lab_distance(a: Lab, b: Lab) -> f32 {
        let dl = a.l - b.l;
        let da = a.a - b.a;
        let db = a.b - b.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Perceptual distance (CIE76 ΔE) between two sRGB colors.
    ///
    /// Plain Euclidean distance in LAB. It over-weights differences in
    /// saturated blues and yellows compared with CIEDE2000, which is
    /// acceptable for the coarse auto/suggest tiers it feeds.
    pub fn delta_e(a: Rgb, b: Rgb) -> f32 {
        Self::lab_distance(Self::rgb_to_lab(a), Self::rgb_to_lab(b))
    }

    // ==========================
    // RGB <-> HSL
    // ==========================
    pub fn rgb_to_hsl(color: Rgb) -> Hsl {
        let Rgb { r, g, b } = color;
        let max = r.max(g.max(b));
        let min = r.min(g.min(b));
        let l = (max + min) * 0.5;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        } / 6.0;

        // Hue wraps into [0, 1)
        let h = if h >= 1.0 { h - 1.0 } else { h };
        Hsl { h, s, l }
    }

    pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
        let Hsl { h, s, l } = hsl;
        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb::new(
            Self::hue_to_channel(p, q, h + 1.0 / 3.0),
            Self::hue_to_channel(p, q, h),
            Self::hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }

    fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
        let t = if t < 0.0 {
            t + 1.0
        } else if t > 1.0 {
            t - 1.0
        } else {
            t
        };

        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    // ==========================
    // Blending
    // ==========================

    /// Linear interpolation in sRGB. `t` is not clamped; values outside
    /// [0, 1] extrapolate.
    pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        let mix = |x: f32, y: f32| x * (1.0 - t) + y * t;
        Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }

    /// Move toward white by `amount`.
    pub fn lighten(color: Rgb, amount: f32) -> Rgb {
        Self::lerp(color, Rgb::WHITE, amount)
    }

    /// Move toward black by `amount`.
    pub fn darken(color: Rgb, amount: f32) -> Rgb {
        Self::lerp(color, Rgb::BLACK, amount)
    }

    /// Add percentage points of saturation and lightness in HSL space.
    pub fn boost(color: Rgb, saturation_pct: f32, lightness_pct: f32) -> Rgb {
        let hsl = Self::rgb_to_hsl(color);
        Self::hsl_to_rgb(Hsl {
            h: hsl.h,
            s: (hsl.s + saturation_pct / 100.0).clamp(0.0, 1.0),
            l: (hsl.l + lightness_pct / 100.0).clamp(0.0, 1.0),
        })
    }
}
