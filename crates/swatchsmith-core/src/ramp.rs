// ABOUTME: Expands sparse key colors into full Light/Dark token scales for one group
// ABOUTME: Interpolates between keys, extrapolates with a stepped falloff, and builds opacity variants

use serde::{Deserialize, Serialize};
use swatchsmith_logging::{debug, trace, warn};
use swatchsmith_types::{KeyColor, Mode, Rgb, Rgba};

use crate::color_space::ColorSpace;

/// Positions covered by the Light half of a ramp.
pub const LIGHT_POSITIONS: [i32; 6] = [0, 100, 200, 300, 400, 500];

/// Positions covered by the Dark half of a ramp. 500 is shared with Light.
pub const DARK_POSITIONS: [i32; 6] = [500, 600, 700, 800, 900, 1000];

/// Emitted for every position of a mode that has no key colors.
pub const GRAY_SENTINEL: Rgb = Rgb::new(0.5, 0.5, 0.5);

/// Lighten/darken amount by number of 100-steps beyond the nearest key.
/// Compresses toward white/black the way hand-made ramps do instead of
/// overshooting linearly.
const FALLOFF: [f32; 6] = [0.0, 0.30, 0.50, 0.80, 0.90, 0.95];

/// Alpha per position for the opacity variant, symmetric around 500.
const OPACITY_ALPHA: [(i32, f32); 11] = [
    (0, 0.20),
    (100, 0.48),
    (200, 0.64),
    (300, 0.88),
    (400, 0.94),
    (500, 1.0),
    (600, 0.94),
    (700, 0.88),
    (800, 0.64),
    (900, 0.48),
    (1000, 0.20),
];

/// The Dark step boosted by [`OpacityPolicy::BoostedDark`], and by how much.
const BOOST_POSITION: i32 = 700;
const BOOST_SATURATION_PCT: f32 = 7.0;
const BOOST_LIGHTNESS_PCT: f32 = 2.0;

/// Which color the opacity variant is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpacityPolicy {
    /// Every position reuses the key nearest to 500, varying only alpha.
    #[default]
    Translucent,
    /// As `Translucent` for Light; the Dark half is built from the Dark 700
    /// color boosted by +7% saturation and +2% lightness.
    BoostedDark,
}

/// The two token families generated per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Opaque,
    Opacity,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Opaque => "Opaque",
            Variant::Opacity => "Opacity",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RampEntry {
    pub name: String,
    pub mode: Mode,
    pub position: i32,
    pub variant: Variant,
    pub value: Rgba,
    /// True when the value is the gray sentinel standing in for missing keys.
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampWarning {
    /// The group has no keys for this mode; its positions hold the gray sentinel.
    MissingKeys { mode: Mode },
}

/// A fully populated scale for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Ramp {
    pub group: String,
    pub entries: Vec<RampEntry>,
    pub warnings: Vec<RampWarning>,
}

impl Ramp {
    pub fn get(&self, name: &str) -> Option<&RampEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn fallback_count(&self) -> usize {
        self.entries.iter().filter(|e| e.fallback).count()
    }
}

/// Alpha used by the opacity variant at `position`; 1.0 off the table.
pub fn opacity_alpha(position: i32) -> f32 {
    OPACITY_ALPHA
        .iter()
        .find(|(p, _)| *p == position)
        .map_or(1.0, |(_, alpha)| *alpha)
}

/// Falloff amount for `steps` hundreds beyond a key, clamped to the table.
pub fn falloff(steps: usize) -> f32 {
    FALLOFF[steps.min(FALLOFF.len() - 1)]
}

/// `Group/Variant/ppp`, with the shared 500 step tagged by mode.
pub fn token_name(group: &str, variant: Variant, position: i32, mode: Mode) -> String {
    let suffix = if position == 500 {
        format!(" ({})", mode)
    } else {
        String::new()
    };
    format!("{}/{}/{:03}{}", group, variant.name(), position, suffix)
}

/// Color for `position` given keys of a single mode sorted by position.
///
/// Between two keys the color is interpolated linearly. Beyond the key range
/// the nearest key is lightened (Light scale) or darkened (Dark scale) by the
/// stepped falloff. With no keys the gray sentinel is returned.
pub fn color_at_position(
    keys: &[KeyColor],
    position: i32,
    scale_start: i32,
    scale_end: i32,
    is_light: bool,
) -> Rgb {
    if position < scale_start || position > scale_end {
        trace!(position, scale_start, scale_end, "Sampling outside of scale");
    }

    let lower = keys.iter().rev().find(|k| k.position <= position);
    let upper = keys.iter().find(|k| k.position >= position);

    match (lower, upper) {
        (Some(lower), Some(upper)) if lower.position == upper.position => lower.color,
        (Some(lower), Some(upper)) => {
            let t = (position - lower.position) as f32 / (upper.position - lower.position) as f32;
            ColorSpace::lerp(lower.color, upper.color, t)
        }
        (None, Some(upper)) => extrapolate(upper.color, upper.position - position, is_light),
        (Some(lower), None) => extrapolate(lower.color, position - lower.position, is_light),
        (None, None) => GRAY_SENTINEL,
    }
}

fn extrapolate(anchor: Rgb, distance: i32, is_light: bool) -> Rgb {
    let steps = (distance as f32 / 100.0).round().max(0.0) as usize;
    let amount = falloff(steps);
    if is_light {
        ColorSpace::lighten(anchor, amount)
    } else {
        ColorSpace::darken(anchor, amount)
    }
}

/// The key at 500, or the one closest to it. Ties go to the lower position.
pub fn representative_key(keys: &[KeyColor]) -> Option<&KeyColor> {
    keys.iter().min_by_key(|k| (k.position - 500).abs())
}

/// Builds ramps under a fixed opacity policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RampGenerator {
    policy: OpacityPolicy,
}

impl RampGenerator {
    pub fn new(policy: OpacityPolicy) -> Self {
        Self { policy }
    }

    /// Generate both halves of the ramp for `group`.
    ///
    /// Always yields every position of both halves, Opaque then Opacity,
    /// Light half first. Keys from other groups are ignored.
    pub fn generate(&self, group: &str, keys: &[KeyColor]) -> Ramp {
        let mut entries = Vec::with_capacity((LIGHT_POSITIONS.len() + DARK_POSITIONS.len()) * 2);
        let mut warnings = Vec::new();

        for (mode, positions) in [(Mode::Light, LIGHT_POSITIONS), (Mode::Dark, DARK_POSITIONS)] {
            let mut mode_keys: Vec<KeyColor> = keys
                .iter()
                .filter(|k| k.mode == mode && k.group_name == group)
                .cloned()
                .collect();
            mode_keys.sort_by_key(|k| k.position);

            let fallback = mode_keys.is_empty();
            if fallback {
                warn!(group, mode = %mode, "No key colors for mode; using gray sentinel");
                warnings.push(RampWarning::MissingKeys { mode });
            }

            let start = positions[0];
            let end = positions[positions.len() - 1];
            let is_light = mode.is_light();

            for position in positions {
                let color = color_at_position(&mode_keys, position, start, end, is_light);
                entries.push(RampEntry {
                    name: token_name(group, Variant::Opaque, position, mode),
                    mode,
                    position,
                    variant: Variant::Opaque,
                    value: color.opaque(),
                    fallback,
                });
            }

            let base = self.opacity_base(&mode_keys, mode, start, end);
            for position in positions {
                entries.push(RampEntry {
                    name: token_name(group, Variant::Opacity, position, mode),
                    mode,
                    position,
                    variant: Variant::Opacity,
                    value: base.with_alpha(opacity_alpha(position)),
                    fallback,
                });
            }
        }

        debug!(
            group,
            keys = keys.len(),
            entries = entries.len(),
            policy = ?self.policy,
            "Generated ramp"
        );

        Ramp {
            group: group.to_string(),
            entries,
            warnings,
        }
    }

    fn opacity_base(&self, mode_keys: &[KeyColor], mode: Mode, start: i32, end: i32) -> Rgb {
        if mode_keys.is_empty() {
            return GRAY_SENTINEL;
        }
        match (self.policy, mode) {
            (OpacityPolicy::BoostedDark, Mode::Dark) => {
                let step = color_at_position(mode_keys, BOOST_POSITION, start, end, false);
                ColorSpace::boost(step, BOOST_SATURATION_PCT, BOOST_LIGHTNESS_PCT)
            }
            _ => representative_key(mode_keys).map_or(GRAY_SENTINEL, |k| k.color),
        }
    }
}
