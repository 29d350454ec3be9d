// ABOUTME: Turns selected layers into key colors grouped by parent container
// ABOUTME: Parses scale positions and (Light)/(Dark) suffixes out of layer names

use std::collections::BTreeMap;

use swatchsmith_logging::{debug, warn};
use swatchsmith_types::{KeyColor, Mode, Rgb, SelectedLayer};

use crate::compositor;

/// Position and mode read from a layer name such as `"Blue 300 (Dark)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedKeyName {
    pub position: i32,
    pub mode: Mode,
}

/// Why a selected layer did not become a key color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    NoSolidFill,
    NoPosition,
    NoParent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedLayer {
    pub layer_name: String,
    pub reason: DiscardReason,
}

/// Key colors for every group in a selection, in group-name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyGroups {
    pub groups: BTreeMap<String, Vec<KeyColor>>,
    pub discarded: Vec<DiscardedLayer>,
}

impl KeyGroups {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Parse a layer display name into a scale position and mode.
///
/// The position is the last run of ASCII digits in the name. An optional
/// trailing `(Light)` or `(Dark)` (any case) sets the mode explicitly;
/// otherwise positions up to 500 are Light.
pub fn parse_key_name(name: &str) -> Option<ParsedKeyName> {
    let trimmed = name.trim();
    let (rest, explicit) = split_mode_suffix(trimmed);

    let digits_end = rest.rfind(|c: char| c.is_ascii_digit())? + 1;
    let digits_start = rest[..digits_end]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let position: i32 = rest[digits_start..digits_end].parse().ok()?;

    Some(ParsedKeyName {
        position,
        mode: explicit.unwrap_or_else(|| Mode::for_position(position)),
    })
}

fn split_mode_suffix(name: &str) -> (&str, Option<Mode>) {
    let Some(inner) = name.strip_suffix(')') else {
        return (name, None);
    };
    let Some(open) = inner.rfind('(') else {
        return (name, None);
    };

    let mode = match inner[open + 1..].trim().to_ascii_lowercase().as_str() {
        "light" => Mode::Light,
        "dark" => Mode::Dark,
        _ => return (name, None),
    };
    (inner[..open].trim_end(), Some(mode))
}

/// Fold a selection into per-group key colors.
///
/// Layer colors are flattened against their parent fill first. Within a
/// group, a repeated (position, mode) pair keeps the last layer seen.
pub fn collect_key_colors(layers: &[SelectedLayer], default_background: Rgb) -> KeyGroups {
    let (by_group, discarded) = layers.iter().fold(
        (BTreeMap::<String, BTreeMap<(Mode, i32), KeyColor>>::new(), Vec::new()),
        |(mut by_group, mut discarded), layer| {
            match key_color_for(layer, default_background) {
                Ok(key) => {
                    let slot = (key.mode, key.position);
                    let group = by_group.entry(key.group_name.clone()).or_default();
                    if group.insert(slot, key).is_some() {
                        warn!(
                            layer = %layer.layer_name,
                            group = %layer.parent_name,
                            position = slot.1,
                            mode = %slot.0,
                            "Duplicate key color; keeping the last one"
                        );
                    }
                }
                Err(reason) => {
                    if reason != DiscardReason::NoSolidFill {
                        warn!(layer = %layer.layer_name, reason = ?reason, "Ignoring layer");
                    }
                    discarded.push(DiscardedLayer {
                        layer_name: layer.layer_name.clone(),
                        reason,
                    });
                }
            }
            (by_group, discarded)
        },
    );

    // (Mode, position) ordering puts Light before Dark, each ascending
    let groups: BTreeMap<String, Vec<KeyColor>> = by_group
        .into_iter()
        .map(|(name, keys)| (name, keys.into_values().collect()))
        .collect();

    debug!(
        groups = groups.len(),
        discarded = discarded.len(),
        "Collected key colors"
    );

    KeyGroups { groups, discarded }
}

fn key_color_for(
    layer: &SelectedLayer,
    default_background: Rgb,
) -> Result<KeyColor, DiscardReason> {
    let color =
        compositor::rendered_color(layer, default_background).ok_or(DiscardReason::NoSolidFill)?;
    let parsed = parse_key_name(&layer.layer_name).ok_or(DiscardReason::NoPosition)?;
    if layer.parent_name.trim().is_empty() {
        return Err(DiscardReason::NoParent);
    }

    Ok(KeyColor {
        position: parsed.position,
        mode: parsed.mode,
        color,
        group_name: layer.parent_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatchsmith_types::Fill;

    fn parsed(position: i32, mode: Mode) -> Option<ParsedKeyName> {
        Some(ParsedKeyName { position, mode })
    }

    #[test]
    fn test_parse_plain_positions() {
        assert_eq!(parse_key_name("300"), parsed(300, Mode::Light));
        assert_eq!(parse_key_name("Blue 500"), parsed(500, Mode::Light));
        assert_eq!(parse_key_name("Blue/700"), parsed(700, Mode::Dark));
        assert_eq!(parse_key_name("  Red-1000 "), parsed(1000, Mode::Dark));
    }

    #[test]
    fn test_parse_explicit_mode() {
        assert_eq!(
            parse_key_name("Blue 500 (Dark)"),
            parsed(500, Mode::Dark)
        );
        assert_eq!(
            parse_key_name("Blue 700 (light)"),
            parsed(700, Mode::Light)
        );
        // Unknown parenthesised text is not a mode
        assert_eq!(
            parse_key_name("Blue 200 (draft)"),
            parsed(200, Mode::Light)
        );
    }

    #[test]
    fn test_last_digit_run_wins() {
        assert_eq!(parse_key_name("Gray2 400"), parsed(400, Mode::Light));
        assert_eq!(parse_key_name("Émeraude600"), parsed(600, Mode::Dark));
    }

    #[test]
    fn test_unparsable_names() {
        assert_eq!(parse_key_name("Primary"), None);
        assert_eq!(parse_key_name("(Dark)"), None);
        assert_eq!(parse_key_name(""), None);
        assert_eq!(parse_key_name("99999999999"), None);
    }

    #[test]
    fn test_collect_groups_by_parent() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let blue = Rgb::new(0.0, 0.0, 1.0);
        let layers = vec![
            SelectedLayer::solid("Brand 500", "Brand", blue),
            SelectedLayer::solid("Brand 300", "Brand", red),
            SelectedLayer::solid("Accent 800", "Accent", blue),
            SelectedLayer::solid("Label", "Brand", red),
        ];

        let keys = collect_key_colors(&layers, Rgb::WHITE);
        assert_eq!(
            keys.groups.keys().collect::<Vec<_>>(),
            vec!["Accent", "Brand"]
        );
        let brand = &keys.groups["Brand"];
        assert_eq!(
            brand.iter().map(|k| k.position).collect::<Vec<_>>(),
            vec![300, 500]
        );
        assert_eq!(keys.groups["Accent"][0].mode, Mode::Dark);
        assert_eq!(keys.key_count(), 3);
        assert_eq!(
            keys.discarded,
            vec![DiscardedLayer {
                layer_name: "Label".into(),
                reason: DiscardReason::NoPosition
            }]
        );
    }

    #[test]
    fn test_duplicates_keep_last() {
        let first = Rgb::new(0.1, 0.1, 0.1);
        let second = Rgb::new(0.9, 0.9, 0.9);
        let layers = vec![
            SelectedLayer::solid("300", "Brand", first),
            SelectedLayer::solid("300", "Brand", second),
        ];

        let keys = collect_key_colors(&layers, Rgb::WHITE);
        assert_eq!(keys.groups["Brand"].len(), 1);
        assert_eq!(keys.groups["Brand"][0].color, second);
    }

    #[test]
    fn test_colors_are_flattened() {
        let mut layer = SelectedLayer::solid("300", "Brand", Rgb::BLACK);
        layer.fill = Fill::Solid {
            color: Rgb::BLACK,
            opacity: 0.5,
        };

        let keys = collect_key_colors(&[layer], Rgb::WHITE);
        assert_eq!(keys.groups["Brand"][0].color, Rgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_non_solid_and_orphan_layers_are_discarded() {
        let mut gradient = SelectedLayer::solid("300", "Brand", Rgb::BLACK);
        gradient.fill = Fill::Other;
        let orphan = SelectedLayer::solid("300", "", Rgb::BLACK);

        let keys = collect_key_colors(&[gradient, orphan], Rgb::WHITE);
        assert!(keys.is_empty());
        let reasons: Vec<_> = keys.discarded.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![DiscardReason::NoSolidFill, DiscardReason::NoParent]
        );
    }

    #[test]
    fn test_duplicate_key_is_logged() {
        use tracing::{Level, field::display};
        use tracing_mock::{expect, subscriber};

        let (subscriber, handle) = subscriber::mock()
            .with_filter(|meta| meta.level() <= &Level::WARN)
            .event(
                expect::event().at_level(Level::WARN).with_fields(
                    expect::field("group")
                        .with_value(&display("Brand"))
                        .and(expect::field("position").with_value(&300))
                        .and(expect::field("mode").with_value(&display("Light")))
                        .and(expect::msg("Duplicate key color; keeping the last one")),
                ),
            )
            .only()
            .run_with_handle();

        let layers = vec![
            SelectedLayer::solid("Brand 300", "Brand", Rgb::BLACK),
            SelectedLayer::solid("300", "Brand", Rgb::WHITE),
        ];
        let keys = tracing::subscriber::with_default(subscriber, || {
            collect_key_colors(&layers, Rgb::WHITE)
        });

        handle.assert_finished();
        assert_eq!(keys.groups["Brand"][0].color, Rgb::WHITE);
    }
}
