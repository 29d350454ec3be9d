// ABOUTME: End-to-end passes over a selection: derive ramps, scan for matches, capture variables
// ABOUTME: Each pass is a pure function of the selection, a collection snapshot, and config

use std::time::Duration;

use swatchsmith_logging::{PassTimer, info};
use swatchsmith_types::{ExistingTokenSnapshot, MatchReport, Rgb, SelectedLayer, TokenWriteSet};

use crate::capture::plan_capture;
use crate::compositor;
use crate::config::SwatchConfig;
use crate::error::{Result, SwatchError};
use crate::key_parse::{DiscardedLayer, collect_key_colors};
use crate::matcher::PerceptualMatcher;
use crate::merger::TokenMerger;
use crate::ramp::{Ramp, RampGenerator};

const SLOW_PASS_THRESHOLD: Duration = Duration::from_millis(250);

/// Result of deriving ramps from a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DeriveOutcome {
    pub write_set: TokenWriteSet,
    /// One ramp per group, in group-name order.
    pub ramps: Vec<Ramp>,
    /// Selected layers that did not become key colors.
    pub discarded: Vec<DiscardedLayer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    pub write_set: TokenWriteSet,
    pub skipped_layers: Vec<String>,
}

/// Generate a ramp for every group in the selection and reconcile the
/// resulting tokens against `snapshot`.
///
/// Gray-sentinel entries are counted as skipped unless the config asks for
/// them to be written.
pub fn derive_tokens(
    layers: &[SelectedLayer],
    snapshot: &ExistingTokenSnapshot,
    config: &SwatchConfig,
) -> Result<DeriveOutcome> {
    if layers.is_empty() {
        return Err(SwatchError::EmptySelection);
    }
    let _timer = PassTimer::start("derive_tokens", SLOW_PASS_THRESHOLD);

    let keys = collect_key_colors(layers, config.ramp.default_background);
    let generator = RampGenerator::new(config.ramp.opacity_policy);
    let ramps: Vec<Ramp> = keys
        .groups
        .iter()
        .map(|(group, group_keys)| generator.generate(group, group_keys))
        .collect();

    let mut skipped = 0;
    let mut entries = Vec::new();
    for entry in ramps.iter().flat_map(|ramp| &ramp.entries) {
        if entry.fallback && !config.ramp.write_fallback {
            skipped += 1;
            continue;
        }
        entries.push((
            entry.name.as_str(),
            config.collection.mode_name(entry.mode),
            entry.value,
        ));
    }

    let mut write_set = TokenMerger::new(snapshot).merge_batch(entries);
    write_set.skipped = skipped;

    info!(
        groups = ramps.len(),
        discarded = keys.discarded.len(),
        summary = %write_set.summary(),
        "Derived tokens"
    );

    Ok(DeriveOutcome {
        write_set,
        ramps,
        discarded: keys.discarded,
    })
}

/// Match every unbound solid layer against the collection's direct values.
pub fn scan_selection(
    layers: &[SelectedLayer],
    snapshot: &ExistingTokenSnapshot,
    default_background: Rgb,
) -> Result<MatchReport> {
    if layers.is_empty() {
        return Err(SwatchError::EmptySelection);
    }
    let _timer = PassTimer::start("scan_selection", SLOW_PASS_THRESHOLD);

    let already_bound = layers.iter().filter(|l| l.bound_token.is_some()).count();
    let queries: Vec<(&str, Rgb)> = layers
        .iter()
        .filter(|l| l.bound_token.is_none())
        .filter_map(|l| {
            compositor::rendered_color(l, default_background).map(|c| (l.layer_name.as_str(), c))
        })
        .collect();

    let matcher = PerceptualMatcher::from_snapshot(snapshot);
    let mut report = matcher.scan(queries);
    report.already_bound = already_bound;

    info!(
        auto_connected = report.auto_connected,
        suggestions = report.suggestions.len(),
        already_bound,
        "Scanned selection"
    );
    Ok(report)
}

/// Turn each named solid layer into one variable value.
pub fn capture_variables(
    layers: &[SelectedLayer],
    snapshot: &ExistingTokenSnapshot,
) -> Result<CaptureOutcome> {
    if layers.is_empty() {
        return Err(SwatchError::EmptySelection);
    }

    let plan = plan_capture(layers, snapshot);
    let mut write_set = TokenMerger::new(snapshot).merge_batch(
        plan.entries
            .iter()
            .map(|e| (e.name.as_str(), e.mode.as_str(), e.value)),
    );
    write_set.skipped = plan.skipped.len();

    info!(summary = %write_set.summary(), "Captured variables");
    Ok(CaptureOutcome {
        write_set,
        skipped_layers: plan.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_space::ColorSpace;
    use swatchsmith_types::{Fill, MatchTier, Mode};

    const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);

    #[test]
    fn test_empty_selection_is_rejected_everywhere() {
        let snapshot = ExistingTokenSnapshot::default();
        let config = SwatchConfig::default();
        assert!(matches!(
            derive_tokens(&[], &snapshot, &config),
            Err(SwatchError::EmptySelection)
        ));
        assert!(matches!(
            scan_selection(&[], &snapshot, Rgb::WHITE),
            Err(SwatchError::EmptySelection)
        ));
        assert!(matches!(
            capture_variables(&[], &snapshot),
            Err(SwatchError::EmptySelection)
        ));
    }

    #[test]
    fn test_derive_brand_light_only() {
        let layers = vec![
            SelectedLayer::solid("300", "Brand", RED),
            SelectedLayer::solid("500", "Brand", BLUE),
        ];
        let outcome =
            derive_tokens(&layers, &ExistingTokenSnapshot::default(), &SwatchConfig::default())
                .unwrap();

        let ws = &outcome.write_set;
        assert_eq!(ws.len(), 12);
        assert_eq!(ws.skipped, 12);
        assert_eq!(ws.summary().new, 12);
        assert_eq!(ws.new_modes, vec!["Light"]);
        assert!(ws.get("Brand/Opaque/000", "Light").is_some());
        assert_eq!(
            ws.get("Brand/Opaque/500 (Light)", "Light").unwrap().value,
            BLUE.opaque()
        );
        assert_eq!(
            ws.get("Brand/Opaque/400", "Light").unwrap().value,
            ColorSpace::lerp(RED, BLUE, 0.5).opaque()
        );
        assert_eq!(ws.get("Brand/Opacity/000", "Light").unwrap().value.a, 0.20);
        assert!(ws.get("Brand/Opaque/700", "Dark").is_none());

        let opaque: Vec<&str> = ws
            .writes
            .iter()
            .filter(|w| w.name.contains("/Opaque/"))
            .map(|w| w.name.as_str())
            .collect();
        assert_eq!(
            opaque,
            vec![
                "Brand/Opaque/000",
                "Brand/Opaque/100",
                "Brand/Opaque/200",
                "Brand/Opaque/300",
                "Brand/Opaque/400",
                "Brand/Opaque/500 (Light)",
            ]
        );
        assert!(ws.writes.iter().all(|w| w.mode == "Light"));
        assert_eq!(outcome.ramps.len(), 1);
    }

    #[test]
    fn test_derive_can_write_fallback_with_custom_mode_names() {
        let layers = vec![SelectedLayer::solid("300", "Brand", RED)];
        let mut config = SwatchConfig::default();
        config.ramp.write_fallback = true;
        config.collection.dark_mode = "Night".to_string();

        let outcome = derive_tokens(&layers, &ExistingTokenSnapshot::default(), &config).unwrap();
        let ws = &outcome.write_set;
        assert_eq!(ws.len(), 24);
        assert_eq!(ws.skipped, 0);
        assert_eq!(
            ws.get("Brand/Opaque/1000", "Night").unwrap().value,
            Rgb::new(0.5, 0.5, 0.5).opaque()
        );
    }

    #[test]
    fn test_derive_with_only_unparsable_names_writes_nothing() {
        let layers = vec![SelectedLayer::solid("Primary", "Brand", RED)];
        let outcome =
            derive_tokens(&layers, &ExistingTokenSnapshot::default(), &SwatchConfig::default())
                .unwrap();
        assert!(outcome.write_set.is_empty());
        assert_eq!(outcome.discarded.len(), 1);
    }

    #[test]
    fn test_scan_counts_bound_layers_and_flattens() {
        let snapshot = {
            let mut store = crate::store::InMemoryTokenStore::new();
            use crate::store::TokenStore;
            store.ensure_collection("Colors", &["Light"]).unwrap();
            store
                .put_token(
                    "Colors",
                    "Gray",
                    "Light",
                    swatchsmith_types::TokenValue::Direct(Rgb::new(0.5, 0.5, 0.5).opaque()),
                )
                .unwrap();
            store.snapshot("Colors").unwrap()
        };

        let mut half_black = SelectedLayer::solid("Overlay", "Frame", Rgb::BLACK);
        half_black.fill = Fill::Solid {
            color: Rgb::BLACK,
            opacity: 0.5,
        };
        let mut bound = SelectedLayer::solid("Bound", "Frame", Rgb::BLACK);
        bound.bound_token = Some("token:1".into());

        let report = scan_selection(&[half_black, bound], &snapshot, Rgb::WHITE).unwrap();
        assert_eq!(report.already_bound, 1);
        assert_eq!(report.auto_connected, 1);
        assert_eq!(report.auto_matches[0].tier, MatchTier::Auto);
        assert_eq!(report.auto_matches[0].best_token.name, "Gray");
    }

    #[test]
    fn test_capture_counts_skipped_layers() {
        let mut image = SelectedLayer::solid("Photo", "Frame", Rgb::BLACK);
        image.fill = Fill::Other;
        let layers = vec![
            SelectedLayer::solid("Surface", "Frame", Rgb::WHITE),
            SelectedLayer::solid("Surface -Dark", "Frame", Rgb::BLACK),
            image,
        ];

        let outcome = capture_variables(&layers, &ExistingTokenSnapshot::default()).unwrap();
        let summary = outcome.write_set.summary();
        assert_eq!(summary.new, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(outcome.write_set.new_modes, vec!["Mode 1", "Dark"]);
        assert_eq!(outcome.skipped_layers, vec!["Photo"]);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let layers = vec![
            SelectedLayer::solid("200", "Brand", RED),
            SelectedLayer::solid("800", "Brand", BLUE),
        ];
        let snapshot = ExistingTokenSnapshot::default();
        let config = SwatchConfig::default();
        let a = derive_tokens(&layers, &snapshot, &config).unwrap();
        let b = derive_tokens(&layers, &snapshot, &config).unwrap();
        assert_eq!(a, b);
        assert!(a.ramps[0].entries.iter().all(|e| !e.fallback));
        assert_eq!(
            a.ramps[0]
                .entries
                .iter()
                .filter(|e| e.mode == Mode::Dark)
                .count(),
            12
        );
    }
}
