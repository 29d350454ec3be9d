// ABOUTME: Finds the perceptually closest existing token for an on-canvas color
// ABOUTME: Linear ΔE scan over a reference palette with fixed Auto/Suggest/None tiers

use swatchsmith_logging::{debug, trace};
use swatchsmith_types::{
    ExistingTokenSnapshot, MatchReport, MatchResult, MatchTier, ReferenceColor, Rgb, TokenRef,
};

use crate::color_space::{ColorSpace, Lab};

/// Below this ΔE a match is bound without review.
pub const AUTO_CONNECT_THRESHOLD: f32 = 0.5;

/// Below this ΔE a match is offered as a suggestion.
pub const SUGGEST_THRESHOLD: f32 = 10.0;

/// Tier for a given ΔE.
pub fn classify(delta_e: f32) -> MatchTier {
    if delta_e < AUTO_CONNECT_THRESHOLD {
        MatchTier::Auto
    } else if delta_e < SUGGEST_THRESHOLD {
        MatchTier::Suggest
    } else {
        MatchTier::None
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    reference: ReferenceColor,
    lab: Lab,
}

/// Reference palette with LAB values computed once up front.
#[derive(Debug, Clone, Default)]
pub struct PerceptualMatcher {
    candidates: Vec<Candidate>,
}

impl PerceptualMatcher {
    pub fn new(references: Vec<ReferenceColor>) -> Self {
        let candidates = references
            .into_iter()
            .map(|reference| Candidate {
                lab: ColorSpace::rgb_to_lab(reference.color),
                reference,
            })
            .collect();
        Self { candidates }
    }

    /// Build the palette from every direct (non-alias) value in a collection,
    /// in token order then mode order.
    pub fn from_snapshot(snapshot: &ExistingTokenSnapshot) -> Self {
        let references = snapshot
            .tokens
            .iter()
            .flat_map(|token| {
                snapshot.modes.iter().filter_map(move |mode| {
                    let value = token.values_by_mode.get(&mode.id)?.as_direct()?;
                    Some(ReferenceColor {
                        token: TokenRef {
                            id: token.id.clone(),
                            name: token.name.clone(),
                        },
                        mode: mode.name.clone(),
                        color: value.rgb(),
                    })
                })
            })
            .collect();
        Self::new(references)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Closest reference and its ΔE. Ties keep the earliest reference.
    pub fn best_match(&self, color: Rgb) -> Option<(&ReferenceColor, f32)> {
        let query = ColorSpace::rgb_to_lab(color);
        let mut best: Option<(&ReferenceColor, f32)> = None;
        for candidate in &self.candidates {
            let distance = ColorSpace::lab_distance(query, candidate.lab);
            if best.is_none_or(|(_, current)| distance < current) {
                best = Some((&candidate.reference, distance));
            }
        }
        best
    }

    /// Match one named query color. `None` when the palette is empty.
    pub fn match_color(&self, query: &str, color: Rgb) -> Option<MatchResult> {
        let (reference, delta_e) = self.best_match(color)?;
        let tier = classify(delta_e);
        trace!(query, token = %reference.token.name, delta_e, ?tier, "Best match");
        Some(MatchResult {
            query: query.to_string(),
            query_color: color,
            best_token: reference.token.clone(),
            best_mode: reference.mode.clone(),
            delta_e,
            tier,
        })
    }

    /// Match every query and aggregate the results.
    ///
    /// Auto matches are counted and returned for binding; Suggest matches are
    /// sorted closest first; None-tier queries are dropped.
    pub fn scan<'a, I>(&self, queries: I) -> MatchReport
    where
        I: IntoIterator<Item = (&'a str, Rgb)>,
    {
        let mut report = MatchReport::default();

        for (query, color) in queries {
            let Some(result) = self.match_color(query, color) else {
                continue;
            };
            match result.tier {
                MatchTier::Auto => report.auto_matches.push(result),
                MatchTier::Suggest => report.suggestions.push(result),
                MatchTier::None => {}
            }
        }

        report.auto_connected = report.auto_matches.len();
        report
            .suggestions
            .sort_by(|a, b| a.delta_e.total_cmp(&b.delta_e));

        debug!(
            references = self.candidates.len(),
            auto = report.auto_connected,
            suggestions = report.suggestions.len(),
            "Scanned colors against palette"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use swatchsmith_types::{CollectionMode, TokenRecord, TokenValue};

    fn reference(id: &str, color: Rgb) -> ReferenceColor {
        ReferenceColor {
            token: TokenRef {
                id: id.to_string(),
                name: format!("Token {}", id),
            },
            mode: "Light".to_string(),
            color,
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.0), MatchTier::Auto);
        assert_eq!(classify(0.49), MatchTier::Auto);
        assert_eq!(classify(0.5), MatchTier::Suggest);
        assert_eq!(classify(9.99), MatchTier::Suggest);
        assert_eq!(classify(10.0), MatchTier::None);
    }

    #[test]
    fn test_tiers_by_distance() {
        let matcher = PerceptualMatcher::new(vec![reference("white", Rgb::WHITE)]);

        let identical = matcher.match_color("a", Rgb::WHITE).unwrap();
        assert_eq!(identical.tier, MatchTier::Auto);

        // About 4.4 ΔE
        let near = matcher.match_color("b", Rgb::new(0.95, 0.95, 0.95)).unwrap();
        assert!(near.delta_e > 3.0 && near.delta_e < 6.0, "{}", near.delta_e);
        assert_eq!(near.tier, MatchTier::Suggest);

        // About 46.6 ΔE
        let far = matcher.match_color("c", Rgb::new(0.5, 0.5, 0.5)).unwrap();
        assert!(far.delta_e > 40.0, "{}", far.delta_e);
        assert_eq!(far.tier, MatchTier::None);
    }

    #[test]
    fn test_best_match_picks_minimum_and_first_on_tie() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let matcher = PerceptualMatcher::new(vec![
            reference("black", Rgb::BLACK),
            reference("red-1", red),
            reference("red-2", red),
        ]);

        let (best, delta_e) = matcher.best_match(Rgb::new(0.98, 0.0, 0.0)).unwrap();
        assert_eq!(best.token.id, "red-1");
        assert!(delta_e < SUGGEST_THRESHOLD);
    }

    #[test]
    fn test_empty_palette_yields_empty_report() {
        let matcher = PerceptualMatcher::default();
        assert!(matcher.best_match(Rgb::WHITE).is_none());
        let report = matcher.scan([("Frame", Rgb::WHITE)]);
        assert_eq!(report, MatchReport::default());
    }

    #[test]
    fn test_scan_sorts_suggestions() {
        let matcher = PerceptualMatcher::new(vec![reference("white", Rgb::WHITE)]);
        let report = matcher.scan([
            ("far", Rgb::new(0.90, 0.90, 0.90)),
            ("exact", Rgb::WHITE),
            ("near", Rgb::new(0.97, 0.97, 0.97)),
            ("gray", Rgb::new(0.5, 0.5, 0.5)),
        ]);

        assert_eq!(report.auto_connected, 1);
        assert_eq!(report.auto_matches[0].query, "exact");
        let order: Vec<&str> = report.suggestions.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(order, vec!["near", "far"]);
    }

    #[test]
    fn test_from_snapshot_skips_aliases() {
        let mut values = BTreeMap::new();
        values.insert("m1".to_string(), TokenValue::Direct(Rgb::WHITE.opaque()));
        values.insert("m2".to_string(), TokenValue::Alias("other".to_string()));
        let snapshot = ExistingTokenSnapshot {
            collection_id: "c1".into(),
            collection_name: "Colors".into(),
            modes: vec![
                CollectionMode {
                    id: "m1".into(),
                    name: "Light".into(),
                },
                CollectionMode {
                    id: "m2".into(),
                    name: "Dark".into(),
                },
            ],
            tokens: vec![TokenRecord {
                id: "t1".into(),
                name: "Surface".into(),
                values_by_mode: values,
            }],
        };

        let matcher = PerceptualMatcher::from_snapshot(&snapshot);
        assert_eq!(matcher.len(), 1);
        let result = matcher.match_color("Frame", Rgb::WHITE).unwrap();
        assert_eq!(result.best_token.name, "Surface");
        assert_eq!(result.best_mode, "Light");
    }
}
