// ABOUTME: One-to-one capture of named layers as variables
// ABOUTME: Splits "name -mode" layer names and resolves the target mode

use swatchsmith_logging::debug;
use swatchsmith_types::{ExistingTokenSnapshot, Fill, Rgba, SelectedLayer};

/// Mode name used when the collection has no modes at all.
pub const FALLBACK_MODE_NAME: &str = "Mode 1";

/// A layer that will become one variable value.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureEntry {
    pub name: String,
    pub mode: String,
    pub value: Rgba,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturePlan {
    pub entries: Vec<CaptureEntry>,
    /// Layers skipped for a non-solid fill or an empty variable name.
    pub skipped: Vec<String>,
}

/// Split `"Primary -Dark"` into `("Primary", Some("Dark"))`.
///
/// The name is the text before the first `" -"` and the mode the text
/// between the first and second; anything after a second `" -"` is dropped.
/// Both parts are trimmed and an empty mode counts as absent.
pub fn split_variable_name(layer_name: &str) -> (&str, Option<&str>) {
    let mut parts = layer_name.split(" -");
    let name = parts.next().unwrap_or_default().trim();
    let mode = parts.next().map(str::trim).filter(|m| !m.is_empty());
    (name, mode)
}

/// Work out the variable, mode and value for every capturable layer.
pub fn plan_capture(layers: &[SelectedLayer], snapshot: &ExistingTokenSnapshot) -> CapturePlan {
    let default_mode = snapshot
        .default_mode()
        .map_or(FALLBACK_MODE_NAME, |m| m.name.as_str());

    let mut plan = CapturePlan::default();
    for layer in layers {
        let Fill::Solid { color, opacity } = layer.fill else {
            plan.skipped.push(layer.layer_name.clone());
            continue;
        };
        let (name, mode) = split_variable_name(&layer.layer_name);
        if name.is_empty() {
            plan.skipped.push(layer.layer_name.clone());
            continue;
        }

        plan.entries.push(CaptureEntry {
            name: name.to_string(),
            mode: mode.unwrap_or(default_mode).to_string(),
            value: color.with_alpha(opacity),
        });
    }

    debug!(
        captured = plan.entries.len(),
        skipped = plan.skipped.len(),
        "Planned capture"
    );
    plan
}
