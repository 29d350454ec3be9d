// ABOUTME: Runs one swatch command against a file-backed token store
// ABOUTME: Resolves the target collection, runs the engine pass, and renders the result

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use swatchsmith_core::{
    DeriveOutcome, InMemoryTokenStore, RampWarning, SwatchConfig, TokenStore, apply_write_set,
    capture_variables, derive_tokens, scan_selection,
};
use swatchsmith_logging::{debug, info, warn};
use swatchsmith_types::{
    ExistingTokenSnapshot, MatchReport, SelectedLayer, TokenWriteSet, WriteSummary,
};

use crate::cli::{Cli, Command};

/// `<data_dir>/swatchsmith/tokens.json`
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("swatchsmith").join("tokens.json"))
        .unwrap_or_else(|| PathBuf::from("tokens.json"))
}

/// Execute a parsed command and return what should be printed.
pub fn execute(cli: &Cli, config: &SwatchConfig) -> Result<String> {
    let store_path = cli.store.clone().unwrap_or_else(default_store_path);
    let mut store = InMemoryTokenStore::load_or_default(&store_path)
        .with_context(|| format!("Failed to load token store {}", store_path.display()))?;

    let output = match &cli.command {
        Command::Derive { selection } => {
            let layers = read_selection(selection)?;
            let collection = resolve_collection(&mut store, cli, config, true)?;
            let snapshot = store.snapshot(&collection)?;
            let outcome = derive_tokens(&layers, &snapshot, config)?;
            let summary = write(&mut store, &collection, &outcome.write_set, cli.dry_run)?;
            render_derive(&outcome, summary, cli.json)?
        }
        Command::Scan { selection } => {
            let layers = read_selection(selection)?;
            let snapshot = existing_snapshot(&store, cli, config)?;
            let report = scan_selection(&layers, &snapshot, config.ramp.default_background)?;
            render_scan(&report, cli.json)?
        }
        Command::Capture { selection } => {
            let layers = read_selection(selection)?;
            let collection = resolve_collection(&mut store, cli, config, false)?;
            let snapshot = store.snapshot(&collection)?;
            let outcome = capture_variables(&layers, &snapshot)?;
            for layer in &outcome.skipped_layers {
                warn!(layer = %layer, "Skipped layer without a solid fill or name");
            }
            let summary = write(&mut store, &collection, &outcome.write_set, cli.dry_run)?;
            render_summary(summary, cli.json)?
        }
        Command::Collections => {
            let collections = store.collections();
            if cli.json {
                serde_json::to_string_pretty(&collections)?
            } else {
                collections
                    .iter()
                    .map(|c| format!("{}\t{}", c.id, c.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Help | Command::Version => String::new(),
    };

    let mutates = matches!(cli.command, Command::Derive { .. } | Command::Capture { .. });
    if mutates && !cli.dry_run {
        store
            .save(&store_path)
            .with_context(|| format!("Failed to save token store {}", store_path.display()))?;
    }

    Ok(output)
}

fn read_selection(path: &Path) -> Result<Vec<SelectedLayer>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read selection {}", path.display()))?;
    let layers: Vec<SelectedLayer> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse selection {}", path.display()))?;
    debug!(path = %path.display(), layers = layers.len(), "Read selection");
    Ok(layers)
}

/// The named collection, which must exist, or the configured default one,
/// created when missing.
///
/// With `ramp_modes` the configured Light and Dark modes are ensured as well;
/// otherwise a new collection gets the store's single default mode and any
/// other mode is added by the write set that names it.
fn resolve_collection(
    store: &mut InMemoryTokenStore,
    cli: &Cli,
    config: &SwatchConfig,
    ramp_modes: bool,
) -> Result<String> {
    if let Some(name) = &cli.collection {
        return Ok(store.snapshot(name)?.collection_id);
    }

    let defaults = &config.collection;
    let modes: &[&str] = if ramp_modes {
        &[defaults.light_mode.as_str(), defaults.dark_mode.as_str()]
    } else {
        &[]
    };
    let info = store.ensure_collection(&defaults.default_name, modes)?;
    Ok(info.id)
}

/// Snapshot for read-only passes; an absent default collection scans as empty.
fn existing_snapshot(
    store: &InMemoryTokenStore,
    cli: &Cli,
    config: &SwatchConfig,
) -> Result<ExistingTokenSnapshot> {
    match &cli.collection {
        Some(name) => Ok(store.snapshot(name)?),
        None => Ok(store
            .snapshot(&config.collection.default_name)
            .unwrap_or_default()),
    }
}

fn write(
    store: &mut InMemoryTokenStore,
    collection: &str,
    write_set: &TokenWriteSet,
    dry_run: bool,
) -> Result<WriteSummary> {
    if dry_run {
        info!(writes = write_set.len(), "Dry run; store left unchanged");
        return Ok(write_set.summary());
    }
    Ok(apply_write_set(store, collection, write_set)?)
}

fn render_derive(outcome: &DeriveOutcome, summary: WriteSummary, as_json: bool) -> Result<String> {
    if as_json {
        let warnings: Vec<_> = outcome
            .ramps
            .iter()
            .flat_map(|ramp| {
                ramp.warnings.iter().map(move |w| match w {
                    RampWarning::MissingKeys { mode } => json!({
                        "group": ramp.group,
                        "missing_mode": mode,
                    }),
                })
            })
            .collect();
        let discarded: Vec<&str> = outcome
            .discarded
            .iter()
            .map(|d| d.layer_name.as_str())
            .collect();
        return Ok(serde_json::to_string_pretty(&json!({
            "summary": summary,
            "writes": outcome.write_set.writes,
            "warnings": warnings,
            "discarded": discarded,
        }))?);
    }

    let mut lines = vec![summary.to_string()];
    for ramp in &outcome.ramps {
        for RampWarning::MissingKeys { mode } in &ramp.warnings {
            lines.push(format!(
                "Warning: '{}' has no {} keys; used gray placeholders",
                ramp.group, mode
            ));
        }
    }
    Ok(lines.join("\n"))
}

fn render_scan(report: &MatchReport, as_json: bool) -> Result<String> {
    if as_json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut lines = vec![format!(
        "Auto-connected {} layers, {} suggestions, {} already bound",
        report.auto_connected,
        report.suggestions.len(),
        report.already_bound
    )];
    for m in report.auto_matches.iter().chain(&report.suggestions) {
        lines.push(format!(
            "{}\t{}\t{} ({})\tΔE {:.2}\t{:?}",
            m.query,
            m.query_color.to_hex(),
            m.best_token.name,
            m.best_mode,
            m.delta_e,
            m.tier
        ));
    }
    Ok(lines.join("\n"))
}

fn render_summary(summary: WriteSummary, as_json: bool) -> Result<String> {
    if as_json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(summary.to_string())
    }
}
