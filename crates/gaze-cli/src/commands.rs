//! Non-interactive subcommands. Each returns its output instead of printing
//! so `main` owns stdout and exit codes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gaze_engine::{Diagnostic, ParseOptions, SceneNodeView, SceneParser, SceneTree, serialize};

fn load(file: &Path, options: ParseOptions) -> Result<(SceneTree, Vec<Diagnostic>)> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = SceneParser::with_options(options)
        .parse_bytes(&bytes)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    match parsed.tree {
        Some(tree) => Ok((tree, parsed.diagnostics)),
        None => bail!("{} declares no nodes", file.display()),
    }
}

/// Pretty JSON of the nested scene view.
pub fn tree_json(file: &Path, options: ParseOptions) -> Result<String> {
    let (tree, _) = load(file, options)?;
    Ok(serde_json::to_string_pretty(&tree.to_view())?)
}

/// Canonical text of the scene as the serializer writes it.
pub fn format_scene(file: &Path, options: ParseOptions) -> Result<String> {
    let (tree, diagnostics) = load(file, options)?;
    if !diagnostics.is_empty() {
        log::warn!(
            "{}: {} findings, skipped content is not written back",
            file.display(),
            diagnostics.len()
        );
    }
    Ok(serialize(&tree)?)
}

/// Everything the parser skipped or guessed at, in report order.
pub fn check(file: &Path, options: ParseOptions) -> Result<Vec<Diagnostic>> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = SceneParser::with_options(options).parse_bytes(&bytes)?;
    Ok(parsed.diagnostics)
}

/// Reads the JSON view from `json` and writes scene text to `out`.
pub fn from_json(json: &Path, out: &Path) -> Result<SceneTree> {
    let content =
        fs::read_to_string(json).with_context(|| format!("failed to read {}", json.display()))?;
    let view: SceneNodeView = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a scene view", json.display()))?;
    let tree = SceneTree::from_view(&view);

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, serialize(&tree)?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(tree)
}
