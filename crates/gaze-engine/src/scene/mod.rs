//! # Scene-graph codec
//!
//! Converts Godot-style `.tscn` text into a [`SceneTree`] and back.
//!
//! ```text
//! [node name="Root" type="Node2D"]
//! [node name="Child" type="Sprite2D" parent="."]
//! visible = true
//! [node name="Grandchild" type="Label" parent="Child"]
//! text = "hi"
//! ```
//!
//! ## Pipeline
//!
//! 1. [`tokenize`] classifies each line and collects one [`NodeRecord`] per
//!    `[node]` header, with its properties in source order.
//! 2. [`reconstruct`] picks the root and attaches every other record below
//!    the node its `parent` reference resolves to.
//! 3. [`serialize`] walks the tree and writes headers with recomputed
//!    `parent` paths.
//!
//! The parser is tolerant: unknown headers, stray properties and
//! unresolvable parents are skipped, never fatal. Use [`SceneParser`] to get
//! those findings back as [`Diagnostic`]s, or to opt into strict duplicate
//! handling.
//!
//! Property values are opaque strings; nothing here interprets numbers,
//! vectors or resource references.

pub mod diagnostics;
pub mod error;
pub mod options;
pub mod path;
pub mod reconstruct;
pub mod record;
pub mod serialize;
pub mod tokenize;
pub mod tree;
pub mod view;

#[cfg(test)]
mod tests;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use error::SceneError;
pub use options::{DuplicateNames, ParentResolution, ParseOptions};
pub use path::NodePath;
pub use reconstruct::{reconstruct, reconstruct_with};
pub use record::{NodeRecord, Properties};
pub use serialize::{SCENE_PREAMBLE, serialize};
pub use tokenize::{tokenize, tokenize_with_diagnostics};
pub use tree::{NodeId, SceneNode, SceneTree, TreeItem};
pub use view::SceneNodeView;

/// Tokenize and reconstruct with default options. `None` when the text
/// declares no node.
pub fn parse(text: &str) -> Option<SceneTree> {
    reconstruct(&tokenize(text))
}

/// Like [`parse`], but starting from raw bytes that must be UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<Option<SceneTree>, SceneError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(parse(text))
}

/// Everything one parse produced.
#[derive(Debug, Clone)]
pub struct ParsedScene {
    /// Flat records in declaration order, orphans included.
    pub records: Vec<NodeRecord>,
    pub tree: Option<SceneTree>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedScene {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }
}

/// Parser with explicit options and a diagnostics channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneParser {
    options: ParseOptions,
}

impl SceneParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, text: &str) -> Result<ParsedScene, SceneError> {
        let (records, mut diagnostics) = tokenize_with_diagnostics(text);
        let tree = reconstruct_with(&records, &self.options, &mut diagnostics)?;
        Ok(ParsedScene {
            records,
            tree,
            diagnostics,
        })
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedScene, SceneError> {
        self.parse(std::str::from_utf8(bytes)?)
    }
}
