//! # gaze-engine
//!
//! Core of the GAZE editor shell: the Godot scene-graph codec plus the
//! project file handling that feeds it.
//!
//! ```text
//! .tscn text → tokenize → NodeRecords → reconstruct → SceneTree → serialize → .tscn text
//! ```
//!
//! See [`scene`] for the codec and [`io`] for loading and saving scene files
//! inside a project directory.

pub mod io;
pub mod models;
pub mod scene;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::*;
pub use models::{file_tree::*, scene_file::*};
pub use scene::{
    Diagnostic, DiagnosticKind, DuplicateNames, NodeId, NodePath, NodeRecord, ParentResolution,
    ParseOptions, ParsedScene, SCENE_PREAMBLE, SceneError, SceneNode, SceneNodeView, SceneParser,
    SceneTree, Severity, TreeItem, parse, parse_bytes, reconstruct, serialize, tokenize,
};
