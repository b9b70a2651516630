use std::fmt::Write;

use super::error::SceneError;
use super::path::ROOT_MARKER;
use super::tree::{NodeId, SceneNode, SceneTree};

/// File descriptor written once at the top of every serialized scene.
pub const SCENE_PREAMBLE: &str = r#"[gd_scene load_steps=1 format=3 uid="uid://placeholder"]"#;

/// Writes the tree back to scene text, parents before children.
///
/// The root's header has no `parent`; its children get `parent="."`;
/// deeper nodes get the names from just below the root down to their
/// parent, joined with `/`. Properties follow each header in insertion
/// order. Fails only if a node is reachable twice, which a tree built
/// through the public API never allows.
pub fn serialize(tree: &SceneTree) -> Result<String, SceneError> {
    let mut out = String::new();
    out.push_str(SCENE_PREAMBLE);
    out.push_str("\n\n");

    let mut visited = vec![false; tree.capacity()];
    let mut stack: Vec<(NodeId, Option<String>)> = vec![(tree.root(), None)];

    while let Some((id, parent_path)) = stack.pop() {
        let node = &tree[id];
        if std::mem::replace(&mut visited[id.index()], true) {
            return Err(SceneError::Structure(format!(
                "node `{}` is reachable more than once",
                node.name
            )));
        }

        write_node(&mut out, node, parent_path.as_deref());

        let own_path = match parent_path.as_deref() {
            None => ROOT_MARKER.to_string(),
            Some(ROOT_MARKER) => node.name.clone(),
            Some(path) => format!("{path}/{}", node.name),
        };
        for &child in tree.children(id).iter().rev() {
            stack.push((child, Some(own_path.clone())));
        }
    }

    Ok(out)
}

fn write_node(out: &mut String, node: &SceneNode, parent_path: Option<&str>) {
    // Writing to a String cannot fail.
    let _ = write!(out, r#"[node name="{}" type="{}""#, node.name, node.kind);
    if let Some(parent) = parent_path {
        let _ = write!(out, r#" parent="{parent}""#);
    }
    out.push_str("]\n");

    for (key, value) in &node.properties {
        let _ = writeln!(out, "{key} = {value}");
    }
    out.push('\n');
}
