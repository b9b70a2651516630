use serde::{Deserialize, Serialize};

use super::record::Properties;
use super::tree::{NodeId, SceneTree};

/// Nested, owned shape of a scene handed to display surfaces and accepted
/// back from them. Serializes as
/// `{ name, kind, parentRef, properties, children }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNodeView {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub parent_ref: Option<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub children: Vec<SceneNodeView>,
}

impl SceneTree {
    pub fn to_view(&self) -> SceneNodeView {
        self.view_of(self.root())
    }

    fn view_of(&self, id: NodeId) -> SceneNodeView {
        let node = &self[id];
        SceneNodeView {
            name: node.name.clone(),
            kind: node.kind.clone(),
            parent_ref: node.parent_ref.clone(),
            properties: node.properties.clone(),
            children: self
                .children(id)
                .iter()
                .map(|&child| self.view_of(child))
                .collect(),
        }
    }

    /// Builds a tree from the nested shape. Structure comes from nesting;
    /// a missing `parentRef` is filled in from the node's position.
    pub fn from_view(view: &SceneNodeView) -> SceneTree {
        let mut tree = SceneTree::new(view.name.clone(), view.kind.clone());
        let root = tree.root();
        if let Some(node) = tree.get_mut(root) {
            node.parent_ref = view.parent_ref.clone();
            node.properties = view.properties.clone();
        }

        let mut stack: Vec<(NodeId, &SceneNodeView)> = view
            .children
            .iter()
            .rev()
            .map(|child| (root, child))
            .collect();
        while let Some((parent, child)) = stack.pop() {
            let id = tree.append(parent, child);
            stack.extend(child.children.iter().rev().map(|c| (id, c)));
        }
        tree
    }

    fn append(&mut self, parent: NodeId, view: &SceneNodeView) -> NodeId {
        // `parent` was created by this tree a moment ago, so it exists.
        let id = self
            .add_child(parent, view.name.clone(), view.kind.clone())
            .unwrap_or(parent);
        if let Some(node) = self.get_mut(id) {
            if view.parent_ref.is_some() {
                node.parent_ref = view.parent_ref.clone();
            }
            node.properties = view.properties.clone();
        }
        id
    }
}
