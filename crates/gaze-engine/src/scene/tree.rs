//! Arena-backed scene tree.
//!
//! Nodes live in a flat pool and refer to each other by [`NodeId`], so the
//! parent link and the child list never form an ownership cycle. Records
//! that could not be attached during reconstruction stay in the pool as
//! orphans; they are invisible to traversal from the root.

use std::collections::HashMap;
use std::ops::Index;

use super::error::SceneError;
use super::path::NodePath;
use super::record::{NodeRecord, Properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        Self(idx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub name: String,
    pub kind: String,
    /// Parent reference as it was written; informational only; the
    /// serializer derives paths from the tree itself.
    pub parent_ref: Option<String>,
    pub properties: Properties,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removed: bool,
}

impl SceneNode {
    fn new(name: String, kind: String, parent_ref: Option<String>) -> Self {
        Self {
            name,
            kind,
            parent_ref,
            properties: Properties::new(),
            parent: None,
            children: Vec::new(),
            removed: false,
        }
    }

    fn from_record(record: &NodeRecord) -> Self {
        Self {
            properties: record.properties.clone(),
            ..Self::new(
                record.name.clone(),
                record.kind.clone(),
                record.parent_ref.clone(),
            )
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A node visited during pre-order traversal, with its depth below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeItem {
    pub id: NodeId,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl SceneTree {
    /// A tree holding only a root node.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            nodes: vec![SceneNode::new(name.into(), kind.into(), None)],
            root: NodeId(0),
        }
    }

    /// Pool with one unattached node per record; ids match record indices.
    pub(crate) fn from_records(records: &[NodeRecord], root: usize) -> Self {
        Self {
            nodes: records.iter().map(SceneNode::from_record).collect(),
            root: NodeId(root),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0).filter(|n| !n.removed)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0).filter(|n| !n.removed)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(SceneNode::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(SceneNode::parent)
    }

    /// Pool size, including orphans and removed nodes.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Pre-order traversal from the root; children in declaration order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![TreeItem {
                id: self.root,
                depth: 0,
            }],
        }
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_reachable(&self, id: NodeId) -> bool {
        self.ancestor_chain(id).is_some()
    }

    /// Parsed nodes that never made it into the tree, in declaration order.
    /// Includes nodes attached below other orphans or inside parent cycles.
    pub fn orphans(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| id != self.root && self.get(id).is_some() && !self.is_reachable(id))
    }

    /// First node with `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().map(|item| item.id).find(|&id| self[id].name == name)
    }

    pub fn find_by_path(&self, path: &NodePath) -> Option<NodeId> {
        self.walk(self.root, path.segments())
    }

    /// Follows `segments` child by child from `from`. Among same-named
    /// siblings the last one wins, like the name lookup does.
    pub(crate) fn walk(&self, from: NodeId, segments: &[String]) -> Option<NodeId> {
        segments.iter().try_fold(from, |current, segment| {
            self.children(current)
                .iter()
                .rev()
                .copied()
                .find(|&child| self[child].name == *segment)
        })
    }

    /// Path of `id` relative to the root (`.` for the root itself).
    /// `None` when the node is not reachable.
    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let chain = self.ancestor_chain(id)?;
        Some(NodePath::from_segments(
            chain.iter().rev().skip(1).map(|&n| self[n].name.clone()),
        ))
    }

    /// `id`, its parent, … up to and including the root. The walk is bounded
    /// by the pool size so a corrupt parent chain cannot loop.
    fn ancestor_chain(&self, id: NodeId) -> Option<Vec<NodeId>> {
        self.get(id)?;
        let mut chain = vec![id];
        let mut current = id;
        while current != self.root {
            if chain.len() > self.nodes.len() {
                return None;
            }
            current = self.parent(current)?;
            chain.push(current);
        }
        Some(chain)
    }

    /// Reachable names that appear more than once, with their counts.
    pub fn duplicate_names(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for item in self.iter() {
            let name = self[item.id].name.as_str();
            let count = counts.entry(name).or_insert(0);
            if *count == 0 {
                order.push(name);
            }
            *count += 1;
        }
        order
            .into_iter()
            .filter(|name| counts[name] > 1)
            .map(|name| (name.to_string(), counts[name]))
            .collect()
    }

    pub(crate) fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn checked(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.get(id).ok_or(SceneError::UnknownNode(id.0))
    }

    fn checked_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.get_mut(id).ok_or(SceneError::UnknownNode(id.0))
    }

    fn written_parent_ref(&self, parent: NodeId) -> Option<String> {
        self.path_of(parent).map(|p| p.to_string())
    }

    /// Appends a new node as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<NodeId, SceneError> {
        self.checked(parent)?;
        let id = NodeId(self.nodes.len());
        let parent_ref = self.written_parent_ref(parent);
        self.nodes
            .push(SceneNode::new(name.into(), kind.into(), parent_ref));
        self.attach(id, parent);
        Ok(id)
    }

    /// Detaches `id` and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.checked(id)?;
        if id == self.root {
            return Err(SceneError::Structure("the root node cannot be removed".into()));
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            if node.removed {
                continue;
            }
            node.removed = true;
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    /// Reparents `id` as the last child of `new_parent`.
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        self.checked(id)?;
        self.checked(new_parent)?;
        if id == self.root {
            return Err(SceneError::Structure("the root node cannot be moved".into()));
        }
        if self.is_descendant_or_self(new_parent, id) {
            return Err(SceneError::Structure(format!(
                "cannot move `{}` below itself",
                self[id].name
            )));
        }
        self.detach(id);
        self.attach(id, new_parent);
        let parent_ref = self.written_parent_ref(new_parent);
        self.nodes[id.0].parent_ref = parent_ref;
        self.refresh_descendant_refs(id);
        Ok(())
    }

    /// Rewrites `parent_ref` below `id` after its path changed.
    fn refresh_descendant_refs(&mut self, id: NodeId) {
        if !self.is_reachable(id) {
            return;
        }
        let mut stack = vec![id];
        while let Some(parent) = stack.pop() {
            let parent_ref = self.written_parent_ref(parent);
            let children = self.nodes[parent.0].children.clone();
            for &child in &children {
                self.nodes[child.0].parent_ref = parent_ref.clone();
            }
            stack.extend(children);
        }
    }

    fn is_descendant_or_self(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(candidate);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Renames `id`; the written parent references of its subtree follow.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), SceneError> {
        self.checked_mut(id)?.name = name.into();
        self.refresh_descendant_refs(id);
        Ok(())
    }

    pub fn set_kind(&mut self, id: NodeId, kind: impl Into<String>) -> Result<(), SceneError> {
        self.checked_mut(id)?.kind = kind.into();
        Ok(())
    }

    /// Sets a property; an existing key keeps its position.
    pub fn set_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, SceneError> {
        Ok(self
            .checked_mut(id)?
            .properties
            .insert(key.into(), value.into()))
    }

    /// Removes a property, keeping the order of the remaining ones.
    pub fn remove_property(&mut self, id: NodeId, key: &str) -> Result<Option<String>, SceneError> {
        Ok(self.checked_mut(id)?.properties.shift_remove(key))
    }
}

impl Index<NodeId> for SceneTree {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }
}

pub struct PreOrder<'a> {
    tree: &'a SceneTree,
    stack: Vec<TreeItem>,
}

impl Iterator for PreOrder<'_> {
    type Item = TreeItem;

    fn next(&mut self) -> Option<TreeItem> {
        let item = self.stack.pop()?;
        let depth = item.depth + 1;
        self.stack.extend(
            self.tree
                .children(item.id)
                .iter()
                .rev()
                .map(|&id| TreeItem { id, depth }),
        );
        Some(item)
    }
}
