use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use relative_path::{RelativePath, RelativePathBuf};

use super::scene_file::SceneFile;

/// Folder or scene file in the project browser.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTreeNode {
    pub name: String,
    pub relative_path: RelativePathBuf,
    pub is_folder: bool,
    pub is_expanded: bool,
    pub scene_file: Option<SceneFile>,
    pub children: BTreeMap<String, FileTreeNode>,
}

impl FileTreeNode {
    pub fn new_folder(name: String, relative_path: RelativePathBuf) -> Self {
        Self {
            name,
            relative_path,
            is_folder: true,
            is_expanded: false,
            scene_file: None,
            children: BTreeMap::new(),
        }
    }

    pub fn new_file(name: String, relative_path: RelativePathBuf) -> Self {
        Self {
            name,
            scene_file: Some(SceneFile::new(relative_path.clone())),
            relative_path,
            is_folder: false,
            is_expanded: false,
            children: BTreeMap::new(),
        }
    }

    /// Inserts `remaining` below this node; `full` is the path from the root.
    fn insert_file(&mut self, remaining: &RelativePath, full: &RelativePath) {
        let mut components = remaining.components();
        let Some(first) = components.next() else {
            return;
        };
        let first = first.as_str().to_string();
        let rest = components.as_relative_path();

        if rest.as_str().is_empty() {
            self.children.insert(
                first.clone(),
                FileTreeNode::new_file(first, full.to_relative_path_buf()),
            );
        } else {
            let folder_path = self.relative_path.join(&first);
            self.children
                .entry(first.clone())
                .or_insert_with(|| FileTreeNode::new_folder(first, folder_path))
                .insert_file(rest, full);
        }
    }

    fn find_mut(&mut self, path: &RelativePath) -> Option<&mut FileTreeNode> {
        if self.relative_path.as_relative_path() == path {
            return Some(self);
        }
        self.children
            .values_mut()
            .find_map(|child| child.find_mut(path))
    }

    /// Visible items below and including this node: folders first, then
    /// files, each group sorted case-insensitively.
    pub fn get_flattened_items(&self, depth: usize) -> Vec<FileTreeItem> {
        let mut items = vec![FileTreeItem {
            node: self.clone(),
            depth,
        }];

        if self.is_expanded {
            let mut sorted_children: Vec<_> = self.children.values().collect();
            sorted_children.sort_by(|a, b| {
                b.is_folder
                    .cmp(&a.is_folder)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });

            for child in sorted_children {
                items.extend(child.get_flattened_items(depth + 1));
            }
        }

        items
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileTreeItem {
    pub node: FileTreeNode,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileTree {
    pub root_path: PathBuf,
    pub root: FileTreeNode,
}

impl FileTree {
    pub fn new(root_path: PathBuf) -> Self {
        let root_name = root_path
            .file_name()
            .unwrap_or_else(|| root_path.as_os_str())
            .to_string_lossy()
            .to_string();

        Self {
            root: FileTreeNode::new_folder(root_name, RelativePathBuf::new()),
            root_path,
        }
    }

    /// Builds the tree from absolute file paths; paths outside `root_path`
    /// are skipped.
    pub fn build_from_files(root_path: PathBuf, files: &[PathBuf]) -> Self {
        let mut tree = Self::new(root_path);
        tree.root.is_expanded = true; // Root should always be expanded

        for file in files {
            if let Some(relative) = relative_to(&tree.root_path, file) {
                tree.root.insert_file(&relative, &relative);
            }
        }

        tree
    }

    pub fn toggle_folder(&mut self, path: &RelativePath) {
        if let Some(node) = self.root.find_mut(path)
            && node.is_folder
        {
            node.is_expanded = !node.is_expanded;
        }
    }

    pub fn expand_folder(&mut self, path: &RelativePath) {
        self.set_expanded(path, true);
    }

    pub fn collapse_folder(&mut self, path: &RelativePath) {
        self.set_expanded(path, false);
    }

    fn set_expanded(&mut self, path: &RelativePath, expanded: bool) {
        if let Some(node) = self.root.find_mut(path)
            && node.is_folder
        {
            node.is_expanded = expanded;
        }
    }

    pub fn get_items(&self) -> Vec<FileTreeItem> {
        self.root.get_flattened_items(0)
    }

    /// Every scene file in the tree, regardless of folder state.
    pub fn scene_files(&self) -> Vec<&SceneFile> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            out.extend(node.scene_file.as_ref());
            stack.extend(node.children.values());
        }
        out.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
        out
    }
}

fn relative_to(root: &Path, file: &Path) -> Option<RelativePathBuf> {
    let stripped = file.strip_prefix(root).ok()?;
    RelativePathBuf::from_path(stripped).ok()
}
