use crate::models::{FileTree, SCENE_EXTENSION};
use crate::scene::{ParsedScene, SceneError, SceneParser, SceneTree, serialize};
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid project directory: {0}")]
    InvalidProjectDir(String),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Read a scene file as text
pub fn read_scene_file(
    relative_path: &RelativePath,
    project_root: &Path,
) -> Result<String, IoError> {
    let absolute_path = existing(relative_path, project_root)?;
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write scene text, creating parent folders
pub fn write_scene_file(
    relative_path: &RelativePath,
    project_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(project_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Read raw bytes and run them through `parser`. Non-UTF-8 content is a
/// [`SceneError::Input`].
pub fn load_scene(
    relative_path: &RelativePath,
    project_root: &Path,
    parser: &SceneParser,
) -> Result<ParsedScene, IoError> {
    let absolute_path = existing(relative_path, project_root)?;
    let bytes = fs::read(&absolute_path).map_err(IoError::Io)?;
    let parsed = parser.parse_bytes(&bytes)?;
    log::debug!(
        "loaded {relative_path}: {} records, {} diagnostics",
        parsed.records.len(),
        parsed.diagnostics.len()
    );
    Ok(parsed)
}

/// Serialize `tree` and write it over `relative_path`
pub fn save_scene(
    relative_path: &RelativePath,
    project_root: &Path,
    tree: &SceneTree,
) -> Result<(), IoError> {
    let text = serialize(tree)?;
    write_scene_file(relative_path, project_root, &text)?;
    log::info!("saved {relative_path} ({} nodes)", tree.node_count());
    Ok(())
}

/// Scan for `.tscn` files below the project root
pub fn scan_scene_files(project_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !project_root.exists() {
        return Err(IoError::InvalidProjectDir(
            "project directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(project_root, &mut files)?;
    files.sort();
    Ok(files)
}

pub fn build_file_tree(project_root: &Path) -> Result<FileTree, IoError> {
    let files = scan_scene_files(project_root)?;
    Ok(FileTree::build_from_files(project_root.to_path_buf(), &files))
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            // Godot's editor cache
            if path.file_name().is_some_and(|name| name == ".godot") {
                continue;
            }
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == SCENE_EXTENSION
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_project_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidProjectDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

fn existing(relative_path: &RelativePath, project_root: &Path) -> Result<PathBuf, IoError> {
    let absolute_path = relative_path.to_path(project_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    Ok(absolute_path)
}
