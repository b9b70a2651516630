use relative_path::{RelativePath, RelativePathBuf};

pub const SCENE_EXTENSION: &str = "tscn";

/// A scene file inside a project, addressed relative to the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFile {
    relative_path: RelativePathBuf,
    display_name: String,
}

impl SceneFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = Self::extract_display_name(&relative_path);
        Self {
            relative_path,
            display_name,
        }
    }

    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the `.tscn` extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Godot-style resource path, e.g. `res://levels/main.tscn`
    pub fn resource_path(&self) -> String {
        format!("res://{}", self.relative_path)
    }

    fn extract_display_name(path: &RelativePath) -> String {
        path.file_stem()
            .filter(|_| path.extension() == Some(SCENE_EXTENSION))
            .or_else(|| path.file_name())
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl From<RelativePathBuf> for SceneFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SceneFile {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}
