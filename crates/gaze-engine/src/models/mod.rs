pub mod file_tree;
pub mod scene_file;

pub use file_tree::*;
pub use scene_file::{SCENE_EXTENSION, SceneFile};
