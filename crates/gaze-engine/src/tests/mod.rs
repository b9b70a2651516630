use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary project directory for scene files
pub fn create_test_project_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a file under the project directory, making parent folders as needed
pub fn create_test_file(project_dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let file_path = project_dir.path().join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
