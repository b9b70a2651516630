use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene input is not valid UTF-8: {0}")]
    Input(#[from] std::str::Utf8Error),

    #[error("invalid scene structure: {0}")]
    Structure(String),

    #[error("duplicate node name `{name}` declared {count} times")]
    DuplicateName { name: String, count: usize },

    #[error("unknown node id {0}")]
    UnknownNode(usize),
}
