use serde::{Deserialize, Serialize};

/// How a non-`.` parent reference is matched to a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentResolution {
    /// Match only the text after the final `/` against node names. The
    /// reference is not cleaned up, so `"/"` and `"A/."` match nothing.
    LastSegment,
    /// Walk the segments from the root through attached children, falling
    /// back to [`ParentResolution::LastSegment`] when the walk fails.
    #[default]
    PathWalk,
}

/// What to do when two records share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateNames {
    /// The last-declared record owns the name in lookups.
    #[default]
    LastWins,
    /// Fail with [`SceneError::DuplicateName`](super::SceneError::DuplicateName).
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseOptions {
    pub parent_resolution: ParentResolution,
    pub duplicate_names: DuplicateNames,
}

impl ParseOptions {
    /// Name-only matching for callers that rely on lenient last-segment lookup.
    pub fn legacy() -> Self {
        Self {
            parent_resolution: ParentResolution::LastSegment,
            duplicate_names: DuplicateNames::LastWins,
        }
    }

    pub fn strict() -> Self {
        Self {
            parent_resolution: ParentResolution::PathWalk,
            duplicate_names: DuplicateNames::Reject,
        }
    }
}
