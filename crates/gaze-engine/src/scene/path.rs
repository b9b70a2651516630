use std::fmt;

/// Marker used by `parent="."` for the scene root.
pub const ROOT_MARKER: &str = ".";

/// A parent reference split into name segments, relative to the scene root.
///
/// `"."` is [`NodePath::Root`]. Anything else becomes a list of segments;
/// empty and `.` segments are dropped, so `"./Body"` and `"Body"` name the
/// same node. A path that reduces to no segments is treated as the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    Root,
    Relative(Vec<String>),
}

impl NodePath {
    pub fn parse(raw: &str) -> Self {
        let segments: Vec<String> = raw
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != ROOT_MARKER)
            .map(String::from)
            .collect();

        Self::from_segments(segments)
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            NodePath::Root
        } else {
            NodePath::Relative(segments)
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, NodePath::Root)
    }

    pub fn segments(&self) -> &[String] {
        match self {
            NodePath::Root => &[],
            NodePath::Relative(segments) => segments,
        }
    }

    /// The final segment: the bare name used by last-segment resolution.
    pub fn target_name(&self) -> Option<&str> {
        self.segments().last().map(String::as_str)
    }

    /// Path of a child with `name` below this path.
    pub fn join(&self, name: &str) -> NodePath {
        let mut segments = self.segments().to_vec();
        segments.push(name.to_string());
        NodePath::Relative(segments)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodePath::Root => f.write_str(ROOT_MARKER),
            NodePath::Relative(segments) => f.write_str(&segments.join("/")),
        }
    }
}

impl From<&str> for NodePath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
