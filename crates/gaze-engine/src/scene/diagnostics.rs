use std::fmt;

/// Something the tolerant parser skipped or guessed at.
///
/// Plain [`parse`](super::parse) discards these; [`SceneParser`](super::SceneParser)
/// hands them back for tooling such as `gaze-cli check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line, when the finding maps to one.
    pub line: Option<usize>,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A bracketed header whose tag is not recognized.
    UnknownHeader { tag: String },
    /// A `key = value` line before the first section header.
    StrayProperty { key: String },
    /// A non-blank line that is neither a header nor a property.
    UnrecognizedLine,
    /// No parentless record; the first record became the root.
    MissingRoot { fallback: String },
    /// A parentless record other than the root; it stays unattached.
    ExtraRoot { name: String },
    /// The parent reference matched no known node.
    OrphanNode { name: String, parent_ref: String },
    /// Attached to a parent that is itself cut off from the root.
    Unreachable { name: String, parent_ref: String },
    /// The parent reference resolved to the node itself.
    SelfParent { name: String },
    /// More than one record declares this name.
    DuplicateName { name: String, count: usize },
    /// The full path could not be walked; the last segment was matched by name.
    PathFallback { name: String, parent_ref: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

impl Diagnostic {
    pub fn new(line: Option<usize>, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::PathFallback { .. } | DiagnosticKind::UnrecognizedLine => {
                Severity::Info
            }
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        match &self.kind {
            DiagnosticKind::UnknownHeader { tag } => write!(f, "unknown header [{tag}] ignored"),
            DiagnosticKind::StrayProperty { key } => {
                write!(f, "property `{key}` outside of any node ignored")
            }
            DiagnosticKind::UnrecognizedLine => f.write_str("unrecognized line ignored"),
            DiagnosticKind::MissingRoot { fallback } => {
                write!(f, "no root node declared, using `{fallback}`")
            }
            DiagnosticKind::ExtraRoot { name } => {
                write!(f, "node `{name}` has no parent but is not the root")
            }
            DiagnosticKind::OrphanNode { name, parent_ref } => {
                write!(f, "node `{name}` dropped: parent `{parent_ref}` not found")
            }
            DiagnosticKind::Unreachable { name, parent_ref } => write!(
                f,
                "node `{name}` dropped: parent `{parent_ref}` is not in the tree"
            ),
            DiagnosticKind::SelfParent { name } => {
                write!(f, "node `{name}` names itself as parent")
            }
            DiagnosticKind::DuplicateName { name, count } => {
                write!(f, "node name `{name}` declared {count} times, last one wins")
            }
            DiagnosticKind::PathFallback { name, parent_ref } => write!(
                f,
                "node `{name}`: path `{parent_ref}` not found from root, matched by name"
            ),
        }
    }
}
