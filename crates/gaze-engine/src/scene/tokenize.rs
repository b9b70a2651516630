//! Line-oriented tokenizer: text in, flat [`NodeRecord`]s out.
//!
//! Each line is classified on its own ([`classify`]) and then fed to a
//! [`Tokenizer`], which tracks the current `[node]` section. Nothing here
//! fails: lines that do not fit are skipped and, if anyone is listening,
//! reported as [`Diagnostic`]s.

use std::sync::OnceLock;

use regex::Regex;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::record::{DEFAULT_KIND, DEFAULT_NAME, NodeRecord};

/// Section tags the tokenizer knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderTag {
    Node,
    ExtResource,
    SubResource,
    /// `[gd_scene]` / `[gd_resource]` file descriptors.
    Descriptor,
    Resource,
    Connection,
    Editable,
    Unknown(String),
}

impl HeaderTag {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "node" => HeaderTag::Node,
            "ext_resource" => HeaderTag::ExtResource,
            "sub_resource" => HeaderTag::SubResource,
            "gd_scene" | "gd_resource" => HeaderTag::Descriptor,
            "resource" => HeaderTag::Resource,
            "connection" => HeaderTag::Connection,
            "editable" => HeaderTag::Editable,
            other => HeaderTag::Unknown(other.to_string()),
        }
    }
}

/// Classification of a single line containing only local facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Blank,
    /// `[tag attr=…]`; `attrs` is everything after the tag.
    Header { tag: HeaderTag, attrs: &'a str },
    /// Split on the first `=`, both sides trimmed.
    Property { key: &'a str, value: &'a str },
    Other,
}

pub fn classify(line: &str) -> LineClass<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineClass::Blank;
    }

    if let Some((tag, attrs)) = split_header(line) {
        return LineClass::Header {
            tag: HeaderTag::from_tag(tag),
            attrs,
        };
    }

    match line.split_once('=') {
        Some((key, value)) => LineClass::Property {
            key: key.trim(),
            value: value.trim(),
        },
        None => LineClass::Other,
    }
}

/// `[tag rest` where `tag` is an identifier. A value line such as `[1, 2]`
/// is not a header.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == ']')
        .unwrap_or(rest.len());
    let tag = &rest[..end];

    let mut chars = tag.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }

    let attrs = rest[end..].trim_end();
    let attrs = attrs.strip_suffix(']').unwrap_or(attrs);
    Some((tag, attrs.trim()))
}

struct HeaderPatterns {
    name: Regex,
    kind: Regex,
    parent: Regex,
}

fn header_patterns() -> &'static HeaderPatterns {
    static PATTERNS: OnceLock<HeaderPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| HeaderPatterns {
        name: Regex::new(r#"\bname="([^"]+)""#).expect("Invalid name regex"),
        kind: Regex::new(r#"\btype="([^"]+)""#).expect("Invalid type regex"),
        parent: Regex::new(r#"\bparent="([^"]+)""#).expect("Invalid parent regex"),
    })
}

fn attribute(attrs: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(attrs)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Builds a [`NodeRecord`] from the attribute text of a `[node …]` header.
///
/// Attributes are looked up independently, so their order does not matter
/// and any of them may be missing.
pub fn node_header(attrs: &str) -> NodeRecord {
    let patterns = header_patterns();
    NodeRecord {
        name: attribute(attrs, &patterns.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        kind: attribute(attrs, &patterns.kind).unwrap_or_else(|| DEFAULT_KIND.to_string()),
        parent_ref: attribute(attrs, &patterns.parent),
        ..NodeRecord::default()
    }
}

/// Streaming record builder; push lines in order, then [`Tokenizer::finish`].
#[derive(Debug, Default)]
pub struct Tokenizer {
    current: Option<NodeRecord>,
    /// Inside a non-node section; its properties are not ours.
    foreign: bool,
    records: Vec<NodeRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line_no: usize, line: &str) {
        match classify(line) {
            LineClass::Blank => {}
            LineClass::Header { tag, attrs } => {
                // Every header ends the open node, resource headers included.
                self.flush();
                self.foreign = tag != HeaderTag::Node;
                match tag {
                    HeaderTag::Node => {
                        let mut record = node_header(attrs);
                        record.line = Some(line_no);
                        self.current = Some(record);
                    }
                    HeaderTag::Unknown(tag) => {
                        log::trace!("line {line_no}: skipping unknown header [{tag}]");
                        self.report(line_no, DiagnosticKind::UnknownHeader { tag });
                    }
                    _ => {}
                }
            }
            LineClass::Property { key, value } => match self.current.as_mut() {
                Some(record) => {
                    record.set_property(key, value);
                }
                None if self.foreign => {}
                None => {
                    log::trace!("line {line_no}: property `{key}` outside of a node");
                    self.report(
                        line_no,
                        DiagnosticKind::StrayProperty {
                            key: key.to_string(),
                        },
                    );
                }
            },
            LineClass::Other => self.report(line_no, DiagnosticKind::UnrecognizedLine),
        }
    }

    pub fn finish(mut self) -> (Vec<NodeRecord>, Vec<Diagnostic>) {
        // EOF flush
        self.flush();
        (self.records, self.diagnostics)
    }

    fn flush(&mut self) {
        if let Some(record) = self.current.take() {
            self.records.push(record);
        }
    }

    fn report(&mut self, line_no: usize, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic::new(Some(line_no), kind));
    }
}

/// Flat records in declaration order. Never fails.
pub fn tokenize(text: &str) -> Vec<NodeRecord> {
    tokenize_with_diagnostics(text).0
}

pub fn tokenize_with_diagnostics(text: &str) -> (Vec<NodeRecord>, Vec<Diagnostic>) {
    let mut tokenizer = Tokenizer::new();
    for (idx, line) in text.lines().enumerate() {
        tokenizer.push(idx + 1, line);
    }
    tokenizer.finish()
}
