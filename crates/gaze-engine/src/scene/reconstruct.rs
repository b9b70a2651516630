//! Turns flat records into a [`SceneTree`].

use std::collections::HashMap;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::error::SceneError;
use super::options::{DuplicateNames, ParentResolution, ParseOptions};
use super::path::{NodePath, ROOT_MARKER};
use super::record::NodeRecord;
use super::tree::{NodeId, SceneTree};

/// Lenient reconstruction with default options. `None` only for no records.
pub fn reconstruct(records: &[NodeRecord]) -> Option<SceneTree> {
    let mut diagnostics = Vec::new();
    // Default options never reject input.
    reconstruct_with(records, &ParseOptions::default(), &mut diagnostics)
        .ok()
        .flatten()
}

/// Reconstruction with explicit options, collecting diagnostics.
///
/// The root is the first record without a parent reference, or the first
/// record at all. Every other record is attached below the node its
/// reference resolves to, in declaration order; records that resolve to
/// nothing stay in the pool as orphans. `records` is not modified.
pub fn reconstruct_with(
    records: &[NodeRecord],
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<SceneTree>, SceneError> {
    if records.is_empty() {
        return Ok(None);
    }

    let root = match records.iter().position(|r| r.parent_ref.is_none()) {
        Some(idx) => idx,
        None => {
            log::debug!("no parentless node, falling back to `{}`", records[0].name);
            diagnostics.push(Diagnostic::new(
                records[0].line,
                DiagnosticKind::MissingRoot {
                    fallback: records[0].name.clone(),
                },
            ));
            0
        }
    };

    let names = name_index(records, options, diagnostics)?;
    let mut tree = SceneTree::from_records(records, root);

    for (idx, record) in records.iter().enumerate() {
        if idx == root {
            continue;
        }
        let Some(parent_ref) = record.parent_ref.as_deref() else {
            diagnostics.push(Diagnostic::new(
                record.line,
                DiagnosticKind::ExtraRoot {
                    name: record.name.clone(),
                },
            ));
            continue;
        };

        let target = resolve(&tree, &names, record, parent_ref, options, diagnostics);
        match target {
            Some(parent) if parent.index() == idx => {
                diagnostics.push(Diagnostic::new(
                    record.line,
                    DiagnosticKind::SelfParent {
                        name: record.name.clone(),
                    },
                ));
            }
            Some(parent) => tree.attach(NodeId::from_index(idx), parent),
            None => {
                log::debug!(
                    "dropping `{}`: parent `{parent_ref}` not found",
                    record.name
                );
                diagnostics.push(Diagnostic::new(
                    record.line,
                    DiagnosticKind::OrphanNode {
                        name: record.name.clone(),
                        parent_ref: parent_ref.to_string(),
                    },
                ));
            }
        }
    }

    for (idx, record) in records.iter().enumerate() {
        let id = NodeId::from_index(idx);
        if idx == root || tree.parent(id).is_none() || tree.is_reachable(id) {
            continue;
        }
        log::debug!("`{}` is attached but cut off from the root", record.name);
        diagnostics.push(Diagnostic::new(
            record.line,
            DiagnosticKind::Unreachable {
                name: record.name.clone(),
                parent_ref: record.parent_ref.clone().unwrap_or_default(),
            },
        ));
    }

    Ok(Some(tree))
}

/// Name → record index; the last declaration wins.
fn name_index<'a>(
    records: &'a [NodeRecord],
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<HashMap<&'a str, usize>, SceneError> {
    let mut names = HashMap::with_capacity(records.len());
    let mut counts: Vec<(&str, usize, Option<usize>)> = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        if names.insert(record.name.as_str(), idx).is_some() {
            match counts.iter_mut().find(|(name, ..)| *name == record.name) {
                Some((_, count, _)) => *count += 1,
                None => counts.push((record.name.as_str(), 2, record.line)),
            }
        }
    }

    if let Some(&(name, count, _)) = counts.first()
        && options.duplicate_names == DuplicateNames::Reject
    {
        return Err(SceneError::DuplicateName {
            name: name.to_string(),
            count,
        });
    }

    diagnostics.extend(counts.into_iter().map(|(name, count, line)| {
        Diagnostic::new(
            line,
            DiagnosticKind::DuplicateName {
                name: name.to_string(),
                count,
            },
        )
    }));

    Ok(names)
}

fn resolve(
    tree: &SceneTree,
    names: &HashMap<&str, usize>,
    record: &NodeRecord,
    parent_ref: &str,
    options: &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<NodeId> {
    let by_name = |name: &str| names.get(name).map(|&idx| NodeId::from_index(idx));

    if options.parent_resolution == ParentResolution::LastSegment {
        // Raw text after the last `/`; `"/"` and `"A/."` look up `""` and `"."`.
        if parent_ref == ROOT_MARKER {
            return Some(tree.root());
        }
        let last = parent_ref.rsplit_once('/').map_or(parent_ref, |(_, last)| last);
        return by_name(last);
    }

    let path = NodePath::parse(parent_ref);
    let Some(target) = path.target_name() else {
        return Some(tree.root());
    };
    tree.walk(tree.root(), path.segments()).or_else(|| {
        let fallback = by_name(target);
        if fallback.is_some() {
            diagnostics.push(Diagnostic::new(
                record.line,
                DiagnosticKind::PathFallback {
                    name: record.name.clone(),
                    parent_ref: parent_ref.to_string(),
                },
            ));
        }
        fallback
    })
}
