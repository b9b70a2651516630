use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

/// Helper to format a scene tree for snapshot testing.
fn format_tree(tree: &SceneTree) -> String {
    let mut lines = Vec::new();
    for item in tree.iter() {
        let node = &tree[item.id];
        let prefix = "  ".repeat(item.depth);
        lines.push(format!("{prefix}{} ({})", node.name, node.kind));
        for (key, value) in &node.properties {
            lines.push(format!("{prefix}  .{key} = {value}"));
        }
    }
    lines.join("\n")
}

fn names(tree: &SceneTree) -> Vec<&str> {
    tree.iter().map(|item| tree[item.id].name.as_str()).collect()
}

const BASIC: &str = r#"[node name="Root" type="Node2D"]
[node name="Child" type="Sprite2D" parent="."]
visible = true
[node name="Grandchild" type="Label" parent="Child"]
text = "hi"
"#;

#[test]
fn basic_scene() {
    let tree = parse(BASIC).unwrap();
    assert_snapshot!(format_tree(&tree), @r#"
    Root (Node2D)
      Child (Sprite2D)
        .visible = true
        Grandchild (Label)
          .text = "hi"
    "#);

    let grandchild = tree.find("Grandchild").unwrap();
    assert_eq!(tree[grandchild].properties["text"], "\"hi\"");
    assert_eq!(tree[grandchild].parent_ref.as_deref(), Some("Child"));
}

#[test]
fn empty_input_has_no_tree() {
    assert!(parse("").is_none());
    assert!(parse("\n\n   \n").is_none());
    assert!(parse("[gd_scene format=3]\nkey = value\n").is_none());
}

#[test]
fn root_fallback_uses_first_record() {
    let text = r#"[node name="A" type="Node" parent="Elsewhere"]
[node name="B" type="Node" parent="A"]
[node name="C" type="Node" parent="."]
"#;
    let tree = parse(text).unwrap();
    assert_eq!(tree[tree.root()].name, "A");
    assert_eq!(names(&tree), vec!["A", "B", "C"]);
}

#[test]
fn dot_parent_attaches_to_root_regardless_of_position() {
    let text = r#"[node name="Early" type="Node" parent="."]
[node name="Root" type="Node"]
[node name="Late" type="Node" parent="."]
"#;
    let tree = parse(text).unwrap();
    let root = tree.root();
    assert_eq!(tree[root].name, "Root");
    let children: Vec<_> = tree
        .children(root)
        .iter()
        .map(|&id| tree[id].name.as_str())
        .collect();
    assert_eq!(children, vec!["Early", "Late"]);
}

#[test]
fn dot_parent_ignores_later_node_sharing_the_root_name() {
    let text = r#"[node name="Main" type="Node"]
[node name="Child" type="Node" parent="."]
[node name="Main" type="Node" parent="Child"]
"#;
    let tree = parse(text).unwrap();
    assert_eq!(names(&tree), vec!["Main", "Child", "Main"]);
}

#[test]
fn orphan_is_parsed_but_unreachable() {
    let text = r#"[node name="Root" type="Node"]
[node name="Lost" type="Node" parent="Ghost"]
[node name="Kept" type="Node" parent="."]
"#;
    let records = tokenize(text);
    assert!(records.iter().any(|r| r.name == "Lost"));

    let tree = reconstruct(&records).unwrap();
    assert_eq!(names(&tree), vec!["Root", "Kept"]);
    let orphans: Vec<_> = tree.orphans().map(|id| tree[id].name.as_str()).collect();
    assert_eq!(orphans, vec!["Lost"]);
    assert!(tree.iter().all(|item| tree[item.id].name != "Lost"));
}

#[test]
fn children_of_orphans_stay_unreachable() {
    let text = r#"[node name="Root" type="Node"]
[node name="Lost" type="Node" parent="Ghost"]
[node name="UnderLost" type="Node" parent="Lost"]
"#;
    let parsed = SceneParser::new().parse(text).unwrap();
    let tree = parsed.tree.as_ref().unwrap();
    assert_eq!(names(tree), vec!["Root"]);
    let orphans: Vec<_> = tree.orphans().map(|id| tree[id].name.as_str()).collect();
    assert_eq!(orphans, vec!["Lost", "UnderLost"]);
    assert_eq!(
        parsed.diagnostics.last(),
        Some(&Diagnostic::new(
            Some(3),
            DiagnosticKind::Unreachable {
                name: "UnderLost".into(),
                parent_ref: "Lost".into(),
            }
        ))
    );
    assert_eq!(parsed.warnings().count(), 2);
}

#[test]
fn forward_reference_attaches_once_parent_is_declared() {
    let text = r#"[node name="Root" type="Node"]
[node name="Leaf" type="Node" parent="Branch"]
[node name="Branch" type="Node" parent="."]
"#;
    let tree = parse(text).unwrap();
    assert_eq!(names(&tree), vec!["Root", "Branch", "Leaf"]);
}

#[test]
fn multi_segment_path_uses_last_segment_when_walk_fails() {
    let text = r#"[node name="Root" type="Node"]
[node name="Body" type="Node" parent="."]
[node name="Leaf" type="Node" parent="Wrong/Body"]
"#;
    let tree = parse(text).unwrap();
    assert_eq!(names(&tree), vec!["Root", "Body", "Leaf"]);
}

#[test]
fn path_walk_disambiguates_reused_names() {
    let text = r#"[node name="Root" type="Node"]
[node name="Left" type="Node" parent="."]
[node name="Hand" type="Node" parent="Left"]
[node name="Right" type="Node" parent="."]
[node name="Hand" type="Node" parent="Right"]
[node name="Finger" type="Node" parent="Left/Hand"]
"#;
    let tree = parse(text).unwrap();
    let finger = tree.find("Finger").unwrap();
    assert_eq!(tree.path_of(finger).unwrap().to_string(), "Left/Hand/Finger");

    let legacy = SceneParser::with_options(ParseOptions::legacy())
        .parse(text)
        .unwrap()
        .tree
        .unwrap();
    let finger = legacy.find("Finger").unwrap();
    assert_eq!(legacy.path_of(finger).unwrap().to_string(), "Right/Hand/Finger");
}

#[test]
fn self_parent_is_not_attached() {
    let text = r#"[node name="Root" type="Node"]
[node name="Loop" type="Node" parent="Loop"]
"#;
    let parsed = SceneParser::new().parse(text).unwrap();
    let tree = parsed.tree.unwrap();
    assert_eq!(names(&tree), vec!["Root"]);
    assert!(parsed.diagnostics.iter().any(|d| matches!(
        &d.kind,
        DiagnosticKind::SelfParent { name } if name == "Loop"
    )));
}

#[test]
fn mutual_parents_never_reach_the_root() {
    let text = r#"[node name="Root" type="Node"]
[node name="A" type="Node" parent="B"]
[node name="B" type="Node" parent="A"]
"#;
    let parsed = SceneParser::new().parse(text).unwrap();
    let tree = parsed.tree.as_ref().unwrap();
    assert_eq!(names(tree), vec!["Root"]);
    assert!(serialize(tree).is_ok());

    let orphans: Vec<_> = tree.orphans().map(|id| tree[id].name.as_str()).collect();
    assert_eq!(orphans, vec!["A", "B"]);
    let report: Vec<_> = parsed.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        report,
        vec![
            "line 2: node `A` dropped: parent `B` is not in the tree",
            "line 3: node `B` dropped: parent `A` is not in the tree",
        ]
    );
}

#[test]
fn second_parentless_record_is_reported() {
    let text = r#"[node name="One" type="Node"]
[node name="Two" type="Node"]
"#;
    let parsed = SceneParser::new().parse(text).unwrap();
    assert_eq!(names(parsed.tree.as_ref().unwrap()), vec!["One"]);
    assert_eq!(
        parsed.diagnostics,
        vec![Diagnostic::new(
            Some(2),
            DiagnosticKind::ExtraRoot { name: "Two".into() }
        )]
    );
}

#[test]
fn reconstruct_leaves_records_untouched() {
    let records = tokenize(BASIC);
    let before = records.clone();
    let _ = reconstruct(&records);
    assert_eq!(records, before);
}

#[test]
fn duplicate_names_last_wins_by_default() {
    let text = r#"[node name="Root" type="Node"]
[node name="Dup" type="Node" parent="."]
[node name="Dup" type="Sprite2D" parent="."]
[node name="Kid" type="Node" parent="Dup"]
"#;
    let parsed = SceneParser::with_options(ParseOptions::legacy())
        .parse(text)
        .unwrap();
    let tree = parsed.tree.unwrap();
    let dups: Vec<_> = tree
        .children(tree.root())
        .iter()
        .map(|&id| (tree[id].kind.as_str(), tree.children(id).len()))
        .collect();
    assert_eq!(dups, vec![("Node", 0), ("Sprite2D", 1)]);
    assert!(parsed.diagnostics.contains(&Diagnostic::new(
        Some(3),
        DiagnosticKind::DuplicateName {
            name: "Dup".into(),
            count: 2
        }
    )));
}

#[test]
fn duplicate_names_can_be_rejected() {
    let text = r#"[node name="Root" type="Node"]
[node name="Dup" type="Node" parent="."]
[node name="Dup" type="Node" parent="."]
[node name="Dup" type="Node" parent="."]
"#;
    let err = SceneParser::with_options(ParseOptions::strict())
        .parse(text)
        .unwrap_err();
    assert!(matches!(
        err,
        SceneError::DuplicateName { ref name, count: 3 } if name == "Dup"
    ));
}

#[rstest]
#[case::plain("[node name=\"R\" type=\"Node\"]\n", 0)]
#[case::unknown_header("[node name=\"R\"]\n[mystery]\n", 1)]
#[case::stray_property("a = 1\n[node name=\"R\"]\n", 1)]
#[case::orphan("[node name=\"R\"]\n[node name=\"X\" parent=\"Nope\"]\n", 1)]
#[case::missing_root("[node name=\"R\" parent=\".\"]\n", 1)]
#[case::cycle("[node name=\"R\"]\n[node name=\"A\" parent=\"B\"]\n[node name=\"B\" parent=\"A\"]\n", 2)]
fn warning_counts(#[case] text: &str, #[case] expected: usize) {
    let parsed = SceneParser::new().parse(text).unwrap();
    assert_eq!(parsed.warnings().count(), expected, "{:?}", parsed.diagnostics);
}

#[rstest]
#[case::slash("/", false)]
#[case::dot_segment("Child/.", false)]
#[case::dot(".", true)]
#[case::nested("Child", true)]
fn legacy_matches_the_raw_last_segment(#[case] parent_ref: &str, #[case] attached: bool) {
    let text = format!(
        "[node name=\"Root\"]\n[node name=\"Child\" parent=\".\"]\n[node name=\"Leaf\" parent=\"{parent_ref}\"]\n"
    );
    let parsed = SceneParser::with_options(ParseOptions::legacy())
        .parse(&text)
        .unwrap();
    let tree = parsed.tree.unwrap();
    assert_eq!(tree.find("Leaf").is_some(), attached);
    assert_eq!(
        parsed
            .diagnostics
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::OrphanNode { .. })),
        !attached
    );
}

#[rstest]
#[case::slash("/", "Leaf")]
#[case::dot_segment("Child/.", "Child/Leaf")]
#[case::leading_dot("./Child", "Child/Leaf")]
fn path_walk_drops_empty_and_dot_segments(#[case] parent_ref: &str, #[case] expected: &str) {
    let text = format!(
        "[node name=\"Root\"]\n[node name=\"Child\" parent=\".\"]\n[node name=\"Leaf\" parent=\"{parent_ref}\"]\n"
    );
    let tree = parse(&text).unwrap();
    let leaf = tree.find("Leaf").unwrap();
    assert_eq!(tree.path_of(leaf).unwrap().to_string(), expected);
}

#[test]
fn non_utf8_bytes_are_an_input_error() {
    let err = parse_bytes(&[0x5b, 0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, SceneError::Input(_)));
    assert!(SceneParser::new().parse_bytes(b"\xc3\x28").is_err());
}

#[test]
fn property_order_survives_round_trip() {
    let text = r#"[node name="Root" type="Node"]
z = 1
a = 2
m = 3
a = 4
"#;
    let tree = parse(text).unwrap();
    let out = serialize(&tree).unwrap();
    let again = parse(&out).unwrap();
    let keys: Vec<_> = again[again.root()]
        .properties
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    // `a` was overwritten in place, so it keeps its first position.
    assert_eq!(keys, vec!["z=1", "a=4", "m=3"]);
}

#[test]
fn serialize_then_parse_restores_structure() {
    let tree = parse(BASIC).unwrap();
    let out = serialize(&tree).unwrap();
    assert!(out.starts_with(SCENE_PREAMBLE));

    let again = parse(&out).unwrap();
    assert_eq!(again.to_view(), tree.to_view());
}

#[test]
fn edited_tree_round_trips() {
    let mut tree = parse(BASIC).unwrap();
    let child = tree.find("Child").unwrap();
    let grandchild = tree.find("Grandchild").unwrap();
    tree.set_property(child, "modulate", "Color(1, 0, 0, 1)").unwrap();
    tree.remove_property(child, "visible").unwrap();
    let extra = tree.add_child(grandchild, "Deep", "Node").unwrap();
    tree.set_property(extra, "note", "a = b").unwrap();

    let again = parse(&serialize(&tree).unwrap()).unwrap();
    assert_snapshot!(format_tree(&again), @r#"
    Root (Node2D)
      Child (Sprite2D)
        .modulate = Color(1, 0, 0, 1)
        Grandchild (Label)
          .text = "hi"
          Deep (Node)
            .note = a = b
    "#);
}
