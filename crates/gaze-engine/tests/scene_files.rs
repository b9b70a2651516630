use std::path::PathBuf;

use gaze_engine::{SceneParser, SceneTree, load_scene, parse, save_scene, serialize};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use relative_path::RelativePath;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn outline(tree: &SceneTree) -> String {
    tree.iter()
        .map(|item| {
            let node = &tree[item.id];
            format!("{}{} ({})", "  ".repeat(item.depth), node.name, node.kind)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn player_scene_outline() {
    let parsed = load_scene(
        RelativePath::new("player.tscn"),
        &fixtures_dir(),
        &SceneParser::new(),
    )
    .unwrap();

    assert_eq!(parsed.records.len(), 6);
    assert_eq!(parsed.diagnostics, vec![]);
    assert_snapshot!(outline(parsed.tree.as_ref().unwrap()), @r"
    Player (CharacterBody2D)
      Sprite (Sprite2D)
        Hurtbox (Area2D)
          Shape (CollisionShape2D)
      Collision (CollisionShape2D)
      Camera (Camera2D)
    ");
}

#[test]
fn player_scene_serializes_in_tree_order() {
    let text = std::fs::read_to_string(fixtures_dir().join("player.tscn")).unwrap();
    let tree = parse(&text).unwrap();

    assert_snapshot!(serialize(&tree).unwrap(), @r#"
    [gd_scene load_steps=1 format=3 uid="uid://placeholder"]

    [node name="Player" type="CharacterBody2D"]
    collision_layer = 2
    script = ExtResource("1_k3v2a")

    [node name="Sprite" type="Sprite2D" parent="."]
    texture = ExtResource("2_w8d1e")
    hframes = 4

    [node name="Hurtbox" type="Area2D" parent="Sprite"]

    [node name="Shape" type="CollisionShape2D" parent="Sprite/Hurtbox"]
    shape = SubResource("RectangleShape2D_4xk1p")

    [node name="Collision" type="CollisionShape2D" parent="."]
    position = Vector2(0, 1)
    shape = SubResource("RectangleShape2D_4xk1p")

    [node name="Camera" type="Camera2D" parent="."]
    zoom = Vector2(2, 2)
    "#);
}

#[test]
fn broken_scene_is_tolerated_and_reported() {
    let parsed = load_scene(
        RelativePath::new("broken.tscn"),
        &fixtures_dir(),
        &SceneParser::new(),
    )
    .unwrap();

    assert_snapshot!(outline(parsed.tree.as_ref().unwrap()), @r"
    World (Node3D)
      Sun (DirectionalLight3D)
    ");

    let report = parsed
        .diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(report, @r"
    line 1: property `stray` outside of any node ignored
    line 10: unknown header [mystery_block] ignored
    line 11: unrecognized line ignored
    line 7: node `Ghost` dropped: parent `Missing` not found
    line 8: node `Under`: path `Ghost` not found from root, matched by name
    line 9: node `Moon` has no parent but is not the root
    line 8: node `Under` dropped: parent `Ghost` is not in the tree
    ");
    assert_eq!(parsed.warnings().count(), 5);
}

#[test]
fn saved_scene_reloads_identically() {
    let project = tempfile::tempdir().unwrap();
    let text = std::fs::read_to_string(fixtures_dir().join("player.tscn")).unwrap();
    let tree = parse(&text).unwrap();

    let path = RelativePath::new("actors/player.tscn");
    save_scene(path, project.path(), &tree).unwrap();
    let reloaded = load_scene(path, project.path(), &SceneParser::new())
        .unwrap()
        .tree
        .unwrap();

    assert_eq!(reloaded.to_view(), tree.to_view());
}
