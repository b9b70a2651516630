// Shared by the bench targets in this directory; each one uses a subset.
#[allow(dead_code)]
pub fn generate_flat_scene(nodes: usize) -> String {
    let mut content = String::from("[gd_scene load_steps=1 format=3]\n\n[node name=\"Root\" type=\"Node2D\"]\n\n");
    for i in 0..nodes {
        content.push_str(&format!(
            "[node name=\"Node{i}\" type=\"Sprite2D\" parent=\".\"]\nposition = Vector2({i}, {i})\nvisible = true\n\n"
        ));
    }
    content
}

/// `branching` children per node, `depth` levels below the root.
#[allow(dead_code)]
pub fn generate_nested_scene(branching: usize, depth: usize) -> String {
    let mut content = String::from("[node name=\"Root\" type=\"Node\"]\n\n");
    let mut frontier = vec![String::from(".")];
    let mut counter = 0;

    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &frontier {
            for _ in 0..branching {
                let name = format!("N{counter}");
                counter += 1;
                content.push_str(&format!(
                    "[node name=\"{name}\" type=\"Node\" parent=\"{parent}\"]\nindex = {counter}\n\n"
                ));
                next.push(if parent == "." {
                    name
                } else {
                    format!("{parent}/{name}")
                });
            }
        }
        frontier = next;
    }

    content
}
