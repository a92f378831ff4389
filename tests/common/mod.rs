#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cmdtree::{Direction, Group, GroupOrId};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("CMDTREE_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set CMDTREE_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// Two frames of draw calls over commands `0..24`; commands 10 and 22 are
/// hidden by [`trace_filter`].
pub fn trace_skeleton() -> Group {
    let mut root = Group::new("trace", 0..24);
    root.add_group(0, 12, "frame 0").expect("frame 0");
    root.add_group(12, 24, "frame 1").expect("frame 1");
    root.add_group(2, 5, "draw 0").expect("draw 0");
    root.add_group(7, 9, "draw 1").expect("draw 1");
    root.add_group(14, 20, "draw 2").expect("draw 2");
    root
}

pub fn trace_filter(id: u64) -> bool {
    id != 10 && id != 22
}

pub fn filled_trace(max_children: u64) -> Group {
    let mut root = trace_skeleton();
    root.fill(trace_filter, max_children).expect("fill succeeds");
    root
}

/// Label an item as its identifier or its group name.
pub fn label(item: GroupOrId<'_>) -> String {
    match item {
        GroupOrId::Id(id) => id.to_string(),
        GroupOrId::Group(group) => group.name.clone(),
    }
}

/// Collect `(path, label)` for every traversed item.
pub fn walk(root: &Group, direction: Direction, start: &[u64]) -> Vec<(Vec<u64>, String)> {
    let mut out = Vec::new();
    root.traverse(direction, start, |path, item| {
        out.push((path.to_vec(), label(item)));
        Ok::<_, ()>(())
    })
    .expect("infallible walk");
    out
}
