//! Traversal tests over a two-frame trace

mod common;

use std::thread;

use cmdtree::{Direction, GroupOrId};
use common::*;

fn entry(path: &[u64], label: &str) -> (Vec<u64>, String) {
    (path.to_vec(), label.to_string())
}

#[test]
fn test_full_walks_are_mirror_images() {
    let root = filled_trace(0);
    let forwards = walk(&root, Direction::Forwards, &[]);
    let mut backwards = walk(&root, Direction::Backwards, &[]);
    backwards.reverse();
    assert_eq!(forwards, backwards);
    // 22 commands + 2 frames + 3 draws
    assert_eq!(forwards.len(), 27);
}

#[test]
fn test_forward_is_pre_order() {
    let root = filled_trace(0);
    let forwards = walk(&root, Direction::Forwards, &[]);
    assert_eq!(
        &forwards[..5],
        [
            entry(&[0], "frame 0"),
            entry(&[0, 0], "0"),
            entry(&[0, 1], "1"),
            entry(&[0, 2], "draw 0"),
            entry(&[0, 2, 0], "2"),
        ]
    );
}

#[test]
fn test_resume_forward_from_group_path() {
    let root = filled_trace(0);
    let resumed = walk(&root, Direction::Forwards, &[0, 5]);
    assert_eq!(
        &resumed[..5],
        [
            entry(&[0, 5, 0], "7"),
            entry(&[0, 5, 1], "8"),
            entry(&[0, 6], "9"),
            entry(&[0, 7], "11"),
            entry(&[1], "frame 1"),
        ]
    );
}

#[test]
fn test_resume_backward_emits_ancestors_on_the_way_up() {
    let root = filled_trace(0);
    let resumed = walk(&root, Direction::Backwards, &[1, 2, 3]);
    assert_eq!(
        &resumed[..8],
        [
            entry(&[1, 2, 3], "17"),
            entry(&[1, 2, 2], "16"),
            entry(&[1, 2, 1], "15"),
            entry(&[1, 2, 0], "14"),
            entry(&[1, 2], "draw 2"),
            entry(&[1, 1], "13"),
            entry(&[1, 0], "12"),
            entry(&[1], "frame 1"),
        ]
    );
    assert_eq!(resumed.last(), Some(&entry(&[], "trace")));
}

#[test]
fn test_resuming_from_any_leaf_continues_the_full_walk() {
    let root = filled_trace(0);
    let forwards = walk(&root, Direction::Forwards, &[]);
    let backwards = walk(&root, Direction::Backwards, &[]);

    for (k, (path, _)) in forwards.iter().enumerate() {
        if root.resolve(path).and_then(|item| item.id()).is_none() {
            continue;
        }
        assert_eq!(walk(&root, Direction::Forwards, path), forwards[k..], "from {:?}", path);
    }

    for (k, (path, _)) in backwards.iter().enumerate() {
        if root.resolve(path).and_then(|item| item.id()).is_none() {
            continue;
        }
        let mut expected = backwards[k..].to_vec();
        expected.push(entry(&[], "trace"));
        assert_eq!(walk(&root, Direction::Backwards, path), expected, "from {:?}", path);
    }
}

#[test]
fn test_callback_paths_resolve_to_items() {
    let root = filled_trace(4);
    root.traverse(Direction::Forwards, &[], |path, item| {
        assert_eq!(root.resolve(path), Some(item), "path {:?}", path);
        Ok::<_, ()>(())
    })
    .unwrap();
}

#[test]
fn test_error_stops_traversal() {
    #[derive(Debug, PartialEq)]
    struct Cancelled(u64);

    let root = filled_trace(0);
    let mut visited = Vec::new();
    let result = root.traverse(Direction::Backwards, &[], |_, item| {
        visited.push(label(item));
        match item {
            GroupOrId::Id(id) if id == 14 => Err(Cancelled(id)),
            _ => Ok(()),
        }
    });
    assert_eq!(result, Err(Cancelled(14)));
    assert_eq!(visited.last().map(String::as_str), Some("14"));
    assert!(!visited.contains(&"draw 2".to_string()));
}

#[test]
fn test_concurrent_readers_agree() {
    let root = filled_trace(3);
    let expected = walk(&root, Direction::Forwards, &[]);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let root = &root;
                scope.spawn(move || {
                    let direction = if i % 2 == 0 {
                        Direction::Forwards
                    } else {
                        Direction::Backwards
                    };
                    let mut out = walk(root, direction, &[]);
                    if direction == Direction::Backwards {
                        out.reverse();
                    }
                    out
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("reader thread"), expected);
        }
    });
}
