//! Identifier stability and repair.
//!
//! Copy/paste in the host editor duplicates identifiers, and hand-built
//! nodes can arrive with blank ones. A pass has to end with every
//! identifier unique and populated, without disturbing the originals.

use std::collections::BTreeSet;

use menu_sync::{HostGraph, InMemoryHost, Regenerator, StaticSource};
use menu_test_utils::builder::{menu, page, page_with};
use menu_test_utils::graph::{engine_node_with_id, excluded_node};
use menu_tree::SourceTree;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn setup(tree: SourceTree) -> (Regenerator, InMemoryHost, StaticSource) {
    let host = InMemoryHost::new();
    let source = StaticSource::new(tree);
    let driver = Regenerator::new(Box::new(source.clone()), Box::new(host.clone()));
    (driver, host, source)
}

#[test]
fn pasted_duplicate_is_swept_by_the_next_pass() {
    let (mut driver, host, _source) =
        setup(menu(vec![page_with("File", vec![page("Open")])]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let file = graph.children(root).unwrap()[0];
    let file_id = graph.node(file).unwrap().id.clone();
    let copy = host.duplicate_subtree(file).unwrap();

    // The copy carries the same recorded paths, so it loses the match and
    // goes away with its children before repair ever sees the collision.
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert!(report.reminted.is_empty());
    let graph = host.snapshot().unwrap();
    assert!(!graph.contains(copy));
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.node(file).unwrap().id, file_id);
}

#[test]
fn shielded_duplicate_is_reminted_instead() {
    let (mut driver, host, _source) = setup(menu(vec![page("File")]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let file = graph.children(root).unwrap()[0];
    let file_id = graph.node(file).unwrap().id.clone();

    // A pasted copy inside an excluded container is invisible to the
    // planner, so only repair can resolve the collision.
    let pinned = host.insert_node(Some(root), excluded_node("Pinned")).unwrap();
    let copy = host
        .insert_node(
            Some(pinned),
            engine_node_with_id(file_id.as_str(), "File", "File"),
        )
        .unwrap();

    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert_eq!(report.reminted.len(), 1);
    assert_eq!(report.reminted[0].node, copy);
    assert_eq!(report.reminted[0].previous, file_id);

    let graph = host.snapshot().unwrap();
    assert_eq!(graph.node(file).unwrap().id, file_id);
    assert_eq!(graph.parent(copy).unwrap(), Some(pinned));
    let copy_id = graph.node(copy).unwrap().id.clone();
    assert_ne!(copy_id, file_id);
    assert!(!copy_id.is_blank());
}

#[test]
fn every_identifier_is_unique_after_a_pass() {
    let (mut driver, host, _source) = setup(menu(vec![page("A"), page("B")]));
    driver.regenerate().unwrap();

    // Two claimed carriers of one identifier survive the plan untouched,
    // which is exactly the state repair exists for.
    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let children = graph.children(root).unwrap().to_vec();
    let shared = graph.node(children[0]).unwrap().id.clone();
    let mut editor = host.clone();
    editor.set_identifier(children[1], shared.clone()).unwrap();

    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert_eq!(report.reminted.len(), 1);
    assert_eq!(report.reminted[0].node, children[1]);

    let graph = host.snapshot().unwrap();
    let ids: Vec<_> = graph.iter().map(|(_, node)| node.id.clone()).collect();
    let unique: BTreeSet<_> = ids.iter().cloned().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| !id.is_blank()));
    assert_eq!(graph.node(children[0]).unwrap().id, shared);
}

fn outline_shape() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0usize..4, 0..6)
}

fn build_outline(shape: &[usize]) -> SourceTree {
    menu(shape
        .iter()
        .enumerate()
        .map(|(section, &entries)| {
            page_with(
                &format!("Section {section}"),
                (0..entries).map(|entry| page(&format!("Entry {entry}"))).collect(),
            )
        })
        .collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any outline-to-outline transition settles in one pass, and sections
    /// present on both sides keep their identifiers.
    #[test]
    fn any_transition_converges_in_one_pass(first in outline_shape(), second in outline_shape()) {
        let (mut driver, host, source) = setup(build_outline(&first));
        driver.regenerate().unwrap();

        let graph = host.snapshot().unwrap();
        let root = graph.generated_root().unwrap().unwrap();
        let ids_before: Vec<_> = graph
            .children(root)
            .unwrap()
            .iter()
            .map(|&handle| graph.node(handle).unwrap().id.clone())
            .collect();

        source.set_tree(build_outline(&second)).unwrap();
        let report = driver.regenerate().unwrap();
        prop_assert!(report.is_success());

        let graph = host.snapshot().unwrap();
        let expected = 1 + second.len() + second.iter().sum::<usize>();
        prop_assert_eq!(graph.len(), expected);

        let surviving = first.len().min(second.len());
        let ids_after: Vec<_> = graph
            .children(root)
            .unwrap()
            .iter()
            .map(|&handle| graph.node(handle).unwrap().id.clone())
            .collect();
        prop_assert_eq!(&ids_after[..surviving], &ids_before[..surviving]);

        let plan = driver.plan().unwrap();
        prop_assert!(plan.is_empty(), "leftover plan: {}", plan.summary());
    }
}
