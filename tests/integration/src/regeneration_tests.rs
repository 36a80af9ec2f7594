//! End-to-end regeneration workflows.
//!
//! These tests drive full passes through a [`Regenerator`] wired to the
//! in-memory host: outline in, object graph out, then evolve the outline
//! and check that follow-up passes converge without losing identities.

use std::collections::BTreeMap;

use menu_sync::{InMemoryHost, Regenerator, StaticSource};
use menu_test_utils::builder::{labeled, menu, page, page_with};
use menu_tree::{Classification, GeneratedGraph, NodeHandle, NodeId, SourceTree};
use pretty_assertions::assert_eq;

fn setup(tree: SourceTree) -> (Regenerator, InMemoryHost, StaticSource) {
    let host = InMemoryHost::new();
    let source = StaticSource::new(tree);
    let driver = Regenerator::new(Box::new(source.clone()), Box::new(host.clone()));
    (driver, host, source)
}

fn names_of(graph: &GeneratedGraph, handles: &[NodeHandle]) -> Vec<String> {
    handles
        .iter()
        .map(|&handle| graph.node(handle).unwrap().name.clone())
        .collect()
}

#[test]
fn outline_round_trips_into_exactly_three_creations() {
    let (mut driver, host, _source) =
        setup(menu(vec![page_with("A", vec![page("B"), page("C")])]));

    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert_eq!(report.planned, 3);
    assert_eq!(report.applied, 3);

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    assert_eq!(graph.len(), 4);

    let top = graph.children(root).unwrap();
    assert_eq!(names_of(&graph, top), vec!["A"]);

    let section = top[0];
    let section_path = graph.node(section).unwrap().metadata.source_path.clone().unwrap();
    assert_eq!(names_of(&graph, graph.children(section).unwrap()), vec!["B", "C"]);
    for &child in graph.children(section).unwrap() {
        let node = graph.node(child).unwrap();
        assert_eq!(node.classification, Classification::Generated);
        let child_path = node.metadata.source_path.clone().unwrap();
        assert_eq!(child_path.parent(), Some(section_path.clone()));
    }
}

#[test]
fn second_pass_over_an_unchanged_outline_is_a_no_op() {
    let (mut driver, host, _source) = setup(menu(vec![
        page_with("File", vec![page("Open"), page("Save")]),
        page("Help"),
    ]));

    driver.regenerate().unwrap();
    let before = host.snapshot().unwrap();

    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert_eq!(report.planned, 0);
    assert_eq!(host.snapshot().unwrap(), before);
}

#[test]
fn display_rename_keeps_node_identity() {
    let (mut driver, host, source) = setup(menu(vec![page("Reports")]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let reports = graph.children(root).unwrap()[0];
    let original_id = graph.node(reports).unwrap().id.clone();

    source
        .set_tree(menu(vec![labeled("Reports", "Reports (beta)")]))
        .unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    let graph = host.snapshot().unwrap();
    let node = graph.node(reports).unwrap();
    assert_eq!(node.name, "Reports (beta)");
    assert_eq!(node.id, original_id);
}

#[test]
fn structural_rename_is_a_delete_plus_create() {
    let (mut driver, host, source) = setup(menu(vec![page("Old")]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let old = graph.children(root).unwrap()[0];
    let old_id = graph.node(old).unwrap().id.clone();

    source.set_tree(menu(vec![page("New")])).unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert_eq!(report.planned, 2);

    let graph = host.snapshot().unwrap();
    assert!(!graph.contains(old));
    let replacement = graph.children(root).unwrap()[0];
    assert_eq!(graph.node(replacement).unwrap().name, "New");
    assert_ne!(graph.node(replacement).unwrap().id, old_id);
}

#[test]
fn removing_a_section_rescues_its_excluded_child() {
    let (mut driver, host, source) =
        setup(menu(vec![page_with("Legacy", vec![page("Tools")])]));
    driver.regenerate().unwrap();

    // The user pins Legacy/Tools, then the outline drops the whole section.
    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let legacy = graph.children(root).unwrap()[0];
    let tools = graph.children(legacy).unwrap()[0];
    let tools_id = graph.node(tools).unwrap().id.clone();
    driver.mark_excluded(&tools_id).unwrap();

    source.set_tree(SourceTree::new(vec![])).unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    let graph = host.snapshot().unwrap();
    assert!(!graph.contains(legacy));
    assert!(graph.contains(tools));
    assert_eq!(graph.parent(tools).unwrap(), Some(root));
    let node = graph.node(tools).unwrap();
    assert_eq!(node.classification, Classification::Excluded);
    assert_eq!(node.id, tools_id);
}

#[test]
fn reordering_sections_keeps_their_identities() {
    let (mut driver, host, source) =
        setup(menu(vec![page("File"), page("Edit"), page("Help")]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let ids_by_name: BTreeMap<String, NodeId> = graph
        .children(root)
        .unwrap()
        .iter()
        .map(|&handle| {
            let node = graph.node(handle).unwrap();
            (node.name.clone(), node.id.clone())
        })
        .collect();

    source
        .set_tree(menu(vec![page("Help"), page("File"), page("Edit")]))
        .unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    let graph = host.snapshot().unwrap();
    assert_eq!(
        names_of(&graph, graph.children(root).unwrap()),
        vec!["Help", "File", "Edit"]
    );
    for &handle in graph.children(root).unwrap() {
        let node = graph.node(handle).unwrap();
        assert_eq!(Some(&node.id), ids_by_name.get(&node.name));
    }
    assert!(driver.plan().unwrap().is_empty());
}

#[test]
fn churned_outline_converges_in_a_single_pass() {
    let (mut driver, host, source) = setup(menu(vec![
        page_with("Tools", vec![page("Build"), page("Test")]),
        page("Help"),
    ]));
    driver.regenerate().unwrap();

    // Drop Help, grow Build a child, add a Window section, flip the
    // Tools children. One pass has to absorb all of it.
    source
        .set_tree(menu(vec![
            page_with(
                "Tools",
                vec![page("Test"), page_with("Build", vec![page("Debug")])],
            ),
            page_with("Window", vec![page("Layouts")]),
        ]))
        .unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    assert_eq!(names_of(&graph, graph.children(root).unwrap()), vec!["Tools", "Window"]);

    let tools = graph.children(root).unwrap()[0];
    assert_eq!(names_of(&graph, graph.children(tools).unwrap()), vec!["Test", "Build"]);

    let build = graph.children(tools).unwrap()[1];
    assert_eq!(names_of(&graph, graph.children(build).unwrap()), vec!["Debug"]);

    assert!(driver.plan().unwrap().is_empty());
}
