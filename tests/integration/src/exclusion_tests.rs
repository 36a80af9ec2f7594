//! Exclusion and inclusion lifecycle.
//!
//! Excluded nodes sit outside the engine's reach: passes must never move,
//! rewrite, or delete them, no matter what the outline does. Re-inclusion
//! hands the node back, and the retained source path lets the next pass
//! match it instead of recreating it.

use menu_sync::{InMemoryHost, Regenerator, StaticSource};
use menu_test_utils::builder::{menu, page, page_with};
use menu_test_utils::graph::user_node;
use menu_tree::{Classification, SourceTree};
use pretty_assertions::assert_eq;

fn setup(tree: SourceTree) -> (Regenerator, InMemoryHost, StaticSource) {
    let host = InMemoryHost::new();
    let source = StaticSource::new(tree);
    let driver = Regenerator::new(Box::new(source.clone()), Box::new(host.clone()));
    (driver, host, source)
}

#[test]
fn excluded_entry_outlives_outline_removal() {
    let (mut driver, host, source) =
        setup(menu(vec![page_with("File", vec![page("Open"), page("Save")])]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let file = graph.children(root).unwrap()[0];
    let open = graph.children(file).unwrap()[0];
    let open_node = graph.node(open).unwrap().clone();
    driver.mark_excluded(&open_node.id).unwrap();

    source
        .set_tree(menu(vec![page_with("File", vec![page("Save")])]))
        .unwrap();
    driver.regenerate().unwrap();
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    assert!(graph.contains(open));
    assert_eq!(graph.parent(open).unwrap(), Some(file));
    let survivor = graph.node(open).unwrap();
    assert_eq!(survivor.classification, Classification::Excluded);
    assert_eq!(survivor.id, open_node.id);
    assert_eq!(survivor.name, open_node.name);
    assert_eq!(survivor.metadata, open_node.metadata);
}

#[test]
fn excluding_a_listed_entry_regenerates_a_managed_copy() {
    let (mut driver, host, _source) =
        setup(menu(vec![page_with("File", vec![page("Open")])]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let file = graph.children(root).unwrap()[0];
    let open = graph.children(file).unwrap()[0];
    let open_id = graph.node(open).unwrap().id.clone();
    driver.mark_excluded(&open_id).unwrap();

    // The outline still lists File/Open, so the engine owes it a node and
    // regenerates a managed one beside the pinned original.
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert_eq!(report.planned, 1);
    let graph = host.snapshot().unwrap();
    let children = graph.children(file).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0], open);
    assert_eq!(graph.node(children[0]).unwrap().classification, Classification::Excluded);
    let copy = graph.node(children[1]).unwrap();
    assert_eq!(copy.classification, Classification::Generated);
    assert_eq!(copy.name, "Open");
    assert_ne!(copy.id, open_id);
}

#[test]
fn reinclusion_matches_instead_of_recreating() {
    let (mut driver, host, _source) =
        setup(menu(vec![page_with("File", vec![page("Open")])]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let file = graph.children(root).unwrap()[0];
    let open = graph.children(file).unwrap()[0];
    let open_id = graph.node(open).unwrap().id.clone();

    driver.mark_excluded(&open_id).unwrap();
    driver.mark_included(&open_id).unwrap();

    // Re-inclusion kept the recorded source path, so the node matches
    // File/Open again and no mutation is owed.
    assert!(driver.plan().unwrap().is_empty());
    let graph = host.snapshot().unwrap();
    assert_eq!(graph.children(file).unwrap().len(), 1);
    let node = graph.node(open).unwrap();
    assert_eq!(node.classification, Classification::Generated);
    assert_eq!(node.id, open_id);
}

#[test]
fn reincluded_duplicate_heals_on_the_next_pass() {
    let (mut driver, host, _source) =
        setup(menu(vec![page_with("File", vec![page("Open")])]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let file = graph.children(root).unwrap()[0];
    let open = graph.children(file).unwrap()[0];
    let open_id = graph.node(open).unwrap().id.clone();

    // Exclude while the outline keeps the entry: the pass leaves a managed
    // copy behind. Re-including the original makes two carriers of
    // File/Open, and the original wins because it comes first.
    driver.mark_excluded(&open_id).unwrap();
    driver.regenerate().unwrap();
    driver.mark_included(&open_id).unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    let graph = host.snapshot().unwrap();
    let children = graph.children(file).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0], open);
    assert_eq!(graph.node(open).unwrap().id, open_id);
    assert!(driver.plan().unwrap().is_empty());
}

#[test]
fn user_included_nodes_ride_along_untouched() {
    let (mut driver, host, source) = setup(menu(vec![page("File"), page("Help")]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let root = graph.generated_root().unwrap().unwrap();
    let custom = host.insert_node(Some(root), user_node("Custom")).unwrap();
    let custom_id = host.snapshot().unwrap().node(custom).unwrap().id.clone();

    source.set_tree(menu(vec![page("Help"), page("File")])).unwrap();
    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    let graph = host.snapshot().unwrap();
    let names: Vec<String> = graph
        .children(root)
        .unwrap()
        .iter()
        .map(|&handle| graph.node(handle).unwrap().name.clone())
        .collect();
    // Engine entries flow around the hand-built slot.
    assert_eq!(names, vec!["Help", "File", "Custom"]);
    let node = graph.node(custom).unwrap();
    assert_eq!(node.classification, Classification::UserIncluded);
    assert_eq!(node.id, custom_id);
}

#[test]
fn excluding_the_root_forces_a_fresh_container() {
    let (mut driver, host, _source) = setup(menu(vec![page("File")]));
    driver.regenerate().unwrap();

    let graph = host.snapshot().unwrap();
    let old_root = graph.generated_root().unwrap().unwrap();
    let old_file = graph.children(old_root).unwrap()[0];
    let root_id = graph.node(old_root).unwrap().id.clone();
    driver.mark_excluded(&root_id).unwrap();

    let report = driver.regenerate().unwrap();

    assert!(report.is_success());
    assert!(report.actions.iter().any(|a| a.contains("root container")));

    let graph = host.snapshot().unwrap();
    let new_root = graph.generated_root().unwrap().unwrap();
    assert_ne!(new_root, old_root);
    assert_eq!(graph.top_level().len(), 2);

    // The pinned old container keeps its whole subtree.
    assert_eq!(graph.node(old_root).unwrap().classification, Classification::Excluded);
    assert_eq!(graph.children(old_root).unwrap(), &[old_file]);

    // The outline regenerated under the fresh container.
    let replacement = graph.children(new_root).unwrap()[0];
    assert_eq!(graph.node(replacement).unwrap().name, "File");
    assert_ne!(graph.node(replacement).unwrap().id, graph.node(old_file).unwrap().id);
}
