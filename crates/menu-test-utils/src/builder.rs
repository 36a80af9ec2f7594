//! Outline builders for test scenarios.
//!
//! # Example
//!
//! ```rust
//! use menu_test_utils::builder::{menu, page, page_with};
//!
//! let outline = menu(vec![
//!     page_with("File", vec![page("Open"), page("Save")]),
//!     page("Help"),
//! ]);
//! assert_eq!(outline.node_count(), 4);
//! ```

use menu_tree::{SourceNode, SourceTree};

/// A leaf page.
pub fn page(name: &str) -> SourceNode {
    SourceNode::new(name)
}

/// A page with children.
pub fn page_with(name: &str, children: Vec<SourceNode>) -> SourceNode {
    let mut node = SourceNode::new(name);
    node.children = children;
    node
}

/// A page whose display label differs from its structural name.
pub fn labeled(name: &str, display: &str) -> SourceNode {
    let mut node = SourceNode::new(name);
    node.display_name = Some(display.to_string());
    node
}

/// An outline from top-level pages.
pub fn menu(nodes: Vec<SourceNode>) -> SourceTree {
    SourceTree::new(nodes)
}

/// An outline with `sections` top-level pages of `children` leaves each.
/// The benchmarks use this to size their inputs.
pub fn wide_menu(sections: usize, children: usize) -> SourceTree {
    let nodes = (0..sections)
        .map(|section| {
            page_with(
                &format!("Section {section}"),
                (0..children)
                    .map(|child| page(&format!("Item {section} {child}")))
                    .collect(),
            )
        })
        .collect();
    SourceTree::new(nodes)
}
