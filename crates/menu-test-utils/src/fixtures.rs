//! Fixture outlines checked into `test-fixtures/menus/`.

use std::fs;
use std::path::PathBuf;

use menu_tree::SourceTree;

/// Path to the test-fixtures directory (relative to the workspace root).
pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/menu-test-utils -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures")
}

/// Load and parse `test-fixtures/menus/{name}.toml`.
///
/// # Panics
/// Panics with a descriptive message if the fixture is missing or invalid.
pub fn load_menu(name: &str) -> SourceTree {
    let path = fixtures_dir().join("menus").join(format!("{name}.toml"));
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture menu at {}: {}", path.display(), e));
    toml::from_str(&content).unwrap_or_else(|e| {
        panic!(
            "Fixture menu {} is not a valid outline: {}",
            path.display(),
            e
        )
    })
}
