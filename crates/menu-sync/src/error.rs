//! Error types for menu-sync

use menu_tree::NodeId;

/// Result type for menu-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in menu-sync operations
///
/// Everything here is fatal to the pass that raises it and is returned
/// before any mutation, with one deliberate exception: a mutation that
/// fails mid-apply is not an `Error` but a reported outcome (see
/// [`MutationFailure`](crate::report::MutationFailure)), because the
/// mutations before it stay committed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source outline is malformed (duplicate siblings, bad names).
    #[error("Invalid source tree: {0}")]
    InvalidSourceTree(#[source] menu_tree::Error),

    /// The loaded graph has no generated root container.
    #[error("Generated graph has no root container")]
    MissingRoot,

    /// A user action referenced an identifier no node carries.
    #[error("No generated node carries identifier {id:?}")]
    UnknownIdentifier { id: NodeId },

    /// The host rejected or garbled an operation.
    #[error("Host operation failed: {message}")]
    Host { message: String },

    /// Structural error from the graph layer (cycles, broken links,
    /// missing handles).
    #[error(transparent)]
    Tree(#[from] menu_tree::Error),
}

impl Error {
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}
