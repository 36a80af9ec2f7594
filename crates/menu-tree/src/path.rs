//! Slash-separated menu paths used as the matching key between source and
//! generated nodes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A path through the menu outline, rendered as `"A/B/C"`.
///
/// The empty path is the root (the anonymous trunk of the source outline,
/// and the generated root container on the graph side). Segments are
/// non-empty names that never contain `/`.
///
/// Paths order lexicographically on their rendered form, which keeps
/// map-keyed traversals deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuPath {
    inner: String,
}

impl MenuPath {
    /// The root path (empty).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a rendered path, validating every segment.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        for segment in path.split('/') {
            validate_segment(segment)?;
        }
        Ok(Self {
            inner: path.to_string(),
        })
    }

    /// Get the rendered string form.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Append one segment.
    ///
    /// The segment is expected to be a validated name (see
    /// [`SourceTree::validate`](crate::source::SourceTree::validate)).
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self {
                inner: segment.to_string(),
            }
        } else {
            Self {
                inner: format!("{}/{}", self.inner, segment),
            }
        }
    }

    /// Iterate the segments in order. Empty for the root path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// The containing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => Some(Self::root()),
        }
    }

    /// The final segment, or `None` for the root.
    pub fn leaf(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.inner.rsplit('/').next()
        }
    }

    /// Number of segments. The root has depth zero.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Whether `other` is this path or one of its ancestors.
    pub fn starts_with(&self, other: &MenuPath) -> bool {
        if other.is_root() {
            return true;
        }
        self == other
            || (self.inner.len() > other.inner.len()
                && self.inner.starts_with(other.inner.as_str())
                && self.inner.as_bytes()[other.inner.len()] == b'/')
    }
}

impl std::fmt::Display for MenuPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::str::FromStr for MenuPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Validate a single name segment.
pub(crate) fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::InvalidSegment {
            segment: segment.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if segment.contains('/') {
        return Err(Error::InvalidSegment {
            segment: segment.to_string(),
            reason: "must not contain '/'".to_string(),
        });
    }
    Ok(())
}
