//! Error types for nngraph-core.

use std::fmt;

use thiserror::Error;

use crate::graph::Slot;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies a vertex in an error message, either by name or by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexKey {
    /// Lookup by vertex name.
    Name(String),
    /// Lookup by slot index.
    Slot(Slot),
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Slot(slot) => write!(f, "#{slot}"),
        }
    }
}

impl From<&str> for VertexKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<Slot> for VertexKey {
    fn from(slot: Slot) -> Self {
        Self::Slot(slot)
    }
}

/// Graph error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Name or slot was never registered.
    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexKey),

    /// Registration of a name that already denotes a live vertex.
    #[error("Vertex already exists: '{0}'")]
    DuplicateVertex(String),

    /// Unconditional insertion of an edge that is already stored.
    #[error("Edge already exists: #{from} -> #{to}")]
    EdgeAlreadyExists {
        /// Source slot.
        from: Slot,
        /// Target slot.
        to: Slot,
    },

    /// A serialized line does not have the expected field shape.
    #[error("Malformed record at line {line}: expected {expected}, got {content:?}")]
    MalformedRecord {
        /// 1-based line number in the input.
        line: usize,
        /// The offending line.
        content: String,
        /// Shape the parser was looking for.
        expected: &'static str,
    },

    /// Vertex indices read from a file are not a contiguous 0-based run.
    #[error("{}", describe_index_gap(.previous.as_deref(), .next, .index))]
    NonConsecutiveIndices {
        /// Entry sorted right before the gap, `None` when the run does not start at 0.
        previous: Option<String>,
        /// Entry sorted right after the gap.
        next: String,
        /// Index carried by `next`.
        index: usize,
    },

    /// Vertex name is empty or contains a tab or line break, or a graph
    /// name contains a line break.
    #[error("Invalid name {0:?}: would not survive the text format")]
    InvalidName(String),

    /// Every slot representable by [`Slot`] has been allocated.
    #[error("Slot space exhausted: cannot allocate more than {} vertices", u64::from(Slot::MAX) + 1)]
    SlotSpaceExhausted,

    /// IO error while reading or writing a graph.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::trivially_copy_pass_by_ref)] // thiserror hands fields over by reference
fn describe_index_gap(previous: Option<&str>, next: &str, index: &usize) -> String {
    match previous {
        Some(previous) => {
            format!("Non-consecutive vertex indices for: {previous} and {next} (index {index})")
        }
        None => format!("Vertex indices must start at 0, first entry is {next} (index {index})"),
    }
}

/// Rejects vertex names that would break the tab/line oriented text format.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['\t', '\n', '\r']) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Rejects graph display names spanning more than one line.
pub(crate) fn validate_graph_name(name: &str) -> Result<()> {
    if name.contains(['\n', '\r']) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}
