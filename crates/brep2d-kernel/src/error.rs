//! Error types for kernel operations.

use brep2d_topo::{EdgeId, LoopId, TopoError, UseLoopId, VertexId};
use thiserror::Error;

/// Errors returned by Euler operators, queries and (de)serialization.
///
/// Every failing operator leaves the graph exactly as it was.
#[derive(Error, Debug)]
pub enum BRepError {
    /// An ID that is not present in the graph.
    #[error(transparent)]
    Unknown(#[from] TopoError),

    /// `remove_vertex` on a vertex that still has edges.
    #[error("vertex {0} still has incident edges")]
    VertexNotIsolated(VertexId),

    /// `merge_edges_at` on a vertex that does not join exactly two distinct edges.
    #[error("vertex {0} does not join exactly two distinct edges")]
    NotMidVertex(VertexId),

    /// The corners do not face the same region.
    #[error("corners lie in different regions ({}, {})", region(.first), region(.second))]
    LoopMismatch {
        /// Region of the first corner.
        first: Option<LoopId>,
        /// Region of the second corner.
        second: Option<LoopId>,
    },

    /// Operation reserved for child or void use-loops.
    #[error("{0} is the outer boundary of its loop")]
    RootUseLoop(UseLoopId),

    /// Only an area-enclosing child of a loop can become its outer boundary.
    #[error("{0} cannot become the outer boundary of a loop")]
    NotPromotable(UseLoopId),

    /// Removing the edge would leave a loop without an area-enclosing boundary,
    /// merge two regions that do not nest, or move use-loops into the loop
    /// being deleted.
    #[error("removing edge {0} would break the use-loop forest")]
    ForestViolation(EdgeId),

    /// A polygon needs at least three sides.
    #[error("a polygon needs at least 3 sides, got {0}")]
    DegeneratePolygon(usize),

    /// The Consistency Validator found a broken invariant.
    #[error("inconsistent topology: {0}")]
    Inconsistent(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing a graph.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn region(loop_id: &Option<LoopId>) -> String {
    match loop_id {
        Some(l) => l.to_string(),
        None => "void".to_string(),
    }
}

impl BRepError {
    /// Create an inconsistency error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent(message.into())
    }
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, BRepError>;
