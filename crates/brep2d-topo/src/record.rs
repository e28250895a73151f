//! Plain records stored in the incidence tables.
//!
//! Records only hold keys into the other tables; nothing here owns or
//! borrows another record.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, HalfEdgeId, LoopId, UseLoopId, UseVertexId, VertexId};

/// A topological point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    /// A representative corner of this vertex.
    pub use_vertex: UseVertexId,
}

/// An undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The canonical half-edge (`same_dir == true`). The edge's direction
    /// runs from its origin to its target.
    pub half_edge: HalfEdgeId,
}

/// A bounded face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loop {
    /// Root use-loop: the outer boundary.
    pub use_loop: UseLoopId,
}

/// One boundary cycle.
///
/// Use-loops of a bounded loop form a two-level forest: the root has
/// `parent == Some(self)`, children have `parent == Some(root)` and are
/// chained through `child` starting at the root. Use-loops of the void have
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseLoop {
    /// Owning loop, `None` for the void.
    pub loop_id: Option<LoopId>,
    /// Anchor half-edge on the cycle.
    pub half_edge: HalfEdgeId,
    /// Root of the forest this use-loop belongs to.
    pub parent: Option<UseLoopId>,
    /// Next use-loop in the child chain.
    pub child: Option<UseLoopId>,
}

impl UseLoop {
    /// A use-loop that is not linked into any forest yet.
    pub fn detached(half_edge: HalfEdgeId) -> Self {
        Self {
            loop_id: None,
            half_edge,
            parent: None,
            child: None,
        }
    }
}

/// A directed traversal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfEdge {
    /// Corner at the origin of this half-edge.
    pub use_vertex: UseVertexId,
    /// Successor on the same cycle.
    pub next: HalfEdgeId,
    /// Predecessor on the same cycle.
    pub prev: HalfEdgeId,
    /// The other side of the same edge.
    pub opposite: HalfEdgeId,
    /// Cycle this half-edge belongs to.
    pub use_loop: UseLoopId,
    /// `None` for the point record of an isolated vertex.
    pub edge: Option<EdgeId>,
    /// Whether this half-edge runs in the edge's canonical direction.
    pub same_dir: bool,
}

impl HalfEdge {
    /// Point record for an isolated vertex: self-linked, no edge.
    pub fn point(id: HalfEdgeId, use_vertex: UseVertexId, use_loop: UseLoopId) -> Self {
        Self {
            use_vertex,
            next: id,
            prev: id,
            opposite: id,
            use_loop,
            edge: None,
            same_dir: true,
        }
    }

    /// Whether this is the point record of an isolated vertex.
    pub fn is_point(&self) -> bool {
        self.edge.is_none()
    }
}

/// One corner (angular slot) of a vertex, paired with the half-edge that
/// leaves the vertex there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseVertex {
    /// Owning vertex.
    pub vertex: VertexId,
    /// Half-edge leaving the vertex at this corner.
    pub half_edge: HalfEdgeId,
}
