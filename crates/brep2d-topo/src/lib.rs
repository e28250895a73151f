#![warn(missing_docs)]

//! Incidence store for the brep2d planar topology kernel.
//!
//! Holds the flat tables behind a 2D boundary representation and the
//! low-level helpers of its three linked layers:
//!
//! - **half-edges**: directed sides of edges chained into closed cycles,
//! - **use-loops**: those cycles, grouped per loop into a root + children forest,
//! - **use-vertices**: the corners of a vertex, visited by rotation.
//!
//! Nothing here enforces Euler-operator consistency; that is the job of
//! `brep2d-kernel`, which stages every edit on a copy of this store.
//!
//! # Example
//!
//! ```
//! use brep2d_topo::{IncidenceStore, UseLoopKind, Vertex, UseLoop};
//!
//! let mut store = IncidenceStore::new();
//! let v = store.insert_vertex(Vertex { use_vertex: store.next_use_vertex_id() });
//! let ul = store.insert_use_loop(UseLoop::detached(store.next_half_edge_id()));
//! store.insert_half_edge_at(v, ul, None, true);
//! store.attach(ul, None).unwrap();
//!
//! assert_eq!(store.use_loop_kind(ul).unwrap(), UseLoopKind::Point);
//! assert_eq!(store.degree(v).unwrap(), 0);
//! ```

mod half_edge;
mod id;
mod record;
mod store;
mod use_loop;
mod use_vertex;

pub use id::{free_key, EdgeId, HalfEdgeId, Key, LoopId, UseLoopId, UseVertexId, VertexId};
pub use record::{Edge, HalfEdge, Loop, UseLoop, UseVertex, Vertex};
pub use store::IncidenceStore;
pub use use_loop::UseLoopKind;

use thiserror::Error;

/// Lookup and structural errors raised by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopoError {
    /// No vertex with this key.
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    /// No edge with this key.
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),

    /// No loop with this key.
    #[error("unknown loop {0}")]
    UnknownLoop(LoopId),

    /// No use-loop with this key.
    #[error("unknown use-loop {0}")]
    UnknownUseLoop(UseLoopId),

    /// No half-edge with this key.
    #[error("unknown half-edge {0}")]
    UnknownHalfEdge(HalfEdgeId),

    /// No use-vertex with this key.
    #[error("unknown use-vertex {0}")]
    UnknownUseVertex(UseVertexId),

    /// Following successors from a half-edge never returns to it.
    #[error("cycle through {0} does not close")]
    OpenCycle(HalfEdgeId),

    /// Rotating around a vertex never returns to its first corner.
    #[error("rotation around {0} does not close")]
    OpenRotation(VertexId),

    /// A child chain loops back on itself.
    #[error("child chain under {0} is cyclic or broken")]
    ForestCycle(UseLoopId),

    /// Attempt to detach the outer boundary of a loop.
    #[error("{0} is a root use-loop and cannot be detached")]
    RootDetach(UseLoopId),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, TopoError>;
