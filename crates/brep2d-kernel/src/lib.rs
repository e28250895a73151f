#![warn(missing_docs)]

//! Planar B-rep topology kernel.
//!
//! [`BRep2d`] is a cyclic incidence graph of vertices, edges and face loops,
//! edited only through Euler operators that keep its half-edge, use-loop and
//! use-vertex layers consistent. Two read-only cursors walk it: around a face
//! boundary ([`LoopCursor`]) and around a vertex ([`VertexCursor`]).
//!
//! The unbounded region has no loop id; it appears as `None` wherever a loop
//! is expected.
//!
//! # Example
//!
//! ```
//! use brep2d_kernel::{BRep2d, UseLoopKind};
//!
//! let mut brep = BRep2d::new();
//! let square = brep.add_polygon(4, None).unwrap();
//!
//! // Split the square along a diagonal.
//! let (a, b) = brep
//!     .corner_pair(square.vertices[0], square.vertices[2], Some(square.loop_id))
//!     .unwrap()
//!     .unwrap();
//! let diagonal = brep.connect_vertex(a, b, true).unwrap();
//! assert_eq!(brep.loop_ids().len(), 2);
//!
//! let cursor = brep.loop_cursor(square.loop_id).unwrap();
//! assert_eq!(cursor.count_vertex_use_loop(), 3);
//! assert_eq!(cursor.use_loop_kind(), UseLoopKind::Area);
//!
//! // And glue it back together.
//! brep.remove_edge(diagonal, false).unwrap();
//! assert_eq!(brep.loop_ids().len(), 1);
//! brep.validate().unwrap();
//! ```

mod build;
mod cursor;
mod error;
mod euler;
mod snapshot;
mod validate;

#[cfg(test)]
mod fixtures;

pub use brep2d_topo::{
    EdgeId, HalfEdgeId, IncidenceStore, LoopId, UseLoopId, UseLoopKind, UseVertexId, VertexId,
};
pub use build::Polygon;
pub use cursor::{LoopCursor, VertexCursor};
pub use error::{BRepError, Result};
pub use snapshot::{Keyed, Snapshot};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A planar boundary representation.
///
/// All state lives in flat tables keyed by small recyclable integers; see
/// [`IncidenceStore`]. Mutating methods are atomic: on error the graph is
/// left exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Snapshot", try_from = "Snapshot")]
pub struct BRep2d {
    store: IncidenceStore,
}

impl BRep2d {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.store.clear();
        trace!("cleared graph");
    }

    /// Whether the graph holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Read-only access to the underlying tables.
    pub fn store(&self) -> &IncidenceStore {
        &self.store
    }

    /// Run `edit` on a staged copy of the store and commit it only if the
    /// edit succeeds.
    ///
    /// Debug builds also run the validator on the staged copy; a failure there
    /// is a bug in the operator, not a caller error, and panics.
    pub(crate) fn transact<T>(
        &mut self,
        op: &'static str,
        edit: impl FnOnce(&mut IncidenceStore) -> Result<T>,
    ) -> Result<T> {
        let mut staged = self.store.clone();
        match edit(&mut staged) {
            Ok(value) => {
                if cfg!(debug_assertions) {
                    if let Err(err) = validate::check(&staged) {
                        panic!("{op} broke the topology: {err}");
                    }
                }
                self.store = staged;
                Ok(value)
            }
            Err(err) => {
                trace!(op, error = %err, "operation rejected");
                Err(err)
            }
        }
    }

    /// Whether vertex `v` exists.
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.store.vertices.contains_key(&v)
    }

    /// Whether edge `e` exists.
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.store.edges.contains_key(&e)
    }

    /// Whether loop `l` exists.
    pub fn contains_loop(&self, l: LoopId) -> bool {
        self.store.loops.contains_key(&l)
    }

    /// All vertex ids in ascending order.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.store.vertices.keys().copied().collect()
    }

    /// All edge ids in ascending order.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.store.edges.keys().copied().collect()
    }

    /// All loop ids in ascending order.
    pub fn loop_ids(&self) -> Vec<LoopId> {
        self.store.loops.keys().copied().collect()
    }

    /// Use-loops of the unbounded region.
    pub fn void_use_loops(&self) -> Vec<UseLoopId> {
        self.store
            .use_loops
            .iter()
            .filter(|(_, ul)| ul.loop_id.is_none())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Loops on the left and right of edge `e`, relative to its canonical
    /// direction. `None` is the void.
    pub fn edge_loops(&self, e: EdgeId) -> Result<(Option<LoopId>, Option<LoopId>)> {
        let s = &self.store;
        let h = s.edge(e)?.half_edge;
        let o = s.half_edge(h)?.opposite;
        let left = s.use_loop(s.half_edge(h)?.use_loop)?.loop_id;
        let right = s.use_loop(s.half_edge(o)?.use_loop)?.loop_id;
        Ok((left, right))
    }

    /// Start and end vertex of edge `e`.
    pub fn edge_vertices(&self, e: EdgeId) -> Result<(VertexId, VertexId)> {
        let h = self.store.edge(e)?.half_edge;
        Ok((self.store.origin(h)?, self.store.target(h)?))
    }

    /// Start (`start == true`) or end vertex of edge `e`.
    pub fn edge_vertex(&self, e: EdgeId, start: bool) -> Result<VertexId> {
        let (a, b) = self.edge_vertices(e)?;
        Ok(if start { a } else { b })
    }

    /// Number of edge ends at `v`; 0 for an isolated vertex.
    pub fn degree(&self, v: VertexId) -> Result<usize> {
        Ok(self.store.degree(v)?)
    }

    /// Classification of use-loop `ul`.
    pub fn use_loop_kind(&self, ul: UseLoopId) -> Result<UseLoopKind> {
        Ok(self.store.use_loop_kind(ul)?)
    }
}
