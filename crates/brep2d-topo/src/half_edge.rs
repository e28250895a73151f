//! Half-edge layer: successor/predecessor links and cycle walks.

use crate::id::{HalfEdgeId, VertexId};
use crate::store::IncidenceStore;
use crate::{Result, TopoError};

impl IncidenceStore {
    /// Make `b` the successor of `a`.
    pub fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) -> Result<()> {
        self.half_edge(b)?;
        self.half_edge_mut(a)?.next = b;
        self.half_edge_mut(b)?.prev = a;
        Ok(())
    }

    /// Splice `new` into the cycle right after `at`.
    pub fn insert_after(&mut self, at: HalfEdgeId, new: HalfEdgeId) -> Result<()> {
        let next = self.half_edge(at)?.next;
        self.link(at, new)?;
        self.link(new, next)
    }

    /// Splice `new` into the cycle right before `at`.
    pub fn insert_before(&mut self, at: HalfEdgeId, new: HalfEdgeId) -> Result<()> {
        let prev = self.half_edge(at)?.prev;
        self.link(prev, new)?;
        self.link(new, at)
    }

    /// Bypass `h` in its cycle. `h` itself keeps its stale links.
    pub fn unlink(&mut self, h: HalfEdgeId) -> Result<()> {
        let record = *self.half_edge(h)?;
        self.link(record.prev, record.next)
    }

    /// Half-edges of the cycle through `start`, in successor order.
    ///
    /// The walk is bounded by the table size; a cycle that never returns to
    /// `start` is reported as [`TopoError::OpenCycle`].
    pub fn cycle(&self, start: HalfEdgeId) -> Result<Vec<HalfEdgeId>> {
        let limit = self.half_edges.len();
        let mut out = vec![start];
        let mut current = self.half_edge(start)?.next;
        while current != start {
            if out.len() > limit {
                return Err(TopoError::OpenCycle(start));
            }
            out.push(current);
            current = self.half_edge(current)?.next;
        }
        Ok(out)
    }

    /// Vertex a half-edge leaves from.
    pub fn origin(&self, h: HalfEdgeId) -> Result<VertexId> {
        let uv = self.half_edge(h)?.use_vertex;
        Ok(self.use_vertex(uv)?.vertex)
    }

    /// Vertex a half-edge arrives at.
    pub fn target(&self, h: HalfEdgeId) -> Result<VertexId> {
        let next = self.half_edge(h)?.next;
        self.origin(next)
    }
}
