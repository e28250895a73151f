//! Use-vertex layer: corners and the rotation around a vertex.

use crate::id::{HalfEdgeId, UseVertexId, VertexId};
use crate::store::IncidenceStore;
use crate::{Result, TopoError};

impl IncidenceStore {
    /// Next half-edge leaving the same origin, counter-clockwise.
    ///
    /// The predecessor of `h` arrives at the origin; its opposite leaves it
    /// again on the far side of the sector owned by `h`'s cycle.
    pub fn rotate(&self, h: HalfEdgeId) -> Result<HalfEdgeId> {
        let prev = self.half_edge(h)?.prev;
        Ok(self.half_edge(prev)?.opposite)
    }

    /// Corners of `v` in rotation order, starting at its representative corner.
    pub fn corners(&self, v: VertexId) -> Result<Vec<UseVertexId>> {
        let start_uv = self.vertex(v)?.use_vertex;
        let start = self.use_vertex(start_uv)?.half_edge;
        let limit = self.use_vertices.len();
        let mut out = vec![start_uv];
        let mut current = self.rotate(start)?;
        while current != start {
            if out.len() > limit {
                return Err(TopoError::OpenRotation(v));
            }
            out.push(self.half_edge(current)?.use_vertex);
            current = self.rotate(current)?;
        }
        Ok(out)
    }

    /// Whether `v` has no incident edges.
    pub fn is_isolated(&self, v: VertexId) -> Result<bool> {
        let uv = self.vertex(v)?.use_vertex;
        let h = self.use_vertex(uv)?.half_edge;
        Ok(self.half_edge(h)?.is_point())
    }

    /// Number of edge ends at `v` (a self-loop would count twice).
    pub fn degree(&self, v: VertexId) -> Result<usize> {
        if self.is_isolated(v)? {
            return Ok(0);
        }
        Ok(self.corners(v)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{EdgeId, UseLoopId};
    use crate::record::{Edge, Vertex};

    /// A single edge v1-v2 floating in one chain cycle.
    fn stick() -> (IncidenceStore, VertexId, VertexId) {
        let mut store = IncidenceStore::new();
        let v1 = store.insert_vertex(Vertex {
            use_vertex: UseVertexId(1),
        });
        let v2 = store.insert_vertex(Vertex {
            use_vertex: UseVertexId(2),
        });
        let e = store.next_edge_id();
        let (h, uv1) = store.insert_half_edge_at(v1, UseLoopId(1), Some(e), true);
        let (o, uv2) = store.insert_half_edge_at(v2, UseLoopId(1), Some(e), false);
        store.insert_edge(Edge { half_edge: h });
        store.half_edge_mut(h).unwrap().opposite = o;
        store.half_edge_mut(o).unwrap().opposite = h;
        store.link(h, o).unwrap();
        store.link(o, h).unwrap();
        store.vertex_mut(v1).unwrap().use_vertex = uv1;
        store.vertex_mut(v2).unwrap().use_vertex = uv2;
        assert_eq!(e, EdgeId(1));
        (store, v1, v2)
    }

    #[test]
    fn test_dangling_end_rotates_onto_itself() {
        let (store, v1, v2) = stick();
        assert_eq!(store.corners(v1).unwrap().len(), 1);
        assert_eq!(store.degree(v1).unwrap(), 1);
        assert_eq!(store.degree(v2).unwrap(), 1);
        assert!(!store.is_isolated(v1).unwrap());
    }

    #[test]
    fn test_isolated_vertex_has_degree_zero() {
        let mut store = IncidenceStore::new();
        let v = store.insert_vertex(Vertex {
            use_vertex: UseVertexId(1),
        });
        store.insert_half_edge_at(v, UseLoopId(1), None, true);
        assert!(store.is_isolated(v).unwrap());
        assert_eq!(store.degree(v).unwrap(), 0);
        assert_eq!(store.corners(v).unwrap(), vec![UseVertexId(1)]);
    }
}
