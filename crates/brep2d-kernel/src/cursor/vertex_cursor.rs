//! Vertex-rotation cursor.

use brep2d_topo::{
    EdgeId, HalfEdge, HalfEdgeId, IncidenceStore, LoopId, UseLoopId, UseVertexId, VertexId,
};

/// Cursor over the corners of one vertex, counter-clockwise.
///
/// At each corner the cursor sits in the angular sector between the edge
/// leaving the vertex ([`edge_ahead`](Self::edge_ahead)) and the edge
/// arriving at it ([`edge_behind`](Self::edge_behind)). The order is purely
/// topological: the next corner is the opposite of the arriving half-edge.
#[derive(Debug, Clone)]
pub struct VertexCursor<'a> {
    store: &'a IncidenceStore,
    vertex: VertexId,
    start: HalfEdgeId,
    current: HalfEdgeId,
    end: bool,
}

impl<'a> VertexCursor<'a> {
    pub(crate) fn new(store: &'a IncidenceStore, vertex: VertexId, start: HalfEdgeId) -> Self {
        Self {
            store,
            vertex,
            start,
            current: start,
            end: false,
        }
    }

    fn record(&self) -> &'a HalfEdge {
        &self.store.half_edges[&self.current]
    }

    /// Step to the next corner.
    pub fn advance(&mut self) {
        if self.end {
            return;
        }
        let record = self.record();
        if record.is_point() {
            self.end = true;
            return;
        }
        self.current = self.store.half_edges[&record.prev].opposite;
        if self.current == self.start {
            self.end = true;
        }
    }

    /// Whether a full rotation has been completed.
    pub fn is_end(&self) -> bool {
        self.end
    }

    /// The vertex being rotated around.
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Current corner.
    pub fn use_vertex(&self) -> UseVertexId {
        self.record().use_vertex
    }

    /// Half-edge leaving the vertex at the current corner.
    pub fn half_edge(&self) -> HalfEdgeId {
        self.current
    }

    /// Edge leaving the current corner and whether its canonical direction
    /// starts at this vertex. `None` for an isolated vertex.
    pub fn edge_ahead(&self) -> Option<(EdgeId, bool)> {
        let record = self.record();
        record.edge.map(|e| (e, record.same_dir))
    }

    /// Edge arriving at the current corner and whether its canonical
    /// direction starts at this vertex. `None` for an isolated vertex.
    pub fn edge_behind(&self) -> Option<(EdgeId, bool)> {
        let prev = &self.store.half_edges[&self.record().prev];
        prev.edge.map(|e| (e, !prev.same_dir))
    }

    /// Use-loop owning the current sector.
    pub fn use_loop(&self) -> UseLoopId {
        self.record().use_loop
    }

    /// Loop owning the current sector; `None` in the void.
    pub fn loop_id(&self) -> Option<LoopId> {
        self.store.use_loops[&self.use_loop()].loop_id
    }

    /// Number of edge ends at the vertex.
    pub fn count_edge(&self) -> usize {
        if self.store.half_edges[&self.start].is_point() {
            return 0;
        }
        let mut count = 1;
        let mut h = self.store.half_edges[&self.store.half_edges[&self.start].prev].opposite;
        while h != self.start {
            count += 1;
            h = self.store.half_edges[&self.store.half_edges[&h].prev].opposite;
        }
        count
    }

    /// Whether the current sector's use-loop is the outer boundary of its loop.
    pub fn is_parent(&self) -> bool {
        let ul = self.use_loop();
        self.store.use_loops[&ul].parent == Some(ul)
    }

    /// Whether both cursors sit in sectors of the same use-loop.
    pub fn is_same_use_loop(&self, other: &VertexCursor<'_>) -> bool {
        self.use_loop() == other.use_loop()
    }
}
