//! Face-loop cursor: walks one boundary cycle, then hops across the
//! use-loops of the same loop.

use brep2d_topo::{
    EdgeId, HalfEdge, HalfEdgeId, IncidenceStore, LoopId, UseLoopId, UseLoopKind, VertexId,
};

/// Cursor over the half-edges of a use-loop.
///
/// Reads the graph it was created from and never changes it. The cycle is
/// finished (`is_end`) once the walk is back at its starting half-edge; a
/// point use-loop finishes after one step.
#[derive(Debug, Clone)]
pub struct LoopCursor<'a> {
    store: &'a IncidenceStore,
    use_loop: UseLoopId,
    start: HalfEdgeId,
    current: HalfEdgeId,
    end: bool,
    end_child: bool,
}

impl<'a> LoopCursor<'a> {
    pub(crate) fn new(
        store: &'a IncidenceStore,
        use_loop: UseLoopId,
        start: Option<HalfEdgeId>,
    ) -> Self {
        let start = start.unwrap_or(store.use_loops[&use_loop].half_edge);
        Self {
            store,
            use_loop,
            start,
            current: start,
            end: false,
            end_child: false,
        }
    }

    fn record(&self) -> &'a HalfEdge {
        &self.store.half_edges[&self.current]
    }

    /// Restart at the first half-edge of the current use-loop.
    pub fn begin(&mut self) {
        self.start = self.store.use_loops[&self.use_loop].half_edge;
        self.current = self.start;
        self.end = false;
    }

    /// Whether the whole cycle has been visited.
    pub fn is_end(&self) -> bool {
        self.end
    }

    /// Step to the successor half-edge.
    pub fn advance(&mut self) {
        if self.end {
            return;
        }
        self.current = self.record().next;
        if self.current == self.start {
            self.end = true;
        }
    }

    /// Current edge and whether it is traversed in its canonical direction.
    /// `None` on a point use-loop.
    pub fn edge(&self) -> Option<(EdgeId, bool)> {
        let record = self.record();
        record.edge.map(|e| (e, record.same_dir))
    }

    /// Move to the next child use-loop of the same loop.
    ///
    /// From the root this is the first child. Returns `false`, and sets
    /// [`is_end_child`](Self::is_end_child), when there is none.
    pub fn shift_child_loop(&mut self) -> bool {
        match self.store.use_loops[&self.use_loop].child {
            Some(next) => {
                self.use_loop = next;
                self.begin();
                true
            }
            None => {
                self.end_child = true;
                false
            }
        }
    }

    /// Whether [`shift_child_loop`](Self::shift_child_loop) ran out of children.
    pub fn is_end_child(&self) -> bool {
        self.end_child
    }

    /// Vertex at the origin of the current half-edge.
    pub fn vertex(&self) -> VertexId {
        self.store.use_vertices[&self.record().use_vertex].vertex
    }

    /// Vertex the current half-edge leads to.
    pub fn vertex_ahead(&self) -> VertexId {
        let next = &self.store.half_edges[&self.record().next];
        self.store.use_vertices[&next.use_vertex].vertex
    }

    /// Vertex the previous half-edge started from.
    pub fn vertex_behind(&self) -> VertexId {
        let prev = &self.store.half_edges[&self.record().prev];
        self.store.use_vertices[&prev.use_vertex].vertex
    }

    /// The current half-edge.
    pub fn half_edge(&self) -> HalfEdgeId {
        self.current
    }

    /// The use-loop being walked.
    pub fn use_loop(&self) -> UseLoopId {
        self.use_loop
    }

    /// Loop owning the current use-loop; `None` in the void.
    pub fn loop_id(&self) -> Option<LoopId> {
        self.store.use_loops[&self.use_loop].loop_id
    }

    /// Point, chain or area boundary.
    pub fn use_loop_kind(&self) -> UseLoopKind {
        let record = self.record();
        if record.is_point() {
            return UseLoopKind::Point;
        }
        let mut h = self.current;
        loop {
            let opposite = self.store.half_edges[&h].opposite;
            if self.store.half_edges[&opposite].use_loop != self.use_loop {
                return UseLoopKind::Area;
            }
            h = self.store.half_edges[&h].next;
            if h == self.current {
                return UseLoopKind::Chain;
            }
        }
    }

    /// Number of corners on the current cycle (1 for a point).
    pub fn count_vertex_use_loop(&self) -> usize {
        let mut count = 1;
        let mut h = self.record().next;
        while h != self.current {
            count += 1;
            h = self.store.half_edges[&h].next;
        }
        count
    }

    /// Whether the current use-loop is the outer boundary of its loop.
    pub fn is_parent(&self) -> bool {
        self.store.use_loops[&self.use_loop].parent == Some(self.use_loop)
    }

    /// Whether both cursors walk the same use-loop.
    pub fn is_same_use_loop(&self, other: &LoopCursor<'_>) -> bool {
        self.use_loop == other.use_loop
    }

    /// Whether the current edge has this use-loop on both sides.
    pub fn is_edge_both_side_same_loop(&self) -> bool {
        let record = self.record();
        !record.is_point() && self.store.half_edges[&record.opposite].use_loop == self.use_loop
    }

    /// Directed edges of the current use-loop, from its first half-edge.
    pub fn edges(&self) -> Vec<(EdgeId, bool)> {
        let first = self.store.use_loops[&self.use_loop].half_edge;
        let mut out = Vec::new();
        let mut h = first;
        loop {
            let record = &self.store.half_edges[&h];
            if let Some(e) = record.edge {
                out.push((e, record.same_dir));
            }
            h = record.next;
            if h == first {
                return out;
            }
        }
    }
}
