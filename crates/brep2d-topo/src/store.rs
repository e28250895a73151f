//! Flat incidence tables.
//!
//! All relations are keys into ordered maps (arena + index), which keeps the
//! cyclic graph free of reference cycles and gives `free_key` an ordered view
//! of each key space.

use std::collections::BTreeMap;

use crate::id::{free_key, EdgeId, HalfEdgeId, LoopId, UseLoopId, UseVertexId, VertexId};
use crate::record::{Edge, HalfEdge, Loop, UseLoop, UseVertex, Vertex};
use crate::{Result, TopoError};

/// Storage for every record of one planar B-rep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidenceStore {
    /// Vertices by key.
    pub vertices: BTreeMap<VertexId, Vertex>,
    /// Edges by key.
    pub edges: BTreeMap<EdgeId, Edge>,
    /// Loops by key.
    pub loops: BTreeMap<LoopId, Loop>,
    /// Use-loops by key.
    pub use_loops: BTreeMap<UseLoopId, UseLoop>,
    /// Half-edges by key.
    pub half_edges: BTreeMap<HalfEdgeId, HalfEdge>,
    /// Use-vertices by key.
    pub use_vertices: BTreeMap<UseVertexId, UseVertex>,
}

macro_rules! table_access {
    (
        $table:ident, $id:ty, $record:ty, $unknown:ident,
        $get:ident, $get_mut:ident, $insert:ident, $remove:ident, $next:ident
    ) => {
        #[doc = concat!("Look up a record in `", stringify!($table), "`.")]
        pub fn $get(&self, id: $id) -> Result<&$record> {
            self.$table.get(&id).ok_or(TopoError::$unknown(id))
        }

        #[doc = concat!("Mutable lookup in `", stringify!($table), "`.")]
        pub fn $get_mut(&mut self, id: $id) -> Result<&mut $record> {
            self.$table.get_mut(&id).ok_or(TopoError::$unknown(id))
        }

        #[doc = concat!("Insert into `", stringify!($table), "` under the smallest free key.")]
        pub fn $insert(&mut self, record: $record) -> $id {
            let id = free_key(&self.$table);
            self.$table.insert(id, record);
            id
        }

        #[doc = concat!("Delete a record from `", stringify!($table), "`.")]
        pub fn $remove(&mut self, id: $id) -> Result<$record> {
            self.$table.remove(&id).ok_or(TopoError::$unknown(id))
        }

        #[doc = concat!("The key the next insert into `", stringify!($table), "` will use.")]
        pub fn $next(&self) -> $id {
            free_key(&self.$table)
        }
    };
}

impl IncidenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the store holds no vertices (and therefore nothing at all).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    table_access!(
        vertices,
        VertexId,
        Vertex,
        UnknownVertex,
        vertex,
        vertex_mut,
        insert_vertex,
        remove_vertex,
        next_vertex_id
    );
    table_access!(
        edges,
        EdgeId,
        Edge,
        UnknownEdge,
        edge,
        edge_mut,
        insert_edge,
        remove_edge,
        next_edge_id
    );
    table_access!(
        loops,
        LoopId,
        Loop,
        UnknownLoop,
        face,
        face_mut,
        insert_loop,
        remove_loop,
        next_loop_id
    );
    table_access!(
        use_loops,
        UseLoopId,
        UseLoop,
        UnknownUseLoop,
        use_loop,
        use_loop_mut,
        insert_use_loop,
        remove_use_loop,
        next_use_loop_id
    );
    table_access!(
        half_edges,
        HalfEdgeId,
        HalfEdge,
        UnknownHalfEdge,
        half_edge,
        half_edge_mut,
        insert_half_edge,
        remove_half_edge,
        next_half_edge_id
    );
    table_access!(
        use_vertices,
        UseVertexId,
        UseVertex,
        UnknownUseVertex,
        use_vertex,
        use_vertex_mut,
        insert_use_vertex,
        remove_use_vertex,
        next_use_vertex_id
    );

    /// Ensure an optional loop key refers to a stored loop (`None` is the void).
    pub fn check_region(&self, loop_id: Option<LoopId>) -> Result<()> {
        match loop_id {
            Some(l) => self.face(l).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Create a half-edge together with its corner at `vertex`.
    ///
    /// The half-edge starts self-linked; callers splice it into a cycle.
    pub fn insert_half_edge_at(
        &mut self,
        vertex: VertexId,
        use_loop: UseLoopId,
        edge: Option<EdgeId>,
        same_dir: bool,
    ) -> (HalfEdgeId, UseVertexId) {
        let id = self.next_half_edge_id();
        let use_vertex = self.insert_use_vertex(UseVertex {
            vertex,
            half_edge: id,
        });
        let mut record = HalfEdge::point(id, use_vertex, use_loop);
        record.edge = edge;
        record.same_dir = same_dir;
        self.insert_half_edge(record);
        (id, use_vertex)
    }

    /// Remove a half-edge and the corner at its origin.
    pub fn remove_half_edge_with_corner(&mut self, id: HalfEdgeId) -> Result<HalfEdge> {
        let record = self.remove_half_edge(id)?;
        self.remove_use_vertex(record.use_vertex)?;
        Ok(record)
    }
}
