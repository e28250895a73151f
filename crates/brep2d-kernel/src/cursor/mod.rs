//! Read-only traversal cursors.
//!
//! Cursors borrow the graph, so any mutating call ends their lifetime.

mod loop_cursor;
mod vertex_cursor;

pub use loop_cursor::LoopCursor;
pub use vertex_cursor::VertexCursor;

use brep2d_topo::{EdgeId, LoopId, UseLoopId, VertexId};

use crate::error::Result;
use crate::BRep2d;

impl BRep2d {
    /// Cursor over the outer boundary of loop `l`; use
    /// [`LoopCursor::shift_child_loop`] to reach its holes and islands.
    pub fn loop_cursor(&self, l: LoopId) -> Result<LoopCursor<'_>> {
        let root = self.store.face(l)?.use_loop;
        Ok(LoopCursor::new(&self.store, root, None))
    }

    /// Cursor over the cycle on one side of edge `e`, starting at that side:
    /// the left side (canonical direction) when `is_left`, else the right.
    pub fn loop_cursor_side_edge(&self, e: EdgeId, is_left: bool) -> Result<LoopCursor<'_>> {
        let h = self.store.edge(e)?.half_edge;
        let side = if is_left {
            h
        } else {
            self.store.half_edge(h)?.opposite
        };
        let ul = self.store.half_edge(side)?.use_loop;
        Ok(LoopCursor::new(&self.store, ul, Some(side)))
    }

    /// Cursor over use-loop `ul`.
    pub fn use_loop_cursor(&self, ul: UseLoopId) -> Result<LoopCursor<'_>> {
        self.store.use_loop(ul)?;
        Ok(LoopCursor::new(&self.store, ul, None))
    }

    /// Cursor rotating around vertex `v`, starting at its representative corner.
    pub fn vertex_cursor(&self, v: VertexId) -> Result<VertexCursor<'_>> {
        let uv = self.store.vertex(v)?.use_vertex;
        let start = self.store.use_vertex(uv)?.half_edge;
        Ok(VertexCursor::new(&self.store, v, start))
    }
}
