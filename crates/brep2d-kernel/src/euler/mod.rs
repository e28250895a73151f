//! Euler operator engine.
//!
//! Each operator is a free function over a staged [`IncidenceStore`]; the
//! public methods on [`BRep2d`] run them through [`BRep2d::transact`], which
//! commits only on success.

mod connect;
mod remove_edge;

pub(crate) use connect::{connect, corner_pair};

use brep2d_topo::{
    Edge, EdgeId, HalfEdge, HalfEdgeId, IncidenceStore, LoopId, UseLoop, UseLoopId, UseLoopKind,
    UseVertex, UseVertexId, Vertex, VertexId,
};
use tracing::debug;

use crate::error::{BRepError, Result};
use crate::BRep2d;

/// Give `vertex` a fresh point half-edge in its own use-loop inside `region`.
pub(crate) fn make_point(
    s: &mut IncidenceStore,
    vertex: VertexId,
    region: Option<LoopId>,
) -> Result<UseLoopId> {
    let ul = s.insert_use_loop(UseLoop::detached(s.next_half_edge_id()));
    let (h, uv) = s.insert_half_edge_at(vertex, ul, None, true);
    s.use_loop_mut(ul)?.half_edge = h;
    s.vertex_mut(vertex)?.use_vertex = uv;
    s.attach(ul, region)?;
    Ok(ul)
}

/// If `vertex` is represented by a corner that is about to disappear, move
/// its representative to the corner of `replacement`.
pub(crate) fn repoint_vertex(
    s: &mut IncidenceStore,
    vertex: VertexId,
    gone: UseVertexId,
    replacement: HalfEdgeId,
) -> Result<()> {
    if s.vertex(vertex)?.use_vertex == gone {
        let uv = s.half_edge(replacement)?.use_vertex;
        s.vertex_mut(vertex)?.use_vertex = uv;
    }
    Ok(())
}

/// `(edge, traversed in canonical direction)` for each real half-edge.
pub(crate) fn directed_edges(
    s: &IncidenceStore,
    half_edges: &[HalfEdgeId],
) -> Result<Vec<(EdgeId, bool)>> {
    let mut out = Vec::with_capacity(half_edges.len());
    for &h in half_edges {
        let record = s.half_edge(h)?;
        if let Some(e) = record.edge {
            out.push((e, record.same_dir));
        }
    }
    Ok(out)
}

pub(crate) fn add_vertex_loop(s: &mut IncidenceStore, region: Option<LoopId>) -> Result<VertexId> {
    s.check_region(region)?;
    let v = s.insert_vertex(Vertex {
        use_vertex: s.next_use_vertex_id(),
    });
    make_point(s, v, region)?;
    Ok(v)
}

fn add_vertex_edge(s: &mut IncidenceStore, e: EdgeId) -> Result<VertexId> {
    let h = s.edge(e)?.half_edge;
    let o = s.half_edge(h)?.opposite;
    let h_ul = s.half_edge(h)?.use_loop;
    let o_record = *s.half_edge(o)?;

    let v = s.insert_vertex(Vertex {
        use_vertex: s.next_use_vertex_id(),
    });
    let e2 = s.next_edge_id();
    let (h2, h2_corner) = s.insert_half_edge_at(v, h_ul, Some(e2), true);
    s.insert_edge(Edge { half_edge: h2 });

    // The new far-side half-edge inherits `o`'s corner at the old target;
    // `o` itself now leaves from the new vertex.
    let o2 = s.next_half_edge_id();
    s.insert_half_edge(HalfEdge {
        use_vertex: o_record.use_vertex,
        next: o2,
        prev: o2,
        opposite: h2,
        use_loop: o_record.use_loop,
        edge: Some(e2),
        same_dir: false,
    });
    s.use_vertex_mut(o_record.use_vertex)?.half_edge = o2;
    let o_corner = s.insert_use_vertex(UseVertex {
        vertex: v,
        half_edge: o,
    });
    s.half_edge_mut(o)?.use_vertex = o_corner;
    s.half_edge_mut(h2)?.opposite = o2;

    s.insert_after(h, h2)?;
    s.insert_before(o, o2)?;
    s.vertex_mut(v)?.use_vertex = h2_corner;
    Ok(v)
}

fn merge_edges_at(s: &mut IncidenceStore, v: VertexId) -> Result<EdgeId> {
    if s.is_isolated(v)? {
        return Err(BRepError::NotMidVertex(v));
    }
    let corners = s.corners(v)?;
    let [ca, cb] = corners.as_slice() else {
        return Err(BRepError::NotMidVertex(v));
    };
    let ha = s.use_vertex(*ca)?.half_edge;
    let hb = s.use_vertex(*cb)?.half_edge;
    let (Some(ea), Some(eb)) = (s.half_edge(ha)?.edge, s.half_edge(hb)?.edge) else {
        return Err(BRepError::NotMidVertex(v));
    };
    if ea == eb {
        return Err(BRepError::NotMidVertex(v));
    }

    // Keep the edge whose canonical direction arrives at `v`; that is the
    // edge `add_vertex_edge` shortened.
    let a_arrives = s.edge(ea)?.half_edge != ha;
    let b_arrives = s.edge(eb)?.half_edge != hb;
    let a_kept = match (a_arrives, b_arrives) {
        (true, false) => true,
        (false, true) => false,
        _ => ea < eb,
    };
    let (k_out, r_out, kept, removed) = if a_kept {
        (ha, hb, ea, eb)
    } else {
        (hb, ha, eb, ea)
    };
    let k_in = s.half_edge(k_out)?.opposite;
    let r_in = s.half_edge(r_out)?.opposite;

    if s.half_edge(k_in)?.next != r_out || s.half_edge(r_in)?.next != k_out {
        return Err(BRepError::NotMidVertex(v));
    }

    for (gone, keep) in [(r_out, k_in), (r_in, k_out)] {
        let ul = s.half_edge(gone)?.use_loop;
        if s.use_loop(ul)?.half_edge == gone {
            s.use_loop_mut(ul)?.half_edge = keep;
        }
    }
    s.unlink(r_out)?;
    s.unlink(r_in)?;

    // `k_out` takes over the far corner of the removed edge.
    let far_corner = s.half_edge(r_in)?.use_vertex;
    let mid_corner = s.half_edge(k_out)?.use_vertex;
    s.half_edge_mut(k_out)?.use_vertex = far_corner;
    s.use_vertex_mut(far_corner)?.half_edge = k_out;
    s.remove_use_vertex(mid_corner)?;
    s.remove_half_edge_with_corner(r_out)?;
    s.remove_half_edge(r_in)?;
    s.remove_edge(removed)?;
    s.remove_vertex(v)?;
    Ok(kept)
}

fn remove_vertex(s: &mut IncidenceStore, v: VertexId) -> Result<()> {
    if !s.is_isolated(v)? {
        return Err(BRepError::VertexNotIsolated(v));
    }
    let uv = s.vertex(v)?.use_vertex;
    let h = s.use_vertex(uv)?.half_edge;
    let ul = s.half_edge(h)?.use_loop;
    s.detach(ul)?;
    s.remove_use_loop(ul)?;
    s.remove_half_edge_with_corner(h)?;
    s.remove_vertex(v)?;
    Ok(())
}

fn set_hole_loop(s: &mut IncidenceStore, l: LoopId) -> Result<Vec<UseLoopId>> {
    let use_loops = s.loop_use_loops(l)?;
    for &ul in &use_loops {
        let record = s.use_loop_mut(ul)?;
        record.loop_id = None;
        record.parent = None;
        record.child = None;
    }
    s.remove_loop(l)?;
    Ok(use_loops)
}

fn swap_use_loop(s: &mut IncidenceStore, ul: UseLoopId, to: Option<LoopId>) -> Result<()> {
    if s.is_root(ul)? {
        return Err(BRepError::RootUseLoop(ul));
    }
    s.check_region(to)?;
    s.detach(ul)?;
    s.attach(ul, to)?;
    Ok(())
}

fn promote_use_loop(s: &mut IncidenceStore, ul: UseLoopId) -> Result<LoopId> {
    if s.is_root(ul)? {
        return Err(BRepError::RootUseLoop(ul));
    }
    let Some(l) = s.use_loop(ul)?.loop_id else {
        return Err(BRepError::NotPromotable(ul));
    };
    if s.use_loop_kind(ul)? != UseLoopKind::Area {
        return Err(BRepError::NotPromotable(ul));
    }
    let old_root = s.face(l)?.use_loop;
    let mut chain = vec![old_root];
    chain.extend(s.children(old_root)?.into_iter().filter(|&c| c != ul));

    s.face_mut(l)?.use_loop = ul;
    let record = s.use_loop_mut(ul)?;
    record.parent = Some(ul);
    record.child = chain.first().copied();
    for (i, &child) in chain.iter().enumerate() {
        let record = s.use_loop_mut(child)?;
        record.parent = Some(ul);
        record.child = chain.get(i + 1).copied();
    }
    Ok(l)
}

impl BRep2d {
    /// Split edge `e` by inserting a new vertex.
    ///
    /// `e` keeps the half from its start to the new vertex; a new edge with
    /// the same orientation takes the rest. Both sides keep their use-loops
    /// and order.
    pub fn add_vertex_edge(&mut self, e: EdgeId) -> Result<VertexId> {
        let v = self.transact("add_vertex_edge", |s| add_vertex_edge(s, e))?;
        debug!(edge = %e, vertex = %v, "split edge");
        Ok(v)
    }

    /// Insert an isolated vertex into loop `region` (`None` for the void).
    pub fn add_vertex_loop(&mut self, region: Option<LoopId>) -> Result<VertexId> {
        let v = self.transact("add_vertex_loop", |s| add_vertex_loop(s, region))?;
        debug!(vertex = %v, region = ?region, "added isolated vertex");
        Ok(v)
    }

    /// Remove an isolated vertex.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        self.transact("remove_vertex", |s| remove_vertex(s, v))?;
        debug!(vertex = %v, "removed vertex");
        Ok(())
    }

    /// Remove a vertex joining exactly two distinct edges and fuse them.
    ///
    /// Inverse of [`add_vertex_edge`](Self::add_vertex_edge). Returns the
    /// surviving edge.
    pub fn merge_edges_at(&mut self, v: VertexId) -> Result<EdgeId> {
        let e = self.transact("merge_edges_at", |s| merge_edges_at(s, v))?;
        debug!(vertex = %v, edge = %e, "fused edges");
        Ok(e)
    }

    /// Turn face `l` into a hole: all of its use-loops join the void and the
    /// loop identity is released.
    pub fn set_hole_loop(&mut self, l: LoopId) -> Result<()> {
        let moved = self.transact("set_hole_loop", |s| set_hole_loop(s, l))?;
        debug!(loop_id = %l, use_loops = moved.len(), "loop turned into a hole");
        Ok(())
    }

    /// Make child use-loop `ul` the outer boundary of its loop; the previous
    /// outer boundary becomes the first child.
    ///
    /// Which of two area boundaries is outside is a geometric question. This
    /// lets the caller settle it after an edit chose the other one.
    pub fn promote_use_loop(&mut self, ul: UseLoopId) -> Result<()> {
        let l = self.transact("promote_use_loop", |s| promote_use_loop(s, ul))?;
        debug!(use_loop = %ul, loop_id = %l, "use-loop is now the outer boundary");
        Ok(())
    }

    /// Move a child or void use-loop under loop `to` (`None` for the void).
    pub fn swap_use_loop(&mut self, ul: UseLoopId, to: Option<LoopId>) -> Result<()> {
        self.transact("swap_use_loop", |s| swap_use_loop(s, ul, to))?;
        debug!(use_loop = %ul, to = ?to, "moved use-loop");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{square, square_with_island};

    #[test]
    fn test_add_vertex_loop_in_void_and_face() {
        let (mut brep, sq) = square();
        let p = brep.add_vertex_loop(Some(sq.loop_id)).unwrap();
        let q = brep.add_vertex_loop(None).unwrap();

        assert_eq!(brep.degree(p).unwrap(), 0);
        let itr = brep.vertex_cursor(p).unwrap();
        assert_eq!(itr.loop_id(), Some(sq.loop_id));
        assert!(!itr.is_parent());
        assert_eq!(brep.vertex_cursor(q).unwrap().loop_id(), None);

        let mut lc = brep.loop_cursor(sq.loop_id).unwrap();
        assert!(lc.shift_child_loop());
        assert_eq!(lc.use_loop_kind(), brep2d_topo::UseLoopKind::Point);
        assert!(!lc.shift_child_loop());
        assert!(lc.is_end_child());
        brep.validate().unwrap();
    }

    #[test]
    fn test_add_vertex_loop_unknown_loop_leaves_graph_untouched() {
        let (mut brep, _) = square();
        let before = brep.clone();
        let err = brep.add_vertex_loop(Some(LoopId(42))).unwrap_err();
        assert!(matches!(err, BRepError::Unknown(_)));
        assert_eq!(brep, before);
    }

    #[test]
    fn test_add_vertex_edge_splits_both_sides() {
        let (mut brep, sq) = square();
        let e = sq.edges[0];
        let (start, end) = brep.edge_vertices(e).unwrap();
        let v = brep.add_vertex_edge(e).unwrap();

        assert_eq!(brep.vertex_ids().len(), 5);
        assert_eq!(brep.edge_ids().len(), 5);
        assert_eq!(brep.edge_vertices(e).unwrap(), (start, v));
        assert_eq!(brep.degree(v).unwrap(), 2);

        let lc = brep.loop_cursor(sq.loop_id).unwrap();
        assert_eq!(lc.count_vertex_use_loop(), 5);
        let (left, right) = brep.edge_loops(e).unwrap();
        assert_eq!(left, Some(sq.loop_id));
        assert_eq!(right, None);

        let new_edge = brep
            .edge_ids()
            .into_iter()
            .find(|x| !sq.edges.contains(x))
            .unwrap();
        assert_eq!(brep.edge_vertices(new_edge).unwrap(), (v, end));
        assert_eq!(brep.edge_loops(new_edge).unwrap(), (Some(sq.loop_id), None));
    }

    #[test]
    fn test_add_vertex_edge_then_merge_restores_graph() {
        let (mut brep, sq) = square();
        let before = brep.clone();
        let v = brep.add_vertex_edge(sq.edges[2]).unwrap();
        let kept = brep.merge_edges_at(v).unwrap();
        assert_eq!(kept, sq.edges[2]);
        assert_eq!(brep, before);
    }

    #[test]
    fn test_add_vertex_edge_on_dangling_edge() {
        let mut brep = BRep2d::new();
        let a = brep.add_vertex_loop(None).unwrap();
        let b = brep.add_vertex_loop(None).unwrap();
        let (ca, cb) = brep.corner_pair(a, b, None).unwrap().unwrap();
        let e = brep.connect_vertex(ca, cb, true).unwrap();
        let before = brep.clone();

        let v = brep.add_vertex_edge(e).unwrap();
        let lc = brep.loop_cursor_side_edge(e, true).unwrap();
        assert_eq!(lc.use_loop_kind(), brep2d_topo::UseLoopKind::Chain);
        assert_eq!(lc.count_vertex_use_loop(), 4);

        brep.merge_edges_at(v).unwrap();
        assert_eq!(brep, before);
    }

    #[test]
    fn test_merge_edges_rejects_branch_vertex() {
        let (mut brep, sq) = square();
        let (ca, cb) = brep
            .corner_pair(sq.vertices[0], sq.vertices[2], Some(sq.loop_id))
            .unwrap()
            .unwrap();
        brep.connect_vertex(ca, cb, true).unwrap();
        let before = brep.clone();
        let err = brep.merge_edges_at(sq.vertices[0]).unwrap_err();
        assert!(matches!(err, BRepError::NotMidVertex(_)));
        assert_eq!(brep, before);
    }

    #[test]
    fn test_merge_edges_closes_digon_into_self_loop() {
        let mut brep = BRep2d::new();
        let tri = brep.add_polygon(3, None).unwrap();
        // Fuse one corner: the triangle becomes a digon.
        brep.merge_edges_at(tri.vertices[0]).unwrap();
        let e = brep.merge_edges_at(tri.vertices[1]).unwrap();

        let w = tri.vertices[2];
        assert_eq!(brep.vertex_ids(), vec![w]);
        assert_eq!(brep.edge_ids(), vec![e]);
        assert_eq!(brep.edge_vertices(e).unwrap(), (w, w));
        assert_eq!(brep.edge_loops(e).unwrap(), (Some(tri.loop_id), None));
        assert_eq!(brep.degree(w).unwrap(), 2);
        brep.validate().unwrap();
    }

    #[test]
    fn test_remove_vertex_requires_isolation() {
        let (mut brep, sq) = square();
        let err = brep.remove_vertex(sq.vertices[1]).unwrap_err();
        assert!(matches!(err, BRepError::VertexNotIsolated(_)));

        let before = brep.clone();
        let p = brep.add_vertex_loop(Some(sq.loop_id)).unwrap();
        brep.remove_vertex(p).unwrap();
        assert_eq!(brep, before);
    }

    #[test]
    fn test_set_hole_loop_releases_island_face() {
        let (mut brep, sq, tri) = square_with_island();
        brep.set_hole_loop(tri.loop_id).unwrap();

        assert!(!brep.contains_loop(tri.loop_id));
        assert_eq!(brep.loop_ids(), vec![sq.loop_id]);
        for &e in &tri.edges {
            assert_eq!(brep.edge_loops(e).unwrap(), (None, Some(sq.loop_id)));
        }
        // The square still owns the hole boundary as a child.
        let mut lc = brep.loop_cursor(sq.loop_id).unwrap();
        assert!(lc.shift_child_loop());
        assert_eq!(lc.use_loop_kind(), brep2d_topo::UseLoopKind::Area);
        assert_eq!(lc.count_vertex_use_loop(), 3);
        brep.validate().unwrap();
    }

    #[test]
    fn test_set_hole_loop_unknown() {
        let (mut brep, _) = square();
        assert!(matches!(
            brep.set_hole_loop(LoopId(9)),
            Err(BRepError::Unknown(_))
        ));
    }

    #[test]
    fn test_swap_use_loop_moves_child() {
        let (mut brep, sq, tri) = square_with_island();
        let p = brep.add_vertex_loop(Some(sq.loop_id)).unwrap();
        let ul = brep.vertex_cursor(p).unwrap().use_loop();

        brep.swap_use_loop(ul, Some(tri.loop_id)).unwrap();
        assert_eq!(brep.vertex_cursor(p).unwrap().loop_id(), Some(tri.loop_id));

        brep.swap_use_loop(ul, None).unwrap();
        assert_eq!(brep.vertex_cursor(p).unwrap().loop_id(), None);
        brep.validate().unwrap();
    }

    #[test]
    fn test_swap_use_loop_refuses_root() {
        let (mut brep, sq, tri) = square_with_island();
        let root = brep.loop_cursor(tri.loop_id).unwrap().use_loop();
        let err = brep.swap_use_loop(root, Some(sq.loop_id)).unwrap_err();
        assert!(matches!(err, BRepError::RootUseLoop(_)));
    }

    #[test]
    fn test_promote_use_loop_swaps_outer_boundary() {
        let (mut brep, sq, tri) = square_with_island();
        brep.set_hole_loop(tri.loop_id).unwrap();
        let before = brep.clone();
        let outer = brep.loop_cursor(sq.loop_id).unwrap().use_loop();
        let hole = brep.loop_cursor_side_edge(tri.edges[0], false).unwrap().use_loop();

        brep.promote_use_loop(hole).unwrap();
        let mut lc = brep.loop_cursor(sq.loop_id).unwrap();
        assert_eq!(lc.use_loop(), hole);
        assert!(lc.is_parent());
        assert_eq!(lc.count_vertex_use_loop(), 3);
        assert!(lc.shift_child_loop());
        assert_eq!(lc.use_loop(), outer);
        assert!(!lc.is_parent());
        brep.validate().unwrap();

        brep.promote_use_loop(outer).unwrap();
        assert_eq!(brep, before);
    }

    #[test]
    fn test_promote_use_loop_keeps_other_children() {
        let (mut brep, sq, tri) = square_with_island();
        brep.set_hole_loop(tri.loop_id).unwrap();
        let p = brep.add_vertex_loop(Some(sq.loop_id)).unwrap();
        let point = brep.vertex_cursor(p).unwrap().use_loop();
        let outer = brep.loop_cursor(sq.loop_id).unwrap().use_loop();
        let hole = brep.loop_cursor_side_edge(tri.edges[0], false).unwrap().use_loop();

        brep.promote_use_loop(hole).unwrap();
        assert_eq!(
            brep.store().loop_use_loops(sq.loop_id).unwrap(),
            vec![hole, outer, point]
        );
        brep.validate().unwrap();
    }

    #[test]
    fn test_promote_use_loop_refusals() {
        let (mut brep, sq, tri) = square_with_island();
        let p = brep.add_vertex_loop(Some(sq.loop_id)).unwrap();
        let q = brep.add_vertex_loop(None).unwrap();
        let before = brep.clone();

        let root = brep.loop_cursor(tri.loop_id).unwrap().use_loop();
        assert!(matches!(
            brep.promote_use_loop(root),
            Err(BRepError::RootUseLoop(_))
        ));
        let point = brep.vertex_cursor(p).unwrap().use_loop();
        assert!(matches!(
            brep.promote_use_loop(point),
            Err(BRepError::NotPromotable(_))
        ));
        let void = brep.vertex_cursor(q).unwrap().use_loop();
        assert!(matches!(
            brep.promote_use_loop(void),
            Err(BRepError::NotPromotable(_))
        ));
        assert_eq!(brep, before);
    }
}
