//! Connecting two corners with a new edge.

use brep2d_topo::{
    Edge, EdgeId, HalfEdge, HalfEdgeId, IncidenceStore, Loop, LoopId, UseLoop, UseLoopId,
    UseVertexId, VertexId,
};
use tracing::debug;

use super::directed_edges;
use crate::error::{BRepError, Result};
use crate::BRep2d;

/// The two corners being joined, resolved and checked.
struct Ends {
    ha: HalfEdgeId,
    hb: HalfEdgeId,
    va: VertexId,
    vb: VertexId,
    ula: UseLoopId,
    ulb: UseLoopId,
}

fn resolve(s: &IncidenceStore, uv_a: UseVertexId, uv_b: UseVertexId) -> Result<Ends> {
    let corner_a = *s.use_vertex(uv_a)?;
    let corner_b = *s.use_vertex(uv_b)?;
    let ula = s.half_edge(corner_a.half_edge)?.use_loop;
    let ulb = s.half_edge(corner_b.half_edge)?.use_loop;
    let first = s.use_loop(ula)?.loop_id;
    let second = s.use_loop(ulb)?.loop_id;
    if first != second {
        return Err(BRepError::LoopMismatch { first, second });
    }
    Ok(Ends {
        ha: corner_a.half_edge,
        hb: corner_b.half_edge,
        va: corner_a.vertex,
        vb: corner_b.vertex,
        ula,
        ulb,
    })
}

/// Create one side of the new edge at `vertex`.
///
/// A point half-edge is consumed: the new side takes over its corner.
fn new_side(
    s: &mut IncidenceStore,
    corner_he: HalfEdgeId,
    is_point: bool,
    vertex: VertexId,
    ul: UseLoopId,
    e: EdgeId,
    same_dir: bool,
) -> Result<HalfEdgeId> {
    if !is_point {
        return Ok(s.insert_half_edge_at(vertex, ul, Some(e), same_dir).0);
    }
    let uv = s.remove_half_edge(corner_he)?.use_vertex;
    let id = s.next_half_edge_id();
    let mut record = HalfEdge::point(id, uv, ul);
    record.edge = Some(e);
    record.same_dir = same_dir;
    s.insert_half_edge(record);
    s.use_vertex_mut(uv)?.half_edge = id;
    Ok(id)
}

/// Give the cycle through `fresh` a new loop and let `ul` keep the cycle
/// through `kept`.
fn close_split(
    s: &mut IncidenceStore,
    fresh: HalfEdgeId,
    kept: HalfEdgeId,
    ul: UseLoopId,
) -> Result<LoopId> {
    let l = s.next_loop_id();
    let root = s.insert_use_loop(UseLoop::detached(fresh));
    s.insert_loop(Loop { use_loop: root });
    let record = s.use_loop_mut(root)?;
    record.loop_id = Some(l);
    record.parent = Some(root);
    s.assign_cycle(fresh, root)?;
    s.adopt_cycle(kept, ul)?;
    Ok(l)
}

/// Join corners `uv_a` and `uv_b`. Returns the new edge and, for a split,
/// the newly created loop.
///
/// Giving the same corner twice closes a self-loop inside that corner's
/// sector: the canonical half-edge bounds the inside on its own, the other
/// half joins the surrounding cycle.
pub(crate) fn connect(
    s: &mut IncidenceStore,
    uv_a: UseVertexId,
    uv_b: UseVertexId,
    add_left: bool,
) -> Result<(EdgeId, Option<LoopId>)> {
    let Ends {
        ha,
        hb,
        va,
        vb,
        ula,
        ulb,
    } = resolve(s, uv_a, uv_b)?;
    let a_point = s.half_edge(ha)?.is_point();
    let b_point = s.half_edge(hb)?.is_point();
    let pa = s.half_edge(ha)?.prev;
    let pb = s.half_edge(hb)?.prev;
    let e = s.next_edge_id();

    if ha == hb {
        let a = new_side(s, ha, a_point, va, ula, e, true)?;
        let b = s.insert_half_edge_at(va, ula, Some(e), false).0;
        s.half_edge_mut(a)?.opposite = b;
        s.half_edge_mut(b)?.opposite = a;
        s.insert_edge(Edge { half_edge: a });
        if !a_point {
            s.link(pa, b)?;
            s.link(b, ha)?;
        }
        let (fresh, kept) = if add_left { (a, b) } else { (b, a) };
        let l = close_split(s, fresh, kept, ula)?;
        return Ok((e, Some(l)));
    }

    let a = new_side(s, ha, a_point, va, ula, e, true)?;
    let b = new_side(s, hb, b_point, vb, ulb, e, false)?;
    s.half_edge_mut(a)?.opposite = b;
    s.half_edge_mut(b)?.opposite = a;
    s.insert_edge(Edge { half_edge: a });

    if ula == ulb {
        s.link(pa, a)?;
        s.link(a, hb)?;
        s.link(pb, b)?;
        s.link(b, ha)?;
        let (fresh, kept) = if add_left { (a, b) } else { (b, a) };
        let l = close_split(s, fresh, kept, ula)?;
        return Ok((e, Some(l)));
    }

    match (a_point, b_point) {
        (true, true) => {
            s.link(a, b)?;
            s.link(b, a)?;
        }
        (true, false) => {
            s.link(pb, b)?;
            s.link(b, a)?;
            s.link(a, hb)?;
        }
        (false, true) => {
            s.link(pa, a)?;
            s.link(a, b)?;
            s.link(b, ha)?;
        }
        (false, false) => {
            s.link(pa, a)?;
            s.link(a, hb)?;
            s.link(pb, b)?;
            s.link(b, ha)?;
        }
    }
    let (survivor, dropped) = if s.is_root(ulb)? {
        (ulb, ula)
    } else {
        (ula, ulb)
    };
    s.detach(dropped)?;
    s.remove_use_loop(dropped)?;
    s.adopt_cycle(a, survivor)?;
    Ok((e, None))
}

/// Directed edges of the cycle that would lie left of the new edge.
pub(crate) fn preview_connect(
    s: &IncidenceStore,
    uv_a: UseVertexId,
    uv_b: UseVertexId,
) -> Result<Vec<(EdgeId, bool)>> {
    let ends = resolve(s, uv_a, uv_b)?;
    if ends.ula != ends.ulb {
        return Ok(Vec::new());
    }
    let left: Vec<HalfEdgeId> = s
        .cycle(ends.hb)?
        .into_iter()
        .take_while(|&h| h != ends.ha)
        .collect();
    directed_edges(s, &left)
}

/// Corners of `va` and `vb` facing `region`, preferring a pair on one
/// use-loop.
pub(crate) fn corner_pair(
    s: &IncidenceStore,
    va: VertexId,
    vb: VertexId,
    region: Option<LoopId>,
) -> Result<Option<(UseVertexId, UseVertexId)>> {
    let facing = |v: VertexId| -> Result<Vec<(UseVertexId, UseLoopId)>> {
        let mut out = Vec::new();
        for uv in s.corners(v)? {
            let ul = s.half_edge(s.use_vertex(uv)?.half_edge)?.use_loop;
            if s.use_loop(ul)?.loop_id == region {
                out.push((uv, ul));
            }
        }
        Ok(out)
    };
    let a = facing(va)?;
    let b = facing(vb)?;
    for &(uv_a, ul_a) in &a {
        if let Some(&(uv_b, _)) = b.iter().find(|(_, ul_b)| *ul_b == ul_a) {
            return Ok(Some((uv_a, uv_b)));
        }
    }
    Ok(a.first().zip(b.first()).map(|(x, y)| (x.0, y.0)))
}

impl BRep2d {
    /// Join two corners with a new edge running `vertex(uv_a) -> vertex(uv_b)`.
    ///
    /// Corners on one use-loop split it: with `add_left` the cycle on the
    /// left of the new edge becomes a new loop, otherwise the cycle on its
    /// right does. Corners on different use-loops of the same region merge
    /// them into one cycle. Passing one corner twice closes a self-loop in
    /// its sector, with the inside on the left.
    pub fn connect_vertex(
        &mut self,
        uv_a: UseVertexId,
        uv_b: UseVertexId,
        add_left: bool,
    ) -> Result<EdgeId> {
        let (e, new_loop) =
            self.transact("connect_vertex", |s| connect(s, uv_a, uv_b, add_left))?;
        debug!(edge = %e, from = %uv_a, to = %uv_b, new_loop = ?new_loop, "connected corners");
        Ok(e)
    }

    /// Directed edges bounding the region a split by
    /// [`connect_vertex`](Self::connect_vertex) would put on the left of the
    /// new edge, excluding the new edge itself. Empty when the call would
    /// merge two cycles instead, or close a self-loop.
    pub fn preview_connect_vertex(
        &self,
        uv_a: UseVertexId,
        uv_b: UseVertexId,
    ) -> Result<Vec<(EdgeId, bool)>> {
        preview_connect(&self.store, uv_a, uv_b)
    }

    /// Find corners of `va` and `vb` that both face `region`, for use with
    /// [`connect_vertex`](Self::connect_vertex).
    pub fn corner_pair(
        &self,
        va: VertexId,
        vb: VertexId,
        region: Option<LoopId>,
    ) -> Result<Option<(UseVertexId, UseVertexId)>> {
        corner_pair(&self.store, va, vb, region)
    }
}
