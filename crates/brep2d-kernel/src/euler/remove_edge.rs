//! Removing an edge: merging two cycles or splitting one.

use brep2d_topo::{
    EdgeId, HalfEdgeId, IncidenceStore, LoopId, UseLoop, UseLoopId, UseLoopKind, VertexId,
};
use tracing::debug;

use super::{directed_edges, make_point, repoint_vertex};
use crate::error::{BRepError, Result};
use crate::BRep2d;

/// What removing an edge will do, decided before anything is touched.
enum Plan {
    /// The sides lie on different use-loops, which are spliced together.
    Merge {
        h: HalfEdgeId,
        o: HalfEdgeId,
        survivor: UseLoopId,
        dropped: UseLoopId,
        /// Loop whose outer boundary disappears.
        killed: Option<LoopId>,
        /// Set when `e` is a self-loop and the only edge at its vertex.
        isolated: Option<VertexId>,
    },
    /// Both sides lie on one use-loop, which falls apart into `kept`
    /// (keeps the use-loop) and `split` (becomes a new one). Either may be
    /// empty.
    Bridge {
        h: HalfEdgeId,
        o: HalfEdgeId,
        ul: UseLoopId,
        kept: Vec<HalfEdgeId>,
        split: Vec<HalfEdgeId>,
        /// The half-edges after `h` up to `o` are not empty.
        rejoin_target: bool,
        /// The half-edges after `o` back to `h` are not empty.
        rejoin_origin: bool,
        isolated: Vec<VertexId>,
    },
}

fn plan(s: &IncidenceStore, e: EdgeId) -> Result<Plan> {
    let h = s.edge(e)?.half_edge;
    let o = s.half_edge(h)?.opposite;
    let ul_h = s.half_edge(h)?.use_loop;
    let ul_o = s.half_edge(o)?.use_loop;
    let va = s.origin(h)?;
    let vb = s.origin(o)?;

    if ul_h != ul_o {
        let l_h = s.use_loop(ul_h)?.loop_id;
        let l_o = s.use_loop(ul_o)?.loop_id;
        let (survivor, dropped, killed) = match (s.is_root(ul_h)?, s.is_root(ul_o)?) {
            (true, true) if l_h <= l_o => (ul_h, ul_o, l_o),
            (true, true) => (ul_o, ul_h, l_h),
            (true, false) => (ul_o, ul_h, l_h),
            (false, true) => (ul_h, ul_o, l_o),
            (false, false) if l_h == l_o || l_o.is_none() => (ul_h, ul_o, None),
            (false, false) if l_h.is_none() => (ul_o, ul_h, None),
            (false, false) => return Err(BRepError::ForestViolation(e)),
        };
        // The survivor and the children of the killed loop would end up in
        // the loop that is being deleted.
        if killed.is_some() && s.use_loop(survivor)?.loop_id == killed {
            return Err(BRepError::ForestViolation(e));
        }
        let alone = s.half_edge(h)?.next == h && s.half_edge(o)?.next == o;
        if alone && s.is_root(survivor)? {
            return Err(BRepError::ForestViolation(e));
        }
        return Ok(Plan::Merge {
            h,
            o,
            survivor,
            dropped,
            killed,
            isolated: alone.then_some(va),
        });
    }

    let ul = ul_h;
    let cycle = s.cycle(h)?;
    let o_at = cycle
        .iter()
        .position(|&x| x == o)
        .ok_or_else(|| BRepError::inconsistent(format!("{o} missing from the cycle of {h}")))?;
    // cycle = [h, x.., o, y..]
    let x = cycle[1..o_at].to_vec();
    let y = cycle[o_at + 1..].to_vec();
    let rejoin_target = !x.is_empty();
    let rejoin_origin = !y.is_empty();
    let isolated = if va == vb {
        if x.is_empty() && y.is_empty() {
            vec![va]
        } else {
            Vec::new()
        }
    } else {
        let mut out = Vec::new();
        if y.is_empty() {
            out.push(va);
        }
        if x.is_empty() {
            out.push(vb);
        }
        out
    };

    // The piece holding the anchor keeps the use-loop. An anchor on the
    // removed edge itself defers to the piece with the oldest half-edge.
    let anchor = s.use_loop(ul)?.half_edge;
    let x_kept = if x.contains(&anchor) {
        true
    } else if y.contains(&anchor) {
        false
    } else {
        match (x.iter().min(), y.iter().min()) {
            (Some(a), Some(b)) => a < b,
            (_, None) => true,
            (None, Some(_)) => false,
        }
    };
    let (mut kept, mut split) = if x_kept { (x, y) } else { (y, x) };

    if s.is_root(ul)? {
        let kind = |piece: &[HalfEdgeId]| -> Result<UseLoopKind> {
            if piece.is_empty() {
                return Ok(UseLoopKind::Point);
            }
            Ok(s.cycle_kind(piece, ul)?)
        };
        let kept_area = kind(&kept)? == UseLoopKind::Area;
        let split_area = kind(&split)? == UseLoopKind::Area;
        if !kept_area && !split_area {
            return Err(BRepError::ForestViolation(e));
        }
        if !kept_area {
            std::mem::swap(&mut kept, &mut split);
        }
    }

    Ok(Plan::Bridge {
        h,
        o,
        ul,
        kept,
        split,
        rejoin_target,
        rejoin_origin,
        isolated,
    })
}

/// Drop an isolated vertex or give it a point use-loop in `region`.
fn settle_isolated(
    s: &mut IncidenceStore,
    v: VertexId,
    region: Option<LoopId>,
    delete_isolated: bool,
    deleted: &mut Vec<VertexId>,
) -> Result<()> {
    if delete_isolated {
        s.remove_vertex(v)?;
        deleted.push(v);
    } else {
        make_point(s, v, region)?;
    }
    Ok(())
}

/// Remove edge `e`; endpoints left without edges become isolated points or,
/// with `delete_isolated`, disappear. Returns the deleted vertices.
pub(crate) fn remove_edge(
    s: &mut IncidenceStore,
    e: EdgeId,
    delete_isolated: bool,
) -> Result<Vec<VertexId>> {
    let mut deleted = Vec::new();
    match plan(s, e)? {
        Plan::Merge {
            h,
            o,
            survivor,
            dropped,
            killed,
            isolated,
        } => {
            let hr = *s.half_edge(h)?;
            let or = *s.half_edge(o)?;
            let va = s.origin(h)?;
            let vb = s.origin(o)?;
            // Only a self-loop can be alone on its cycle.
            let rest_h = hr.next != h;
            let rest_o = or.next != o;
            match (rest_h, rest_o) {
                (true, true) => {
                    s.link(hr.prev, or.next)?;
                    s.link(or.prev, hr.next)?;
                }
                (true, false) => s.link(hr.prev, hr.next)?,
                (false, true) => s.link(or.prev, or.next)?,
                (false, false) => {}
            }
            if isolated.is_none() {
                let from_va = if rest_o { or.next } else { hr.next };
                let from_vb = if rest_h { hr.next } else { or.next };
                repoint_vertex(s, va, hr.use_vertex, from_va)?;
                repoint_vertex(s, vb, or.use_vertex, from_vb)?;
            }
            s.remove_half_edge_with_corner(h)?;
            s.remove_half_edge_with_corner(o)?;
            s.remove_edge(e)?;

            let region = s.use_loop(survivor)?.loop_id;
            match killed {
                Some(l) => {
                    for child in s.children(dropped)? {
                        s.detach(child)?;
                        s.attach(child, region)?;
                    }
                    s.remove_loop(l)?;
                }
                None => s.detach(dropped)?,
            }
            s.remove_use_loop(dropped)?;

            match (rest_h, rest_o) {
                (true, _) => s.adopt_cycle(hr.next, survivor)?,
                (false, true) => s.adopt_cycle(or.next, survivor)?,
                (false, false) => {
                    s.detach(survivor)?;
                    s.remove_use_loop(survivor)?;
                }
            }
            if let Some(v) = isolated {
                settle_isolated(s, v, region, delete_isolated, &mut deleted)?;
            }
            Ok(deleted)
        }
        Plan::Bridge {
            h,
            o,
            ul,
            kept,
            split,
            rejoin_target,
            rejoin_origin,
            isolated,
        } => {
            let hr = *s.half_edge(h)?;
            let or = *s.half_edge(o)?;
            let va = s.origin(h)?;
            let vb = s.origin(o)?;
            let region = s.use_loop(ul)?.loop_id;
            if rejoin_target {
                s.link(or.prev, hr.next)?;
            }
            if rejoin_origin {
                s.link(hr.prev, or.next)?;
            }
            // A self-loop leaves both corners at one vertex; any rejoined
            // side can stand in for either.
            let at_origin = match (rejoin_origin, rejoin_target) {
                (true, _) => Some(or.next),
                (false, true) if va == vb => Some(hr.next),
                _ => None,
            };
            let at_target = match (rejoin_target, rejoin_origin) {
                (true, _) => Some(hr.next),
                (false, true) if va == vb => Some(or.next),
                _ => None,
            };
            if let Some(next) = at_origin {
                repoint_vertex(s, va, hr.use_vertex, next)?;
            }
            if let Some(next) = at_target {
                repoint_vertex(s, vb, or.use_vertex, next)?;
            }
            s.remove_half_edge_with_corner(h)?;
            s.remove_half_edge_with_corner(o)?;
            s.remove_edge(e)?;

            if let Some(&first) = split.first() {
                let fresh = s.insert_use_loop(UseLoop::detached(first));
                s.assign_cycle(first, fresh)?;
                s.attach(fresh, region)?;
            }
            match kept.first() {
                Some(&first) => s.adopt_cycle(first, ul)?,
                None => {
                    s.detach(ul)?;
                    s.remove_use_loop(ul)?;
                }
            }

            for v in isolated {
                settle_isolated(s, v, region, delete_isolated, &mut deleted)?;
            }
            Ok(deleted)
        }
    }
}

/// Directed edges of the cycle the removal creates: the merged cycle, or
/// the piece split off a bridge.
pub(crate) fn preview_remove_edge(s: &IncidenceStore, e: EdgeId) -> Result<Vec<(EdgeId, bool)>> {
    match plan(s, e)? {
        Plan::Merge { h, o, .. } => {
            let mut merged = s.cycle(h)?.split_off(1);
            merged.extend(s.cycle(o)?.into_iter().skip(1));
            directed_edges(s, &merged)
        }
        Plan::Bridge { split, .. } => directed_edges(s, &split),
    }
}

impl BRep2d {
    /// Remove edge `e` and its two half-edges.
    ///
    /// Two faces separated by `e` merge (the smaller loop id survives when
    /// both are bounded); a bridge splits its cycle in two. Endpoints left
    /// without edges stay as isolated points unless `delete_isolated` is set.
    ///
    /// When a bridge separates two area boundaries of one loop, the piece
    /// holding the loop's anchor stays outer, or the piece with the oldest
    /// half-edge when the anchor is on the bridge. Use
    /// [`promote_use_loop`](Self::promote_use_loop) to pick the other one.
    pub fn remove_edge(&mut self, e: EdgeId, delete_isolated: bool) -> Result<()> {
        let deleted = self.transact("remove_edge", |s| remove_edge(s, e, delete_isolated))?;
        debug!(edge = %e, deleted_vertices = deleted.len(), "removed edge");
        Ok(())
    }

    /// Directed edges of the cycle [`remove_edge`](Self::remove_edge) would
    /// produce: the merged face boundary, or the piece a bridge removal
    /// splits off (empty when nothing is split off).
    pub fn preview_remove_edge(&self, e: EdgeId) -> Result<Vec<(EdgeId, bool)>> {
        preview_remove_edge(&self.store, e)
    }
}
