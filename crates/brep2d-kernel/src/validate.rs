//! Consistency validator: a full sweep over every table.

use std::collections::{BTreeMap, BTreeSet};

use brep2d_topo::{IncidenceStore, Key, UseLoopId};

use crate::error::{BRepError, Result};
use crate::BRep2d;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(BRepError::inconsistent(format!($($arg)+)));
        }
    };
}

fn no_zero_key<K: Key, V>(table: &BTreeMap<K, V>, name: &str) -> Result<()> {
    if let Some(first) = table.keys().next() {
        ensure!(first.raw() != 0, "{name} table uses the reserved key 0");
    }
    Ok(())
}

/// Every key stored in a record must name an existing record. The later
/// passes index the tables directly and rely on this.
fn check_references(s: &IncidenceStore) -> Result<()> {
    for (&v, vertex) in &s.vertices {
        ensure!(
            s.use_vertices.contains_key(&vertex.use_vertex),
            "{v}: corner {} missing",
            vertex.use_vertex
        );
    }
    for (&e, edge) in &s.edges {
        ensure!(
            s.half_edges.contains_key(&edge.half_edge),
            "{e}: half-edge {} missing",
            edge.half_edge
        );
    }
    for (&l, face) in &s.loops {
        ensure!(s.use_loops.contains_key(&face.use_loop), "{l}: root {} missing", face.use_loop);
    }
    for (&ul, record) in &s.use_loops {
        ensure!(
            s.half_edges.contains_key(&record.half_edge),
            "{ul}: anchor {} missing",
            record.half_edge
        );
        if let Some(l) = record.loop_id {
            ensure!(s.loops.contains_key(&l), "{ul}: loop {l} missing");
        }
        for link in [record.parent, record.child].into_iter().flatten() {
            ensure!(s.use_loops.contains_key(&link), "{ul}: linked use-loop {link} missing");
        }
    }
    for (&id, h) in &s.half_edges {
        for link in [h.next, h.prev, h.opposite] {
            ensure!(s.half_edges.contains_key(&link), "{id}: linked half-edge {link} missing");
        }
        ensure!(
            s.use_vertices.contains_key(&h.use_vertex),
            "{id}: corner {} missing",
            h.use_vertex
        );
        ensure!(s.use_loops.contains_key(&h.use_loop), "{id}: use-loop {} missing", h.use_loop);
        if let Some(e) = h.edge {
            ensure!(s.edges.contains_key(&e), "{id}: edge {e} missing");
        }
    }
    for (&uv, corner) in &s.use_vertices {
        ensure!(s.vertices.contains_key(&corner.vertex), "{uv}: vertex {} missing", corner.vertex);
        ensure!(
            s.half_edges.contains_key(&corner.half_edge),
            "{uv}: half-edge {} missing",
            corner.half_edge
        );
    }
    Ok(())
}

fn check_half_edges(s: &IncidenceStore) -> Result<()> {
    for (&id, h) in &s.half_edges {
        ensure!(s.half_edges[&h.next].prev == id, "{id}: successor {} does not link back", h.next);
        ensure!(s.half_edges[&h.prev].next == id, "{id}: predecessor {} does not link on", h.prev);
        let corner = &s.use_vertices[&h.use_vertex];
        ensure!(
            corner.half_edge == id,
            "{id}: corner {} belongs to {}",
            h.use_vertex,
            corner.half_edge
        );

        let Some(e) = h.edge else {
            ensure!(
                h.next == id && h.prev == id && h.opposite == id,
                "{id}: point half-edge is not self-linked"
            );
            continue;
        };
        let o = &s.half_edges[&h.opposite];
        ensure!(h.opposite != id, "{id}: half-edge of {e} is its own opposite");
        ensure!(o.opposite == id, "{id}: opposite {} does not point back", h.opposite);
        ensure!(o.edge == Some(e), "{id}: opposite {} lies on another edge", h.opposite);
        ensure!(o.same_dir != h.same_dir, "{id}: both sides of {e} share a direction");
        let target = s.use_vertices[&s.half_edges[&h.next].use_vertex].vertex;
        ensure!(
            target == s.use_vertices[&o.use_vertex].vertex,
            "{id}: target differs from origin of its opposite"
        );
    }
    Ok(())
}

fn check_edges(s: &IncidenceStore) -> Result<()> {
    let mut sides: BTreeMap<_, usize> = BTreeMap::new();
    for h in s.half_edges.values() {
        if let Some(e) = h.edge {
            *sides.entry(e).or_default() += 1;
        }
    }
    for (&e, edge) in &s.edges {
        ensure!(sides.get(&e) == Some(&2), "{e} is not owned by exactly two half-edges");
        let canonical = &s.half_edges[&edge.half_edge];
        ensure!(canonical.edge == Some(e), "{e}: canonical half-edge lies on another edge");
        ensure!(canonical.same_dir, "{e}: canonical half-edge runs backwards");
    }
    Ok(())
}

fn check_use_loops(s: &IncidenceStore) -> Result<()> {
    let mut members = 0;
    for (&ul, record) in &s.use_loops {
        let cycle = s.cycle(record.half_edge)?;
        for h in &cycle {
            ensure!(s.half_edges[h].use_loop == ul, "{ul}: cycle member {h} belongs elsewhere");
        }
        members += cycle.len();
        if record.loop_id.is_none() {
            ensure!(
                record.parent.is_none() && record.child.is_none(),
                "{ul}: void use-loop is linked into a forest"
            );
        }
    }
    ensure!(
        members == s.half_edges.len(),
        "{} half-edges are not on their use-loop's cycle",
        s.half_edges.len().abs_diff(members)
    );
    Ok(())
}

fn check_forest(s: &IncidenceStore) -> Result<()> {
    let mut seen: BTreeSet<UseLoopId> = BTreeSet::new();
    for (&l, record) in &s.loops {
        let root = record.use_loop;
        let r = &s.use_loops[&root];
        ensure!(r.parent == Some(root), "{l}: root {root} is not its own parent");
        ensure!(r.loop_id == Some(l), "{l}: root {root} names another loop");
        for ul in s.loop_use_loops(l)? {
            ensure!(seen.insert(ul), "{ul} is reachable twice");
            let record = &s.use_loops[&ul];
            ensure!(record.loop_id == Some(l), "{ul}: listed under {l} but names another loop");
            if ul != root {
                ensure!(record.parent == Some(root), "{ul}: parent is not the root of {l}");
            }
        }
    }
    for (&ul, record) in &s.use_loops {
        ensure!(
            record.loop_id.is_none() || seen.contains(&ul),
            "{ul} is not reachable from its loop"
        );
    }
    Ok(())
}

fn check_vertices(s: &IncidenceStore) -> Result<()> {
    let mut corners: BTreeMap<_, usize> = BTreeMap::new();
    for (&uv, corner) in &s.use_vertices {
        ensure!(
            s.half_edges[&corner.half_edge].use_vertex == uv,
            "{uv}: half-edge {} starts at another corner",
            corner.half_edge
        );
        *corners.entry(corner.vertex).or_default() += 1;
    }
    for (&v, vertex) in &s.vertices {
        let rep = &s.use_vertices[&vertex.use_vertex];
        ensure!(rep.vertex == v, "{v}: representative corner belongs to {}", rep.vertex);
        let around = s.corners(v)?;
        ensure!(
            corners.get(&v) == Some(&around.len()),
            "{v}: rotation visits {} of its corners",
            around.len()
        );
        if s.half_edges[&rep.half_edge].is_point() {
            ensure!(around.len() == 1, "{v}: isolated vertex has several corners");
            let ul = s.half_edges[&rep.half_edge].use_loop;
            ensure!(
                s.use_loops[&ul].half_edge == rep.half_edge,
                "{v}: point use-loop {ul} is not anchored on it"
            );
        }
    }
    Ok(())
}

/// Check every structural invariant of `s`, reporting the first violation.
pub(crate) fn check(s: &IncidenceStore) -> Result<()> {
    no_zero_key(&s.vertices, "vertex")?;
    no_zero_key(&s.edges, "edge")?;
    no_zero_key(&s.loops, "loop")?;
    no_zero_key(&s.use_loops, "use-loop")?;
    no_zero_key(&s.half_edges, "half-edge")?;
    no_zero_key(&s.use_vertices, "use-vertex")?;
    check_references(s)?;
    check_half_edges(s)?;
    check_edges(s)?;
    check_use_loops(s)?;
    check_forest(s)?;
    check_vertices(s)
}

impl BRep2d {
    /// Run the consistency validator.
    ///
    /// Operators keep the graph consistent on their own; this is for tests
    /// and for graphs from outside, which [`from_json`](Self::from_json)
    /// checks automatically.
    pub fn validate(&self) -> Result<()> {
        check(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{square, square_with_island};
    use brep2d_topo::{HalfEdgeId, LoopId};

    fn broken(edit: impl FnOnce(&mut IncidenceStore)) -> String {
        let (brep, _, _) = square_with_island();
        let mut s = brep.store().clone();
        edit(&mut s);
        match check(&s) {
            Err(BRepError::Inconsistent(msg)) => msg,
            other => panic!("expected an inconsistency, got {other:?}"),
        }
    }

    #[test]
    fn test_fixtures_are_consistent() {
        let (brep, _) = square();
        brep.validate().unwrap();
        let (brep, _, _) = square_with_island();
        brep.validate().unwrap();
    }

    #[test]
    fn test_accepts_self_loops() {
        let (mut brep, sq) = square();
        let v = sq.vertices[1];
        let (ca, cb) = brep.corner_pair(v, v, Some(sq.loop_id)).unwrap().unwrap();
        brep.connect_vertex(ca, cb, true).unwrap();
        let p = brep.add_vertex_loop(None).unwrap();
        let corner = brep.vertex_cursor(p).unwrap().use_vertex();
        brep.connect_vertex(corner, corner, false).unwrap();
        check(brep.store()).unwrap();
    }

    #[test]
    fn test_detects_broken_successor() {
        let msg = broken(|s| {
            let h = s.edges.values().next().unwrap().half_edge;
            let next = s.half_edges[&h].next;
            s.half_edges.get_mut(&next).unwrap().prev = next;
        });
        assert!(msg.contains("does not link"), "{msg}");
    }

    #[test]
    fn test_detects_flipped_direction() {
        let msg = broken(|s| {
            let h = s.edges.values().next().unwrap().half_edge;
            s.half_edges.get_mut(&h).unwrap().same_dir = false;
        });
        assert!(msg.contains("direction"), "{msg}");
    }

    #[test]
    fn test_detects_foreign_cycle_member() {
        let msg = broken(|s| {
            let h = s.edges.values().next().unwrap().half_edge;
            let other = s.half_edges[&s.half_edges[&h].opposite].use_loop;
            s.half_edges.get_mut(&h).unwrap().use_loop = other;
        });
        assert!(msg.contains("belongs elsewhere"), "{msg}");
    }

    #[test]
    fn test_detects_orphan_child() {
        let msg = broken(|s| {
            let root = s.loops[&LoopId(1)].use_loop;
            s.use_loops.get_mut(&root).unwrap().child = None;
        });
        assert!(msg.contains("not reachable"), "{msg}");
    }

    #[test]
    fn test_detects_zero_key() {
        let msg = broken(|s| {
            let (_, record) = s.half_edges.pop_last().unwrap();
            s.half_edges.insert(HalfEdgeId(0), record);
        });
        assert!(msg.contains("reserved key 0"), "{msg}");
    }
}
