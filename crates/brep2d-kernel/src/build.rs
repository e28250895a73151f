//! Composite construction from Euler operators.

use brep2d_topo::{EdgeId, IncidenceStore, LoopId, VertexId};
use tracing::debug;

use crate::error::{BRepError, Result};
use crate::euler::{add_vertex_loop, connect, corner_pair};
use crate::BRep2d;

/// A closed polygon created by [`BRep2d::add_polygon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    /// The enclosed face.
    pub loop_id: LoopId,
    /// Corners in counter-clockwise order (the face is on the left).
    pub vertices: Vec<VertexId>,
    /// `edges[i]` runs from `vertices[i]` to `vertices[i + 1]`, wrapping.
    pub edges: Vec<EdgeId>,
}

fn add_polygon(s: &mut IncidenceStore, n: usize, region: Option<LoopId>) -> Result<Polygon> {
    if n < 3 {
        return Err(BRepError::DegeneratePolygon(n));
    }
    s.check_region(region)?;
    let vertices = (0..n)
        .map(|_| add_vertex_loop(s, region))
        .collect::<Result<Vec<_>>>()?;

    let mut edges = Vec::with_capacity(n);
    let mut loop_id = None;
    for i in 0..n {
        let (va, vb) = (vertices[i], vertices[(i + 1) % n]);
        let (ca, cb) = corner_pair(s, va, vb, region)?
            .ok_or_else(|| BRepError::inconsistent(format!("{va} and {vb} share no region")))?;
        let (e, closed) = connect(s, ca, cb, true)?;
        edges.push(e);
        loop_id = closed.or(loop_id);
    }
    let loop_id =
        loop_id.ok_or_else(|| BRepError::inconsistent("polygon boundary did not close"))?;
    Ok(Polygon {
        loop_id,
        vertices,
        edges,
    })
}

impl BRep2d {
    /// Build an `n`-sided polygon inside `region` (`None` for the void).
    ///
    /// The polygon's outer boundary becomes a child of `region`; its
    /// interior is a new loop.
    pub fn add_polygon(&mut self, n: usize, region: Option<LoopId>) -> Result<Polygon> {
        let polygon = self.transact("add_polygon", |s| add_polygon(s, n, region))?;
        debug!(sides = n, loop_id = %polygon.loop_id, region = ?region, "added polygon");
        Ok(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_needs_three_sides() {
        let mut brep = BRep2d::new();
        assert!(matches!(
            brep.add_polygon(2, None),
            Err(BRepError::DegeneratePolygon(2))
        ));
        assert!(brep.is_empty());
    }

    #[test]
    fn test_pentagon_boundary_order() {
        let mut brep = BRep2d::new();
        let poly = brep.add_polygon(5, None).unwrap();
        assert_eq!(brep.loop_ids(), vec![poly.loop_id]);
        assert_eq!(poly.edges.len(), 5);

        let mut cursor = brep.loop_cursor(poly.loop_id).unwrap();
        let mut seen = Vec::new();
        while !cursor.is_end() {
            seen.push(cursor.vertex());
            cursor.advance();
        }
        let start = seen.iter().position(|&v| v == poly.vertices[0]).unwrap();
        seen.rotate_left(start);
        assert_eq!(seen, poly.vertices);

        for &v in &poly.vertices {
            assert_eq!(brep.degree(v).unwrap(), 2);
        }
    }

    #[test]
    fn test_polygon_inside_face() {
        let mut brep = BRep2d::new();
        let outer = brep.add_polygon(4, None).unwrap();
        let inner = brep.add_polygon(3, Some(outer.loop_id)).unwrap();
        for &e in &inner.edges {
            assert_eq!(
                brep.edge_loops(e).unwrap(),
                (Some(inner.loop_id), Some(outer.loop_id))
            );
        }
        let mut cursor = brep.loop_cursor(outer.loop_id).unwrap();
        assert!(cursor.shift_child_loop());
        assert!(!cursor.is_parent());
        assert_eq!(cursor.count_vertex_use_loop(), 3);
    }

    #[test]
    fn test_polygon_in_unknown_region() {
        let mut brep = BRep2d::new();
        assert!(matches!(
            brep.add_polygon(3, Some(LoopId(3))),
            Err(BRepError::Unknown(_))
        ));
    }
}
