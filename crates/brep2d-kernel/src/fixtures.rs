//! Shared test graphs.

use crate::{BRep2d, Polygon};

/// A square face in the void.
pub fn square() -> (BRep2d, Polygon) {
    let mut brep = BRep2d::new();
    let sq = brep.add_polygon(4, None).unwrap();
    (brep, sq)
}

/// A square face with a triangular face nested inside it.
pub fn square_with_island() -> (BRep2d, Polygon, Polygon) {
    let (mut brep, sq) = square();
    let tri = brep.add_polygon(3, Some(sq.loop_id)).unwrap();
    (brep, sq, tri)
}
