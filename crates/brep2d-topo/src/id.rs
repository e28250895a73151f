//! Typed, recyclable integer keys.
//!
//! Every element kind lives in its own key space. Keys start at 1 and the
//! allocator always hands out the smallest unused value, so the spaces stay
//! dense across deletions and external tables keyed by these integers keep
//! lining up.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A key usable in one of the incidence tables.
pub trait Key: Copy + Ord + fmt::Debug + fmt::Display {
    /// Wrap a raw integer.
    fn from_raw(raw: u32) -> Self;
    /// The raw integer behind this key.
    fn raw(self) -> u32;
}

macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl Key for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_key!(
    /// A topological point.
    VertexId,
    "v"
);
define_key!(
    /// An undirected connection between two vertices.
    EdgeId,
    "e"
);
define_key!(
    /// A bounded face.
    LoopId,
    "l"
);
define_key!(
    /// One directed side of an edge (or the point record of an isolated vertex).
    HalfEdgeId,
    "he"
);
define_key!(
    /// One boundary cycle of a loop (or of the void).
    UseLoopId,
    "ul"
);
define_key!(
    /// One corner of a vertex.
    UseVertexId,
    "uv"
);

/// Smallest key `>= 1` not present in `map`.
///
/// Pure over its argument: each key space is allocated independently.
pub fn free_key<K: Key, V>(map: &BTreeMap<K, V>) -> K {
    let mut candidate = 1u32;
    for key in map.keys() {
        let raw = key.raw();
        if raw == candidate {
            candidate += 1;
        } else if raw > candidate {
            break;
        }
    }
    K::from_raw(candidate)
}
