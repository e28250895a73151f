//! Serializable form of a graph.
//!
//! A [`Snapshot`] lists every record with its key, table by table, so ids,
//! cycle orders and forest links survive a round trip exactly. Reading one
//! back rejects duplicate keys and runs the validator.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use brep2d_topo::{
    Edge, EdgeId, HalfEdge, HalfEdgeId, IncidenceStore, Key, Loop, LoopId, UseLoop, UseLoopId,
    UseVertex, UseVertexId, Vertex, VertexId,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BRepError, Result};
use crate::validate::check;
use crate::BRep2d;

/// A record together with its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyed<K, V> {
    /// Key in its table.
    pub id: K,
    /// The stored record.
    #[serde(flatten)]
    pub record: V,
}

/// Every table of a graph as ordered lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Vertex table.
    pub vertices: Vec<Keyed<VertexId, Vertex>>,
    /// Edge table.
    pub edges: Vec<Keyed<EdgeId, Edge>>,
    /// Loop table.
    pub loops: Vec<Keyed<LoopId, Loop>>,
    /// Use-loop table.
    pub use_loops: Vec<Keyed<UseLoopId, UseLoop>>,
    /// Half-edge table.
    pub half_edges: Vec<Keyed<HalfEdgeId, HalfEdge>>,
    /// Use-vertex table.
    pub use_vertices: Vec<Keyed<UseVertexId, UseVertex>>,
}

fn listed<K: Key, V: Copy>(table: &BTreeMap<K, V>) -> Vec<Keyed<K, V>> {
    table
        .iter()
        .map(|(&id, &record)| Keyed { id, record })
        .collect()
}

fn table<K: Key, V>(rows: Vec<Keyed<K, V>>) -> Result<BTreeMap<K, V>> {
    let mut out = BTreeMap::new();
    for row in rows {
        if out.insert(row.id, row.record).is_some() {
            return Err(BRepError::inconsistent(format!("duplicate key {}", row.id)));
        }
    }
    Ok(out)
}

impl From<BRep2d> for Snapshot {
    fn from(brep: BRep2d) -> Self {
        let s = &brep.store;
        Snapshot {
            vertices: listed(&s.vertices),
            edges: listed(&s.edges),
            loops: listed(&s.loops),
            use_loops: listed(&s.use_loops),
            half_edges: listed(&s.half_edges),
            use_vertices: listed(&s.use_vertices),
        }
    }
}

impl TryFrom<Snapshot> for BRep2d {
    type Error = BRepError;

    fn try_from(snapshot: Snapshot) -> Result<Self> {
        let store = IncidenceStore {
            vertices: table(snapshot.vertices)?,
            edges: table(snapshot.edges)?,
            loops: table(snapshot.loops)?,
            use_loops: table(snapshot.use_loops)?,
            half_edges: table(snapshot.half_edges)?,
            use_vertices: table(snapshot.use_vertices)?,
        };
        check(&store)?;
        Ok(BRep2d { store })
    }
}

impl BRep2d {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a graph from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the graph as JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        debug!(path = %path.display(), "wrote graph");
        Ok(())
    }

    /// Read and validate a graph from the JSON file at `path`.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let brep: BRep2d = serde_json::from_reader(reader)?;
        debug!(path = %path.display(), vertices = brep.store.vertices.len(), "read graph");
        Ok(brep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::square_with_island;

    fn edited() -> BRep2d {
        let (mut brep, sq, tri) = square_with_island();
        let p = brep.add_vertex_loop(Some(sq.loop_id)).unwrap();
        brep.add_vertex_edge(sq.edges[1]).unwrap();
        brep.set_hole_loop(tri.loop_id).unwrap();
        brep.remove_vertex(p).unwrap();
        brep
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let brep = edited();
        let json = brep.to_json().unwrap();
        let back = BRep2d::from_json(&json).unwrap();
        assert_eq!(back, brep);
        back.validate().unwrap();
        assert_eq!(back.to_json().unwrap(), json);
    }

    #[test]
    fn test_snapshot_lists_keyed_rows() {
        let brep = edited();
        let value = serde_json::to_value(&brep).unwrap();
        let first = &value["vertices"][0];
        assert_eq!(first["id"], 1);
        assert!(first["use_vertex"].is_u64());
        let void = value["use_loops"]
            .as_array()
            .unwrap()
            .iter()
            .find(|row| row["loop_id"].is_null())
            .unwrap();
        assert!(void["parent"].is_null());
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let brep = edited();
        let mut snapshot = Snapshot::from(brep);
        let copy = snapshot.edges[0].clone();
        snapshot.edges.push(copy);
        let err = BRep2d::try_from(snapshot).unwrap_err();
        assert!(err.to_string().contains("duplicate key e1"), "{err}");
    }

    #[test]
    fn test_rejects_inconsistent_graph() {
        let brep = edited();
        let mut snapshot = Snapshot::from(brep);
        snapshot.half_edges.pop();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(BRep2d::from_json(&json).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let brep = edited();
        let path = std::env::temp_dir().join(format!("brep2d-{}.json", std::process::id()));
        brep.write_json(&path).unwrap();
        let back = BRep2d::read_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, brep);
    }
}
