//! `build`: apply a TOML edit script to a graph.
//!
//! ```toml
//! [[op]]
//! kind = "polygon"
//! sides = 4
//!
//! [[op]]
//! kind = "connect"
//! from = 1
//! to = 3
//! region = 1
//! add_left = true
//! ```

use anyhow::{bail, Context, Result};
use brep2d_kernel::{BRep2d, EdgeId, LoopId, UseLoopId, VertexId};
use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for `build`.
#[derive(Args)]
pub struct BuildArgs {
    /// Edit script (TOML)
    pub script: PathBuf,

    /// Where to write the resulting graph; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Graph to start from instead of an empty one
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// A sequence of edits.
#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default, rename = "op")]
    pub ops: Vec<Op>,
}

/// One edit. Regions are loop ids; omit them for the void.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Op {
    Polygon {
        sides: usize,
        #[serde(default)]
        region: Option<LoopId>,
    },
    AddVertexLoop {
        #[serde(default)]
        region: Option<LoopId>,
    },
    AddVertexEdge {
        edge: EdgeId,
    },
    Connect {
        from: VertexId,
        to: VertexId,
        #[serde(default)]
        region: Option<LoopId>,
        #[serde(default = "default_add_left")]
        add_left: bool,
    },
    RemoveEdge {
        edge: EdgeId,
        #[serde(default)]
        delete_isolated: bool,
    },
    RemoveVertex {
        vertex: VertexId,
    },
    MergeEdgesAt {
        vertex: VertexId,
    },
    SetHole {
        #[serde(rename = "loop")]
        loop_id: LoopId,
    },
    SwapUseLoop {
        use_loop: UseLoopId,
        #[serde(default)]
        to: Option<LoopId>,
    },
    PromoteUseLoop {
        use_loop: UseLoopId,
    },
}

fn default_add_left() -> bool {
    true
}

impl Op {
    /// Apply the edit and describe what it created.
    pub fn apply(&self, brep: &mut BRep2d) -> Result<String> {
        Ok(match *self {
            Op::Polygon { sides, region } => {
                let polygon = brep.add_polygon(sides, region)?;
                format!("loop {}", polygon.loop_id)
            }
            Op::AddVertexLoop { region } => format!("vertex {}", brep.add_vertex_loop(region)?),
            Op::AddVertexEdge { edge } => format!("vertex {}", brep.add_vertex_edge(edge)?),
            Op::Connect {
                from,
                to,
                region,
                add_left,
            } => {
                let Some((a, b)) = brep.corner_pair(from, to, region)? else {
                    bail!("{from} and {to} do not both touch the requested region");
                };
                format!("edge {}", brep.connect_vertex(a, b, add_left)?)
            }
            Op::RemoveEdge {
                edge,
                delete_isolated,
            } => {
                brep.remove_edge(edge, delete_isolated)?;
                format!("removed {edge}")
            }
            Op::RemoveVertex { vertex } => {
                brep.remove_vertex(vertex)?;
                format!("removed {vertex}")
            }
            Op::MergeEdgesAt { vertex } => format!("edge {}", brep.merge_edges_at(vertex)?),
            Op::SetHole { loop_id } => {
                brep.set_hole_loop(loop_id)?;
                format!("{loop_id} is a hole")
            }
            Op::SwapUseLoop { use_loop, to } => {
                brep.swap_use_loop(use_loop, to)?;
                format!("moved {use_loop}")
            }
            Op::PromoteUseLoop { use_loop } => {
                brep.promote_use_loop(use_loop)?;
                format!("{use_loop} is the outer boundary")
            }
        })
    }
}

/// Run every op in order, stopping at the first failure.
pub fn run_script(brep: &mut BRep2d, script: &Script) -> Result<()> {
    for (i, op) in script.ops.iter().enumerate() {
        let outcome = op
            .apply(brep)
            .with_context(|| format!("op #{} ({op:?}) failed", i + 1))?;
        debug!(op = i + 1, "{outcome}");
    }
    Ok(())
}

pub fn execute(args: BuildArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;
    let script: Script = toml::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.script.display()))?;

    let mut brep = match &args.input {
        Some(path) => BRep2d::read_json(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => BRep2d::new(),
    };
    run_script(&mut brep, &script)?;
    info!(ops = script.ops.len(), loops = brep.loop_ids().len(), "script applied");

    match &args.output {
        Some(path) => brep
            .write_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", brep.to_json()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        [[op]]
        kind = "polygon"
        sides = 4

        [[op]]
        kind = "add_vertex_loop"
        region = 1

        [[op]]
        kind = "connect"
        from = 1
        to = 3
        region = 1

        [[op]]
        kind = "add_vertex_edge"
        edge = 5
    "#;

    #[test]
    fn test_parse_script() {
        let script: Script = toml::from_str(SCENARIO).unwrap();
        assert_eq!(script.ops.len(), 4);
        assert_eq!(
            script.ops[0],
            Op::Polygon {
                sides: 4,
                region: None
            }
        );
        assert_eq!(
            script.ops[2],
            Op::Connect {
                from: VertexId(1),
                to: VertexId(3),
                region: Some(LoopId(1)),
                add_left: true
            }
        );
    }

    #[test]
    fn test_run_script() {
        let script: Script = toml::from_str(SCENARIO).unwrap();
        let mut brep = BRep2d::new();
        run_script(&mut brep, &script).unwrap();
        assert_eq!(brep.loop_ids().len(), 2);
        assert_eq!(brep.vertex_ids().len(), 6);
        assert_eq!(brep.edge_ids().len(), 6);
        brep.validate().unwrap();
    }

    #[test]
    fn test_failure_names_the_op() {
        let script: Script = toml::from_str(
            r#"
            [[op]]
            kind = "set_hole"
            loop = 4
            "#,
        )
        .unwrap();
        let mut brep = BRep2d::new();
        let err = run_script(&mut brep, &script).unwrap_err();
        assert!(format!("{err:#}").contains("op #1"), "{err:#}");
    }

    #[test]
    fn test_self_loop_and_promotion() {
        let script: Script = toml::from_str(
            r#"
            [[op]]
            kind = "polygon"
            sides = 4

            [[op]]
            kind = "polygon"
            sides = 3
            region = 1

            [[op]]
            kind = "set_hole"
            loop = 2

            [[op]]
            kind = "promote_use_loop"
            use_loop = 3

            [[op]]
            kind = "add_vertex_loop"
            region = 1

            [[op]]
            kind = "connect"
            from = 8
            to = 8
            region = 1
            "#,
        )
        .unwrap();
        let mut brep = BRep2d::new();
        run_script(&mut brep, &script).unwrap();
        assert_eq!(brep.loop_ids(), vec![LoopId(1), LoopId(2)]);
        assert_eq!(brep.degree(VertexId(8)).unwrap(), 2);
        assert_eq!(brep.loop_cursor(LoopId(1)).unwrap().use_loop(), UseLoopId(3));
        brep.validate().unwrap();
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let parsed: Result<Script, _> = toml::from_str(
            r#"
            [[op]]
            kind = "explode"
            "#,
        );
        assert!(parsed.is_err());
    }
}
