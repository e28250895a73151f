//! `info`: element counts and per-loop boundary summary.

use anyhow::{Context, Result};
use brep2d_kernel::{BRep2d, LoopCursor};
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;

/// Arguments for `info`.
#[derive(Args)]
pub struct InfoArgs {
    /// Graph file (JSON)
    pub file: PathBuf,
}

pub fn execute(args: InfoArgs) -> Result<()> {
    let brep = BRep2d::read_json(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    print!("{}", summarize(&brep)?);
    Ok(())
}

fn describe(out: &mut String, cursor: &LoopCursor<'_>) -> std::fmt::Result {
    writeln!(
        out,
        "  {} {:?}{} corners={}",
        cursor.use_loop(),
        cursor.use_loop_kind(),
        if cursor.is_parent() { " (outer)" } else { "" },
        cursor.count_vertex_use_loop()
    )
}

/// Render counts, then every loop with its use-loops, then the void.
pub fn summarize(brep: &BRep2d) -> Result<String> {
    let store = brep.store();
    let mut out = String::new();
    writeln!(out, "vertices:  {}", store.vertices.len())?;
    writeln!(out, "edges:     {}", store.edges.len())?;
    writeln!(out, "loops:     {}", store.loops.len())?;
    writeln!(out, "use-loops: {}", store.use_loops.len())?;

    for l in brep.loop_ids() {
        writeln!(out, "{l}:")?;
        let mut cursor = brep.loop_cursor(l)?;
        loop {
            describe(&mut out, &cursor)?;
            if !cursor.shift_child_loop() {
                break;
            }
        }
    }

    let void = brep.void_use_loops();
    if !void.is_empty() {
        writeln!(out, "void:")?;
        for ul in void {
            describe(&mut out, &brep.use_loop_cursor(ul)?)?;
        }
    }
    Ok(out)
}
