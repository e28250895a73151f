//! `validate`: run the consistency validator on a stored graph.

use anyhow::{Context, Result};
use brep2d_kernel::BRep2d;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Graph file (JSON)
    pub file: PathBuf,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    // Reading already rejects inconsistent graphs; the explicit pass below
    // only reports on success.
    let brep = BRep2d::read_json(&args.file)
        .with_context(|| format!("{} is not a valid graph", args.file.display()))?;
    brep.validate()
        .with_context(|| format!("{} is inconsistent", args.file.display()))?;
    info!(
        vertices = brep.vertex_ids().len(),
        edges = brep.edge_ids().len(),
        loops = brep.loop_ids().len(),
        "graph is consistent"
    );
    println!("ok");
    Ok(())
}
