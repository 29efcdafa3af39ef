//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Dock two proteins with ZDOCK, extract the top poses and score each with PRODIGY.
#[derive(Debug, Parser)]
#[command(name = "dockaff", version, about, long_about = None)]
pub struct Cli {
    /// Path to dockaff.toml (defaults to $DOCKAFF_CONFIG, then ./dockaff.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Receptor structure (PDB).
    #[arg(short, long)]
    pub receptor: Option<PathBuf>,

    /// Ligand structure (PDB).
    #[arg(short, long)]
    pub ligand: Option<PathBuf>,

    /// Number of top-ranked poses to extract and score.
    #[arg(short = 'n', long)]
    pub poses: Option<usize>,

    /// Directory extracted poses are moved into.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// CSV report destination.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Chains forming each binding partner, e.g. "A B".
    #[arg(long)]
    pub selection: Option<String>,

    /// Print the results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Command line values take precedence over file and environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(receptor) = &self.receptor {
            config.inputs.receptor = receptor.clone();
        }
        if let Some(ligand) = &self.ligand {
            config.inputs.ligand = ligand.clone();
        }
        if let Some(poses) = self.poses {
            config.extraction.num_poses = poses;
        }
        if let Some(dir) = &self.output_dir {
            config.extraction.output_dir = dir.clone();
        }
        if let Some(report) = &self.report {
            config.report.path = report.clone();
        }
        if let Some(selection) = &self.selection {
            config.affinity.selection = selection.clone();
        }
    }
}
