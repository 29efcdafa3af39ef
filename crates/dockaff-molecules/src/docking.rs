//! Rigid-body protein-protein docking using ZDOCK.

use dockaff_common::{DockaffError, Result, StructureFile};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Ranked-transformation file written by the docking engine.
#[derive(Debug, Clone)]
pub struct DockingResultArtifact {
    pub path: PathBuf,
    pub exit_status: ExitStatus,
}

impl DockingResultArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn succeeded(&self) -> bool {
        self.exit_status.success()
    }
}

/// Wrapper for ZDOCK execution.
pub struct ZdockRunner {
    executable_path: PathBuf,
}

impl ZdockRunner {
    /// Create a new ZdockRunner.
    pub fn new<P: AsRef<Path>>(executable_path: P) -> Self {
        Self {
            executable_path: executable_path.as_ref().to_path_buf(),
        }
    }

    /// Dock `ligand` against `receptor`, writing the ranked output to `out`.
    ///
    /// A non-zero exit from ZDOCK is logged and recorded on the artifact but
    /// is not an error; whether the output is usable is left to extraction.
    /// Only a failure to start the process is an error.
    pub async fn run(
        &self,
        receptor: &StructureFile,
        ligand: &StructureFile,
        out: &Path,
    ) -> Result<DockingResultArtifact> {
        info!("Running ZDOCK: {:?} + {:?}", receptor.path(), ligand.path());

        let status = Command::new(&self.executable_path)
            .arg("-R")
            .arg(receptor.path())
            .arg("-L")
            .arg(ligand.path())
            .arg("-o")
            .arg(out)
            .status()
            .await
            .map_err(|source| DockaffError::ToolLaunch {
                tool: self.executable_path.display().to_string(),
                source,
            })?;

        if status.success() {
            debug!("ZDOCK completed successfully. Output in {:?}", out);
        } else {
            warn!("ZDOCK exited with {}; continuing with {:?}", status, out);
        }

        Ok(DockingResultArtifact {
            path: out.to_path_buf(),
            exit_status: status,
        })
    }
}
