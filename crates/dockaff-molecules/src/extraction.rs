//! Pose extraction from ZDOCK output using `create.pl`.
//!
//! `create.pl` (and the `create_lig` binary it drives) only works when run from
//! its own installation directory and always writes `complex.<i>.pdb` into the
//! current directory. The extractor therefore switches the process working
//! directory for the duration of the run through [`WorkingDirGuard`], then
//! moves the generated complexes into the caller's output directory.

use dockaff_common::{DockaffError, Result, StructureFile};
use serde::{Deserialize, Serialize};
use std::env;
use std::io;
use std::path::{self, Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::docking::DockingResultArtifact;

/// Placeholder substituted with the pose rank in naming patterns.
pub const INDEX_PLACEHOLDER: &str = "{i}";

/// One extracted complex, relocated into the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    /// Position among the relocated poses, 1 = best. Contiguous from 1.
    pub index: usize,
    pub path: PathBuf,
}

/// File-name conventions on both sides of the relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseNaming {
    /// Name `create.pl` gives each complex, e.g. `complex.{i}.pdb`.
    pub source_pattern: String,
    /// Name the pose gets in the output directory, e.g. `pose.{i}.pdb`.
    pub dest_pattern: String,
}

impl Default for PoseNaming {
    fn default() -> Self {
        Self {
            source_pattern: "complex.{i}.pdb".to_string(),
            dest_pattern: "pose.{i}.pdb".to_string(),
        }
    }
}

impl PoseNaming {
    pub fn new(source_pattern: impl Into<String>, dest_pattern: impl Into<String>) -> Self {
        Self {
            source_pattern: source_pattern.into(),
            dest_pattern: dest_pattern.into(),
        }
    }

    pub fn source_name(&self, index: usize) -> String {
        self.source_pattern.replace(INDEX_PLACEHOLDER, &index.to_string())
    }

    pub fn dest_name(&self, index: usize) -> String {
        self.dest_pattern.replace(INDEX_PLACEHOLDER, &index.to_string())
    }

    /// Both patterns must contain the index placeholder, otherwise every pose
    /// would map onto the same file.
    pub fn validate(&self) -> Result<()> {
        for (name, pattern) in [("source", &self.source_pattern), ("destination", &self.dest_pattern)] {
            if !pattern.contains(INDEX_PLACEHOLDER) {
                return Err(DockaffError::Config(format!(
                    "{} pose pattern {:?} does not contain {}",
                    name, pattern, INDEX_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }
}

/// Switches the process working directory and switches it back on drop.
///
/// Restoration runs on every exit path, including early returns, `?` and
/// unwinding panics.
#[derive(Debug)]
pub struct WorkingDirGuard {
    original: PathBuf,
}

impl WorkingDirGuard {
    pub fn enter<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let original = env::current_dir()?;
        env::set_current_dir(dir).map_err(|source| DockaffError::WorkingDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        debug!("Entered {:?} (was {:?})", dir, original);
        Ok(Self { original })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        match env::set_current_dir(&self.original) {
            Ok(()) => debug!("Restored working directory {:?}", self.original),
            Err(e) => error!("Failed to restore working directory {:?}: {}", self.original, e),
        }
    }
}

/// Wrapper for the ZDOCK `create.pl` pose extraction script.
pub struct PoseExtractor {
    script_path: PathBuf,
    interpreter: Option<String>,
    naming: PoseNaming,
}

impl PoseExtractor {
    /// Create a new PoseExtractor running `script_path` through `perl`.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Self {
        Self {
            script_path: script_path.as_ref().to_path_buf(),
            interpreter: Some("perl".to_string()),
            naming: PoseNaming::default(),
        }
    }

    /// Interpreter used to run the script; `None` executes it directly.
    pub fn with_interpreter(mut self, interpreter: Option<String>) -> Self {
        self.interpreter = interpreter.filter(|i| !i.trim().is_empty());
        self
    }

    pub fn with_naming(mut self, naming: PoseNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Directory `create.pl` must run from.
    pub fn tool_dir(&self) -> io::Result<PathBuf> {
        let script = path::absolute(&self.script_path)?;
        Ok(script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/")))
    }

    /// Extract the top `num_poses` complexes into `output_dir`.
    ///
    /// Returns an empty set if `create.pl` cannot be started or exits
    /// non-zero; nothing is relocated in that case. A complex missing after a
    /// successful run is skipped with a warning. Returned indices are
    /// contiguous from 1 while file names keep the extraction rank.
    pub async fn extract(
        &self,
        artifact: &DockingResultArtifact,
        receptor: &StructureFile,
        ligand: &StructureFile,
        output_dir: &Path,
        num_poses: usize,
    ) -> Result<Vec<Pose>> {
        fs::create_dir_all(output_dir).await?;

        // Everything is resolved before the directory switch; relative paths
        // would otherwise point into the tool directory.
        let output_dir = path::absolute(output_dir)?;
        let script = path::absolute(&self.script_path)?;
        let zdock_out = path::absolute(artifact.path())?;
        let receptor_path = path::absolute(receptor.path())?;
        let ligand_path = path::absolute(ligand.path())?;
        let tool_dir = self.tool_dir()?;

        let _cwd = WorkingDirGuard::enter(&tool_dir)?;

        let mut cmd = match &self.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&script);
                cmd
            }
            None => Command::new(&script),
        };
        cmd.arg(&zdock_out)
            .arg(&receptor_path)
            .arg(&ligand_path)
            .arg(num_poses.to_string());

        info!("Executing command: {:?}", cmd.as_std());
        match cmd.status().await {
            Ok(status) if status.success() => {}
            Ok(status) => {
                error!("Pose extraction failed: {:?} exited with {}", script, status);
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("Pose extraction failed: could not launch {:?}: {}", script, e);
                return Ok(Vec::new());
            }
        }

        let mut poses = Vec::with_capacity(num_poses);
        for rank in 1..=num_poses {
            let source = tool_dir.join(self.naming.source_name(rank));
            let dest = output_dir.join(self.naming.dest_name(rank));

            if !source.is_file() {
                warn!(
                    "Expected file {:?} not found; skipping pose {}",
                    source, rank
                );
                continue;
            }

            relocate(&source, &dest).await?;
            debug!("Moved {:?} -> {:?}", source, dest);
            poses.push(Pose {
                index: poses.len() + 1,
                path: dest,
            });
        }

        info!("Extracted {} of {} requested poses", poses.len(), num_poses);
        Ok(poses)
    }
}

/// Move a file, falling back to copy + remove when a rename is not possible
/// (e.g. across filesystems).
async fn relocate(source: &Path, dest: &Path) -> io::Result<()> {
    if fs::rename(source, dest).await.is_ok() {
        return Ok(());
    }
    fs::copy(source, dest).await?;
    fs::remove_file(source).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_naming_matches_create_pl() {
        let naming = PoseNaming::default();
        assert_eq!(naming.source_name(3), "complex.3.pdb");
        assert_eq!(naming.dest_name(3), "pose.3.pdb");
        assert!(naming.validate().is_ok());
    }

    #[test]
    fn test_custom_naming() {
        let naming = PoseNaming::new("out_{i}.pdb", "model_{i}_of_run.pdb");
        assert_eq!(naming.source_name(10), "out_10.pdb");
        assert_eq!(naming.dest_name(1), "model_1_of_run.pdb");
    }

    #[test]
    fn test_naming_without_placeholder_is_rejected() {
        let naming = PoseNaming::new("complex.pdb", "pose.{i}.pdb");
        assert!(matches!(naming.validate(), Err(DockaffError::Config(_))));

        let naming = PoseNaming::new("complex.{i}.pdb", "pose.pdb");
        assert!(matches!(naming.validate(), Err(DockaffError::Config(_))));
    }

    #[test]
    fn test_blank_interpreter_runs_script_directly() {
        let extractor = PoseExtractor::new("/opt/zdock/create.pl").with_interpreter(Some("  ".into()));
        assert!(extractor.interpreter.is_none());

        let extractor = PoseExtractor::new("/opt/zdock/create.pl");
        assert_eq!(extractor.interpreter.as_deref(), Some("perl"));
    }

    #[test]
    fn test_tool_dir_is_script_parent() {
        let extractor = PoseExtractor::new("/opt/zdock/create.pl");
        assert_eq!(extractor.tool_dir().unwrap(), PathBuf::from("/opt/zdock"));
    }

    #[tokio::test]
    async fn test_relocate_moves_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("complex.1.pdb");
        let dst = dir.path().join("pose.1.pdb");
        std::fs::write(&src, "ATOM\n").unwrap();

        relocate(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "ATOM\n");
    }
}
