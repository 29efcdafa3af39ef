//! Input structure files handed to the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DockaffError, Result};

/// Which side of the complex a structure file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureRole {
    Receptor,
    Ligand,
}

impl fmt::Display for StructureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureRole::Receptor => write!(f, "receptor"),
            StructureRole::Ligand => write!(f, "ligand"),
        }
    }
}

/// A PDB file supplied by the caller. Never written to by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureFile {
    pub path: PathBuf,
    pub role: StructureRole,
}

impl StructureFile {
    pub fn new<P: AsRef<Path>>(path: P, role: StructureRole) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            role,
        }
    }

    pub fn receptor<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, StructureRole::Receptor)
    }

    pub fn ligand<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, StructureRole::Ligand)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fails with `MissingStructure` if the file is not on disk.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(DockaffError::MissingStructure {
                role: self.role,
                path: self.path.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(StructureRole::Receptor.to_string(), "receptor");
        assert_eq!(StructureRole::Ligand.to_string(), "ligand");
    }

    #[test]
    fn test_missing_structure_reports_role() {
        let s = StructureFile::ligand("/definitely/not/here.pdb");
        let err = s.ensure_exists().unwrap_err();
        assert!(matches!(err, DockaffError::MissingStructure { role: StructureRole::Ligand, .. }));
        assert!(err.to_string().starts_with("ligand structure not found"));
    }

    #[test]
    fn test_existing_structure_passes() {
        let file = std::env::temp_dir().join(format!("dockaff-structure-{}.pdb", std::process::id()));
        std::fs::write(&file, "END\n").unwrap();
        let s = StructureFile::receptor(&file);
        assert!(s.ensure_exists().is_ok());
        std::fs::remove_file(&file).unwrap();
    }
}
