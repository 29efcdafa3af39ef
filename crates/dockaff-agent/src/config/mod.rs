//! Configuration loading for dockaff.
//! Reads dockaff.toml from the current directory or the path in DOCKAFF_CONFIG,
//! after loading a `.env` file if one is present.

use dockaff_common::{DockaffError, Result, StructureFile};
use dockaff_molecules::{
    DockingPipeline, PipelinePaths, PoseExtractor, PoseNaming, ProdigyRunner, ZdockRunner,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "DOCKAFF_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dockaff.toml";

/// Env vars that override `extraction.script`, in priority order.
pub const SCRIPT_ENV: [&str; 2] = ["CREATE_PL_PATH", "create_pl_path"];
/// Env vars that override `extraction.output_dir`, in priority order.
pub const OUTPUT_DIR_ENV: [&str; 2] = ["OUTPUT_DIR", "output_dir"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub docking: DockingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub affinity: AffinityConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    #[serde(default = "default_receptor")]
    pub receptor: PathBuf,
    #[serde(default = "default_ligand")]
    pub ligand: PathBuf,
}

fn default_receptor() -> PathBuf { PathBuf::from("5SX4_EGFR_no.pdb") }
fn default_ligand()   -> PathBuf { PathBuf::from("5SX4_antibody_no.pdb") }

impl Default for InputsConfig {
    fn default() -> Self {
        Self { receptor: default_receptor(), ligand: default_ligand() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockingConfig {
    #[serde(default = "default_zdock")]
    pub executable: PathBuf,
    #[serde(default = "default_zdock_output")]
    pub output: PathBuf,
}

fn default_zdock()        -> PathBuf { PathBuf::from("./zdock") }
fn default_zdock_output() -> PathBuf { PathBuf::from("zdock_out3.txt") }

impl Default for DockingConfig {
    fn default() -> Self {
        Self { executable: default_zdock(), output: default_zdock_output() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Path to `create.pl`. Required.
    #[serde(default)]
    pub script: PathBuf,
    /// Interpreter for the script; empty runs it directly.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Where poses end up. Required.
    #[serde(default)]
    pub output_dir: PathBuf,
    #[serde(default = "default_num_poses")]
    pub num_poses: usize,
    #[serde(default = "default_source_pattern")]
    pub source_pattern: String,
    #[serde(default = "default_dest_pattern")]
    pub dest_pattern: String,
}

fn default_interpreter()    -> String { "perl".to_string() }
fn default_num_poses()      -> usize  { 5 }
fn default_source_pattern() -> String { PoseNaming::default().source_pattern }
fn default_dest_pattern()   -> String { PoseNaming::default().dest_pattern }

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::new(),
            interpreter: default_interpreter(),
            output_dir: PathBuf::new(),
            num_poses: default_num_poses(),
            source_pattern: default_source_pattern(),
            dest_pattern: default_dest_pattern(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinityConfig {
    #[serde(default = "default_prodigy")]
    pub executable: PathBuf,
    /// Chain groups passed to `--selection`, e.g. "J M".
    #[serde(default = "default_selection")]
    pub selection: String,
}

fn default_prodigy()   -> PathBuf { PathBuf::from("prodigy") }
fn default_selection() -> String  { "J M".to_string() }

impl Default for AffinityConfig {
    fn default() -> Self {
        Self { executable: default_prodigy(), selection: default_selection() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
}

fn default_report_path() -> PathBuf { PathBuf::from("docking_results.csv") }

impl Default for ReportConfig {
    fn default() -> Self {
        Self { path: default_report_path() }
    }
}

#[cfg(test)]
mod tests;

impl Config {
    /// Load configuration, honouring `.env`, DOCKAFF_CONFIG and the
    /// CREATE_PL_PATH / OUTPUT_DIR overrides.
    ///
    /// An explicit path (argument or DOCKAFF_CONFIG) must exist; a missing
    /// `./dockaff.toml` just means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {:?}", path),
            Err(e) => debug!("No .env loaded: {e}"),
        }

        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match std::env::var(CONFIG_ENV) {
                Ok(p) => (PathBuf::from(p), true),
                Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        let mut config = Self::read(&path, required)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML file, falling back to defaults when it is absent and not
    /// `required`.
    pub fn read(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return Err(DockaffError::Config(format!("Config file not found: {}", path.display())));
            }
            info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };
        if let Some(script) = first(&SCRIPT_ENV) {
            self.extraction.script = PathBuf::from(script);
        }
        if let Some(dir) = first(&OUTPUT_DIR_ENV) {
            self.extraction.output_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.script.as_os_str().is_empty() {
            return Err(DockaffError::Config(
                "extraction.script is not set (set CREATE_PL_PATH or extraction.script in dockaff.toml)".to_string(),
            ));
        }
        if self.extraction.output_dir.as_os_str().is_empty() {
            return Err(DockaffError::Config(
                "extraction.output_dir is not set (set OUTPUT_DIR or extraction.output_dir in dockaff.toml)".to_string(),
            ));
        }
        self.pose_naming().validate()
    }

    pub fn pose_naming(&self) -> PoseNaming {
        PoseNaming::new(&self.extraction.source_pattern, &self.extraction.dest_pattern)
    }

    pub fn receptor(&self) -> StructureFile {
        StructureFile::receptor(&self.inputs.receptor)
    }

    pub fn ligand(&self) -> StructureFile {
        StructureFile::ligand(&self.inputs.ligand)
    }

    pub fn build_pipeline(&self) -> DockingPipeline {
        DockingPipeline::new(
            ZdockRunner::new(&self.docking.executable),
            PoseExtractor::new(&self.extraction.script)
                .with_interpreter(Some(self.extraction.interpreter.clone()))
                .with_naming(self.pose_naming()),
            ProdigyRunner::new(&self.affinity.executable).with_selection(&self.affinity.selection),
            PipelinePaths::new(
                &self.docking.output,
                &self.extraction.output_dir,
                &self.report.path,
            ),
        )
    }
}
