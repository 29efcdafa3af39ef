//! Binding affinity estimation using PRODIGY.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::extraction::Pose;

/// Gas constant in kcal/(mol·K).
pub const GAS_CONSTANT_KCAL: f64 = 0.001987;
/// Temperature PRODIGY reports ΔG at (25 °C), in kelvin.
pub const TEMPERATURE_K: f64 = 298.15;

/// Why a single pose could not be scored.
#[derive(Debug, Error)]
pub enum AffinityError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ExitStatus {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("predictor produced no output")]
    EmptyOutput,

    #[error("could not parse ΔG from {0:?}")]
    NonNumeric(String),

    #[error("Kd for ΔG = {0} kcal/mol is not a positive finite number")]
    KdOutOfRange(f64),
}

/// Predicted binding free energy and the dissociation constant derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BindingAffinity {
    /// ΔG in kcal/mol.
    pub delta_g: f64,
    /// Kd in mol/L.
    pub kd: f64,
}

impl BindingAffinity {
    /// Fails when Kd underflows to zero or overflows to infinity.
    pub fn from_delta_g(delta_g: f64) -> Result<Self, AffinityError> {
        let kd = dissociation_constant(delta_g);
        if !(kd.is_finite() && kd > 0.0) {
            return Err(AffinityError::KdOutOfRange(delta_g));
        }
        Ok(Self { delta_g, kd })
    }
}

/// Either an affinity or the reason there is none. Never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityOutcome {
    Estimated(BindingAffinity),
    Failed(String),
}

impl AffinityOutcome {
    pub fn affinity(&self) -> Option<&BindingAffinity> {
        match self {
            AffinityOutcome::Estimated(a) => Some(a),
            AffinityOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AffinityOutcome::Estimated(_) => None,
            AffinityOutcome::Failed(e) => Some(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AffinityOutcome::Estimated(_))
    }
}

impl From<Result<BindingAffinity, AffinityError>> for AffinityOutcome {
    fn from(result: Result<BindingAffinity, AffinityError>) -> Self {
        match result {
            Ok(affinity) => AffinityOutcome::Estimated(affinity),
            Err(e) => AffinityOutcome::Failed(e.to_string()),
        }
    }
}

/// Result of scoring one pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityEstimate {
    pub pose_index: usize,
    pub outcome: AffinityOutcome,
}

/// Kd = exp(ΔG / RT), from ΔG = RT·ln(Kd).
pub fn dissociation_constant(delta_g: f64) -> f64 {
    (delta_g / (GAS_CONSTANT_KCAL * TEMPERATURE_K)).exp()
}

/// Parse ΔG from PRODIGY's quiet output, e.g. `pose.1_model0 -15.228`.
///
/// The value is the last whitespace-separated token.
pub fn parse_delta_g(stdout: &str) -> Result<f64, AffinityError> {
    let token = stdout
        .split_whitespace()
        .next_back()
        .ok_or(AffinityError::EmptyOutput)?;

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AffinityError::NonNumeric(token.to_string())),
    }
}

/// Wrapper for the PRODIGY command line predictor.
pub struct ProdigyRunner {
    executable_path: PathBuf,
    selection: Vec<String>,
}

impl ProdigyRunner {
    /// Create a new ProdigyRunner with no chain selection.
    pub fn new<P: AsRef<Path>>(executable_path: P) -> Self {
        Self {
            executable_path: executable_path.as_ref().to_path_buf(),
            selection: Vec::new(),
        }
    }

    /// Chains forming each binding partner, e.g. `"J M"`. Each
    /// whitespace-separated group becomes its own `--selection` argument.
    pub fn with_selection(mut self, selection: &str) -> Self {
        self.selection = selection.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Score a single pose. Failures are captured in the returned estimate.
    pub async fn score(&self, pose: &Pose) -> AffinityEstimate {
        info!("Scoring pose {} ({:?})", pose.index, pose.path);
        let outcome = AffinityOutcome::from(self.predict(&pose.path).await);
        match &outcome {
            AffinityOutcome::Estimated(a) => {
                debug!("Pose {}: ΔG = {} kcal/mol, Kd = {:e} M", pose.index, a.delta_g, a.kd)
            }
            AffinityOutcome::Failed(e) => warn!("Pose {} could not be scored: {}", pose.index, e),
        }
        AffinityEstimate {
            pose_index: pose.index,
            outcome,
        }
    }

    /// Run PRODIGY on one complex and derive the binding affinity.
    pub async fn predict(&self, pdb_path: &Path) -> Result<BindingAffinity, AffinityError> {
        let mut cmd = Command::new(&self.executable_path);
        cmd.arg(pdb_path).arg("-q");
        if !self.selection.is_empty() {
            cmd.arg("--selection").args(&self.selection);
        }
        debug!("Executing command: {:?}", cmd.as_std());

        let output = cmd.output().await.map_err(|source| AffinityError::Launch {
            tool: self.executable_path.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(AffinityError::ExitStatus {
                tool: self.executable_path.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let delta_g = parse_delta_g(stdout.trim())?;
        BindingAffinity::from_delta_g(delta_g)
    }
}
