//! Orchestrator for the docking pipeline: Dock -> Extract -> Score -> Report.

use dockaff_common::{Result, StructureFile};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, Instrument};

use crate::affinity::ProdigyRunner;
use crate::docking::{DockingResultArtifact, ZdockRunner};
use crate::extraction::{Pose, PoseExtractor};
use crate::report::{self, ResultRecord};

/// The pipeline's stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Dock,
    Extract,
    Score,
    Report,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Dock,
        PipelineStage::Extract,
        PipelineStage::Score,
        PipelineStage::Report,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PipelineStage::Dock => "dock",
            PipelineStage::Extract => "extract",
            PipelineStage::Score => "score",
            PipelineStage::Report => "report",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a single run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub records: Vec<ResultRecord>,
    pub report_path: PathBuf,
}

impl PipelineReport {
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }
}

/// Paths that are fixed for the lifetime of a pipeline.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    /// Where ZDOCK writes its ranked output.
    pub docking_output: PathBuf,
    /// Where extracted poses are moved to.
    pub pose_dir: PathBuf,
    /// CSV report destination.
    pub report: PathBuf,
}

impl PipelinePaths {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
        docking_output: P,
        pose_dir: Q,
        report: R,
    ) -> Self {
        Self {
            docking_output: docking_output.as_ref().to_path_buf(),
            pose_dir: pose_dir.as_ref().to_path_buf(),
            report: report.as_ref().to_path_buf(),
        }
    }
}

pub struct DockingPipeline {
    docking: ZdockRunner,
    extractor: PoseExtractor,
    predictor: ProdigyRunner,
    paths: PipelinePaths,
}

impl DockingPipeline {
    pub fn new(
        docking: ZdockRunner,
        extractor: PoseExtractor,
        predictor: ProdigyRunner,
        paths: PipelinePaths,
    ) -> Self {
        Self {
            docking,
            extractor,
            predictor,
            paths,
        }
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Run every stage for one receptor/ligand pair.
    pub async fn run(
        &self,
        receptor: &StructureFile,
        ligand: &StructureFile,
        num_poses: usize,
    ) -> Result<PipelineReport> {
        receptor.ensure_exists()?;
        ligand.ensure_exists()?;

        info!("[1] Running ZDOCK...");
        let artifact = self
            .dock(receptor, ligand)
            .instrument(info_span!("pipeline_stage", stage = %PipelineStage::Dock))
            .await?;

        info!("[2] Extracting poses...");
        let poses = self
            .extract(&artifact, receptor, ligand, num_poses)
            .instrument(info_span!("pipeline_stage", stage = %PipelineStage::Extract))
            .await?;

        info!("[3] Scoring poses with PRODIGY...");
        let records = self
            .score(&poses)
            .instrument(info_span!("pipeline_stage", stage = %PipelineStage::Score))
            .await;

        let _span = info_span!("pipeline_stage", stage = %PipelineStage::Report).entered();
        let report_path = self.report(&records)?;
        let report = PipelineReport {
            records,
            report_path,
        };
        info!(
            "Docking complete. {} poses scored ({} failed). Results saved to {:?}",
            report.records.len(),
            report.failed(),
            report.report_path
        );

        Ok(report)
    }

    pub async fn dock(
        &self,
        receptor: &StructureFile,
        ligand: &StructureFile,
    ) -> Result<DockingResultArtifact> {
        self.docking
            .run(receptor, ligand, &self.paths.docking_output)
            .await
    }

    pub async fn extract(
        &self,
        artifact: &DockingResultArtifact,
        receptor: &StructureFile,
        ligand: &StructureFile,
        num_poses: usize,
    ) -> Result<Vec<Pose>> {
        self.extractor
            .extract(artifact, receptor, ligand, &self.paths.pose_dir, num_poses)
            .await
    }

    /// Score poses one at a time in index order. Never fails as a whole.
    pub async fn score(&self, poses: &[Pose]) -> Vec<ResultRecord> {
        let mut records = Vec::with_capacity(poses.len());
        for pose in poses {
            info!("   -> Pose {}", pose.index);
            let estimate = self.predictor.score(pose).await;
            records.push(ResultRecord::new(pose, estimate));
        }
        records
    }

    pub fn report(&self, records: &[ResultRecord]) -> Result<PathBuf> {
        report::save_csv(&self.paths.report, records)?;
        Ok(self.paths.report.clone())
    }
}
