//! dockaff Molecules - Protein-protein docking and affinity pipeline.
//!
//! This crate drives three external tools in sequence:
//! 1. Rigid-body docking (ZDOCK)
//! 2. Extraction of the top-ranked poses (`create.pl`)
//! 3. Binding affinity prediction per pose (PRODIGY)
//!
//! and collects the per-pose results into a CSV report.

pub mod docking;
pub mod extraction;
pub mod affinity;
pub mod report;
pub mod pipeline;

pub use affinity::{AffinityEstimate, AffinityOutcome, BindingAffinity, ProdigyRunner};
pub use docking::{DockingResultArtifact, ZdockRunner};
pub use extraction::{Pose, PoseExtractor, PoseNaming, WorkingDirGuard};
pub use pipeline::{DockingPipeline, PipelinePaths, PipelineReport, PipelineStage};
pub use report::ResultRecord;
