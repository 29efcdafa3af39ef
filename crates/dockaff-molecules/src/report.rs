//! Flat tabular export of per-pose results.

use dockaff_common::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::affinity::{AffinityEstimate, AffinityOutcome};
use crate::extraction::Pose;

/// CSV column headers, in order.
pub const HEADERS: [&str; 5] = ["pose", "pose_file", "dG (kcal/mol)", "Kd (M)", "error"];

/// One pose and what scoring made of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub pose_index: usize,
    pub pose_file: PathBuf,
    pub outcome: AffinityOutcome,
}

impl ResultRecord {
    pub fn new(pose: &Pose, estimate: AffinityEstimate) -> Self {
        debug_assert_eq!(pose.index, estimate.pose_index);
        Self {
            pose_index: pose.index,
            pose_file: pose.path.clone(),
            outcome: estimate.outcome,
        }
    }

    pub fn delta_g(&self) -> Option<f64> {
        self.outcome.affinity().map(|a| a.delta_g)
    }

    pub fn kd(&self) -> Option<f64> {
        self.outcome.affinity().map(|a| a.kd)
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }
}

/// CSV shape of a [`ResultRecord`]: unused columns are left empty.
#[derive(Debug, Serialize)]
struct Row<'a> {
    pose: usize,
    pose_file: String,
    delta_g: Option<f64>,
    kd: Option<f64>,
    error: Option<&'a str>,
}

impl<'a> From<&'a ResultRecord> for Row<'a> {
    fn from(record: &'a ResultRecord) -> Self {
        Row {
            pose: record.pose_index,
            pose_file: record.pose_file.display().to_string(),
            delta_g: record.delta_g(),
            kd: record.kd(),
            error: record.error(),
        }
    }
}

/// Write `records` as CSV. The header is written even when there are no rows.
pub fn write_csv<W: Write>(writer: W, records: &[ResultRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADERS)?;
    for record in records {
        wtr.serialize(Row::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to a CSV file at `path`, creating parent directories.
pub fn save_csv(path: &Path, records: &[ResultRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(file, records)?;
    info!("Wrote {} result rows to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affinity::BindingAffinity;

    fn record(index: usize, outcome: AffinityOutcome) -> ResultRecord {
        ResultRecord {
            pose_index: index,
            pose_file: PathBuf::from(format!("/out/pose.{}.pdb", index)),
            outcome,
        }
    }

    fn to_string(records: &[ResultRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_report_has_header_only() {
        assert_eq!(to_string(&[]), "pose,pose_file,dG (kcal/mol),Kd (M),error\n");
    }

    #[test]
    fn test_mixed_rows_leave_unused_columns_empty() {
        let records = vec![
            record(1, AffinityOutcome::Estimated(BindingAffinity { delta_g: -12.5, kd: 0.25 })),
            record(2, AffinityOutcome::Failed("predictor produced no output".into())),
        ];
        let csv = to_string(&records);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,/out/pose.1.pdb,-12.5,0.25,");
        assert_eq!(lines[2], "2,/out/pose.2.pdb,,,predictor produced no output");
    }

    #[test]
    fn test_rows_read_back_with_csv_reader() {
        let records = vec![
            record(1, AffinityOutcome::Estimated(BindingAffinity::from_delta_g(-15.228).unwrap())),
            record(2, AffinityOutcome::Failed("could not parse ΔG from \"x, y\"".into())),
        ];
        let csv = to_string(&records);

        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2].parse::<f64>().unwrap(), -15.228);
        assert!(rows[0][3].parse::<f64>().unwrap() > 0.0);
        assert_eq!(&rows[1][4], "could not parse ΔG from \"x, y\"");
        assert!(rows[1][2].is_empty() && rows[1][3].is_empty());
    }

    #[test]
    fn test_save_csv_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("docking_results.csv");
        save_csv(&path, &[]).unwrap();
        assert!(path.is_file());
    }
}
