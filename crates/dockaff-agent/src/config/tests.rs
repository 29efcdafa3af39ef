use super::*;
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_defaults_match_reference_run() {
    let config = Config::default();
    assert_eq!(config.inputs.receptor, PathBuf::from("5SX4_EGFR_no.pdb"));
    assert_eq!(config.docking.executable, PathBuf::from("./zdock"));
    assert_eq!(config.docking.output, PathBuf::from("zdock_out3.txt"));
    assert_eq!(config.extraction.num_poses, 5);
    assert_eq!(config.extraction.interpreter, "perl");
    assert_eq!(config.affinity.selection, "J M");
    assert_eq!(config.report.path, PathBuf::from("docking_results.csv"));
    assert_eq!(config.pose_naming(), PoseNaming::default());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = Config::from_toml_str(
        r#"
        [extraction]
        script = "/opt/zdock/create.pl"
        num_poses = 10

        [affinity]
        selection = "A B"
        "#,
    )
    .unwrap();

    assert_eq!(config.extraction.script, PathBuf::from("/opt/zdock/create.pl"));
    assert_eq!(config.extraction.num_poses, 10);
    assert_eq!(config.extraction.source_pattern, "complex.{i}.pdb");
    assert_eq!(config.affinity.selection, "A B");
    assert_eq!(config.affinity.executable, PathBuf::from("prodigy"));
    assert_eq!(config.docking.output, PathBuf::from("zdock_out3.txt"));
}

#[test]
fn test_invalid_toml_is_reported() {
    let err = Config::from_toml_str("[extraction]\nnum_poses = \"many\"").unwrap_err();
    assert!(matches!(err, DockaffError::Toml(_)));
}

#[test]
fn test_env_overrides_paths() {
    let mut config = Config::default();
    config.apply_env(env_of(&[
        ("create_pl_path", "/legacy/create.pl"),
        ("CREATE_PL_PATH", "/opt/zdock/create.pl"),
        ("output_dir", "/data/poses"),
    ]));

    assert_eq!(config.extraction.script, PathBuf::from("/opt/zdock/create.pl"));
    assert_eq!(config.extraction.output_dir, PathBuf::from("/data/poses"));
}

#[test]
fn test_blank_env_value_is_ignored() {
    let mut config = Config::from_toml_str("[extraction]\noutput_dir = \"poses\"").unwrap();
    config.apply_env(env_of(&[("OUTPUT_DIR", "  ")]));
    assert_eq!(config.extraction.output_dir, PathBuf::from("poses"));
}

#[test]
fn test_validate_requires_script_and_output_dir() {
    let mut config = Config::default();
    assert!(matches!(config.validate(), Err(DockaffError::Config(msg)) if msg.contains("extraction.script")));

    config.extraction.script = PathBuf::from("/opt/zdock/create.pl");
    assert!(matches!(config.validate(), Err(DockaffError::Config(msg)) if msg.contains("extraction.output_dir")));

    config.extraction.output_dir = PathBuf::from("poses");
    assert!(config.validate().is_ok());

    config.extraction.dest_pattern = "pose.pdb".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_read_missing_optional_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::read(&dir.path().join("dockaff.toml"), false).unwrap();
    assert_eq!(config.extraction.num_poses, 5);
}

#[test]
fn test_read_missing_required_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::read(&dir.path().join("custom.toml"), true).unwrap_err();
    assert!(matches!(err, DockaffError::Config(msg) if msg.starts_with("Config file not found")));
}

#[test]
fn test_read_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dockaff.toml");
    std::fs::write(&path, "[report]\npath = \"out/results.csv\"\n").unwrap();

    let config = Config::read(&path, true).unwrap();
    assert_eq!(config.report.path, PathBuf::from("out/results.csv"));
}

#[test]
fn test_build_pipeline_uses_configured_paths() {
    let mut config = Config::default();
    config.extraction.output_dir = PathBuf::from("/data/poses");
    config.report.path = PathBuf::from("/data/results.csv");

    let pipeline = config.build_pipeline();
    assert_eq!(pipeline.paths().pose_dir, PathBuf::from("/data/poses"));
    assert_eq!(pipeline.paths().report, PathBuf::from("/data/results.csv"));
    assert_eq!(pipeline.paths().docking_output, PathBuf::from("zdock_out3.txt"));
}
