use std::fs;
use std::path::Path;

use qqq_core::QqqError;
use qqq_table::{run, Artifact, RunConfig};
use serde_json::Value;
use tempfile::tempdir;

const SINGLE_SITE: &str = "1
2
1 2 1 0 0 0 1.0 0.0
2 1 1 0 0 0 0.5 0.0
";

const SINGLY_DISPLACED: &str = "2
1
1 1 1 0 0 3 0.7071 0
1
1 1 1 0 0 -3 -0.7071 0
";

const OPERATOR_LIST: &str = "<G1>
SS 0
SD 0 1
DDI
";

const CONFIG: &str = "
lattice: [8, 8, 8, 16]
displacement_lengths: [1, 2]
channels: [G1g]
operator_list: ops.in
projection_dir: proj
solution_files:
  stub: sol
  legs:
    - {time: 2}
    - {time: 1}
    - {time: 1, spin: 2}
output:
  artifact: out/assembly.txt
  channel_list: out/channels.txt
  operator_names: out/names.txt
  summary: out/summary.json
";

fn write_inputs(root: &Path) {
    let tables = root.join("proj").join("G1g");
    fs::create_dir_all(&tables).unwrap();
    fs::write(tables.join("Single_Site"), SINGLE_SITE).unwrap();
    fs::write(tables.join("Singly_Displaced"), SINGLY_DISPLACED).unwrap();
    fs::write(root.join("ops.in"), OPERATOR_LIST).unwrap();
    fs::write(root.join("run.yaml"), CONFIG).unwrap();
}

#[test]
fn run_writes_artifact_and_side_files() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let config = RunConfig::load(&dir.path().join("run.yaml")).unwrap();
    let outcome = run(&config).unwrap();

    assert_eq!(outcome.summary.expected_operators, 5);
    assert_eq!(outcome.summary.distinct_operators, 5);
    assert_eq!(outcome.summary.distinct_keys, 6);
    assert_eq!(outcome.summary.contributions, 6);
    assert_eq!(outcome.summary.solution_files, 5);

    let text = fs::read_to_string(dir.path().join("out/assembly.txt")).unwrap();
    let parsed = Artifact::parse(&text).unwrap();
    assert_eq!(parsed, outcome.artifact);
    assert_eq!(parsed.header.lattice, [8, 8, 8, 16]);
    assert_eq!(parsed.header.dilution, [2, 1, 2]);
    assert_eq!(parsed.solution_files[4], "sol3_t0_s1.lime");

    let names = fs::read_to_string(dir.path().join("out/names.txt")).unwrap();
    let lines: Vec<&str> = names.lines().collect();
    assert_eq!(lines[0], "5");
    assert_eq!(lines[1], "0 G1g_L0_SS_0");
    assert_eq!(lines[5], "4 G1g_L2_SD_1");

    let channels = fs::read_to_string(dir.path().join("out/channels.txt")).unwrap();
    let lines: Vec<&str> = channels.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines.contains(&"G1g_L2_SD_1 -0.7071 0 1 1 1 0 0 -3 2"));
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(sorted, lines);

    let summary: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["distinct_keys"], 6);
    assert_eq!(summary["key_order"], "ascending");
    assert_eq!(
        summary["artifact_digest"].as_str().unwrap(),
        qqq_table::text_digest(&text)
    );
}

#[test]
fn repeated_runs_produce_identical_artifacts() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let config = RunConfig::load(&dir.path().join("run.yaml")).unwrap();
    let first = run(&config).unwrap();
    let second = run(&config).unwrap();
    assert_eq!(first.artifact_text(), second.artifact_text());
    assert_eq!(first.summary.config_hash, second.summary.config_hash);
}

#[test]
fn channel_without_operator_list_is_rejected() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let mut config = RunConfig::load(&dir.path().join("run.yaml")).unwrap();
    config.channels.push(qqq_proj::Channel::new("Hg").unwrap());
    let err = run(&config).unwrap_err();
    assert!(matches!(err, QqqError::Config(ref info) if info.code == "operator-lists"));
}

#[test]
fn missing_projection_file_reports_io_error() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    fs::remove_file(dir.path().join("proj/G1g/Singly_Displaced")).unwrap();
    let config = RunConfig::load(&dir.path().join("run.yaml")).unwrap();
    let err = run(&config).unwrap_err();
    assert!(matches!(err, QqqError::Io(_)));
    assert!(!dir.path().join("out/assembly.txt").exists());
}

#[test]
fn inline_operator_lists_work_without_a_list_file() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let mut config = RunConfig::load(&dir.path().join("run.yaml")).unwrap();
    config.operator_list = None;
    config.operators = serde_yaml::from_str("G1:\n  SS: [0]\n").unwrap();
    let outcome = run(&config).unwrap();
    assert_eq!(outcome.summary.distinct_operators, 1);
    assert_eq!(outcome.summary.distinct_keys, 2);
}

fn base_config() -> RunConfig {
    RunConfig::from_yaml("channels: [G1g]\noperators: {G1: {SS: [0]}}\n").unwrap()
}

fn rejected_with(code: &str, mutate: impl FnOnce(&mut RunConfig)) {
    let mut config = base_config();
    mutate(&mut config);
    let err = config.validate().unwrap_err();
    assert_eq!(err.info().code, code);
}

#[test]
fn validation_catches_unusable_configs() {
    assert!(base_config().validate().is_ok());
    rejected_with("channels", |c| c.channels.clear());
    rejected_with("channels", |c| {
        let first = c.channels[0].clone();
        c.channels.push(first);
    });
    rejected_with("displacement-lengths", |c| c.displacement_lengths.clear());
    rejected_with("lattice", |c| c.lattice[3] = 0);
    rejected_with("ordering", |c| c.sink_orderings.clear());
    rejected_with("operator-lists", |c| c.operators = Default::default());
    rejected_with("dilution", |c| c.solution_files.legs[0].time = 0);
}

#[test]
fn missing_yaml_fields_fall_back_to_defaults() {
    let config = RunConfig::from_yaml("channels: [Hu]\n").unwrap();
    assert_eq!(config.lattice, [4, 4, 4, 8]);
    assert_eq!(config.displacement_lengths, vec![1]);
    assert_eq!(config.solution_files.extension, ".lime");
    assert!(RunConfig::from_yaml("channels: [Hx]\n").is_err());
}
