mod common;

use common::{sample_symbols, DumpBuilder};
use encoding_rs::UTF_16LE;
use pprof_calltree::commands::{execute_analyze, validate_args, validate_report_file, AnalyzeArgs};
use pprof_calltree::flamegraph::FlamegraphConfig;
use pprof_calltree::output::read_report;
use std::path::PathBuf;

#[test]
fn test_validate_args_valid() {
    let args = AnalyzeArgs {
        file: PathBuf::from("cpu.pprof"),
        encoding: "windows-1252".to_string(),
        top: 50,
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_defaults_need_file() {
    assert!(validate_args(&AnalyzeArgs::default()).is_err());
}

#[test]
fn test_validate_args_bad_charset() {
    let args = AnalyzeArgs {
        file: PathBuf::from("cpu.pprof"),
        encoding: "no-such-charset".to_string(),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_analyze_end_to_end() {
    let dump = sample_symbols()
        .sample(5, &[0x30, 0x20, 0x10])
        .sample(3, &[0x20, 0x10])
        .sample(2, &[0x40, 0x10])
        .write_temp();
    let out_dir = tempfile::tempdir().unwrap();
    let json_path = out_dir.path().join("report.json");
    let svg_path = out_dir.path().join("svg/flamegraph.svg");

    let args = AnalyzeArgs {
        file: dump.path().to_path_buf(),
        print_tree: true,
        print_hot: true,
        top: 2,
        output_json: Some(json_path.clone()),
        output_svg: Some(svg_path.clone()),
        flamegraph_config: Some(FlamegraphConfig::new().with_title("e2e")),
        ..Default::default()
    };
    validate_args(&args).unwrap();

    let report = execute_analyze(args).unwrap();

    assert_eq!(report.total_samples, 10);
    assert_eq!(report.sample_count, 3);
    assert_eq!(report.hot_methods.len(), 2);
    assert_eq!(report.hot_methods[0].location, "bar");
    assert_eq!(report.hot_paths.len(), 2);
    assert_eq!(report.hot_paths[0].stack, "main;foo;bar");

    let loaded = read_report(&json_path).unwrap();
    assert_eq!(loaded.call_tree, report.call_tree);
    assert!(validate_report_file(&json_path).is_ok());

    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_analyze_utf16_dump() {
    let dump = DumpBuilder::new()
        .encoding(UTF_16LE)
        .symbol(0x10, "main")
        .sample(4, &[0x10])
        .write_temp();

    let args = AnalyzeArgs {
        file: dump.path().to_path_buf(),
        encoding: "UTF-16LE".to_string(),
        ..Default::default()
    };

    let report = execute_analyze(args).unwrap();

    assert_eq!(report.encoding, "UTF-16LE");
    assert_eq!(report.total_samples, 4);
}

#[test]
fn test_analyze_without_samples_skips_flamegraph() {
    let dump = sample_symbols().write_temp();
    let out_dir = tempfile::tempdir().unwrap();
    let svg_path = out_dir.path().join("flamegraph.svg");

    let args = AnalyzeArgs {
        file: dump.path().to_path_buf(),
        output_svg: Some(svg_path.clone()),
        ..Default::default()
    };

    let report = execute_analyze(args).unwrap();

    assert_eq!(report.total_samples, 0);
    assert!(!svg_path.exists());
}

#[test]
fn test_analyze_corrupt_dump() {
    let dump = sample_symbols().signature([0, 4, 0, 1, 0]).write_temp();

    let args = AnalyzeArgs {
        file: dump.path().to_path_buf(),
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();
    assert!(format!("{:#}", err).contains("signature"));
}

#[test]
fn test_validate_report_file_missing() {
    let dir = tempfile::tempdir().unwrap();

    assert!(validate_report_file(&dir.path().join("missing.json")).is_err());
}
