use clap::{Args, Command, FromArgMatches};
use slotforge::config::Config;
use slotforge::consts::{
    DEFAULT_CRITICAL_GAIN_PCT, DEFAULT_GAIN_THRESHOLD_PCT, DEFAULT_INERTIA_PENALTY,
    DEFAULT_MAX_REFINE_ITERATIONS, MAX_NEIGHBORHOOD_RADIUS,
};
use slotforge::error::SlotForgeError;
use slotforge::refine::RefineParams;
use std::io::Write;
use tempfile::NamedTempFile;

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let cmd = Config::augment_args(Command::new("slotforge-test"));
    let matches = cmd.try_get_matches_from(args).unwrap();
    let cfg = Config::from_arg_matches(&matches).unwrap();
    (cfg, matches)
}

#[test]
fn test_clap_defaults_match_default_impl() {
    let (cfg, _) = parse(&["t"]);
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.weights.affinity_weight, 0.0);
    assert_eq!(cfg.weights.inertia_penalty, DEFAULT_INERTIA_PENALTY);
    assert_eq!(cfg.thresholds.gain_threshold_pct, DEFAULT_GAIN_THRESHOLD_PCT);
    assert_eq!(cfg.thresholds.critical_gain_pct, DEFAULT_CRITICAL_GAIN_PCT);
    assert_eq!(cfg.search.max_refine_iterations, DEFAULT_MAX_REFINE_ITERATIONS);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{ "thresholds": {{ "gain_threshold_pct": 7.5 }}, "weights": {{ "affinity_weight": 0.4 }} }}"#
    )
    .unwrap();

    let cfg = Config::load_from_file(file.path()).unwrap();
    assert_eq!(cfg.thresholds.gain_threshold_pct, 7.5);
    assert_eq!(cfg.weights.affinity_weight, 0.4);
    assert_eq!(cfg.thresholds.critical_gain_pct, DEFAULT_CRITICAL_GAIN_PCT);
    assert_eq!(cfg.search, Config::default().search);
}

#[test]
fn test_cli_overrides_only_explicit_flags() {
    let mut file_cfg = Config::default();
    file_cfg.thresholds.gain_threshold_pct = 7.0;
    file_cfg.thresholds.critical_gain_pct = 40.0;

    let (cli_cfg, matches) = parse(&["t", "--critical-gain-pct", "80"]);
    file_cfg.merge_from_cli(&cli_cfg, &matches);

    assert_eq!(file_cfg.thresholds.critical_gain_pct, 80.0);
    // clap default for this flag must not clobber the file value
    assert_eq!(file_cfg.thresholds.gain_threshold_pct, 7.0);
}

#[test]
fn test_negative_values_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "weights": {{ "inertia_penalty": -5.0 }} }}"#).unwrap();
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, SlotForgeError::Config(_)));

    let mut cfg = Config::default();
    cfg.search.max_refine_iterations = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_malformed_json() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{ not json").unwrap();
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, SlotForgeError::Json(_)));
}

#[test]
fn test_missing_file() {
    let err = Config::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, SlotForgeError::Config(_)));
}

#[test]
fn test_refine_params_follow_config() {
    let (cfg, _) = parse(&[
        "t",
        "--affinity-weight",
        "2.5",
        "--neighborhood-radius",
        "1",
        "--max-cost-increase-pct",
        "4",
    ]);
    let params = RefineParams::from(&cfg);
    assert_eq!(params.affinity_weight, 2.5);
    assert_eq!(params.radius, 1);
    assert_eq!(params.max_cost_increase_pct, 4.0);
}

#[test]
fn test_oversized_radius_is_rejected() {
    let mut cfg = Config::default();
    cfg.search.neighborhood_radius = usize::MAX / 2;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, SlotForgeError::Config(_)));

    cfg.search.neighborhood_radius = MAX_NEIGHBORHOOD_RADIUS;
    assert!(cfg.validate().is_ok());
}
