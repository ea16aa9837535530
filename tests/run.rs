//! Integration tests for the `run` command.
use energy_burden::cli::{RunOpts, handle_run_command};
use energy_burden::fuel::Fuel;
use energy_burden::settings::Settings;
use energy_burden::units::MoneyPerUnit;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example dataset.
fn get_dataset_dir() -> PathBuf {
    PathBuf::from("demos/fairbanks")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("ENERGY_BURDEN_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        prices: vec![(Fuel::HeatingOil, MoneyPerUnit(5.0))],
    };
    handle_run_command(&get_dataset_dir(), &opts, Some(Settings::default())).unwrap();

    // The price given on the command line is used for the exported results
    let summary = std::fs::read_to_string(output_dir.join("summary.toml")).unwrap();
    let summary: toml::Table = toml::from_str(&summary).unwrap();
    assert_eq!(summary["prices"]["heating_oil"].as_float(), Some(5.0));
    assert_eq!(summary["prices"]["coal"].as_float(), Some(143.0));

    // Second time will fail because the logging is already initialised
    let opts = RunOpts {
        output_dir: Some(tempdir.path().join("results2")),
        ..RunOpts::default()
    };
    assert_eq!(
        handle_run_command(&get_dataset_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
