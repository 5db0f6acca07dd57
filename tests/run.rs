//! Integration tests for the `run` command.
use plantqc::cli::{RunOpts, handle_run_command};
use plantqc::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the demo dataset.
fn get_input_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("PLANTQC_LOG_LEVEL", "off") };

    {
        // Save results to non-existent directory to check that directory creation works
        let tempdir = tempdir().unwrap();
        let output_dir = tempdir.path().join("results");
        let opts = RunOpts {
            output_dir: Some(output_dir.clone()),
            overwrite: false,
        };
        handle_run_command(&get_input_dir(), &opts, Some(Settings::default())).unwrap();
        for file_name in ["heat_rate_table.csv", "plant_summary.csv", "metadata.toml"] {
            assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
        }
    }

    // Second time will fail because the logging is already initialised
    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        overwrite: false,
    };
    assert_eq!(
        handle_run_command(&get_input_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
