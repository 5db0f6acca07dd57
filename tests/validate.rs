//! Integration tests for the `validate` command.
use plantqc::cli::handle_validate_command;
use plantqc::log::is_logger_initialised;
use plantqc::settings::Settings;
use std::path::PathBuf;

/// Get the path to the demo dataset.
fn get_input_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("PLANTQC_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_input_dir(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
