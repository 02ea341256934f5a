//! Config loading through the facade.

#![cfg(feature = "config")]

use std::io::Write;

use relist::{Error, Recovery, load_config};

#[test]
fn picks_format_by_extension() {
    let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(json, r#"{{"gesture": {{"long_press_ms": 700}}}}"#).unwrap();
    assert_eq!(load_config(json.path()).unwrap().gesture.long_press_ms, 700);

    let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(toml, "[gesture]\nlong_press_ms = 600").unwrap();
    assert_eq!(load_config(toml.path()).unwrap().gesture.long_press_ms, 600);
}

#[test]
fn invalid_config_is_recoverable() {
    let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(toml, "[frame]\nmax_delta_ms = 0").unwrap();
    let err = load_config(toml.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(err.recovery(), Recovery::UseDefaults);
}
