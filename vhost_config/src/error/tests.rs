//! Unit tests for error codes and operator-facing messages.

use rstest::rstest;

use std::sync::Arc;

use super::ConfigError;
use crate::ResultIntoFigment;

#[rstest]
#[case(ConfigError::missing_source("/srv/config/config.toml"), "config_file_missing")]
#[case(ConfigError::invalid_type("virtualhost", "string"), "config_bad_parameter")]
#[case(ConfigError::unknown_processor("rot13"), "config_unknown_processor")]
#[case(ConfigError::evaluation("quota", "boom"), "config_evaluation_failed")]
#[case(ConfigError::gathering(figment::Error::from("bad shape")), "config_file_invalid")]
fn codes_are_stable(#[case] err: ConfigError, #[case] code: &str) {
    assert_eq!(err.code(), code);
}

#[rstest]
#[case(ConfigError::missing_source("config/tenant.conf.toml"), "config/tenant.conf.toml")]
#[case(ConfigError::invalid_type("virtualhost", "string"), "virtualhost")]
#[case(ConfigError::unknown_processor("nonexistent"), "nonexistent")]
fn messages_name_the_culprit(#[case] err: ConfigError, #[case] detail: &str) {
    let text = err.to_string();
    assert!(text.contains(detail), "{text:?} should mention {detail:?}");
}

#[test]
fn serde_json_errors_become_gathering() {
    let Err(json_err) = serde_json::from_str::<u8>("\"nope\"") else {
        panic!("expected a type mismatch");
    };
    let err = ConfigError::from(json_err);
    assert!(matches!(err, ConfigError::Gathering(_)));
    assert!(err.to_string().contains("JSON error"));
}

#[test]
fn gathering_round_trips_into_figment() {
    let err = ConfigError::gathering(figment::Error::from("boom"));
    let figment_err = figment::Error::from(err);
    assert!(figment_err.to_string().contains("boom"));
}

#[rstest]
#[case::gathering(ConfigError::gathering(figment::Error::from("bad shape")), "bad shape")]
#[case::missing(ConfigError::missing_source("config/config.toml"), "File config/config.toml not found")]
fn shared_errors_convert_for_jails(#[case] err: ConfigError, #[case] expected: &str) {
    let result: Result<(), Arc<ConfigError>> = Err(err.shared());
    let converted = result.to_figment().expect_err("error is kept");
    assert_eq!(converted.to_string(), expected);
}

#[test]
fn still_shared_errors_keep_their_message() {
    let err = ConfigError::gathering(figment::Error::from("bad shape")).shared();
    let held = Arc::clone(&err);
    let converted = Err::<(), _>(err).to_figment().expect_err("error is kept");
    assert_eq!(converted.to_string(), held.to_string());
}
