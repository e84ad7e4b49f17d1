//! Configuration Error Tests.
//!
//! Verifies the rendered messages of `ConfigError` and that parse failures
//! keep their `serde_json` source.

use std::error::Error;
use std::path::PathBuf;

use dcpt_core::common::ConfigError;

/// Zero-valued fields name the offending key.
#[test]
fn test_zero_message_names_field() {
    let err = ConfigError::Zero {
        field: "dcpt.table_size",
    };
    assert_eq!(err.to_string(), "dcpt.table_size must be non-zero");
}

/// Structural constraint messages carry the configured values.
#[test]
fn test_constraint_messages() {
    assert_eq!(
        ConfigError::BlockSize(48).to_string(),
        "block size 48 is not a power of two"
    );
    assert_eq!(
        ConfigError::MaskedBits { masked: 22, bits: 22 }.to_string(),
        "masked bits 22 must be below delta width 22"
    );
    assert_eq!(
        ConfigError::DeltaBits { bits: 31, max: 30 }.to_string(),
        "delta width 31 outside 1..=30"
    );
}

/// I/O failures report the path and expose the underlying error.
#[test]
fn test_io_error_has_source() {
    let err = ConfigError::Io {
        path: PathBuf::from("/nonexistent/prefetch.json"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert!(err.to_string().contains("/nonexistent/prefetch.json"));
    assert!(err.source().is_some());
}

/// `serde_json` errors convert into `Parse`.
#[test]
fn test_parse_error_from_serde() {
    let json_err = serde_json::from_str::<u32>("{").unwrap_err();
    let err: ConfigError = json_err.into();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("malformed config"));
}
