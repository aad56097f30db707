//! Integration tests for configuration and token storage
//!
//! These tests verify that the token file configured through the
//! environment is the one the storage reads and writes.

use common::{ClientConfig, FileTokenStorage, TokenStorage};
use serial_test::serial;

/// Test that a token path taken from the environment round-trips a token
#[test]
#[serial]
fn test_configured_token_path_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let token_path = dir.path().join("salon").join("token");

    unsafe { std::env::set_var("SALON_TOKEN_PATH", &token_path) };
    let config = ClientConfig::from_env()?;
    unsafe { std::env::remove_var("SALON_TOKEN_PATH") };

    assert_eq!(config.token_path, token_path);

    let storage = FileTokenStorage::new(&config.token_path);
    storage.store("header.payload.signature")?;

    // A second handle on the same file sees the stored token
    let reopened = FileTokenStorage::new(&config.token_path);
    assert_eq!(
        reopened.load()?,
        Some("header.payload.signature".to_string()),
        "Token was not persisted"
    );

    reopened.clear()?;
    assert_eq!(storage.load()?, None, "Token was not cleared");

    Ok(())
}
