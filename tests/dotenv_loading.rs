// tests/dotenv_loading.rs

use std::error::Error;

use storyboard::config::load_dotenv_from;
use storyboard::logging::{LOG_ENV_VAR, resolve_level};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn env_file_sets_log_level_before_logging_starts() -> TestResult {
    if std::env::var(LOG_ENV_VAR).is_ok() {
        // An inherited value wins over the file; nothing to check here.
        return Ok(());
    }
    let tmp = tempfile::tempdir()?;
    let env_file = tmp.path().join(".env");
    std::fs::write(&env_file, format!("{LOG_ENV_VAR}=debug\n"))?;

    load_dotenv_from(&env_file)?;

    let level = resolve_level(None, std::env::var(LOG_ENV_VAR).ok().as_deref());
    assert_eq!(level, tracing::Level::DEBUG);
    Ok(())
}

#[test]
fn missing_env_file_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(load_dotenv_from(&tmp.path().join(".env")).is_err());
}
