// tests/settle.rs

mod common;

use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::with_timeout;
use storyboard::types::{SOURCE_FILE, STORY_FILE};
use storyboard::watch::{SettleOutcome, SettlePolicy, settle_project};
use storyboard_test_utils::builders::write_project;
use storyboard_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn fast(max_checks: u32) -> SettlePolicy {
    SettlePolicy {
        interval: Duration::from_millis(20),
        max_checks,
    }
}

#[tokio::test]
async fn stable_project_is_ready() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let dir = write_project(tmp.path(), "fox", "A fox runs.");

    match with_timeout(settle_project(&dir, &fast(5))).await {
        SettleOutcome::Ready(project) => {
            assert_eq!(project.name(), "fox");
            assert_eq!(project.story_path(), dir.join(STORY_FILE));
            assert_eq!(project.source_path(), dir.join(SOURCE_FILE));
        }
        other => panic!("Expected Ready, got: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn project_without_source_is_incomplete() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("fox");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join(STORY_FILE), "A fox runs.")?;

    let outcome = with_timeout(settle_project(&dir, &fast(5))).await;
    assert_eq!(outcome, SettleOutcome::Incomplete);
    Ok(())
}

#[tokio::test]
async fn growing_file_is_unstable_until_it_stops() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let dir = write_project(tmp.path(), "fox", "A fox");

    let story = dir.join(STORY_FILE);
    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let stop = stop.clone();
        std::thread::spawn(move || {
            let mut f = std::fs::OpenOptions::new().append(true).open(&story).unwrap();
            while !stop.load(Ordering::SeqCst) {
                f.write_all(b" runs").unwrap();
                std::thread::yield_now();
            }
        })
    };

    let policy = SettlePolicy {
        interval: Duration::from_millis(30),
        max_checks: 3,
    };
    let outcome = with_timeout(settle_project(&dir, &policy)).await;
    assert_eq!(outcome, SettleOutcome::Unstable);

    stop.store(true, Ordering::SeqCst);
    writer.join().unwrap();
    let outcome = with_timeout(settle_project(&dir, &fast(5))).await;
    assert!(matches!(outcome, SettleOutcome::Ready(_)), "got {outcome:?}");
    Ok(())
}

#[test]
fn policy_follows_watch_section() {
    let cfg = storyboard::config::WatchSection {
        settle_interval_ms: 250,
        settle_max_checks: 7,
    };
    let policy = SettlePolicy::from_config(&cfg);
    assert_eq!(policy.interval, Duration::from_millis(250));
    assert_eq!(policy.max_checks, 7);
}

#[tokio::test]
async fn late_source_is_waited_for() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("fox");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join(STORY_FILE), "A fox runs.")?;

    let source = dir.join(SOURCE_FILE);
    let late = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        std::fs::write(source, b"portrait").unwrap();
    });

    let outcome = with_timeout(settle_project(&dir, &fast(20))).await;
    late.await?;
    assert!(matches!(outcome, SettleOutcome::Ready(_)), "got {outcome:?}");
    Ok(())
}
