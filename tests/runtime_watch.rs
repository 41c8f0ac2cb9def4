// tests/runtime_watch.rs

mod common;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use common::orchestrator;
use storyboard::engine::{Runtime, RuntimeEvent};
use storyboard::pipeline::Pipeline;
use storyboard::watch::{SettlePolicy, spawn_watcher};
use storyboard_test_utils::builders::{entry_names, write_project};
use storyboard_test_utils::fakes::{FakeImages, FakeStory, FakeVectorizer};
use storyboard_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

async fn wait_for_entries(dir: &std::path::Path, count: usize) -> bool {
    for _ in 0..200 {
        if entry_names(dir).len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_project_is_processed_and_moved() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("input");
    let output = tmp.path().join("output");
    let processed = tmp.path().join("processed");
    std::fs::create_dir_all(&input)?;

    let images = FakeImages::writing(b"raster");
    let orch = orchestrator(
        &output,
        &FakeStory::returning(&["line art fox running"]),
        &images,
        &FakeVectorizer::available(),
    );
    let pipeline = Arc::new(Pipeline::new(orch, &processed));
    let policy = SettlePolicy {
        interval: Duration::from_millis(20),
        max_checks: 20,
    };

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let watcher = spawn_watcher(&input, rt_tx.clone())?;
    assert_eq!(watcher.root(), input.canonicalize()?);
    let runtime = tokio::spawn(Runtime::new(pipeline, policy, rt_rx).run());

    // Files dropped directly into the root never start a run.
    std::fs::write(input.join("story.txt"), "stray")?;

    // Files written right after their directory may race the watch on it.
    write_project(&input, "fox", "A fox runs.");

    assert!(
        wait_for_entries(&processed, 1).await,
        "project was not moved to the processed area"
    );

    assert_eq!(entry_names(&input), vec!["story.txt"]);
    let runs = entry_names(&output);
    assert_eq!(runs.len(), 1);
    assert_eq!(
        entry_names(&output.join(&runs[0])),
        vec!["prompts.json", "scene_01.png", "scene_01.svg"]
    );
    assert_eq!(images.call_count(), 1);

    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;
    timeout(Duration::from_secs(3), runtime).await???;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn project_folder_moved_in_is_processed() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("input");
    let staging = tmp.path().join("staging");
    let output = tmp.path().join("output");
    let processed = tmp.path().join("processed");
    std::fs::create_dir_all(&input)?;
    let prepared = write_project(&staging, "fox", "A fox runs.");

    let images = FakeImages::writing(b"raster");
    let orch = orchestrator(
        &output,
        &FakeStory::returning(&["line art fox running"]),
        &images,
        &FakeVectorizer::available(),
    );
    let pipeline = Arc::new(Pipeline::new(orch, &processed));
    let policy = SettlePolicy {
        interval: Duration::from_millis(20),
        max_checks: 20,
    };

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let _watcher = spawn_watcher(&input, rt_tx.clone())?;
    let runtime = tokio::spawn(Runtime::new(pipeline, policy, rt_rx).run());

    std::fs::rename(&prepared, input.join("fox"))?;

    assert!(
        wait_for_entries(&processed, 1).await,
        "moved-in project folder never triggered a run"
    );
    assert!(entry_names(&input).is_empty());
    assert_eq!(images.call_count(), 1);

    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;
    timeout(Duration::from_secs(3), runtime).await???;
    Ok(())
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_candidates() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("input");
    let processed = tmp.path().join("processed");
    let dir = write_project(&input, "fox", "A fox runs.");

    let orch = orchestrator(
        &tmp.path().join("output"),
        &FakeStory::returning(&["one"]),
        &FakeImages::writing(b"raster"),
        &FakeVectorizer::available(),
    );
    let pipeline = Arc::new(Pipeline::new(orch, &processed));
    let policy = SettlePolicy {
        interval: Duration::from_millis(50),
        max_checks: 10,
    };

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    rt_tx
        .send(RuntimeEvent::InputCreated {
            project_dir: dir.clone(),
        })
        .await?;
    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;

    timeout(Duration::from_secs(3), Runtime::new(pipeline, policy, rt_rx).run()).await??;

    assert!(!dir.exists());
    assert_eq!(entry_names(&processed).len(), 1);
    Ok(())
}

#[tokio::test]
async fn runtime_exits_when_producers_are_gone() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let orch = orchestrator(
        &tmp.path().join("output"),
        &FakeStory::returning(&["one"]),
        &FakeImages::writing(b"raster"),
        &FakeVectorizer::available(),
    );
    let pipeline = Arc::new(Pipeline::new(orch, tmp.path().join("processed")));

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(1);
    drop(rt_tx);

    let policy = SettlePolicy {
        interval: Duration::from_millis(10),
        max_checks: 2,
    };
    timeout(Duration::from_secs(1), Runtime::new(pipeline, policy, rt_rx).run()).await??;
    Ok(())
}
