// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod image;
pub mod logging;
pub mod pipeline;
pub mod story;
pub mod types;
pub mod vectorize;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::credentials::{IMAGE_TOKEN_VAR, STORY_KEY_VAR};
use crate::config::{ConfigFile, Credentials, HttpSection, load_or_default};
use crate::engine::{Runtime, RuntimeEvent};
use crate::image::{ImageGenerator, ReplicateImageGenerator};
use crate::pipeline::{Orchestrator, Pipeline};
use crate::story::{GeminiStoryProcessor, StoryProcessor};
use crate::types::Capability;
use crate::vectorize::{PotraceVectorizer, Vectorize};
use crate::watch::SettlePolicy;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and credentials
/// - the three collaborators (each possibly unavailable)
/// - the pipeline and its run gate
/// - the file watcher and Ctrl-C handling
/// - the runtime event loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;
    let credentials = Credentials::from_env();
    log_credentials(&credentials);

    let vectorizer = PotraceVectorizer::probe(cfg.vectorize()).await;

    if args.dry_run {
        print_dry_run(&cfg, &credentials, &vectorizer);
        return Ok(());
    }

    let client = build_http_client(cfg.http())?;
    let story = story_capability(&client, &credentials, &cfg);
    let images = image_capability(&client, &credentials, &cfg).await;

    create_directories(&cfg).await?;

    let vectorizer: Arc<dyn Vectorize> = Arc::new(vectorizer);
    let orchestrator = Orchestrator::new(cfg.output_dir(), story, images, vectorizer);
    let pipeline = Arc::new(Pipeline::new(orchestrator, cfg.processed_dir()));
    let policy = SettlePolicy::from_config(cfg.watch());

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let watcher = watch::spawn_watcher(cfg.input_dir(), rt_tx.clone())?;

    // Ctrl-C → graceful shutdown; a second Ctrl-C exits immediately.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;

            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("second interrupt received; exiting without waiting");
                std::process::exit(130);
            }
        });
    }

    info!(
        input = ?watcher.root(),
        output = ?cfg.output_dir(),
        processed = ?cfg.processed_dir(),
        "watching for new stories"
    );

    let runtime = Runtime::new(pipeline, policy, rt_rx);
    runtime.run().await
}

/// Load the config file (or defaults), apply CLI path overrides, validate.
pub fn resolve_config(args: &CliArgs) -> errors::Result<ConfigFile> {
    let (path, explicit) = args.config_path();
    let mut raw = load_or_default(&path, explicit)?;

    if let Some(dir) = &args.input_dir {
        raw.paths.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        raw.paths.output_dir = dir.clone();
    }
    if let Some(dir) = &args.processed_dir {
        raw.paths.processed_dir = dir.clone();
    }

    ConfigFile::try_from(raw)
}

/// Shared HTTP client for both hosted models.
pub fn build_http_client(cfg: &HttpSection) -> Result<Client> {
    Client::builder()
        .timeout(cfg.timeout())
        .build()
        .context("building HTTP client")
}

fn story_capability(
    client: &Client,
    credentials: &Credentials,
    cfg: &ConfigFile,
) -> Capability<Arc<dyn StoryProcessor>> {
    match &credentials.story_api_key {
        Some(key) => {
            let processor: Arc<dyn StoryProcessor> = Arc::new(GeminiStoryProcessor::new(
                client.clone(),
                key.clone(),
                cfg.story(),
            ));
            Capability::Available(processor)
        }
        None => Capability::unavailable(format!("{STORY_KEY_VAR} is not set")),
    }
}

async fn image_capability(
    client: &Client,
    credentials: &Credentials,
    cfg: &ConfigFile,
) -> Capability<Arc<dyn ImageGenerator>> {
    let Some(token) = &credentials.image_api_token else {
        return Capability::unavailable(format!("{IMAGE_TOKEN_VAR} is not set"));
    };

    match ReplicateImageGenerator::connect(client.clone(), token.clone(), cfg.image()).await {
        Ok(generator) => {
            info!(model = %cfg.image().model, version = %generator.version(), "image generator ready");
            let generator: Arc<dyn ImageGenerator> = Arc::new(generator);
            Capability::Available(generator)
        }
        Err(err) => {
            warn!(model = %cfg.image().model, error = %err, "image generator unavailable");
            Capability::unavailable(format!("could not resolve image model: {err}"))
        }
    }
}

fn log_credentials(credentials: &Credentials) {
    match (&credentials.story_api_key, &credentials.image_api_token) {
        (Some(_), Some(_)) => {}
        (None, None) => error!(
            "neither {STORY_KEY_VAR} nor {IMAGE_TOKEN_VAR} is set; storyboards will hold placeholder prompts only"
        ),
        (None, Some(_)) => warn!("{STORY_KEY_VAR} is not set; running degraded with placeholder prompts"),
        (Some(_), None) => warn!("{IMAGE_TOKEN_VAR} is not set; running degraded without images"),
    }
}

async fn create_directories(cfg: &ConfigFile) -> Result<()> {
    for dir in [cfg.input_dir(), cfg.processed_dir(), cfg.output_dir()] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating directory {:?}", dir))?;
    }
    Ok(())
}

/// Print the resolved configuration and collaborator availability.
fn print_dry_run(cfg: &ConfigFile, credentials: &Credentials, vectorizer: &PotraceVectorizer) {
    let yes_no = |b: bool| if b { "available" } else { "unavailable" };

    println!("storyboard dry-run");
    println!("  paths.input_dir = {:?}", cfg.input_dir());
    println!("  paths.processed_dir = {:?}", cfg.processed_dir());
    println!("  paths.output_dir = {:?}", cfg.output_dir());
    println!(
        "  watch.settle = {} ms x {}",
        cfg.watch().settle_interval_ms,
        cfg.watch().settle_max_checks
    );
    println!("  http.timeout_secs = {}", cfg.http().timeout_secs);
    println!();

    println!("collaborators:");
    println!(
        "  - story ({}): {}",
        cfg.story().model,
        yes_no(credentials.story_api_key.is_some())
    );
    println!(
        "  - image ({}): {}",
        cfg.image().model,
        yes_no(credentials.image_api_token.is_some())
    );
    println!(
        "  - vectorize ({}): {}",
        cfg.vectorize().tracer,
        yes_no(vectorizer.is_available())
    );
}
