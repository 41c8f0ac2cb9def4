// src/engine/runtime.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::engine::handler::handle_candidate;
use crate::engine::{CandidateOutcome, RuntimeEvent};
use crate::pipeline::Pipeline;
use crate::watch::SettlePolicy;

/// The main event loop.
///
/// Responsibilities:
/// - Consume `RuntimeEvent`s from the watcher and the Ctrl-C task.
/// - Spawn one handler task per candidate so settling never blocks the loop.
/// - On shutdown, stop accepting candidates and wait for in-flight handlers,
///   so a run that already started still relocates its input.
pub struct Runtime {
    pipeline: Arc<Pipeline>,
    policy: SettlePolicy,

    /// Unified event stream from all producers (watcher, signal handler).
    events_rx: mpsc::Receiver<RuntimeEvent>,

    handlers: JoinSet<(PathBuf, CandidateOutcome)>,
}

impl Runtime {
    pub fn new(
        pipeline: Arc<Pipeline>,
        policy: SettlePolicy,
        events_rx: mpsc::Receiver<RuntimeEvent>,
    ) -> Self {
        Self {
            pipeline,
            policy,
            events_rx,
            handlers: JoinSet::new(),
        }
    }

    /// Run until shutdown is requested or every event producer has gone away.
    pub async fn run(mut self) -> Result<()> {
        info!("storyboard runtime started");

        loop {
            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    let Some(event) = maybe_event else {
                        debug!("runtime event channel closed");
                        break;
                    };
                    debug!(?event, "runtime received event");

                    match event {
                        RuntimeEvent::InputCreated { project_dir } => {
                            self.spawn_handler(project_dir);
                        }
                        RuntimeEvent::ShutdownRequested => {
                            info!("shutdown requested, stopping runtime");
                            break;
                        }
                    }
                }
                Some(joined) = self.handlers.join_next(), if !self.handlers.is_empty() => {
                    log_joined(joined);
                }
            }
        }

        if !self.handlers.is_empty() {
            info!(
                in_flight = self.handlers.len(),
                "waiting for in-flight candidates to finish"
            );
        }
        while let Some(joined) = self.handlers.join_next().await {
            log_joined(joined);
        }

        info!("storyboard runtime exiting");
        Ok(())
    }

    fn spawn_handler(&mut self, project_dir: PathBuf) {
        let pipeline = Arc::clone(&self.pipeline);
        let policy = self.policy;
        self.handlers.spawn(async move {
            let outcome = handle_candidate(&pipeline, &policy, &project_dir).await;
            (project_dir, outcome)
        });
    }
}

fn log_joined(joined: Result<(PathBuf, CandidateOutcome), tokio::task::JoinError>) {
    match joined {
        Ok((dir, CandidateOutcome::Processed(outcome))) => {
            if outcome.relocated.is_none() {
                warn!(dir = ?dir, "processed project was left in the watched tree");
            }
        }
        Ok((dir, other)) => debug!(dir = ?dir, outcome = ?other, "candidate skipped"),
        Err(err) => error!(error = %err, "candidate handler task failed"),
    }
}
