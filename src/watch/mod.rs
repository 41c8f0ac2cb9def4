// src/watch/mod.rs

//! File watching and project readiness detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Keeping only file-creation events for the two project inputs and
//!   turning them into candidate project directories.
//! - Deciding when a candidate has settled (both inputs present and no
//!   longer growing).
//!
//! It does **not** know about the pipeline; it only produces candidates.

pub mod event_handler;
pub mod path_utils;
pub mod settle;
pub mod watcher;

pub use event_handler::input_candidates;
pub use settle::{SettleOutcome, SettlePolicy, settle_project};
pub use watcher::{WatcherHandle, spawn_watcher};
