#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use storyboard::image::ImageGenerator;
use storyboard::pipeline::Orchestrator;
use storyboard::story::StoryProcessor;
use storyboard::types::Capability;
use storyboard::vectorize::Vectorize;
use storyboard_test_utils::fakes::{FakeImages, FakeStory, FakeVectorizer};

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

pub fn story(fake: &FakeStory) -> Capability<Arc<dyn StoryProcessor>> {
    Capability::Available(Arc::new(fake.clone()) as Arc<dyn StoryProcessor>)
}

pub fn images(fake: &FakeImages) -> Capability<Arc<dyn ImageGenerator>> {
    Capability::Available(Arc::new(fake.clone()) as Arc<dyn ImageGenerator>)
}

pub fn vectorizer(fake: &FakeVectorizer) -> Arc<dyn Vectorize> {
    Arc::new(fake.clone())
}

/// Orchestrator writing under `output` with all three fakes available.
pub fn orchestrator(
    output: &Path,
    s: &FakeStory,
    i: &FakeImages,
    v: &FakeVectorizer,
) -> Orchestrator {
    Orchestrator::new(output, story(s), images(i), vectorizer(v))
}

/// Bind a local port for a stub HTTP server and return its base URL.
pub async fn stub_listener() -> (tokio::net::TcpListener, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    (listener, format!("http://{addr}"))
}

pub fn spawn_stub(listener: tokio::net::TcpListener, router: axum::Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
}
