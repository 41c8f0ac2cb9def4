// src/image/replicate.rs

//! Replicate-backed image generator.
//!
//! One prediction is created per scene with `Prefer: wait`, so most requests
//! return a finished prediction directly. Predictions still running after the
//! wait window are polled through their `urls.get` link.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ImageSection;
use crate::errors::{CollabResult, CollaboratorError};
use crate::image::{ImageGenerator, ModelRef};
use crate::types::BoxFuture;

/// `input` object of a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInput {
    pub prompt: String,
    pub image: String,
    pub prompt_strength: f64,
    pub negative_prompt: String,
    pub num_outputs: u32,
}

impl PredictionInput {
    /// Build the input for one scene: the prompt gets the configured style
    /// suffix and exactly one output is requested.
    pub fn for_scene(cfg: &ImageSection, prompt: &str, image_uri: String) -> Self {
        Self {
            prompt: format!("{prompt}{}", cfg.prompt_suffix),
            image: image_uri,
            prompt_strength: cfg.prompt_strength,
            negative_prompt: cfg.negative_prompt.clone(),
            num_outputs: 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreatePrediction<'a> {
    version: &'a str,
    input: &'a PredictionInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    fn is_terminal(self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    latest_version: Option<ModelVersion>,
}

#[derive(Debug, Deserialize)]
struct ModelVersion {
    id: String,
}

/// First output reference of a prediction: either the first string of an
/// array or a bare string.
pub fn first_output_url(output: &Value) -> Option<&str> {
    match output {
        Value::Array(items) => items.first().and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Write `bytes` to a sibling `.part` file and rename it over `dest`, so a
/// failed write never leaves a truncated image at `dest`.
pub async fn write_atomically(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    let part = std::path::PathBuf::from(part);

    let written = match tokio::fs::write(&part, bytes).await {
        Ok(()) => tokio::fs::rename(&part, dest).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&part).await;
    }
    written
}

/// `data:` URI for an image file, typed by its extension.
pub fn data_uri(path: &Path, bytes: &[u8]) -> String {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Image generator backed by a Replicate model version.
#[derive(Debug, Clone)]
pub struct ReplicateImageGenerator {
    client: Client,
    api_token: String,
    base_url: String,
    version: String,
    label: String,
    cfg: ImageSection,
}

impl ReplicateImageGenerator {
    /// Create a generator for the configured model, resolving the latest
    /// version first when the reference is not pinned.
    pub async fn connect(
        client: Client,
        api_token: impl Into<String>,
        cfg: &ImageSection,
    ) -> CollabResult<Self> {
        let api_token = api_token.into();
        let model: ModelRef = cfg.model.parse().map_err(CollaboratorError::Parse)?;
        let base_url = cfg.base_url.trim_end_matches('/').to_string();

        let version = match &model.version {
            Some(v) => v.clone(),
            None => {
                let v = resolve_latest_version(&client, &api_token, &base_url, &model).await?;
                info!(model = %model.slug(), version = %v, "resolved latest model version");
                v
            }
        };

        Ok(Self::with_version(client, api_token, cfg, model.slug(), version))
    }

    /// Create a generator for an already-known version.
    pub fn with_version(
        client: Client,
        api_token: impl Into<String>,
        cfg: &ImageSection,
        slug: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_token: api_token.into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            version: version.into(),
            label: slug.into(),
            cfg: cfg.clone(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_token)
    }

    #[instrument(skip(self, prompt, reference, dest), fields(model = %self.label, dest = ?dest))]
    async fn generate(&self, prompt: &str, reference: &Path, dest: &Path) -> CollabResult<()> {
        let reference_bytes = tokio::fs::read(reference).await?;
        let input = PredictionInput::for_scene(
            &self.cfg,
            prompt,
            data_uri(reference, &reference_bytes),
        );

        debug!(prompt = %input.prompt, "creating prediction");
        let prediction = self.create_prediction(&input).await?;
        let prediction = self.wait_for(prediction).await?;

        if prediction.status != PredictionStatus::Succeeded {
            let message = prediction
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("{:?}", prediction.status));
            warn!(id = %prediction.id, error = %message, "prediction did not succeed");
            return Err(CollaboratorError::RemoteFailed(format!(
                "prediction {} ended: {message}",
                prediction.id
            )));
        }

        let url = prediction
            .output
            .as_ref()
            .and_then(first_output_url)
            .ok_or_else(|| {
                CollaboratorError::Parse(format!(
                    "prediction {} succeeded without an output image",
                    prediction.id
                ))
            })?
            .to_string();

        let bytes = self.download(&url).await?;
        write_atomically(dest, &bytes).await?;
        info!(bytes = bytes.len(), "saved scene image");
        Ok(())
    }

    async fn create_prediction(&self, input: &PredictionInput) -> CollabResult<Prediction> {
        let body = CreatePrediction {
            version: &self.version,
            input,
        };

        let response = self
            .authorized(self.client.post(format!("{}/predictions", self.base_url)))
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        decode_json(response).await
    }

    async fn wait_for(&self, mut prediction: Prediction) -> CollabResult<Prediction> {
        let mut polls = 0;
        while !prediction.status.is_terminal() {
            if polls >= self.cfg.max_polls {
                return Err(CollaboratorError::Network(format!(
                    "prediction {} still {:?} after {} polls",
                    prediction.id, prediction.status, polls
                )));
            }

            let get_url = prediction
                .urls
                .as_ref()
                .and_then(|u| u.get.clone())
                .ok_or_else(|| {
                    CollaboratorError::Parse(format!(
                        "prediction {} is {:?} but has no status URL",
                        prediction.id, prediction.status
                    ))
                })?;

            tokio::time::sleep(self.cfg.poll_interval()).await;
            polls += 1;

            debug!(id = %prediction.id, polls, "polling prediction status");
            let response = self.authorized(self.client.get(&get_url)).send().await?;
            prediction = decode_json(response).await?;
        }
        Ok(prediction)
    }

    async fn download(&self, url: &str) -> CollabResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

impl ImageGenerator for ReplicateImageGenerator {
    fn label(&self) -> &str {
        &self.label
    }

    fn generate_scene<'a>(
        &'a self,
        prompt: &'a str,
        reference: &'a Path,
        dest: &'a Path,
    ) -> BoxFuture<'a, CollabResult<()>> {
        Box::pin(self.generate(prompt, reference, dest))
    }
}

/// Look up `latest_version.id` for an unpinned model.
pub async fn resolve_latest_version(
    client: &Client,
    api_token: &str,
    base_url: &str,
    model: &ModelRef,
) -> CollabResult<String> {
    let url = format!("{}/models/{}/{}", base_url, model.owner, model.name);
    let response = client.get(&url).bearer_auth(api_token).send().await?;
    let info: ModelInfo = decode_json(response).await?;
    info.latest_version.map(|v| v.id).ok_or_else(|| {
        CollaboratorError::Parse(format!("model {} has no published version", model.slug()))
    })
}

async fn ensure_success(response: Response) -> CollabResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    error!(status = %status, body = %message, "image API returned error");
    Err(CollaboratorError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> CollabResult<T> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| CollaboratorError::Parse(format!("image API response: {e}")))
}
