use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::external::sentiment_model::{Classification, ModelError, SentimentModel};
use crate::models::SentimentLabel;

/// Text-classification model served by the Hugging Face Inference API.
///
/// Works with both three-class financial models (`ProsusAI/finbert`,
/// labels positive/negative/neutral) and two-class models such as
/// `distilbert-base-uncased-finetuned-sst-2-english` (POSITIVE/NEGATIVE).
pub struct HuggingFaceModel {
    client: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl HuggingFaceModel {
    pub fn new(base_url: &str, model: &str, api_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token,
        }
    }

    async fn call_inference(&self, inputs: InferenceInputs<'_>) -> Result<InferenceOutput, ModelError> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let request = InferenceRequest {
            inputs,
            parameters: InferenceParameters {
                truncation: true,
                max_length: 512,
            },
            options: InferenceOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            let body: Option<LoadingBody> = response.json().await.ok();
            let wait = body.and_then(|b| b.estimated_time).unwrap_or(20.0);
            warn!("Model {} is still loading (~{:.0}s)", self.model, wait);
            return Err(ModelError::Loading(wait));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::BadResponse(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<InferenceOutput>()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum InferenceInputs<'a> {
    One(&'a str),
    Many(&'a [String]),
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: InferenceInputs<'a>,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LoadingBody {
    estimated_time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The API returns either one list of label scores per input, or a flat
/// list when a single text was sent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceOutput {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceOutput {
    fn into_rows(self) -> Vec<Vec<LabelScore>> {
        match self {
            InferenceOutput::Nested(rows) => rows,
            InferenceOutput::Flat(row) => vec![row],
        }
    }
}

fn parse_label(raw: &str) -> Result<SentimentLabel, ModelError> {
    match raw.to_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_1" => Ok(SentimentLabel::Positive),
        "NEGATIVE" | "NEG" | "LABEL_0" => Ok(SentimentLabel::Negative),
        "NEUTRAL" | "NEU" => Ok(SentimentLabel::Neutral),
        other => Err(ModelError::Parse(format!("unknown label '{}'", other))),
    }
}

/// Picks the highest-scoring label of one row.
fn best_label(row: &[LabelScore]) -> Result<Classification, ModelError> {
    let best = row
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| ModelError::BadResponse("empty label list".to_string()))?;

    Ok(Classification::new(parse_label(&best.label)?, best.score))
}

#[async_trait]
impl SentimentModel for HuggingFaceModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> Result<Classification, ModelError> {
        let rows = self.call_inference(InferenceInputs::One(text)).await?.into_rows();
        let row = rows
            .first()
            .ok_or_else(|| ModelError::BadResponse("no predictions in response".to_string()))?;
        let classification = best_label(row)?;
        debug!(
            "{} classified headline as {} ({:.3})",
            self.model, classification.label, classification.confidence
        );
        Ok(classification)
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.call_inference(InferenceInputs::Many(texts)).await?.into_rows();
        if rows.len() != texts.len() {
            return Err(ModelError::BadResponse(format!(
                "expected {} predictions, got {}",
                texts.len(),
                rows.len()
            )));
        }

        rows.iter().map(|row| best_label(row)).collect()
    }
}
