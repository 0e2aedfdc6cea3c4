//! [`HttpGenerator`] — the reqwest implementation of `SqlGenerator`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlsage_core::{
  examples::{ExampleKind, TrainingExample},
  generator::SqlGenerator,
};
use tracing::debug;

use crate::{Error, Result};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for the inference service.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
  pub base_url: String,
  pub api_key:  String,
  /// Name of the hosted model this deployment trains and queries.
  pub model:    String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TrainRequest<'a> {
  model: &'a str,
  kind:  ExampleKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  content:  Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  question: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  sql:      Option<&'a str>,
}

impl<'a> TrainRequest<'a> {
  fn from_example(model: &'a str, example: &'a TrainingExample) -> Self {
    let (content, question, sql) = match example {
      TrainingExample::Documentation(text) => (Some(text.as_str()), None, None),
      TrainingExample::Ddl(stmt) => (Some(stmt.as_str()), None, None),
      TrainingExample::Sql(stmt) => (Some(stmt.as_str()), None, None),
      TrainingExample::Pair { question, sql } => {
        (None, Some(question.as_str()), Some(sql.as_str()))
      }
    };
    Self { model, kind: example.kind(), content, question, sql }
  }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
  model:    &'a str,
  question: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
  sql: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the inference service.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpGenerator {
  client: reqwest::Client,
  config: GeneratorConfig,
}

impl HttpGenerator {
  pub fn new(config: GeneratorConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api/v0{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn post_json<T: Serialize>(
    &self,
    path: &str,
    body: &T,
  ) -> Result<reqwest::Response> {
    let resp = self
      .client
      .post(self.url(path))
      .header("x-api-key", self.config.api_key.as_str())
      .json(body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp.text().await.unwrap_or_default();
      return Err(Error::Api { status: status.as_u16(), message });
    }
    Ok(resp)
  }
}

impl SqlGenerator for HttpGenerator {
  type Error = Error;

  /// `POST /api/v0/train`
  async fn train(&self, example: &TrainingExample) -> Result<()> {
    let request = TrainRequest::from_example(&self.config.model, example);
    debug!(kind = ?example.kind(), "submitting training example");
    self.post_json("/train", &request).await?;
    Ok(())
  }

  /// `POST /api/v0/generate_sql`
  async fn generate_sql(&self, question: &str) -> Result<Option<String>> {
    let request = GenerateRequest { model: &self.config.model, question };
    let resp = self.post_json("/generate_sql", &request).await?;

    let body: GenerateResponse = resp.json().await?;
    Ok(body.sql.filter(|sql| !sql.trim().is_empty()))
  }
}
