//! The `SqlGenerator` trait — the seam to the hosted NL-to-SQL inference
//! service.
//!
//! Implemented over HTTP by `sqlsage-client`; tests use scripted in-memory
//! doubles. The core never implements inference, it only decides *when* to
//! invoke the training entry points.

use std::future::Future;

use crate::examples::TrainingExample;

/// Abstraction over a remote NL-to-SQL inference service.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded tokio runtimes.
pub trait SqlGenerator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Feed one training example to the service.
  fn train<'a>(
    &'a self,
    example: &'a TrainingExample,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Translate a natural-language question into SQL. Returns `None` when
  /// the service has no answer for the question.
  fn generate_sql<'a>(
    &'a self,
    question: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;
}
