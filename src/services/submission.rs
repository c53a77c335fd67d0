// src/services/submission.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::common::{safe_name_log, safe_text_log};
use crate::registration::models::SubmittedSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("HTTP client could not be created: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result of one confirmed submission, as reported to the user
#[derive(Debug)]
pub enum SubmissionOutcome {
    Succeeded,
    Failed(SubmissionError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded)
    }

    /// Notification shown once the request settles
    pub fn message(&self) -> &'static str {
        match self {
            SubmissionOutcome::Succeeded => "登録が完了しました",
            SubmissionOutcome::Failed(_) => "登録に失敗しました",
        }
    }
}

impl From<Result<(), SubmissionError>> for SubmissionOutcome {
    fn from(result: Result<(), SubmissionError>) -> Self {
        match result {
            Ok(()) => SubmissionOutcome::Succeeded,
            Err(e) => SubmissionOutcome::Failed(e),
        }
    }
}

/// Destination for confirmed registrations.
///
/// Each call is exactly one delivery attempt; implementations must not retry.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, snapshot: &SubmittedSnapshot) -> Result<(), SubmissionError>;
}

/// Posts the snapshot as JSON to a fixed endpoint
#[derive(Debug, Clone)]
pub struct HttpSubmissionSink {
    client: Client,
    endpoint: String,
}

impl HttpSubmissionSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubmissionError> {
        let client = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| SubmissionError::ClientBuild(e.to_string()))?;

        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn submit(&self, snapshot: &SubmittedSnapshot) -> Result<(), SubmissionError> {
        info!(
            endpoint = %self.endpoint,
            full_name = %safe_name_log(snapshot.full_name()),
            self_intro = %safe_text_log(snapshot.self_intro()),
            "Submitting registration"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(snapshot)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "Registration request failed");
                SubmissionError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if !status.is_success() {
            error!(status = %status, error = %body, "Registration endpoint rejected submission");
            return Err(SubmissionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = %status, response_body = %body, "Registration accepted");
        Ok(())
    }
}
