//! `PersistenceService` over the taskboard HTTP API.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use taskboard_common::{Column, NewTask, Task, TaskPatch, TaskUpdate, USER_HEADER, User};

use super::PersistenceService;
use crate::errors::SyncError;

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpPersistence {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPersistence {
    /// Client for the service at `base_url`. A `timeout` bounds each request;
    /// expiry is reported as a transport failure.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request` as `user` and return the successful response, mapping
    /// error statuses onto `SyncError` kinds. `subject` names what a 404 was
    /// looking for.
    async fn send(
        &self,
        user: &User,
        request: reqwest::RequestBuilder,
        subject: &str,
    ) -> Result<reqwest::Response, SyncError> {
        let response = request
            .header(USER_HEADER, &user.id)
            .send()
            .await
            .map_err(|e| {
                SyncError::Transport(anyhow::Error::new(e).context("Request to taskboard service failed"))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(classify(status, message, subject))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, SyncError> {
        response.json::<T>().await.map_err(|e| {
            SyncError::Transport(anyhow::Error::new(e).context("Malformed response from taskboard service"))
        })
    }
}

/// Map a non-success status onto the error taxonomy. Anything that is not a
/// caller error is a transport failure.
fn classify(status: StatusCode, message: String, subject: &str) -> SyncError {
    match status {
        StatusCode::UNAUTHORIZED => SyncError::Unauthorized,
        StatusCode::FORBIDDEN => SyncError::Forbidden(message),
        StatusCode::NOT_FOUND => SyncError::NotFound(subject.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => SyncError::Validation(message),
        _ => SyncError::transport(format!("taskboard service returned {}: {}", status, message)),
    }
}

#[async_trait]
impl PersistenceService for HttpPersistence {
    async fn list_columns(&self, user: &User) -> Result<Vec<Column>, SyncError> {
        let request = self.client.get(self.url("/api/columns"));
        let response = self.send(user, request, "Board").await?;
        Self::decode(response).await
    }

    async fn create_task(&self, user: &User, task: NewTask) -> Result<Task, SyncError> {
        let request = self.client.post(self.url("/api/tasks")).json(&task);
        let subject = format!("Column {}", task.column_id);
        let response = self.send(user, request, &subject).await?;
        Self::decode(response).await
    }

    async fn update_task(&self, user: &User, update: TaskUpdate) -> Result<Task, SyncError> {
        let patch = TaskPatch {
            title: update.title,
            description: update.description,
            column_id: update.column_id,
        };
        let request = self
            .client
            .patch(self.url(&format!("/api/tasks/{}", update.id)))
            .json(&patch);
        let response = self
            .send(user, request, &format!("Task {}", update.id))
            .await?;
        Self::decode(response).await
    }

    async fn delete_task(&self, user: &User, task_id: &str) -> Result<(), SyncError> {
        let request = self.client.delete(self.url(&format!("/api/tasks/{}", task_id)));
        self.send(user, request, &format!("Task {}", task_id))
            .await?;
        Ok(())
    }
}
