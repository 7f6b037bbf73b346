//! HTTP client for the codebase-investigation backend.
//!
//! One network round trip per call, no retries, no caching, no
//! deduplication of concurrent identical requests. Non-2xx statuses become
//! [`Error::Api`] carrying the backend's `detail` message when present;
//! response bodies are decoded into typed shapes and fail closed.

mod types;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Endpoints;
use crate::error::{Error, Result};

pub use types::{
    ChatPayload, ChatReply, ClonePayload, CodeResponse, ErrorBody, FileEntry, FilesResponse,
    ShowCodePayload, SourceResponse, TreeResponse,
};

/// Logical backend operations. The enum is closed, so every operation a
/// controller can issue has exactly one endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CloneRepo,
    TreeStructure,
    Source,
    ResetMemory,
    ListFiles,
    ShowCode,
    Chat,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::CloneRepo => "/api/clone_repos",
            Operation::TreeStructure => "/api/tree_structure",
            Operation::Source => "/api/source",
            Operation::ResetMemory => "/api/reset_memory",
            Operation::ListFiles => "/api/list_files",
            Operation::ShowCode => "/api/show_code",
            Operation::Chat => "/api/chat",
        }
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoints })
    }

    pub fn base_url(&self) -> &str {
        self.endpoints.base_url()
    }

    /// Ask the backend to clone and index a repository. The response body
    /// is untyped; callers log it.
    pub async fn clone_repo(&self, url: &str) -> Result<Value> {
        self.post(Operation::CloneRepo, &ClonePayload { url }).await
    }

    pub async fn tree_structure(&self) -> Result<Vec<String>> {
        let resp: TreeResponse = self.get(Operation::TreeStructure).await?;
        Ok(resp.tree)
    }

    pub async fn source(&self) -> Result<String> {
        let resp: SourceResponse = self.get(Operation::Source).await?;
        Ok(resp.src)
    }

    /// Reset the backend's conversation memory. Untyped response, logged by
    /// callers.
    pub async fn reset_memory(&self) -> Result<Value> {
        self.get(Operation::ResetMemory).await
    }

    pub async fn list_files(&self) -> Result<Vec<FileEntry>> {
        let resp: FilesResponse = self.get(Operation::ListFiles).await?;
        Ok(resp.files)
    }

    /// Fetch one file's content. `dir` is the filesystem path resolved from
    /// the display name, or `None` when the name did not match the listing.
    pub async fn show_code(&self, dir: Option<&str>) -> Result<String> {
        let resp: CodeResponse = self
            .post(Operation::ShowCode, &ShowCodePayload { dir })
            .await?;
        Ok(resp.file_text)
    }

    pub async fn chat(&self, question: &str) -> Result<ChatReply> {
        self.post(Operation::Chat, &ChatPayload { question }).await
    }

    async fn get<T: DeserializeOwned>(&self, op: Operation) -> Result<T> {
        let resp = self.http.get(self.endpoints.url(op)).send().await?;
        Self::decode(resp).await
    }

    async fn post<T: DeserializeOwned>(&self, op: Operation, payload: &impl Serialize) -> Result<T> {
        let resp = self
            .http
            .post(self.endpoints.url(op))
            .json(payload)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(resp.json::<T>().await?)
    }
}
