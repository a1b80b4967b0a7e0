//! Stub collaborators shared by the unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::diagnostics::Diagnostics;
use crate::error::{ProviderError, SendError};
use crate::sender::{HttpRequest, RequestSender};

/// Request sender answering from a closure and recording every request
pub(crate) struct StubSender<F> {
    handler: F,
    requests: Mutex<Vec<HttpRequest>>,
}

impl<F> StubSender<F>
where
    F: Fn(&HttpRequest) -> Result<Vec<u8>, SendError> + Send + Sync,
{
    pub(crate) fn new(handler: F) -> Self {
        Self {
            handler,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> RequestSender for StubSender<F>
where
    F: Fn(&HttpRequest) -> Result<Vec<u8>, SendError> + Send + Sync,
{
    async fn send(&self, request: HttpRequest) -> Result<Vec<u8>, SendError> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

pub(crate) fn json_body(value: serde_json::Value) -> Result<Vec<u8>, SendError> {
    Ok(serde_json::to_vec(&value).unwrap())
}

pub(crate) fn unavailable(request: &HttpRequest) -> Result<Vec<u8>, SendError> {
    Err(SendError::Status(
        StatusCode::SERVICE_UNAVAILABLE,
        request.url.clone(),
    ))
}

/// Event id embedded in a POAP subgraph GraphQL request body
pub(crate) fn graphql_event_id(request: &HttpRequest) -> Option<u64> {
    let body: serde_json::Value = serde_json::from_slice(request.body.as_deref()?).ok()?;
    let query = body.get("query")?.as_str()?;
    let start = query.find("event(id: \"")? + "event(id: \"".len();
    let digits: String = query[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Diagnostics sink that keeps `(provider, stage)` pairs
#[derive(Default)]
pub(crate) struct RecordingDiagnostics {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub(crate) fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, provider: &str, error: &ProviderError) {
        self.reports
            .lock()
            .unwrap()
            .push((provider.to_string(), error.stage().to_string()));
    }
}
