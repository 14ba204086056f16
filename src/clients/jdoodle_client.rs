use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error};

use crate::services::compile_service::{CompileError, ExecutionBackend};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
    script: &'a str,
    language: &'a str,
    version_index: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// HTTP client for the hosted execution API
#[derive(Debug)]
pub struct JdoodleClient {
    client: Client,
    url: String,
    credentials: Option<(String, String)>,
}

impl JdoodleClient {
    pub fn new(
        url: String,
        client_id: Option<String>,
        client_secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CompileError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompileError::Backend(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            url,
            credentials: client_id.zip(client_secret),
        })
    }

    async fn post_execute(
        &self,
        code: &str,
        language: &str,
        version_index: &str,
    ) -> Result<Value, CompileError> {
        let (client_id, client_secret) = self
            .credentials
            .as_ref()
            .ok_or(CompileError::MissingCredentials)?;

        let body = ExecuteRequest {
            script: code,
            language,
            version_index,
            client_id,
            client_secret,
        };

        debug!("Posting {} program to execution backend", language);
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!("Execution backend request failed: {}", e);
                CompileError::Backend(e.to_string())
            })?;

        response.json::<Value>().await.map_err(|e| {
            error!("Execution backend returned an unreadable body: {}", e);
            CompileError::Backend(e.to_string())
        })
    }
}

impl ExecutionBackend for JdoodleClient {
    fn execute<'a>(
        &'a self,
        code: &'a str,
        language: &'a str,
        version_index: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, CompileError>> + Send + 'a>> {
        Box::pin(self.post_execute(code, language, version_index))
    }
}
