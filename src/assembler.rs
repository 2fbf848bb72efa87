//! Template assemblers.
//!
//! An assembler receives a validated, formatted template and scaffolds the
//! CRUD pages for it. The scaffolding itself happens elsewhere; this module
//! only defines the seam and the transports that cross it.

use std::sync::{Arc, Mutex};

use crate::types::FormgenError;

/// Receives formatted template JSON and scaffolds pages from it.
///
/// Implementors can forward to:
/// - The templating HTTP endpoint
/// - An in-process recorder for tests and dry runs
#[async_trait::async_trait]
pub trait TemplateAssembler: Send + Sync {
    /// Hands one formatted template over for scaffolding.
    ///
    /// Returns `Err(FormgenError::Network)` if the request cannot be delivered
    /// or is refused.
    async fn assemble(&self, payload: &str) -> Result<(), FormgenError>;
}

/// An assembler that records payloads instead of sending them.
///
/// Useful when you want to:
/// - Run unit tests without a templating server
/// - Preview what would be sent (`--dry-run`)
/// - Simulate a refused request
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateAssembler {
    failure: Option<String>,
    received: Arc<Mutex<Vec<String>>>,
}

impl StaticTemplateAssembler {
    /// An assembler that accepts every payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// An assembler that refuses every payload with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Payloads received so far, oldest first.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TemplateAssembler for StaticTemplateAssembler {
    async fn assemble(&self, payload: &str) -> Result<(), FormgenError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(payload.to_string());
        }
        match &self.failure {
            Some(message) => Err(FormgenError::Network(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(feature = "http")]
#[derive(serde::Serialize)]
struct AssembleRequest<'a> {
    data: &'a str,
}

/// Posts templates to the templating endpoint as `{ "data": <payload> }`.
///
/// Any 2xx response is success; the body is not read.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpTemplateAssembler {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "http")]
impl HttpTemplateAssembler {
    pub fn new(config: &crate::config::GeneratorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "http")]
impl Default for HttpTemplateAssembler {
    fn default() -> Self {
        Self::new(&crate::config::GeneratorConfig::default())
    }
}

#[cfg(feature = "http")]
#[async_trait::async_trait]
impl TemplateAssembler for HttpTemplateAssembler {
    async fn assemble(&self, payload: &str) -> Result<(), FormgenError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AssembleRequest { data: payload })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Template endpoint unreachable: {}", e);
                FormgenError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, endpoint = %self.endpoint, "Template endpoint refused request");
            return Err(FormgenError::Network(format!("endpoint responded with {}", status)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_assembler_records() {
        let assembler = StaticTemplateAssembler::new();
        assembler.assemble("{}").await.unwrap();
        assembler.assemble("{\"a\":1}").await.unwrap();
        assert_eq!(assembler.received(), vec!["{}", "{\"a\":1}"]);
    }

    #[tokio::test]
    async fn test_static_assembler_failure() {
        let assembler = StaticTemplateAssembler::failing("offline");
        let err = assembler.assemble("{}").await.unwrap_err();
        assert_eq!(err, FormgenError::Network("offline".to_string()));
        assert_eq!(assembler.received().len(), 1);
    }
}
