//! Blocking HTTP implementation of [`AnalysisService`].

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use serde_json::Value;

use super::{check_dataset_path, check_envelope, AnalysisRequest, AnalysisService, UploadSummary};
use crate::config::ServiceConfig;
use crate::error::{InsightError, Result};

const UPLOAD_PATH: &str = "/upload_dataset";
const ANALYSIS_PATH: &str = "/run_analysis";

#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsightError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode the JSON envelope and apply the success rule
    fn read_envelope(response: Response) -> Result<Value> {
        let status = response.status().as_u16();
        let body: Value = response.json().or_else(|e| {
            if (200..300).contains(&status) {
                Err(InsightError::Transport(format!("invalid JSON response: {}", e)))
            } else {
                Ok(Value::Null)
            }
        })?;
        check_envelope(status, &body)?;
        Ok(body)
    }
}

fn transport(e: reqwest::Error) -> InsightError {
    InsightError::Transport(e.to_string())
}

impl AnalysisService for HttpAnalysisService {
    fn upload(&self, path: &Path) -> Result<UploadSummary> {
        check_dataset_path(path)?;

        let form = multipart::Form::new().file("file", path).map_err(|e| {
            InsightError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
        })?;

        log::info!("Uploading {} to {}", path.display(), self.url(UPLOAD_PATH));
        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .map_err(transport)?;

        let body = Self::read_envelope(response)?;
        let summary: UploadSummary = serde_json::from_value(body)
            .map_err(|e| InsightError::Transport(format!("unexpected upload response: {}", e)))?;
        log::info!(
            "Upload accepted: {} records, {} product(s)",
            summary.records,
            summary.products.len()
        );
        Ok(summary)
    }

    fn analyze(&self, request: &AnalysisRequest) -> Result<Value> {
        request.validate()?;

        log::info!(
            "Running analysis for {} (growth {}%, holding {}%, ordering cost {})",
            request.product_id,
            request.growth_rate,
            request.holding_pct,
            request.ordering_cost
        );
        let response = self
            .client
            .post(self.url(ANALYSIS_PATH))
            .form(&request.form_fields())
            .send()
            .map_err(transport)?;

        Self::read_envelope(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let service = HttpAnalysisService::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(service.base_url(), "http://localhost:5000");
        assert_eq!(service.url(ANALYSIS_PATH), "http://localhost:5000/run_analysis");
    }

    #[test]
    fn test_invalid_request_rejected_before_sending() {
        // Nothing listens on port 9; validation must fail first
        let service = HttpAnalysisService::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let request = AnalysisRequest {
            growth_rate: 500.0,
            ..Default::default()
        };
        assert!(matches!(
            service.analyze(&request),
            Err(InsightError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_csv_upload_rejected() {
        let service = HttpAnalysisService::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        assert!(matches!(
            service.upload(Path::new("sales.json")),
            Err(InsightError::InvalidInput(_))
        ));
    }
}
