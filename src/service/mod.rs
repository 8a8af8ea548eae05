//! Client side of the upload and analysis operations.
//!
//! Both endpoints answer with a JSON envelope carrying `status` and, on
//! failure, `message`. [`check_envelope`] turns a failed envelope or a
//! non-2xx status into [`InsightError::Transport`]; requests are never
//! retried.

pub mod http;
pub mod types;

pub use http::HttpAnalysisService;
pub use types::{AnalysisRequest, UploadSummary};

use std::path::Path;

use serde_json::Value;

use crate::error::{InsightError, Result};

/// The two remote operations the dashboard depends on
pub trait AnalysisService {
    /// Upload a dataset for subsequent analyses
    fn upload(&self, path: &Path) -> Result<UploadSummary>;

    /// Run an analysis and return the raw response for the adapter
    fn analyze(&self, request: &AnalysisRequest) -> Result<Value>;
}

/// Fail unless `status` is 2xx and the body does not report `"status": "error"`.
///
/// A 2xx body without a `status` field counts as success.
pub fn check_envelope(status: u16, body: &Value) -> Result<()> {
    let reported = body.get("status").and_then(Value::as_str);
    if (200..300).contains(&status) && reported != Some("error") {
        return Ok(());
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed with HTTP status {}", status));
    Err(InsightError::Transport(message))
}

/// Only `.csv` datasets are accepted
pub fn check_dataset_path(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(InsightError::InvalidInput(format!(
            "only CSV files are supported: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        assert!(check_envelope(200, &json!({"status": "success", "records": 10})).is_ok());
        assert!(check_envelope(200, &json!({"forecast": {}})).is_ok());
    }

    #[test]
    fn test_error_status_field_on_2xx() {
        let err = check_envelope(200, &json!({"status": "error", "message": "No file selected"}))
            .unwrap_err();
        assert!(matches!(err, InsightError::Transport(ref m) if m == "No file selected"));
    }

    #[test]
    fn test_non_2xx_carries_message() {
        let err = check_envelope(
            400,
            &json!({"status": "error", "message": "Please upload a dataset first"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Request failed: Please upload a dataset first");
    }

    #[test]
    fn test_non_2xx_without_message() {
        let err = check_envelope(502, &Value::Null).unwrap_err();
        assert!(matches!(err, InsightError::Transport(ref m) if m.contains("502")));
    }

    #[test]
    fn test_dataset_extension() {
        assert!(check_dataset_path(Path::new("sales.csv")).is_ok());
        assert!(check_dataset_path(Path::new("data/SALES.CSV")).is_ok());
        assert!(check_dataset_path(Path::new("sales.xlsx")).is_err());
        assert!(check_dataset_path(Path::new("sales")).is_err());
    }
}
