//! Client for the attribute backend holding district colors and uploads.
//!
//! The backend groups attributes by dataset; the client is bound to one
//! dataset and unwraps it from the fetch payload. The upload surface is
//! the backend's multipart form endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use harita_core::{
    model::{AttributeMap, UploadReceipt},
    ports::{AttributePort, SyncError, UploadPort},
};

const ATTRIBUTES_PATH: &str = "/get_data";
const UPLOAD_PATH: &str = "/upload";
const DEFAULT_DATASET: &str = "sicaklik";

/// Backend acknowledgement of an upload, before interpretation.
#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    status: Option<String>,
    district: Option<String>,
    avg_temp: Option<f64>,
    color: Option<String>,
    message: Option<String>,
}

/// HTTP client for one dataset of the attribute backend.
pub struct BackendClient {
    client: Client,
    base_url: String,
    dataset: String,
}

impl BackendClient {
    /// Create a client for the default dataset.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self::with_dataset(client, base_url, DEFAULT_DATASET)
    }

    /// Create a client bound to a specific dataset.
    #[must_use]
    pub fn with_dataset(client: Client, base_url: &str, dataset: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            dataset: dataset.to_owned(),
        }
    }

    fn attributes_url(&self) -> String {
        format!("{}{ATTRIBUTES_PATH}", self.base_url)
    }

    fn upload_url(&self) -> String {
        format!("{}{UPLOAD_PATH}/{}", self.base_url, self.dataset)
    }
}

#[async_trait]
impl AttributePort for BackendClient {
    async fn fetch(&self) -> Result<AttributeMap, SyncError> {
        let payload: Value = self
            .client
            .get(self.attributes_url())
            .send()
            .await
            .map_err(|error| SyncError::AttributeFetch(error.to_string()))?
            .error_for_status()
            .map_err(|error| SyncError::AttributeFetch(error.to_string()))?
            .json()
            .await
            .map_err(|error| SyncError::AttributeFetch(error.to_string()))?;

        Ok(attribute_map_from(&payload, &self.dataset))
    }
}

#[async_trait]
impl UploadPort for BackendClient {
    async fn submit(
        &self,
        district: &str,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<UploadReceipt, SyncError> {
        let form = Form::new()
            .text("data_type", self.dataset.clone())
            .text("ilce", district.to_owned())
            .part("file", Part::bytes(payload).file_name(file_name.to_owned()));

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let accepted = response.status().is_success();
        let body = response.text().await?;

        interpret_upload_body(accepted, &body)
    }
}

/// Unwrap the configured dataset from the fetch payload.
///
/// A missing dataset key means nothing has been uploaded yet and yields
/// an empty map; non-string color values are skipped.
fn attribute_map_from(payload: &Value, dataset: &str) -> AttributeMap {
    let mut colors = HashMap::new();

    if let Some(Value::Object(entries)) = payload.get(dataset) {
        for (name, color) in entries {
            if let Value::String(color) = color {
                colors.insert(name.clone(), color.clone());
            }
        }
    }

    AttributeMap::new(colors)
}

/// Interpret the upload response body given the HTTP-level outcome.
fn interpret_upload_body(accepted: bool, body: &str) -> Result<UploadReceipt, SyncError> {
    let parsed: UploadResponse = serde_json::from_str(body).unwrap_or_default();

    if accepted && parsed.status.as_deref() == Some("success") {
        if let (Some(district), Some(average), Some(color)) =
            (parsed.district, parsed.avg_temp, parsed.color)
        {
            return Ok(UploadReceipt {
                district,
                average,
                color,
            });
        }
    }

    let message = parsed.message.unwrap_or_else(|| {
        if body.is_empty() {
            "backend gave no reason".to_owned()
        } else {
            body.to_owned()
        }
    });

    Err(SyncError::UploadRejected(message))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn attributes_are_unwrapped_from_the_dataset_key() {
        let payload = json!({
            "sicaklik": {"Çankaya": "#ff0000", "Mamak": "#0000ff"},
            "nem": {"Çankaya": "#00ff00"}
        });

        let map = attribute_map_from(&payload, "sicaklik");
        assert_eq!(map.color_for("Çankaya"), "#ff0000");
        assert_eq!(map.color_for("Mamak"), "#0000ff");
    }

    #[test]
    fn missing_dataset_yields_an_empty_map() {
        let map = attribute_map_from(&json!({"nem": {}}), "sicaklik");
        assert!(map.is_empty());
    }

    #[test]
    fn non_string_colors_are_skipped() {
        let payload = json!({"sicaklik": {"Çankaya": 42, "Mamak": "#0000ff"}});
        let map = attribute_map_from(&payload, "sicaklik");
        assert_eq!(map.color_for("Mamak"), "#0000ff");
        assert_eq!(map.color_for("Çankaya"), harita_core::DEFAULT_FILL_COLOR);
    }

    #[test]
    fn successful_upload_yields_a_receipt() {
        let body = json!({
            "status": "success",
            "district": "Altındağ",
            "avg_temp": 23.456,
            "color": "#ffaa00"
        })
        .to_string();

        let receipt = interpret_upload_body(true, &body).unwrap();
        assert_eq!(receipt.district, "Altındağ");
        assert!((receipt.average - 23.456).abs() < f64::EPSILON);
        assert_eq!(receipt.color, "#ffaa00");
    }

    #[test]
    fn rejection_carries_the_backend_message() {
        let body = json!({"message": "sıcaklık sütunu bulunamadı"}).to_string();

        let error = interpret_upload_body(false, &body).unwrap_err();
        match error {
            SyncError::UploadRejected(message) => {
                assert_eq!(message, "sıcaklık sütunu bulunamadı");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn success_status_is_required_even_on_http_success() {
        let body = json!({"status": "error", "message": "desteklenmeyen veri tipi"}).to_string();

        let error = interpret_upload_body(true, &body).unwrap_err();
        assert!(matches!(error, SyncError::UploadRejected(_)));
    }

    #[test]
    fn unreadable_body_falls_back_to_raw_text() {
        let error = interpret_upload_body(false, "<html>500</html>").unwrap_err();
        match error {
            SyncError::UploadRejected(message) => assert_eq!(message, "<html>500</html>"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn urls_are_joined_without_duplicate_slashes() {
        let client = BackendClient::new(Client::new(), "http://127.0.0.1:5000/");
        assert_eq!(client.attributes_url(), "http://127.0.0.1:5000/get_data");
        assert_eq!(client.upload_url(), "http://127.0.0.1:5000/upload/sicaklik");
    }
}
