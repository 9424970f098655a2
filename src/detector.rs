use crate::detection_models::Detection;
use crate::error::{Error, Result};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8500/detect";
const USER_AGENT: &str = "asc_reconstruct/0.0.1";

#[derive(Deserialize, Debug)]
pub struct DetectorResponse {
    pub success: bool,
    pub result: Option<Vec<Detection>>,
    pub message: Option<String>,
}

impl DetectorResponse {
    /// Unwraps the detection list, turning a reported failure into an error.
    pub fn into_detections(self) -> Result<Vec<Detection>> {
        if self.success {
            self.result.ok_or_else(|| {
                Error::MissingData("Detector response missing 'result' field".to_string())
            })
        } else {
            let msg = self
                .message
                .unwrap_or_else(|| "Unknown detector error".to_string());
            Err(Error::MissingData(format!("Detector error: {}", msg)))
        }
    }
}

/// Client for the external symbol detector. It receives raw image bytes and
/// answers with class-labeled box centers.
pub struct DetectorApi {
    client: reqwest::Client,
    endpoint: String,
}

impl DetectorApi {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(DetectorApi {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn detect(&self, image: bytes::Bytes) -> Result<Vec<Detection>> {
        let res = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Error::MissingData(format!(
                "Detector at {} answered with status {}",
                self.endpoint,
                res.status()
            )));
        }

        res.json::<DetectorResponse>().await?.into_detections()
    }
}
