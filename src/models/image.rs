use crate::error::ImageError;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
}

impl PredictRequest {
    /// One image for one prompt.
    pub fn single(prompt: impl Into<String>) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.into(),
            }],
            parameters: PredictParameters { sample_count: 1 },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

/// A decoded image ready to be displayed or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Decodes the first prediction carrying an encoded payload.
    pub fn from_response(response: PredictResponse) -> Result<Self, ImageError> {
        let prediction = response.predictions.into_iter().next().ok_or_else(|| {
            ImageError::InvalidImagePayload("response contains no predictions".into())
        })?;
        let encoded = prediction.bytes_base64_encoded.ok_or_else(|| {
            ImageError::InvalidImagePayload("prediction has no bytesBase64Encoded field".into())
        })?;

        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ImageError::InvalidImagePayload(format!("bad base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(ImageError::InvalidImagePayload("image payload is empty".into()));
        }

        Ok(Self {
            bytes,
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// `data:` URI suitable for embedding the image directly.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}
