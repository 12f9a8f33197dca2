//! Imagen Client - 调用 Imagen predict 接口
//!
//! 实现 ImageModelPort
//!
//! Imagen API:
//! POST {api_base}/models/{model}:predict
//! Header: x-goog-api-key
//! Request: {"instances": [{"prompt": "..."}], "parameters": {"sampleCount": 1, "aspectRatio": "16:9", ...}}
//! Response: {"predictions": [{"bytesBase64Encoded": "...", "mimeType": "image/png"}]}

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ImageModelError, ImageModelPort, ImageModelRequest, RawImage};

/// 单次请求允许的最大图片数
const MAX_SAMPLE_COUNT: u8 = 4;

/// Imagen 客户端配置
#[derive(Debug, Clone)]
pub struct ImagenClientConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl ImagenClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "imagen-3.0-generate-002".to_string(),
            api_key: api_key.into(),
            timeout_secs: 120,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u8,
    aspect_ratio: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
}

impl From<ImageModelRequest> for PredictRequest {
    fn from(request: ImageModelRequest) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.number_of_images.clamp(1, MAX_SAMPLE_COUNT),
                aspect_ratio: request.aspect_ratio.as_str(),
                negative_prompt: request.negative_prompt,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    /// 被安全策略过滤时的原因
    #[serde(default)]
    rai_filtered_reason: Option<String>,
}

/// 解码 predictions；没有图片数据的条目跳过
fn decode_predictions(response: PredictResponse) -> Result<Vec<RawImage>, ImageModelError> {
    let mut images = Vec::with_capacity(response.predictions.len());

    for prediction in response.predictions {
        let Some(encoded) = prediction.bytes_base64_encoded else {
            tracing::warn!(
                reason = ?prediction.rai_filtered_reason,
                "Imagen prediction without image bytes, skipping"
            );
            continue;
        };

        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| ImageModelError::InvalidResponse(format!("Image base64 decode failed: {}", e)))?;

        images.push(RawImage {
            bytes,
            mime_type: prediction.mime_type,
        });
    }

    Ok(images)
}

/// Imagen 客户端
pub struct ImagenClient {
    client: Client,
    config: ImagenClientConfig,
}

impl ImagenClient {
    pub fn new(config: ImagenClientConfig) -> Result<Self, ImageModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageModelError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn predict_url(&self) -> String {
        format!(
            "{}/models/{}:predict",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ImageModelPort for ImagenClient {
    async fn generate(&self, request: ImageModelRequest) -> Result<Vec<RawImage>, ImageModelError> {
        let body = PredictRequest::from(request);

        tracing::debug!(
            url = %self.predict_url(),
            prompt_len = body.instances[0].prompt.len(),
            aspect_ratio = body.parameters.aspect_ratio,
            sample_count = body.parameters.sample_count,
            "Sending Imagen predict request"
        );

        let response = self
            .client
            .post(self.predict_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageModelError::Timeout
                } else if e.is_connect() {
                    ImageModelError::NetworkError(format!("Cannot connect to Imagen API: {}", e))
                } else {
                    ImageModelError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageModelError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let payload: PredictResponse = response
            .json()
            .await
            .map_err(|e| ImageModelError::InvalidResponse(e.to_string()))?;

        let images = decode_predictions(payload)?;

        tracing::info!(
            images = images.len(),
            total_bytes = images.iter().map(|i| i.bytes.len()).sum::<usize>(),
            "Imagen prediction completed"
        );

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::AspectRatio;
    use serde_json::json;

    #[test]
    fn test_predict_url() {
        let client = ImagenClient::new(ImagenClientConfig::new("k")).unwrap();
        assert_eq!(
            client.predict_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/imagen-3.0-generate-002:predict"
        );
    }

    #[test]
    fn test_request_body() {
        let request = ImageModelRequest {
            prompt: "a meadow".to_string(),
            negative_prompt: Some("blurry".to_string()),
            aspect_ratio: AspectRatio::Landscape,
            number_of_images: 1,
        };
        let body = serde_json::to_value(PredictRequest::from(request)).unwrap();
        assert_eq!(
            body,
            json!({
                "instances": [{"prompt": "a meadow"}],
                "parameters": {"sampleCount": 1, "aspectRatio": "16:9", "negativePrompt": "blurry"}
            })
        );
    }

    #[test]
    fn test_sample_count_clamped() {
        let request = ImageModelRequest {
            prompt: "x".to_string(),
            negative_prompt: None,
            aspect_ratio: AspectRatio::Square,
            number_of_images: 9,
        };
        let body = PredictRequest::from(request);
        assert_eq!(body.parameters.sample_count, 4);
        assert!(body.parameters.negative_prompt.is_none());
    }

    #[test]
    fn test_decode_predictions() {
        let payload: PredictResponse = serde_json::from_value(json!({
            "predictions": [
                {"bytesBase64Encoded": "iVBORw==", "mimeType": "image/png"},
                {"raiFilteredReason": "filtered"},
                {"bytesBase64Encoded": "/9j/", "mimeType": "image/jpeg"}
            ]
        }))
        .unwrap();

        let images = decode_predictions(payload).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].bytes, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(images[0].format(), "png");
        assert_eq!(images[1].format(), "jpeg");
    }

    #[test]
    fn test_empty_predictions() {
        let payload: PredictResponse = serde_json::from_value(json!({})).unwrap();
        assert!(decode_predictions(payload).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_base64() {
        let payload: PredictResponse =
            serde_json::from_value(json!({"predictions": [{"bytesBase64Encoded": "***"}]})).unwrap();
        let err = decode_predictions(payload).unwrap_err();
        assert!(matches!(err, ImageModelError::InvalidResponse(_)));
    }
}
