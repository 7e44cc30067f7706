use async_trait::async_trait;
use enricher_core::{ClassificationConfig, ClipConfig, MachineLearningRepo, VisionModelInput};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

const CLASSIFY_PATH: &str = "image-classifier/tag-image";
const ENCODE_IMAGE_PATH: &str = "sentence-transformer/encode-image";

/// Body of an image model request: the input path flattened together with
/// the model's config section.
#[derive(Serialize)]
struct ModelRequest<'a, C: Serialize> {
    #[serde(flatten)]
    input: &'a VisionModelInput,
    #[serde(flatten)]
    config: &'a C,
}

/// HTTP client of the machine learning service.
///
/// The base URL is passed on every call so changes to the stored config take
/// effect without rebuilding the client. Failures are returned as-is; callers
/// decide whether to retry.
pub struct MachineLearningClient {
    client: Client,
}

impl Default for MachineLearningClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineLearningClient {
    /// Convert f64 to f32 for embedding values
    /// Precision loss is acceptable for CLIP embeddings
    #[expect(clippy::cast_possible_truncation, reason = "CLIP embeddings use f32")]
    const fn f64_to_f32(x: f64) -> f32 {
        x as f32
    }

    #[must_use]
    pub fn new() -> Self {
        info!("Creating MachineLearningClient");
        Self {
            client: Client::new(),
        }
    }

    fn endpoint(url: &str, path: &str) -> String {
        format!("{}/{path}", url.trim_end_matches('/'))
    }

    async fn post<C, T>(
        &self,
        url: &str,
        path: &str,
        input: &VisionModelInput,
        config: &C,
    ) -> anyhow::Result<T>
    where
        C: Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let endpoint = Self::endpoint(url, path);
        debug!("POST {endpoint} for {}", input.image_path);
        let response = self
            .client
            .post(&endpoint)
            .json(&ModelRequest { input, config })
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl MachineLearningRepo for MachineLearningClient {
    async fn classify_image(
        &self,
        url: &str,
        input: &VisionModelInput,
        config: &ClassificationConfig,
    ) -> anyhow::Result<Vec<String>> {
        self.post(url, CLASSIFY_PATH, input, config).await
    }

    async fn encode_image(
        &self,
        url: &str,
        input: &VisionModelInput,
        config: &ClipConfig,
    ) -> anyhow::Result<Vec<f32>> {
        let embedding: Vec<f64> = self.post(url, ENCODE_IMAGE_PATH, input, config).await?;
        Ok(embedding.into_iter().map(Self::f64_to_f32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            MachineLearningClient::endpoint("http://ml:3003/", CLASSIFY_PATH),
            "http://ml:3003/image-classifier/tag-image"
        );
        assert_eq!(
            MachineLearningClient::endpoint("http://ml:3003", ENCODE_IMAGE_PATH),
            "http://ml:3003/sentence-transformer/encode-image"
        );
    }

    #[test]
    fn request_body_flattens_input_and_config() {
        let input = VisionModelInput {
            image_path: "/thumbs/a.jpg".to_string(),
        };
        let config = ClassificationConfig::default();
        let body = serde_json::to_value(ModelRequest {
            input: &input,
            config: &config,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "imagePath": "/thumbs/a.jpg",
                "enabled": true,
                "minScore": 0.9,
                "modelName": "microsoft/resnet-50",
            })
        );
    }
}
