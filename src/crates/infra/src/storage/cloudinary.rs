use application::command::asset::{AssetError, AssetHost, MediaPayload};
use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;

/// Signed uploads to a Cloudinary-compatible media host. The resource type is
/// left to the host (`auto`) so audio and images share one endpoint.
#[derive(Debug, Clone)]
pub struct CloudinaryAssetHost {
    client: Client,
    endpoint: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

impl CloudinaryAssetHost {
    pub fn new(
        api_base: &str,
        cloud_name: &str,
        api_key: &str,
        api_secret: &str,
        folder: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AssetError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1_1/{}/auto/upload",
                api_base.trim_end_matches('/'),
                cloud_name
            ),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            folder,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn signed_params(&self, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", timestamp.to_string());
        if let Some(folder) = &self.folder {
            params.insert("folder", folder.clone());
        }
        params
    }
}

/// `sha256("k1=v1&k2=v2" + secret)` over the params sorted by key.
pub(crate) fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn parse_upload_response(status: u16, body: &str) -> Result<String, AssetError> {
    let parsed: Option<UploadResponse> = serde_json::from_str(body).ok();
    if !(200..300).contains(&status) {
        let message = parsed
            .and_then(|r| r.error)
            .map(|e| e.message)
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(AssetError::Rejected { status, message });
    }
    parsed
        .and_then(|r| r.secure_url)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AssetError::InvalidResponse("missing secure_url".to_string()))
}

#[async_trait]
impl AssetHost for CloudinaryAssetHost {
    async fn upload(&self, payload: &MediaPayload) -> Result<String, AssetError> {
        let params = self.signed_params(Utc::now().timestamp());
        let signature = sign_params(&params, &self.api_secret);

        let mut part = Part::bytes(payload.data.to_vec()).file_name(payload.file_name.clone());
        if let Some(content_type) = &payload.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| AssetError::InvalidResponse(e.to_string()))?;
        }
        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AssetError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| AssetError::Transport(e.to_string()))?;
        if !(200..300).contains(&status) {
            warn!(
                "cloudinary rejected '{}' with status {}",
                payload.file_name, status
            );
        }
        parse_upload_response(status, &body)
    }
}
