use application::command::asset::{AssetError, AssetHost, MediaPayload};
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use uuid::Uuid;

/// Asset host that keeps media on the server's own disk. The directory is
/// expected to be served under `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalAssetHost {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetHost {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn extension_for(payload: &MediaPayload) -> String {
        if let Some(ext) = payload.extension() {
            return ext;
        }
        payload
            .content_type
            .as_deref()
            .and_then(|ct| mime_guess::get_mime_extensions_str(ct))
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
            .unwrap_or_else(|| "bin".to_string())
    }
}

#[async_trait]
impl AssetHost for LocalAssetHost {
    async fn upload(&self, payload: &MediaPayload) -> Result<String, AssetError> {
        let file_name = format!(
            "{}-{}.{}",
            payload.kind.as_str(),
            Uuid::new_v4().simple(),
            Self::extension_for(payload)
        );
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;
        tokio::fs::write(self.root.join(&file_name), &payload.data)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;
        debug!(
            "stored {} bytes under {}",
            payload.len(),
            self.root.join(&file_name).display()
        );
        Ok(format!("{}/{}", self.public_base_url, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use application::command::asset::MediaKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_upload_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("assets");
        let host = LocalAssetHost::new(root.clone(), "http://localhost:5000/resources/assets/");

        let payload = MediaPayload::new(MediaKind::Audio, "beat-it.mp3", None, b"ID3".to_vec());
        let url = host.upload(&payload).await.unwrap();

        assert!(url.starts_with("http://localhost:5000/resources/assets/audio-"));
        assert!(url.ends_with(".mp3"));
        let file_name = url.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(root.join(file_name)).unwrap(), b"ID3");
    }

    #[tokio::test]
    async fn test_extension_from_content_type() {
        let temp_dir = TempDir::new().unwrap();
        let host = LocalAssetHost::new(temp_dir.path().to_path_buf(), "http://h");

        let payload = MediaPayload::new(
            MediaKind::Image,
            "blob",
            Some("image/png".to_string()),
            vec![1u8, 2, 3],
        );
        let url = host.upload(&payload).await.unwrap();
        assert!(url.ends_with(".png"), "{}", url);

        let payload = MediaPayload::new(MediaKind::Image, "blob", None, vec![1u8]);
        assert!(host.upload(&payload).await.unwrap().ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_each_upload_gets_its_own_url() {
        let temp_dir = TempDir::new().unwrap();
        let host = LocalAssetHost::new(temp_dir.path().to_path_buf(), "http://h");
        let payload = MediaPayload::new(MediaKind::Image, "a.jpg", None, vec![1u8]);
        let first = host.upload(&payload).await.unwrap();
        let second = host.upload(&payload).await.unwrap();
        assert_ne!(first, second);
    }
}
