use crate::config::AssetHostConfig;
use application::command::asset::AssetHost;
use application::error::AppError;
use std::sync::Arc;
use std::time::Duration;

use super::cloudinary::CloudinaryAssetHost;
use super::local::LocalAssetHost;

#[derive(Debug, Clone)]
pub struct AssetHostFactory;

impl AssetHostFactory {
    pub fn create(cfg: &AssetHostConfig) -> Result<Arc<dyn AssetHost>, AppError> {
        match cfg {
            AssetHostConfig::Local {
                dir,
                public_base_url,
            } => Ok(Arc::new(LocalAssetHost::new(dir.clone(), public_base_url))),
            AssetHostConfig::Cloudinary {
                api_base,
                cloud_name,
                api_key,
                api_secret,
                folder,
                timeout_secs,
            } => {
                if cloud_name.is_empty() || api_key.is_empty() || api_secret.is_empty() {
                    return Err(AppError::UnknownError(
                        "cloudinary asset host needs cloud_name, api_key and api_secret"
                            .to_string(),
                    ));
                }
                let host = CloudinaryAssetHost::new(
                    api_base,
                    cloud_name,
                    api_key,
                    api_secret,
                    folder.clone(),
                    Duration::from_secs(*timeout_secs),
                )?;
                Ok(Arc::new(host))
            }
            AssetHostConfig::Unsupported(kind) => Err(AppError::UnknownError(format!(
                "Unsupported asset host: {}",
                kind
            ))),
        }
    }
}
