use crate::command::asset::{AssetHost, MediaPayload};
use crate::command::shared::IdGenerator;
use crate::context::AppContext;
use crate::error::AppError;
use domain::album::AlbumRepository;
use domain::song::SongRepository;
use domain::value::AlbumId;
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CatalogPolicy {
    /// Reject songs pointing at an album id that does not resolve. When off,
    /// such a song is stored with a dangling album reference.
    pub strict_album_refs: bool,
}

/// Song and album commands of the admin backend. Keeps `Album.songs` and
/// `Song.album_id` pointing at each other across every mutation.
#[derive(Clone)]
pub struct CatalogService {
    pub(crate) id_generator: Arc<dyn IdGenerator>,
    pub(crate) song_repository: Arc<dyn SongRepository>,
    pub(crate) album_repository: Arc<dyn AlbumRepository>,
    pub(crate) asset_host: Arc<dyn AssetHost>,
    pub(crate) policy: CatalogPolicy,
}

impl CatalogService {
    pub fn new(
        id_generator: Arc<dyn IdGenerator>,
        song_repository: Arc<dyn SongRepository>,
        album_repository: Arc<dyn AlbumRepository>,
        asset_host: Arc<dyn AssetHost>,
        policy: CatalogPolicy,
    ) -> Self {
        Self {
            id_generator,
            song_repository,
            album_repository,
            asset_host,
            policy,
        }
    }

    pub(crate) async fn upload(
        &self,
        context: &AppContext,
        payload: &MediaPayload,
    ) -> Result<String, AppError> {
        match self.asset_host.upload(payload).await {
            Ok(url) => {
                debug!(
                    "[{}] uploaded {} '{}' ({} bytes) -> {}",
                    context.correlation_id,
                    payload.kind.as_str(),
                    payload.file_name,
                    payload.len(),
                    url
                );
                Ok(url)
            }
            Err(e) => {
                warn!(
                    "[{}] upload of {} '{}' failed: {}",
                    context.correlation_id,
                    payload.kind.as_str(),
                    payload.file_name,
                    e
                );
                Err(AppError::UploadFailed(e))
            }
        }
    }

    /// Uploads the payload if one was supplied. Empty payloads count as absent.
    pub(crate) async fn upload_optional(
        &self,
        context: &AppContext,
        payload: Option<&MediaPayload>,
    ) -> Result<Option<String>, AppError> {
        match payload.filter(|p| !p.is_empty()) {
            Some(p) => self.upload(context, p).await.map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn check_album_ref(&self, album_id: Option<&AlbumId>) -> Result<(), AppError> {
        let Some(album_id) = album_id else {
            return Ok(());
        };
        if !self.policy.strict_album_refs {
            return Ok(());
        }
        match self.album_repository.by_id(album_id.clone()).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation(format!(
                "Album {} does not exist",
                album_id
            ))),
        }
    }
}

pub(crate) fn required_text(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Missing field: {}", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn present(payload: Option<MediaPayload>) -> Option<MediaPayload> {
    payload.filter(|p| !p.is_empty())
}
