use crate::error::AppError;
use domain::album::{Album, AlbumRepository};
use domain::song::{Song, SongRepository};
use domain::value::AlbumId;
use std::sync::Arc;

/// Read side used by the admin tables.
#[derive(Clone)]
pub struct CatalogQuery {
    song_repository: Arc<dyn SongRepository>,
    album_repository: Arc<dyn AlbumRepository>,
}

impl CatalogQuery {
    pub fn new(
        song_repository: Arc<dyn SongRepository>,
        album_repository: Arc<dyn AlbumRepository>,
    ) -> Self {
        Self {
            song_repository,
            album_repository,
        }
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>, AppError> {
        Ok(self.song_repository.list().await?)
    }

    pub async fn list_albums(&self) -> Result<Vec<Album>, AppError> {
        Ok(self.album_repository.list().await?)
    }

    pub async fn get_album(&self, id: AlbumId) -> Result<Album, AppError> {
        self.album_repository
            .by_id(id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("Album", &id))
    }
}
