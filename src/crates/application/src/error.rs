use crate::command::asset::AssetError;
use domain::album::AlbumError;
use domain::song::SongError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found: {1}")]
    AggregateNotFound(String, String),
    #[error("Upload failed: {0}")]
    UploadFailed(#[from] AssetError),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Song error: {0}")]
    SongError(SongError),
    #[error("Album error: {0}")]
    AlbumError(AlbumError),
    #[error("Auth error: {0}")]
    AuthError(String),
    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl AppError {
    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        AppError::AggregateNotFound(kind.to_string(), id.to_string())
    }
}

impl From<SongError> for AppError {
    fn from(err: SongError) -> Self {
        match err {
            SongError::NotFound(id) => AppError::not_found("Song", id),
            SongError::InvalidField(msg) => AppError::Validation(msg),
            other => AppError::SongError(other),
        }
    }
}

impl From<AlbumError> for AppError {
    fn from(err: AlbumError) -> Self {
        match err {
            AlbumError::NotFound(id) => AppError::not_found("Album", id),
            AlbumError::InvalidField(msg) => AppError::Validation(msg),
            other => AppError::AlbumError(other),
        }
    }
}
