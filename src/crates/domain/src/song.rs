use crate::value::{AlbumId, SongId};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SongError {
    #[error("Song not found: {0}")]
    NotFound(SongId),
    #[error("Invalid song field: {0}")]
    InvalidField(String),
    #[error("{0}")]
    DbErr(String),
    #[error("{0}")]
    OtherErr(String),
}

/// Scalar song fields. Every update overwrites all of them at once.
#[derive(Debug, Clone, PartialEq)]
pub struct SongDetails {
    pub title: String,
    pub artist: String,
    /// Length in seconds
    pub duration: u32,
    /// `None` marks a single that belongs to no album
    pub album_id: Option<AlbumId>,
}

/// Outcome of overwriting a song's details with respect to album membership.
#[derive(Debug, Clone, PartialEq)]
pub enum AlbumChange {
    Unchanged,
    Moved {
        from: Option<AlbumId>,
        to: Option<AlbumId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub image_url: String,
    pub duration: u32,
    pub album_id: Option<AlbumId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Song {
    pub fn new(id: SongId, details: SongDetails, audio_url: String, image_url: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id,
            title: details.title,
            artist: details.artist,
            audio_url,
            image_url,
            duration: details.duration,
            album_id: details.album_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites title, artist, duration and album affiliation, reporting
    /// whether the song moved between albums.
    pub fn apply_details(&mut self, details: SongDetails) -> AlbumChange {
        let change = if self.album_id == details.album_id {
            AlbumChange::Unchanged
        } else {
            AlbumChange::Moved {
                from: self.album_id.clone(),
                to: details.album_id.clone(),
            }
        };
        self.title = details.title;
        self.artist = details.artist;
        self.duration = details.duration;
        self.album_id = details.album_id;
        self.touch();
        change
    }

    pub fn replace_audio(&mut self, audio_url: String) {
        self.audio_url = audio_url;
        self.touch();
    }

    pub fn replace_image(&mut self, image_url: String) {
        self.image_url = image_url;
        self.touch();
    }

    pub fn is_single(&self) -> bool {
        self.album_id.is_none()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}

/// Song collection of the catalog store.
#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn by_id(&self, id: SongId) -> Result<Option<Song>, SongError>;

    /// Insert the song, or replace the stored document with the same id.
    async fn save(&self, song: &Song) -> Result<(), SongError>;

    /// Fails with `SongError::NotFound` when nothing was removed.
    async fn delete(&self, id: SongId) -> Result<(), SongError>;

    /// Bulk delete of every song affiliated with the album. Returns the number removed.
    async fn delete_by_album(&self, album_id: AlbumId) -> Result<u64, SongError>;

    /// All songs, newest first.
    async fn list(&self) -> Result<Vec<Song>, SongError>;
}
