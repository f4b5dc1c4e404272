use crate::value::{AlbumId, SongId};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("Album not found: {0}")]
    NotFound(AlbumId),
    #[error("Invalid album field: {0}")]
    InvalidField(String),
    #[error("{0}")]
    DbErr(String),
    #[error("{0}")]
    OtherErr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumDetails {
    pub title: String,
    pub artist: String,
    pub release_year: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
    /// Songs in insertion order, no duplicates
    pub songs: Vec<SongId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Album {
    /// A fresh album always starts without songs.
    pub fn new(id: AlbumId, details: AlbumDetails, image_url: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id,
            title: details.title,
            artist: details.artist,
            image_url,
            release_year: details.release_year,
            songs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_details(&mut self, details: AlbumDetails) {
        self.title = details.title;
        self.artist = details.artist;
        self.release_year = details.release_year;
        self.touch();
    }

    pub fn replace_image(&mut self, image_url: String) {
        self.image_url = image_url;
        self.touch();
    }

    /// Appends the song unless it is already listed.
    pub fn add_song(&mut self, song_id: &SongId) -> bool {
        if self.songs.contains(song_id) {
            return false;
        }
        self.songs.push(song_id.clone());
        self.touch();
        true
    }

    pub fn remove_song(&mut self, song_id: &SongId) -> bool {
        let before = self.songs.len();
        self.songs.retain(|id| id != song_id);
        let removed = self.songs.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn contains_song(&self, song_id: &SongId) -> bool {
        self.songs.contains(song_id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}

/// Album collection of the catalog store.
///
/// `push_song` and `pull_song` are single atomic array mutations on the
/// stored document. Callers must use them instead of load/modify/save so
/// concurrent membership changes on one album are never lost.
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    async fn by_id(&self, id: AlbumId) -> Result<Option<Album>, AlbumError>;

    /// Insert the album, or overwrite the stored one. The stored song list is
    /// left untouched on overwrite.
    async fn save(&self, album: &Album) -> Result<(), AlbumError>;

    /// Fails with `AlbumError::NotFound` when nothing was removed.
    async fn delete(&self, id: AlbumId) -> Result<(), AlbumError>;

    /// Append `song_id` to the album's songs if absent. `false` when the album
    /// does not exist or already lists the song.
    async fn push_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError>;

    /// Remove `song_id` from the album's songs. `false` when nothing changed.
    async fn pull_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError>;

    /// All albums, newest first.
    async fn list(&self) -> Result<Vec<Album>, AlbumError>;
}
