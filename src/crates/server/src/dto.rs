use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Utc};
use domain::album::Album;
use domain::song::Song;
use serde::Serialize;

fn timestamp(at: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(at)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    pub duration: u32,
    pub album_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Song> for SongDto {
    fn from(song: Song) -> Self {
        Self {
            id: song.id.to_string(),
            title: song.title,
            artist: song.artist,
            image_url: song.image_url,
            audio_url: song.audio_url,
            duration: song.duration,
            album_id: song.album_id.map(|id| id.to_string()),
            created_at: timestamp(&song.created_at),
            updated_at: timestamp(&song.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
    pub songs: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Album> for AlbumDto {
    fn from(album: Album) -> Self {
        Self {
            id: album.id.to_string(),
            title: album.title,
            artist: album.artist,
            image_url: album.image_url,
            release_year: album.release_year,
            songs: album.songs.iter().map(|id| id.to_string()).collect(),
            created_at: timestamp(&album.created_at),
            updated_at: timestamp(&album.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
