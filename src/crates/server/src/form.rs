use crate::consts::*;
use crate::error::ApiError;
use actix_multipart::Multipart;
use application::command::album::{CreateAlbumCmd, UpdateAlbumCmd};
use application::command::asset::{MediaKind, MediaPayload};
use application::command::song::{CreateSongCmd, UpdateSongCmd};
use bytes::{Bytes, BytesMut};
use domain::album::AlbumDetails;
use domain::song::SongDetails;
use domain::value::{AlbumId, SongId};
use futures::TryStreamExt;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct FormFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Text and file parts of a multipart request, keyed by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, FormFile>,
}

impl MultipartForm {
    /// Drains the multipart stream. Any single part larger than
    /// `max_part_bytes` fails the whole request.
    pub async fn read(mut payload: Multipart, max_part_bytes: usize) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();
        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);
            let content_type = field.content_type().map(|m| m.to_string());

            let mut data = BytesMut::new();
            while let Some(chunk) = field
                .try_next()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
            {
                if data.len() + chunk.len() > max_part_bytes {
                    return Err(ApiError::BadRequest(format!(
                        "Field {} exceeds the upload limit of {} bytes",
                        name, max_part_bytes
                    )));
                }
                data.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) => {
                    // browsers send an empty part for an untouched file input
                    if data.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        FormFile {
                            file_name,
                            content_type,
                            data: data.freeze(),
                        },
                    );
                }
                None => {
                    let text = String::from_utf8(data.to_vec()).map_err(|_| {
                        ApiError::BadRequest(format!("Field {} is not valid UTF-8", name))
                    })?;
                    form.texts.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn text(&self, name: &str) -> String {
        self.texts.get(name).cloned().unwrap_or_default()
    }

    fn file(&mut self, name: &str, kind: MediaKind) -> Option<MediaPayload> {
        self.files
            .remove(name)
            .map(|f| MediaPayload::new(kind, f.file_name, f.content_type, f.data))
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> Result<T, ApiError> {
        let raw = self.text(name);
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ApiError::BadRequest(format!("Missing field: {}", name)));
        }
        raw.parse::<T>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid field: {}", name)))
    }

    /// Seconds. The admin UI may send fractional values from audio metadata.
    fn duration(&self) -> Result<u32, ApiError> {
        if let Ok(secs) = self.number::<u32>(FIELD_DURATION) {
            return Ok(secs);
        }
        let secs = self.number::<f64>(FIELD_DURATION)?;
        if !secs.is_finite() || secs < 0.0 || secs > u32::MAX as f64 {
            return Err(ApiError::BadRequest(format!(
                "Invalid field: {}",
                FIELD_DURATION
            )));
        }
        Ok(secs.round() as u32)
    }

    /// Empty, `none` and `null` all mean the song is a single.
    fn album_ref(&self) -> Result<Option<AlbumId>, ApiError> {
        let raw = self.text(FIELD_ALBUM_ID);
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("null") {
            return Ok(None);
        }
        raw.parse::<AlbumId>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid field: {}", FIELD_ALBUM_ID)))
    }
}

/// Typed body of song create and update requests.
#[derive(Debug)]
pub struct SongForm {
    details: SongDetails,
    audio: Option<MediaPayload>,
    image: Option<MediaPayload>,
}

impl SongForm {
    pub fn parse(mut form: MultipartForm) -> Result<Self, ApiError> {
        let details = SongDetails {
            title: form.text(FIELD_TITLE),
            artist: form.text(FIELD_ARTIST),
            duration: form.duration()?,
            album_id: form.album_ref()?,
        };
        Ok(Self {
            details,
            audio: form.file(FIELD_AUDIO_FILE, MediaKind::Audio),
            image: form.file(FIELD_IMAGE_FILE, MediaKind::Image),
        })
    }

    pub fn into_create(self) -> CreateSongCmd {
        CreateSongCmd {
            details: self.details,
            audio: self.audio,
            image: self.image,
        }
    }

    pub fn into_update(self, id: SongId) -> UpdateSongCmd {
        UpdateSongCmd {
            id,
            details: self.details,
            audio: self.audio,
            image: self.image,
        }
    }
}

/// Typed body of album create and update requests.
#[derive(Debug)]
pub struct AlbumForm {
    details: AlbumDetails,
    image: Option<MediaPayload>,
}

impl AlbumForm {
    pub fn parse(mut form: MultipartForm) -> Result<Self, ApiError> {
        let details = AlbumDetails {
            title: form.text(FIELD_TITLE),
            artist: form.text(FIELD_ARTIST),
            release_year: form.number::<i32>(FIELD_RELEASE_YEAR)?,
        };
        Ok(Self {
            details,
            image: form.file(FIELD_IMAGE_FILE, MediaKind::Image),
        })
    }

    pub fn into_create(self) -> CreateAlbumCmd {
        CreateAlbumCmd {
            details: self.details,
            image: self.image,
        }
    }

    pub fn into_update(self, id: AlbumId) -> UpdateAlbumCmd {
        UpdateAlbumCmd {
            id,
            details: self.details,
            image: self.image,
        }
    }
}
