pub const URL_PATH_ADMIN_API: &str = "/admin";
pub const URL_PATH_HEALTH: &str = "/health";
pub const URL_PATH_RESOURCES: &str = "/resources";

/// Header the admin UI uses when it cannot set `Authorization` itself
pub const UI_AUTHORIZATION_HEADER: &str = "x-catalog-authorization";

pub const FIELD_TITLE: &str = "title";
pub const FIELD_ARTIST: &str = "artist";
pub const FIELD_DURATION: &str = "duration";
pub const FIELD_ALBUM_ID: &str = "albumId";
pub const FIELD_RELEASE_YEAR: &str = "releaseYear";
pub const FIELD_AUDIO_FILE: &str = "audioFile";
pub const FIELD_IMAGE_FILE: &str = "imageFile";
