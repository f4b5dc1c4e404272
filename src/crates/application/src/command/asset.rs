use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }
}

/// A binary file received from the admin UI, not yet stored anywhere.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl MediaPayload {
    pub fn new(
        kind: MediaKind,
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            content_type,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lower-cased extension of the original file name, if it has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("asset host unreachable: {0}")]
    Transport(String),
    #[error("unexpected asset host response: {0}")]
    InvalidResponse(String),
    #[error("asset io error: {0}")]
    Io(String),
}

/// External service that durably stores media and hands back a public URL.
/// One attempt per call; callers never retry.
#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, payload: &MediaPayload) -> Result<String, AssetError>;
}
