use crate::error::AppError;

/// Source of unique document ids for songs and albums
#[async_trait::async_trait]
pub trait IdGenerator: Send + Sync {
    async fn next_id(&self) -> Result<i64, AppError>;
}
