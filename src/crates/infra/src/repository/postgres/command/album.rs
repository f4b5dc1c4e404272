use super::db_data::{album, album::ActiveModel, album::Entity, album::Model};
use async_trait::async_trait;
use chrono::Utc;
use domain::album::{Album, AlbumError, AlbumRepository};
use domain::value::{AlbumId, SongId};
use sea_orm::entity::prelude::*;
use sea_orm::*;

// Membership changes are single statements so concurrent pushes and pulls on
// one album never overwrite each other.
const PUSH_SONG_SQL: &str = r#"
UPDATE "album"
SET "songs" = array_append("songs", $1), "updated_at" = $2
WHERE "id" = $3 AND NOT ($1 = ANY("songs"))
"#;

const PULL_SONG_SQL: &str = r#"
UPDATE "album"
SET "songs" = array_remove("songs", $1), "updated_at" = $2
WHERE "id" = $3 AND $1 = ANY("songs")
"#;

#[derive(Clone)]
pub struct AlbumRepositoryImpl {
    db: sea_orm::DbConn,
}

impl AlbumRepositoryImpl {
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self { db }
    }

    async fn mutate_songs(
        &self,
        sql: &str,
        album_id: AlbumId,
        song_id: SongId,
    ) -> Result<bool, AlbumError> {
        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [
                    song_id.as_i64().into(),
                    Utc::now().naive_utc().into(),
                    album_id.as_i64().into(),
                ],
            ))
            .await
            .map_err(|e| AlbumError::DbErr(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AlbumRepository for AlbumRepositoryImpl {
    async fn by_id(&self, id: AlbumId) -> Result<Option<Album>, AlbumError> {
        let row: Option<Model> = Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| AlbumError::DbErr(e.to_string()))?;
        Ok(row.map(|m| m.into()))
    }

    async fn save(&self, album_agg: &Album) -> Result<(), AlbumError> {
        let exists = Entity::find_by_id(album_agg.id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| AlbumError::DbErr(e.to_string()))?
            .is_some();

        let mut active_model: ActiveModel = album_agg.into();

        if !exists {
            Entity::insert(active_model)
                .exec(&self.db)
                .await
                .map_err(|e| AlbumError::DbErr(e.to_string()))?;
            return Ok(());
        }

        // songs is owned by push_song/pull_song
        active_model.songs = NotSet;
        active_model.created_at = NotSet;
        Entity::update_many()
            .set(active_model)
            .filter(album::Column::Id.eq(album_agg.id.as_i64()))
            .exec(&self.db)
            .await
            .map_err(|e| AlbumError::DbErr(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: AlbumId) -> Result<(), AlbumError> {
        let result = Entity::delete_by_id(id.as_i64())
            .exec(&self.db)
            .await
            .map_err(|e| AlbumError::DbErr(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(AlbumError::NotFound(id));
        }
        Ok(())
    }

    async fn push_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError> {
        self.mutate_songs(PUSH_SONG_SQL, album_id, song_id).await
    }

    async fn pull_song(&self, album_id: AlbumId, song_id: SongId) -> Result<bool, AlbumError> {
        self.mutate_songs(PULL_SONG_SQL, album_id, song_id).await
    }

    async fn list(&self) -> Result<Vec<Album>, AlbumError> {
        let rows: Vec<Model> = Entity::find()
            .order_by_desc(album::Column::CreatedAt)
            .order_by_desc(album::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AlbumError::DbErr(e.to_string()))?;
        Ok(rows.into_iter().map(Album::from).collect())
    }
}
