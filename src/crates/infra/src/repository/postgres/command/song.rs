use super::db_data::{song, song::ActiveModel, song::Entity, song::Model};
use async_trait::async_trait;
use domain::song::{Song, SongError, SongRepository};
use domain::value::{AlbumId, SongId};
use sea_orm::entity::prelude::*;
use sea_orm::*;

#[derive(Clone)]
pub struct SongRepositoryImpl {
    db: sea_orm::DbConn,
}

impl SongRepositoryImpl {
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SongRepository for SongRepositoryImpl {
    async fn by_id(&self, id: SongId) -> Result<Option<Song>, SongError> {
        let row: Option<Model> = Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| SongError::DbErr(e.to_string()))?;
        Ok(row.map(|m| m.into()))
    }

    async fn save(&self, song_agg: &Song) -> Result<(), SongError> {
        let exists = Entity::find_by_id(song_agg.id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| SongError::DbErr(e.to_string()))?
            .is_some();

        let mut active_model: ActiveModel = song_agg.into();

        if !exists {
            Entity::insert(active_model)
                .exec(&self.db)
                .await
                .map_err(|e| SongError::DbErr(e.to_string()))?;
            return Ok(());
        }

        active_model.created_at = NotSet;
        Entity::update_many()
            .set(active_model)
            .filter(song::Column::Id.eq(song_agg.id.as_i64()))
            .exec(&self.db)
            .await
            .map_err(|e| SongError::DbErr(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: SongId) -> Result<(), SongError> {
        let result = Entity::delete_by_id(id.as_i64())
            .exec(&self.db)
            .await
            .map_err(|e| SongError::DbErr(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(SongError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_by_album(&self, album_id: AlbumId) -> Result<u64, SongError> {
        let result = Entity::delete_many()
            .filter(song::Column::AlbumId.eq(album_id.as_i64()))
            .exec(&self.db)
            .await
            .map_err(|e| SongError::DbErr(e.to_string()))?;
        Ok(result.rows_affected)
    }

    async fn list(&self) -> Result<Vec<Song>, SongError> {
        let rows: Vec<Model> = Entity::find()
            .order_by_desc(song::Column::CreatedAt)
            .order_by_desc(song::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SongError::DbErr(e.to_string()))?;
        Ok(rows.into_iter().map(Song::from).collect())
    }
}
