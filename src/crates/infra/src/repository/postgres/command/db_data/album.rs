use domain::album::Album;
use domain::value::{AlbumId, SongId};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "album")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
    /// Song ids in insertion order
    pub songs: Vec<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Album> for ActiveModel {
    fn from(album: &Album) -> Self {
        Self {
            id: Set(album.id.as_i64()),
            title: Set(album.title.clone()),
            artist: Set(album.artist.clone()),
            image_url: Set(album.image_url.clone()),
            release_year: Set(album.release_year),
            songs: Set(album.songs.iter().map(|id| id.as_i64()).collect()),
            created_at: Set(album.created_at),
            updated_at: Set(album.updated_at),
        }
    }
}

impl From<Model> for Album {
    fn from(model: Model) -> Self {
        Album {
            id: AlbumId::from(model.id),
            title: model.title,
            artist: model.artist,
            image_url: model.image_url,
            release_year: model.release_year,
            songs: model.songs.into_iter().map(SongId::from).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
