use domain::song::Song;
use domain::value::{AlbumId, SongId};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "song")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub image_url: String,
    #[sea_orm(column_type = "BigInteger")]
    pub duration: i64,
    #[sea_orm(column_type = "BigInteger", nullable)]
    pub album_id: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Song> for ActiveModel {
    fn from(song: &Song) -> Self {
        Self {
            id: Set(song.id.as_i64()),
            title: Set(song.title.clone()),
            artist: Set(song.artist.clone()),
            audio_url: Set(song.audio_url.clone()),
            image_url: Set(song.image_url.clone()),
            duration: Set(song.duration as i64),
            album_id: Set(song.album_id.as_ref().map(|id| id.as_i64())),
            created_at: Set(song.created_at),
            updated_at: Set(song.updated_at),
        }
    }
}

impl From<Model> for Song {
    fn from(model: Model) -> Self {
        Song {
            id: SongId::from(model.id),
            title: model.title,
            artist: model.artist,
            audio_url: model.audio_url,
            image_url: model.image_url,
            duration: u32::try_from(model.duration).unwrap_or_default(),
            album_id: model.album_id.map(AlbumId::from),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
