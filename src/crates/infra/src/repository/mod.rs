pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryAlbumRepository, InMemorySongRepository};
pub use postgres::command::{AlbumRepositoryImpl, SongRepositoryImpl};
