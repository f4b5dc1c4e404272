pub mod album;
pub mod db_data;
pub mod song;

pub use album::AlbumRepositoryImpl;
pub use song::SongRepositoryImpl;
