mod album;
mod song;

pub use album::InMemoryAlbumRepository;
pub use song::InMemorySongRepository;
