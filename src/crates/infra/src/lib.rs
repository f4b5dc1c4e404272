pub mod repository;

pub mod id_generator;
pub use id_generator::SnowflakeIdGenerator;

pub mod storage;
pub use storage::{AssetHostFactory, CloudinaryAssetHost, LocalAssetHost};

pub mod config;
pub use config::{AssetHostConfig, CatalogConfig, ServerConfig, StoreKind};

pub mod auth;
pub use auth::JwtTokenService;

pub use repository::{
    AlbumRepositoryImpl, InMemoryAlbumRepository, InMemorySongRepository, SongRepositoryImpl,
};
