pub mod admin_api;
pub mod consts;
pub mod dto;
pub mod error;
pub mod form;
pub mod middleware;
pub mod resources;

use application::auth::{AdminGate, TokenAdminGate, TokenService};
use application::command::asset::AssetHost;
use application::command::catalog::{CatalogPolicy, CatalogService};
use application::command::shared::IdGenerator;
use application::error::AppError;
use application::query::catalog::CatalogQuery;
use domain::album::AlbumRepository;
use domain::song::SongRepository;
use infra::config::{AppConfigImpl, StoreKind};
use infra::{
    AlbumRepositoryImpl, AssetHostFactory, InMemoryAlbumRepository, InMemorySongRepository,
    JwtTokenService, SnowflakeIdGenerator, SongRepositoryImpl,
};
use log::{info, warn};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement};
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub app_cfg: AppConfigImpl,
    pub catalog: CatalogService,
    pub query: CatalogQuery,
    pub gate: Arc<dyn AdminGate>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(90)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(3))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .max_lifetime(Duration::from_secs(300))
            .sqlx_logging(false)
            .sqlx_logging_level(log::LevelFilter::Info);

        let db = Database::connect(opt).await?;
        db.execute(Statement::from_string(
            DbBackend::Postgres,
            "SELECT 1".to_owned(),
        ))
        .await?;

        info!("Database connection pool initialized successfully");
        Ok(db)
    }

    /// Builds the state for the configured store kind, connecting to the
    /// database when needed.
    pub async fn from_config(app_cfg: AppConfigImpl) -> anyhow::Result<Self> {
        let (song_repository, album_repository): (
            Arc<dyn SongRepository>,
            Arc<dyn AlbumRepository>,
        ) = match app_cfg.store() {
            StoreKind::Postgres => {
                let db = Self::init_db(&app_cfg.database_url()).await?;
                (
                    Arc::new(SongRepositoryImpl::new(db.clone())),
                    Arc::new(AlbumRepositoryImpl::new(db)),
                )
            }
            StoreKind::Memory => {
                warn!("Using the in-memory catalog store, data is lost on restart");
                (
                    Arc::new(InMemorySongRepository::new()),
                    Arc::new(InMemoryAlbumRepository::new()),
                )
            }
        };
        let asset_host = AssetHostFactory::create(&app_cfg.asset_host())?;
        Ok(Self::assemble(
            app_cfg,
            song_repository,
            album_repository,
            asset_host,
        )?)
    }

    pub fn assemble(
        app_cfg: AppConfigImpl,
        song_repository: Arc<dyn SongRepository>,
        album_repository: Arc<dyn AlbumRepository>,
        asset_host: Arc<dyn AssetHost>,
    ) -> Result<Self, AppError> {
        let id_generator: Arc<dyn IdGenerator> =
            Arc::new(SnowflakeIdGenerator::new(app_cfg.node_id())?);
        let token_svc: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_config(&app_cfg));
        let gate: Arc<dyn AdminGate> =
            Arc::new(TokenAdminGate::new(token_svc, app_cfg.admin_usernames()));
        let policy = CatalogPolicy {
            strict_album_refs: app_cfg.catalog().strict_album_refs,
        };

        let catalog = CatalogService::new(
            id_generator,
            song_repository.clone(),
            album_repository.clone(),
            asset_host,
            policy,
        );
        let query = CatalogQuery::new(song_repository, album_repository);

        Ok(Self {
            max_upload_bytes: app_cfg.server().max_upload_bytes,
            app_cfg,
            catalog,
            query,
            gate,
        })
    }
}
