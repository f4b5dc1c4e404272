use crate::auth::AuthConfig;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;
use std::path::PathBuf;

/// URL prefix under which the server exposes locally stored assets
pub const LOCAL_ASSET_ROUTE: &str = "/resources/assets";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    jwt_expire_secs: i64,
    jwt_secret_key: String,
    /// 即使 token 不带 admin 标记也放行的用户名
    admin_usernames: Vec<String>,
    database_url: String,
    base_url: String,
    /// 雪花算法节点 ID
    node_id: i64,
    server: RawServerConfig,
    asset_host: RawAssetHostConfig,
    catalog: RawCatalogConfig,
    store: RawStoreConfig,
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
    /// 单个上传文件的最大字节数
    max_upload_bytes: usize,
    /// 静态资源目录
    resources_dir: String,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 50 * 1024 * 1024,
            resources_dir: "resources".to_string(),
        }
    }
}

/// 媒体托管配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawAssetHostConfig {
    /// "local" 或 "cloudinary"
    kind: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: String,
    folder: String,
    timeout_secs: u64,
}

impl Default for RawAssetHostConfig {
    fn default() -> Self {
        Self {
            kind: "local".to_string(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base: "https://api.cloudinary.com".to_string(),
            folder: String::new(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawCatalogConfig {
    strict_album_refs: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawStoreConfig {
    /// "postgres" 或 "memory"
    kind: String,
}

impl Default for RawStoreConfig {
    fn default() -> Self {
        Self {
            kind: "postgres".to_string(),
        }
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            jwt_expire_secs: 3600,
            jwt_secret_key: "secret".to_string(),
            admin_usernames: Vec::new(),
            database_url: "".to_string(),
            base_url: "http://localhost:5000".to_string(),
            node_id: 1,
            server: RawServerConfig::default(),
            asset_host: RawAssetHostConfig::default(),
            catalog: RawCatalogConfig::default(),
            store: RawStoreConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    pub max_upload_bytes: usize,
    pub resources_dir: String,
}

impl ServerConfig {
    /// Directory holding files written by the local asset host
    pub fn asset_dir(&self) -> PathBuf {
        PathBuf::from(&self.resources_dir).join("assets")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetHostConfig {
    Local {
        dir: PathBuf,
        public_base_url: String,
    },
    Cloudinary {
        api_base: String,
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: Option<String>,
        timeout_secs: u64,
    },
    Unsupported(String),
}

#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub strict_album_refs: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    jwt_expire_secs: i64,
    jwt_secret_key: String,
    admin_usernames: Vec<String>,
    database_url: String,
    base_url: String,
    node_id: i64,
    server: ServerConfig,
    asset_host: AssetHostConfig,
    catalog: CatalogConfig,
    store: StoreKind,
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Self {
        let server = ServerConfig {
            host: data.server.host,
            port: data.server.port,
            max_upload_bytes: data.server.max_upload_bytes,
            resources_dir: data.server.resources_dir,
        };
        let asset_host = match data.asset_host.kind.to_ascii_lowercase().as_str() {
            "local" | "" => AssetHostConfig::Local {
                dir: server.asset_dir(),
                public_base_url: format!(
                    "{}{}",
                    data.base_url.trim_end_matches('/'),
                    LOCAL_ASSET_ROUTE
                ),
            },
            "cloudinary" => AssetHostConfig::Cloudinary {
                api_base: data.asset_host.api_base,
                cloud_name: data.asset_host.cloud_name,
                api_key: data.asset_host.api_key,
                api_secret: data.asset_host.api_secret,
                folder: Some(data.asset_host.folder).filter(|f| !f.is_empty()),
                timeout_secs: data.asset_host.timeout_secs,
            },
            other => AssetHostConfig::Unsupported(other.to_string()),
        };
        let store = match data.store.kind.to_ascii_lowercase().as_str() {
            "memory" => StoreKind::Memory,
            _ => StoreKind::Postgres,
        };
        AppConfigImpl {
            jwt_expire_secs: data.jwt_expire_secs,
            jwt_secret_key: data.jwt_secret_key,
            admin_usernames: data.admin_usernames,
            database_url: data.database_url,
            base_url: data.base_url,
            node_id: data.node_id,
            server,
            asset_host,
            catalog: CatalogConfig {
                strict_album_refs: data.catalog.strict_album_refs,
            },
            store,
        }
    }

    pub fn load() -> Result<AppConfigImpl, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("admin_usernames")
                    .try_parsing(true),
            )
            .build()?;

        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        Ok(AppConfigImpl::new(raw))
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone()
    }

    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn asset_host(&self) -> AssetHostConfig {
        self.asset_host.clone()
    }

    pub fn catalog(&self) -> CatalogConfig {
        self.catalog.clone()
    }

    pub fn store(&self) -> StoreKind {
        self.store.clone()
    }

    pub fn admin_usernames(&self) -> Vec<String> {
        self.admin_usernames.clone()
    }

    pub fn database_url(&self) -> String {
        self.database_url.clone()
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn node_id(&self) -> i64 {
        self.node_id
    }
}

impl Default for AppConfigImpl {
    fn default() -> Self {
        AppConfigImpl::new(RawConfig::default())
    }
}

impl AuthConfig for AppConfigImpl {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret_key
    }

    fn jwt_expire_secs(&self) -> i64 {
        self.jwt_expire_secs
    }
}
