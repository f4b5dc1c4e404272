use crate::consts;
use actix_files::Files;
use actix_web::web;
use infra::config::ServerConfig;

/// 配置静态资源路由，映射 /resources 到静态文件目录。本地媒体托管写入的文件也在这里提供。
pub fn configure_service(cfg: &mut web::ServiceConfig, server_config: &ServerConfig) {
    cfg.service(Files::new(
        consts::URL_PATH_RESOURCES,
        &server_config.resources_dir,
    ));
}
