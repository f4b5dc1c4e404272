use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use anyhow::Context;
use infra::config::AppConfigImpl;
use log::info;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use server::middleware::other;

fn init_logging() -> anyhow::Result<()> {
    // 配置日志同时输出到控制台和文件
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}",
        )))
        .build("app.log")?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("stdout", Box::new(ConsoleAppender::builder().build())))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(log_level.parse().unwrap_or(log::LevelFilter::Info)),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cfg = AppConfigImpl::load().map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
    let server_cfg = cfg.server();
    std::fs::create_dir_all(server_cfg.asset_dir())
        .with_context(|| format!("failed to create {}", server_cfg.asset_dir().display()))?;

    let app_state = web::Data::new(server::AppState::from_config(cfg).await?);
    info!(
        "catalog admin listening on {}:{}",
        server_cfg.host, server_cfg.port
    );

    let resources_cfg = server_cfg.clone();
    HttpServer::new(move || {
        let resources_cfg = resources_cfg.clone();
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(server::admin_api::configure_health)
            .configure(server::admin_api::configure_service)
            .configure(move |svc| server::resources::configure_service(svc, &resources_cfg))
            .wrap(other::cors())
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await?;
    Ok(())
}
