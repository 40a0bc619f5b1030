use anyhow::{Context, Result};
use actix_web::{App, HttpServer, middleware, web};

use soccer_dash::config::DashConfig;
use soccer_dash::dataset;
use soccer_dash::server::{ServerState, configure};

#[actix_web::main]
async fn main() -> Result<()> {
    DashConfig::load_env_files();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let mut config = DashConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    config.apply_args(&args);

    let data = dataset::init_global(&config.data_dir)
        .with_context(|| format!("load tables from {}", config.data_dir.display()))?;
    log::info!(
        "{} players loaded; tables: {}",
        data.players().len(),
        data.table_names().join(", ")
    );

    let state = web::Data::new(ServerState {
        data,
        opts: config.chart_options(),
    });

    log::info!("Starting server on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("http server stopped")
}
