//! Matcher server: exposes the matching trigger and health probes.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use tracing::{error, info};

use guild_matcher::MatcherSettings;
use guild_matcher::bootstrap::{build_match_service, init_tracing};
use guild_matcher::inbound::http::configure;
use guild_matcher::inbound::http::health::HealthState;
use guild_matcher::inbound::http::state::HttpState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = MatcherSettings::load().map_err(|err| {
        error!(error = %err, "failed to load settings");
        io::Error::other(format!("load settings: {err}"))
    })?;
    let config = settings.resolve().map_err(|err| {
        error!(error = %err, "invalid settings");
        io::Error::other(err)
    })?;

    let service = build_match_service(&config).await.map_err(|err| {
        error!(error = %err, "failed to wire matcher");
        io::Error::other(err)
    })?;

    let http_state = web::Data::new(HttpState::new(Arc::new(service)));
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .configure(configure)
    })
    .bind(config.bind_addr)?;

    info!(bind_addr = %config.bind_addr, "matcher listening");
    health_state.mark_ready();
    server.run().await
}
