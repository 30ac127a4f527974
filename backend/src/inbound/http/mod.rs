//! HTTP inbound adapter: the matching trigger and health probes.

use actix_web::web;

pub mod health;
pub mod state;
pub mod trigger;

/// Register the trigger and probe routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(trigger::json_config())
        .service(trigger::run_match)
        .service(health::ready)
        .service(health::live);
}
