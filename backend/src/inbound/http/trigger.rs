//! Matching trigger.
//!
//! ```text
//! POST /match {"guildId": "<id>"}
//! ```
//!
//! Success answers `200` with the JSON string `"Matcher Ran Successfully"`.
//! Failures carry no body; their cause is logged.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::GuildId;
use crate::inbound::http::state::HttpState;

/// Body returned when a round completed.
pub const SUCCESS_MESSAGE: &str = "Matcher Ran Successfully";

/// Trigger payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequestBody {
    #[serde(default)]
    pub guild_id: Option<String>,
}

/// JSON extractor settings answering malformed payloads with a bare `400`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejecting malformed match trigger payload");
        InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
    })
}

/// Run one matching round for the requested guild.
#[post("/match")]
pub async fn run_match(
    state: web::Data<HttpState>,
    body: web::Json<MatchRequestBody>,
) -> HttpResponse {
    let raw = body.into_inner().guild_id.unwrap_or_default();
    let guild_id = match GuildId::new(raw) {
        Ok(guild_id) => guild_id,
        Err(err) => {
            warn!(error = %err, "rejecting match trigger");
            return HttpResponse::BadRequest().finish();
        }
    };

    match state.matcher.run_match(&guild_id).await {
        Ok(outcome) => {
            info!(
                %guild_id,
                run_id = %outcome.run_id,
                pairs = outcome.plan.pair_count(),
                "match round completed"
            );
            HttpResponse::Ok().json(SUCCESS_MESSAGE)
        }
        Err(err) => {
            error!(
                %guild_id,
                error = %err,
                connection = err.is_connection(),
                round_committed = err.round_committed(),
                "match round failed"
            );
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
