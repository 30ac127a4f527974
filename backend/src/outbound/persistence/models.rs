//! Diesel row structs. Internal to the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{match_schedules, server_user_matches};

/// Directional history record as read for graph construction.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = server_user_matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRecordRow {
    pub user_id: String,
    pub matched_user_id: String,
}

/// Insertable directional record of the new round.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = server_user_matches)]
pub(crate) struct NewMatchRow<'a> {
    pub guild_id: &'a str,
    pub user_id: &'a str,
    pub matched_user_id: &'a str,
    pub is_match_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Schedule timestamps written after a round.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = match_schedules)]
pub(crate) struct ScheduleChangeset {
    pub last_match_date: DateTime<Utc>,
    pub next_match_date: DateTime<Utc>,
}
