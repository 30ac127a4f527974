//! Diesel table definitions for the tables the matcher shares with the bot.
//!
//! The bot owns these tables and their quoted camel-case column names; the
//! Rust-side names are mapped with `sql_name`.

diesel::table! {
    /// One row per direction of every pairing ever made in a guild.
    #[sql_name = "ServerUserMatch"]
    server_user_matches (id) {
        id -> Int4,
        #[sql_name = "dGuildId"]
        guild_id -> Text,
        #[sql_name = "dUserId"]
        user_id -> Text,
        #[sql_name = "dUserMatchedId"]
        matched_user_id -> Text,
        /// True only for rows of the most recent round.
        #[sql_name = "isMatchActive"]
        is_match_active -> Bool,
        #[sql_name = "createdAt"]
        created_at -> Timestamptz,
        #[sql_name = "updatedAt"]
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-guild matching schedule.
    #[sql_name = "Match"]
    match_schedules (guild_id) {
        #[sql_name = "dGuildId"]
        guild_id -> Text,
        /// Days between rounds.
        #[sql_name = "matchFrequency"]
        match_frequency -> Nullable<Int4>,
        #[sql_name = "lastMatchDate"]
        last_match_date -> Nullable<Timestamptz>,
        #[sql_name = "nextMatchDate"]
        next_match_date -> Nullable<Timestamptz>,
    }
}
