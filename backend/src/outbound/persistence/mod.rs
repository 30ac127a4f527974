//! PostgreSQL adapters built on Diesel with `diesel-async` and `bb8`.
//!
//! Repositories translate between Diesel rows and domain types and map
//! infrastructure failures onto the port error enums. Row structs and table
//! definitions stay private to this module.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/guilds")).await?;
//! let history = DieselMatchHistoryRepository::new(pool.clone());
//! ```

mod diesel_error_mapping;
mod diesel_match_history_repository;
mod diesel_match_round_repository;
mod diesel_match_schedule_repository;
mod models;
mod pool;
mod schema;

pub use diesel_match_history_repository::DieselMatchHistoryRepository;
pub use diesel_match_round_repository::DieselMatchRoundRepository;
pub use diesel_match_schedule_repository::DieselMatchScheduleRepository;
pub use pool::{DatabaseSslMode, DbPool, PoolConfig, PoolError, UnknownSslMode};
