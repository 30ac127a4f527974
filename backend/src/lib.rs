//! Guild matcher: pairs the members of a guild's candidate pool with people
//! they have never been matched with, records the round and reschedules the
//! next one.
//!
//! - [`domain`]: identifiers, pairing algorithm, run orchestration and ports.
//! - [`outbound`]: Redis, PostgreSQL and webhook adapters.
//! - [`inbound`]: the HTTP trigger and health probes.
//! - [`config`]: layered settings.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::{MatcherConfig, MatcherSettings, SettingsError};
