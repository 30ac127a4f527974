//! Outbound adapters implementing the driven ports.
//!
//! - **cache**: Redis candidate pools (`bb8-redis`)
//! - **persistence**: PostgreSQL history, rounds and schedules (Diesel)
//! - **notify**: webhook notification (`reqwest`)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no matching logic.

pub mod cache;
pub mod notify;
pub mod persistence;
