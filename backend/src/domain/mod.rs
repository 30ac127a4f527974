//! Matching domain: identifiers, history, the pairing algorithm and the
//! round orchestration service.
//!
//! Public surface:
//! - `GuildId`, `CandidateId`: validated identifiers.
//! - `MatchHistory`: who has already been paired with whom.
//! - `BlossomGraph`: maximum cardinality matching on a general graph.
//! - `plan_pairings`: pool plus history to pairs, leftovers and a trio.
//! - `MatchRunService`: one full round against the driven ports.

pub mod blossom;
pub mod candidate;
pub mod error;
pub mod history;
pub mod match_run_service;
pub mod pair;
pub mod pairing_graph;
pub mod pairing_plan;
pub mod ports;
pub mod round;
pub mod schedule;

pub use self::blossom::{BlossomGraph, EdgeError};
pub use self::candidate::{CandidateId, GuildId, IdentifierValidationError};
pub use self::error::MatchRunError;
pub use self::history::MatchHistory;
pub use self::match_run_service::{
    MatchRunOutcome, MatchRunPorts, MatchRunService, NotificationOutcome,
};
pub use self::pair::{Pair, SelfPairError, Trio};
pub use self::pairing_graph::PairingGraph;
pub use self::pairing_plan::{
    PairingPlan, TrioAnchor, UnknownTrioAnchor, plan_pairings, resolve_leftovers,
};
pub use self::round::{MatchRound, NewMatchRecord, RoundSummary};
pub use self::schedule::{MatchFrequency, ScheduleOutcome, ScheduleUpdate};
