//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! port, so they can be exercised without any store.

use std::sync::Arc;

use crate::domain::ports::MatchRunCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub matcher: Arc<dyn MatchRunCommand>,
}

impl HttpState {
    /// Wrap the command used by the trigger endpoint.
    pub fn new(matcher: Arc<dyn MatchRunCommand>) -> Self {
        Self { matcher }
    }
}
