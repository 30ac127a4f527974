//! HTTP notification adapter.

mod http_match_notifier;

pub use http_match_notifier::HttpMatchNotifier;
