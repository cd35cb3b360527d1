use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::RaceCatalog;

/// Why a fetch from an [`EventSource`] failed.
///
/// The scheduler only ever shows the `Display` form, so variants carry text
/// rather than transport-specific error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Anything that can produce the current catalog of upcoming races.
pub trait EventSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<RaceCatalog, SourceError>> + Send;
}

impl<S: EventSource> EventSource for Arc<S> {
    fn fetch(&self) -> impl Future<Output = Result<RaceCatalog, SourceError>> + Send {
        (**self).fetch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = SourceError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
    }
}
