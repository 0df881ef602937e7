//! Error notification deduplication.
//!
//! Many data-source failures can arrive at once (a failing batch, a dead
//! backend). The user sees at most one notification at a time; failures
//! that arrive while it is open are dropped, not queued.

use serde::Serialize;
use tracing::{debug, info};

/// Prefix of a not-found response body that actually reports an
/// undeliverable request.
const UNDELIVERABLE_PREFIX: &str = "Cannot POST";

/// A failed data request as reported by the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Raw response body.
    pub response_body: String,
}

impl RequestFailure {
    /// Whether this failure should reach the user.
    ///
    /// A 404 means "entity not found", which the layout already routes to a
    /// not-found page. The exception is a 404 whose body reports that the
    /// request could not be delivered at all; that is a technical failure.
    pub fn should_surface(&self) -> bool {
        self.status_code != 404 || self.response_body.starts_with(UNDELIVERABLE_PREFIX)
    }
}

/// Technical details attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureDetails {
    /// Backend metadata could not be loaded.
    Metadata {
        /// Response or error text from the data source.
        response: String,
    },
    /// A data request failed.
    Request {
        /// HTTP status code.
        status_code: u16,
        /// Response body.
        response_body: String,
    },
}

impl From<RequestFailure> for FailureDetails {
    fn from(failure: RequestFailure) -> Self {
        Self::Request { status_code: failure.status_code, response_body: failure.response_body }
    }
}

/// A dismissible error notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotification {
    /// Sequence number; a dismissal names the notification it closes.
    pub id: u64,
    /// Generic, user-facing message.
    pub message: String,
    /// Technical details shown on request.
    pub details: FailureDetails,
    /// Whether the notification is still showing.
    pub is_open: bool,
}

/// Turns overlapping failures into at most one open notification.
///
/// Owned by the application session; not global.
#[derive(Debug, Clone)]
pub struct ErrorDeduplicator {
    message: String,
    current: Option<ErrorNotification>,
    last_id: u64,
}

impl ErrorDeduplicator {
    /// Deduplicator showing `message` for every failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), current: None, last_id: 0 }
    }

    /// Whether a notification is currently open.
    pub fn is_open(&self) -> bool {
        self.current.as_ref().is_some_and(|n| n.is_open)
    }

    /// The most recent notification, open or dismissed.
    pub fn current(&self) -> Option<&ErrorNotification> {
        self.current.as_ref()
    }

    /// Report a failure.
    ///
    /// Returns the notification to present, or `None` if one is already open
    /// and this failure was dropped.
    pub fn report_failure(&mut self, details: FailureDetails) -> Option<&ErrorNotification> {
        if self.is_open() {
            debug!(?details, "notification already open, dropping failure");
            return None;
        }

        self.last_id += 1;
        info!(id = self.last_id, ?details, "surfacing service error");
        self.current = Some(ErrorNotification {
            id: self.last_id,
            message: self.message.clone(),
            details,
            is_open: true,
        });
        self.current.as_ref()
    }

    /// Report a failed request, filtering entity-not-found responses.
    pub fn report_request_failure(
        &mut self,
        failure: RequestFailure,
    ) -> Option<&ErrorNotification> {
        if !failure.should_surface() {
            debug!(status = failure.status_code, "not-found response handled by routing");
            return None;
        }
        self.report_failure(failure.into())
    }

    /// The user dismissed notification `id`.
    ///
    /// Returns whether it was open. Dismissals of older notifications leave a
    /// newer one open.
    pub fn dismiss(&mut self, id: u64) -> bool {
        match self.current.as_mut() {
            Some(notification) if notification.id == id && notification.is_open => {
                notification.is_open = false;
                true
            },
            _ => {
                debug!(id, "dismissal does not match the open notification");
                false
            },
        }
    }
}
