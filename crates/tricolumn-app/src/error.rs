//! Application layer error types.

use thiserror::Error;
use tricolumn_core::RouteError;

/// Errors from waiting on a deferred signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The producer was dropped without resolving.
    #[error("signal abandoned before it was resolved")]
    Abandoned,
}

/// Errors from building a resource key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// No key fields were given.
    #[error("entity set '{entity_set}' needs at least one key field")]
    NoKeyFields {
        /// Entity set the key was built for
        entity_set: String,
    },

    /// A key field had an empty value.
    #[error("key field '{field}' of entity set '{entity_set}' is empty")]
    EmptyValue {
        /// Entity set the key was built for
        entity_set: String,
        /// Name of the empty field
        field: String,
    },
}

/// Backend metadata could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("metadata failed to load: {response}")]
pub struct MetadataFailure {
    /// Response or error text from the data source.
    pub response: String,
}

/// Errors surfaced by [`crate::Shell::handle`].
///
/// Data-source failures are not errors here; they go to the notification
/// deduplicator. A key that cannot be built is reported through the bind's
/// [`crate::BindOutcome`] instead, since binds complete after `handle`
/// returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// The router reported an unusable match.
    #[error(transparent)]
    Route(#[from] RouteError),
}
