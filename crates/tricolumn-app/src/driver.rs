//! Collaborator traits for the shell runtime.
//!
//! The shell never talks to a concrete router, data model, text bundle or
//! message box. Each is a trait passed in explicitly through
//! [`ShellContext`], so production code and tests plug in their own
//! implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tricolumn_core::{BindTicket, DisplayTarget, ErrorNotification, NavigationRequest};

use crate::error::{KeyError, MetadataFailure};

/// Navigation side of the router.
///
/// Route matches flow the other way, into [`crate::Shell::handle`].
pub trait Router: Send + Sync {
    /// Navigate to a route.
    fn navigate_to(&self, request: &NavigationRequest);

    /// Display a target without changing the URL.
    fn display(&self, target: DisplayTarget);

    /// Whether the navigation history has an entry before the current one.
    fn has_previous_entry(&self) -> bool;

    /// Go one entry back in the navigation history.
    fn go_back(&self);
}

/// A request to bind a region to a resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    /// Ticket every signal of this binding must carry.
    pub ticket: BindTicket,
    /// Resource path, e.g. `/Categories(7)`.
    pub path: String,
}

/// Access to the remote data model.
///
/// Binding signals (`dataRequested`, `dataReceived`, `change`) are reported
/// back as [`crate::ShellEvent::Binding`] events tagged with the request's
/// ticket.
#[async_trait]
pub trait ModelAccessor: Send + Sync {
    /// Resolves once the service metadata is available.
    async fn metadata_loaded(&self) -> Result<(), MetadataFailure>;

    /// Build the canonical key of an entity, e.g. `Categories(7)`.
    fn create_key(&self, entity_set: &str, key_fields: &[(&str, &str)])
    -> Result<String, KeyError>;

    /// Bind a region to a resource path.
    fn bind_element(&self, request: BindRequest);
}

/// Localized text lookup.
pub trait BundleAccessor: Send + Sync {
    /// Text for `key`, with `{0}`, `{1}`, ... replaced by `args`.
    fn text(&self, key: &str, args: &[&str]) -> String;
}

/// Presents error notifications to the user.
///
/// The user's dismissal comes back as
/// [`crate::ShellEvent::NotificationDismissed`] carrying the notification's id.
pub trait Notifier: Send + Sync {
    /// Show a dismissible error notification.
    fn show_error(&self, notification: &ErrorNotification);
}

/// Collaborators handed to the [`crate::Shell`].
#[derive(Clone)]
pub struct ShellContext {
    /// Router for navigation and display targets.
    pub router: Arc<dyn Router>,
    /// Remote data model.
    pub model: Arc<dyn ModelAccessor>,
    /// Text bundle.
    pub bundle: Arc<dyn BundleAccessor>,
    /// Error presentation.
    pub notifier: Arc<dyn Notifier>,
}
