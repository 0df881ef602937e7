//! Shell events
//!
//! Inputs the [`crate::Shell`] reacts to: router matches, user gestures and
//! data-source signals.

use tricolumn_core::{BindTicket, BoundObject, NavigationEvent, Region, RequestFailure};

use crate::error::MetadataFailure;

/// Signals of one element binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingEvent {
    /// The binding started requesting data.
    DataRequested,
    /// The requested data arrived.
    DataReceived,
    /// The bound context changed; `None` if the path resolved to nothing.
    Changed(Option<BoundObject>),
}

/// Events processed by the shell, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The router matched a route, or bypassed.
    Navigation(NavigationEvent),

    /// The user toggled the detail column's full-screen mode.
    ToggleFullScreen,

    /// The user closed the detail column.
    CloseDetail,

    /// The router displayed the application level "not found" page.
    NotFoundDisplayed,

    /// A binding started by the shell reported a signal.
    Binding {
        /// Ticket of the bind the signal belongs to.
        ticket: BindTicket,
        /// The signal.
        event: BindingEvent,
    },

    /// A table or list finished an update.
    UpdateFinished {
        /// Region that updated (list or line items).
        region: Region,
        /// Total item count, `None` while the length is not final.
        total: Option<usize>,
    },

    /// Service metadata loaded.
    MetadataLoaded,

    /// Service metadata failed to load.
    MetadataFailed(MetadataFailure),

    /// A data request failed.
    RequestFailed(RequestFailure),

    /// The user changed the selection of the master list.
    ListSelectionChanged {
        /// Key of the entry whose selection changed.
        key: String,
        /// Whether the entry is now selected.
        selected: bool,
    },

    /// The user pressed a line item of the object detail.
    LineItemPressed {
        /// Object the line item belongs to.
        object_id: String,
        /// Product of the line item.
        product_id: String,
    },

    /// The user navigated back from the product sub-detail.
    NavBack,

    /// The user dismissed an error notification.
    NotificationDismissed {
        /// Id of the dismissed notification.
        id: u64,
    },
}
