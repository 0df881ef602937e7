//! Shell actions
//!
//! Actions produced by the layout state machine for the runtime to execute.

use serde::Serialize;

use crate::route::NavigationRequest;

/// View regions whose busy state and bindings the shell tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    /// The application root (metadata loading).
    App,
    /// The master list column.
    List,
    /// The object detail column.
    Detail,
    /// The line item table inside the object detail.
    LineItems,
    /// The product sub-detail column.
    Product,
}

impl Region {
    /// All regions, in display order.
    pub const ALL: [Region; 5] =
        [Region::App, Region::List, Region::Detail, Region::LineItems, Region::Product];
}

/// Identifies one bind of a region.
///
/// The generation increases with every new bind of the same region, so
/// signals from a superseded bind can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindTicket {
    /// Region being bound.
    pub region: Region,
    /// Bind generation for that region.
    pub generation: u64,
}

/// What a region should be bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    /// An object from the list, by identifier.
    Object {
        /// Object identifier.
        object_id: String,
    },
    /// A product of an object, by identifier pair.
    Product {
        /// Owning object identifier.
        object_id: String,
        /// Product identifier.
        product_id: String,
    },
}

/// Display targets the router can show without a route match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    /// Application level "not found" page.
    NotFound,
    /// The detail column's "object not found" page.
    DetailObjectNotFound,
    /// The sub-detail column's "object not found" page.
    ProductObjectNotFound,
}

impl DisplayTarget {
    /// Target name as registered with the router.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "notFound",
            Self::DetailObjectNotFound => "detailObjectNotFound",
            Self::ProductObjectNotFound => "productObjectNotFound",
        }
    }
}

/// Actions produced by the layout state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Put a region into its "bind starting" busy state.
    ResetBusy(Region),

    /// Resolve the target's path and bind the region to it.
    Bind {
        /// Ticket the binding's signals will carry.
        ticket: BindTicket,
        /// What to bind.
        target: BindTarget,
    },

    /// Select the list entry with this key once the list has data.
    ///
    /// Dropped if the bind identified by `ticket` is superseded before the
    /// list is ready.
    SelectListItem {
        /// Bind that resolved the object.
        ticket: BindTicket,
        /// Key of the entry to select.
        key: String,
    },

    /// Remove all list selections without notifying listeners.
    ClearSelection,

    /// Ask the router to navigate.
    Navigate(NavigationRequest),

    /// Ask the router to display a target.
    Display(DisplayTarget),

    /// Go one step back in the navigation history.
    NavigateBack,
}
