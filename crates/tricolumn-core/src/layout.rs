//! Column layout state machine.
//!
//! Keeps the visible column configuration consistent with the current route
//! and with the user's full-screen and close gestures.
//!
//! # State Machine
//!
//! ```text
//!                 object match                  toggle
//! ┌───────────┐ ─────────────> ┌──────────────────────┐ ──────> ┌─────────────────────┐
//! │ OneColumn │                │ TwoColumnMidExpanded │         │ MidColumnFullScreen │
//! └───────────┘ <───────────── └──────────────────────┘ <────── └─────────────────────┘
//!               list / close /                          toggle
//!               not found
//! ```
//!
//! Every transition that sets a layout explicitly also drops the full-screen
//! flag and the remembered previous layout, so the flag is set exactly when a
//! previous layout is remembered. Toggling twice therefore always returns to
//! the starting state.
//!
//! # Bind generations
//!
//! Each bound region (detail and product) carries a generation counter. A
//! new match for the region, or anything that hides it, bumps the counter;
//! binding signals carrying an older [`BindTicket`] are ignored so a slow
//! bind can never overwrite the state of a newer one.

use serde::Serialize;
use tracing::debug;

use crate::{
    action::{BindTarget, BindTicket, DisplayTarget, Region, ShellAction},
    route::{NavigationRequest, RouteMatch},
    selection::SelectionMode,
};

/// Column configurations of the flexible column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LayoutKind {
    /// Only the list is visible.
    #[default]
    OneColumn,
    /// List and detail, with the detail column expanded.
    #[serde(rename = "TwoColumnsMidExpanded")]
    TwoColumnMidExpanded,
    /// The detail column fills the screen.
    MidColumnFullScreen,
}

/// Observable layout state.
///
/// Owned by [`LayoutMachine`] and only changed through its transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    layout: LayoutKind,
    previous_layout: Option<LayoutKind>,
    mid_column_full_screen: bool,
}

impl LayoutState {
    /// Current column configuration.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Layout to restore when leaving full screen.
    pub fn previous_layout(&self) -> Option<LayoutKind> {
        self.previous_layout
    }

    /// Whether the detail column's full-screen action is active.
    pub fn is_full_screen(&self) -> bool {
        self.mid_column_full_screen
    }
}

/// The object a binding resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundObject {
    /// Resolved resource path, e.g. `/Categories(7)`.
    pub path: String,
    /// Key of the object as shown in the list.
    pub key: String,
}

/// Layout state machine.
///
/// Pure: every transition returns the actions the runtime has to execute.
#[derive(Debug, Clone, Default)]
pub struct LayoutMachine {
    state: LayoutState,
    detail_generation: u64,
    product_generation: u64,
}

impl LayoutMachine {
    /// Start in [`LayoutKind::OneColumn`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current layout state.
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    /// Dispatch a classified route match.
    pub fn on_route(&mut self, route: RouteMatch) -> Vec<ShellAction> {
        match route {
            RouteMatch::List => self.on_list_route_matched(),
            RouteMatch::Object { object_id } => self.on_object_route_matched(object_id),
            RouteMatch::Product { object_id, product_id } => {
                self.on_product_route_matched(object_id, product_id)
            },
            RouteMatch::Bypassed => self.on_bypassed(),
        }
    }

    /// The list route matched, including on back navigation.
    pub fn on_list_route_matched(&mut self) -> Vec<ShellAction> {
        self.set_layout(LayoutKind::OneColumn);
        self.supersede(Region::Detail);
        Vec::new()
    }

    /// The object route matched.
    ///
    /// Shows list and detail, then binds the detail region to the object.
    pub fn on_object_route_matched(&mut self, object_id: String) -> Vec<ShellAction> {
        self.set_layout(LayoutKind::TwoColumnMidExpanded);
        let ticket = self.supersede(Region::Detail);

        vec![
            ShellAction::ResetBusy(Region::Detail),
            ShellAction::Bind { ticket, target: BindTarget::Object { object_id } },
        ]
    }

    /// The product route matched.
    ///
    /// Binds the product region; the layout is left as it is.
    pub fn on_product_route_matched(
        &mut self,
        object_id: String,
        product_id: String,
    ) -> Vec<ShellAction> {
        let ticket = self.supersede(Region::Product);

        vec![
            ShellAction::ResetBusy(Region::Product),
            ShellAction::Bind { ticket, target: BindTarget::Product { object_id, product_id } },
        ]
    }

    /// Toggle the detail column between full screen and the previous layout.
    pub fn toggle_full_screen(&mut self) {
        if self.state.mid_column_full_screen {
            let restored = self.state.previous_layout.take().unwrap_or(LayoutKind::OneColumn);
            debug!(from = ?self.state.layout, to = ?restored, "leaving full screen");
            self.state.layout = restored;
            self.state.mid_column_full_screen = false;
        } else {
            debug!(from = ?self.state.layout, "entering full screen");
            self.state.previous_layout = Some(self.state.layout);
            self.state.layout = LayoutKind::MidColumnFullScreen;
            self.state.mid_column_full_screen = true;
        }
    }

    /// The user closed the detail column.
    pub fn on_close_detail(&mut self) -> Vec<ShellAction> {
        self.set_layout(LayoutKind::OneColumn);
        self.supersede(Region::Detail);

        vec![ShellAction::ClearSelection, ShellAction::Navigate(NavigationRequest::to_list())]
    }

    /// No route pattern matched.
    ///
    /// The layout is left as it is until the "not found" page is showing.
    pub fn on_bypassed(&mut self) -> Vec<ShellAction> {
        self.supersede(Region::Detail);
        vec![ShellAction::ClearSelection, ShellAction::Display(DisplayTarget::NotFound)]
    }

    /// The user changed the list selection.
    ///
    /// Opens the selected object. Deselecting in multi-select mode does
    /// nothing. `replace_history` is false on phones, where opening an object
    /// is a page change the user navigates back from.
    pub fn on_list_selection_changed(
        &mut self,
        key: String,
        selected: bool,
        mode: SelectionMode,
        replace_history: bool,
    ) -> Vec<ShellAction> {
        if mode == SelectionMode::MultiSelect && !selected {
            debug!(key, "multi-select deselection, staying put");
            return Vec::new();
        }

        self.set_layout(LayoutKind::TwoColumnMidExpanded);
        vec![ShellAction::Navigate(NavigationRequest::to_object(key, replace_history))]
    }

    /// The user pressed a line item of the object detail.
    pub fn on_line_item_pressed(&self, object_id: String, product_id: String) -> Vec<ShellAction> {
        vec![ShellAction::Navigate(NavigationRequest::to_product(object_id, product_id))]
    }

    /// The user navigated back from the product sub-detail.
    ///
    /// Without a previous history entry the list replaces the current one.
    pub fn on_nav_back(&self, has_previous_entry: bool) -> Vec<ShellAction> {
        if has_previous_entry {
            vec![ShellAction::NavigateBack]
        } else {
            vec![ShellAction::Navigate(NavigationRequest::to_list_replacing())]
        }
    }

    /// The application level "not found" page is showing.
    pub fn on_not_found_displayed(&mut self) {
        self.set_layout(LayoutKind::OneColumn);
    }

    /// Whether `ticket` belongs to the latest bind of its region.
    pub fn is_current(&self, ticket: BindTicket) -> bool {
        matches!(ticket.region, Region::Detail | Region::Product)
            && ticket.generation == self.generation(ticket.region)
    }

    /// Latest bind generation of `region`; zero for regions that are never bound.
    pub fn generation(&self, region: Region) -> u64 {
        match region {
            Region::Detail => self.detail_generation,
            Region::Product => self.product_generation,
            _ => 0,
        }
    }

    /// A binding's bound context changed.
    ///
    /// `bound` is `None` when the path resolved to no object; that is an
    /// expected outcome and routes to the region's "not found" page.
    pub fn on_binding_changed(
        &mut self,
        ticket: BindTicket,
        bound: Option<BoundObject>,
    ) -> Vec<ShellAction> {
        if !self.is_current(ticket) {
            debug!(?ticket, "ignoring change from superseded bind");
            return Vec::new();
        }

        match (ticket.region, bound) {
            (Region::Detail, Some(object)) => {
                vec![ShellAction::SelectListItem { ticket, key: object.key }]
            },
            (Region::Detail, None) => vec![
                ShellAction::Display(DisplayTarget::DetailObjectNotFound),
                ShellAction::ClearSelection,
            ],
            (Region::Product, None) => {
                vec![ShellAction::Display(DisplayTarget::ProductObjectNotFound)]
            },
            _ => Vec::new(),
        }
    }

    fn set_layout(&mut self, layout: LayoutKind) {
        if self.state.layout != layout {
            debug!(from = ?self.state.layout, to = ?layout, "layout changed");
        }
        self.state =
            LayoutState { layout, previous_layout: None, mid_column_full_screen: false };
    }

    fn supersede(&mut self, region: Region) -> BindTicket {
        let generation = match region {
            Region::Product => &mut self.product_generation,
            _ => &mut self.detail_generation,
        };
        *generation += 1;
        BindTicket { region, generation: *generation }
    }
}
