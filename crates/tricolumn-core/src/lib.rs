//! Tricolumn shell core logic
//!
//! Pure state machine logic for a list / detail / sub-detail navigation
//! shell, completely decoupled from rendering, routing and data loading.
//!
//! # Architecture
//!
//! Every component in this crate is a deterministic state machine. Inputs
//! are route matches, user gestures and data-source signals; outputs are
//! declarative [`ShellAction`]s that describe intended effects (bind a
//! region, navigate, clear the list selection) rather than executing them.
//! The runtime in `tricolumn-app` interprets those actions against real
//! collaborators.
//!
//! # Components
//!
//! - [`layout`]: Column layout state machine (list, object, full screen, close)
//! - [`busy`]: Busy flags and busy indicator delays per view region
//! - [`notify`]: Error notification deduplication and request failure filtering
//! - [`selection`]: List readiness lifecycle and selection planning
//! - [`route`]: Navigation events and their classification
//! - [`action`]: Actions produced by the layout state machine

pub mod action;
pub mod busy;
pub mod layout;
pub mod notify;
pub mod route;
pub mod selection;

pub use action::{BindTarget, BindTicket, DisplayTarget, Region, ShellAction};
pub use busy::{BusyBoard, BusyDelays, BusyIndicator, BusyPhase, MetadataOutcome};
pub use layout::{BoundObject, LayoutKind, LayoutMachine, LayoutState};
pub use notify::{ErrorDeduplicator, ErrorNotification, FailureDetails, RequestFailure};
pub use route::{NavigationEvent, NavigationRequest, RouteError, RouteMatch, RouteName};
pub use selection::{DataArrival, ListReadiness, SelectionMode, SelectionPlan, plan_selection};
