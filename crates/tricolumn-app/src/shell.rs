//! Shell runtime
//!
//! Glue between the pure state machines in `tricolumn-core` and the
//! collaborators in [`ShellContext`]. [`Shell::handle`] processes one event at
//! a time without waiting on anything. The resulting [`ShellAction`]s are
//! executed immediately, except binds, which wait for metadata, and list
//! selection requests, which wait for the list. Both run as tasks collected
//! by [`Shell::settle`].
//!
//! Spawned tasks check their [`BindTicket`] against the latest published bind
//! generation before acting, so a task outlived by a newer navigation does
//! nothing.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};
use tricolumn_core::{
    BindTarget, BindTicket, BusyBoard, ErrorDeduplicator, ErrorNotification, FailureDetails,
    LayoutMachine, LayoutState, ListReadiness, MetadataOutcome, Region, ShellAction,
};

use crate::{
    config::ShellConfig,
    driver::{BindRequest, ShellContext},
    epoch::BindEpochs,
    error::{MetadataFailure, ShellError},
    event::{BindingEvent, ShellEvent},
    selector::{ListSelector, SelectionOutcome},
};

/// Bundle key of the generic error message.
const ERROR_TEXT: &str = "errorText";
/// Bundle key of the list title, `{0}` is the item count.
const LIST_TITLE_COUNT: &str = "listTitleCount";
/// Bundle key of the line item heading without a count.
const LINE_ITEM_HEADING: &str = "detailLineItemTableHeading";
/// Bundle key of the line item heading, `{0}` is the item count.
const LINE_ITEM_HEADING_COUNT: &str = "detailLineItemTableHeadingCount";

/// Titles derived from list and table updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Titles {
    /// Title of the master list.
    pub list: String,
    /// Heading of the line item table.
    pub line_items: String,
}

/// Result of a bind task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BindOutcome {
    /// The region was bound to `path`.
    Bound {
        /// Resource path the region was bound to.
        path: String,
    },
    /// A newer bind of the region started while metadata loaded.
    Superseded,
    /// Metadata failed to load; the region was not bound.
    MetadataUnavailable {
        /// Response or error text from the data source.
        response: String,
    },
    /// The resource key could not be built.
    KeyFailed {
        /// Why the key was rejected.
        reason: String,
    },
}

/// Point-in-time view of everything the shell exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellSnapshot {
    /// Column layout.
    pub layout: LayoutState,
    /// Busy state per region.
    pub busy: BusyBoard,
    /// The open error notification, if any.
    pub notification: Option<ErrorNotification>,
    /// Readiness of the master list.
    pub list_readiness: ListReadiness,
    /// Derived titles.
    pub titles: Titles,
}

/// The navigation shell of one application session.
pub struct Shell {
    config: ShellConfig,
    ctx: ShellContext,
    layout: LayoutMachine,
    busy: BusyBoard,
    errors: ErrorDeduplicator,
    selector: ListSelector,
    titles: Titles,
    epochs: Arc<BindEpochs>,
    binds: JoinSet<(BindTicket, BindOutcome)>,
    pending: JoinSet<SelectionOutcome>,
}

impl Shell {
    /// Create a shell for a new session.
    ///
    /// The application root and the list start busy until metadata and the
    /// list's first data arrive.
    pub fn new(config: ShellConfig, ctx: ShellContext, selector: ListSelector) -> Self {
        let busy = BusyBoard::new(&config.busy_delays());
        let errors = ErrorDeduplicator::new(ctx.bundle.text(ERROR_TEXT, &[]));
        let titles = Titles {
            list: ctx.bundle.text(LIST_TITLE_COUNT, &["0"]),
            line_items: ctx.bundle.text(LINE_ITEM_HEADING, &[]),
        };

        Self {
            config,
            ctx,
            layout: LayoutMachine::new(),
            busy,
            errors,
            selector,
            titles,
            epochs: Arc::new(BindEpochs::default()),
            binds: JoinSet::new(),
            pending: JoinSet::new(),
        }
    }

    /// Process one event.
    ///
    /// Must be called from within a tokio runtime; binds and selection
    /// requests are spawned onto it.
    ///
    /// # Errors
    ///
    /// [`ShellError::Route`] if a route match lacks its parameters or names
    /// an unknown route. The shell stays usable after an error.
    pub fn handle(&mut self, event: ShellEvent) -> Result<(), ShellError> {
        self.reap();

        match event {
            ShellEvent::Navigation(navigation) => {
                let route = navigation.classify()?;
                debug!(?route, "route matched");
                let actions = self.layout.on_route(route);
                self.execute(actions);
            },
            ShellEvent::ToggleFullScreen => self.layout.toggle_full_screen(),
            ShellEvent::CloseDetail => {
                let actions = self.layout.on_close_detail();
                self.execute(actions);
            },
            ShellEvent::NotFoundDisplayed => self.layout.on_not_found_displayed(),
            ShellEvent::ListSelectionChanged { key, selected } => {
                let mode = self.selector.mode().unwrap_or_default();
                let actions =
                    self.layout.on_list_selection_changed(key, selected, mode, !self.config.phone);
                self.execute(actions);
            },
            ShellEvent::LineItemPressed { object_id, product_id } => {
                let actions = self.layout.on_line_item_pressed(object_id, product_id);
                self.execute(actions);
            },
            ShellEvent::NavBack => {
                let actions = self.layout.on_nav_back(self.ctx.router.has_previous_entry());
                self.execute(actions);
            },
            ShellEvent::Binding { ticket, event } => self.on_binding(ticket, event),
            ShellEvent::UpdateFinished { region, total } => self.on_update_finished(region, total),
            ShellEvent::MetadataLoaded => self.busy.on_metadata_outcome(MetadataOutcome::Loaded),
            ShellEvent::MetadataFailed(failure) => {
                self.busy.on_metadata_outcome(MetadataOutcome::Failed);
                let details = FailureDetails::Metadata { response: failure.response };
                if let Some(notification) = self.errors.report_failure(details) {
                    self.ctx.notifier.show_error(notification);
                }
            },
            ShellEvent::RequestFailed(failure) => {
                if let Some(notification) = self.errors.report_request_failure(failure) {
                    self.ctx.notifier.show_error(notification);
                }
            },
            ShellEvent::NotificationDismissed { id } => {
                self.errors.dismiss(id);
            },
        }

        self.epochs.publish(&self.layout);
        self.reap();
        Ok(())
    }

    /// Wait for every outstanding bind and return their outcomes in
    /// completion order.
    ///
    /// Binds waiting on metadata that never loads keep this pending.
    pub async fn settle_binds(&mut self) -> Vec<BindOutcome> {
        let mut outcomes = Vec::new();
        while let Some(joined) = self.binds.join_next().await {
            if let Some(outcome) = self.on_bind_joined(joined) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Wait for every outstanding bind, then for every outstanding selection
    /// request, and return the selection outcomes in completion order.
    ///
    /// Requests waiting on a list that never registers or never receives data
    /// keep this pending.
    pub async fn settle(&mut self) -> Vec<SelectionOutcome> {
        self.settle_binds().await;

        let mut outcomes = Vec::new();
        while let Some(joined) = self.pending.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => warn!(%error, "selection task failed"),
            }
        }
        outcomes
    }

    /// Number of binds not collected yet.
    pub fn pending_binds(&self) -> usize {
        self.binds.len()
    }

    /// Number of selection requests not collected yet.
    pub fn pending_selections(&self) -> usize {
        self.pending.len()
    }

    /// Current layout state.
    pub fn layout(&self) -> &LayoutState {
        self.layout.state()
    }

    /// Busy state of every region.
    pub fn busy(&self) -> &BusyBoard {
        &self.busy
    }

    /// The open error notification, if any.
    pub fn notification(&self) -> Option<&ErrorNotification> {
        self.errors.current().filter(|notification| notification.is_open)
    }

    /// Derived titles.
    pub fn titles(&self) -> &Titles {
        &self.titles
    }

    /// The selector the shell issues selection requests through.
    pub fn selector(&self) -> &ListSelector {
        &self.selector
    }

    /// Whether `ticket` belongs to the latest bind of its region.
    pub fn is_current(&self, ticket: BindTicket) -> bool {
        self.layout.is_current(ticket)
    }

    /// Copy of everything the shell exposes.
    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            layout: self.layout.state().clone(),
            busy: self.busy.clone(),
            notification: self.notification().cloned(),
            list_readiness: self.selector.readiness(),
            titles: self.titles.clone(),
        }
    }

    fn execute(&mut self, actions: Vec<ShellAction>) {
        self.epochs.publish(&self.layout);

        for action in actions {
            match action {
                ShellAction::ResetBusy(region) => {
                    self.busy.region_mut(region).on_bind_region_start();
                },
                ShellAction::Bind { ticket, target } => self.bind(ticket, target),
                ShellAction::SelectListItem { ticket, key } => {
                    let selector = self.selector.clone();
                    let epochs = Arc::clone(&self.epochs);
                    self.pending.spawn(async move {
                        selector.select_by_key_if(&key, || epochs.is_current(ticket)).await
                    });
                },
                ShellAction::ClearSelection => {
                    let selector = self.selector.clone();
                    self.pending.spawn(async move {
                        match selector.clear_selection().await {
                            Ok(()) => SelectionOutcome::Cleared,
                            Err(error) => {
                                warn!(%error, "could not clear list selection");
                                SelectionOutcome::Unavailable
                            },
                        }
                    });
                },
                ShellAction::Navigate(request) => {
                    debug!(route = %request.route, "navigating");
                    self.ctx.router.navigate_to(&request);
                },
                ShellAction::Display(target) => {
                    debug!(target = target.as_str(), "displaying target");
                    self.ctx.router.display(target);
                },
                ShellAction::NavigateBack => {
                    debug!("navigating back");
                    self.ctx.router.go_back();
                },
            }
        }
    }

    /// Spawn the bind of `ticket`'s region.
    ///
    /// The task waits for metadata, then binds unless a newer bind of the
    /// region started in the meantime.
    fn bind(&mut self, ticket: BindTicket, target: BindTarget) {
        let (key, id) = match target {
            BindTarget::Object { object_id } => (self.config.object_key.clone(), object_id),
            BindTarget::Product { product_id, .. } => (self.config.product_key.clone(), product_id),
        };
        let model = Arc::clone(&self.ctx.model);
        let epochs = Arc::clone(&self.epochs);

        self.binds.spawn(async move {
            if let Err(MetadataFailure { response }) = model.metadata_loaded().await {
                return (ticket, BindOutcome::MetadataUnavailable { response });
            }
            if !epochs.is_current(ticket) {
                return (ticket, BindOutcome::Superseded);
            }

            let fields = [(key.key_field.as_str(), id.as_str())];
            let path = match model.create_key(&key.entity_set, &fields) {
                Ok(key) => format!("/{key}"),
                Err(error) => {
                    return (ticket, BindOutcome::KeyFailed { reason: error.to_string() });
                },
            };

            debug!(?ticket, %path, "binding region");
            model.bind_element(BindRequest { ticket, path: path.clone() });
            (ticket, BindOutcome::Bound { path })
        });
    }

    fn on_bind_joined(
        &mut self,
        joined: Result<(BindTicket, BindOutcome), JoinError>,
    ) -> Option<BindOutcome> {
        let (ticket, outcome) = match joined {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "bind task failed");
                return None;
            },
        };

        match &outcome {
            BindOutcome::Bound { .. } => {},
            BindOutcome::Superseded => debug!(?ticket, "bind superseded while metadata loaded"),
            BindOutcome::MetadataUnavailable { response: reason }
            | BindOutcome::KeyFailed { reason } => {
                if self.layout.is_current(ticket) {
                    warn!(?ticket, %reason, "bind abandoned");
                    self.busy.region_mut(ticket.region).on_bind_region_settled();
                } else {
                    debug!(?ticket, %reason, "superseded bind abandoned");
                }
            },
        }
        Some(outcome)
    }

    fn on_binding(&mut self, ticket: BindTicket, event: BindingEvent) {
        if !self.layout.is_current(ticket) {
            debug!(?ticket, ?event, "dropping signal of superseded bind");
            return;
        }

        match event {
            BindingEvent::DataRequested => self.busy.region_mut(ticket.region).on_data_requested(),
            BindingEvent::DataReceived => {
                self.busy.region_mut(ticket.region).on_bind_region_settled();
            },
            BindingEvent::Changed(bound) => {
                self.busy.region_mut(ticket.region).on_bind_region_settled();
                let actions = self.layout.on_binding_changed(ticket, bound);
                self.execute(actions);
            },
        }
    }

    fn on_update_finished(&mut self, region: Region, total: Option<usize>) {
        self.busy.region_mut(region).on_bind_region_settled();

        let Some(total) = total else {
            return;
        };
        let count = total.to_string();
        match region {
            Region::List => self.titles.list = self.ctx.bundle.text(LIST_TITLE_COUNT, &[&count]),
            Region::LineItems => {
                self.titles.line_items = if total > 0 {
                    self.ctx.bundle.text(LINE_ITEM_HEADING_COUNT, &[&count])
                } else {
                    self.ctx.bundle.text(LINE_ITEM_HEADING, &[])
                };
            },
            _ => {},
        }
    }

    fn reap(&mut self) {
        while let Some(joined) = self.binds.try_join_next() {
            self.on_bind_joined(joined);
        }
        while let Some(joined) = self.pending.try_join_next() {
            if let Err(error) = joined {
                warn!(%error, "selection task failed");
            }
        }
    }
}
