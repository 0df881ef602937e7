//! World state for scenario execution.
//!
//! The World owns a [`Shell`] together with the in-memory collaborators it
//! talks to, and offers helpers that play the parts of the router, the data
//! source and the list.

use std::sync::Arc;

use tricolumn_app::{
    BindOutcome, ListRegistrar, ListSelector, SelectionOutcome, Shell, ShellConfig, ShellContext,
    ShellError, ShellEvent,
};
use tricolumn_core::{NavigationEvent, RequestFailure, RouteName, route};

use crate::{
    list::MemoryList,
    memory::{MemoryModel, MemoryRouter, RecordingNotifier, StaticBundle},
};

/// A shell and everything around it.
pub struct World {
    shell: Shell,
    router: Arc<MemoryRouter>,
    model: Arc<MemoryModel>,
    notifier: Arc<RecordingNotifier>,
    list: Arc<MemoryList>,
    registrar: Option<ListRegistrar>,
}

impl World {
    /// World with the default configuration and an unregistered list.
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    /// World with `config` and an unregistered list.
    pub fn with_config(config: ShellConfig) -> Self {
        Self::build(config, MemoryList::new())
    }

    /// World with `config` managing `list`, not yet registered.
    pub fn build(config: ShellConfig, list: MemoryList) -> Self {
        let router = Arc::new(MemoryRouter::new());
        let model = Arc::new(MemoryModel::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = ShellContext {
            router: router.clone(),
            model: model.clone(),
            bundle: Arc::new(StaticBundle::default()),
            notifier: notifier.clone(),
        };
        let (registrar, selector) = ListSelector::new();

        Self {
            shell: Shell::new(config, ctx, selector),
            router,
            model,
            notifier,
            list: Arc::new(list),
            registrar: Some(registrar),
        }
    }

    /// The shell under test.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Mutable access to the shell under test.
    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    /// The recording router.
    pub fn router(&self) -> &MemoryRouter {
        &self.router
    }

    /// The in-memory data model.
    pub fn model(&self) -> &MemoryModel {
        &self.model
    }

    /// The recording notifier.
    pub fn notifier(&self) -> &RecordingNotifier {
        &self.notifier
    }

    /// The managed list.
    pub fn list(&self) -> &MemoryList {
        &self.list
    }

    /// Register the list with the selector; later calls do nothing.
    ///
    /// Returns whether this call registered it.
    pub fn register_list(&mut self) -> bool {
        let Some(registrar) = self.registrar.take() else {
            return false;
        };
        registrar.register(self.list.clone());
        true
    }

    /// Feed one event to the shell.
    ///
    /// Binds the event started are collected before returning, unless the
    /// model's metadata is being held.
    pub async fn send(&mut self, event: ShellEvent) -> Result<(), ShellError> {
        self.shell.handle(event)?;
        if !self.model.metadata_pending() {
            self.shell.settle_binds().await;
        }
        Ok(())
    }

    /// The router matched the list route.
    pub async fn open_list(&mut self) -> Result<(), ShellError> {
        let event =
            NavigationEvent::matched(RouteName::List.as_str(), Vec::<(String, String)>::new());
        self.send(ShellEvent::Navigation(event)).await
    }

    /// The router matched the object route for `object_id`.
    pub async fn open_object(&mut self, object_id: &str) -> Result<(), ShellError> {
        let event =
            NavigationEvent::matched(RouteName::Object.as_str(), [(route::OBJECT_ID, object_id)]);
        self.send(ShellEvent::Navigation(event)).await
    }

    /// The router matched the product route.
    pub async fn open_product(
        &mut self,
        object_id: &str,
        product_id: &str,
    ) -> Result<(), ShellError> {
        let event = NavigationEvent::matched(
            RouteName::Product.as_str(),
            [(route::OBJECT_ID, object_id), (route::PRODUCT_ID, product_id)],
        );
        self.send(ShellEvent::Navigation(event)).await
    }

    /// No route pattern matched.
    pub async fn bypass(&mut self) -> Result<(), ShellError> {
        self.send(ShellEvent::Navigation(NavigationEvent::bypassed())).await
    }

    /// The user taps the list entry with `key`.
    ///
    /// Returns `false` without telling the shell if no entry has that key.
    pub async fn tap_list(&mut self, key: &str) -> Result<bool, ShellError> {
        if !self.list.tap(key) {
            return Ok(false);
        }
        let event = ShellEvent::ListSelectionChanged { key: key.to_string(), selected: true };
        self.send(event).await?;
        Ok(true)
    }

    /// The user presses the line item for `product_id` of `object_id`.
    pub async fn press_line_item(
        &mut self,
        object_id: &str,
        product_id: &str,
    ) -> Result<(), ShellError> {
        let event = ShellEvent::LineItemPressed {
            object_id: object_id.to_string(),
            product_id: product_id.to_string(),
        };
        self.send(event).await
    }

    /// The user dismisses the open notification.
    ///
    /// Returns `false` if none is open.
    pub async fn dismiss_notification(&mut self) -> Result<bool, ShellError> {
        let Some(id) = self.shell.notification().map(|notification| notification.id) else {
            return Ok(false);
        };
        self.send(ShellEvent::NotificationDismissed { id }).await?;
        Ok(true)
    }

    /// Play the data source for the most recent bind: request, arrival and
    /// change, in that order.
    ///
    /// Returns `false` if nothing was bound yet.
    pub async fn complete_last_bind(&mut self) -> Result<bool, ShellError> {
        let Some(request) = self.model.last_bind() else {
            return Ok(false);
        };
        for event in self.model.events_for(&request) {
            self.send(event).await?;
        }
        Ok(true)
    }

    /// A data request failed with `status_code` and `body`.
    pub async fn fail_request(&mut self, status_code: u16, body: &str) -> Result<(), ShellError> {
        let failure = RequestFailure { status_code, response_body: body.to_string() };
        self.send(ShellEvent::RequestFailed(failure)).await
    }

    /// Wait for all pending binds.
    pub async fn settle_binds(&mut self) -> Vec<BindOutcome> {
        self.shell.settle_binds().await
    }

    /// Wait for all pending binds and selection requests.
    pub async fn settle(&mut self) -> Vec<SelectionOutcome> {
        self.shell.settle().await
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
