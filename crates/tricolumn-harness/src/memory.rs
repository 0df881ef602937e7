//! Recording implementations of the shell's collaborators.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::watch;
use tricolumn_app::{
    BindRequest, BindingEvent, BundleAccessor, KeyError, MetadataFailure, ModelAccessor,
    Notifier, Router, ShellEvent,
};
use tricolumn_core::{BoundObject, DisplayTarget, ErrorNotification, NavigationRequest};

/// Lock a mutex, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Router that records what the shell asked of it.
///
/// Starts without a previous history entry.
#[derive(Debug, Default)]
pub struct MemoryRouter {
    navigations: Mutex<Vec<NavigationRequest>>,
    displays: Mutex<Vec<DisplayTarget>>,
    has_history: Mutex<bool>,
    back_steps: Mutex<usize>,
}

impl MemoryRouter {
    /// Empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigations requested so far.
    pub fn navigations(&self) -> Vec<NavigationRequest> {
        lock(&self.navigations).clone()
    }

    /// Display targets shown so far.
    pub fn displays(&self) -> Vec<DisplayTarget> {
        lock(&self.displays).clone()
    }

    /// Pretend the history does or does not have a previous entry.
    pub fn set_history(&self, has_previous_entry: bool) {
        *lock(&self.has_history) = has_previous_entry;
    }

    /// How often the shell went back in history.
    pub fn back_steps(&self) -> usize {
        *lock(&self.back_steps)
    }
}

impl Router for MemoryRouter {
    fn navigate_to(&self, request: &NavigationRequest) {
        lock(&self.navigations).push(request.clone());
    }

    fn display(&self, target: DisplayTarget) {
        lock(&self.displays).push(target);
    }

    fn has_previous_entry(&self) -> bool {
        *lock(&self.has_history)
    }

    fn go_back(&self) {
        *lock(&self.back_steps) += 1;
    }
}

/// Metadata load state; `None` while the load is still in flight.
type MetadataState = Option<Result<(), MetadataFailure>>;

/// Data model backed by an in-memory catalog of resource paths.
///
/// Metadata is loaded from the start unless [`MemoryModel::hold_metadata`]
/// puts it back in flight.
#[derive(Debug)]
pub struct MemoryModel {
    metadata: watch::Sender<MetadataState>,
    catalog: Mutex<BTreeMap<String, BoundObject>>,
    binds: Mutex<Vec<BindRequest>>,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self {
            metadata: watch::channel(Some(Ok(()))).0,
            catalog: Mutex::new(BTreeMap::new()),
            binds: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryModel {
    /// Model with loaded metadata and an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata is loading; binds wait until it loads or fails.
    pub fn hold_metadata(&self) {
        self.metadata.send_replace(None);
    }

    /// Metadata finished loading.
    pub fn load_metadata(&self) {
        self.metadata.send_replace(Some(Ok(())));
    }

    /// Make metadata loading fail with `response`.
    pub fn fail_metadata(&self, response: impl Into<String>) {
        self.metadata.send_replace(Some(Err(MetadataFailure { response: response.into() })));
    }

    /// Whether metadata is still loading.
    pub fn metadata_pending(&self) -> bool {
        self.metadata.borrow().is_none()
    }

    /// Add an object reachable at `path` whose list key is `key`.
    pub fn insert(&self, path: impl Into<String>, key: impl Into<String>) {
        let path = path.into();
        lock(&self.catalog).insert(path.clone(), BoundObject { path, key: key.into() });
    }

    /// Binds requested so far.
    pub fn binds(&self) -> Vec<BindRequest> {
        lock(&self.binds).clone()
    }

    /// The most recent bind.
    pub fn last_bind(&self) -> Option<BindRequest> {
        lock(&self.binds).last().cloned()
    }

    /// The signals a binding of `request` produces: request, arrival, change.
    pub fn events_for(&self, request: &BindRequest) -> Vec<ShellEvent> {
        let bound = lock(&self.catalog).get(&request.path).cloned();
        [BindingEvent::DataRequested, BindingEvent::DataReceived, BindingEvent::Changed(bound)]
            .into_iter()
            .map(|event| ShellEvent::Binding { ticket: request.ticket, event })
            .collect()
    }
}

#[async_trait]
impl ModelAccessor for MemoryModel {
    async fn metadata_loaded(&self) -> Result<(), MetadataFailure> {
        let mut state = self.metadata.subscribe();
        let loaded = state
            .wait_for(Option::is_some)
            .await
            .map_err(|_| MetadataFailure { response: "metadata source closed".to_string() })?
            .clone();
        loaded.unwrap_or(Ok(()))
    }

    fn create_key(
        &self,
        entity_set: &str,
        key_fields: &[(&str, &str)],
    ) -> Result<String, KeyError> {
        if let Some((field, _)) = key_fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(KeyError::EmptyValue {
                entity_set: entity_set.to_string(),
                field: (*field).to_string(),
            });
        }

        match key_fields {
            [] => Err(KeyError::NoKeyFields { entity_set: entity_set.to_string() }),
            [(_, value)] => Ok(format!("{entity_set}({value})")),
            fields => {
                let pairs: Vec<String> =
                    fields.iter().map(|(field, value)| format!("{field}={value}")).collect();
                Ok(format!("{entity_set}({})", pairs.join(",")))
            },
        }
    }

    fn bind_element(&self, request: BindRequest) {
        lock(&self.binds).push(request);
    }
}

/// Text bundle with fixed texts and `{n}` placeholder substitution.
#[derive(Debug, Clone)]
pub struct StaticBundle {
    texts: HashMap<String, String>,
}

impl Default for StaticBundle {
    fn default() -> Self {
        Self::from_pairs([
            ("errorText", "Sorry, a technical error occurred! Please try again later."),
            ("listTitleCount", "Categories ({0})"),
            ("detailLineItemTableHeading", "Products"),
            ("detailLineItemTableHeadingCount", "Products ({0})"),
        ])
    }
}

impl StaticBundle {
    /// Bundle containing exactly `pairs`.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let texts = pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self { texts }
    }
}

impl BundleAccessor for StaticBundle {
    fn text(&self, key: &str, args: &[&str]) -> String {
        let template = self.texts.get(key).map_or(key, String::as_str);
        args.iter()
            .enumerate()
            .fold(template.to_string(), |text, (i, arg)| text.replace(&format!("{{{i}}}"), arg))
    }
}

/// Notifier that records every notification it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<ErrorNotification>>,
}

impl RecordingNotifier {
    /// Empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications shown so far.
    pub fn shown(&self) -> Vec<ErrorNotification> {
        lock(&self.shown).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, notification: &ErrorNotification) {
        lock(&self.shown).push(notification.clone());
    }
}
