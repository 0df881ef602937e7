//! Deferred list selection.
//!
//! Selection requests are usually issued right after a navigation decision,
//! while the list may still be fetching its first page. [`ListSelector`]
//! accepts them at any time and applies them once the list is registered
//! and its first data has arrived.
//!
//! Registration happens through the separate [`ListRegistrar`] handle,
//! which is consumed on use, so a selector can only ever manage one list.
//! The registrar must be used before the list's first load starts;
//! otherwise the first arrival is never observed and selection requests
//! stay pending.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use tricolumn_core::{
    DataArrival, ListReadiness, SelectionMode, SelectionPlan, plan_selection,
};

use crate::{
    deferred::{Resolver, Signal, deferred},
    error::SignalError,
};

/// Callback invoked with a list's next data arrival.
pub type DataReceivedCallback = Box<dyn FnOnce(DataArrival) + Send>;

/// A list control whose selection the shell manages.
///
/// The list owns its selection state; the selector only requests changes.
pub trait SelectableList: Send + Sync {
    /// Current selection mode.
    fn mode(&self) -> SelectionMode;

    /// Bound keys of the entries, in display order.
    fn item_keys(&self) -> Vec<String>;

    /// Key of the selected entry, if any.
    fn selected_key(&self) -> Option<String>;

    /// Select the entry at `index`.
    fn select_index(&self, index: usize);

    /// Remove every selection; listeners are not notified when `suppress_event`.
    fn remove_selections(&self, suppress_event: bool);

    /// Invoke `callback` once, on the next data arrival of the list binding.
    fn once_data_received(&self, callback: DataReceivedCallback);
}

/// Result of a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionOutcome {
    /// The entry at `index` was selected.
    Selected {
        /// Index of the selected entry.
        index: usize,
    },
    /// The entry was already selected; nothing changed.
    AlreadySelected,
    /// The list does not allow selection.
    SelectionDisabled,
    /// No entry has the requested key.
    NoMatch,
    /// The list failed to load or has no entries.
    Unavailable,
    /// All selections were removed.
    Cleared,
    /// The bind that asked for the selection was superseded while the list
    /// was loading.
    Superseded,
}

/// Producer handle: attaches the list to its [`ListSelector`].
pub struct ListRegistrar {
    list: Resolver<Arc<dyn SelectableList>>,
    readiness: Resolver<ListReadiness>,
}

impl ListRegistrar {
    /// Register the list the selector manages.
    ///
    /// Subscribes to the list's first data arrival before the list is
    /// published to waiting selection requests.
    pub fn register(self, list: Arc<dyn SelectableList>) {
        let Self { list: list_resolver, readiness } = self;
        let registered = ListReadiness::Unbound.on_registered();

        list.once_data_received(Box::new(move |arrival| {
            let state = registered.on_first_data(arrival);
            debug!(?arrival, ?state, "list received first data");
            readiness.resolve(state);
        }));

        debug!("list registered");
        list_resolver.resolve(list);
    }
}

/// Consumer handle: issues selection requests against the registered list.
///
/// Cheap to clone; every clone talks to the same list.
#[derive(Clone)]
pub struct ListSelector {
    list: Signal<Arc<dyn SelectableList>>,
    readiness: Signal<ListReadiness>,
}

impl ListSelector {
    /// Create a selector and the registrar that feeds it.
    pub fn new() -> (ListRegistrar, ListSelector) {
        let (list_resolver, list) = deferred();
        let (readiness_resolver, readiness) = deferred();

        (
            ListRegistrar { list: list_resolver, readiness: readiness_resolver },
            ListSelector { list, readiness },
        )
    }

    /// Where the managed list is in its readiness lifecycle.
    pub fn readiness(&self) -> ListReadiness {
        match (self.readiness.peek(), self.list.peek()) {
            (Some(state), _) => state,
            (None, Some(_)) => ListReadiness::AwaitingFirstData,
            (None, None) => ListReadiness::Unbound,
        }
    }

    /// Selection mode of the registered list, if any.
    pub fn mode(&self) -> Option<SelectionMode> {
        self.list.peek().map(|list| list.mode())
    }

    /// Select the first entry whose key equals `key`.
    ///
    /// Waits for registration and the first data arrival. If the list failed
    /// to load or is empty the request is dropped with a warning; an empty
    /// list is a valid state, not an error.
    pub async fn select_by_key(&self, key: &str) -> SelectionOutcome {
        self.select_by_key_if(key, || true).await
    }

    /// Like [`ListSelector::select_by_key`], but once the list is ready the
    /// request is dropped unless `still_wanted` returns true.
    pub async fn select_by_key_if(
        &self,
        key: &str,
        still_wanted: impl FnOnce() -> bool,
    ) -> SelectionOutcome {
        let Some(list) = self.when_loaded().await else {
            warn!(
                key,
                "could not select list item: the list encountered an error or had no items"
            );
            return SelectionOutcome::Unavailable;
        };

        if !still_wanted() {
            debug!(key, "selection request superseded while the list loaded");
            return SelectionOutcome::Superseded;
        }

        let selected = list.selected_key();
        match plan_selection(list.mode(), selected.as_deref(), &list.item_keys(), key) {
            SelectionPlan::Select { index } => {
                debug!(key, index, "selecting list item");
                list.select_index(index);
                SelectionOutcome::Selected { index }
            },
            SelectionPlan::AlreadySelected => SelectionOutcome::AlreadySelected,
            SelectionPlan::SelectionDisabled => SelectionOutcome::SelectionDisabled,
            SelectionPlan::NoMatch => {
                debug!(key, "no list item with key");
                SelectionOutcome::NoMatch
            },
        }
    }

    /// Remove all selections without notifying selection listeners.
    ///
    /// Waits for registration only, not for data.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Abandoned`] if the registrar was dropped unused.
    pub async fn clear_selection(&self) -> Result<(), SignalError> {
        let list = self.list.wait().await?;
        list.remove_selections(true);
        Ok(())
    }

    async fn when_loaded(&self) -> Option<Arc<dyn SelectableList>> {
        let list = self.list.wait().await.ok()?;
        match self.readiness.wait().await {
            Ok(ListReadiness::Ready) => Some(list),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeList {
        keys: Vec<String>,
        selected: Mutex<Option<usize>>,
        callback: Mutex<Option<DataReceivedCallback>>,
    }

    impl FakeList {
        fn with_keys(keys: &[&str]) -> Arc<Self> {
            let keys = keys.iter().map(ToString::to_string).collect();
            Arc::new(Self { keys, ..Self::default() })
        }

        fn arrive(&self, arrival: DataArrival) {
            if let Some(callback) = self.callback.lock().unwrap().take() {
                callback(arrival);
            }
        }
    }

    impl SelectableList for FakeList {
        fn mode(&self) -> SelectionMode {
            SelectionMode::SingleSelectMaster
        }

        fn item_keys(&self) -> Vec<String> {
            self.keys.clone()
        }

        fn selected_key(&self) -> Option<String> {
            self.selected.lock().unwrap().map(|i| self.keys[i].clone())
        }

        fn select_index(&self, index: usize) {
            *self.selected.lock().unwrap() = Some(index);
        }

        fn remove_selections(&self, _suppress_event: bool) {
            *self.selected.lock().unwrap() = None;
        }

        fn once_data_received(&self, callback: DataReceivedCallback) {
            *self.callback.lock().unwrap() = Some(callback);
        }
    }

    #[tokio::test]
    async fn readiness_follows_lifecycle() {
        let (registrar, selector) = ListSelector::new();
        assert_eq!(selector.readiness(), ListReadiness::Unbound);

        let list = FakeList::with_keys(&["1"]);
        registrar.register(list.clone());
        assert_eq!(selector.readiness(), ListReadiness::AwaitingFirstData);

        list.arrive(DataArrival::Received { item_count: 1 });
        assert_eq!(selector.readiness(), ListReadiness::Ready);
    }

    #[tokio::test]
    async fn request_before_registration_applies_after_data() {
        let (registrar, selector) = ListSelector::new();
        let pending = tokio::spawn({
            let selector = selector.clone();
            async move { selector.select_by_key("7").await }
        });
        tokio::task::yield_now().await;

        let list = FakeList::with_keys(&["1", "7"]);
        registrar.register(list.clone());
        list.arrive(DataArrival::Received { item_count: 2 });

        assert_eq!(pending.await.unwrap(), SelectionOutcome::Selected { index: 1 });
        assert_eq!(list.selected_key().as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn unwanted_request_is_dropped_once_list_is_ready() {
        let (registrar, selector) = ListSelector::new();
        let pending = tokio::spawn({
            let selector = selector.clone();
            async move { selector.select_by_key_if("7", || false).await }
        });
        tokio::task::yield_now().await;

        let list = FakeList::with_keys(&["7"]);
        registrar.register(list.clone());
        list.arrive(DataArrival::Received { item_count: 1 });

        assert_eq!(pending.await.unwrap(), SelectionOutcome::Superseded);
        assert_eq!(list.selected_key(), None);
    }

    #[tokio::test]
    async fn mode_is_known_after_registration() {
        let (registrar, selector) = ListSelector::new();
        assert_eq!(selector.mode(), None);

        registrar.register(FakeList::with_keys(&["7"]));
        assert_eq!(selector.mode(), Some(SelectionMode::SingleSelectMaster));
    }

    #[tokio::test]
    async fn failed_load_drops_request() {
        let (registrar, selector) = ListSelector::new();
        let list = FakeList::with_keys(&["7"]);
        registrar.register(list.clone());
        list.arrive(DataArrival::Failed);

        assert_eq!(selector.select_by_key("7").await, SelectionOutcome::Unavailable);
        assert_eq!(list.selected_key(), None);
    }

    #[tokio::test]
    async fn clear_waits_only_for_registration() {
        let (registrar, selector) = ListSelector::new();
        let list = FakeList::with_keys(&["7"]);
        list.select_index(0);
        registrar.register(list.clone());

        assert_eq!(selector.clear_selection().await, Ok(()));
        assert_eq!(list.selected_key(), None);
    }

    #[tokio::test]
    async fn dropped_registrar_abandons_clear() {
        let (registrar, selector) = ListSelector::new();
        drop(registrar);

        assert_eq!(selector.clear_selection().await, Err(SignalError::Abandoned));
        assert_eq!(selector.select_by_key("7").await, SelectionOutcome::Unavailable);
    }
}
