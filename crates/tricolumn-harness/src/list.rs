//! In-memory selectable list.

use std::sync::Mutex;

use tracing::debug;
use tricolumn_app::{DataReceivedCallback, SelectableList};
use tricolumn_core::{DataArrival, SelectionMode};

use crate::memory::lock;

#[derive(Default)]
struct ListState {
    mode: SelectionMode,
    keys: Vec<String>,
    selected: Option<usize>,
    selection_events: usize,
    waiting: Vec<DataReceivedCallback>,
}

/// A list control whose data arrives when the test says so.
///
/// Programmatic selection does not count as a selection-change event; only
/// [`MemoryList::tap`] and unsuppressed removals do.
#[derive(Default)]
pub struct MemoryList {
    state: Mutex<ListState>,
}

impl MemoryList {
    /// Empty list in single-select mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty list with the given selection mode.
    pub fn with_mode(mode: SelectionMode) -> Self {
        Self { state: Mutex::new(ListState { mode, ..ListState::default() }) }
    }

    /// Data arrives with `keys` as entries.
    pub fn deliver<S: AsRef<str>>(&self, keys: &[S]) {
        let waiting = {
            let mut state = lock(&self.state);
            state.keys = keys.iter().map(|key| key.as_ref().to_string()).collect();
            state.selected = None;
            std::mem::take(&mut state.waiting)
        };
        debug!(items = keys.len(), "list data delivered");
        for callback in waiting {
            callback(DataArrival::Received { item_count: keys.len() });
        }
    }

    /// The data request fails.
    pub fn fail(&self) {
        let waiting = std::mem::take(&mut lock(&self.state).waiting);
        for callback in waiting {
            callback(DataArrival::Failed);
        }
    }

    /// The user selects the entry with `key`.
    pub fn tap(&self, key: &str) -> bool {
        let mut state = lock(&self.state);
        let Some(index) = state.keys.iter().position(|k| k == key) else {
            return false;
        };
        state.selected = Some(index);
        state.selection_events += 1;
        true
    }

    /// Number of selection-change events fired.
    pub fn selection_events(&self) -> usize {
        lock(&self.state).selection_events
    }

    /// Whether anyone is waiting for the next data arrival.
    pub fn has_waiters(&self) -> bool {
        !lock(&self.state).waiting.is_empty()
    }
}

impl SelectableList for MemoryList {
    fn mode(&self) -> SelectionMode {
        lock(&self.state).mode
    }

    fn item_keys(&self) -> Vec<String> {
        lock(&self.state).keys.clone()
    }

    fn selected_key(&self) -> Option<String> {
        let state = lock(&self.state);
        state.selected.and_then(|index| state.keys.get(index).cloned())
    }

    fn select_index(&self, index: usize) {
        let mut state = lock(&self.state);
        if index < state.keys.len() {
            state.selected = Some(index);
        }
    }

    fn remove_selections(&self, suppress_event: bool) {
        let mut state = lock(&self.state);
        if state.selected.take().is_some() && !suppress_event {
            state.selection_events += 1;
        }
    }

    fn once_data_received(&self, callback: DataReceivedCallback) {
        lock(&self.state).waiting.push(callback);
    }
}
