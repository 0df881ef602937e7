//! List readiness and selection planning.
//!
//! The list owns its selection. This module only decides whether a list is
//! ready to be selected on and which entry a selection request refers to;
//! the asynchronous coordination lives in `tricolumn-app`.
//!
//! # Readiness lifecycle
//!
//! ```text
//! ┌─────────┐ registered ┌───────────────────┐ items > 0 ┌───────┐
//! │ Unbound │───────────>│ AwaitingFirstData │──────────>│ Ready │
//! └─────────┘            └───────────────────┘           └───────┘
//!                                  │ error / empty
//!                                  ↓
//!                             ┌────────┐
//!                             │ Failed │
//!                             └────────┘
//! ```
//!
//! `Ready` and `Failed` are terminal; a list is never reset to `Unbound`.

use serde::Serialize;

/// Readiness of a list for selection requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListReadiness {
    /// No list registered yet.
    Unbound,
    /// List registered, first data not received yet.
    AwaitingFirstData,
    /// First data arrived with at least one item.
    Ready,
    /// First data arrival failed or was empty.
    Failed,
}

/// First data arrival as reported by a list binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataArrival {
    /// Data arrived with this many items.
    Received {
        /// Number of list entries after the arrival.
        item_count: usize,
    },
    /// The request for data failed.
    Failed,
}

impl ListReadiness {
    /// A list was registered.
    #[must_use]
    pub fn on_registered(self) -> Self {
        match self {
            Self::Unbound => Self::AwaitingFirstData,
            other => other,
        }
    }

    /// The registered list's first data arrived.
    ///
    /// Arrivals before registration or after a terminal state are ignored.
    #[must_use]
    pub fn on_first_data(self, arrival: DataArrival) -> Self {
        match (self, arrival) {
            (Self::AwaitingFirstData, DataArrival::Received { item_count }) if item_count > 0 => {
                Self::Ready
            },
            (Self::AwaitingFirstData, _) => Self::Failed,
            (other, _) => other,
        }
    }

    /// Whether the lifecycle has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Selection mode of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SelectionMode {
    /// Entries cannot be selected.
    None,
    /// One entry at a time.
    #[default]
    SingleSelect,
    /// One entry at a time, master list style.
    SingleSelectMaster,
    /// Several entries at a time.
    MultiSelect,
}

/// What to do with a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPlan {
    /// Select the entry at this index.
    Select {
        /// Index of the first entry with the requested key.
        index: usize,
    },
    /// The requested entry is already selected.
    AlreadySelected,
    /// The list does not allow selection.
    SelectionDisabled,
    /// No entry has the requested key.
    NoMatch,
}

/// Decide how to satisfy a request to select `target`.
///
/// `keys` are the list entries' bound keys in display order, `selected` the
/// key of the currently selected entry.
pub fn plan_selection<S: AsRef<str>>(
    mode: SelectionMode,
    selected: Option<&str>,
    keys: &[S],
    target: &str,
) -> SelectionPlan {
    if mode == SelectionMode::None {
        return SelectionPlan::SelectionDisabled;
    }

    if selected == Some(target) {
        return SelectionPlan::AlreadySelected;
    }

    keys.iter()
        .position(|key| key.as_ref() == target)
        .map_or(SelectionPlan::NoMatch, |index| SelectionPlan::Select { index })
}
