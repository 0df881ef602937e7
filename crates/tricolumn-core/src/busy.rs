//! Busy flags and busy indicator delays.
//!
//! A region shows its busy indicator immediately (zero delay) until its
//! first load settles; after that the configured delay is restored so fast
//! reloads do not flicker.
//!
//! # Lifecycle per region
//!
//! ```text
//! ┌───────────────┐ bind start ┌──────────────┐ first settle ┌──────────────────┐
//! │ Uninitialized │───────────>│ Busy(delay 0)│─────────────>│ Idle(delay orig) │
//! └───────────────┘            └──────────────┘              └──────────────────┘
//! ```
//!
//! `Idle` is terminal for the delay. The busy flag itself keeps toggling
//! with every later bind.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::action::Region;

/// Delay-restoration phase of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BusyPhase {
    /// Nothing bound yet.
    Uninitialized,
    /// First load in flight, indicator delay forced to zero.
    Busy,
    /// First load settled, configured delay restored.
    Idle,
}

/// Outcome of loading the backend metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataOutcome {
    /// Metadata loaded.
    Loaded,
    /// Metadata could not be loaded.
    Failed,
}

/// Busy state of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyIndicator {
    busy: bool,
    #[serde(rename = "delay_ms", serialize_with = "as_millis")]
    delay: Duration,
    #[serde(skip)]
    original_delay: Duration,
    phase: BusyPhase,
}

fn as_millis<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}

impl BusyIndicator {
    /// Idle region that has not been bound yet.
    pub fn new(original_delay: Duration) -> Self {
        Self { busy: false, delay: original_delay, original_delay, phase: BusyPhase::Uninitialized }
    }

    /// Region that is busy from the start with a zero delay.
    ///
    /// Used for the application root and the list, which load as soon as the
    /// shell starts.
    pub fn busy_from_start(original_delay: Duration) -> Self {
        Self { busy: true, delay: Duration::ZERO, original_delay, phase: BusyPhase::Busy }
    }

    /// Idle region whose first load, whenever it starts, shows without delay.
    ///
    /// Used for tables that load on their own rather than through a bind.
    pub fn zero_delay_until_first_load(original_delay: Duration) -> Self {
        Self { busy: false, delay: Duration::ZERO, original_delay, phase: BusyPhase::Busy }
    }

    /// Whether the region currently shows a busy indicator.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Delay before the busy indicator becomes visible.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The delay configured for this region.
    pub fn original_delay(&self) -> Duration {
        self.original_delay
    }

    /// Current delay-restoration phase.
    pub fn phase(&self) -> BusyPhase {
        self.phase
    }

    /// A bind of the region is starting.
    ///
    /// Until the first load settles the indicator shows without delay.
    pub fn on_bind_region_start(&mut self) {
        self.busy = true;
        if self.phase != BusyPhase::Idle {
            self.delay = Duration::ZERO;
            self.phase = BusyPhase::Busy;
        }
    }

    /// The binding started requesting data.
    pub fn on_data_requested(&mut self) {
        self.busy = true;
    }

    /// The region's load settled, successfully or not.
    pub fn on_bind_region_settled(&mut self) {
        self.busy = false;
        if self.phase != BusyPhase::Idle {
            self.delay = self.original_delay;
            self.phase = BusyPhase::Idle;
        }
    }
}

/// Configured busy indicator delays per region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyDelays {
    /// Application root.
    pub app: Duration,
    /// Master list.
    pub list: Duration,
    /// Object detail.
    pub detail: Duration,
    /// Line item table.
    pub line_items: Duration,
    /// Product sub-detail.
    pub product: Duration,
}

impl Default for BusyDelays {
    fn default() -> Self {
        Self {
            app: Duration::from_millis(1000),
            list: Duration::from_millis(1000),
            detail: Duration::from_millis(1000),
            line_items: Duration::from_millis(1000),
            product: Duration::from_millis(1000),
        }
    }
}

impl BusyDelays {
    /// Configured delay for `region`.
    pub fn for_region(&self, region: Region) -> Duration {
        match region {
            Region::App => self.app,
            Region::List => self.list,
            Region::Detail => self.detail,
            Region::LineItems => self.line_items,
            Region::Product => self.product,
        }
    }
}

/// Busy state of every region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyBoard {
    app: BusyIndicator,
    list: BusyIndicator,
    detail: BusyIndicator,
    line_items: BusyIndicator,
    product: BusyIndicator,
}

impl BusyBoard {
    /// Seed all regions from the configured delays.
    ///
    /// The application root and the list start busy. The line item table
    /// keeps a zero delay until its first update. The bound regions start
    /// uninitialized and become busy when their first bind starts.
    pub fn new(delays: &BusyDelays) -> Self {
        Self {
            app: BusyIndicator::busy_from_start(delays.app),
            list: BusyIndicator::busy_from_start(delays.list),
            detail: BusyIndicator::new(delays.detail),
            line_items: BusyIndicator::zero_delay_until_first_load(delays.line_items),
            product: BusyIndicator::new(delays.product),
        }
    }

    /// Busy state of `region`.
    pub fn region(&self, region: Region) -> &BusyIndicator {
        match region {
            Region::App => &self.app,
            Region::List => &self.list,
            Region::Detail => &self.detail,
            Region::LineItems => &self.line_items,
            Region::Product => &self.product,
        }
    }

    /// Mutable busy state of `region`.
    pub fn region_mut(&mut self, region: Region) -> &mut BusyIndicator {
        match region {
            Region::App => &mut self.app,
            Region::List => &mut self.list,
            Region::Detail => &mut self.detail,
            Region::LineItems => &mut self.line_items,
            Region::Product => &mut self.product,
        }
    }

    /// Both metadata outcomes end the application's busy state.
    ///
    /// A failed load must not leave the application busy forever.
    pub fn on_metadata_outcome(&mut self, outcome: MetadataOutcome) {
        debug!(?outcome, "metadata outcome, application no longer busy");
        self.app.on_bind_region_settled();
    }
}
