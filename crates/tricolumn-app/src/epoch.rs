//! Bind generations shared with spawned tasks.
//!
//! The layout machine owns the authoritative generation of every bound
//! region. Bind and selection tasks run detached from it, so the shell
//! publishes each generation here and the tasks check their ticket before
//! acting.

use std::sync::atomic::{AtomicU64, Ordering};

use tricolumn_core::{BindTicket, LayoutMachine, Region};

#[derive(Debug, Default)]
pub(crate) struct BindEpochs {
    detail: AtomicU64,
    product: AtomicU64,
}

impl BindEpochs {
    /// Copy the layout's current generations.
    pub(crate) fn publish(&self, layout: &LayoutMachine) {
        self.detail.store(layout.generation(Region::Detail), Ordering::Release);
        self.product.store(layout.generation(Region::Product), Ordering::Release);
    }

    /// Whether `ticket` still belongs to the latest published bind.
    pub(crate) fn is_current(&self, ticket: BindTicket) -> bool {
        let latest = match ticket.region {
            Region::Detail => &self.detail,
            Region::Product => &self.product,
            _ => return false,
        };
        latest.load(Ordering::Acquire) == ticket.generation
    }
}
