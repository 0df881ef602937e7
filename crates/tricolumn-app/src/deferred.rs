//! Two-phase deferred signals.
//!
//! A deferred value is created as a pair: the [`Resolver`] is the producer
//! side and can resolve exactly once (it is consumed by
//! [`Resolver::resolve`]); the [`Signal`] is the consumer side, cheap to
//! clone, and can be awaited any number of times before or after the value
//! arrives.
//!
//! Built on [`tokio::sync::watch`], so it needs no runtime of its own and
//! works on a single-threaded executor.

use tokio::sync::watch;

use crate::error::SignalError;

/// Create a linked producer/consumer pair.
pub fn deferred<T: Clone>() -> (Resolver<T>, Signal<T>) {
    let (tx, rx) = watch::channel(None);
    (Resolver { tx }, Signal { rx })
}

/// Producer side of a deferred value.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T> Resolver<T> {
    /// Resolve the signal, waking every waiter.
    pub fn resolve(self, value: T) {
        self.tx.send_replace(Some(value));
    }
}

/// Consumer side of a deferred value.
#[derive(Debug, Clone)]
pub struct Signal<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> Signal<T> {
    /// Wait for the value.
    ///
    /// Returns immediately if it has already been resolved, even if the
    /// resolver has been dropped since.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Abandoned`] if the resolver was dropped without
    /// resolving.
    pub async fn wait(&self) -> Result<T, SignalError> {
        let mut rx = self.rx.clone();
        let value = rx.wait_for(Option::is_some).await.map_err(|_| SignalError::Abandoned)?;
        value.clone().ok_or(SignalError::Abandoned)
    }

    /// The value, if already resolved.
    pub fn peek(&self) -> Option<T> {
        self.rx.borrow().clone()
    }
}
