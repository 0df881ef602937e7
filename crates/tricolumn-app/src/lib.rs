//! Application layer for the tricolumn shell
//!
//! Asynchronous coordination on top of the pure state machines in
//! `tricolumn-core`: deferred signals, the list selection coordinator and
//! the [`Shell`] runtime that executes layout actions against the
//! collaborators of the surrounding application.
//!
//! # Components
//!
//! - [`deferred`]: Two-phase signals with separate producer and consumer handles
//! - [`ListSelector`]: Selection requests that wait for the list's first data
//! - [`Router`], [`ModelAccessor`], [`BundleAccessor`], [`Notifier`]: Collaborator traits
//! - [`Shell`]: Event-driven runtime wiring layout, busy state and notifications

pub mod deferred;

mod config;
mod driver;
mod epoch;
mod error;
mod event;
mod selector;
mod shell;

pub use config::{EntityKey, ShellConfig};
pub use driver::{BindRequest, BundleAccessor, ModelAccessor, Notifier, Router, ShellContext};
pub use error::{KeyError, MetadataFailure, ShellError, SignalError};
pub use event::{BindingEvent, ShellEvent};
pub use selector::{
    DataReceivedCallback, ListRegistrar, ListSelector, SelectableList, SelectionOutcome,
};
pub use shell::{BindOutcome, Shell, ShellSnapshot, Titles};
