//! In-memory test harness for the tricolumn shell.
//!
//! Recording implementations of the collaborator traits and a
//! [`World`] that wires them to a [`tricolumn_app::Shell`], so scenarios can
//! drive the shell through router matches, binding signals and list loads
//! without a UI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod list;
pub mod memory;
pub mod world;

pub use list::MemoryList;
pub use memory::{MemoryModel, MemoryRouter, RecordingNotifier, StaticBundle};
pub use world::World;
