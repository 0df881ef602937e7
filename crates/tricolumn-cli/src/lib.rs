//! Scripted driver for the tricolumn shell.
//!
//! Reads commands line by line, plays the router, data source and list
//! against an in-memory world, and prints selection outcomes and shell
//! snapshots.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---|---|
//! | `/list`, `/object <id>`, `/product <id> <pid>`, `/bypass` | Router matches |
//! | `/notfound` | The "not found" page finished displaying |
//! | `/fullscreen`, `/close` | Detail column gestures |
//! | `/register`, `/load [keys..]`, `/loadfail` | List lifecycle |
//! | `/tap <key>`, `/deselect <key>`, `/press <id> <pid>`, `/back` | User navigation |
//! | `/history on`, `/history off` | Whether the router can go back |
//! | `/bind` | Answer the latest bind |
//! | `/update list <n>`, `/update items <n>` | Table update with a new count |
//! | `/metadata ok`, `/metadata fail [text]` | Metadata outcome |
//! | `/fail <status> [body]`, `/dismiss` | Request failures |
//! | `/settle`, `/show`, `/quit` | Output and control |

pub mod commands;
mod error;
mod session;

pub use commands::{Command, parse};
pub use error::CliError;
pub use session::{Flow, OutputFormat, Session, load_config, render_text};
