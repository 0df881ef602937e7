//! Command parsing for scripts and interactive input.
//!
//! This module parses command strings into structured [`Command`] values.

use tricolumn_core::Region;

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The router matches the list route.
    OpenList,

    /// The router matches the object route.
    OpenObject {
        /// Object identifier.
        object_id: String,
    },

    /// The router matches the product route.
    OpenProduct {
        /// Owning object identifier.
        object_id: String,
        /// Product identifier.
        product_id: String,
    },

    /// No route matches.
    Bypass,

    /// The router finished displaying the "not found" page.
    NotFoundDisplayed,

    /// Toggle full screen.
    ToggleFullScreen,

    /// Close the detail column.
    Close,

    /// Register the list with the selector.
    Register,

    /// The list's data arrives.
    Load {
        /// Entry keys; `None` delivers the seeded keys.
        keys: Option<Vec<String>>,
    },

    /// The list's data request fails.
    LoadFailed,

    /// The user taps a list entry.
    Tap {
        /// Key of the entry.
        key: String,
    },

    /// The user deselects a list entry.
    Deselect {
        /// Key of the entry.
        key: String,
    },

    /// The user presses a line item of the object detail.
    Press {
        /// Owning object identifier.
        object_id: String,
        /// Product identifier.
        product_id: String,
    },

    /// The user navigates back from the product.
    Back,

    /// Whether the router has a previous history entry.
    History {
        /// Previous entry present.
        has_previous_entry: bool,
    },

    /// The data source answers the latest bind.
    Bind,

    /// A table finished updating.
    Update {
        /// List or line items.
        region: Region,
        /// New total count.
        total: usize,
    },

    /// Service metadata loaded.
    MetadataLoaded,

    /// Service metadata failed.
    MetadataFailed {
        /// Error text.
        response: String,
    },

    /// A data request fails.
    Fail {
        /// HTTP status code.
        status_code: u16,
        /// Response body.
        body: String,
    },

    /// The user dismisses the error notification.
    Dismiss,

    /// Wait for pending selection requests.
    Settle,

    /// Print the shell state.
    Show,

    /// Quit.
    Quit,

    /// Blank line or comment.
    Nothing,

    /// Unknown or invalid command.
    Unknown {
        /// The original input.
        input: String,
    },

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

/// Parse a line of input into a command.
///
/// Commands start with `/`; lines starting with `#` are comments.
pub fn parse(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() || input.starts_with('#') {
        return Command::Nothing;
    }

    let Some(cmd_str) = input.strip_prefix('/') else {
        return Command::Unknown { input: input.to_string() };
    };

    let parts: Vec<&str> = cmd_str.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");
    let tail = |from: usize| parts.get(from..).map(|rest| rest.join(" ")).unwrap_or_default();

    match command {
        "list" => Command::OpenList,

        "object" => match parts.get(1) {
            Some(id) => Command::OpenObject { object_id: (*id).to_string() },
            None => invalid("object", "Usage: /object <object_id>"),
        },

        "product" => match (parts.get(1), parts.get(2)) {
            (Some(object_id), Some(product_id)) => Command::OpenProduct {
                object_id: (*object_id).to_string(),
                product_id: (*product_id).to_string(),
            },
            _ => invalid("product", "Usage: /product <object_id> <product_id>"),
        },

        "bypass" => Command::Bypass,

        "notfound" => Command::NotFoundDisplayed,

        "fullscreen" | "fs" => Command::ToggleFullScreen,

        "close" => Command::Close,

        "register" => Command::Register,

        "load" => {
            let keys: Vec<String> = parts.iter().skip(1).map(ToString::to_string).collect();
            Command::Load { keys: (!keys.is_empty()).then_some(keys) }
        },

        "loadfail" => Command::LoadFailed,

        "tap" => match parts.get(1) {
            Some(key) => Command::Tap { key: (*key).to_string() },
            None => invalid("tap", "Usage: /tap <key>"),
        },

        "deselect" => match parts.get(1) {
            Some(key) => Command::Deselect { key: (*key).to_string() },
            None => invalid("deselect", "Usage: /deselect <key>"),
        },

        "press" => match (parts.get(1), parts.get(2)) {
            (Some(object_id), Some(product_id)) => Command::Press {
                object_id: (*object_id).to_string(),
                product_id: (*product_id).to_string(),
            },
            _ => invalid("press", "Usage: /press <object_id> <product_id>"),
        },

        "back" => Command::Back,

        "history" => match parts.get(1).copied() {
            Some("on") => Command::History { has_previous_entry: true },
            Some("off") => Command::History { has_previous_entry: false },
            _ => invalid("history", "Usage: /history <on|off>"),
        },

        "bind" => Command::Bind,

        "update" => {
            let region = match parts.get(1).copied() {
                Some("list") => Region::List,
                Some("items") => Region::LineItems,
                _ => return invalid("update", "Usage: /update <list|items> <total>"),
            };
            match parts.get(2).map(|total| total.parse::<usize>()) {
                Some(Ok(total)) => Command::Update { region, total },
                Some(Err(_)) => invalid("update", "Invalid total"),
                None => invalid("update", "Usage: /update <list|items> <total>"),
            }
        },

        "metadata" => match parts.get(1).copied() {
            Some("ok") => Command::MetadataLoaded,
            Some("fail") => Command::MetadataFailed { response: tail(2) },
            _ => invalid("metadata", "Usage: /metadata <ok|fail> [response]"),
        },

        "fail" => match parts.get(1).map(|status| status.parse::<u16>()) {
            Some(Ok(status_code)) => Command::Fail { status_code, body: tail(2) },
            Some(Err(_)) => invalid("fail", "Invalid status code"),
            None => invalid("fail", "Usage: /fail <status> [body]"),
        },

        "dismiss" => Command::Dismiss,

        "settle" => Command::Settle,

        "show" => Command::Show,

        "quit" | "q" => Command::Quit,

        _ => Command::Unknown { input: input.to_string() },
    }
}

fn invalid(command: &str, error: &str) -> Command {
    Command::InvalidArgs { command: command.into(), error: error.into() }
}
