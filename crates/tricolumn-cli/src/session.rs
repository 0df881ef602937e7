//! Script session
//!
//! A [`Session`] owns a harness world and executes parsed commands against
//! it, writing selection outcomes and shell snapshots to its output.

use std::{fmt::Write as _, io::Write, path::Path, time::Duration};

use clap::ValueEnum;
use tracing::{debug, warn};
use tricolumn_app::{MetadataFailure, SelectionOutcome, ShellConfig, ShellEvent, ShellSnapshot};
use tricolumn_core::Region;
use tricolumn_harness::World;

use crate::{
    commands::{Command, parse},
    error::CliError,
};

/// How snapshots and outcomes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON document per line.
    Json,
}

/// Whether to keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop.
    Quit,
}

/// Read a JSON shell configuration.
pub async fn load_config(path: &Path) -> Result<ShellConfig, CliError> {
    let text = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&text)
        .map_err(|source| CliError::Config { path: path.to_path_buf(), source })
}

/// Executes commands against a seeded world.
pub struct Session<W> {
    world: World,
    out: W,
    format: OutputFormat,
    seeded_keys: Vec<String>,
    settle_timeout: Duration,
}

impl<W: Write> Session<W> {
    /// Session whose catalog holds objects and products `1..=items`.
    pub fn new(config: ShellConfig, items: usize, format: OutputFormat, out: W) -> Self {
        let objects = config.object_key.entity_set.clone();
        let products = config.product_key.entity_set.clone();
        let world = World::with_config(config);

        let seeded_keys: Vec<String> = (1..=items).map(|id| id.to_string()).collect();
        for key in &seeded_keys {
            world.model().insert(format!("/{objects}({key})"), key.clone());
            world.model().insert(format!("/{products}({key})"), key.clone());
        }
        debug!(items, "catalog seeded");

        Self { world, out, format, seeded_keys, settle_timeout: Duration::from_secs(1) }
    }

    /// How long `/settle` waits for pending selections.
    #[must_use]
    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// The world commands run against.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Consume the session, returning its output.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Parse and execute one input line.
    pub async fn run_line(&mut self, line: &str) -> Result<Flow, CliError> {
        self.execute(parse(line)).await
    }

    /// Execute one command.
    pub async fn execute(&mut self, command: Command) -> Result<Flow, CliError> {
        match command {
            Command::OpenList => self.world.open_list().await?,
            Command::OpenObject { object_id } => self.world.open_object(&object_id).await?,
            Command::OpenProduct { object_id, product_id } => {
                self.world.open_product(&object_id, &product_id).await?;
            },
            Command::Bypass => self.world.bypass().await?,
            Command::NotFoundDisplayed => self.world.send(ShellEvent::NotFoundDisplayed).await?,
            Command::ToggleFullScreen => self.world.send(ShellEvent::ToggleFullScreen).await?,
            Command::Close => self.world.send(ShellEvent::CloseDetail).await?,
            Command::Register => {
                if !self.world.register_list() {
                    warn!("list already registered");
                }
            },
            Command::Load { keys } => {
                let keys = keys.unwrap_or_else(|| self.seeded_keys.clone());
                self.world.list().deliver(&keys);
            },
            Command::LoadFailed => self.world.list().fail(),
            Command::Tap { key } => {
                if !self.world.tap_list(&key).await? {
                    warn!(key, "no list entry with key");
                }
            },
            Command::Deselect { key } => {
                self.world.send(ShellEvent::ListSelectionChanged { key, selected: false }).await?;
            },
            Command::Press { object_id, product_id } => {
                self.world.press_line_item(&object_id, &product_id).await?;
            },
            Command::Back => self.world.send(ShellEvent::NavBack).await?,
            Command::History { has_previous_entry } => {
                self.world.router().set_history(has_previous_entry);
            },
            Command::Bind => {
                if !self.world.complete_last_bind().await? {
                    warn!("nothing bound yet");
                }
            },
            Command::Update { region, total } => {
                self.world.send(ShellEvent::UpdateFinished { region, total: Some(total) }).await?;
            },
            Command::MetadataLoaded => self.world.send(ShellEvent::MetadataLoaded).await?,
            Command::MetadataFailed { response } => {
                self.world.model().fail_metadata(response.clone());
                self.world.send(ShellEvent::MetadataFailed(MetadataFailure { response })).await?;
            },
            Command::Fail { status_code, body } => {
                self.world.fail_request(status_code, &body).await?;
            },
            Command::Dismiss => {
                if !self.world.dismiss_notification().await? {
                    debug!("no notification open");
                }
            },
            Command::Settle => self.settle().await?,
            Command::Show => self.show()?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Nothing => {},
            Command::Unknown { input } => return Err(CliError::UnknownCommand(input)),
            Command::InvalidArgs { command, error } => {
                return Err(CliError::InvalidArgs { command, error });
            },
        }
        Ok(Flow::Continue)
    }

    async fn settle(&mut self) -> Result<(), CliError> {
        let Ok(outcomes) = tokio::time::timeout(self.settle_timeout, self.world.settle()).await
        else {
            warn!(
                binds = self.world.shell().pending_binds(),
                selections = self.world.shell().pending_selections(),
                "binds or selection requests still waiting"
            );
            return Ok(());
        };

        match self.format {
            OutputFormat::Text => {
                for outcome in &outcomes {
                    writeln!(self.out, "selection: {}", describe_outcome(*outcome))?;
                }
            },
            OutputFormat::Json => {
                writeln!(self.out, "{}", serde_json::to_string(&outcomes)?)?;
            },
        }
        Ok(())
    }

    fn show(&mut self) -> Result<(), CliError> {
        let snapshot = self.world.shell().snapshot();
        match self.format {
            OutputFormat::Text => write!(self.out, "{}", render_text(&snapshot))?,
            OutputFormat::Json => writeln!(self.out, "{}", serde_json::to_string(&snapshot)?)?,
        }
        Ok(())
    }
}

fn describe_outcome(outcome: SelectionOutcome) -> String {
    match outcome {
        SelectionOutcome::Selected { index } => format!("selected entry {index}"),
        SelectionOutcome::AlreadySelected => "already selected".into(),
        SelectionOutcome::SelectionDisabled => "selection disabled".into(),
        SelectionOutcome::NoMatch => "no matching entry".into(),
        SelectionOutcome::Unavailable => "list unavailable".into(),
        SelectionOutcome::Cleared => "cleared".into(),
        SelectionOutcome::Superseded => "superseded".into(),
    }
}

/// Render a snapshot as human readable lines.
pub fn render_text(snapshot: &ShellSnapshot) -> String {
    let layout = &snapshot.layout;
    let mut text = format!(
        "layout: {:?} (full screen: {}, previous: {:?})\n",
        layout.layout(),
        layout.is_full_screen(),
        layout.previous_layout()
    );

    text.push_str("busy:");
    for region in Region::ALL {
        let indicator = snapshot.busy.region(region);
        let _ = write!(
            text,
            " {region:?}={}/{}ms",
            indicator.is_busy(),
            indicator.delay().as_millis()
        );
    }
    text.push('\n');

    let _ = writeln!(text, "list: {:?}", snapshot.list_readiness);
    let _ = writeln!(text, "titles: {} | {}", snapshot.titles.list, snapshot.titles.line_items);
    match &snapshot.notification {
        Some(notification) => {
            let _ = writeln!(
                text,
                "notification #{}: {} {:?}",
                notification.id, notification.message, notification.details
            );
        },
        None => text.push_str("notification: none\n"),
    }
    text
}
