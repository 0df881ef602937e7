//! Tricolumn shell driver binary.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tricolumn_app::ShellConfig;
use tricolumn_cli::{CliError, Flow, OutputFormat, Session, load_config};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to run; reads standard input when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// JSON shell configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of objects and products to seed
    #[arg(long, default_value_t = 5)]
    items: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// How long /settle waits for pending selections, in milliseconds
    #[arg(long, default_value_t = 1000)]
    settle_timeout_ms: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_filter: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "tricolumn failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path).await?,
        None => ShellConfig::default(),
    };
    info!(?config, "starting shell");

    let mut session = Session::new(config, args.items, args.format, std::io::stdout())
        .with_settle_timeout(Duration::from_millis(args.settle_timeout_ms));

    let input: Box<dyn AsyncRead + Unpin> = match &args.script {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };
    let mut lines = BufReader::new(input).lines();

    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match session.run_line(&line).await {
            Ok(Flow::Continue) => {},
            Ok(Flow::Quit) => break,
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => warn!(line = line_no, %error, "command rejected"),
        }
    }

    Ok(())
}
