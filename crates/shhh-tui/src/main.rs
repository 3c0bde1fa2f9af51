//! Shhh terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Local development backend
//! shhh
//!
//! # Remote backend, pre-filled fields, logs to a file
//! shhh --server https://chat.example.com --username alice --room R1 --log-file shhh.log
//! ```

use std::{fs::File, sync::Arc, time::Duration};

use clap::Parser;
use shhh_client::{
    Session, SessionConfig,
    transport::{RoomApi, SystemEnv},
};
use shhh_core::{BackendConfig, DEFAULT_BACKEND_URL};
use shhh_tui::{Runtime, TerminalDriver, spawn_health_check};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Timeout for HTTP calls to the backend.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shhh terminal chat client
#[derive(Parser, Debug)]
#[command(name = "shhh")]
#[command(about = "Terminal client for Shhh chat rooms")]
#[command(version)]
struct Args {
    /// Backend base URL (`http` or `https`)
    #[arg(short, long, default_value = DEFAULT_BACKEND_URL)]
    server: String,

    /// Quiet period before a typed message is sent, in milliseconds
    #[arg(long, default_value = "300")]
    debounce_ms: u64,

    /// Initial username
    #[arg(short, long)]
    username: Option<String>,

    /// Initial room ID
    #[arg(short, long)]
    room: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file. The terminal is owned by the UI, so logs are
    /// off unless a file is given.
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let file = Arc::new(File::create(path)?);
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_ansi(false))
            .with(filter)
            .init();
    }

    let backend = BackendConfig::new(args.server);
    let api = RoomApi::with_timeout(HTTP_TIMEOUT)?;

    tracing::info!(server = %backend.base_url(), "Shhh client starting");
    let _health = spawn_health_check(&api, &backend);

    let config = SessionConfig { backend, debounce_delay: Duration::from_millis(args.debounce_ms) };
    let mut session = Session::new(SystemEnv::new(), config);
    if let Some(room_id) = args.room {
        session.set_room_id(room_id);
    }
    if let Some(username) = args.username {
        session.set_username(username);
    }

    let driver = TerminalDriver::new(api)?;
    Runtime::new(driver, session).run().await?;

    Ok(())
}
