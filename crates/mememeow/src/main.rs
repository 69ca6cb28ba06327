//! Binary entrypoint for the MemeMeow command-line client.
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use meow_engine::AppController;
use meow_gateway::{Gateway, MrpcBackend};
use meow_protocol::ipc::ui_channel;
use tracing::{debug, error};

/// Subcommand implementations.
mod commands;
/// Rendering of UI messages on the terminal.
mod output;

#[derive(Parser, Debug)]
#[command(name = "mememeow", about = "Search memes and manage MemeMeow settings", version)]
/// Command-line interface for the `mememeow` binary.
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend socket path (overrides the config file)
    #[arg(long)]
    socket: Option<String>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,

    /// Optional path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the configuration, print it, then exit.
    Check,

    /// Search memes by keyword.
    Search {
        /// Keyword to search for
        keyword: String,

        /// Copy the N-th result (1-9) to the clipboard
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
        pick: Option<u8>,
    },

    /// Show the stored preferences.
    Prefs,

    /// Edit preferences and save them.
    Save {
        /// Copy selected memes to the clipboard
        #[arg(long)]
        copy_to_clipboard: Option<bool>,

        /// New app toggle shortcut, e.g. "ctrl+shift+v"
        #[arg(long, conflicts_with = "reset_shortcut")]
        shortcut: Option<String>,

        /// Restore the default app toggle shortcut (ctrl+alt+v)
        #[arg(long)]
        reset_shortcut: bool,
    },

    /// Community meme packs.
    #[command(subcommand)]
    Community(CommunityCmd),

    /// Backend API endpoints.
    #[command(subcommand)]
    Api(ApiCmd),
}

#[derive(Subcommand, Debug)]
/// `community` subcommands.
enum CommunityCmd {
    /// List packs, optionally filtered.
    List {
        /// Match against name, author, description and tags
        query: Option<String>,
    },
    /// Enable a pack.
    Enable {
        /// Pack uuid
        uuid: String,
    },
    /// Disable a pack.
    Disable {
        /// Pack uuid
        uuid: String,
    },
    /// Download a fresh manifest.
    Refresh,
}

#[derive(Subcommand, Debug)]
/// `api` subcommands.
enum ApiCmd {
    /// List endpoints.
    List,
    /// Add an endpoint.
    Add {
        /// Display name
        name: String,
        /// Base url (http or https)
        url: String,
    },
    /// Remove the endpoint at INDEX.
    Remove {
        /// Position in the list
        index: usize,
    },
    /// Switch to the endpoint at INDEX.
    Use {
        /// Position in the list
        index: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let cfg = match config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.pretty());
            return ExitCode::FAILURE;
        }
    };

    if let Command::Check = cli.command {
        println!("{cfg:#?}");
        return ExitCode::SUCCESS;
    }

    let socket = cli.socket.clone().unwrap_or_else(|| cfg.backend.socket.clone());
    let (backend, events) = match MrpcBackend::connect_with_retries(&socket).await {
        Ok(pair) => pair,
        Err(e) => {
            error!(socket = %socket, error = %e, "backend_connect_failed");
            eprintln!("fatal: cannot reach the MemeMeow backend at {socket}: {e}");
            return ExitCode::FAILURE;
        }
    };
    debug!(socket = %socket, "backend_connected");

    let (tx, mut rx) = ui_channel();
    let app = AppController::new(Gateway::new(Arc::new(backend)), &cfg, tx);
    let events_app = app.clone();
    tokio::spawn(async move { events_app.run_events(events).await });

    // Every failed command exits 1. Errors the controllers already showed are
    // not reported a second time.
    let code = match commands::run(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let shown = output::drain(&mut rx);
            if output::needs_report(&e, shown) {
                app.report(&e);
            }
            ExitCode::FAILURE
        }
    };
    output::drain(&mut rx);
    code
}
