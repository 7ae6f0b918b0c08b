//! # krm
//!
//! Command-line remote control for Kodi. Translates short commands such as
//! `krm pause`, `krm seek 01:02:03` or `krm down 3` into JSON-RPC 2.0 calls
//! against Kodi's HTTP control API.
//!
//! ## Architecture
//!
//! ```text
//! main.rs      — entry point, CLI parsing, logging, config persistence
//! config.rs    — TOML config file / env-var configuration loading
//! commands.rs  — static command registry (CLI name → remote method)
//! params.rs    — parameter builders (seek time parsing, repeat counts)
//! rpc.rs       — JSON-RPC request/response envelopes and error messages
//! client.rs    — HTTP client for the /jsonrpc endpoint
//! dispatch.rs  — lookup, validation, serialization and (repeated) sending
//! help.rs      — usage and per-command help text
//! ```

mod client;
mod commands;
mod config;
mod dispatch;
mod help;
mod params;
mod rpc;

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use client::KodiClient;
use commands::CommandRegistry;
use config::Config;
use dispatch::Dispatcher;

const PROGRAM: &str = env!("CARGO_BIN_NAME");

/// Remote control for Kodi over its JSON-RPC HTTP API.
#[derive(Parser)]
#[command(name = "krm", version, disable_help_subcommand = true)]
struct Cli {
    /// Path to TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Kodi host name or address. Saved to the config file.
    #[arg(long)]
    host: Option<String>,
    /// Kodi web server port. Saved to the config file.
    #[arg(long)]
    port: Option<u16>,
    /// Command followed by its parameters (see `help`).
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

impl Cli {
    /// Move `--host=`/`--port=` tokens that follow the command into the
    /// flags, so `krm down 3 --port=9090` configures instead of dispatching.
    fn hoist_connection_flags(&mut self) -> Result<(), String> {
        let mut rest = Vec::with_capacity(self.args.len());
        for arg in std::mem::take(&mut self.args) {
            if let Some(host) = arg.strip_prefix("--host=") {
                self.host = Some(host.to_string());
            } else if let Some(port) = arg.strip_prefix("--port=") {
                let port = port
                    .parse::<u16>()
                    .map_err(|e| format!("invalid value '{}' for '--port': {}", port, e))?;
                self.port = Some(port);
            } else {
                rest.push(arg);
            }
        }
        self.args = rest;
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut cli = Cli::parse();
    if let Err(e) = cli.hoist_connection_flags() {
        eprintln!("{PROGRAM}: {}", e);
        std::process::exit(2);
    }
    let config_path = cli.config.clone().or_else(config::default_path);

    // File values only; env overrides must not end up in a saved config.
    let mut config = match Config::load_file(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{PROGRAM}: configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .init();

    let registry = CommandRegistry::new();

    if cli.host.is_some() || cli.port.is_some() {
        if let Err(e) = save_connection(&mut config, config_path, cli.host, cli.port) {
            eprintln!("{PROGRAM}: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let Some((action, params)) = cli.args.split_first() else {
        print!("{}", help::usage(PROGRAM, &registry));
        return;
    };

    if action == "help" {
        match params.first() {
            Some(name) => print!("{}", help::lookup(name, &registry)),
            None => print!("{}", help::general(PROGRAM, &registry)),
        }
        return;
    }

    let config = match config.with_env_overrides() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{PROGRAM}: configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if config.server.host.is_empty() {
        eprintln!(
            "No host configured. Please see \"help\" to learn about how to configure the remote."
        );
        std::process::exit(1);
    }

    let client = match KodiClient::new(&config.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{PROGRAM}: {}", e);
            std::process::exit(1);
        }
    };

    debug!(endpoint = client.endpoint(), action = %action, "executing");
    let dispatcher = Dispatcher::new(&registry, &client);
    if let Err(e) = dispatcher.execute(action, params.to_vec()).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Apply `--host` / `--port` and persist the result.
fn save_connection(
    config: &mut Config,
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), String> {
    let path = path.ok_or("Could not determine a config directory; pass --config <path>")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.save(&path)?;
    info!(host = %config.server.host, port = config.server.port, "configuration saved");
    println!(
        "Saved {} as {} to {}",
        PROGRAM,
        config.server.endpoint(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("krm").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_and_params() {
        let cli = parse(&["seek", "01:02:03"]);
        assert_eq!(cli.args, ["seek", "01:02:03"]);
        assert!(cli.host.is_none());
    }

    #[test]
    fn hyphen_params_are_kept() {
        assert_eq!(parse(&["seek", "-"]).args, ["seek", "-"]);
        assert_eq!(parse(&["seek", "--"]).args, ["seek", "--"]);
    }

    #[test]
    fn connection_flags() {
        let cli = parse(&["--host=kodi.local", "--port=8081"]);
        assert_eq!(cli.host.as_deref(), Some("kodi.local"));
        assert_eq!(cli.port, Some(8081));
        assert!(cli.args.is_empty());
    }

    #[test]
    fn connection_flags_after_command() {
        let mut cli = parse(&["down", "3", "--port=9090", "--host=kodi.local"]);
        cli.hoist_connection_flags().unwrap();
        assert_eq!(cli.host.as_deref(), Some("kodi.local"));
        assert_eq!(cli.port, Some(9090));
        assert_eq!(cli.args, ["down", "3"]);
    }

    #[test]
    fn hoisting_keeps_seek_steps() {
        let mut cli = parse(&["seek", "--"]);
        cli.hoist_connection_flags().unwrap();
        assert!(cli.host.is_none() && cli.port.is_none());
        assert_eq!(cli.args, ["seek", "--"]);
    }

    #[test]
    fn hoisted_port_must_be_numeric() {
        let mut cli = parse(&["pause", "--port=http"]);
        let err = cli.hoist_connection_flags().unwrap_err();
        assert!(err.contains("'http'"));
    }

    #[test]
    fn env_host_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kodiremote.toml");
        std::fs::write(&path, "[server]\nhost = \"living-room\"\n").unwrap();

        std::env::set_var("KODI_HOST", "temporary-host");
        let mut config = Config::load_file(Some(&path)).unwrap();
        let effective = config.clone().with_env_overrides();
        std::env::remove_var("KODI_HOST");
        assert_eq!(effective.unwrap().server.host, "temporary-host");

        save_connection(&mut config, Some(path.clone()), None, Some(9090)).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("host = \"living-room\""), "{saved}");
        assert!(saved.contains("port = 9090"));
        assert!(!saved.contains("temporary-host"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["krm", "--port=http"]).is_err());
    }

    #[test]
    fn save_connection_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kodiremote.toml");
        let mut config = Config::default();

        save_connection(
            &mut config,
            Some(path.clone()),
            Some("10.0.0.2".into()),
            None,
        )
        .unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("host = \"10.0.0.2\""));
        assert!(saved.contains("port = 8080"));
    }
}
