//! Request dispatcher: CLI command + tokens → one or more JSON-RPC calls.
//!
//! ## Flow
//!
//! 1. Look up the [`CommandDescriptor`]; unknown names fail before any I/O.
//! 2. For repeatable commands (`up`, `down`, `left`, `right`) strip a
//!    trailing repeat count from the tokens.
//! 3. Build the params and serialize the request once.
//! 4. Send the identical payload `repeat` times, strictly one after the
//!    other so Kodi sees the key presses in order. The first failure aborts
//!    the remaining repeats.

use tracing::{debug, info};

use crate::client::{ClientError, KodiClient};
use crate::commands::{CommandDescriptor, CommandRegistry};
use crate::params;
use crate::rpc::RequestEnvelope;

/// A fully built request, ready to be sent.
#[derive(Debug)]
pub struct PreparedRequest {
    pub command: &'static CommandDescriptor,
    /// Serialized JSON-RPC request body.
    pub payload: String,
    /// How many times the payload is sent.
    pub repeat: u32,
}

/// Translates CLI commands into requests and sends them through a [`KodiClient`].
pub struct Dispatcher<'a> {
    registry: &'a CommandRegistry,
    client: &'a KodiClient,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a CommandRegistry, client: &'a KodiClient) -> Self {
        Self { registry, client }
    }

    /// Resolve, validate and serialize without touching the network.
    pub fn prepare(
        &self,
        action: &str,
        mut tokens: Vec<String>,
    ) -> Result<PreparedRequest, CommandError> {
        let command = self
            .registry
            .lookup(action)
            .ok_or_else(|| CommandError::UnknownCommand(action.to_string()))?;

        let repeat = if command.repeatable {
            params::split_repeat_count(&mut tokens)
        } else {
            1
        };

        let params = command
            .build_params(&tokens)
            .map_err(CommandError::InvalidParameters)?;
        let payload = RequestEnvelope::new(command.method, params)
            .to_json()
            .map_err(|e| CommandError::InvalidParameters(format!("Failed to encode request: {e}")))?;

        Ok(PreparedRequest {
            command,
            payload,
            repeat,
        })
    }

    /// Prepare and send. Returns the number of requests Kodi accepted.
    pub async fn execute(&self, action: &str, tokens: Vec<String>) -> Result<u32, CommandError> {
        let prepared = self.prepare(action, tokens)?;
        debug!(
            command = prepared.command.name,
            method = prepared.command.method,
            repeat = prepared.repeat,
            "dispatching"
        );

        for completed in 0..prepared.repeat {
            if let Err(source) = self.client.send(&prepared.payload).await {
                return Err(CommandError::Request {
                    source,
                    completed,
                    repeat: prepared.repeat,
                });
            }
        }

        info!(
            method = prepared.command.method,
            sent = prepared.repeat,
            "command sent to {}",
            self.client.endpoint()
        );
        Ok(prepared.repeat)
    }
}

/// Everything that can stop a command from reaching Kodi.
#[derive(Debug)]
pub enum CommandError {
    /// No command with this CLI name.
    UnknownCommand(String),
    /// The tokens did not fit the command's parameters.
    InvalidParameters(String),
    /// Transport, protocol or remote failure on request `completed + 1`.
    Request {
        source: ClientError,
        completed: u32,
        repeat: u32,
    },
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => write!(f, "The command {} is unknown.", name),
            CommandError::InvalidParameters(msg) => f.write_str(msg),
            CommandError::Request {
                source,
                completed,
                repeat,
            } => {
                write!(f, "{}", source)?;
                if *repeat > 1 {
                    write!(
                        f,
                        " (stopped after {} of {} repeats succeeded)",
                        completed, repeat
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}
