//! Command registry: CLI command name → Kodi JSON-RPC method.
//!
//! The table is static and built once at startup by [`CommandRegistry::new`].
//! Each [`CommandDescriptor`] carries its remote method, help text, and the
//! [`ParamBuilder`] that turns raw CLI tokens into the request `params`.
//!
//! | CLI name                 | Remote method            |
//! |--------------------------|--------------------------|
//! | `play`, `pause`          | `Player.PlayPause`       |
//! | `stop`                   | `Player.Stop`            |
//! | `mute`                   | `Application.SetMute`    |
//! | `seek`                   | `Player.Seek`            |
//! | `speed`                  | `Player.Speed`           |
//! | `action`                 | `Input.Select`           |
//! | `context`                | `Input.ContextMenu`      |
//! | `info`                   | `Input.Info`             |
//! | `home`                   | `Input.Home`             |
//! | `back`                   | `Input.Back`             |
//! | `left` `right` `up` `down` | `Input.Left` … (repeatable) |
//! | `notify`                 | `GUI.ShowNotification`   |
//! | `clean`                  | `VideoLibrary.Clean`     |
//! | `update`                 | `VideoLibrary.Scan`      |

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::params::{self, Params, PLAYER_ID};

/// A constant JSON value usable in a static table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(&'static str),
}

impl Literal {
    fn to_value(self) -> Value {
        match self {
            Literal::Int(n) => json!(n),
            Literal::Str(s) => json!(s),
        }
    }
}

/// How a command builds its `params` object from CLI tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamBuilder {
    /// No params; tokens are ignored.
    Empty,
    /// A fixed map; tokens are ignored.
    Fixed(&'static [(&'static str, Literal)]),
    /// `Player.Seek` time or step parsing.
    Seek,
    /// A fixed map plus `key` set to the first token, unvalidated.
    PassThrough {
        fixed: &'static [(&'static str, Literal)],
        key: &'static str,
    },
}

impl ParamBuilder {
    pub fn build(self, tokens: &[String]) -> Result<Params, String> {
        match self {
            ParamBuilder::Empty => Ok(Params::new()),
            ParamBuilder::Fixed(fixed) => Ok(fixed_map(fixed)),
            ParamBuilder::Seek => params::seek(tokens),
            ParamBuilder::PassThrough { fixed, key } => {
                let first = tokens.first().ok_or_else(|| {
                    "Not enough parameters. See \"help <command>\" for usage information."
                        .to_string()
                })?;
                let mut map = fixed_map(fixed);
                map.insert(key.to_string(), json!(first));
                Ok(map)
            }
        }
    }
}

fn fixed_map(fixed: &[(&str, Literal)]) -> Params {
    fixed
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_value()))
        .collect()
}

/// Static description of one CLI command.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub method: &'static str,
    pub description: &'static str,
    /// Parameter name → documentation, in display order.
    pub params: &'static [(&'static str, &'static str)],
    pub builder: ParamBuilder,
    /// Whether a trailing integer token repeats the request.
    pub repeatable: bool,
}

impl CommandDescriptor {
    pub fn build_params(&self, tokens: &[String]) -> Result<Params, String> {
        self.builder.build(tokens)
    }
}

const PLAYER: &[(&str, Literal)] = &[("playerid", Literal::Int(PLAYER_ID))];

const fn simple(
    name: &'static str,
    method: &'static str,
    description: &'static str,
) -> CommandDescriptor {
    CommandDescriptor {
        name,
        method,
        description,
        params: &[],
        builder: ParamBuilder::Empty,
        repeatable: false,
    }
}

const fn cursor(
    name: &'static str,
    method: &'static str,
    description: &'static str,
) -> CommandDescriptor {
    CommandDescriptor {
        name,
        method,
        description,
        params: &[("n", "(optional) How often the cursor is moved.")],
        builder: ParamBuilder::Empty,
        repeatable: true,
    }
}

static COMMANDS: &[CommandDescriptor] = &[
    // Player
    CommandDescriptor {
        name: "play",
        method: "Player.PlayPause",
        description: "Resumes the current playback from pause state.",
        params: &[],
        builder: ParamBuilder::Fixed(PLAYER),
        repeatable: false,
    },
    CommandDescriptor {
        name: "pause",
        method: "Player.PlayPause",
        description: "Pauses the current playback.",
        params: &[],
        builder: ParamBuilder::Fixed(PLAYER),
        repeatable: false,
    },
    CommandDescriptor {
        name: "stop",
        method: "Player.Stop",
        description: "Stops the current playback.",
        params: &[],
        builder: ParamBuilder::Fixed(PLAYER),
        repeatable: false,
    },
    CommandDescriptor {
        name: "mute",
        method: "Application.SetMute",
        description: "Mutes or unmutes the audio.",
        params: &[],
        builder: ParamBuilder::Fixed(&[("mute", Literal::Str("toggle"))]),
        repeatable: false,
    },
    CommandDescriptor {
        name: "seek",
        method: "Player.Seek",
        description: "Jumps to the given time.",
        params: &[
            ("-/+", "Jump a small step back/forth."),
            ("--/++", "Jump a big step back/forth."),
            ("[hh:]mm:ss", "Jump to hours:minutes:seconds (hours optional)."),
        ],
        builder: ParamBuilder::Seek,
        repeatable: false,
    },
    CommandDescriptor {
        name: "speed",
        method: "Player.Speed",
        description: "Sets the playback speed.",
        params: &[("speed", "Speed as integer.")],
        builder: ParamBuilder::PassThrough {
            fixed: PLAYER,
            key: "speed",
        },
        repeatable: false,
    },
    // Input
    simple("action", "Input.Select", "Selects the current selection."),
    simple("context", "Input.ContextMenu", "Opens the context menu."),
    simple("info", "Input.Info", "Opens the info view."),
    simple("home", "Input.Home", "Returns to the home screen."),
    simple("back", "Input.Back", "Returns to the previous view."),
    cursor("left", "Input.Left", "Sends the cursor one item to the left."),
    cursor("right", "Input.Right", "Sends the cursor one item to the right."),
    cursor("up", "Input.Up", "Sends the cursor one item up."),
    cursor("down", "Input.Down", "Sends the cursor one item down."),
    // GUI
    // TODO: build title/message/displaytime from the tokens; the params are
    // documented but nothing is sent yet.
    CommandDescriptor {
        name: "notify",
        method: "GUI.ShowNotification",
        description: "Displays a notification on the screen.",
        params: &[
            ("title", "The title of the notification."),
            ("message", "The message of the notification."),
            (
                "displaytime",
                "(optional) The time in milliseconds the notification is displayed.",
            ),
        ],
        builder: ParamBuilder::Empty,
        repeatable: false,
    },
    // Library
    simple(
        "clean",
        "VideoLibrary.Clean",
        "Cleans the video library from non-existent items.",
    ),
    simple(
        "update",
        "VideoLibrary.Scan",
        "Scans the video sources for new library items.",
    ),
];

/// Immutable lookup table of all supported commands, in display order.
pub struct CommandRegistry {
    commands: IndexMap<&'static str, &'static CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut commands = IndexMap::with_capacity(COMMANDS.len());
        for cmd in COMMANDS {
            let previous = commands.insert(cmd.name, cmd);
            debug_assert!(previous.is_none(), "duplicate command {}", cmd.name);
        }
        Self { commands }
    }

    pub fn lookup(&self, name: &str) -> Option<&'static CommandDescriptor> {
        self.commands.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CommandDescriptor> + '_ {
        self.commands.values().copied()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
