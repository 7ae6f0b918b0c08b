//! Parameter builders for commands whose payload depends on CLI tokens.
//!
//! Pure functions, no I/O. Errors are returned as human-readable strings
//! and surfaced to the user verbatim.

use serde_json::{json, Map, Value};

/// JSON-RPC `params` object.
pub type Params = Map<String, Value>;

/// Player id addressed by all player commands (the active video player).
pub const PLAYER_ID: i64 = 1;

const NOT_ENOUGH: &str = r#"Not enough parameters. See "help seek" for usage information."#;
const ILLEGAL: &str = r#"Illegal parameter. See "help seek" for usage information."#;

/// Build the `Player.Seek` params.
///
/// The first token may be one of `+`, `++`, `-`, `--` for a relative jump.
/// Otherwise the last token is read as `[hh:]mm:ss`.
pub fn seek(tokens: &[String]) -> Result<Params, String> {
    let first = tokens.first().ok_or_else(|| NOT_ENOUGH.to_string())?;

    if let Some(step) = relative_step(first) {
        return Ok(player_params("value", json!(step)));
    }

    // `first` exists, so `last` does too
    let raw = tokens.last().map(String::as_str).unwrap_or_default();
    let mut parts: Vec<&str> = raw.split(':').collect();

    let mut hours = 0;
    if parts.len() == 3 {
        hours = parse_time_number(parts[0])?;
        parts.remove(0);
    }
    if parts.len() != 2 {
        return Err(ILLEGAL.to_string());
    }
    let minutes = parse_time_number(parts[0])?;
    let seconds = parse_time_number(parts[1])?;

    Ok(player_params(
        "value",
        json!({
            "hours": hours,
            "minutes": minutes,
            "seconds": seconds,
            "milliseconds": 0,
        }),
    ))
}

fn relative_step(token: &str) -> Option<&'static str> {
    match token {
        "+" => Some("smallforward"),
        "++" => Some("bigforward"),
        "-" => Some("smallbackward"),
        "--" => Some("bigbackward"),
        _ => None,
    }
}

/// Parse one `hh`, `mm` or `ss` component. All three share the 0..=59 bound.
fn parse_time_number(raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(n) if (0..=59).contains(&n) => Ok(n),
        _ => Err(format!(
            "A time-number needs to be between 0 and 59, but was {raw}"
        )),
    }
}

/// `{playerid: 1, <key>: <value>}`.
pub fn player_params(key: &str, value: Value) -> Params {
    let mut params = Params::new();
    params.insert("playerid".to_string(), json!(PLAYER_ID));
    params.insert(key.to_string(), value);
    params
}

/// Strip a trailing repeat count from `tokens`.
///
/// When the last token is an integer >= 1 it is removed and returned.
/// Anything else leaves `tokens` untouched and yields 1.
pub fn split_repeat_count(tokens: &mut Vec<String>) -> u32 {
    let count = tokens
        .last()
        .and_then(|t| t.parse::<u32>().ok())
        .filter(|n| *n >= 1);
    match count {
        Some(n) => {
            tokens.pop();
            n
        }
        None => 1,
    }
}
