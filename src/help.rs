//! Help text rendering. Returns strings; printing is left to `main`.

use std::fmt::Write;

use crate::commands::{CommandDescriptor, CommandRegistry};

/// Usage line plus the list of all commands.
pub fn usage(program: &str, registry: &CommandRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Usage: {program} [--host=<addr> --port=<port>] <command> [parameter...]");
    let _ = writeln!(out, "To get help type {program} help");
    let _ = writeln!(out, "To get help for a specific command type {program} help <command>");
    let _ = writeln!(out);
    let _ = writeln!(out, "List of all available commands:");
    let width = registry.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for cmd in registry.iter() {
        let _ = writeln!(out, "  {:<width$} - {}", cmd.name, cmd.description);
    }
    out
}

/// First-run instructions followed by [`usage`].
pub fn general(program: &str, registry: &CommandRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "If you run the tool the first time you need to configure it. Call it with \
         --host=<kodi-address> and --port=<kodi-port>; the values are saved for later calls."
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Once configured, pass the name of the command followed by its parameters, \
         e.g. '{program} seek 01:02:03' or '{program} down 3'."
    );
    out.push_str(&usage(program, registry));
    out
}

/// Help for a single command.
pub fn command(cmd: &CommandDescriptor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Help for command {}", cmd.name);
    let _ = writeln!(out, "Description: {}", cmd.description);
    if !cmd.params.is_empty() {
        let _ = writeln!(out, "Parameters");
        for (param, doc) in cmd.params {
            let _ = writeln!(out, "  {param} - {doc}");
        }
    }
    out
}

/// Help for `name`, or a notice that it does not exist.
pub fn lookup(name: &str, registry: &CommandRegistry) -> String {
    match registry.lookup(name) {
        Some(cmd) => command(cmd),
        None => format!("The command {name} is not supported.\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_lists_every_command() {
        let registry = CommandRegistry::new();
        let text = usage("krm", &registry);
        assert!(text.starts_with("Usage: krm "));
        for cmd in registry.iter() {
            assert!(
                text.lines().any(|l| l.trim_start().starts_with(cmd.name) && l.ends_with(cmd.description)),
                "missing {}",
                cmd.name
            );
        }
    }

    #[test]
    fn general_mentions_configuration() {
        let registry = CommandRegistry::new();
        let text = general("krm", &registry);
        assert!(text.contains("--host=<kodi-address>"));
        assert!(text.contains("List of all available commands:"));
    }

    #[test]
    fn command_with_parameters() {
        let registry = CommandRegistry::new();
        let text = lookup("seek", &registry);
        assert!(text.starts_with("Help for command seek\n"));
        assert!(text.contains("Description: Jumps to the given time."));
        assert!(text.contains("Parameters\n"));
        assert!(text.contains("  [hh:]mm:ss - "));
    }

    #[test]
    fn command_without_parameters() {
        let registry = CommandRegistry::new();
        let text = lookup("stop", &registry);
        assert!(!text.contains("Parameters"));
    }

    #[test]
    fn unknown_command() {
        let registry = CommandRegistry::new();
        assert_eq!(lookup("nope", &registry), "The command nope is not supported.\n");
    }
}
