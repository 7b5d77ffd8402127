//! Line-oriented command input
//!
//! One command per line, in the engine's text format (`WPW5 E2->E4`,
//! `B_CONFIRM`, `START_GAME`). Two extra directives are understood:
//! `key <code>` presses a raw key through the bindings, and `wait <ms>`
//! pauses the reader, which lets recorded scripts keep their timing.
//! Blank lines and `#` comments are skipped.

use super::keys::{KeyBindings, KeyPress};
use crate::core::CoreResult;
use kfchess_engine::Command;
use std::io::BufRead;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    Commands(Vec<Command>),
    Wait(Duration),
    Skip,
}

/// Interpret one input line
pub fn parse_line(line: &str, bindings: &KeyBindings) -> InputLine {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return InputLine::Skip;
    }
    let lower = line.to_ascii_lowercase();
    if let Some(key) = lower.strip_prefix("key ") {
        return match KeyPress::parse(key) {
            Some(press) => InputLine::Commands(bindings.translate(press)),
            None => {
                warn!("[INPUT] Unreadable key {:?}", key);
                InputLine::Skip
            }
        };
    }
    if let Some(ms) = lower.strip_prefix("wait ") {
        return match ms.trim().parse() {
            Ok(ms) => InputLine::Wait(Duration::from_millis(ms)),
            Err(_) => {
                warn!("[INPUT] Unreadable wait {:?}", ms);
                InputLine::Skip
            }
        };
    }
    InputLine::Commands(vec![Command::parse(line)])
}

/// Feed every line of `reader` to `sink`, honouring `wait` directives.
/// Returns the number of commands sent.
pub fn feed_lines<R, F>(reader: R, bindings: &KeyBindings, mut sink: F) -> CoreResult<usize>
where
    R: BufRead,
    F: FnMut(Command) -> CoreResult<()>,
{
    let mut sent = 0;
    for line in reader.lines() {
        match parse_line(&line?, bindings) {
            InputLine::Commands(commands) => {
                for command in commands {
                    debug!("[INPUT] {}", command.text());
                    sink(command)?;
                    sent += 1;
                }
            }
            InputLine::Wait(duration) => std::thread::sleep(duration),
            InputLine::Skip => {}
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kfchess_engine::CommandKind;

    #[test]
    fn test_parse_line_variants() {
        let keys = KeyBindings::default();
        assert_eq!(parse_line("   ", &keys), InputLine::Skip);
        assert_eq!(parse_line("# opening", &keys), InputLine::Skip);
        assert_eq!(
            parse_line("wait 250", &keys),
            InputLine::Wait(Duration::from_millis(250))
        );
        assert_eq!(parse_line("wait soon", &keys), InputLine::Skip);

        let InputLine::Commands(commands) = parse_line("KEY 87", &keys) else {
            panic!("key directive should produce commands");
        };
        assert_eq!(commands[0].text(), "W_UP");

        let InputLine::Commands(commands) = parse_line("wpw5 e2->e4", &keys) else {
            panic!("plain line should parse as a command");
        };
        assert_eq!(commands[0].kind(), CommandKind::Move);
    }

    #[test]
    fn test_feed_lines_counts_commands() {
        let script = "START_GAME\n# comment\nkey 27\nWPW5 E2->E4\n";
        let mut seen = Vec::new();
        let sent = feed_lines(script.as_bytes(), &KeyBindings::default(), |command| {
            seen.push(command.text().to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(sent, 4, "ESC expands to one command per player");
        assert_eq!(seen, ["START_GAME", "W_ESCAPE", "B_ESCAPE", "WPW5 E2->E4"]);
    }
}
