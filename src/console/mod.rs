//! Command Console: a two-command grammar on top of the trace session.
//!
//! ```text
//! sudo hack
//! trace --from "<text>" --to "<text>" [--profile <token>]
//! ```
//!
//! Matching is case-insensitive. Blank input does nothing; anything else that does not
//! match is answered with an `unknown_command` log line.

use crate::clients::TraceClient;
use crate::model::Profile;
use crate::trace_actor::{FieldUpdate, TraceError};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

static HACK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^sudo\s+hac?k").expect("hack pattern is valid"));

static TRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^trace\s+--from\s+"([^"]+)"\s+--to\s+"([^"]+)"(?:\s+--profile\s+(\S+))?"#)
        .expect("trace pattern is valid")
});

pub const UNKNOWN_COMMAND: &str = "unknown_command";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Hack,
    Trace {
        from: String,
        to: String,
        profile: Option<Profile>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("unknown_command")]
    UnknownCommand,
}

/// Parses one console line. `Ok(None)` for blank input.
pub fn parse(input: &str) -> Result<Option<Command>, ConsoleError> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if HACK.is_match(text) {
        return Ok(Some(Command::Hack));
    }
    let caps = TRACE.captures(text).ok_or(ConsoleError::UnknownCommand)?;
    Ok(Some(Command::Trace {
        from: caps[1].to_string(),
        to: caps[2].to_string(),
        profile: caps.get(3).map(|m| Profile::from_token(m.as_str())),
    }))
}

/// What a dispatched line did.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Ignored,
    Hack,
    Trace { seq: u64 },
    Unknown,
}

pub struct Console {
    trace: TraceClient,
}

impl Console {
    pub fn new(trace: TraceClient) -> Self {
        Self { trace }
    }

    #[instrument(skip(self))]
    pub async fn dispatch(&self, input: &str) -> Result<Dispatched, TraceError> {
        match parse(input) {
            Ok(None) => Ok(Dispatched::Ignored),
            Ok(Some(Command::Hack)) => {
                self.trace.hack_sequence().await?;
                Ok(Dispatched::Hack)
            }
            Ok(Some(Command::Trace { from, to, profile })) => {
                self.trace
                    .set_fields(FieldUpdate {
                        origin_text: Some(from),
                        destination_text: Some(to),
                        profile,
                        clear_points: true,
                    })
                    .await?;
                let seq = self.trace.trigger_from_fields().await?;
                Ok(Dispatched::Trace { seq })
            }
            Err(e) => {
                debug!(error = %e, "Unrecognised console input");
                self.trace.append_log(UNKNOWN_COMMAND).await?;
                Ok(Dispatched::Unknown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_ignored() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   \t "), Ok(None));
    }

    #[test]
    fn test_hack_variants() {
        for input in ["sudo hack", "SUDO HACK the planet", "sudo   hak", "  sudo hackerman"] {
            assert_eq!(parse(input), Ok(Some(Command::Hack)), "{input}");
        }
        assert_eq!(parse("sudo make me a sandwich"), Err(ConsoleError::UnknownCommand));
    }

    #[test]
    fn test_trace_command() {
        assert_eq!(
            parse(r#"trace --from "New York" --to "Boston""#),
            Ok(Some(Command::Trace {
                from: "New York".into(),
                to: "Boston".into(),
                profile: None,
            }))
        );
        assert_eq!(
            parse(r#"TRACE --from "40.7,-74.0" --to "42.36,-71.06" --profile foot-walking"#),
            Ok(Some(Command::Trace {
                from: "40.7,-74.0".into(),
                to: "42.36,-71.06".into(),
                profile: Some(Profile::Walking),
            }))
        );
    }

    #[test]
    fn test_malformed_trace_is_unknown() {
        for input in [
            "trace",
            r#"trace --from "A""#,
            r#"trace --to "B" --from "A""#,
            "trace --from A --to B",
            "hello",
        ] {
            assert_eq!(parse(input), Err(ConsoleError::UnknownCommand), "{input}");
        }
    }
}
