//! Free-text command grammar used by the chat channel
//!
//! ```text
//! pause | resume | toggle | <small> [<big> [<interval>]]
//! ```

use crate::{error::ParseError, state::UpdateCommand};

/// A parsed chat command and the confirmation it replies with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCommand {
    pub update: UpdateCommand,
    pub reply: String,
}

/// Parse one line of free text into an update command
pub fn parse_command(text: &str) -> Result<UpdateCommand, ParseError> {
    match text {
        "pause" => return Ok(UpdateCommand::pause()),
        "resume" => return Ok(UpdateCommand::resume()),
        "toggle" => return Ok(UpdateCommand::toggle()),
        _ => {}
    }

    let numbers = text
        .split_whitespace()
        .map(|word| parse_number(word, text))
        .collect::<Result<Vec<_>, _>>()?;

    match numbers[..] {
        [small] => {
            let big = small
                .checked_mul(2)
                .ok_or_else(|| ParseError::OutOfRange(text.to_string()))?;
            Ok(UpdateCommand::blinds(small, big))
        }
        [small, big] => Ok(UpdateCommand::blinds(small, big)),
        [small, big, interval] => Ok(UpdateCommand {
            interval_minutes: u32::try_from(interval)
                .map_err(|_| ParseError::OutOfRange(text.to_string()))?,
            ..UpdateCommand::blinds(small, big)
        }),
        _ => Err(ParseError::Unrecognized(text.to_string())),
    }
}

fn parse_number(word: &str, text: &str) -> Result<u64, ParseError> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Unrecognized(text.to_string()));
    }
    word.parse()
        .map_err(|_| ParseError::OutOfRange(text.to_string()))
}

impl ChatCommand {
    /// Like [`parse_command`], but also rejects an all-zero update, which
    /// would change nothing while replying as if it had
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let update = parse_command(text)?;
        if update == UpdateCommand::default() {
            return Err(ParseError::Unrecognized(text.to_string()));
        }
        let reply = match text {
            "pause" => "Paused!".to_string(),
            "resume" => "Resumed!".to_string(),
            "toggle" => "Toggled!".to_string(),
            _ => format!("Setting blinds to {} / {}", update.small_blind, update.big_blind),
        };
        Ok(Self { update, reply })
    }
}
