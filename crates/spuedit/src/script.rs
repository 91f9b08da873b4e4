//! Button scripts
//!
//! A script is a list of steps separated by whitespace or commas. Each step
//! names a button, optionally repeated with `*N` and optionally prefixed by
//! `release:` to send a release instead of a press. `#` starts a comment
//! that runs to the end of the line.
//!
//! ```text
//! down right*3   # AttackStep up to 3
//! cross, release:cross, circle
//! ```

use psx_spu::editor::{Button, Event};
use thiserror::Error;

/// Upper bound on `*N` so a typo cannot queue billions of events
pub const MAX_REPEAT: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("step {step}: unknown button `{token}`")]
    UnknownButton { token: String, step: usize },

    #[error("step {step}: bad repeat count `{count}` (expected 1..={max})")]
    BadRepeat {
        count: String,
        step: usize,
        max: usize,
    },
}

/// Button for a script word
pub fn parse_button(word: &str) -> Option<Button> {
    let button = match word.to_ascii_lowercase().as_str() {
        "up" | "u" => Button::Up,
        "down" | "d" => Button::Down,
        "left" | "l" => Button::Left,
        "right" | "r" => Button::Right,
        "cross" | "x" | "on" => Button::Primary,
        "circle" | "o" | "off" => Button::Secondary,
        _ => return None,
    };
    Some(button)
}

/// Parse one step into an event and its repeat count
pub fn parse_step(token: &str, step: usize) -> Result<(Event, usize), ScriptError> {
    let (name, count) = match token.split_once('*') {
        Some((name, count)) => {
            let repeat = count
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=MAX_REPEAT).contains(n))
                .ok_or_else(|| ScriptError::BadRepeat {
                    count: count.to_string(),
                    step,
                    max: MAX_REPEAT,
                })?;
            (name, repeat)
        }
        None => (token, 1),
    };

    let (release, name) = match name.strip_prefix("release:") {
        Some(rest) => (true, rest),
        None => (false, name),
    };

    let button = parse_button(name).ok_or_else(|| ScriptError::UnknownButton {
        token: token.to_string(),
        step,
    })?;
    let event = if release {
        Event::released(button)
    } else {
        Event::pressed(button)
    };
    Ok((event, count))
}

/// Expand script steps into the events they produce
pub fn parse_steps<'a, I>(tokens: I) -> Result<Vec<Event>, ScriptError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut events = Vec::new();
    for (i, token) in tokens.into_iter().enumerate() {
        let (event, count) = parse_step(token, i + 1)?;
        events.extend(std::iter::repeat_n(event, count));
    }
    Ok(events)
}

/// Parse a whole script text, comments included
pub fn parse_source(source: &str) -> Result<Vec<Event>, ScriptError> {
    let tokens = source
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(|code| code.split(|c: char| c.is_whitespace() || c == ','))
        .filter(|token| !token.is_empty());
    parse_steps(tokens)
}
