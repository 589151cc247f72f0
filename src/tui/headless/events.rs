//! Event scripts for headless runs.
//!
//! A script is a list of `kind:value` events separated by newlines or commas.
//! A comma only ends an event when the text after it starts another one, so
//! `type:Dr. Grey, 2,key:enter` types both insert values before pressing Enter.

use super::HeadlessState;
use crate::error::{DashError, Result};
use crate::tui::app::{App, Page};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// Event kinds understood by the parser.
const KINDS: [&str; 7] = ["key", "type", "page", "wait", "resize", "snapshot", "assert"];

/// Named keys; the first name listed for a key is the one displayed.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("bs", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("del", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pgup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("pgdn", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

/// Comparison used by `assert:state:` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOp {
    Eq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl StateOp {
    /// Compares numerically when both sides are integers, as text otherwise.
    fn holds(self, actual: &str, expected: &str) -> bool {
        let ordering = match (actual.parse::<i64>(), expected.parse::<i64>()) {
            (Ok(a), Ok(e)) => a.cmp(&e),
            _ => actual.cmp(expected),
        };
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::GtEq => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::LtEq => ordering != Ordering::Greater,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
        }
    }
}

/// An assertion to check against the screen or state.
#[derive(Debug, Clone)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text (case-insensitive).
    NotContains(String),
    Matches(Regex),
    /// The status notice contains text (case-insensitive).
    Notice(String),
    State {
        field: String,
        op: StateOp,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and app state.
    pub fn check(&self, screen: &str, app: &App) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };

        match self {
            Self::Contains(text) => contains(screen, text),
            Self::ContainsExact(text) => screen.contains(text.as_str()),
            Self::NotContains(text) => !contains(screen, text),
            Self::Matches(pattern) => pattern.is_match(screen),
            Self::Notice(text) => app
                .notice
                .as_ref()
                .is_some_and(|notice| contains(&notice.message, text)),
            Self::State { field, op, value } => HeadlessState::from_app(app)
                .get(field)
                .is_some_and(|actual| op.holds(&actual, value)),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(t) => write!(f, "contains:{t}"),
            Self::ContainsExact(t) => write!(f, "contains-exact:{t}"),
            Self::NotContains(t) => write!(f, "not-contains:{t}"),
            Self::Matches(p) => write!(f, "matches:{}", p.as_str()),
            Self::Notice(t) => write!(f, "notice:{t}"),
            Self::State { field, op, value } => write!(f, "state:{field}{}{value}", op.as_str()),
        }
    }
}

/// A parsed event that can be executed.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// Type text into the focused input.
    Type(String),
    /// Jump straight to a page, as if chosen in the sidebar.
    Page(Page),
    Wait(Duration),
    Resize(u16, u16),
    /// Named marker; frames mode records a frame for every event anyway.
    Snapshot(String),
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                f.write_str("key:")?;
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    f.write_str("ctrl+")?;
                }
                match NAMED_KEYS.iter().find(|(_, code)| *code == key.code) {
                    Some((name, _)) => f.write_str(name),
                    None => match key.code {
                        KeyCode::Char(c) => write!(f, "{c}"),
                        other => write!(f, "{other:?}"),
                    },
                }
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Page(page) => write!(f, "page:{page}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Assert(assertion) => write!(f, "assert:{assertion}"),
        }
    }
}

/// Parser for event scripts.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a whole script. Blank lines and `#` comments are skipped.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .flat_map(split_events)
            .map(|event| self.parse_one(event))
            .collect()
    }

    /// Parses a single `kind:value` event.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let (kind, value) = input.trim().split_once(':').ok_or_else(|| {
            DashError::config(format!(
                "Invalid event syntax: '{input}'. Expected format: kind:value"
            ))
        })?;
        let value = value.trim();

        match kind.trim().to_lowercase().as_str() {
            "key" => parse_key(value).map(Event::Key),
            "type" => Ok(Event::Type(value.to_string())),
            "page" => value.parse().map(Event::Page).map_err(|_| {
                DashError::config(format!(
                    "Unknown page: '{value}'. Valid pages: home, query, insert, delete, visualize"
                ))
            }),
            "wait" => parse_wait(value).map(Event::Wait),
            "resize" => parse_resize(value),
            "snapshot" => Ok(Event::Snapshot(value.to_string())),
            "assert" => parse_assert(value).map(Event::Assert),
            other => Err(DashError::config(format!(
                "Unknown event type: '{other}'. Valid types: {}",
                KINDS.join(", ")
            ))),
        }
    }
}

/// Splits a line at the commas that start a new event.
fn split_events(line: &str) -> Vec<&str> {
    let mut events = Vec::new();
    let mut start = 0;
    for (comma, _) in line.match_indices(',') {
        if starts_event(&line[comma + 1..]) {
            events.push(&line[start..comma]);
            start = comma + 1;
        }
    }
    events.push(&line[start..]);

    events
        .into_iter()
        .map(str::trim)
        .filter(|event| !event.is_empty())
        .collect()
}

fn starts_event(text: &str) -> bool {
    text.split_once(':')
        .is_some_and(|(kind, _)| KINDS.contains(&kind.trim().to_lowercase().as_str()))
}

/// Parses `enter`, `y`, `ctrl+c` or `shift+tab`.
fn parse_key(value: &str) -> Result<KeyEvent> {
    let mut parts: Vec<&str> = value.split('+').map(str::trim).collect();
    let key = parts.pop().unwrap_or_default();

    let mut modifiers = KeyModifiers::NONE;
    for modifier in parts {
        match modifier.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => {
                return Err(DashError::config(format!(
                    "Unknown modifier: '{modifier}'. Valid modifiers: ctrl, shift"
                )))
            }
        }
    }

    let lower = key.to_lowercase();
    let named = NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| *code);
    let mut chars = key.chars();
    let code = match (named, chars.next(), chars.next()) {
        (Some(code), _, _) => code,
        (None, Some(c), None) => KeyCode::Char(c),
        _ => {
            return Err(DashError::config(format!(
                "Unknown key: '{key}'. Use a single character or a named key like enter, esc, tab"
            )))
        }
    };

    // Terminals report shift+tab as BackTab and shifted letters in upper case.
    let code = match code {
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::SHIFT) => {
            KeyCode::Char(c.to_ascii_uppercase())
        }
        code => code,
    };

    Ok(KeyEvent::new(code, modifiers))
}

/// Parses `100ms`, `2s` or a bare number of milliseconds.
fn parse_wait(value: &str) -> Result<Duration> {
    let lower = value.to_lowercase();
    let (number, unit): (&str, fn(u64) -> Duration) = if let Some(n) = lower.strip_suffix("ms") {
        (n, Duration::from_millis)
    } else if let Some(n) = lower.strip_suffix('s') {
        (n, Duration::from_secs)
    } else {
        (lower.as_str(), Duration::from_millis)
    };

    number
        .trim()
        .parse()
        .map(unit)
        .map_err(|_| DashError::config(format!("Invalid duration: '{value}'")))
}

/// Parses `WIDTHxHEIGHT`.
fn parse_resize(value: &str) -> Result<Event> {
    let invalid = || {
        DashError::config(format!(
            "Invalid resize format: '{value}'. Expected WIDTHxHEIGHT"
        ))
    };
    let (width, height) = value.split_once('x').ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok(Event::Resize(width, height))
}

/// Parses the part after `assert:`, e.g. `contains:Execute Query`.
fn parse_assert(value: &str) -> Result<Assertion> {
    let (kind, rest) = value.split_once(':').ok_or_else(|| {
        DashError::config(format!(
            "Invalid assertion syntax: '{value}'. Expected assert:kind:value"
        ))
    })?;
    let rest = rest.trim().to_string();

    match kind.trim().to_lowercase().as_str() {
        "contains" => Ok(Assertion::Contains(rest)),
        "contains-exact" => Ok(Assertion::ContainsExact(rest)),
        "not-contains" => Ok(Assertion::NotContains(rest)),
        "notice" => Ok(Assertion::Notice(rest)),
        "matches" => Regex::new(&rest)
            .map(Assertion::Matches)
            .map_err(|e| DashError::config(format!("Invalid pattern '{rest}': {e}"))),
        "state" => parse_state(&rest),
        other => Err(DashError::config(format!(
            "Unknown assertion type: '{other}'. Valid types: contains, contains-exact, \
             not-contains, matches, notice, state"
        ))),
    }
}

/// Parses `page=Home` or `row_count>=2`; the first operator splits the text.
fn parse_state(value: &str) -> Result<Assertion> {
    let position = value.find(['<', '>', '=']).ok_or_else(|| {
        DashError::config(format!(
            "Invalid state assertion: '{value}'. Expected field=value or field>=value"
        ))
    })?;
    let (field, rest) = value.split_at(position);

    let (op, expected) = [
        (">=", StateOp::GtEq),
        ("<=", StateOp::LtEq),
        (">", StateOp::Gt),
        ("<", StateOp::Lt),
        ("=", StateOp::Eq),
    ]
    .into_iter()
    .find_map(|(symbol, op)| rest.strip_prefix(symbol).map(|expected| (op, expected)))
    .ok_or_else(|| DashError::config(format!("Invalid state assertion: '{value}'")))?;

    Ok(Assertion::State {
        field: field.trim().to_string(),
        op,
        value: expected.trim().to_string(),
    })
}
