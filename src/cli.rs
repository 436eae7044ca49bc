//! CLI driver helpers: command grammar and plain-text step view for the
//! stdin/stdout REPL.

use std::fmt::Write as _;

use serde_json::Value;

use crate::error::WizardError;
use crate::onboarding::fields::ProfileField;
use crate::onboarding::handoff::CompletedProfile;
use crate::onboarding::model::FieldValue;
use crate::onboarding::state::WizardState;
use crate::onboarding::steps::StepKind;

pub const HELP: &str = "\
Commands:
  set <field> <value>     write a field (list fields toggle the value)
  toggle <field> <value>  add or remove a value in platforms / niches
  next                    go to the next step, or finish on the last one
  back                    go to the previous step
  status                  show the current step again
  help                    show this message
  quit                    abandon onboarding";

const SET_USAGE: &str = "set <field> <value>";
const TOGGLE_USAGE: &str = "toggle <field> <value>";

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: String, value: String },
    Toggle { field: String, value: String },
    Next,
    Back,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("Usage: {usage}")]
    Usage { usage: &'static str },

    #[error("{field} holds a single value; use 'set {field} <value>'")]
    NotToggleable { field: String },
}

/// Parse one input line. Values keep their inner spacing.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = split_field(rest).ok_or(CommandError::Usage { usage: SET_USAGE })?;
            Ok(Command::Set { field, value })
        }
        "toggle" => match split_field(rest) {
            // Unknown names fall through so the wizard reports them.
            Some((field, _)) if matches!(field.parse::<ProfileField>(), Ok(f) if !f.is_set()) => {
                Err(CommandError::NotToggleable { field })
            }
            Some((field, value)) if !value.is_empty() => Ok(Command::Toggle { field, value }),
            _ => Err(CommandError::Usage {
                usage: TOGGLE_USAGE,
            }),
        },
        "next" | "n" => Ok(Command::Next),
        "back" | "b" => Ok(Command::Back),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "/quit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb.to_string())),
    }
}

fn split_field(rest: &str) -> Option<(String, String)> {
    if rest.is_empty() {
        return None;
    }
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(field, value)| (field, value.trim()));
    Some((field.to_string(), value.to_string()))
}

/// Plain-text view of the current step: header, progress and each field.
pub fn describe_step(state: &WizardState) -> Result<String, WizardError> {
    let kind = state.step_kind()?;
    let record = state.record();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{} onboarding] Step {} of {} ({:.0}% complete)",
        state.role().label(),
        state.current_step(),
        state.total_steps(),
        state.progress()
    );
    let _ = writeln!(out, "{}", kind.title());
    let _ = writeln!(out, "{}", kind.subtitle());

    if kind == StepKind::CreatorProfile {
        if let Some(creator) = record.creator() {
            if creator.profile_image.is_none() {
                let _ = writeln!(out, "  avatar: {}", creator.avatar_initial());
            }
        }
    }

    for field in kind.fields() {
        let shown = match record.value(*field) {
            FieldValue::Unset | FieldValue::Text("") => "(unset)".to_string(),
            FieldValue::Text(text) => text.to_string(),
            FieldValue::Set(values) => values.iter().cloned().collect::<Vec<_>>().join(", "),
            FieldValue::Secret { is_set: true } => "********".to_string(),
            FieldValue::Secret { is_set: false } => "(unset)".to_string(),
        };
        let _ = writeln!(out, "  {} ({}): {}", field.label(), field.name(), shown);

        let options = field.options();
        if !options.is_empty() {
            let values: Vec<&str> = options.iter().map(|o| o.value).collect();
            let _ = writeln!(out, "      options: {}", values.join(", "));
        } else if let Some(hint) = field.placeholder() {
            let _ = writeln!(out, "      e.g. {hint}");
        }
    }

    let next = if state.is_final_step() {
        "'next' completes setup"
    } else {
        "'next' continues"
    };
    let _ = write!(out, "{next}");
    Ok(out)
}

/// JSON for a completed profile with the password masked.
pub fn redacted_json(profile: &CompletedProfile) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(profile)?;
    if let Some(password) = value
        .get_mut("record")
        .and_then(|record| record.get_mut("password"))
    {
        *password = Value::String("********".to_string());
    }
    Ok(value)
}
