use std::collections::BTreeMap;

use serde_json::Value;

use super::command_registry::{
    CommandSpec, COLOR_COMMANDS, MODEL_ID_COMMANDS, NO_ARG_COMMANDS, REDIRECT_COMMAND,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub action: String,
    pub raw: String,
    pub command_args: BTreeMap<String, Value>,
}

impl Intent {
    fn new(action: &str, raw: &str) -> Self {
        Self {
            action: action.to_string(),
            raw: raw.to_string(),
            command_args: BTreeMap::new(),
        }
    }

    fn with_arg(mut self, key: &str, value: impl Into<String>) -> Self {
        self.command_args
            .insert(key.to_string(), Value::String(value.into()));
        self
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.command_args
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

fn find_action(command: &str, specs: &[CommandSpec]) -> Option<&'static str> {
    specs
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}

fn split_args(arg: &str) -> Vec<String> {
    if arg.trim().is_empty() {
        return Vec::new();
    }
    match shell_words::split(arg) {
        Ok(parts) => parts
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect(),
        Err(_) => arg
            .split_whitespace()
            .map(str::to_string)
            .filter(|value| !value.is_empty())
            .collect(),
    }
}

fn usage(command: &str, raw: &str) -> Intent {
    Intent::new("usage", raw).with_arg("command", command)
}

pub fn parse_intent(text: &str) -> Intent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return Intent::new("noop", text);
    }

    let Some(slash_tail) = raw_trimmed.strip_prefix('/') else {
        return Intent::new("unknown", text)
            .with_arg("command", "")
            .with_arg("arg", raw_trimmed);
    };

    let command_len = slash_tail
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .count();
    let command = slash_tail[..command_len].to_ascii_lowercase();
    let arg = slash_tail[command_len..].trim();
    let args = split_args(arg);

    if let Some(action) = find_action(&command, MODEL_ID_COMMANDS) {
        return match args.as_slice() {
            [id] => Intent::new(action, text).with_arg("id", id.as_str()),
            _ => usage(&command, text),
        };
    }

    if let Some(action) = find_action(&command, COLOR_COMMANDS) {
        return match args.as_slice() {
            [color] => Intent::new(action, text).with_arg("color", color.as_str()),
            _ => usage(&command, text),
        };
    }

    if command == REDIRECT_COMMAND.command {
        return match args.as_slice() {
            [id, target] => Intent::new(REDIRECT_COMMAND.action, text)
                .with_arg("id", id.as_str())
                .with_arg("target", target.as_str()),
            _ => usage(&command, text),
        };
    }

    if let Some(action) = find_action(&command, NO_ARG_COMMANDS) {
        return Intent::new(action, text);
    }

    Intent::new("unknown", text)
        .with_arg("command", command)
        .with_arg("arg", arg)
}
