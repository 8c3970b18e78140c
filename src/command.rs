//! Building blocks shared by the three command dispatchers.
//!
//! Each adapter declares a static table of [`CommandSpec`] descriptors keyed
//! by its own operation enum. Dispatch resolves a name to one descriptor,
//! validates the argument bag against its [`Param`] list, then switches on
//! the operation tag.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Must be present, non-null and not a blank string.
    Required(&'static str),
    /// Must be a string that is not blank after trimming.
    NonBlank(&'static str),
    /// May be omitted; the second field is the default shown in usage lines.
    Optional(&'static str, &'static str),
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::Required(n) | Param::NonBlank(n) | Param::Optional(n, _) => *n,
        }
    }
}

#[derive(Debug)]
pub struct CommandSpec<Op> {
    /// Canonical name first, then aliases.
    pub names: &'static [&'static str],
    pub op: Op,
    pub params: &'static [Param],
}

impl<Op> CommandSpec<Op> {
    pub fn name(&self) -> &'static str {
        self.names[0]
    }

    pub fn usage(&self) -> String {
        let names = self.names.join(" / ");
        if self.params.is_empty() {
            return names;
        }
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| match p {
                Param::Required(n) | Param::NonBlank(n) => n.to_string(),
                Param::Optional(n, default) if default.is_empty() => format!("[{}]", n),
                Param::Optional(n, default) => format!("[{}={}]", n, default),
            })
            .collect();
        format!("{}: {}", names, params.join(", "))
    }
}

pub fn normalize(command: &str) -> String {
    command.trim().to_lowercase()
}

/// Every accepted name and alias, sorted.
pub fn valid_names<Op>(table: &[CommandSpec<Op>]) -> Vec<String> {
    let mut names: Vec<String> = table
        .iter()
        .flat_map(|spec| spec.names.iter().map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

/// Resolves a free-form command string to its descriptor. Returns the
/// normalized name alongside so error messages echo what the caller typed.
pub fn resolve<'t, Op>(
    table: &'t [CommandSpec<Op>],
    command: &str,
) -> Result<(String, &'t CommandSpec<Op>)> {
    let name = normalize(command);
    match table.iter().find(|spec| spec.names.contains(&name.as_str())) {
        Some(spec) => Ok((name, spec)),
        None => Err(Error::UnknownCommand {
            command: name,
            valid: valid_names(table),
        }),
    }
}

pub fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Read-only view over a caller-supplied argument bag.
pub struct Args<'a> {
    command: &'a str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Args<'a> {
    /// Anything other than a JSON object is treated as an empty bag.
    pub fn new(command: &'a str, args: &'a Value) -> Self {
        Self {
            command,
            map: args.as_object(),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        match self.map.and_then(|m| m.get(field)) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    /// Checks presence of every declared parameter, in declaration order.
    pub fn check(&self, params: &[Param]) -> Result<()> {
        for param in params {
            match *param {
                Param::Required(field) => match self.get(field) {
                    None => return Err(self.missing(field)),
                    Some(Value::String(s)) if s.trim().is_empty() => {
                        return Err(self.missing(field))
                    }
                    Some(_) => {}
                },
                Param::NonBlank(field) => match self.get(field) {
                    Some(Value::String(s)) if !s.trim().is_empty() => {}
                    _ => {
                        return Err(Error::BlankArgument {
                            command: self.command.to_string(),
                            field,
                        })
                    }
                },
                Param::Optional(..) => {}
            }
        }
        Ok(())
    }

    /// A required identifier, trimmed. Numbers are accepted and stringified.
    pub fn text(&self, field: &'static str) -> Result<String> {
        match self.get(field) {
            None => Err(self.missing(field)),
            Some(v) => self.as_text(field, v),
        }
    }

    pub fn text_or(&self, field: &'static str, default: &str) -> Result<String> {
        match self.get(field) {
            None => Ok(default.to_string()),
            Some(v) => self.as_text(field, v),
        }
    }

    /// A required integer. Numeric strings are coerced; anything else is a
    /// type error rather than a silent default.
    pub fn integer(&self, field: &'static str) -> Result<i64> {
        match self.get(field) {
            None => Err(self.missing(field)),
            Some(v) => self.as_integer(field, v),
        }
    }

    pub fn integer_or(&self, field: &'static str, default: i64) -> Result<i64> {
        match self.get(field) {
            None => Ok(default),
            Some(v) => self.as_integer(field, v),
        }
    }

    fn as_text(&self, field: &'static str, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.invalid(field, format!("must be a string, got {}", other))),
        }
    }

    fn as_integer(&self, field: &'static str, value: &Value) -> Result<i64> {
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(field, format!("must be an integer, got {}", value)))
    }

    fn missing(&self, field: &'static str) -> Error {
        Error::MissingArgument {
            command: self.command.to_string(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, reason: String) -> Error {
        Error::InvalidArgument {
            command: self.command.to_string(),
            field,
            reason,
        }
    }
}

/// Self-description of one adapter: identity plus its command surface.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub unique_name: String,
    pub matching_hotwords: Vec<String>,
    pub commands: Vec<String>,
}

impl AbilityInfo {
    pub fn new<Op>(
        name: &'static str,
        description: &'static str,
        unique_name: &str,
        matching_hotwords: &[String],
        table: &[CommandSpec<Op>],
    ) -> Self {
        Self {
            name,
            version: env!("CARGO_PKG_VERSION"),
            description,
            unique_name: unique_name.to_string(),
            matching_hotwords: matching_hotwords.to_vec(),
            commands: table.iter().map(CommandSpec::usage).collect(),
        }
    }
}
