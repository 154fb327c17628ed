//! Argument specifications derived from a [`Signature`].
//!
//! Parameters without a default become required positionals. Each defaulted
//! parameter becomes one option reachable through two aliases: a hidden
//! single-dash full name (`-banana`) and a documented long form (`--banana`)
//! that also accepts any unambiguous prefix.

use crate::signature::Signature;
use serde::Serialize;
use serde_json::Value;

/// A required positional argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalArg {
    pub name: String,
}

/// A named argument backed by a defaulted parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionArg {
    /// Destination shared by both aliases.
    pub dest: String,
    /// Hidden full-name alias, e.g. `-banana`.
    pub short_alias: String,
    /// Documented alias, e.g. `--banana`.
    pub long_alias: String,
    /// Returned unchanged when neither alias is given.
    pub default: Value,
    pub help: String,
    pub metavar: String,
}

/// Collector for zero or more trailing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariadicArg {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentSpec {
    pub positionals: Vec<PositionalArg>,
    pub options: Vec<OptionArg>,
    pub variadic: Option<VariadicArg>,
}

impl ArgumentSpec {
    pub fn from_signature(signature: &Signature) -> Self {
        let positionals = signature
            .positional()
            .iter()
            .map(|p| PositionalArg {
                name: p.name.clone(),
            })
            .collect();

        let options = signature
            .defaulted()
            .iter()
            .filter_map(|p| {
                let default = p.default_value.clone()?;
                Some(OptionArg::new(&p.name, default))
            })
            .collect();

        let variadic = signature.variadic().map(|name| VariadicArg {
            name: name.to_string(),
        });

        let spec = Self {
            positionals,
            options,
            variadic,
        };
        log::debug!(
            "{}(): {} positional, {} optional, variadic: {}",
            signature.name(),
            spec.positionals.len(),
            spec.options.len(),
            spec.variadic.as_ref().map_or("none", |v| v.name.as_str()),
        );
        spec
    }

    /// Every destination name, positionals first, then options, then the collector.
    pub fn dests(&self) -> impl Iterator<Item = &str> {
        self.positionals
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.options.iter().map(|o| o.dest.as_str()))
            .chain(self.variadic.iter().map(|v| v.name.as_str()))
    }

    pub fn option(&self, dest: &str) -> Option<&OptionArg> {
        self.options.iter().find(|o| o.dest == dest)
    }

    /// Format as JSON for programmatic consumption
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl OptionArg {
    fn new(name: &str, default: Value) -> Self {
        let first = name.chars().next().map(String::from).unwrap_or_default();
        Self {
            dest: name.to_string(),
            short_alias: format!("-{name}"),
            long_alias: format!("--{name}"),
            help: format!("default: {}", display_default(&default)),
            metavar: format!("| -{first}  {}", name.to_uppercase()),
            default,
        }
    }
}

/// Render a default the way it reads in help text: strings bare, the rest as JSON.
pub fn display_default(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Join the module and callable documentation with one line break, skipping
/// whichever is absent or empty.
pub fn compose_help(module_doc: Option<&str>, callable_doc: Option<&str>) -> String {
    [module_doc, callable_doc]
        .into_iter()
        .flatten()
        .filter(|doc| !doc.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
