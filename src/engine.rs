//! Adapter over clap, the argument-parsing engine.
//!
//! clap owns tokenization, long-option prefix inference, help output and
//! usage errors. This module registers an [`ArgumentSpec`] with it, provides
//! the single-dash full-name aliases clap cannot express, and adds a tolerant
//! parse that sets unmatched tokens aside instead of failing.

use crate::argspec::ArgumentSpec;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

/// Values produced by parsing invocation tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseResult {
    /// Positional and optional values in parameter order.
    pub named: Vec<(String, Value)>,
    /// Values captured by the variadic collector's own slot.
    pub variadic: Vec<String>,
    /// Tokens no registered argument accepted, in encounter order.
    pub unrecognized: Vec<String>,
}

impl ParseResult {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A clap command built once from an [`ArgumentSpec`].
#[derive(Debug, Clone)]
pub struct Engine {
    command: Command,
    spec: ArgumentSpec,
}

impl Engine {
    /// Register every argument of `spec` on a fresh command.
    ///
    /// `description` is shown verbatim above the argument listing.
    pub fn new(name: &str, description: &str, spec: ArgumentSpec) -> Self {
        let mut command = Command::new(name.to_string()).infer_long_args(true);
        if !description.is_empty() {
            command = command.about(description.to_string());
        }

        for positional in &spec.positionals {
            command = command.arg(
                Arg::new(positional.name.clone())
                    .value_name(positional.name.clone())
                    .required(true)
                    .allow_negative_numbers(true)
                    .action(ArgAction::Set),
            );
        }

        for option in &spec.options {
            command = command.arg(
                Arg::new(option.dest.clone())
                    .long(option.dest.clone())
                    .value_name(option.metavar.clone())
                    .help(option.help.clone())
                    .allow_negative_numbers(true)
                    .overrides_with(option.dest.clone())
                    .action(ArgAction::Set),
            );
        }

        if let Some(variadic) = &spec.variadic {
            command = command.arg(
                Arg::new(variadic.name.clone())
                    .value_name(variadic.name.clone())
                    .num_args(0..)
                    .allow_negative_numbers(true)
                    .action(ArgAction::Append),
            );
        }

        Self { command, spec }
    }

    pub fn spec(&self) -> &ArgumentSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// Full help text as `-h`/`--help` would print it.
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Parse `tokens`, rejecting anything no argument accepts.
    ///
    /// # Errors
    ///
    /// Returns the engine's error for help requests, missing positionals,
    /// ambiguous abbreviations and unrecognized arguments.
    pub fn parse(&self, program: Option<&str>, tokens: &[String]) -> Result<ParseResult, clap::Error> {
        let mut command = self.prepared(program);
        let result = self.parse_with(&mut command, tokens)?;
        if result.unrecognized.is_empty() {
            Ok(result)
        } else {
            Err(command.error(
                ErrorKind::UnknownArgument,
                format!("unrecognized arguments: {}", result.unrecognized.join(" ")),
            ))
        }
    }

    /// Parse `tokens`, setting aside anything no argument accepts.
    ///
    /// # Errors
    ///
    /// Returns the engine's error for help requests, missing positionals
    /// and ambiguous abbreviations.
    pub fn parse_tolerant(
        &self,
        program: Option<&str>,
        tokens: &[String],
    ) -> Result<ParseResult, clap::Error> {
        let mut command = self.prepared(program);
        self.parse_with(&mut command, tokens)
    }

    fn prepared(&self, program: Option<&str>) -> Command {
        let program = program.unwrap_or_else(|| self.name()).to_string();
        self.command.clone().bin_name(program)
    }

    fn parse_with(&self, command: &mut Command, tokens: &[String]) -> Result<ParseResult, clap::Error> {
        let mut remaining = expand_aliases(tokens, &self.spec)
            .map_err(|message| command.error(ErrorKind::UnknownArgument, message))?;
        let program = command.get_bin_name().unwrap_or_default().to_string();
        let mut unrecognized = Vec::new();

        loop {
            let argv = std::iter::once(program.clone()).chain(remaining.iter().cloned());
            match command.try_get_matches_from_mut(argv) {
                Ok(matches) => {
                    return Ok(ParseResult {
                        named: self.named_values(&matches),
                        variadic: self.variadic_values(&matches),
                        unrecognized,
                    });
                }
                Err(err) if err.kind() == ErrorKind::UnknownArgument => {
                    let Some(index) = offending_token(&err, &remaining) else {
                        return Err(err);
                    };
                    let token = remaining.remove(index);
                    log::trace!("setting aside unrecognized token '{token}'");
                    unrecognized.push(token);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn named_values(&self, matches: &ArgMatches) -> Vec<(String, Value)> {
        let positionals = self.spec.positionals.iter().filter_map(|p| {
            let value = matches.get_one::<String>(&p.name)?;
            Some((p.name.clone(), Value::String(value.clone())))
        });
        let options = self.spec.options.iter().map(|o| {
            let value = matches
                .get_one::<String>(&o.dest)
                .map_or_else(|| o.default.clone(), |v| Value::String(v.clone()));
            (o.dest.clone(), value)
        });
        positionals.chain(options).collect()
    }

    fn variadic_values(&self, matches: &ArgMatches) -> Vec<String> {
        self.spec
            .variadic
            .as_ref()
            .and_then(|v| matches.get_many::<String>(&v.name))
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }
}

/// Rewrite single-dash full-name aliases (`-banana`, `-bana=x`) into the long
/// form clap understands, and reject abbreviations that match several options.
///
/// A single-dash token may also be a one-letter option with its value attached
/// (`-b1`, or `-hx` for the help flag), which competes with prefix matches.
fn expand_aliases(tokens: &[String], spec: &ArgumentSpec) -> Result<Vec<String>, String> {
    let mut expanded = Vec::with_capacity(tokens.len());
    let mut literal = false;

    for token in tokens {
        if literal || token == "--" {
            literal = true;
            expanded.push(token.clone());
            continue;
        }

        let (long, body) = if let Some(body) = token.strip_prefix("--") {
            (true, body)
        } else if let Some(body) = token.strip_prefix('-') {
            (false, body)
        } else {
            expanded.push(token.clone());
            continue;
        };

        let name = body.split('=').next().unwrap_or(body);
        if name.is_empty() || (!long && (name == "h" || looks_numeric(name))) {
            expanded.push(token.clone());
            continue;
        }

        let candidates: Vec<&str> = spec
            .options
            .iter()
            .map(|o| o.dest.as_str())
            .chain(long.then_some("help"))
            .filter(|dest| dest.starts_with(name))
            .collect();
        if candidates.contains(&name) {
            expanded.push(if long { token.clone() } else { format!("-{token}") });
            continue;
        }

        let attached = if long { None } else { attached_flag(body, spec) };
        if candidates.len() + usize::from(attached.is_some()) > 1 {
            let options: Vec<String> = attached
                .map(|(flag, _)| format!("-{flag}"))
                .into_iter()
                .chain(candidates.iter().map(|c| format!("--{c}")))
                .collect();
            return Err(format!(
                "ambiguous option: {token} could match {}",
                options.join(", ")
            ));
        }

        match (candidates.first(), attached) {
            (Some(_), _) if !long => {
                log::trace!("expanding '{token}' to '--{body}'");
                expanded.push(format!("--{body}"));
            }
            (None, Some((flag, value))) if flag != "h" => {
                log::trace!("expanding '{token}' to '--{flag}={value}'");
                expanded.push(format!("--{flag}={value}"));
            }
            _ => expanded.push(token.clone()),
        }
    }

    Ok(expanded)
}

/// Split `body` into a one-letter option (or `h` for help) and its attached
/// value, if such an option exists.
fn attached_flag<'a>(body: &'a str, spec: &ArgumentSpec) -> Option<(&'a str, &'a str)> {
    let split = body.char_indices().nth(1).map(|(index, _)| index)?;
    let (flag, value) = body.split_at(split);
    let known = flag == "h" || spec.options.iter().any(|o| o.dest == flag);
    known.then_some((flag, value))
}

fn looks_numeric(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

/// Locate the token clap rejected.
fn offending_token(err: &clap::Error, tokens: &[String]) -> Option<usize> {
    let Some(ContextValue::String(invalid)) = err.get(ContextKind::InvalidArg) else {
        return None;
    };
    tokens.iter().position(|token| {
        token == invalid
            || token.strip_prefix(invalid.as_str()).is_some_and(|rest| {
                rest.starts_with('=') || (!invalid.starts_with("--") && invalid.starts_with('-'))
            })
    })
}
