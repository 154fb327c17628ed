//! Parser implementation using pest
//!
//! Reads a textual callable declaration into a [`SignatureBuilder`]. Leading
//! `///` lines become the callable's documentation string.

mod literal;

use crate::signature::{SignatureBuilder, SignatureError};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct SignatureParser;

/// Parse a declaration like `fn main(apple, banana = 9, *rest)`.
///
/// # Errors
///
/// Returns `Err` if the input violates the grammar, such as:
/// - Missing function name or parentheses
/// - A default that is not a string, number, boolean or null literal
/// - A parameter name that is not an identifier
pub fn parse_signature(input: &str) -> Result<SignatureBuilder, SignatureError> {
    let signature = SignatureParser::parse(Rule::signature, input)
        .map_err(Box::new)?
        .next()
        .ok_or_else(|| custom_error(input, "empty declaration"))?;

    let mut doc_lines = Vec::new();
    let mut builder: Option<SignatureBuilder> = None;

    for pair in signature.into_inner() {
        match pair.as_rule() {
            Rule::doc_comment => {
                let text = pair.into_inner().next().map_or("", |t| t.as_str());
                doc_lines.push(text.strip_prefix(' ').unwrap_or(text).trim_end());
            }
            Rule::identifier => builder = Some(SignatureBuilder::new(pair.as_str())),
            Rule::params => {
                let current = builder
                    .take()
                    .ok_or_else(|| custom_error(input, "parameters before function name"))?;
                builder = Some(parse_params(current, pair, input)?);
            }
            _ => {}
        }
    }

    let mut builder = builder.ok_or_else(|| custom_error(input, "missing function name"))?;
    if !doc_lines.is_empty() {
        builder = builder.doc(doc_lines.join("\n"));
    }
    Ok(builder)
}

fn parse_params(
    mut builder: SignatureBuilder,
    pair: Pair<Rule>,
    input: &str,
) -> Result<SignatureBuilder, SignatureError> {
    for param in pair.into_inner() {
        let rule = param.as_rule();
        let mut inner = param.into_inner();
        let name = inner
            .next()
            .map(|p| p.as_str().to_string())
            .ok_or_else(|| custom_error(input, "parameter without a name"))?;

        builder = match rule {
            Rule::variadic_param => builder.variadic(name),
            Rule::keywords_param => builder.keywords(name),
            Rule::regular_param => match inner.next() {
                Some(default) => builder.param_with_default(name, literal::literal_value(default)?),
                None => builder.param(name),
            },
            _ => builder,
        };
    }
    Ok(builder)
}

fn custom_error(input: &str, message: &str) -> SignatureError {
    let position = pest::Position::from_start(input);
    SignatureError::Syntax(Box::new(pest::error::Error::new_from_pos(
        pest::error::ErrorVariant::CustomError {
            message: message.to_string(),
        },
        position,
    )))
}
