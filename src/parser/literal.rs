//! Default-value literals.

use super::Rule;
use crate::signature::SignatureError;
use pest::iterators::Pair;
use serde_json::{Number, Value};

/// Convert a literal pair into the value stored as a parameter default.
pub(super) fn literal_value(pair: Pair<Rule>) -> Result<Value, SignatureError> {
    match pair.as_rule() {
        Rule::string => {
            let inner = pair.into_inner().next().map_or("", |p| p.as_str());
            Ok(Value::String(unescape(inner)))
        }
        Rule::number => number_value(&pair),
        Rule::boolean => Ok(Value::Bool(matches!(pair.as_str(), "true" | "True"))),
        Rule::null => Ok(Value::Null),
        _ => Err(invalid(&pair, "unsupported default value")),
    }
}

fn number_value(pair: &Pair<Rule>) -> Result<Value, SignatureError> {
    let text = pair.as_str();
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Value::Number(n.into()));
        }
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| invalid(pair, "number out of range"))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn invalid(pair: &Pair<Rule>, message: &str) -> SignatureError {
    SignatureError::Syntax(Box::new(pest::error::Error::new_from_span(
        pest::error::ErrorVariant::CustomError {
            message: message.to_string(),
        },
        pair.as_span(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
        assert_eq!(unescape("plain"), "plain");
    }
}
