//! Explicit call values and their binding to parameter names.

use crate::signature::Signature;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Positional and keyword values handed to a wrapped callable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Call {
    pub args: Vec<Value>,
    pub kwargs: Vec<(String, Value)>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.push((name.into(), value.into()));
        self
    }

    /// A call with no values at all asks for the live command line.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

/// Errors raised when call values do not fit a signature.
#[derive(Debug, Error, PartialEq)]
pub enum BindError {
    #[error("{function}() takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        function: String,
        expected: usize,
        given: usize,
    },

    #[error("{function}() got multiple values for argument '{name}'")]
    MultipleValues { function: String, name: String },

    #[error("{function}() got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { function: String, name: String },

    #[error("{function}() missing {}", missing(.names))]
    Missing { function: String, names: Vec<String> },
}

fn missing(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    let plural = if names.len() == 1 { "" } else { "s" };
    format!("{} required argument{plural}: {}", names.len(), quoted.join(", "))
}

/// Call values bound to the parameter names of a [`Signature`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    values: Vec<(String, Value)>,
    rest: Vec<Value>,
    extra: BTreeMap<String, Value>,
}

impl Arguments {
    /// Bind `call` against `signature`.
    ///
    /// Positional values fill ordinary parameters in order and spill into the
    /// variadic collector; keyword values fill parameters by name and spill
    /// into the keyword collector; anything still unfilled takes its default.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - There are more positional values than parameters and no collector
    /// - A parameter receives both a positional and a keyword value
    /// - A keyword names no parameter and there is no keyword collector
    /// - A parameter without a default receives no value
    pub fn bind(signature: &Signature, call: Call) -> Result<Self, BindError> {
        let function = signature.name().to_string();
        let params = signature.bindable();
        let mut slots: Vec<Option<Value>> = vec![None; params.len()];
        let mut rest = Vec::new();
        let mut extra = BTreeMap::new();

        let given = call.args.len();
        for (index, value) in call.args.into_iter().enumerate() {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(value);
            } else if signature.variadic().is_some() {
                rest.push(value);
            } else {
                return Err(BindError::TooManyPositional {
                    function,
                    expected: params.len(),
                    given,
                });
            }
        }

        for (name, value) in call.kwargs {
            match params.iter().position(|p| p.name == name) {
                Some(index) if slots[index].is_some() => {
                    return Err(BindError::MultipleValues { function, name });
                }
                Some(index) => slots[index] = Some(value),
                None if signature.keywords().is_some() => {
                    extra.insert(name, value);
                }
                None => return Err(BindError::UnexpectedKeyword { function, name }),
            }
        }

        let mut values = Vec::with_capacity(params.len());
        let mut missing = Vec::new();
        for (param, slot) in params.iter().zip(slots) {
            match slot.or_else(|| param.default_value.clone()) {
                Some(value) => values.push((param.name.clone(), value)),
                None => missing.push(param.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(BindError::Missing {
                function,
                names: missing,
            });
        }

        log::debug!(
            "{function}(): bound {} parameters, {} extra positional, {} extra keyword",
            values.len(),
            rest.len(),
            extra.len()
        );
        Ok(Self {
            values,
            rest,
            extra,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The value of `name` if it is text.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Values absorbed by the variadic collector.
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Text values absorbed by the variadic collector.
    pub fn rest_strs(&self) -> Vec<&str> {
        self.rest.iter().filter_map(Value::as_str).collect()
    }

    /// Keyword values absorbed by the keyword collector.
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Bound parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() -> Signature {
        Signature::parse("fn plain_method(apple, pear, banana=9, *args, **kwargs)").unwrap()
    }

    #[test]
    fn test_bind_positional_with_default() {
        let args = Arguments::bind(&plain(), Call::new().arg("app").arg("pea")).unwrap();
        assert_eq!(args.get_str("apple"), Some("app"));
        assert_eq!(args.get_str("pear"), Some("pea"));
        assert_eq!(args.get("banana"), Some(&json!(9)));
        assert!(args.rest().is_empty());
        assert!(args.extra().is_empty());
    }

    #[test]
    fn test_bind_surplus_goes_to_collectors() {
        let call = Call::new()
            .arg("app")
            .arg("pea")
            .arg("ban")
            .arg("lem")
            .arg("pin")
            .kwarg("colour", "green");
        let args = Arguments::bind(&plain(), call).unwrap();
        assert_eq!(args.get_str("banana"), Some("ban"));
        assert_eq!(args.rest_strs(), ["lem", "pin"]);
        assert_eq!(args.extra().get("colour"), Some(&json!("green")));
    }

    #[test]
    fn test_bind_keywords() {
        let call = Call::new()
            .kwarg("pear", "pea")
            .kwarg("apple", "app")
            .kwarg("banana", 3);
        let args = Arguments::bind(&plain(), call).unwrap();
        let order: Vec<_> = args.iter().map(|(n, _)| n).collect();
        assert_eq!(order, ["apple", "pear", "banana"]);
        assert_eq!(args.get("banana"), Some(&json!(3)));
    }

    #[test]
    fn test_bind_skips_receiver() {
        let sig = Signature::parse("fn class_method(self, apple, banana = 9)").unwrap();
        let args = Arguments::bind(&sig, Call::new().arg("app")).unwrap();
        assert_eq!(args.get("self"), None);
        assert_eq!(args.get_str("apple"), Some("app"));
    }

    #[test]
    fn test_bind_errors() {
        let sig = Signature::parse("fn f(a, b = 1)").unwrap();

        let err = Arguments::bind(&sig, Call::new().arg(1).arg(2).arg(3)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "f() takes 2 positional arguments but 3 were given"
        );

        let err = Arguments::bind(&sig, Call::new().arg(1).kwarg("a", 2)).unwrap_err();
        assert_eq!(err.to_string(), "f() got multiple values for argument 'a'");

        let err = Arguments::bind(&sig, Call::new().arg(1).kwarg("zzz", 2)).unwrap_err();
        assert_eq!(err.to_string(), "f() got an unexpected keyword argument 'zzz'");

        let err = Arguments::bind(&sig, Call::new().kwarg("b", 2)).unwrap_err();
        assert_eq!(err.to_string(), "f() missing 1 required argument: 'a'");
    }

    #[test]
    fn test_missing_lists_every_name() {
        let sig = Signature::parse("fn f(a, b, c)").unwrap();
        let err = Arguments::bind(&sig, Call::new()).unwrap_err();
        assert_eq!(
            err,
            BindError::Missing {
                function: "f".into(),
                names: vec!["a".into(), "b".into(), "c".into()],
            }
        );
        assert_eq!(err.to_string(), "f() missing 3 required arguments: 'a', 'b', 'c'");
    }

    #[test]
    fn test_call_is_empty() {
        assert!(Call::new().is_empty());
        assert!(!Call::new().arg("x").is_empty());
        assert!(!Call::new().kwarg("x", 1).is_empty());
    }
}
