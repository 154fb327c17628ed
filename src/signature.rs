//! Callable signatures.
//!
//! Rust has no way to ask a function for its parameter names at runtime, so a
//! callable is described up front, either with [`SignatureBuilder`] or by
//! parsing a textual declaration with [`Signature::parse`]. The result is an
//! immutable [`Signature`] that the argument spec and the dispatcher read from.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Names that mark an implicit leading receiver.
pub const RECEIVER_MARKERS: [&str; 2] = ["self", "cls"];

/// Reserved by the parsing engine for its help flag.
const RESERVED_NAMES: [&str; 1] = ["help"];

/// Function parameter definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub default_value: Option<Value>,
}

impl Parameter {
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// Errors raised while declaring a signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid signature: {0}")]
    Syntax(#[from] Box<pest::error::Error<crate::parser::Rule>>),

    #[error("'{0}' is not a valid parameter name")]
    InvalidName(String),

    #[error("duplicate argument '{name}' in function definition of {function}()")]
    DuplicateName { function: String, name: String },

    #[error("non-default argument '{name}' follows default argument in {function}()")]
    NonTrailingDefault { function: String, name: String },

    #[error("argument '{name}' follows the variadic collector in {function}()")]
    AfterVariadic { function: String, name: String },

    #[error("argument '{name}' follows the keyword collector in {function}()")]
    AfterKeywords { function: String, name: String },

    #[error("'{0}' is reserved for the help flag")]
    Reserved(String),
}

/// The parameter list of a wrapped callable.
///
/// Ordinary parameters keep their declaration order; the defaulted ones form a
/// contiguous suffix. A leading receiver (`self`/`cls`) stays in `params` but
/// is flagged and excluded from argument mapping and binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    name: String,
    doc: Option<String>,
    params: Vec<Parameter>,
    variadic: Option<String>,
    keywords: Option<String>,
    skips_receiver: bool,
}

impl Signature {
    pub fn builder(name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder::new(name)
    }

    /// Parse a textual declaration such as
    /// `fn main(apple, pear, banana = 9, *rest, **kwargs)`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text does not match the signature grammar or
    /// declares parameters in an order no function could have.
    pub fn parse(input: &str) -> Result<Self, SignatureError> {
        crate::parser::parse_signature(input)?.build()
    }

    /// Format as JSON for programmatic consumption
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Every ordinary parameter, receiver included.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn variadic(&self) -> Option<&str> {
        self.variadic.as_deref()
    }

    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn skips_receiver(&self) -> bool {
        self.skips_receiver
    }

    /// The stripped receiver name, if any.
    pub fn receiver(&self) -> Option<&str> {
        if self.skips_receiver {
            self.params.first().map(|p| p.name.as_str())
        } else {
            None
        }
    }

    /// Number of parameters in the positional prefix, receiver included.
    pub fn positional_count(&self) -> usize {
        let defaults = self.params.iter().filter(|p| p.has_default()).count();
        self.params.len() - defaults
    }

    /// Parameters without a default, receiver excluded.
    pub fn positional(&self) -> &[Parameter] {
        let start = usize::from(self.skips_receiver);
        &self.params[start..self.positional_count()]
    }

    /// Parameters with a default, in declaration order.
    pub fn defaulted(&self) -> &[Parameter] {
        &self.params[self.positional_count()..]
    }

    /// Ordinary parameters that take part in argument mapping.
    pub fn bindable(&self) -> &[Parameter] {
        &self.params[usize::from(self.skips_receiver)..]
    }
}

/// Builds a [`Signature`] one parameter at a time.
///
/// ```
/// use simple_cli_args::Signature;
///
/// let signature = Signature::builder("main")
///     .doc("Pick some fruit.")
///     .param("apple")
///     .param_with_default("banana", 9)
///     .variadic("rest")
///     .build()
///     .unwrap();
///
/// assert_eq!(signature.positional().len(), 1);
/// assert_eq!(signature.variadic(), Some("rest"));
/// ```
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    name: String,
    doc: Option<String>,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
enum Entry {
    Param(Parameter),
    Variadic(String),
    Keywords(String),
}

impl Entry {
    fn name(&self) -> &str {
        match self {
            Entry::Param(p) => &p.name,
            Entry::Variadic(name) | Entry::Keywords(name) => name,
        }
    }
}

impl SignatureBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.entries.push(Entry::Param(Parameter {
            name: name.into(),
            default_value: None,
        }));
        self
    }

    #[must_use]
    pub fn param_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.entries.push(Entry::Param(Parameter {
            name: name.into(),
            default_value: Some(default.into()),
        }));
        self
    }

    /// Catch-all positional collector (`*name`).
    #[must_use]
    pub fn variadic(mut self, name: impl Into<String>) -> Self {
        self.entries.push(Entry::Variadic(name.into()));
        self
    }

    /// Catch-all keyword collector (`**name`).
    #[must_use]
    pub fn keywords(mut self, name: impl Into<String>) -> Self {
        self.entries.push(Entry::Keywords(name.into()));
        self
    }

    /// Validate the declaration order and freeze the signature.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - a name is not an identifier, is repeated, or is `help`
    /// - a non-default parameter follows a defaulted one
    /// - an ordinary parameter follows the variadic collector
    /// - anything follows the keyword collector
    pub fn build(self) -> Result<Signature, SignatureError> {
        let function = self.name;
        let mut params: Vec<Parameter> = Vec::new();
        let mut variadic: Option<String> = None;
        let mut keywords: Option<String> = None;
        let mut seen: Vec<String> = Vec::new();

        for entry in self.entries {
            let name = entry.name().to_string();
            if !is_identifier(&name) {
                return Err(SignatureError::InvalidName(name));
            }
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(SignatureError::Reserved(name));
            }
            if seen.contains(&name) {
                return Err(SignatureError::DuplicateName { function, name });
            }
            if keywords.is_some() {
                return Err(SignatureError::AfterKeywords { function, name });
            }
            seen.push(name.clone());

            match entry {
                Entry::Param(param) => {
                    if variadic.is_some() {
                        return Err(SignatureError::AfterVariadic { function, name });
                    }
                    let after_default = params.last().is_some_and(Parameter::has_default);
                    if after_default && !param.has_default() {
                        return Err(SignatureError::NonTrailingDefault { function, name });
                    }
                    params.push(param);
                }
                Entry::Variadic(name) => {
                    if variadic.is_some() {
                        return Err(SignatureError::AfterVariadic { function, name });
                    }
                    variadic = Some(name);
                }
                Entry::Keywords(name) => keywords = Some(name),
            }
        }

        let skips_receiver = params
            .first()
            .is_some_and(|p| !p.has_default() && RECEIVER_MARKERS.contains(&p.name.as_str()));

        Ok(Signature {
            name: function,
            doc: self.doc,
            params,
            variadic,
            keywords,
            skips_receiver,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() -> Signature {
        Signature::builder("plain_method")
            .param("apple")
            .param("pear")
            .param_with_default("banana", 9)
            .variadic("args")
            .keywords("kwargs")
            .build()
            .unwrap()
    }

    #[test]
    fn test_to_json() {
        let parsed: Value = serde_json::from_str(&plain().to_json()).unwrap();
        assert_eq!(parsed["name"], "plain_method");
        assert_eq!(parsed["params"][0]["name"], "apple");
        assert_eq!(parsed["params"][0]["default_value"], Value::Null);
        assert_eq!(parsed["params"][2]["default_value"], 9);
        assert_eq!(parsed["variadic"], "args");
        assert_eq!(parsed["keywords"], "kwargs");
        assert_eq!(parsed["skips_receiver"], false);
    }

    #[test]
    fn test_prefix_suffix_split() {
        let sig = plain();
        assert_eq!(sig.positional_count(), 2);
        let positional: Vec<_> = sig.positional().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(positional, ["apple", "pear"]);
        assert_eq!(sig.defaulted().len(), 1);
        assert_eq!(sig.defaulted()[0].default_value, Some(json!(9)));
        assert_eq!(sig.variadic(), Some("args"));
        assert_eq!(sig.keywords(), Some("kwargs"));
        assert!(!sig.skips_receiver());
    }

    #[test]
    fn test_receiver_is_stripped() {
        let sig = Signature::builder("class_method")
            .param("self")
            .param("apple")
            .param_with_default("banana", 9)
            .build()
            .unwrap();
        assert!(sig.skips_receiver());
        assert_eq!(sig.receiver(), Some("self"));
        assert_eq!(sig.positional().len(), 1);
        assert_eq!(sig.positional()[0].name, "apple");
        assert_eq!(sig.bindable().len(), 2);
    }

    #[test]
    fn test_receiver_only_counts_in_first_position() {
        let sig = Signature::builder("odd")
            .param("apple")
            .param("cls")
            .build()
            .unwrap();
        assert!(!sig.skips_receiver());
        assert_eq!(sig.positional().len(), 2);
    }

    #[test]
    fn test_receiver_with_default_is_a_plain_parameter() {
        let sig = Signature::builder("odd")
            .param_with_default("self", "me")
            .build()
            .unwrap();
        assert!(!sig.skips_receiver());
        assert_eq!(sig.defaulted().len(), 1);
    }

    #[test]
    fn test_no_params() {
        let sig = Signature::builder("no_args_method").build().unwrap();
        assert!(sig.params().is_empty());
        assert!(sig.positional().is_empty());
        assert!(sig.defaulted().is_empty());
    }

    #[test]
    fn test_rejects_non_trailing_default() {
        let err = Signature::builder("f")
            .param_with_default("a", 1)
            .param("b")
            .build()
            .unwrap_err();
        assert!(matches!(err, SignatureError::NonTrailingDefault { ref name, .. } if name == "b"));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = Signature::builder("f")
            .param("a")
            .variadic("a")
            .build()
            .unwrap_err();
        assert!(matches!(err, SignatureError::DuplicateName { .. }));
    }

    #[test]
    fn test_rejects_param_after_variadic() {
        let err = Signature::builder("f")
            .variadic("rest")
            .param("a")
            .build()
            .unwrap_err();
        assert!(matches!(err, SignatureError::AfterVariadic { .. }));
    }

    #[test]
    fn test_rejects_anything_after_keywords() {
        let err = Signature::builder("f")
            .keywords("kw")
            .variadic("rest")
            .build()
            .unwrap_err();
        assert!(matches!(err, SignatureError::AfterKeywords { .. }));
    }

    #[test]
    fn test_rejects_bad_and_reserved_names() {
        let err = Signature::builder("f").param("1st").build().unwrap_err();
        assert!(matches!(err, SignatureError::InvalidName(_)));
        let err = Signature::builder("f").param("my-arg").build().unwrap_err();
        assert!(matches!(err, SignatureError::InvalidName(_)));
        let err = Signature::builder("f").param("help").build().unwrap_err();
        assert!(matches!(err, SignatureError::Reserved(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = Signature::builder("f")
            .param_with_default("a", 1)
            .param("b")
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "non-default argument 'b' follows default argument in f()"
        );
    }
}
