//! Declarative field rules and schemas.

use std::collections::BTreeMap;

use regex::Regex;

// == Field Pattern ==
/// Regular expression that must match a value in full.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: String,
    regex: Regex,
}

impl FieldPattern {
    /// Compiles `source`, anchoring it at both ends.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as written, without the added anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

// == Field Rule ==
/// Constraints attached to one form field.
///
/// `min_length`/`max_length` count characters for scalar values and items
/// for list values. `message` replaces every default error text.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<FieldPattern>,
    pub allowed: Option<Vec<String>>,
    pub message: Option<String>,
}

impl FieldRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn min(mut self, n: f64) -> Self {
        self.min = Some(n);
        self
    }

    pub fn max(mut self, n: f64) -> Self {
        self.max = Some(n);
        self
    }

    pub fn pattern(mut self, pattern: FieldPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Restricts values to `options`, kept in the given order.
    pub fn one_of<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn allows(&self, candidate: &str) -> bool {
        self.allowed
            .as_ref()
            .map_or(true, |options| options.iter().any(|o| o == candidate))
    }
}

// == Validation Schema ==
/// Field name to rule mapping. Only named fields are ever checked.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    rules: BTreeMap<String, FieldRule>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style rule registration.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
