//! Declarative form validation
//!
//! A `Schema` lists field paths and the rules each must satisfy. Forms are
//! validated through their JSON encoding, so the same schema works for any
//! `Serialize` form. Paths use dots for nesting and `[]` to apply rules to
//! every element of an array: `parameter_scores[].score`.
//!
//! Only `required` rejects a missing value. Every other rule skips fields
//! that are absent or null, which is how optional fields are expressed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

static NULL: Value = Value::Null;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone)]
enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    Email,
    Pattern(&'static Lazy<Regex>),
    Min(f64),
    Max(f64),
    OneOf(&'static [&'static str]),
    EndsWithAny(&'static [&'static str]),
    SameAs(&'static str),
}

#[derive(Debug, Clone)]
struct Check {
    rule: Rule,
    message: String,
}

/// Rules for one field path
#[derive(Debug, Clone)]
pub struct Field {
    path: String,
    checks: Vec<Check>,
}

impl Field {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            checks: Vec::new(),
        }
    }

    fn check(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.checks.push(Check {
            rule,
            message: message.into(),
        });
        self
    }

    /// Present, and not blank
    pub fn required(self, message: impl Into<String>) -> Self {
        self.check(Rule::Required, message)
    }

    /// At least `n` characters, or `n` elements for arrays
    pub fn min_len(self, n: usize, message: impl Into<String>) -> Self {
        self.check(Rule::MinLen(n), message)
    }

    pub fn max_len(self, n: usize, message: impl Into<String>) -> Self {
        self.check(Rule::MaxLen(n), message)
    }

    pub fn email(self, message: impl Into<String>) -> Self {
        self.check(Rule::Email, message)
    }

    /// Text must contain a match of `pattern`
    pub fn pattern(self, pattern: &'static Lazy<Regex>, message: impl Into<String>) -> Self {
        self.check(Rule::Pattern(pattern), message)
    }

    pub fn min(self, n: f64, message: impl Into<String>) -> Self {
        self.check(Rule::Min(n), message)
    }

    pub fn max(self, n: f64, message: impl Into<String>) -> Self {
        self.check(Rule::Max(n), message)
    }

    pub fn one_of(self, options: &'static [&'static str], message: impl Into<String>) -> Self {
        self.check(Rule::OneOf(options), message)
    }

    pub fn ends_with_any(self, suffixes: &'static [&'static str], message: impl Into<String>) -> Self {
        self.check(Rule::EndsWithAny(suffixes), message)
    }

    /// Equal to the value at another top-level field
    pub fn same_as(self, other: &'static str, message: impl Into<String>) -> Self {
        self.check(Rule::SameAs(other), message)
    }
}

/// Field errors keyed by concrete path, first failing rule's message only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless it already has one
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A set of field rules
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: &str, rules: impl FnOnce(Field) -> Field) -> Self {
        self.fields.push(rules(Field::new(path)));
        self
    }

    /// Validate a JSON document
    pub fn validate(&self, root: &Value) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            for (key, value) in resolve(root, &field.path) {
                for check in &field.checks {
                    if !passes(&check.rule, value, root) {
                        errors.add(key.clone(), check.message.clone());
                        break;
                    }
                }
            }
        }
        errors
    }

    /// Validate anything serializable through its JSON encoding
    pub fn validate_value<T: Serialize + ?Sized>(&self, form: &T) -> FieldErrors {
        match serde_json::to_value(form) {
            Ok(value) => self.validate(&value),
            Err(e) => {
                let mut errors = FieldErrors::new();
                errors.add("form", format!("Form could not be read: {}", e));
                errors
            }
        }
    }
}

/// Concrete `(key, value)` pairs a path refers to. Missing values resolve to
/// null so `required` can report them.
fn resolve<'a>(root: &'a Value, path: &str) -> Vec<(String, &'a Value)> {
    let mut current: Vec<(String, &'a Value)> = vec![(String::new(), root)];

    for segment in path.split('.') {
        let (name, each) = match segment.strip_suffix("[]") {
            Some(name) => (name, true),
            None => (segment, false),
        };

        let mut next = Vec::new();
        for (prefix, value) in current {
            let key = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            };
            let child = value.get(name).unwrap_or(&NULL);

            if each {
                if let Value::Array(items) = child {
                    for (i, item) in items.iter().enumerate() {
                        next.push((format!("{}.{}", key, i), item));
                    }
                }
            } else {
                next.push((key, child));
            }
        }
        current = next;
    }

    current
}

fn passes(rule: &Rule, value: &Value, root: &Value) -> bool {
    if let Rule::Required = rule {
        return match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        };
    }
    if value.is_null() {
        return true;
    }

    match rule {
        Rule::Required => true,
        Rule::MinLen(n) => length(value).map_or(true, |len| len >= *n),
        Rule::MaxLen(n) => length(value).map_or(true, |len| len <= *n),
        Rule::Email => value.as_str().map_or(false, |s| EMAIL.is_match(s)),
        Rule::Pattern(pattern) => value.as_str().map_or(false, |s| pattern.is_match(s)),
        Rule::Min(n) => value.as_f64().map_or(false, |v| v >= *n),
        Rule::Max(n) => value.as_f64().map_or(false, |v| v <= *n),
        Rule::OneOf(options) => value.as_str().map_or(false, |s| options.contains(&s)),
        Rule::EndsWithAny(suffixes) => value
            .as_str()
            .map_or(false, |s| suffixes.iter().any(|suffix| s.ends_with(suffix))),
        Rule::SameAs(other) => root.get(*other) == Some(value),
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}
