//! Form validation and sanitization.
//!
//! A [`Pipeline`] is an ordered list of [`FieldRules`], each an ordered list
//! of [`Rule`]s. Running it over submitted form fields yields the sanitized
//! values plus at most one [`FieldError`] per field. Sanitizers keep running
//! after a failed check, so the value echoed back to the user is always the
//! sanitized one.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Raw `application/x-www-form-urlencoded` fields.
pub type FormInput = HashMap<String, String>;

const DEFAULT_MESSAGE: &str = "Invalid value";

/// A field value part-way through (or at the end of) its rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizedValue {
    Text(String),
    Date(NaiveDate),
    /// An optional field that was left empty.
    Absent,
}

impl SanitizedValue {
    fn as_text(&self) -> String {
        match self {
            SanitizedValue::Text(text) => text.clone(),
            SanitizedValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            SanitizedValue::Absent => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Strip leading and trailing whitespace.
    Trim,
    /// Require at least this many characters.
    MinLength(usize),
    /// Replace HTML-significant characters with entities.
    Escape,
    /// Require an ISO-8601 date (or date-time) and convert it to a date.
    Iso8601Date,
}

impl Rule {
    /// Apply the rule. A failed check hands back the value it was given.
    pub fn apply(self, value: SanitizedValue) -> Result<SanitizedValue, SanitizedValue> {
        match (self, value) {
            (Rule::Trim, SanitizedValue::Text(text)) => {
                Ok(SanitizedValue::Text(text.trim().to_string()))
            }
            (Rule::Escape, SanitizedValue::Text(text)) => Ok(SanitizedValue::Text(escape(&text))),
            (Rule::MinLength(min), SanitizedValue::Text(text)) => {
                if text.chars().count() >= min {
                    Ok(SanitizedValue::Text(text))
                } else {
                    Err(SanitizedValue::Text(text))
                }
            }
            (Rule::Iso8601Date, SanitizedValue::Text(text)) => match parse_iso8601_date(&text) {
                Some(date) => Ok(SanitizedValue::Date(date)),
                None => Err(SanitizedValue::Text(text)),
            },
            (_, other) => Ok(other),
        }
    }
}

/// The rule chain for one form field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: &'static str,
    message: &'static str,
    optional: bool,
    rules: Vec<Rule>,
}

impl FieldRules {
    /// Rules for `field`; any failed check reports `message`.
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            message,
            optional: false,
            rules: Vec::new(),
        }
    }

    /// Rules for `field` reporting a generic message.
    pub fn field(field: &'static str) -> Self {
        Self::new(field, DEFAULT_MESSAGE)
    }

    /// Skip the whole chain when the submitted value is missing or empty.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn trim(self) -> Self {
        self.rule(Rule::Trim)
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(Rule::MinLength(min))
    }

    pub fn escape(self) -> Self {
        self.rule(Rule::Escape)
    }

    pub fn iso8601_date(self) -> Self {
        self.rule(Rule::Iso8601Date)
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    fn run(&self, raw: Option<&str>) -> (SanitizedValue, Option<FieldError>) {
        let raw = raw.unwrap_or_default();
        if self.optional && raw.is_empty() {
            return (SanitizedValue::Absent, None);
        }

        let mut value = SanitizedValue::Text(raw.to_string());
        let mut failed = false;
        for rule in &self.rules {
            value = match rule.apply(value) {
                Ok(next) => next,
                Err(unchanged) => {
                    failed = true;
                    unchanged
                }
            };
        }

        let error = failed.then(|| FieldError {
            field: self.field.to_string(),
            message: self.message.to_string(),
            value: value.as_text(),
        });
        (value, error)
    }
}

/// A rejected field, shaped for redisplay next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: String,
}

/// Ordered field rule chains run in a single pass.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fields: Vec<FieldRules>,
}

impl Pipeline {
    pub fn new(fields: Vec<FieldRules>) -> Self {
        Self { fields }
    }

    pub fn run(&self, input: &FormInput) -> Validated {
        let mut values = HashMap::new();
        let mut errors = Vec::new();

        for rules in &self.fields {
            let (value, error) = rules.run(input.get(rules.field).map(String::as_str));
            values.insert(rules.field, value);
            errors.extend(error);
        }

        Validated { values, errors }
    }
}

/// Output of a [`Pipeline`] run.
#[derive(Debug, Clone)]
pub struct Validated {
    values: HashMap<&'static str, SanitizedValue>,
    errors: Vec<FieldError>,
}

impl Validated {
    /// Sanitized text for `field`; empty when absent or undeclared.
    pub fn text(&self, field: &str) -> String {
        self.values
            .get(field)
            .map(SanitizedValue::as_text)
            .unwrap_or_default()
    }

    /// Converted date for `field`, if it passed an ISO-8601 rule.
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        match self.values.get(field) {
            Some(SanitizedValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in declaration order, one per rejected field.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

/// Replace HTML-significant characters, plus `/`, `\` and backtick, with entities.
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Accepts `YYYY-MM-DD`, RFC 3339 date-times and zone-less
/// `YYYY-MM-DDTHH:MM[:SS]`; date-times are truncated to their date.
pub fn parse_iso8601_date(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|date_time| date_time.date())
}
