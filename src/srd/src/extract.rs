//! Field extraction from semi-structured source records.
//!
//! Source documents are loosely typed: fields go missing, carry the wrong
//! JSON type, or sit inside a list where only the first element matters.
//! [`Record`] exposes typed accessors keyed by JSON pointer (RFC 6901) and
//! reports what it found as a [`Field`]. The caller chooses the default, so
//! every fallback is an explicit branch at the call site.

use serde_json::{Map, Value};

/// Maximum stored length of unbounded text fields, in characters
pub const TEXT_LIMIT: usize = 500;

/// Separator used when flattening lists into a single column
pub const LIST_SEPARATOR: &str = ", ";

static NULL: Value = Value::Null;

/// Result of probing a record for one field
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// The field exists and has the expected shape
    Present(T),
    /// The field (or a wrapper object on its path) is missing or null
    Absent,
    /// The field exists but has an unusable shape
    Mistyped,
}

impl<T> Field<T> {
    /// Return the value, or `default` when absent or mistyped
    pub fn or(self, default: T) -> T {
        match self {
            Self::Present(v) => v,
            Self::Absent | Self::Mistyped => default,
        }
    }

    /// Return the value, or compute a default when absent or mistyped
    pub fn or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Self::Present(v) => v,
            Self::Absent | Self::Mistyped => default(),
        }
    }

    /// Try another probe when this one found nothing usable
    pub fn or_field(self, fallback: impl FnOnce() -> Field<T>) -> Field<T> {
        match self {
            Self::Present(v) => Self::Present(v),
            Self::Absent | Self::Mistyped => fallback(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Present(v) => Field::Present(f(v)),
            Self::Absent => Field::Absent,
            Self::Mistyped => Field::Mistyped,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent | Self::Mistyped => None,
        }
    }
}

impl<T: Default> Field<T> {
    pub fn or_default(self) -> T {
        self.or_else(T::default)
    }
}

/// Read-only view over one semi-structured document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    value: &'a Value,
}

impl<'a> Record<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// A record with no fields; every accessor reports `Absent`
    pub fn empty() -> Self {
        Self { value: &NULL }
    }

    /// The underlying JSON value
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Look up the raw value at `path`. Null counts as absent.
    pub fn raw(&self, path: &str) -> Field<&'a Value> {
        match self.value.pointer(path) {
            None | Some(Value::Null) => Field::Absent,
            Some(v) => Field::Present(v),
        }
    }

    /// Integer field. Floats truncate toward zero.
    pub fn int(&self, path: &str) -> Field<i32> {
        match self.raw(path) {
            Field::Present(Value::Number(n)) => number_to_i32(n),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    /// Integer field that may also be written as text with a leading
    /// number, such as `"30 ft."`
    pub fn leading_int(&self, path: &str) -> Field<i32> {
        match self.raw(path) {
            Field::Present(Value::Number(n)) => number_to_i32(n),
            Field::Present(Value::String(s)) => parse_leading_int(s),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    pub fn float(&self, path: &str) -> Field<f64> {
        match self.raw(path) {
            Field::Present(Value::Number(n)) => n.as_f64().map_or(Field::Mistyped, Field::Present),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    pub fn str(&self, path: &str) -> Field<&'a str> {
        match self.raw(path) {
            Field::Present(Value::String(s)) => Field::Present(s.as_str()),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    /// Owned string field, empty string when absent or mistyped
    pub fn text(&self, path: &str) -> String {
        self.str(path).map(str::to_string).or_default()
    }

    pub fn bool(&self, path: &str) -> Field<bool> {
        match self.raw(path) {
            Field::Present(Value::Bool(b)) => Field::Present(*b),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    /// Decimal rendered as text (`0.25` → `"0.25"`). Whole floats print
    /// as integers, so `1.0` and `1` both give `"1"`.
    pub fn decimal_text(&self, path: &str) -> Field<String> {
        match self.raw(path) {
            Field::Present(Value::Number(n)) => Field::Present(number_text(n)),
            Field::Present(Value::String(s)) => Field::Present(s.clone()),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    pub fn list(&self, path: &str) -> Field<Vec<Record<'a>>> {
        match self.raw(path) {
            Field::Present(Value::Array(items)) => {
                Field::Present(items.iter().map(Record::new).collect())
            }
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    /// First element of a list; the rest is ignored. Empty lists are absent.
    pub fn first(&self, path: &str) -> Field<Record<'a>> {
        match self.raw(path) {
            Field::Present(Value::Array(items)) => {
                items.first().map_or(Field::Absent, |v| Field::Present(Record::new(v)))
            }
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    pub fn object(&self, path: &str) -> Field<&'a Map<String, Value>> {
        match self.raw(path) {
            Field::Present(Value::Object(map)) => Field::Present(map),
            Field::Present(_) | Field::Mistyped => Field::Mistyped,
            Field::Absent => Field::Absent,
        }
    }

    /// Names from a list of `{"name": ...}` references (or bare strings),
    /// in source order. Entries without a usable name are dropped.
    pub fn names(&self, path: &str) -> Field<Vec<String>> {
        self.list(path).map(|items| {
            items
                .iter()
                .filter_map(|item| match item.value {
                    Value::String(s) => Some(s.clone()),
                    _ => item.str("/name").ok().map(str::to_string),
                })
                .collect()
        })
    }
}

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn number_to_i32(n: &serde_json::Number) -> Field<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).map_or(Field::Mistyped, Field::Present);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) => {
            Field::Present(f.trunc() as i32)
        }
        _ => Field::Mistyped,
    }
}

fn parse_leading_int(s: &str) -> Field<i32> {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return Field::Mistyped;
    }
    digits.parse().map_or(Field::Mistyped, Field::Present)
}

/// Cut `s` to at most `limit` characters. No word-boundary handling.
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Flatten a list into one column value
pub fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
