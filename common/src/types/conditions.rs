use std::cmp::Ordering;

use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Comparator applied between a record property and a literal value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    #[strum(serialize = "eq")]
    Eq,
    #[strum(serialize = "ne")]
    Ne,
    #[strum(serialize = "lt")]
    Lt,
    #[strum(serialize = "le")]
    Le,
    #[strum(serialize = "gt")]
    Gt,
    #[strum(serialize = "ge")]
    Ge,
    #[strum(serialize = "in")]
    In,
}

/// Single comparator tuple; a filter is the logical AND of its conditions.
///
/// Property paths use `.` to traverse nested JSON-LD nodes, so
/// `entryObject.@type` reaches inside an entry's payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Condition {
    pub property: String,
    pub comparison: Comparison,
    pub value: Value,
}

impl Condition {
    pub fn new(property: impl Into<String>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Self {
            property: property.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Matches records where the property is absent or null.
    pub fn unset(property: impl Into<String>) -> Self {
        Self::new(property, Comparison::Eq, Value::Null)
    }

    /// Evaluate this condition against a JSON view of a record.
    pub fn matches(&self, record: &Value) -> bool {
        let resolved = lookup_path(record, &self.property);
        match self.comparison {
            Comparison::Eq => values_equal(resolved, &self.value),
            Comparison::Ne => !values_equal(resolved, &self.value),
            Comparison::Lt => ordered(resolved, &self.value)
                .is_some_and(|ordering| ordering == Ordering::Less),
            Comparison::Le => ordered(resolved, &self.value).is_some_and(|ordering| ordering != Ordering::Greater),
            Comparison::Gt => ordered(resolved, &self.value)
                .is_some_and(|ordering| ordering == Ordering::Greater),
            Comparison::Ge => {
                ordered(resolved, &self.value).is_some_and(|ordering| ordering != Ordering::Less)
            }
            Comparison::In => match (&self.value, resolved) {
                (Value::Array(candidates), Some(found)) => candidates.contains(found),
                _ => false,
            },
        }
    }
}

/// Resolve a dotted property path against a JSON node.
pub fn lookup_path<'a>(node: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = node;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn values_equal(resolved: Option<&Value>, expected: &Value) -> bool {
    match resolved {
        Some(found) => found == expected,
        None => expected.is_null(),
    }
}

fn ordered(resolved: Option<&Value>, expected: &Value) -> Option<Ordering> {
    compare_values(resolved?, expected)
}

/// Total comparison over the value kinds the filter grammar supports.
///
/// Strings that both parse as RFC 3339 timestamps compare as instants, so
/// date properties order correctly regardless of subsecond rendering.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => {
            if let (Ok(a), Ok(b)) = (
                OffsetDateTime::parse(a, &Rfc3339),
                OffsetDateTime::parse(b, &Rfc3339),
            ) {
                Some(a.cmp(&b))
            } else {
                Some(a.cmp(b))
            }
        }
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Sort key consumed by the entity stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub property: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[strum(serialize = "asc")]
    Asc,
    #[default]
    #[strum(serialize = "desc")]
    Desc,
}
