//! Mango-style selector matching for the in-memory ledger.
//!
//! Supported: implicit equality, nested field objects, dotted paths,
//! `$eq $ne $gt $gte $lt $lte $in $exists` on fields and `$and $or` at any
//! level. Query envelopes may carry `limit` and `skip`; other envelope keys
//! such as `use_index` are accepted and ignored.

use crate::domain::errors::LedgerError;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A parsed rich query.
#[derive(Debug, Clone)]
pub struct Query {
    selector: Selector,
    pub limit: Option<usize>,
    pub skip: usize,
}

impl Query {
    pub fn parse(text: &str) -> Result<Self, LedgerError> {
        let value: Value = serde_json::from_str(text).map_err(|e| invalid(format!("{e}")))?;
        let envelope = value
            .as_object()
            .ok_or_else(|| invalid("query must be a JSON object"))?;
        let selector = envelope
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| invalid("query must contain a \"selector\" object"))?;

        Ok(Self {
            selector: Selector::parse_object(selector)?,
            limit: count(envelope, "limit")?,
            skip: count(envelope, "skip")?.unwrap_or(0),
        })
    }

    /// Whether a stored document satisfies the selector.
    pub fn matches(&self, document: &Value) -> bool {
        self.selector.matches(document)
    }
}

#[derive(Debug, Clone)]
enum Selector {
    And(Vec<Selector>),
    Or(Vec<Selector>),
    Field { path: Vec<String>, condition: Condition },
}

#[derive(Debug, Clone)]
enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Exists(bool),
    All(Vec<Condition>),
    Nested(Box<Selector>),
}

impl Selector {
    fn parse_object(object: &Map<String, Value>) -> Result<Self, LedgerError> {
        let mut clauses = Vec::with_capacity(object.len());
        for (key, value) in object {
            let clause = match key.as_str() {
                "$and" => Selector::And(Self::parse_list(key, value)?),
                "$or" => Selector::Or(Self::parse_list(key, value)?),
                op if op.starts_with('$') => {
                    return Err(invalid(format!("unsupported combination operator {op}")))
                }
                field => Selector::Field {
                    path: field.split('.').map(str::to_string).collect(),
                    condition: Condition::parse(value)?,
                },
            };
            clauses.push(clause);
        }
        Ok(Selector::And(clauses))
    }

    fn parse_list(op: &str, value: &Value) -> Result<Vec<Selector>, LedgerError> {
        let items = value
            .as_array()
            .ok_or_else(|| invalid(format!("{op} expects an array of selectors")))?;
        items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| invalid(format!("{op} expects an array of selectors")))
                    .and_then(Self::parse_object)
            })
            .collect()
    }

    fn matches(&self, document: &Value) -> bool {
        match self {
            Selector::And(clauses) => clauses.iter().all(|c| c.matches(document)),
            Selector::Or(clauses) => clauses.iter().any(|c| c.matches(document)),
            Selector::Field { path, condition } => condition.matches(lookup(document, path)),
        }
    }
}

impl Condition {
    fn parse(value: &Value) -> Result<Self, LedgerError> {
        let Some(object) = value.as_object() else {
            return Ok(Condition::Eq(value.clone()));
        };

        let operators = object.keys().filter(|k| k.starts_with('$')).count();
        if operators == 0 {
            // `{"a": {"b": 1}}` addresses the nested field `a.b`
            return Ok(Condition::Nested(Box::new(Selector::parse_object(object)?)));
        }
        if operators != object.len() {
            return Err(invalid("operators and field names cannot be mixed"));
        }

        let conditions = object
            .iter()
            .map(|(op, operand)| Self::parse_operator(op, operand))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Condition::All(conditions))
    }

    fn parse_operator(op: &str, operand: &Value) -> Result<Self, LedgerError> {
        Ok(match op {
            "$eq" => Condition::Eq(operand.clone()),
            "$ne" => Condition::Ne(operand.clone()),
            "$gt" => Condition::Gt(operand.clone()),
            "$gte" => Condition::Gte(operand.clone()),
            "$lt" => Condition::Lt(operand.clone()),
            "$lte" => Condition::Lte(operand.clone()),
            "$in" => Condition::In(
                operand
                    .as_array()
                    .ok_or_else(|| invalid("$in expects an array"))?
                    .clone(),
            ),
            "$exists" => Condition::Exists(
                operand
                    .as_bool()
                    .ok_or_else(|| invalid("$exists expects a boolean"))?,
            ),
            other => return Err(invalid(format!("unsupported operator {other}"))),
        })
    }

    fn matches(&self, field: Option<&Value>) -> bool {
        if let Condition::Exists(expected) = self {
            return field.is_some() == *expected;
        }
        if let Condition::All(conditions) = self {
            return conditions.iter().all(|c| c.matches(field));
        }
        let Some(field) = field else {
            return false;
        };

        match self {
            Condition::Eq(v) => json_eq(field, v),
            Condition::Ne(v) => !json_eq(field, v),
            Condition::Gt(v) => compare(field, v) == Some(Ordering::Greater),
            Condition::Gte(v) => matches!(
                compare(field, v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Condition::Lt(v) => compare(field, v) == Some(Ordering::Less),
            Condition::Lte(v) => matches!(
                compare(field, v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Condition::In(values) => values.iter().any(|v| json_eq(field, v)),
            Condition::Nested(selector) => selector.matches(field),
            Condition::Exists(_) | Condition::All(_) => false,
        }
    }
}

fn lookup<'v>(document: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter()
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between values of the same scalar kind; `None` across kinds.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn count(envelope: &Map<String, Value>, name: &str) -> Result<Option<usize>, LedgerError> {
    match envelope.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(format!("{name} must be a non-negative integer"))),
    }
}

fn invalid(message: impl Into<String>) -> LedgerError {
    LedgerError::InvalidQuery {
        message: message.into(),
    }
}
