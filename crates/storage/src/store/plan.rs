#![forbid(unsafe_code)]

use rusqlite::types::Value;
use serde_json::json;

/// One statement exactly as it was (or would have been) submitted to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedStatement {
    pub sql: String,
    pub params: Option<Vec<Value>>,
}

impl PlannedStatement {
    pub(crate) fn bare(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            params: None,
        }
    }

    pub(crate) fn with_params(sql: String, params: Vec<Value>) -> Self {
        Self {
            sql,
            params: Some(params),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "sql": self.sql,
            "params": self
                .params
                .as_ref()
                .map(|params| params.iter().map(value_to_json).collect::<Vec<_>>()),
        })
    }
}

impl std::fmt::Display for PlannedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)?;
        let Some(params) = self.params.as_ref() else {
            return Ok(());
        };
        f.write_str("  -- [")?;
        for (index, value) in params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::Null => f.write_str("NULL")?,
                Value::Integer(v) => write!(f, "{v}")?,
                Value::Real(v) => write!(f, "{v}")?,
                Value::Text(v) => write!(f, "'{}'", v.replace('\'', "''"))?,
                Value::Blob(v) => write!(f, "x'{}'", hex(v))?,
            }
        }
        f.write_str("]")
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(v) => json!(v),
        Value::Real(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(v) => json!(v),
        Value::Blob(v) => json!(hex(v)),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
