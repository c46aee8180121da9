//! Evaluate a literal data expression string — constants, nested
//! lists/tuples, dicts, signed numbers, plus whitelisted `datetime` /
//! `timedelta` constructors — without ever invoking a general-purpose
//! interpreter. Anything else (arithmetic, attribute access, arbitrary
//! calls) is rejected.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod runtime;
pub mod types;

pub use ast::{Expr, ExprKind};
pub use error::DataEvalError;
pub use lexer::Pos;
pub use registry::{Constructor, Registry, BUILTIN};
pub use types::Value;

/// Input to [`data_eval`]: either source text, or data that is already
/// structured and only needs the dict pass-through.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Text(String),
    Data(Value),
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::Text(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::Text(s)
    }
}

impl From<Value> for Source {
    fn from(v: Value) -> Self {
        Source::Data(v)
    }
}

fn normalize(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse source text into the literal AST without evaluating it.
pub fn parse(source: &str) -> Result<Expr, DataEvalError> {
    let normalized = normalize(source);
    let tokens = lexer::tokenize(&normalized)?;
    parser::parse(&tokens)
}

/// Evaluate a literal data expression against the stock whitelist.
///
/// Already-structured dict input passes through unchanged; any other
/// non-text input is rejected with `InvalidInput`.
pub fn data_eval(source: impl Into<Source>) -> Result<Value, DataEvalError> {
    data_eval_with(source, &BUILTIN)
}

/// Same pipeline with an injected callable whitelist.
pub fn data_eval_with(
    source: impl Into<Source>,
    registry: &Registry,
) -> Result<Value, DataEvalError> {
    match source.into() {
        Source::Data(Value::Dict(pairs)) => Ok(Value::Dict(pairs)),
        Source::Data(other) => Err(DataEvalError::InvalidInput {
            got: other.type_name(),
        }),
        Source::Text(text) => {
            let normalized = normalize(&text);
            let tokens = lexer::tokenize(&normalized)?;
            let expr = parser::parse(&tokens)?;
            runtime::eval(&expr, registry)
        }
    }
}

/// Parse a JSON document into a [`Value`] (objects become dicts with string
/// keys), so callers holding pre-parsed data can use the pass-through
/// instead of re-serializing to expression text.
pub fn value_from_json(json: &str) -> Result<Value, DataEvalError> {
    let parsed: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        DataEvalError::syntax(
            format!("invalid JSON: {}", e),
            Pos::new(e.line() as u32, e.column() as u32),
        )
    })?;
    Ok(json_to_value(parsed))
}

fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => Value::Dict(
            map.into_iter()
                .map(|(k, v)| (Value::Str(k), json_to_value(v)))
                .collect(),
        ),
    }
}
