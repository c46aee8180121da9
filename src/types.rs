use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};

/// Result of evaluating a literal expression. Fully owned by the caller;
/// nothing aliases back into the token stream or the AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Insertion-ordered pair list; duplicate keys overwrite in place.
    /// Structural keys (lists, dicts, ...) are allowed.
    Dict(Vec<(Value, Value)>),
    DateTime(NaiveDateTime),
    Duration(Duration),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::DateTime(_) => "datetime",
            Value::Duration(_) => "timedelta",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look a key up in a dict value (linear scan, structural equality).
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Dict(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "'")?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\'' => write!(f, "\\'")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            '\0' => write!(f, "\\0")?,
            _ => write!(f, "{}", c)?,
        }
    }
    write!(f, "'")
}

/// Renders the literal text form that `data_eval` accepts back, so that
/// `data_eval(v.to_string())` reproduces `v`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => {
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{}.0", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Str(s) => write_quoted(f, s),
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::DateTime(dt) => {
                write!(f, "datetime({}, {}, {}", dt.year(), dt.month(), dt.day())?;
                let micro = dt.and_utc().timestamp_subsec_micros();
                if micro != 0 {
                    write!(
                        f,
                        ", {}, {}, {}, {}",
                        dt.hour(),
                        dt.minute(),
                        dt.second(),
                        micro
                    )?;
                } else if dt.hour() != 0 || dt.minute() != 0 || dt.second() != 0 {
                    write!(f, ", {}, {}, {}", dt.hour(), dt.minute(), dt.second())?;
                }
                write!(f, ")")
            }
            Value::Duration(d) => {
                let (days, seconds, micros) = match d.num_microseconds() {
                    Some(us) => {
                        let days = us.div_euclid(86_400_000_000);
                        let rem = us.rem_euclid(86_400_000_000);
                        (days, rem / 1_000_000, rem % 1_000_000)
                    }
                    None => {
                        let secs = d.num_seconds();
                        (secs.div_euclid(86_400), secs.rem_euclid(86_400), 0)
                    }
                };
                write!(f, "timedelta({}, {}, {})", days, seconds, micros)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn renders_literal_forms() {
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Float(-2.0).to_string(), "-2.0");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(
            Value::Tuple(vec![Value::Int(1)]).to_string(),
            "(1,)"
        );
        assert_eq!(
            Value::Dict(vec![(Value::Str("a".into()), Value::Int(1))]).to_string(),
            "{'a': 1}"
        );
        assert_eq!(Value::Str("it's".into()).to_string(), r"'it\'s'");
    }

    #[test]
    fn renders_datetime_and_duration() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "datetime(2024, 1, 1)");
        let dt2 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(
            Value::DateTime(dt2).to_string(),
            "datetime(2024, 1, 1, 10, 30, 0)"
        );
        assert_eq!(
            Value::Duration(Duration::seconds(2)).to_string(),
            "timedelta(0, 2, 0)"
        );
        assert_eq!(
            Value::Duration(Duration::seconds(-1)).to_string(),
            "timedelta(-1, 86399, 0)"
        );
    }
}
