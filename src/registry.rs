use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;

use crate::error::DataEvalError;
use crate::types::Value;

/// A whitelisted constructor: positional argument values in, one value out.
pub type Constructor = fn(&[Value]) -> Result<Value, DataEvalError>;

/// The closed set of names a call expression may invoke. Immutable after
/// construction; plain `fn` pointers, so sharing across threads is free.
pub struct Registry {
    entries: HashMap<&'static str, Constructor>,
}

impl Registry {
    /// The stock whitelist: exactly `datetime` and `timedelta`.
    pub fn builtin() -> Self {
        Self::with_entries(&[
            ("datetime", construct_datetime as Constructor),
            ("timedelta", construct_timedelta as Constructor),
        ])
    }

    pub fn with_entries(entries: &[(&'static str, Constructor)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// Case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<Constructor> {
        self.entries.get(name).copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

lazy_static! {
    /// Process-wide registry, built once and only ever read.
    pub static ref BUILTIN: Registry = Registry::builtin();
}

fn int_component(name: &str, what: &str, value: i64, min: i64, max: i64) -> Result<i64, DataEvalError> {
    if value < min || value > max {
        return Err(DataEvalError::construction(
            name,
            format!("{} {} out of range", what, value),
        ));
    }
    Ok(value)
}

/// `datetime(year, month, day[, hour[, minute[, second[, microsecond]]]])`
fn construct_datetime(args: &[Value]) -> Result<Value, DataEvalError> {
    if args.len() < 3 || args.len() > 7 {
        return Err(DataEvalError::construction(
            "datetime",
            format!("expected 3 to 7 arguments (got {})", args.len()),
        ));
    }
    let mut parts = [0i64; 7];
    for (i, arg) in args.iter().enumerate() {
        parts[i] = match arg {
            Value::Int(n) => *n,
            other => {
                return Err(DataEvalError::construction(
                    "datetime",
                    format!("argument {} must be an int (got {})", i + 1, other.type_name()),
                ))
            }
        };
    }
    let year = int_component("datetime", "year", parts[0], i32::MIN as i64, i32::MAX as i64)?;
    let month = int_component("datetime", "month", parts[1], 1, 12)?;
    let day = int_component("datetime", "day", parts[2], 1, 31)?;
    let hour = int_component("datetime", "hour", parts[3], 0, 23)?;
    let minute = int_component("datetime", "minute", parts[4], 0, 59)?;
    let second = int_component("datetime", "second", parts[5], 0, 59)?;
    let micro = int_component("datetime", "microsecond", parts[6], 0, 999_999)?;

    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).ok_or_else(|| {
        DataEvalError::construction(
            "datetime",
            format!("invalid calendar date {}-{}-{}", year, month, day),
        )
    })?;
    let dt = date
        .and_hms_micro_opt(hour as u32, minute as u32, second as u32, micro as u32)
        .ok_or_else(|| DataEvalError::construction("datetime", "invalid time of day"))?;
    Ok(Value::DateTime(dt))
}

/// `timedelta([days[, seconds[, microseconds[, milliseconds[, minutes[,
/// hours[, weeks]]]]]]])` — positional order matches the conventional
/// elapsed-duration constructor; ints and floats both accepted.
fn construct_timedelta(args: &[Value]) -> Result<Value, DataEvalError> {
    const FACTORS_US: [f64; 7] = [
        86_400e6,  // days
        1e6,       // seconds
        1.0,       // microseconds
        1e3,       // milliseconds
        60e6,      // minutes
        3_600e6,   // hours
        604_800e6, // weeks
    ];
    if args.len() > 7 {
        return Err(DataEvalError::construction(
            "timedelta",
            format!("expected at most 7 arguments (got {})", args.len()),
        ));
    }
    let mut total_us = 0.0f64;
    for (i, arg) in args.iter().enumerate() {
        let n = match arg {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            other => {
                return Err(DataEvalError::construction(
                    "timedelta",
                    format!(
                        "argument {} must be a number (got {})",
                        i + 1,
                        other.type_name()
                    ),
                ))
            }
        };
        total_us += n * FACTORS_US[i];
    }
    if !total_us.is_finite() || total_us.abs() >= i64::MAX as f64 {
        return Err(DataEvalError::construction("timedelta", "duration out of range"));
    }
    Ok(Value::Duration(Duration::microseconds(total_us.round() as i64)))
}
