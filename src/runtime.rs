use crate::ast::{Expr, ExprKind};
use crate::error::DataEvalError;
use crate::registry::Registry;
use crate::types::Value;

/// Reduce an AST bottom-up into a `Value`, consulting the registry for call
/// nodes. Pure and stateless; the match is exhaustive, so a new `ExprKind`
/// variant cannot slip through unhandled.
pub fn eval(expr: &Expr, registry: &Registry) -> Result<Value, DataEvalError> {
    match &expr.kind {
        ExprKind::NoneLit => Ok(Value::Null),
        ExprKind::Bool(b) => Ok(Value::Bool(*b)),
        ExprKind::Int(i) => Ok(Value::Int(*i)),
        ExprKind::Float(x) => Ok(Value::Float(*x)),
        ExprKind::Str(s) => Ok(Value::Str(s.clone())),
        ExprKind::Neg(child) => match eval(child, registry)? {
            Value::Int(i) => i
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| DataEvalError::syntax("integer literal out of range", child.pos)),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(DataEvalError::unsafe_construct(
                "negation requires a numeric literal",
                other.type_name(),
                child.pos,
            )),
        },
        ExprKind::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval(item, registry)?);
            }
            Ok(Value::List(out))
        }
        ExprKind::Tuple(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval(item, registry)?);
            }
            Ok(Value::Tuple(out))
        }
        ExprKind::Dict(pairs) => {
            let mut out: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
            for (key_expr, value_expr) in pairs {
                let key = eval(key_expr, registry)?;
                let value = eval(value_expr, registry)?;
                // Later duplicates overwrite in place, keeping first-seen order.
                if let Some(slot) = out.iter_mut().find(|(k, _)| *k == key) {
                    slot.1 = value;
                } else {
                    out.push((key, value));
                }
            }
            Ok(Value::Dict(out))
        }
        ExprKind::Call { name, args } => {
            let constructor = registry.lookup(name).ok_or_else(|| {
                DataEvalError::unsafe_construct("callable not allowed", name.clone(), expr.pos)
            })?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg, registry)?);
            }
            constructor(&values)
        }
        ExprKind::Name(name) => match name.to_lowercase().as_str() {
            "none" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(DataEvalError::unsafe_construct(
                "strings must be quoted",
                name.clone(),
                expr.pos,
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::registry::BUILTIN;

    fn eval_src(src: &str) -> Result<Value, DataEvalError> {
        eval(&parse(&tokenize(src).unwrap())?, &BUILTIN)
    }

    #[test]
    fn keyword_names_are_case_insensitive() {
        assert_eq!(eval_src("none").unwrap(), Value::Null);
        assert_eq!(eval_src("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(eval_src("False").unwrap(), Value::Bool(false));
    }

    #[test]
    fn bare_identifier_is_unsafe() {
        assert!(matches!(
            eval_src("a"),
            Err(DataEvalError::UnsafeConstruct { .. })
        ));
    }

    #[test]
    fn unwhitelisted_call_is_unsafe() {
        assert!(matches!(
            eval_src("eval()"),
            Err(DataEvalError::UnsafeConstruct { .. })
        ));
    }

    #[test]
    fn duplicate_dict_keys_overwrite() {
        assert_eq!(
            eval_src("{1: 'a', 2: 'b', 1: 'c'}").unwrap(),
            Value::Dict(vec![
                (Value::Int(1), Value::Str("c".into())),
                (Value::Int(2), Value::Str("b".into())),
            ])
        );
    }

    #[test]
    fn structural_dict_keys_are_allowed() {
        assert_eq!(
            eval_src("{(1, 2): 'a'}").unwrap(),
            Value::Dict(vec![(
                Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
                Value::Str("a".into()),
            )])
        );
    }
}
