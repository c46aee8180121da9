use dataeval::{data_eval, Value};
use pretty_assertions::assert_eq;

#[test]
fn lists() {
    assert_eq!(data_eval("[]").unwrap(), Value::List(vec![]));
    assert_eq!(
        data_eval("[1, 2, -3, -4.41]").unwrap(),
        Value::List(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(-3),
            Value::Float(-4.41),
        ])
    );
    assert_eq!(
        data_eval("['foo', 'bar', None, True, False]").unwrap(),
        Value::List(vec![
            Value::Str("foo".into()),
            Value::Str("bar".into()),
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
        ])
    );
    // trailing comma
    assert_eq!(
        data_eval("[1, 2,]").unwrap(),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn tuples() {
    assert_eq!(data_eval("()").unwrap(), Value::Tuple(vec![]));
    assert_eq!(
        data_eval("(1, 2)").unwrap(),
        Value::Tuple(vec![Value::Int(1), Value::Int(2)])
    );
    assert_eq!(
        data_eval("(1,)").unwrap(),
        Value::Tuple(vec![Value::Int(1)])
    );
    assert_eq!(
        data_eval("('1', '2', None, True, False)").unwrap(),
        Value::Tuple(vec![
            Value::Str("1".into()),
            Value::Str("2".into()),
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
        ])
    );
}

#[test]
fn dicts() {
    assert_eq!(data_eval("{}").unwrap(), Value::Dict(vec![]));
    assert_eq!(
        data_eval("{1: 2, 'a': 'b', 'd': -1, 'e': -2.02}").unwrap(),
        Value::Dict(vec![
            (Value::Int(1), Value::Int(2)),
            (Value::Str("a".into()), Value::Str("b".into())),
            (Value::Str("d".into()), Value::Int(-1)),
            (Value::Str("e".into()), Value::Float(-2.02)),
        ])
    );
    assert_eq!(
        data_eval("{'foo': 'bar', '1': None, 1: True, 0: False}").unwrap(),
        Value::Dict(vec![
            (Value::Str("foo".into()), Value::Str("bar".into())),
            (Value::Str("1".into()), Value::Null),
            (Value::Int(1), Value::Bool(true)),
            (Value::Int(0), Value::Bool(false)),
        ])
    );
}

#[test]
fn dict_lookup_helper() {
    let d = data_eval("{'a': 'b', 1: True}").unwrap();
    assert_eq!(
        d.get(&Value::Str("a".into())),
        Some(&Value::Str("b".into()))
    );
    assert_eq!(d.get(&Value::Int(1)), Some(&Value::Bool(true)));
    assert_eq!(d.get(&Value::Int(2)), None);
}

#[test]
fn nested_collections() {
    assert_eq!(
        data_eval("{'xs': [1, (2, 3)], 'm': {'k': None}}").unwrap(),
        Value::Dict(vec![
            (
                Value::Str("xs".into()),
                Value::List(vec![
                    Value::Int(1),
                    Value::Tuple(vec![Value::Int(2), Value::Int(3)]),
                ])
            ),
            (
                Value::Str("m".into()),
                Value::Dict(vec![(Value::Str("k".into()), Value::Null)])
            ),
        ])
    );
}

#[test]
fn children_evaluate_in_order() {
    let v = data_eval("[datetime(2024, 1, 1), datetime(2024, 1, 2)]").unwrap();
    match v {
        Value::List(items) => assert_eq!(items.len(), 2),
        other => panic!("expected list, got {:?}", other),
    }
}
