//! End-to-end chains over the built-in containers and primitives

use chainable::{wrap, ChainResult, Function, Member, Value, GET_CHAIN_REFERENCE};

fn double() -> Value {
    Value::Function(Function::anonymous(|args| {
        Ok(Value::from(args[0].as_number().unwrap_or(f64::NAN) * 2.0))
    }))
}

fn sum() -> Value {
    Value::Function(Function::anonymous(|args| {
        let acc = args[0].as_number().unwrap_or(0.0);
        let next = args[1].as_number().unwrap_or(0.0);
        Ok(Value::from(acc + next))
    }))
}

#[test]
fn test_array_sequence() -> ChainResult<()> {
    let source = Value::array([1, 2, 3, 4, 5]);
    let mut chain = wrap(source.clone());

    chain
        .call("push", &[6.into()])?
        .call("push", &[7.into()])?
        .call("push", &[8.into()])?
        .call("push", &[9.into()])?
        .call("push", &[0.into()])?
        .call("shift", &[])?
        .call("pop", &[])?
        .read("length")?
        .call("map", &[double()])?
        .call("reduce", &[sum(), 0.into()])?;

    assert_eq!(chain.ledger().len(), 10);
    assert_eq!(chain.chain_value_at(0), Value::from(6));
    assert_eq!(chain.chain_value_at(4), Value::from(10));
    assert_eq!(chain.chain_value_at(5), Value::from(1));
    assert_eq!(chain.chain_value_at(6), Value::from(0));
    assert_eq!(chain.chain_value_at(7), Value::from(8));
    assert_eq!(chain.chain_value_at(8), Value::array([4, 6, 8, 10, 12, 14, 16, 18]));
    assert_eq!(chain.chain_value_at(9), Value::from(44));

    // Mutations land on the caller's array
    assert!(chain.chain_reference().is_same(&source));
    assert_eq!(source, Value::array([2, 3, 4, 5, 6, 7, 8, 9]));
    Ok(())
}

#[test]
fn test_key_value_store() -> ChainResult<()> {
    let source = Value::map();
    let mut chain = wrap(source.clone());

    chain
        .call("set", &["key1".into(), "val1".into()])?
        .call("set", &["key2".into(), "val2".into()])?
        .call("set", &["key3".into(), "val3".into()])?
        .read("size")?
        .call("get", &["key1".into()])?
        .call("delete", &["key1".into()])?
        .call("has", &["key1".into()])?
        .read("size")?;

    // set returns the store itself
    assert!(chain.chain_value_at(0).is_same(&source));
    assert_eq!(chain.chain_value_at(3), Value::from(3));
    assert_eq!(chain.chain_value_at(4), Value::from("val1"));
    assert_eq!(chain.chain_value_at(5), Value::from(true));
    assert_eq!(chain.chain_value_at(6), Value::from(false));
    assert_eq!(chain.chain_value_at(7), Value::from(2));
    Ok(())
}

#[test]
fn test_map_keys_and_values_in_insertion_order() -> ChainResult<()> {
    let mut chain = wrap(Value::map_from([("b", 2), ("a", 1)]));
    chain
        .call("set", &["c".into(), 3.into()])?
        .call("keys", &[])?
        .call("values", &[])?;

    assert_eq!(chain.chain_value_at(1), Value::array(["b", "a", "c"]));
    assert_eq!(chain.chain_value_at(2), Value::array([2, 1, 3]));
    Ok(())
}

#[test]
fn test_unique_membership() -> ChainResult<()> {
    let mut chain = wrap(Value::set_from(["val0"]));

    chain
        .call("add", &["val1".into()])?
        .call("add", &["val2".into()])?
        .read("size")?
        .call("has", &["val1".into()])?
        .call("delete", &["val1".into()])?
        .call("has", &["val1".into()])?
        .call("clear", &[])?
        .read("size")?;

    assert_eq!(chain.chain_value_at(2), Value::from(3));
    assert_eq!(chain.chain_value_at(3), Value::from(true));
    assert_eq!(chain.chain_value_at(4), Value::from(true));
    assert_eq!(chain.chain_value_at(5), Value::from(false));
    assert!(chain.chain_value_at(6).is_undefined());
    assert_eq!(chain.chain_value_at(7), Value::from(0));
    Ok(())
}

#[test]
fn test_weak_key_value_store() -> ChainResult<()> {
    let key1 = Value::object();
    let key2 = Value::object();
    let key3 = Value::object();
    let mut chain = wrap(Value::weak_map());

    chain
        .call("set", &[key1.clone(), "val1".into()])?
        .call("set", &[key2.clone(), "val2".into()])?
        .call("set", &[key3.clone(), "val3".into()])?
        .call("get", &[key1.clone()])?
        .call("delete", &[key1.clone()])?
        .call("has", &[key1.clone()])?
        .call("has", &[key2.clone()])?;

    assert_eq!(chain.chain_value_at(3), Value::from("val1"));
    assert_eq!(chain.chain_value_at(4), Value::from(true));
    assert_eq!(chain.chain_value_at(5), Value::from(false));
    assert_eq!(chain.chain_value_at(6), Value::from(true));

    // Keys compare by identity, not structure
    chain.call("has", &[Value::object()])?;
    assert_eq!(chain.chain_value_at(7), Value::from(false));
    Ok(())
}

#[test]
fn test_number_normalization() -> ChainResult<()> {
    let mut chain = wrap(5);

    chain
        .call("toFixed", &[2.into()])?
        .call("valueOf", &[])?
        .call("toString", &[])?;

    assert_eq!(chain.chain_value_at(0), Value::from("5.00"));
    assert_eq!(chain.chain_value_at(1), Value::from(5));
    assert_eq!(chain.chain_value_at(2), Value::from("5"));

    // The original primitive comes back, not its boxed form
    let reference = chain.chain_reference();
    assert!(reference.is_primitive());
    assert!(reference.is_same(&Value::from(5)));
    Ok(())
}

#[test]
fn test_string_normalization() -> ChainResult<()> {
    let mut chain = wrap("chain");

    chain
        .read("length")?
        .call("toUpperCase", &[])?
        .call("charAt", &[0.into()])?
        .read("1")?;

    assert_eq!(chain.chain_value_at(0), Value::from(5));
    assert_eq!(chain.chain_value_at(1), Value::from("CHAIN"));
    assert_eq!(chain.chain_value_at(2), Value::from("c"));
    assert_eq!(chain.chain_value_at(3), Value::from("h"));
    assert_eq!(chain.chain_reference().as_str(), Some("chain"));
    Ok(())
}

#[test]
fn test_boolean_normalization() -> ChainResult<()> {
    let mut chain = wrap(false);
    chain.call("toString", &[])?.call("valueOf", &[])?;

    assert_eq!(chain.chain_value_at(0), Value::from("false"));
    assert_eq!(chain.chain_value_at(1), Value::from(false));
    Ok(())
}

#[test]
fn test_introspection_does_not_record() -> ChainResult<()> {
    let mut chain = wrap(Value::array([1]));
    chain.call("push", &[2.into()])?;

    for _ in 0..3 {
        assert_eq!(chain.chain_value_at(0), Value::from(2));
        assert!(chain.chain_value_at(1).is_undefined());
    }
    match chain.get(GET_CHAIN_REFERENCE)? {
        Member::Reference(value) => assert_eq!(*value, Value::array([1, 2])),
        other => panic!("expected reference, got {:?}", other),
    }
    assert_eq!(chain.ledger().len(), 1);
    Ok(())
}

#[test]
fn test_handle_is_reusable_across_statements() -> ChainResult<()> {
    let mut chain = wrap(Value::array(Vec::<Value>::new()));
    chain.call("push", &["a".into()])?;
    chain.call("push", &["b".into()])?;
    chain.call("join", &["-".into()])?;

    assert_eq!(chain.chain_value_at(2), Value::from("a-b"));
    assert_eq!(
        chain.ledger().to_json(),
        serde_json::json!([1, 2, "a-b"])
    );
    Ok(())
}

#[test]
fn test_self_containing_array_joins() -> ChainResult<()> {
    let arr = Value::array([1, 2]);
    let mut chain = wrap(arr.clone());
    chain.call("push", &[arr.clone()])?.call("join", &[])?;

    assert_eq!(chain.chain_value_at(1), Value::from("1,2,"));
    // Structural comparison against a separately built cycle terminates
    let twin = Value::array([1, 2]);
    twin.as_object().unwrap().set_own("2", twin.clone()).unwrap();
    assert_eq!(*chain.chain_reference(), twin);
    assert_eq!(chain.ledger().get(0), Some(&Value::from(3)));
    Ok(())
}

#[test]
fn test_oversized_requests_fail_the_step() {
    let mut text = wrap("abc");
    let err = text.call("repeat", &[Value::from(1e18)]).unwrap_err();
    assert_eq!(err.to_string(), "Range error: Invalid string length");
    assert!(text.ledger().is_empty());

    let arr = Value::array([1]);
    let mut chain = wrap(arr.clone());
    let err = chain.write("length", 4e9).unwrap_err();
    assert_eq!(err.to_string(), "Range error: Invalid array length");
    assert!(chain.ledger().is_empty());
    assert_eq!(arr, Value::array([1]));
}
