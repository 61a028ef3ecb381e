//! Strict and lenient member validation

use chainable::{wrap_with, ChainError, ChainOptions, ObjectError, Value};

#[test]
fn test_strict_rejects_unknown_member_before_recording() {
    let mut chain = wrap_with(Value::array([1, 2]), ChainOptions::strict());
    chain.call("push", &[3.into()]).unwrap();

    let err = chain.call("nope", &[]).unwrap_err();
    assert_eq!(
        err,
        ChainError::UnresolvableMember {
            member: "nope".to_string(),
            target: "Array".to_string(),
        }
    );
    assert_eq!(err.member(), Some("nope"));
    assert_eq!(chain.ledger().len(), 1);
}

#[test]
fn test_strict_failure_aborts_rest_of_chain() {
    let source = Value::array(Vec::<Value>::new());
    let mut chain = wrap_with(source.clone(), ChainOptions::strict());

    let result = chain
        .call("push", &[1.into()])
        .and_then(|c| c.read("missing"))
        .and_then(|c| c.call("push", &[2.into()]));

    assert!(matches!(result, Err(ChainError::UnresolvableMember { .. })));
    assert_eq!(chain.ledger().len(), 1);
    assert_eq!(source, Value::array([1]));
}

#[test]
fn test_lenient_reads_unknown_member_as_undefined() {
    let mut chain = wrap_with(Value::array([1]), ChainOptions::lenient());
    chain.read("nope").unwrap();

    assert_eq!(chain.ledger().len(), 1);
    assert!(chain.chain_value_at(0).is_undefined());
}

#[test]
fn test_new_members_need_lenient_mode() {
    let source = Value::object();

    let mut strict = wrap_with(source.clone(), ChainOptions::strict());
    assert!(matches!(
        strict.write("fresh", 1),
        Err(ChainError::UnresolvableMember { .. })
    ));

    let mut lenient = wrap_with(source.clone(), ChainOptions::lenient());
    lenient.write("fresh", 1).unwrap();
    assert_eq!(source.as_object().unwrap().get_own("fresh"), Some(Value::from(1)));

    // Once the member exists, strict handles accept it
    let mut strict = wrap_with(source, ChainOptions::strict());
    strict.read("fresh").unwrap();
    assert_eq!(strict.chain_value_at(0), Value::from(1));
}

#[test]
fn test_primitive_validated_against_original_chain() {
    let mut strict = wrap_with(5, ChainOptions::strict());
    let err = strict.read("length").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type error: member 'length' is not available on the capability chain of Number"
    );

    let mut lenient = wrap_with(5, ChainOptions::lenient());
    lenient.read("length").unwrap();
    assert!(lenient.chain_value_at(0).is_undefined());
}

#[test]
fn test_nullish_targets() {
    for source in [Value::Null, Value::Undefined] {
        let mut strict = wrap_with(source.clone(), ChainOptions::strict());
        let err = strict.read("toString").unwrap_err();
        assert!(matches!(err, ChainError::UnresolvableMember { ref target, .. } if target == source.type_name()));
        assert!(strict.chain_reference().is_same(&source));

        let mut lenient = wrap_with(source, ChainOptions::lenient());
        let err = lenient.read("toString").unwrap_err();
        assert!(matches!(err, ChainError::Operation(ObjectError::TypeError(_))));
        assert!(lenient.ledger().is_empty());
    }
}

#[test]
fn test_operation_errors_pass_through_unchanged() {
    let mut chain = wrap_with(5, ChainOptions::strict());
    let err = chain.call("toFixed", &[500.into()]).unwrap_err();

    assert_eq!(
        err,
        ChainError::Operation(ObjectError::RangeError(
            "toFixed() digits argument must be between 0 and 100".to_string()
        ))
    );
    assert_eq!(
        err.to_string(),
        "Range error: toFixed() digits argument must be between 0 and 100"
    );
    assert!(chain.ledger().is_empty());
}

#[test]
fn test_options_are_captured_per_handle() {
    let strict = wrap_with(Value::map(), ChainOptions::strict());
    let lenient = wrap_with(Value::map(), ChainOptions::lenient());
    assert!(strict.options().strict);
    assert!(!lenient.options().strict);
}
