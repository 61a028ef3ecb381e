//! Strict default seeded from the environment
//!
//! Kept to a single test: the variable must be set before the default is
//! first read in this binary.

use chainable::{default_strict, wrap, ChainOptions, Value, STRICT_ENV_VAR};

#[test]
fn test_environment_seeds_default() {
    std::env::set_var(STRICT_ENV_VAR, " Off ");

    assert!(!default_strict());
    assert!(!ChainOptions::default().strict);

    let mut chain = wrap(Value::array([1]));
    chain.read("missing").unwrap();
    assert!(chain.chain_value_at(0).is_undefined());
}
