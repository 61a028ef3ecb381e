//! Value history ledger
//!
//! Append-only record of the value produced by each step of a chain.

use chainable_object::Value;
use serde::Serialize;

/// Ordered history of chain step results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<Value>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` and return its index
    pub fn append(&mut self, value: Value) -> usize {
        self.entries.push(value);
        self.entries.len() - 1
    }

    /// Entry at `index`, or `undefined` when out of range
    pub fn at(&self, index: usize) -> Value {
        self.get(index).cloned().unwrap_or(Value::Undefined)
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(index)
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&Value> {
        self.entries.last()
    }

    /// Iterate entries in recording order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.entries.iter()
    }

    /// Export the ledger as a JSON array
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.entries.iter().map(chainable_object::json::to_json).collect())
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_returns_stable_indices() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.append(Value::from(1)), 0);
        assert_eq!(ledger.append(Value::from("two")), 1);
        assert_eq!(ledger.append(Value::Undefined), 2);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.at(1), Value::from("two"));
        assert!(ledger.last().unwrap().is_undefined());
    }

    #[test]
    fn test_out_of_range_is_undefined() {
        let mut ledger = Ledger::new();
        ledger.append(Value::from(1));
        assert!(ledger.at(1).is_undefined());
        assert!(ledger.at(usize::MAX).is_undefined());
        assert!(ledger.get(5).is_none());
    }

    #[test]
    fn test_json_export() {
        let mut ledger = Ledger::new();
        ledger.append(Value::from(3));
        ledger.append(Value::array(["a", "b"]));
        ledger.append(Value::Undefined);
        ledger.append(Value::from(false));

        let expected = json!([3, ["a", "b"], null, false]);
        assert_eq!(ledger.to_json(), expected);
        assert_eq!(serde_json::to_value(&ledger).unwrap(), expected);
    }

    #[test]
    fn test_ledgers_holding_cycles_compare() {
        let cyclic = || {
            let arr = Value::array([1]);
            arr.as_object().unwrap().set_own("1", arr.clone()).unwrap();
            arr
        };
        let mut left = Ledger::new();
        left.append(cyclic());
        let mut right = Ledger::new();
        right.append(cyclic());
        assert_eq!(left, right);
    }
}
