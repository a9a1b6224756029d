//! Deep-merge semantics for structured resource data.

use serde_json::Value;

/// Deep-merges `incoming` into `existing`.
///
/// - Two objects merge key-wise and recurse; keys missing from `incoming`
///   are never removed.
/// - Two arrays merge element-wise by position: each incoming element merges
///   into the element at the same index, existing trailing elements are
///   retained, and equal elements are then de-duplicated keeping the first
///   occurrence. This is what makes accumulating list fields (the reference
///   contract's tag sets) behave as sets across merges.
/// - Any other pairing replaces the existing value with the incoming one.
///
/// # Example
///
/// ```
/// use proteus_store::deep_merge;
/// use serde_json::json;
///
/// let mut pet = json!({"Type": "dog", "Tags": ["fluffy", "brown"]});
/// deep_merge(&mut pet, json!({"Type": "cat", "Tags": ["furry"]}));
/// assert_eq!(pet, json!({"Type": "cat", "Tags": ["furry", "brown"]}));
/// ```
pub fn deep_merge(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(incoming)) => {
            merge_arrays(existing, incoming);
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// Element-wise positional merge, then de-duplication.
fn merge_arrays(existing: &mut Vec<Value>, incoming: Vec<Value>) {
    for (idx, value) in incoming.into_iter().enumerate() {
        if idx < existing.len() {
            deep_merge(&mut existing[idx], value);
        } else {
            existing.push(value);
        }
    }

    let mut deduped: Vec<Value> = Vec::with_capacity(existing.len());
    for value in existing.drain(..) {
        if !deduped.contains(&value) {
            deduped.push(value);
        }
    }
    *existing = deduped;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objects_merge_recursively() {
        let mut existing = json!({"Vet": {"Name": "Vet Name"}});
        deep_merge(
            &mut existing,
            json!({"Vet": {"Address": {"City": "New York"}}}),
        );

        assert_eq!(
            existing,
            json!({"Vet": {"Name": "Vet Name", "Address": {"City": "New York"}}})
        );
    }

    #[test]
    fn test_incoming_scalar_wins() {
        let mut existing = json!({"Type": "dog"});
        deep_merge(&mut existing, json!({"Type": "cat"}));
        assert_eq!(existing, json!({"Type": "cat"}));
    }

    #[test]
    fn test_missing_keys_are_never_removed() {
        let mut existing = json!({"Name": "Fido", "Type": "dog"});
        deep_merge(&mut existing, json!({"Type": "cat"}));
        assert_eq!(existing, json!({"Name": "Fido", "Type": "cat"}));
    }

    #[test]
    fn test_arrays_merge_positionally_retaining_tail() {
        let mut existing = json!(["fluffy", "brown"]);
        deep_merge(&mut existing, json!(["furry"]));
        assert_eq!(existing, json!(["furry", "brown"]));
    }

    #[test]
    fn test_arrays_deduplicate_after_merge() {
        let mut existing = json!(["brown", "fluffy"]);
        deep_merge(&mut existing, json!(["fluffy"]));
        assert_eq!(existing, json!(["fluffy"]));
    }

    #[test]
    fn test_longer_incoming_array_extends() {
        let mut existing = json!(["a"]);
        deep_merge(&mut existing, json!(["b", "c", "d"]));
        assert_eq!(existing, json!(["b", "c", "d"]));
    }

    #[test]
    fn test_array_of_objects_merges_per_index() {
        let mut existing = json!([{"Name": "Fido", "Type": "dog"}]);
        deep_merge(&mut existing, json!([{"Type": "cat"}]));
        assert_eq!(existing, json!([{"Name": "Fido", "Type": "cat"}]));
    }

    #[test]
    fn test_type_change_replaces() {
        let mut existing = json!({"Tags": ["fluffy"]});
        deep_merge(&mut existing, json!({"Tags": "none"}));
        assert_eq!(existing, json!({"Tags": "none"}));
    }

    #[test]
    fn test_full_pet_merge_scenario() {
        let mut pet = json!({
            "Name": "Fido",
            "Type": "dog",
            "Tags": ["fluffy", "brown"],
            "Vet": {"Name": "Vet Name"}
        });
        deep_merge(
            &mut pet,
            json!({
                "Name": "Fido",
                "Type": "cat",
                "Tags": ["furry"],
                "Vet": {
                    "Address": {"Street": "123 First St.", "City": "New York", "State": "NY", "ZipCode": 12345}
                }
            }),
        );

        assert_eq!(
            pet,
            json!({
                "Name": "Fido",
                "Type": "cat",
                "Tags": ["furry", "brown"],
                "Vet": {
                    "Name": "Vet Name",
                    "Address": {"Street": "123 First St.", "City": "New York", "State": "NY", "ZipCode": 12345}
                }
            })
        );
    }
}
