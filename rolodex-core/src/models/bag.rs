use serde_json::{Map, Value};

/// An open, loosely-typed field map as handed over by storage or callers.
pub type Bag = Map<String, Value>;

/// Converts any JSON value into a bag. Anything other than an object yields
/// an empty bag.
pub fn into_bag(value: Value) -> Bag {
    match value {
        Value::Object(map) => map,
        _ => Bag::new(),
    }
}

/// Writes a present typed slot into an outbound bag.
pub(crate) fn put<T: Into<Value>>(bag: &mut Bag, key: &str, value: Option<T>) {
    if let Some(value) = value {
        bag.insert(key.to_string(), value.into());
    }
}

/// Adds extras to an outbound bag. Keys already written by a typed slot win.
pub(crate) fn merge_extras(bag: &mut Bag, extras: &Bag) {
    for (key, value) in extras {
        bag.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

/// What a bag holds under one known key.
#[derive(Debug, PartialEq)]
pub(crate) enum Slot<T> {
    /// The key is not in the bag.
    Absent,
    /// The key is present and `null`.
    Null,
    Typed(T),
    /// The key is present but its value does not fit the typed slot.
    Mismatch(Value),
}

impl<T> Slot<T> {
    /// Writes this slot into `target`, keeping `extras` consistent: a key is
    /// either in its typed slot or in `extras`, never both.
    pub(crate) fn apply(self, key: &str, target: &mut Option<T>, extras: &mut Bag) {
        match self {
            Slot::Absent => {}
            Slot::Null => {
                *target = None;
                extras.remove(key);
            }
            Slot::Typed(value) => {
                *target = Some(value);
                extras.remove(key);
            }
            Slot::Mismatch(raw) => {
                *target = None;
                extras.insert(key.to_string(), raw);
            }
        }
    }
}

/// Removes `key` from the bag and reads it as an integer id.
pub(crate) fn take_i64(bag: &mut Bag, key: &str) -> Slot<i64> {
    match bag.remove(key) {
        None => Slot::Absent,
        Some(Value::Null) => Slot::Null,
        Some(value) => match value.as_i64() {
            Some(n) => Slot::Typed(n),
            None => Slot::Mismatch(value),
        },
    }
}

/// Removes `key` from the bag and reads it as a string.
pub(crate) fn take_string(bag: &mut Bag, key: &str) -> Slot<String> {
    match bag.remove(key) {
        None => Slot::Absent,
        Some(Value::Null) => Slot::Null,
        Some(Value::String(s)) => Slot::Typed(s),
        Some(value) => Slot::Mismatch(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> Bag {
        into_bag(value)
    }

    #[test]
    fn test_non_object_becomes_empty_bag() {
        assert!(into_bag(json!(null)).is_empty());
        assert!(into_bag(json!([1, 2])).is_empty());
        assert!(into_bag(json!("contact")).is_empty());
    }

    #[test]
    fn test_take_i64_reads_and_removes() {
        let mut b = bag(json!({"id": 7, "other": true}));
        assert_eq!(take_i64(&mut b, "id"), Slot::Typed(7));
        assert!(!b.contains_key("id"));
        assert!(b.contains_key("other"));
    }

    #[test]
    fn test_take_i64_keeps_mismatched_value() {
        let mut b = bag(json!({"id": "seven"}));
        assert_eq!(take_i64(&mut b, "id"), Slot::Mismatch(json!("seven")));
    }

    #[test]
    fn test_take_string_distinguishes_null_and_absent() {
        let mut b = bag(json!({"email": null}));
        assert_eq!(take_string(&mut b, "email"), Slot::Null);
        assert_eq!(take_string(&mut b, "email"), Slot::Absent);
    }

    #[test]
    fn test_merge_extras_never_overwrites_typed_keys() {
        let mut out = Bag::new();
        put(&mut out, "id", Some(7_i64));
        put(&mut out, "email", None::<String>);
        merge_extras(&mut out, &bag(json!({"id": "seven", "color": "red"})));

        assert_eq!(out.get("id"), Some(&json!(7)));
        assert_eq!(out.get("color"), Some(&json!("red")));
        assert!(!out.contains_key("email"));
    }

    #[test]
    fn test_apply_moves_key_between_slot_and_extras() {
        let mut target = Some(1_i64);
        let mut extras = Bag::new();

        Slot::<i64>::Mismatch(json!("x")).apply("id", &mut target, &mut extras);
        assert_eq!(target, None);
        assert_eq!(extras.get("id"), Some(&json!("x")));

        Slot::Typed(3).apply("id", &mut target, &mut extras);
        assert_eq!(target, Some(3));
        assert!(extras.get("id").is_none());

        Slot::<i64>::Absent.apply("id", &mut target, &mut extras);
        assert_eq!(target, Some(3));

        Slot::<i64>::Null.apply("id", &mut target, &mut extras);
        assert_eq!(target, None);
    }
}
