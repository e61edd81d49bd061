//! # Safe serializer.
//!
//! Converts one logging argument into a [`SafeValue`]: depth- and
//! size-bounded, cycle-free, with every string sanitized.
//!
//! ## Traversal
//! ```text
//! serialize_argument(v)
//!   ├─ undefined / null / bool / number ─► as is
//!   ├─ string                           ─► sanitize
//!   └─ container ─► clone_value(v, depth = 0, seen = {})
//!        ├─ depth > max_depth        ─► "[Max Depth Reached]"
//!        ├─ identity ∈ seen          ─► "[Circular Reference]"
//!        ├─ array  ─► first max_items, each at depth + 1 (rest dropped)
//!        └─ object ─► first max_keys,  each at depth + 1
//!                     ├─ key failure ─► "[Error accessing property]"
//!                     └─ more keys   ─► "..." = "[N more properties]"
//!   any other failure ─► "[<type>] <string form>"
//! ```
//!
//! ## Rules
//! - `seen` lives for one top-level argument only and is never pruned, so a
//!   reference shared by two branches of the same argument is reported as
//!   circular the second time.
//! - `seen` holds a handle to every visited container until the argument is
//!   done, so an address cannot be reused by a value a host object builds on
//!   the fly.
//! - Sequences carry no omission marker; mappings do.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::CaptureError;
use crate::sanitize::sanitize;
use crate::value::{
    omitted_summary, SafeValue, Value, CIRCULAR_REFERENCE, ERROR_ACCESSING_PROPERTY,
    MAX_DEPTH_REACHED, OMITTED_KEY,
};

/// Bounded, cycle-safe argument cloner.
#[derive(Clone, Debug)]
pub struct Serializer {
    max_depth: usize,
    max_items: usize,
    max_keys: usize,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Serializer {
    /// Creates a serializer using the limits of `cfg`.
    pub fn new(cfg: &Config) -> Self {
        Self {
            max_depth: cfg.max_depth,
            max_items: cfg.max_items_clamped(),
            max_keys: cfg.max_keys_clamped(),
        }
    }

    /// Serializes every argument of one call, each with its own visited set.
    pub fn serialize_args(&self, args: &[Value]) -> Vec<SafeValue> {
        args.iter().map(|a| self.serialize_argument(a)).collect()
    }

    /// Serializes one argument. Never fails; always terminates.
    ///
    /// # Example
    /// ```
    /// use logpeek::{Object, SafeValue, Serializer, Value};
    ///
    /// let obj = Object::new();
    /// obj.set("self", obj.clone());
    ///
    /// let out = Serializer::default().serialize_argument(&Value::from(obj));
    /// assert_eq!(out.get("self"), Some(&SafeValue::from("[Circular Reference]")));
    /// ```
    pub fn serialize_argument(&self, value: &Value) -> SafeValue {
        match value {
            Value::Undefined => SafeValue::Undefined,
            Value::Null => SafeValue::Null,
            Value::Bool(b) => SafeValue::Bool(*b),
            Value::Number(n) => SafeValue::Number(*n),
            Value::String(s) => SafeValue::String(sanitize(s)),
            _ => {
                let mut seen = HashMap::new();
                match self.clone_value(value, 0, &mut seen) {
                    Ok(safe) => safe,
                    Err(source) => {
                        let err = CaptureError::Serialization {
                            type_name: value.type_of().to_string(),
                            reason: source.to_string(),
                        };
                        tracing::debug!(error = %err, label = err.as_label(), "argument serialized as fallback tag");
                        SafeValue::String(fallback_tag(value))
                    }
                }
            }
        }
    }

    fn clone_value(
        &self,
        value: &Value,
        depth: usize,
        seen: &mut HashMap<usize, Value>,
    ) -> Result<SafeValue, CaptureError> {
        if depth > self.max_depth {
            return Ok(SafeValue::string(MAX_DEPTH_REACHED));
        }
        if let Some(id) = value.identity() {
            if seen.contains_key(&id) {
                return Ok(SafeValue::string(CIRCULAR_REFERENCE));
            }
            seen.insert(id, value.clone());
        }

        match value {
            Value::Undefined => Ok(SafeValue::Undefined),
            Value::Null => Ok(SafeValue::Null),
            Value::Bool(b) => Ok(SafeValue::Bool(*b)),
            Value::Number(n) => Ok(SafeValue::Number(*n)),
            Value::String(s) => Ok(SafeValue::String(sanitize(s))),
            Value::Array(arr) => {
                let items = arr
                    .snapshot(self.max_items)
                    .iter()
                    .map(|item| self.clone_value(item, depth + 1, seen))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SafeValue::List(items))
            }
            Value::Object(obj) => {
                let (entries, total) = obj.snapshot(self.max_keys);
                let mut out = Vec::with_capacity(entries.len() + 1);
                for (key, item) in entries {
                    let safe = self
                        .clone_value(&item, depth + 1, seen)
                        .unwrap_or_else(|_| SafeValue::string(ERROR_ACCESSING_PROPERTY));
                    out.push((key, safe));
                }
                self.push_summary(&mut out, total);
                Ok(SafeValue::Map(out))
            }
            Value::Host(host) => {
                let keys = host.keys()?;
                let total = keys.len();
                let mut out = Vec::with_capacity(self.max_keys.min(total) + 1);
                for key in keys.into_iter().take(self.max_keys) {
                    let safe = host
                        .get(&key)
                        .map_err(CaptureError::from)
                        .and_then(|item| self.clone_value(&item, depth + 1, seen))
                        .unwrap_or_else(|_| SafeValue::string(ERROR_ACCESSING_PROPERTY));
                    out.push((key, safe));
                }
                self.push_summary(&mut out, total);
                Ok(SafeValue::Map(out))
            }
        }
    }

    fn push_summary(&self, out: &mut Vec<(String, SafeValue)>, total: usize) {
        if total > self.max_keys {
            out.push((
                OMITTED_KEY.to_string(),
                SafeValue::String(omitted_summary(total - self.max_keys)),
            ));
        }
    }
}

/// `"[<type>] <string form>"` for values that could not be cloned.
fn fallback_tag(value: &Value) -> String {
    let form = match value {
        Value::Host(host) => host.describe(),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    };
    format!("[{}] {}", value.type_of(), form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyError;
    use crate::value::{Array, HostObject, Object};

    fn ser(v: &Value) -> SafeValue {
        Serializer::default().serialize_argument(v)
    }

    struct Flaky;

    impl HostObject for Flaky {
        fn keys(&self) -> Result<Vec<String>, PropertyError> {
            Ok(vec!["ok".into(), "secret".into(), "after".into()])
        }

        fn get(&self, key: &str) -> Result<Value, PropertyError> {
            match key {
                "secret" => Err(PropertyError::new(key, "getter threw")),
                _ => Ok(Value::from(key)),
            }
        }
    }

    /// Builds a fresh object on every read.
    struct Computed;

    impl HostObject for Computed {
        fn keys(&self) -> Result<Vec<String>, PropertyError> {
            Ok(vec!["a".into(), "b".into(), "c".into()])
        }

        fn get(&self, _key: &str) -> Result<Value, PropertyError> {
            Ok(Value::object([("x", 1)]))
        }
    }

    struct Opaque;

    impl HostObject for Opaque {
        fn type_name(&self) -> &str {
            "socket"
        }

        fn keys(&self) -> Result<Vec<String>, PropertyError> {
            Err(PropertyError::new("", "revoked proxy"))
        }

        fn get(&self, key: &str) -> Result<Value, PropertyError> {
            Err(PropertyError::new(key, "revoked proxy"))
        }

        fn describe(&self) -> String {
            "Socket<closed>".into()
        }
    }

    #[test]
    fn primitives_pass_through() {
        assert_eq!(ser(&Value::Null), SafeValue::Null);
        assert_eq!(ser(&Value::Undefined), SafeValue::Undefined);
        assert_eq!(ser(&Value::from(2.5)), SafeValue::Number(2.5));
        assert_eq!(ser(&Value::from(false)), SafeValue::Bool(false));
        assert_eq!(ser(&Value::from("\x1b[31mRed text\x1b[0m")), SafeValue::from("Red text"));
    }

    #[test]
    fn self_reference_yields_cycle_sentinel() {
        let obj = Object::new();
        obj.set("name", "test");
        obj.set("self", obj.clone());

        let out = ser(&Value::from(obj));
        assert_eq!(out.get("name"), Some(&SafeValue::from("test")));
        assert_eq!(out.get("self"), Some(&SafeValue::from(CIRCULAR_REFERENCE)));
    }

    #[test]
    fn visited_set_is_scoped_per_argument() {
        let shared = Value::object([("x", 1)]);
        let s = Serializer::default();
        let out = s.serialize_args(&[shared.clone(), shared.clone()]);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[0].get("x"), Some(&SafeValue::Number(1.0)));
    }

    #[test]
    fn repeated_reference_within_one_argument_is_circular() {
        let shared = Value::object([("x", 1)]);
        let out = ser(&Value::array([shared.clone(), shared]));
        let items = out.as_list().unwrap();
        assert!(items[0].as_map().is_some());
        assert_eq!(items[1], SafeValue::from(CIRCULAR_REFERENCE));
    }

    #[test]
    fn mapping_keeps_ten_keys_and_summarizes_the_rest() {
        let obj = Object::new();
        for i in 0..15 {
            obj.set(format!("k{i}"), i);
        }
        let out = ser(&Value::from(obj));
        let entries = out.as_map().unwrap();
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[9].0, "k9");
        assert_eq!(entries[10], (OMITTED_KEY.to_string(), SafeValue::from("[5 more properties]")));
    }

    #[test]
    fn mapping_at_limit_has_no_summary() {
        let obj = Object::new();
        for i in 0..10 {
            obj.set(format!("k{i}"), i);
        }
        assert_eq!(ser(&Value::from(obj)).as_map().unwrap().len(), 10);
    }

    #[test]
    fn sequence_is_truncated_silently() {
        let arr = Array::from_vec((0..10_000).map(Value::from).collect());
        let out = ser(&Value::from(arr));
        let items = out.as_list().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[9], SafeValue::Number(9.0));
    }

    #[test]
    fn depth_is_bounded() {
        let root = Object::new();
        let mut current = root.clone();
        for _ in 0..100 {
            let next = Object::new();
            current.set("nested", next.clone());
            current = next;
        }
        let out = ser(&Value::from(root));
        let d3 = out
            .get("nested")
            .and_then(|v| v.get("nested"))
            .and_then(|v| v.get("nested"))
            .unwrap();
        assert_eq!(d3.get("nested"), Some(&SafeValue::from(MAX_DEPTH_REACHED)));
    }

    #[test]
    fn primitives_below_the_limit_are_replaced_too() {
        let out = ser(&Value::array([Value::array([Value::array([Value::array([1])])])]));
        let innermost = out.as_list().unwrap()[0].as_list().unwrap()[0].as_list().unwrap()[0]
            .as_list()
            .unwrap();
        assert_eq!(innermost[0], SafeValue::from(MAX_DEPTH_REACHED));
    }

    #[test]
    fn nested_strings_are_sanitized() {
        let out = ser(&Value::object([("msg", "%cbold%c")]));
        assert_eq!(out.get("msg"), Some(&SafeValue::from("bold")));
    }

    #[test]
    fn failing_property_only_affects_its_key() {
        let out = ser(&Value::host(Flaky));
        assert_eq!(out.get("ok"), Some(&SafeValue::from("ok")));
        assert_eq!(out.get("secret"), Some(&SafeValue::from(ERROR_ACCESSING_PROPERTY)));
        assert_eq!(out.get("after"), Some(&SafeValue::from("after")));
    }

    #[test]
    fn computed_host_values_are_not_cycles() {
        let out = ser(&Value::host(Computed));
        for key in ["a", "b", "c"] {
            let entry = out.get(key).unwrap_or_else(|| panic!("missing {key}"));
            assert_eq!(entry.get("x"), Some(&SafeValue::Number(1.0)), "{key}: {entry}");
        }
    }

    #[test]
    fn unlistable_host_falls_back_to_tag() {
        assert_eq!(ser(&Value::host(Opaque)), SafeValue::from("[socket] Socket<closed>"));
    }

    #[test]
    fn unlistable_host_nested_in_object_is_an_access_error() {
        let out = ser(&Value::object([("sock", Value::host(Opaque))]));
        assert_eq!(out.get("sock"), Some(&SafeValue::from(ERROR_ACCESSING_PROPERTY)));
    }

    #[test]
    fn custom_limits_apply() {
        let cfg = Config {
            max_depth: 0,
            max_items: 2,
            ..Config::default()
        };
        let out = Serializer::new(&cfg).serialize_argument(&Value::array([1, 2, 3]));
        assert_eq!(
            out,
            SafeValue::List(vec![
                SafeValue::from(MAX_DEPTH_REACHED),
                SafeValue::from(MAX_DEPTH_REACHED)
            ])
        );
    }
}
