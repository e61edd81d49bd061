//! # Dynamic argument model.
//!
//! [`Value`] is what callers hand to the logging facility. Containers are
//! reference types: cloning an [`Array`] or an [`Object`] clones the handle, not
//! the contents, so identity (and therefore cycles) behaves like in a dynamic
//! host.
//!
//! ## Rules
//! - Objects keep their own keys in insertion order; re-setting a key keeps
//!   its original position.
//! - Readers take a snapshot of a container and release the lock before
//!   descending, so a container that contains itself can be walked without
//!   re-entering its lock.
//! - Reference cycles built from `Array`/`Object` handles are never freed;
//!   break them with [`Object::remove`] / [`Array::clear`] when that matters.
//!
//! ## Example
//! ```rust
//! use logpeek::{Object, Value};
//!
//! let user = Object::new();
//! user.set("name", "ada");
//! user.set("self", user.clone());
//!
//! let v = Value::from(user.clone());
//! assert_eq!(v.type_of(), "object");
//! assert!(user.get("self").and_then(|s| s.identity()) == v.identity());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::PropertyError;

/// Externally-backed object inspected through fallible accessors.
///
/// Implement it for values whose properties are computed (getters, proxies,
/// foreign handles). A failing [`HostObject::get`] only affects that key; a
/// failing [`HostObject::keys`] makes the whole value fall back to a textual tag.
///
/// Implementations report failures through `Result` and must not panic.
pub trait HostObject: Send + Sync {
    /// Dynamic type name used in fallback tags.
    fn type_name(&self) -> &str {
        "object"
    }

    /// Own enumerable keys, in a stable order.
    fn keys(&self) -> Result<Vec<String>, PropertyError>;

    /// Reads one property.
    fn get(&self, key: &str) -> Result<Value, PropertyError>;

    /// Best-effort string form.
    fn describe(&self) -> String {
        "[object Object]".to_string()
    }
}

/// One argument of a logging call.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number (all numerics are widened to `f64`).
    Number(f64),
    /// Text.
    String(String),
    /// Shared, mutable sequence.
    Array(Array),
    /// Shared, mutable mapping.
    Object(Object),
    /// Externally-backed object.
    Host(Arc<dyn HostObject>),
}

impl Value {
    /// Builds an object value from key/value pairs.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let obj = Object::new();
        for (k, v) in entries {
            obj.set(k, v);
        }
        Value::Object(obj)
    }

    /// Builds an array value from items.
    pub fn array<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Array(Array::from_vec(items.into_iter().map(Into::into).collect()))
    }

    /// Wraps a host object.
    pub fn host(host: impl HostObject + 'static) -> Self {
        Value::Host(Arc::new(host))
    }

    /// Dynamic type name, following the conventional `typeof` table.
    pub fn type_of(&self) -> &str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Host(h) => h.type_name(),
        }
    }

    /// Identity of a reference value; `None` for primitives.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.identity()),
            Value::Object(o) => Some(o.identity()),
            Value::Host(h) => Some(Arc::as_ptr(h) as *const () as usize),
            _ => None,
        }
    }

    /// Returns the string slice for [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::inspect::inspect(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::inspect::inspect_nested(self))
    }
}

/// Shared, mutable sequence handle.
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing items.
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Appends an item.
    pub fn push(&self, item: impl Into<Value>) {
        self.0.write().push(item.into());
    }

    /// Removes every item.
    pub fn clear(&self) {
        self.0.write().clear();
    }

    /// Returns the item at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// True if the array holds no items.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Clones the first `limit` items (handles only) out of the lock.
    pub fn snapshot(&self, limit: usize) -> Vec<Value> {
        self.0.read().iter().take(limit).cloned().collect()
    }

    /// Address-based identity of the shared storage.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// True if both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared, mutable mapping handle with insertion-ordered own keys.
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<Vec<(String, Value)>>>);

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, keeping its position if it already exists.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.write();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Removes `key` and returns its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut entries = self.0.write();
        let pos = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(pos).1)
    }

    /// Own keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.read().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Number of own keys.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// True if the object has no own keys.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Clones the first `limit` entries out of the lock, plus the total key count.
    pub fn snapshot(&self, limit: usize) -> (Vec<(String, Value)>, usize) {
        let entries = self.0.read();
        (entries.iter().take(limit).cloned().collect(), entries.len())
    }

    /// Address-based identity of the shared storage.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// True if both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

// ---- Conversions ----

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<Arc<dyn HostObject>> for Value {
    fn from(v: Arc<dyn HostObject>) -> Self {
        Value::Host(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::array(v)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Number(v as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
