//! Values stored in a tab namespace.

use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// State of a single tab, ordered by key.
pub type TabState = BTreeMap<String, StateValue>;

/// State of every tab in a session, ordered by tab name.
pub type TabsState = BTreeMap<String, TabState>;

/// A value held under a `(tab, key)` slot.
///
/// Most values are plain JSON. Anything that cannot or should not be
/// serialized (a loaded dataset, a client handle) can be kept as an
/// [`OpaqueValue`]; it lives as long as the session but is never written
/// to disk.
#[derive(Clone, Debug)]
pub enum StateValue {
    Json(Value),
    Opaque(OpaqueValue),
}

impl StateValue {
    /// Serialize any `Serialize` value into a JSON state value.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Wrap an in-memory value that will never be persisted.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(OpaqueValue::new(value))
    }

    /// The JSON payload, or `None` for opaque values.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_json().and_then(Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_json().and_then(Value::as_bool)
    }

    /// Downcast an opaque value to its concrete type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Opaque(opaque) => opaque.downcast(),
            Self::Json(_) => None,
        }
    }

    /// Whether this value is written by `save_all`.
    ///
    /// Strings, numbers, booleans, arrays and objects are persisted; `null`
    /// and opaque values are not.
    pub fn is_persistable(&self) -> bool {
        matches!(self, Self::Json(value) if !value.is_null())
    }

    /// JSON shown in the debug view; opaque values render as a type tag.
    pub(crate) fn debug_json(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Opaque(opaque) => Value::String(format!("<opaque {}>", opaque.type_name())),
        }
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

macro_rules! json_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StateValue {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

json_from!(&str, String, bool, i32, i64, u32, u64, f32, f64);

impl<T: Into<Value>> From<Vec<T>> for StateValue {
    fn from(values: Vec<T>) -> Self {
        Self::Json(Value::Array(values.into_iter().map(Into::into).collect()))
    }
}

/// A shared, non-serializable value.
#[derive(Clone)]
pub struct OpaqueValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Two opaque values are equal only if they share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
