//! Host value model.
//!
//! The managed host sees values, not Rust types. A decode result is a frozen
//! tuple of `(Integer, Integer, Bytes)`; anything the host passes in arrives
//! as a [`Value`] and is checked before any work starts.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A value owned by the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Bytes(FrozenBytes),
    Tuple(Tuple),
}

impl Value {
    /// Host class name, as shown in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Tuple(_) => "Tuple",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&FrozenBytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

/// An immutable byte string.
///
/// [`FrozenBytes::adopt`] takes over an existing buffer without copying it;
/// the buffer is released when the last clone is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct FrozenBytes(Arc<Vec<u8>>);

impl FrozenBytes {
    /// Take ownership of `buf` without copying.
    pub fn adopt(buf: Vec<u8>) -> Self {
        Self(Arc::new(buf))
    }

    /// Copy `bytes` into a new frozen buffer.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self::adopt(bytes.to_vec())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for FrozenBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for FrozenBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrozenBytes({} bytes)", self.0.len())
    }
}

/// A fixed-length, immutable, ordered sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple(Arc<[Value]>);

impl Tuple {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

impl<const N: usize> From<[Value; N]> for Tuple {
    fn from(values: [Value; N]) -> Self {
        Self(Arc::from(values))
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Self(Arc::from(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "NilClass");
        assert_eq!(Value::Bool(true).type_name(), "TrueClass");
        assert_eq!(Value::Integer(3).type_name(), "Integer");
        assert_eq!(Value::from("a").type_name(), "String");
        assert_eq!(
            Value::Bytes(FrozenBytes::copy_from_slice(b"ab")).type_name(),
            "Bytes"
        );
    }

    #[test]
    fn test_adopt_does_not_copy() {
        let buf = vec![1u8, 2, 3, 4];
        let ptr = buf.as_ptr();
        let frozen = FrozenBytes::adopt(buf);
        assert_eq!(frozen.as_slice().as_ptr(), ptr);
        assert_eq!(frozen.to_vec(), vec![1u8, 2, 3, 4]);
    }

    #[test]
    fn test_frozen_bytes_debug_hides_content() {
        let frozen = FrozenBytes::copy_from_slice(&[0u8; 4096]);
        assert_eq!(format!("{frozen:?}"), "FrozenBytes(4096 bytes)");
    }

    #[test]
    fn test_tuple_access() {
        let tuple = Tuple::from([Value::from(7u32), Value::from("x")]);
        assert_eq!(tuple.len(), 2);
        assert_eq!(tuple.get(0).and_then(Value::as_integer), Some(7));
        assert_eq!(tuple.get(1).and_then(Value::as_str), Some("x"));
        assert!(tuple.get(2).is_none());
        assert_eq!(tuple.iter().count(), 2);
    }
}
