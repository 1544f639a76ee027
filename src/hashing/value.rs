//! Typed column values passed in by the embedding engine.

use std::fmt;

/// Kind tag of a [`TypedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    /// Day number since the epoch
    Date,
    Null,
}

impl ValueKind {
    /// Engine-facing type name.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::UInt8 => "UInt8",
            ValueKind::UInt16 => "UInt16",
            ValueKind::UInt32 => "UInt32",
            ValueKind::UInt64 => "UInt64",
            ValueKind::Int8 => "Int8",
            ValueKind::Int16 => "Int16",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::Float32 => "Float32",
            ValueKind::Float64 => "Float64",
            ValueKind::String => "String",
            ValueKind::Date => "Date",
            ValueKind::Null => "Null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true for the kinds that contribute to the combined hash.
///
/// The set is closed: 8-bit unsigned, 8-bit signed, 64-bit signed and
/// strings. Everything else is skipped by the combiner.
pub fn is_hashable(kind: ValueKind) -> bool {
    matches!(
        kind,
        ValueKind::UInt8 | ValueKind::Int8 | ValueKind::Int64 | ValueKind::String
    )
}

/// A single scalar column value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Date(u16),
    Null,
}

impl TypedValue {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::UInt8(_) => ValueKind::UInt8,
            TypedValue::UInt16(_) => ValueKind::UInt16,
            TypedValue::UInt32(_) => ValueKind::UInt32,
            TypedValue::UInt64(_) => ValueKind::UInt64,
            TypedValue::Int8(_) => ValueKind::Int8,
            TypedValue::Int16(_) => ValueKind::Int16,
            TypedValue::Int32(_) => ValueKind::Int32,
            TypedValue::Int64(_) => ValueKind::Int64,
            TypedValue::Float32(_) => ValueKind::Float32,
            TypedValue::Float64(_) => ValueKind::Float64,
            TypedValue::String(_) => ValueKind::String,
            TypedValue::Date(_) => ValueKind::Date,
            TypedValue::Null => ValueKind::Null,
        }
    }

    /// Borrows the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the payload of a `UInt32` value.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TypedValue::UInt32(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::UInt8(v) => write!(f, "{}", v),
            TypedValue::UInt16(v) => write!(f, "{}", v),
            TypedValue::UInt32(v) => write!(f, "{}", v),
            TypedValue::UInt64(v) => write!(f, "{}", v),
            TypedValue::Int8(v) => write!(f, "{}", v),
            TypedValue::Int16(v) => write!(f, "{}", v),
            TypedValue::Int32(v) => write!(f, "{}", v),
            TypedValue::Int64(v) => write!(f, "{}", v),
            TypedValue::Float32(v) => write!(f, "{}", v),
            TypedValue::Float64(v) => write!(f, "{}", v),
            TypedValue::String(v) => write!(f, "{}", v),
            TypedValue::Date(v) => write!(f, "{}", v),
            TypedValue::Null => f.write_str("NULL"),
        }
    }
}

impl From<u8> for TypedValue {
    fn from(v: u8) -> Self {
        TypedValue::UInt8(v)
    }
}

impl From<i8> for TypedValue {
    fn from(v: i8) -> Self {
        TypedValue::Int8(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Int64(v)
    }
}

impl From<u32> for TypedValue {
    fn from(v: u32) -> Self {
        TypedValue::UInt32(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::String(v.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::String(v)
    }
}
