//! Loosely-typed runtime values

use crate::error::ConversionError;
use crate::types::Kind;

/// A dynamically typed value read from a field, passed as a call argument
/// or returned from an invoked method.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value: an empty error slot or an unset pointer.
    Nil,
    Unit,

    // Primitives
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),

    // Compound
    List(Vec<Value>),
    Option(Option<Box<Value>>),
    Record { type_name: String, fields: Vec<(String, Value)> },

    /// A non-nil error returned by an invoked method, rendered with `Display`.
    Error(String),
}

impl Value {
    /// The kind of data this value carries.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Invalid,
            Value::Unit => Kind::Unit,
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Char(_) => Kind::Char,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Option(_) => Kind::Option,
            Value::Record { .. } => Kind::Struct,
            Value::Error(_) => Kind::Error,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any integer variant, widened.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::I8(x) => Some(x.into()),
            Value::I16(x) => Some(x.into()),
            Value::I32(x) => Some(x.into()),
            Value::I64(x) => Some(x.into()),
            Value::U8(x) => Some(x.into()),
            Value::U16(x) => Some(x.into()),
            Value::U32(x) => Some(x.into()),
            Value::U64(x) => Some(x.into()),
            _ => None,
        }
    }

    /// Look up a field of a record value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record { fields, .. } => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations
// ============================================================================

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self { Value::$variant(v) }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
}

impl From<isize> for Value {
    fn from(v: isize) -> Self { Value::I64(v as i64) }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self { Value::U64(v as u64) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::String(String::from(v)) }
}

impl From<()> for Value {
    fn from(_: ()) -> Self { Value::Unit }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Option(v.map(|x| Box::new(x.into())))
    }
}

// ============================================================================
// TryFrom implementations
// ============================================================================

macro_rules! integer_try_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ConversionError;
                fn try_from(v: Value) -> Result<Self, Self::Error> {
                    let wide = v.as_i128().ok_or_else(|| ConversionError::TypeMismatch {
                        expected: String::from(stringify!($ty)),
                        got: format!("{:?}", v),
                    })?;
                    <$ty>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
                        target: stringify!($ty),
                        value: wide,
                    })
                }
            }
        )*
    };
}

integer_try_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! exact_try_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ConversionError;
                fn try_from(v: Value) -> Result<Self, Self::Error> {
                    match v {
                        Value::$variant(x) => Ok(x),
                        other => Err(ConversionError::TypeMismatch {
                            expected: String::from(stringify!($ty)),
                            got: format!("{:?}", other),
                        }),
                    }
                }
            }
        )*
    };
}

exact_try_from! {
    bool => Bool,
    f32 => F32,
    char => Char,
    String => String,
}

impl TryFrom<Value> for f64 {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::F64(x) => Ok(x),
            Value::F32(x) => Ok(x.into()),
            other => Err(ConversionError::TypeMismatch {
                expected: String::from("f64"),
                got: format!("{:?}", other),
            }),
        }
    }
}

impl TryFrom<Value> for () {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Unit => Ok(()),
            other => Err(ConversionError::TypeMismatch {
                expected: String::from("()"),
                got: format!("{:?}", other),
            }),
        }
    }
}

impl<T: FromValue> TryFrom<Value> for Vec<T> {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    T::from_value(item).map_err(|e| ConversionError::IndexError(i, Box::new(e)))
                })
                .collect(),
            other => Err(ConversionError::ExpectedList(format!("{:?}", other))),
        }
    }
}

// ============================================================================
// FromValue trait - avoids coherence issues with TryFrom for Option<T>
// ============================================================================

/// Conversion from a [`Value`].
///
/// Exists next to `TryFrom<Value>` because core's
/// `impl<T> From<T> for Option<T>` makes a direct
/// `TryFrom<Value> for Option<T>` overlap.
pub trait FromValue: Sized {
    fn from_value(v: Value) -> Result<Self, ConversionError>;
}

impl<T: TryFrom<Value, Error = ConversionError>> FromValue for T {
    fn from_value(v: Value) -> Result<Self, ConversionError> {
        T::try_from(v)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: Value) -> Result<Self, ConversionError> {
        match v {
            Value::Nil | Value::Option(None) => Ok(None),
            Value::Option(Some(inner)) => Ok(Some(T::from_value(*inner)?)),
            other => Err(ConversionError::ExpectedOption(format!("{:?}", other))),
        }
    }
}

/// Build an argument list for [`Method::call`](crate::Method::call).
///
/// ```
/// use reflector::{args, Value};
///
/// assert_eq!(args![2, "two"], vec![Value::I32(2), Value::String("two".into())]);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),*]
    };
}
