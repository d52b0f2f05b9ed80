//! Error types for value conversion and introspection.

use thiserror::Error;

/// Errors raised while converting a [`Value`](crate::Value) into a Rust type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The value carries a different variant than the target type accepts.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// An integer value does not fit the target integer type.
    #[error("value {value} out of range for {target}")]
    OutOfRange { target: &'static str, value: i128 },

    #[error("expected record, got {0}")]
    ExpectedRecord(String),

    #[error("expected list, got {0}")]
    ExpectedList(String),

    #[error("expected option, got {0}")]
    ExpectedOption(String),

    /// A record was built for a different struct type.
    #[error("record type mismatch: expected {expected}, got {got}")]
    RecordMismatch { expected: String, got: String },

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field '{0}': {1}")]
    FieldError(String, Box<ConversionError>),

    #[error("index {0}: {1}")]
    IndexError(usize, Box<ConversionError>),
}

/// Errors returned by [`Object`](crate::Object), [`Field`](crate::Field)
/// and [`Method`](crate::Method) operations.
///
/// Errors produced *inside* an invoked method are not part of this type;
/// they travel in the [`CallResult`](crate::CallResult) envelope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReflectError {
    /// The field name does not resolve in the flattened view.
    #[error("Invalid field {0}")]
    InvalidField(String),

    /// `set` on an object that was not constructed from a pointer.
    #[error("cannot set field '{0}': target is not addressable")]
    Unaddressable(String),

    /// The supplied value cannot be assigned to the field's type.
    #[error("cannot assign to field '{field}': {source}")]
    TypeMismatch {
        field: String,
        #[source]
        source: ConversionError,
    },

    /// No method of that name is visible in the object's method set.
    #[error("method not found: {0}")]
    UnresolvedMethod(String),

    #[error("method '{method}' takes {expected} argument(s), got {got}")]
    ArgumentCount {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("method '{method}', argument {index}: {source}")]
    InvalidArgument {
        method: String,
        index: usize,
        #[source]
        source: ConversionError,
    },

    /// The object only describes a type and holds no value to call on.
    #[error("method '{0}' has no receiver: object was built from a type")]
    NoReceiver(String),

    #[error("receiver is not a {expected}")]
    ReceiverMismatch { expected: &'static str },
}
