//! Method accessor and dynamic invocation.

use crate::enumerate::{self, MethodEntry};
use crate::error::ReflectError;
use crate::object::Object;
use crate::types::{Invoker, MethodDef, Receiver, TypeInfo};
use crate::value::Value;

/// Outcome of a successful [`Method::call`].
///
/// `result` holds one value per declared return value. For methods
/// returning `Result<T, E>` the last entry is the error slot: `Value::Nil`
/// on success, `Value::Error` carrying the error's `Display` text on
/// failure (the values before it are then the zero values of `T`).
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    pub result: Vec<Value>,
    error_slot: bool,
}

impl CallResult {
    /// True when the method declares a trailing error and it is non-nil.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    pub fn error(&self) -> Option<&str> {
        if !self.error_slot {
            return None;
        }
        match self.result.last() {
            Some(Value::Error(message)) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.result.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.result
    }
}

/// A method of an [`Object`], looked up by name.
///
/// The method set includes methods promoted from embedded structs. A method
/// taking `&mut self` is only visible on objects built with
/// [`Object::from_mut`] (or from a type, for inspection).
pub struct Method<'o, 'a> {
    object: &'o Object<'a>,
    name: String,
    entry: Option<MethodEntry>,
}

impl<'o, 'a> Method<'o, 'a> {
    pub(crate) fn resolve(object: &'o Object<'a>, name: &str) -> Self {
        let entry = enumerate::methods(object.underlying_type())
            .into_iter()
            .find(|entry| entry.def.name == name)
            .filter(|entry| object.allows(entry.def.receiver()));
        if entry.is_none() {
            tracing::trace!(ty = object.underlying_type().name, method = name, "method does not resolve");
        }
        Method {
            object,
            name: String::from(name),
            entry,
        }
    }

    pub(crate) fn from_entry(object: &'o Object<'a>, entry: MethodEntry) -> Self {
        Method {
            object,
            name: String::from(entry.def.name),
            entry: Some(entry),
        }
    }

    fn def(&self) -> Option<&'static MethodDef> {
        self.entry.as_ref().map(|entry| entry.def)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    pub fn receiver(&self) -> Option<Receiver> {
        self.def().map(MethodDef::receiver)
    }

    /// True when the method is declared on an embedded struct.
    pub fn is_promoted(&self) -> bool {
        self.entry.as_ref().is_some_and(|entry| !entry.path.is_empty())
    }

    /// Field indices from the object's value down to the receiver.
    pub fn path(&self) -> Option<&[usize]> {
        self.entry.as_ref().map(|entry| entry.path.as_slice())
    }

    pub fn in_types(&self) -> Vec<&'static TypeInfo> {
        self.def().map(MethodDef::in_types).unwrap_or_default()
    }

    pub fn out_types(&self) -> Vec<&'static TypeInfo> {
        self.def().map(MethodDef::out_types).unwrap_or_default()
    }

    /// Invoke the method with positional arguments.
    ///
    /// Fails when the method does not resolve, the argument count differs
    /// from the signature, or an argument cannot be converted. An error
    /// returned *by* the method is not a failure here; see
    /// [`CallResult::is_error`].
    pub fn call(&self, args: Vec<Value>) -> Result<CallResult, ReflectError> {
        let entry = self
            .entry
            .as_ref()
            .ok_or_else(|| ReflectError::UnresolvedMethod(self.name.clone()))?;
        let def = entry.def;

        if args.len() != def.inputs.len() {
            return Err(ReflectError::ArgumentCount {
                method: self.name.clone(),
                expected: def.inputs.len(),
                got: args.len(),
            });
        }

        tracing::trace!(method = def.name, args = args.len(), depth = entry.path.len(), "invoking method");
        let path = entry.path.as_slice();
        let outputs = match def.invoke {
            Invoker::Value(invoke) => self
                .object
                .with_target(|root| root.at_path(path).map(|recv| invoke(recv, args))),
            Invoker::Pointer(invoke) => self
                .object
                .with_target_mut(|root| root.at_path_mut(path).map(|recv| invoke(recv, args))),
        }
        .flatten()
        .ok_or_else(|| ReflectError::NoReceiver(self.name.clone()))??;

        Ok(CallResult {
            result: outputs,
            error_slot: def.returns_error(),
        })
    }
}

impl std::fmt::Debug for Method<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("receiver", &self.receiver())
            .finish()
    }
}
