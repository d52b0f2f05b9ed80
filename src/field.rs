//! Field accessor.

use std::collections::HashMap;

use crate::enumerate::{self, FieldEntry};
use crate::error::ReflectError;
use crate::object::Object;
use crate::tag;
use crate::types::{Kind, TypeInfo};
use crate::value::Value;

/// A field of an [`Object`], looked up by name.
///
/// Looking up a name that does not exist still yields a `Field`; it is
/// simply invalid. Metadata queries on an invalid field return sentinels
/// (`Kind::Invalid`, `None`) while tag queries and `set` return
/// [`ReflectError::InvalidField`].
pub struct Field<'o, 'a> {
    object: &'o Object<'a>,
    name: String,
    entry: Option<FieldEntry>,
}

impl<'o, 'a> Field<'o, 'a> {
    pub(crate) fn resolve(object: &'o Object<'a>, name: &str) -> Self {
        let entry = enumerate::find(object.underlying_type(), name);
        if entry.is_none() {
            tracing::trace!(ty = object.underlying_type().name, field = name, "field does not resolve");
        }
        Field {
            object,
            name: String::from(name),
            entry,
        }
    }

    pub(crate) fn from_entry(object: &'o Object<'a>, entry: FieldEntry) -> Self {
        Field {
            object,
            name: String::from(entry.name()),
            entry: Some(entry),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    pub fn kind(&self) -> Kind {
        self.ty().map_or(Kind::Invalid, |ty| ty.kind)
    }

    pub fn ty(&self) -> Option<&'static TypeInfo> {
        self.entry.as_ref().map(|entry| entry.def.type_info())
    }

    /// True for an embedded struct field.
    pub fn is_anonymous(&self) -> bool {
        self.entry.as_ref().is_some_and(|entry| entry.def.anonymous)
    }

    /// Field indices from the object's type down to this field.
    pub fn path(&self) -> Option<&[usize]> {
        self.entry.as_ref().map(|entry| entry.path.as_slice())
    }

    /// Current value, read from the object's storage.
    ///
    /// `None` when the field is invalid or the object was built from a type.
    pub fn get(&self) -> Option<Value> {
        let entry = self.entry.as_ref()?;
        self.object
            .with_target(|root| root.at_path(&entry.path).map(|field| field.to_value()))
            .flatten()
    }

    /// Assign a new value. Requires an object built with
    /// [`Object::from_mut`]; the write lands in the caller's value.
    pub fn set(&self, value: impl Into<Value>) -> Result<(), ReflectError> {
        let entry = self.valid_entry()?;
        if !self.object.is_ptr() {
            return Err(ReflectError::Unaddressable(self.name.clone()));
        }

        let value = value.into();
        tracing::trace!(field = %self.name, kind = %value.kind(), "assigning field");
        let assigned = self
            .object
            .with_target_mut(|root| root.at_path_mut(&entry.path).map(|field| field.assign(value)))
            .ok_or_else(|| ReflectError::Unaddressable(self.name.clone()))?
            .ok_or_else(|| ReflectError::InvalidField(self.name.clone()))?;

        assigned.map_err(|source| ReflectError::TypeMismatch {
            field: self.name.clone(),
            source,
        })
    }

    /// The raw tag string.
    pub fn raw_tag(&self) -> Result<&'static str, ReflectError> {
        Ok(self.valid_entry()?.def.tag)
    }

    /// Value of one tag key; empty when the key is absent.
    pub fn tag(&self, key: &str) -> Result<String, ReflectError> {
        Ok(tag::lookup(self.raw_tag()?, key).unwrap_or_default())
    }

    pub fn tags(&self) -> Result<HashMap<String, String>, ReflectError> {
        Ok(tag::parse(self.raw_tag()?))
    }

    /// Value of one tag key split on commas; empty when the key is absent.
    pub fn tag_expanded(&self, key: &str) -> Result<Vec<String>, ReflectError> {
        Ok(tag::expand(&self.tag(key)?))
    }

    fn valid_entry(&self) -> Result<&FieldEntry, ReflectError> {
        self.entry
            .as_ref()
            .ok_or_else(|| ReflectError::InvalidField(self.name.clone()))
    }
}

impl std::fmt::Debug for Field<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("anonymous", &self.is_anonymous())
            .finish()
    }
}
