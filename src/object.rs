//! The entry wrapper around an introspected value.

use std::cell::RefCell;

use crate::enumerate::{self, Policy};
use crate::field::Field;
use crate::method::Method;
use crate::types::{Kind, Receiver, Reflect, TypeInfo, Typed};
use crate::value::Value;

enum Target<'a> {
    /// Private copy moved in by [`Object::new`].
    Owned(Box<dyn Reflect>),
    /// Caller storage borrowed by [`Object::from_mut`].
    Borrowed(&'a mut dyn Reflect),
    /// Metadata only.
    Detached,
}

/// Introspection session over one value or type.
///
/// How the object was built decides what it may do:
///
/// - [`Object::new`] takes the value by move. Fields can be read, `set` is
///   refused, and only methods taking `&self`/`self` are visible.
/// - [`Object::from_mut`] borrows the value mutably. Fields can be set, and
///   `&mut self` methods join the method set. Mutations land in the
///   caller's value.
/// - [`Object::from_type`] carries no value at all. Everything is visible
///   for inspection but nothing can be read, set or called.
///
/// The visible fields never depend on the construction mode.
pub struct Object<'a> {
    ty: &'static TypeInfo,
    is_ptr: bool,
    target: RefCell<Target<'a>>,
}

impl<'a> Object<'a> {
    pub fn new<T: Reflect>(value: T) -> Self {
        let ty = value.reflect_type();
        tracing::trace!(ty = ty.name, "reflecting owned value");
        Object {
            ty,
            is_ptr: false,
            target: RefCell::new(Target::Owned(Box::new(value))),
        }
    }

    pub fn from_mut<T: Reflect>(target: &'a mut T) -> Self {
        let ty = target.reflect_type();
        tracing::trace!(ty = ty.name, "reflecting borrowed value");
        Object {
            ty,
            is_ptr: true,
            target: RefCell::new(Target::Borrowed(target)),
        }
    }

    pub fn from_type<T: Typed>() -> Self {
        Self::from_type_info(T::type_info())
    }

    pub fn from_type_info(ty: &'static TypeInfo) -> Self {
        Object {
            ty,
            is_ptr: true,
            target: RefCell::new(Target::Detached),
        }
    }

    /// True when built from a reference or a bare type.
    pub fn is_ptr(&self) -> bool {
        self.is_ptr
    }

    pub fn is_struct_or_ptr_to_struct(&self) -> bool {
        self.ty.is_struct()
    }

    /// `Pointer` for reference-built objects, the underlying kind otherwise.
    pub fn kind(&self) -> Kind {
        if self.is_ptr {
            Kind::Pointer
        } else {
            self.ty.kind
        }
    }

    pub fn type_name(&self) -> String {
        if self.is_ptr {
            format!("&mut {}", self.ty)
        } else {
            self.ty.to_string()
        }
    }

    pub fn underlying_type(&self) -> &'static TypeInfo {
        self.ty
    }

    pub fn has_value(&self) -> bool {
        !matches!(*self.target.borrow(), Target::Detached)
    }

    /// Snapshot of the whole value.
    pub fn to_value(&self) -> Option<Value> {
        self.with_target(|target| target.to_value())
    }

    pub fn field<'o>(&'o self, name: &str) -> Field<'o, 'a> {
        Field::resolve(self, name)
    }

    /// Fields declared directly on the type; embedded structs appear as one
    /// anonymous field.
    pub fn fields(&self) -> Vec<Field<'_, 'a>> {
        self.list_fields(Policy::TopLevel)
    }

    /// Fields with every embedded struct replaced by its own fields.
    pub fn fields_flattened(&self) -> Vec<Field<'_, 'a>> {
        self.list_fields(Policy::Flattened)
    }

    /// Embedded structs followed by their own fields.
    pub fn fields_all(&self) -> Vec<Field<'_, 'a>> {
        self.list_fields(Policy::Exhaustive)
    }

    /// Field names declared more than once across embedded structs.
    pub fn duplicate_fields(&self) -> Vec<String> {
        enumerate::duplicates(self.ty)
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn list_fields(&self, policy: Policy) -> Vec<Field<'_, 'a>> {
        enumerate::enumerate(self.ty, policy)
            .into_iter()
            .map(|entry| Field::from_entry(self, entry))
            .collect()
    }

    pub fn method<'o>(&'o self, name: &str) -> Method<'o, 'a> {
        Method::resolve(self, name)
    }

    /// The visible method set: the type's own methods in declaration order,
    /// then those promoted from embedded structs.
    pub fn methods(&self) -> Vec<Method<'_, 'a>> {
        enumerate::methods(self.ty)
            .into_iter()
            .filter(|entry| self.allows(entry.def.receiver()))
            .map(|entry| Method::from_entry(self, entry))
            .collect()
    }

    pub(crate) fn allows(&self, receiver: Receiver) -> bool {
        self.is_ptr || receiver == Receiver::Value
    }

    pub(crate) fn with_target<R>(&self, f: impl FnOnce(&dyn Reflect) -> R) -> Option<R> {
        match &*self.target.borrow() {
            Target::Owned(value) => Some(f(value.as_ref())),
            Target::Borrowed(value) => Some(f(&**value)),
            Target::Detached => None,
        }
    }

    pub(crate) fn with_target_mut<R>(&self, f: impl FnOnce(&mut dyn Reflect) -> R) -> Option<R> {
        match &mut *self.target.borrow_mut() {
            Target::Owned(value) => Some(f(value.as_mut())),
            Target::Borrowed(value) => Some(f(&mut **value)),
            Target::Detached => None,
        }
    }
}

impl std::fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.type_name())
            .field("kind", &self.kind())
            .field("has_value", &self.has_value())
            .finish()
    }
}
