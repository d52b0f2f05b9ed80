//! Type descriptors and the `Typed`/`Reflect` traits.
//!
//! Every reflected type carries a static [`TypeInfo`] describing its shape:
//! kind, fields (for structs) and the method table. Descriptors are plain
//! `const` data produced by `#[derive(Reflect)]` or by the built-in impls
//! below, so looking one up never allocates.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::{ConversionError, ReflectError};
use crate::value::{FromValue, Value};

/// Lazily resolved reference to a type descriptor.
///
/// Field and method tables refer to other types through function pointers
/// so that descriptors can be built in `const` context.
pub type TypeFn = fn() -> &'static TypeInfo;

/// Kind classification of a reflected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Sentinel for a field or value that does not exist.
    Invalid,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    String,
    Struct,
    /// Only reported by an [`Object`](crate::Object) built from a reference.
    Pointer,
    Option,
    List,
    Unit,
    /// The trailing error slot of a method returning `Result`.
    Error,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::Pointer => "ptr",
            Kind::Option => "option",
            Kind::List => "list",
            Kind::Unit => "unit",
            Kind::Error => "error",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of a Rust type.
pub struct TypeInfo {
    pub name: &'static str,
    pub kind: Kind,
    pub id: fn() -> TypeId,
    /// Declared fields, in declaration order. Empty unless `kind` is `Struct`.
    pub fields: &'static [FieldDef],
    /// Element type for `Option<T>` and `Vec<T>`.
    pub elem: Option<TypeFn>,
    pub methods: fn() -> &'static [MethodDef],
}

impl TypeInfo {
    /// Descriptor for a type without fields, element or methods.
    pub const fn primitive(name: &'static str, kind: Kind, id: fn() -> TypeId) -> Self {
        TypeInfo {
            name,
            kind,
            id,
            fields: &[],
            elem: None,
            methods: no_methods,
        }
    }

    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    pub fn is_struct(&self) -> bool {
        self.kind == Kind::Struct
    }

    pub fn elem(&self) -> Option<&'static TypeInfo> {
        self.elem.map(|elem| elem())
    }

    /// Full method table, value and pointer receivers alike.
    pub fn methods(&self) -> &'static [MethodDef] {
        (self.methods)()
    }

    /// The default value of this type: zero numbers, empty strings and
    /// lists, `None`, and records of zero fields.
    pub fn zero_value(&self) -> Value {
        match self.kind {
            Kind::Invalid | Kind::Pointer | Kind::Error => Value::Nil,
            Kind::Unit => Value::Unit,
            Kind::Bool => Value::Bool(false),
            Kind::I8 => Value::I8(0),
            Kind::I16 => Value::I16(0),
            Kind::I32 => Value::I32(0),
            Kind::I64 | Kind::Isize => Value::I64(0),
            Kind::U8 => Value::U8(0),
            Kind::U16 => Value::U16(0),
            Kind::U32 => Value::U32(0),
            Kind::U64 | Kind::Usize => Value::U64(0),
            Kind::F32 => Value::F32(0.0),
            Kind::F64 => Value::F64(0.0),
            Kind::Char => Value::Char('\0'),
            Kind::String => Value::String(String::new()),
            Kind::List => Value::List(Vec::new()),
            Kind::Option => Value::Option(None),
            Kind::Struct => Value::Record {
                type_name: String::from(self.name),
                fields: self
                    .fields
                    .iter()
                    .map(|f| (String::from(f.name), f.type_info().zero_value()))
                    .collect(),
            },
        }
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.elem()) {
            (Kind::Option, Some(elem)) => write!(f, "Option<{}>", elem),
            (Kind::List, Some(elem)) => write!(f, "Vec<{}>", elem),
            _ => f.write_str(self.name),
        }
    }
}

/// One declared field of a struct type.
pub struct FieldDef {
    pub name: &'static str,
    pub ty: TypeFn,
    /// Raw tag string in `key:"value" key2:"value2"` form.
    pub tag: &'static str,
    /// Embedded field: its own fields are promoted into the enclosing struct.
    pub anonymous: bool,
}

impl FieldDef {
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.ty)()
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.type_info().name)
            .field("tag", &self.tag)
            .field("anonymous", &self.anonymous)
            .finish()
    }
}

/// How a method accesses its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self` or `self`: callable on any object.
    Value,
    /// `&mut self`: callable only on objects built from a reference.
    Pointer,
}

/// Type-erased entry point of a reflected method.
///
/// The argument count has been checked against the signature before the
/// invoker runs; it converts each argument and boxes each return value.
#[derive(Clone, Copy)]
pub enum Invoker {
    Value(fn(&dyn Reflect, Vec<Value>) -> Result<Vec<Value>, ReflectError>),
    Pointer(fn(&mut dyn Reflect, Vec<Value>) -> Result<Vec<Value>, ReflectError>),
}

/// One entry of a type's method table.
pub struct MethodDef {
    pub name: &'static str,
    pub inputs: &'static [TypeFn],
    pub outputs: &'static [TypeFn],
    pub invoke: Invoker,
}

impl MethodDef {
    pub fn receiver(&self) -> Receiver {
        match self.invoke {
            Invoker::Value(_) => Receiver::Value,
            Invoker::Pointer(_) => Receiver::Pointer,
        }
    }

    pub fn in_types(&self) -> Vec<&'static TypeInfo> {
        self.inputs.iter().map(|ty| ty()).collect()
    }

    pub fn out_types(&self) -> Vec<&'static TypeInfo> {
        self.outputs.iter().map(|ty| ty()).collect()
    }

    /// True when the last declared output is the error slot.
    pub fn returns_error(&self) -> bool {
        self.outputs.last().is_some_and(|ty| ty().kind == Kind::Error)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("receiver", &self.receiver())
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

/// Method table for types without reflected methods.
pub fn no_methods() -> &'static [MethodDef] {
    &[]
}

const ERROR_INFO: TypeInfo =
    TypeInfo::primitive("error", Kind::Error, TypeId::of::<dyn std::error::Error>);

/// Descriptor of the error slot appended to `Result`-returning methods.
pub fn error_type() -> &'static TypeInfo {
    &ERROR_INFO
}

/// Types with a static descriptor.
pub trait Typed: 'static {
    const INFO: TypeInfo;

    fn type_info() -> &'static TypeInfo
    where
        Self: Sized,
    {
        &Self::INFO
    }
}

/// Method table registered by `#[reflect_methods]`.
pub trait MethodSet {
    fn method_table() -> &'static [MethodDef];
}

/// Dynamic access to a value whose type is only known at runtime.
pub trait Reflect: Any {
    fn reflect_type(&self) -> &'static TypeInfo;

    /// Field by declared index. `None` for non-structs.
    fn field_at(&self, _index: usize) -> Option<&dyn Reflect> {
        None
    }

    fn field_at_mut(&mut self, _index: usize) -> Option<&mut dyn Reflect> {
        None
    }

    fn to_value(&self) -> Value;

    /// Replace the value in place with one converted from `value`.
    fn assign(&mut self, value: Value) -> Result<(), ConversionError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Reflect {
    /// Follow a path of field indices from this value.
    pub fn at_path(&self, path: &[usize]) -> Option<&dyn Reflect> {
        path.iter().try_fold(self, |cur, &index| cur.field_at(index))
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut dyn Reflect> {
        let mut cur = self;
        for &index in path {
            cur = cur.field_at_mut(index)?;
        }
        Some(cur)
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

// ============================================================================
// Built-in impls
// ============================================================================

macro_rules! primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                const INFO: TypeInfo =
                    TypeInfo::primitive(stringify!($ty), Kind::$kind, TypeId::of::<$ty>);
            }

            impl Reflect for $ty {
                fn reflect_type(&self) -> &'static TypeInfo {
                    <$ty as Typed>::type_info()
                }

                fn to_value(&self) -> Value {
                    Value::from(self.clone())
                }

                fn assign(&mut self, value: Value) -> Result<(), ConversionError> {
                    *self = <$ty as FromValue>::from_value(value)?;
                    Ok(())
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }
            }
        )*
    };
}

primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    () => Unit,
}

impl<T: Typed> Typed for Option<T> {
    const INFO: TypeInfo = TypeInfo {
        name: "Option",
        kind: Kind::Option,
        id: TypeId::of::<Option<T>>,
        fields: &[],
        elem: Some(T::type_info),
        methods: no_methods,
    };
}

impl<T: Reflect + Typed + FromValue> Reflect for Option<T> {
    fn reflect_type(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    fn to_value(&self) -> Value {
        Value::Option(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn assign(&mut self, value: Value) -> Result<(), ConversionError> {
        *self = <Self as FromValue>::from_value(value)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Typed> Typed for Vec<T> {
    const INFO: TypeInfo = TypeInfo {
        name: "Vec",
        kind: Kind::List,
        id: TypeId::of::<Vec<T>>,
        fields: &[],
        elem: Some(T::type_info),
        methods: no_methods,
    };
}

impl<T: Reflect + Typed + FromValue> Reflect for Vec<T> {
    fn reflect_type(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Reflect::to_value).collect())
    }

    fn assign(&mut self, value: Value) -> Result<(), ConversionError> {
        *self = <Self as FromValue>::from_value(value)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
