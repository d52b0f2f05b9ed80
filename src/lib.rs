//! Reflector: runtime struct introspection
//!
//! Wrap any value in an [`Object`] to enumerate its fields (including
//! those promoted from embedded structs), read and write them by name,
//! inspect their tags, and call methods by name with positional arguments.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               Object                    │
//! │   field(name) ─► Field   get/set/tags   │
//! │   method(name) ─► Method call ─► result │
//! ├─────────────────────────────────────────┤
//! │  enumerate - top-level/flattened/all    │
//! │  tag       - key:"value" parsing        │
//! ├─────────────────────────────────────────┤
//! │  TypeInfo / Reflect  (derive-generated) │
//! │  Value               (dynamic values)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use reflector::{args, reflect_methods, Object, Reflect, Value};
//!
//! #[derive(Reflect, Default)]
//! struct Address {
//!     #[reflect(tag = r#"json:"street""#)]
//!     street: String,
//!     number: i64,
//! }
//!
//! #[derive(Reflect, Default)]
//! #[reflect(methods)]
//! struct Person {
//!     name: String,
//!     #[reflect(embed)]
//!     address: Address,
//! }
//!
//! #[reflect_methods]
//! impl Person {
//!     pub fn add(&self, a: i32, b: i32, c: i32) -> i32 {
//!         a + b + c
//!     }
//! }
//!
//! let mut person = Person::default();
//! let obj = Object::from_mut(&mut person);
//!
//! let names: Vec<_> = obj.fields_flattened().iter().map(|f| f.name().to_owned()).collect();
//! assert_eq!(names, ["name", "street", "number"]);
//!
//! obj.field("street").set("ulica").unwrap();
//! assert_eq!(obj.field("street").tag("json").unwrap(), "street");
//!
//! let res = obj.method("add").call(args![2, 3, 6]).unwrap();
//! assert_eq!(res.result, vec![Value::I32(11)]);
//!
//! drop(obj);
//! assert_eq!(person.address.street, "ulica");
//! ```

extern crate self as reflector;

pub mod enumerate;
pub mod error;
pub mod field;
pub mod method;
pub mod object;
pub mod tag;
pub mod types;
pub mod value;

pub use enumerate::Policy;
pub use error::{ConversionError, ReflectError};
pub use field::Field;
pub use method::{CallResult, Method};
pub use object::Object;
pub use types::{
    error_type, no_methods, FieldDef, Invoker, Kind, MethodDef, MethodSet, Receiver, Reflect,
    TypeFn, TypeInfo, Typed,
};
pub use value::{FromValue, Value};

#[cfg(feature = "derive")]
pub use reflector_derive::{reflect_methods, Reflect};

#[doc(hidden)]
pub mod __private {
    pub use std::any::{Any, TypeId};
    pub use std::boxed::Box;
    pub use std::convert::{From, TryFrom};
    pub use std::option::Option::{self, None, Some};
    pub use std::result::Result::{self, Err, Ok};
    pub use std::string::{String, ToString};
    pub use std::vec::Vec;
    pub use std::{format, vec};
}
