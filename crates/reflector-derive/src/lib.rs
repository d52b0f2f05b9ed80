//! Derive macros for reflector type descriptors.
//!
//! This crate provides `#[derive(Reflect)]`, which generates the static
//! `TypeInfo` of a struct together with its `Reflect`, `TryFrom<Value>` and
//! `From<T> for Value` impls, and `#[reflect_methods]`, which builds the
//! method table of an inherent impl block.
//!
//! # Example
//!
//! ```ignore
//! use reflector::{reflect_methods, Reflect};
//!
//! #[derive(Reflect)]
//! struct Address {
//!     #[reflect(tag = r#"tag:"be" tag2:"1,2,3""#)]
//!     street: String,
//!     number: i64,
//! }
//!
//! #[derive(Reflect)]
//! #[reflect(methods)]
//! struct Person {
//!     name: String,
//!     #[reflect(embed)]
//!     address: Address,
//! }
//!
//! #[reflect_methods]
//! impl Person {
//!     pub fn add(&self, a: i64, b: i64) -> i64 {
//!         a + b
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, ItemImpl};

mod attrs;
mod methods;

/// Derive a type descriptor and dynamic access for a struct.
///
/// # Structs
///
/// Named-field structs reflect as `Kind::Struct` with one field per Rust
/// field, in declaration order. Unit structs reflect as empty structs.
///
/// # Named scalars
///
/// A tuple struct with exactly one field wraps another type: it takes the
/// wrapped type's kind, has no fields, and reads and writes as the wrapped
/// value.
///
/// ```ignore
/// #[derive(Reflect)]
/// struct Celsius(f64);
/// ```
///
/// # Attributes
///
/// - `#[reflect(methods)]` - link the table built by `#[reflect_methods]`
/// - `#[reflect(embed)]` - promote this field's own fields into the struct
/// - `#[reflect(rename = "name")]` - reflected field name
/// - `#[reflect(tag = "key:\"value\"")]` - raw tag string
/// - `#[reflect(tags(key = "value", ...))]` - tag pairs, rendered as above
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match &input.data {
        Data::Struct(data) => derive_struct(&input, data),
        Data::Enum(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Reflect cannot be derived for enums",
        )),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Reflect cannot be derived for unions",
        )),
    };

    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Register the public `self` methods of an inherent impl block.
///
/// Methods taking `&self` or `self` are callable on every object; methods
/// taking `&mut self` only on objects built from a reference. Private
/// methods, associated functions and methods marked `#[reflect(skip)]` are
/// left out; `#[reflect(rename = "name")]` changes the reflected name.
///
/// Pair with `#[reflect(methods)]` on the struct. A type has at most one
/// reflected impl block.
#[proc_macro_attribute]
pub fn reflect_methods(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[reflect_methods] takes no arguments",
        )
        .to_compile_error()
        .into();
    }
    let item = parse_macro_input!(item as ItemImpl);
    methods::expand(item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive_struct(input: &DeriveInput, data: &syn::DataStruct) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect cannot be derived for generic types",
        ));
    }

    let name = &input.ident;
    let name_str = name.to_string();
    let container = attrs::container(&input.attrs)?;
    let method_table = if container.methods {
        quote!(<#name as ::reflector::MethodSet>::method_table)
    } else {
        quote!(::reflector::no_methods)
    };

    let body = match &data.fields {
        Fields::Named(fields) => named_struct(name, &name_str, fields, &method_table)?,
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            newtype_struct(name, &name_str, &fields.unnamed[0].ty, &method_table)
        }
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "Reflect supports tuple structs with exactly one field",
            ));
        }
        Fields::Unit => unit_struct(name, &name_str, &method_table),
    };

    Ok(quote! {
        #body

        impl ::reflector::__private::From<#name> for ::reflector::Value {
            fn from(value: #name) -> ::reflector::Value {
                ::reflector::Reflect::to_value(&value)
            }
        }
    })
}

/// `as_any`/`as_any_mut`, identical for every shape.
fn any_accessors() -> proc_macro2::TokenStream {
    quote! {
        fn as_any(&self) -> &dyn ::reflector::__private::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::reflector::__private::Any {
            self
        }
    }
}

fn named_struct(
    name: &syn::Ident,
    name_str: &str,
    fields: &syn::FieldsNamed,
    method_table: &proc_macro2::TokenStream,
) -> syn::Result<proc_macro2::TokenStream> {
    let mut defs = Vec::new();
    let mut idents = Vec::new();
    let mut names = Vec::new();
    let mut types = Vec::new();

    for field in fields.named.iter() {
        let options = attrs::field(&field.attrs)?;
        let ident = field.ident.clone().ok_or_else(|| syn::Error::new_spanned(field, "unnamed field"))?;
        let field_name = options.rename.unwrap_or_else(|| ident.to_string());
        let ty = &field.ty;
        let tag = &options.tag;
        let anonymous = options.embed;

        defs.push(quote! {
            ::reflector::FieldDef {
                name: #field_name,
                ty: <#ty as ::reflector::Typed>::type_info,
                tag: #tag,
                anonymous: #anonymous,
            }
        });
        idents.push(ident);
        names.push(field_name);
        types.push(ty.clone());
    }

    let indices: Vec<usize> = (0..idents.len()).collect();
    let any = any_accessors();

    Ok(quote! {
        impl ::reflector::Typed for #name {
            const INFO: ::reflector::TypeInfo = ::reflector::TypeInfo {
                name: #name_str,
                kind: ::reflector::Kind::Struct,
                id: ::reflector::__private::TypeId::of::<#name>,
                fields: &[#(#defs),*],
                elem: ::reflector::__private::None,
                methods: #method_table,
            };
        }

        impl ::reflector::Reflect for #name {
            fn reflect_type(&self) -> &'static ::reflector::TypeInfo {
                <#name as ::reflector::Typed>::type_info()
            }

            fn field_at(&self, index: usize) -> ::reflector::__private::Option<&dyn ::reflector::Reflect> {
                match index {
                    #(#indices => ::reflector::__private::Some(&self.#idents as &dyn ::reflector::Reflect),)*
                    _ => ::reflector::__private::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> ::reflector::__private::Option<&mut dyn ::reflector::Reflect> {
                match index {
                    #(#indices => ::reflector::__private::Some(&mut self.#idents as &mut dyn ::reflector::Reflect),)*
                    _ => ::reflector::__private::None,
                }
            }

            fn to_value(&self) -> ::reflector::Value {
                ::reflector::Value::Record {
                    type_name: ::reflector::__private::String::from(#name_str),
                    fields: ::reflector::__private::vec![
                        #((
                            ::reflector::__private::String::from(#names),
                            ::reflector::Reflect::to_value(&self.#idents),
                        )),*
                    ],
                }
            }

            fn assign(&mut self, value: ::reflector::Value) -> ::reflector::__private::Result<(), ::reflector::ConversionError> {
                *self = <#name as ::reflector::FromValue>::from_value(value)?;
                ::reflector::__private::Ok(())
            }

            #any
        }

        impl ::reflector::__private::TryFrom<::reflector::Value> for #name {
            type Error = ::reflector::ConversionError;

            fn try_from(value: ::reflector::Value) -> ::reflector::__private::Result<Self, Self::Error> {
                match value {
                    ::reflector::Value::Record { type_name, fields } => {
                        if type_name != #name_str {
                            return ::reflector::__private::Err(::reflector::ConversionError::RecordMismatch {
                                expected: ::reflector::__private::String::from(#name_str),
                                got: type_name,
                            });
                        }
                        ::reflector::__private::Ok(#name {
                            #(#idents: {
                                let field_value = fields.iter()
                                    .find(|(name, _)| name == #names)
                                    .map(|(_, v)| v.clone())
                                    .ok_or_else(|| ::reflector::ConversionError::MissingField(
                                        ::reflector::__private::String::from(#names)
                                    ))?;
                                <#types as ::reflector::FromValue>::from_value(field_value)
                                    .map_err(|e| ::reflector::ConversionError::FieldError(
                                        ::reflector::__private::String::from(#names),
                                        ::reflector::__private::Box::new(e),
                                    ))?
                            }),*
                        })
                    }
                    other => ::reflector::__private::Err(::reflector::ConversionError::ExpectedRecord(
                        ::reflector::__private::format!("{:?}", other)
                    )),
                }
            }
        }
    })
}

fn newtype_struct(
    name: &syn::Ident,
    name_str: &str,
    inner: &syn::Type,
    method_table: &proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    let any = any_accessors();

    quote! {
        impl ::reflector::Typed for #name {
            const INFO: ::reflector::TypeInfo = ::reflector::TypeInfo {
                name: #name_str,
                kind: <#inner as ::reflector::Typed>::INFO.kind,
                id: ::reflector::__private::TypeId::of::<#name>,
                fields: &[],
                elem: <#inner as ::reflector::Typed>::INFO.elem,
                methods: #method_table,
            };
        }

        impl ::reflector::Reflect for #name {
            fn reflect_type(&self) -> &'static ::reflector::TypeInfo {
                <#name as ::reflector::Typed>::type_info()
            }

            fn to_value(&self) -> ::reflector::Value {
                ::reflector::Reflect::to_value(&self.0)
            }

            fn assign(&mut self, value: ::reflector::Value) -> ::reflector::__private::Result<(), ::reflector::ConversionError> {
                ::reflector::Reflect::assign(&mut self.0, value)
            }

            #any
        }

        impl ::reflector::__private::TryFrom<::reflector::Value> for #name {
            type Error = ::reflector::ConversionError;

            fn try_from(value: ::reflector::Value) -> ::reflector::__private::Result<Self, Self::Error> {
                <#inner as ::reflector::FromValue>::from_value(value).map(#name)
            }
        }
    }
}

fn unit_struct(
    name: &syn::Ident,
    name_str: &str,
    method_table: &proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    let any = any_accessors();

    quote! {
        impl ::reflector::Typed for #name {
            const INFO: ::reflector::TypeInfo = ::reflector::TypeInfo {
                name: #name_str,
                kind: ::reflector::Kind::Struct,
                id: ::reflector::__private::TypeId::of::<#name>,
                fields: &[],
                elem: ::reflector::__private::None,
                methods: #method_table,
            };
        }

        impl ::reflector::Reflect for #name {
            fn reflect_type(&self) -> &'static ::reflector::TypeInfo {
                <#name as ::reflector::Typed>::type_info()
            }

            fn to_value(&self) -> ::reflector::Value {
                ::reflector::Value::Record {
                    type_name: ::reflector::__private::String::from(#name_str),
                    fields: ::reflector::__private::Vec::new(),
                }
            }

            fn assign(&mut self, value: ::reflector::Value) -> ::reflector::__private::Result<(), ::reflector::ConversionError> {
                <#name as ::reflector::FromValue>::from_value(value).map(|_| ())
            }

            #any
        }

        impl ::reflector::__private::TryFrom<::reflector::Value> for #name {
            type Error = ::reflector::ConversionError;

            fn try_from(value: ::reflector::Value) -> ::reflector::__private::Result<Self, Self::Error> {
                match value {
                    ::reflector::Value::Record { type_name, .. } if type_name == #name_str => {
                        ::reflector::__private::Ok(#name)
                    }
                    other => ::reflector::__private::Err(::reflector::ConversionError::ExpectedRecord(
                        ::reflector::__private::format!("{:?}", other)
                    )),
                }
            }
        }
    }
}
