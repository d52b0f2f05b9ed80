//! Code generation for `#[reflect_methods]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::visit_mut::{self, VisitMut};
use syn::{
    FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PathArguments, ReturnType, Type,
    Visibility,
};

use crate::attrs;

/// The values a type contributes to the call envelope.
struct Shape {
    types: Vec<Type>,
    /// The value is a tuple and is destructured into `types`.
    tuple: bool,
}

/// What a reflected method returns, as seen by the call envelope.
enum Outputs {
    Plain(Shape),
    /// `Result<T, E>`: the entries of `T`, then the error slot.
    Fallible(Shape),
}

/// `()` contributes nothing, a tuple one entry per element, anything else
/// a single entry.
fn shape(ty: &Type) -> Shape {
    match ty {
        Type::Tuple(tuple) => Shape {
            types: tuple.elems.iter().cloned().collect(),
            tuple: true,
        },
        Type::Paren(paren) => shape(&paren.elem),
        other => Shape {
            types: vec![other.clone()],
            tuple: false,
        },
    }
}

fn outputs(ret: &ReturnType) -> Outputs {
    let ty = match ret {
        ReturnType::Default => {
            return Outputs::Plain(Shape {
                types: Vec::new(),
                tuple: true,
            })
        }
        ReturnType::Type(_, ty) => ty.as_ref(),
    };

    if let Type::Path(path) = ty {
        if let Some(last) = path.path.segments.last() {
            if last.ident == "Result" {
                if let PathArguments::AngleBracketed(args) = &last.arguments {
                    let types: Vec<&Type> = args
                        .args
                        .iter()
                        .filter_map(|arg| match arg {
                            GenericArgument::Type(ty) => Some(ty),
                            _ => None,
                        })
                        .collect();
                    if types.len() == 2 {
                        return Outputs::Fallible(shape(types[0]));
                    }
                }
            }
        }
    }
    Outputs::Plain(shape(ty))
}

/// Bind the entries of `value` to `__ret0..`.
fn destructure(shape: &Shape, value: TokenStream) -> (Vec<syn::Ident>, TokenStream) {
    let parts: Vec<_> = (0..shape.types.len()).map(|i| format_ident!("__ret{}", i)).collect();
    let binding = if shape.tuple {
        quote!(let (#(#parts,)*) = #value;)
    } else {
        quote!(let #(#parts)* = #value;)
    };
    (parts, binding)
}

/// Replaces `Self` with the concrete type; the generated invokers are
/// nested items and cannot name `Self`.
struct ReplaceSelf<'a>(&'a Type);

impl VisitMut for ReplaceSelf<'_> {
    fn visit_type_mut(&mut self, ty: &mut Type) {
        if let Type::Path(path) = ty {
            if path.qself.is_none() && path.path.is_ident("Self") {
                *ty = self.0.clone();
                return;
            }
        }
        visit_mut::visit_type_mut(self, ty);
    }
}

struct Reflected {
    name: String,
    invoker: syn::Ident,
    inputs: Vec<Type>,
    outputs: Outputs,
    receiver: ReceiverMode,
}

#[derive(Clone, Copy, PartialEq)]
enum ReceiverMode {
    Ref,
    Mut,
    Owned,
}

fn inspect(method: &ImplItemFn, name: String, self_ty: &Type) -> syn::Result<Reflected> {
    let sig = &method.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "generic methods cannot be reflected; add #[reflect(skip)]",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "async methods cannot be reflected; add #[reflect(skip)]",
        ));
    }

    let Some(receiver) = sig.receiver() else {
        return Err(syn::Error::new_spanned(sig, "reflected methods need a self receiver"));
    };
    if receiver.colon_token.is_some() {
        return Err(syn::Error::new_spanned(
            receiver,
            "only `self`, `&self` and `&mut self` receivers can be reflected",
        ));
    }
    let mode = match (&receiver.reference, &receiver.mutability) {
        (Some(_), Some(_)) => ReceiverMode::Mut,
        (Some(_), None) => ReceiverMode::Ref,
        (None, _) => ReceiverMode::Owned,
    };

    let mut inputs = Vec::new();
    for arg in sig.inputs.iter() {
        if let FnArg::Typed(typed) = arg {
            match typed.ty.as_ref() {
                Type::Reference(_) | Type::ImplTrait(_) => {
                    return Err(syn::Error::new_spanned(
                        &typed.ty,
                        "reflected method parameters must be owned types",
                    ));
                }
                ty => inputs.push(ty.clone()),
            }
        }
    }

    let mut outputs = outputs(&sig.output);
    let mut replace = ReplaceSelf(self_ty);
    let (Outputs::Plain(shape) | Outputs::Fallible(shape)) = &mut outputs;
    for ty in inputs.iter_mut().chain(shape.types.iter_mut()) {
        replace.visit_type_mut(ty);
    }

    Ok(Reflected {
        invoker: format_ident!("__reflect_invoke_{}", sig.ident),
        name,
        inputs,
        outputs,
        receiver: mode,
    })
}

pub fn expand(mut item: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[reflect_methods] goes on an inherent impl block",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[reflect_methods] does not support generic types",
        ));
    }

    let mut reflected = Vec::new();
    for impl_item in item.items.iter_mut() {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let options = attrs::method(&method.attrs)?;
        method.attrs.retain(|a| !attrs::is_reflect(a));

        let exported = matches!(method.vis, Visibility::Public(_));
        if options.skip || !exported || method.sig.receiver().is_none() {
            continue;
        }
        let name = options.rename.unwrap_or_else(|| method.sig.ident.to_string());
        reflected.push((method.sig.ident.clone(), inspect(method, name, &item.self_ty)?));
    }

    let self_ty = &item.self_ty;
    let self_name = quote!(#self_ty).to_string();

    let invokers: Vec<_> = reflected
        .iter()
        .map(|(ident, method)| invoker(self_ty, &self_name, ident, method))
        .collect();

    let entries: Vec<_> = reflected
        .iter()
        .map(|(_, method)| {
            let name = &method.name;
            let invoker = &method.invoker;
            let inputs = &method.inputs;
            let outputs = match &method.outputs {
                Outputs::Plain(shape) => {
                    let types = &shape.types;
                    quote!(#(<#types as ::reflector::Typed>::type_info),*)
                }
                Outputs::Fallible(shape) => {
                    let types = &shape.types;
                    quote!(#(<#types as ::reflector::Typed>::type_info,)* ::reflector::error_type)
                }
            };
            let variant = match method.receiver {
                ReceiverMode::Mut => quote!(Pointer),
                ReceiverMode::Ref | ReceiverMode::Owned => quote!(Value),
            };
            quote! {
                ::reflector::MethodDef {
                    name: #name,
                    inputs: &[#(<#inputs as ::reflector::Typed>::type_info),*],
                    outputs: &[#outputs],
                    invoke: ::reflector::Invoker::#variant(#invoker),
                }
            }
        })
        .collect();

    Ok(quote! {
        #item

        impl ::reflector::MethodSet for #self_ty {
            fn method_table() -> &'static [::reflector::MethodDef] {
                #(#invokers)*

                static METHODS: &[::reflector::MethodDef] = &[#(#entries),*];
                METHODS
            }
        }
    })
}

fn invoker(self_ty: &Type, self_name: &str, ident: &syn::Ident, method: &Reflected) -> TokenStream {
    let invoker = &method.invoker;
    let name = &method.name;

    let (recv_ty, downcast, call_target) = match method.receiver {
        ReceiverMode::Mut => (
            quote!(&mut dyn ::reflector::Reflect),
            quote!(downcast_mut),
            quote!(this),
        ),
        ReceiverMode::Ref => (
            quote!(&dyn ::reflector::Reflect),
            quote!(downcast_ref),
            quote!(this),
        ),
        ReceiverMode::Owned => (
            quote!(&dyn ::reflector::Reflect),
            quote!(downcast_ref),
            quote!(::core::clone::Clone::clone(this)),
        ),
    };

    let arg_names: Vec<_> = (0..method.inputs.len()).map(|i| format_ident!("__arg{}", i)).collect();
    let arg_conversions = method.inputs.iter().zip(&arg_names).enumerate().map(|(index, (ty, arg))| {
        quote! {
            let #arg = <#ty as ::reflector::FromValue>::from_value(
                args.next().unwrap_or(::reflector::Value::Nil),
            )
            .map_err(|source| ::reflector::ReflectError::InvalidArgument {
                method: ::reflector::__private::String::from(#name),
                index: #index,
                source,
            })?;
        }
    });

    let box_outputs = match &method.outputs {
        Outputs::Plain(shape) => {
            let (parts, binding) = destructure(shape, quote!(ret));
            quote! {
                #binding
                ::reflector::__private::Ok(::reflector::__private::vec![
                    #(::reflector::Reflect::to_value(&#parts)),*
                ])
            }
        }
        Outputs::Fallible(shape) => {
            let (parts, binding) = destructure(shape, quote!(ok));
            let types = &shape.types;
            quote! {
                match ret {
                    ::reflector::__private::Ok(ok) => {
                        #binding
                        ::reflector::__private::Ok(::reflector::__private::vec![
                            #(::reflector::Reflect::to_value(&#parts),)*
                            ::reflector::Value::Nil
                        ])
                    }
                    ::reflector::__private::Err(err) => {
                        ::reflector::__private::Ok(::reflector::__private::vec![
                            #(<#types as ::reflector::Typed>::type_info().zero_value(),)*
                            ::reflector::Value::Error(::reflector::__private::ToString::to_string(&err))
                        ])
                    }
                }
            }
        }
    };

    quote! {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        fn #invoker(
            recv: #recv_ty,
            args: ::reflector::__private::Vec<::reflector::Value>,
        ) -> ::reflector::__private::Result<
            ::reflector::__private::Vec<::reflector::Value>,
            ::reflector::ReflectError,
        > {
            let this = recv
                .#downcast::<#self_ty>()
                .ok_or(::reflector::ReflectError::ReceiverMismatch { expected: #self_name })?;
            let mut args = args.into_iter();
            #(#arg_conversions)*
            let ret = #call_target.#ident(#(#arg_names),*);
            #box_outputs
        }
    }
}
