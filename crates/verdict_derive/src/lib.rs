//! Attribute macros for the verdict test harness.
//!
//! These macros generate the metadata the harness discovers tests from:
//! - `test_class`: Implements `verdict_runtime::TestClass` for an inherent impl block, listing its constructors
//!   and methods, and resolving `#[test_method]` markers to stored invokers.
//!
//! Markers are read at expansion time, so nothing is looked up by name at run time.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, ItemImpl, PathArguments, ReturnType, Token, Type,
    parse_macro_input,
};

/// Marker attribute name recognised inside a `#[test_class]` impl block.
const TEST_MARKER: &str = "test_method";

/// Turns an inherent impl block into a discoverable test class.
///
/// Every `fn` in the block is recorded in declaration order. Functions carrying `#[test_method]` are marked as
/// tests; the marker is removed from the emitted code. Associated functions returning `Self` (or
/// `Result<Self, E>`) are recorded as constructors.
///
/// # Options
///
/// - `default`: also register `Default::default()` as a parameterless constructor.
///
/// # Example
/// ```ignore
/// pub struct MathTests;
///
/// #[test_class]
/// impl MathTests {
///     pub fn new() -> Self {
///         Self
///     }
///
///     #[test_method]
///     pub fn adds(&self) {
///         assert_equal(1 + 1, 2);
///     }
///
///     pub fn helper(&self) {}
/// }
///
/// // Generates:
/// impl verdict_runtime::TestClass for MathTests {
///     fn descriptor() -> verdict_runtime::ClassDescriptor {
///         // constructor `new` (0 params), method `adds` (marked, 0 params, invoker),
///         // method `helper` (unmarked, 0 params)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn test_class(args: TokenStream, input: TokenStream) -> TokenStream {
    let options = match ClassOptions::parse(args.into()) {
        Ok(options) => options,
        Err(err) => return err.to_compile_error().into(),
    };
    let mut item = parse_macro_input!(input as ItemImpl);

    match expand_test_class(&options, &mut item) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct ClassOptions {
    use_default: bool,
}

impl ClassOptions {
    fn parse(args: TokenStream2) -> syn::Result<Self> {
        let mut options = ClassOptions::default();
        let idents = Punctuated::<Ident, Token![,]>::parse_terminated.parse2(args)?;
        for ident in idents {
            if ident == "default" {
                options.use_default = true;
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown test_class option `{ident}` (expected `default`)"),
                ));
            }
        }
        Ok(options)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ConstructorKind {
    Plain,
    Fallible,
}

fn expand_test_class(options: &ClassOptions, item: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "#[test_class] must be placed on an inherent impl block",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(item.generics.span(), "test classes cannot be generic"));
    }

    let self_ty = item.self_ty.as_ref().clone();
    let class_name = type_name(&self_ty);

    let mut helpers = Vec::new();
    let mut entries = Vec::new();

    if options.use_default {
        let helper = format_ident!("__verdict_construct_default");
        helpers.push(quote! {
            fn #helper() -> ::std::result::Result<::std::boxed::Box<dyn ::std::any::Any>, ::std::string::String> {
                let instance: ::std::boxed::Box<dyn ::std::any::Any> =
                    ::std::boxed::Box::new(<#self_ty as ::std::default::Default>::default());
                ::std::result::Result::Ok(instance)
            }
        });
        entries.push(quote! {
            .with_constructor(::verdict_runtime::ConstructorInfo::parameterless(#helper))
        });
    }

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let marked = take_marker(method);
        let ident = method.sig.ident.clone();
        let name = ident.to_string();
        let param_count = method
            .sig
            .inputs
            .iter()
            .filter(|arg| matches!(arg, FnArg::Typed(_)))
            .count();
        let has_receiver = method.sig.receiver().is_some();

        if !marked && !has_receiver && method.sig.generics.params.is_empty() {
            if let Some(kind) = constructor_kind(&method.sig.output, &class_name) {
                if param_count == 0 {
                    let helper = format_ident!("__verdict_construct_{}", ident);
                    helpers.push(constructor_helper(&helper, &self_ty, &ident, kind));
                    entries.push(quote! {
                        .with_constructor(::verdict_runtime::ConstructorInfo::parameterless(#helper))
                    });
                } else {
                    entries.push(quote! {
                        .with_constructor(::verdict_runtime::ConstructorInfo::with_params(#param_count))
                    });
                }
                continue;
            }
        }

        let mut entry = quote! { ::verdict_runtime::MethodInfo::new(#name, #param_count) };
        if marked {
            validate_test_method(method)?;
            entry = quote! { #entry.marked_as_test() };
            if param_count == 0 {
                let helper = format_ident!("__verdict_invoke_{}", ident);
                helpers.push(invoker_helper(&helper, &self_ty, &class_name, &ident, has_receiver));
                entry = quote! { #entry.with_invoker(#helper) };
            }
        }
        entries.push(quote! { .with_method(#entry) });
    }

    Ok(quote! {
        #item

        impl ::verdict_runtime::TestClass for #self_ty {
            fn descriptor() -> ::verdict_runtime::ClassDescriptor {
                #(#helpers)*

                ::verdict_runtime::ClassDescriptor::new(#class_name)
                    .with_path(::std::concat!(::std::module_path!(), "::", #class_name))
                    #(#entries)*
            }
        }
    })
}

/// Removes `#[test_method]` from the function and reports whether it was present.
fn take_marker(method: &mut ImplItemFn) -> bool {
    let before = method.attrs.len();
    method.attrs.retain(|attr| !attr.path().is_ident(TEST_MARKER));
    method.attrs.len() != before
}

fn validate_test_method(method: &ImplItemFn) -> syn::Result<()> {
    let sig = &method.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(asyncness.span(), "test methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(sig.generics.span(), "test methods cannot be generic"));
    }
    if let Some(receiver) = sig.receiver() {
        let by_reference = receiver.reference.is_some() || matches!(receiver.ty.as_ref(), Type::Reference(_));
        if !by_reference {
            return Err(syn::Error::new(
                receiver.span(),
                "test methods must take `&self` or `&mut self`",
            ));
        }
    }
    Ok(())
}

fn constructor_helper(helper: &Ident, self_ty: &Type, ident: &Ident, kind: ConstructorKind) -> TokenStream2 {
    let build = match kind {
        ConstructorKind::Plain => quote! { <#self_ty>::#ident() },
        ConstructorKind::Fallible => quote! {
            <#self_ty>::#ident().map_err(|err| ::std::string::ToString::to_string(&err))?
        },
    };
    quote! {
        fn #helper() -> ::std::result::Result<::std::boxed::Box<dyn ::std::any::Any>, ::std::string::String> {
            let instance: ::std::boxed::Box<dyn ::std::any::Any> = ::std::boxed::Box::new(#build);
            ::std::result::Result::Ok(instance)
        }
    }
}

fn invoker_helper(
    helper: &Ident,
    self_ty: &Type,
    class_name: &str,
    ident: &Ident,
    has_receiver: bool,
) -> TokenStream2 {
    let call = if has_receiver {
        quote! {
            let instance = instance
                .downcast_mut::<#self_ty>()
                .ok_or_else(|| ::verdict_runtime::reflection::instance_mismatch(#class_name))?;
            ::verdict_runtime::IntoTestResult::into_test_result(instance.#ident())
        }
    } else {
        quote! {
            let _ = instance;
            ::verdict_runtime::IntoTestResult::into_test_result(<#self_ty>::#ident())
        }
    };
    quote! {
        fn #helper(instance: &mut dyn ::std::any::Any) -> ::std::result::Result<(), ::std::string::String> {
            #call
        }
    }
}

fn constructor_kind(output: &ReturnType, class_name: &str) -> Option<ConstructorKind> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    if names_class(ty, class_name) {
        return Some(ConstructorKind::Plain);
    }
    let Type::Path(path) = ty.as_ref() else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if names_class(inner, class_name) => Some(ConstructorKind::Fallible),
        _ => None,
    }
}

fn names_class(ty: &Type, class_name: &str) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Self" || segment.ident == class_name),
        _ => false,
    }
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_else(|| quote!(#ty).to_string()),
        _ => quote!(#ty).to_string(),
    }
}

