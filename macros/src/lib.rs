//! Derive macros for the Tidy state container
//!
//! This crate provides procedural macros to reduce boilerplate when defining
//! action enums.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates stable type names for action variants
//!
//! # Example
//!
//! ```ignore
//! use tidy_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     AddTodo { text: String },
//!     ToggleTodo { id: u64 },
//!
//!     #[action_type = "SET_VISIBILITY_FILTER"]
//!     SetFilter { filter: String },
//! }
//!
//! // Generated methods:
//! assert_eq!(TodoAction::AddTodo { text: "milk".into() }.action_type(), "ADD_TODO");
//! assert_eq!(TodoAction::ACTION_TYPES.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, Meta};

/// Derive macro for Action enums
///
/// Generates on the enum:
/// - `action_type(&self) -> &'static str` - the variant's type name
/// - `ACTION_TYPES: &[&str]` - every type name, in declaration order
///
/// The type name defaults to the variant name in `SCREAMING_SNAKE_CASE`
/// (`AddTodo` becomes `ADD_TODO`).
///
/// # Attributes
///
/// - `#[action_type = "NAME"]` - Override the type name of a variant
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - `#[action_type]` is not a string literal
/// - Two variants end up with the same type name
#[proc_macro_derive(Action, attributes(action_type))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut type_names: Vec<String> = Vec::with_capacity(data_enum.variants.len());
    let mut arms = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let type_name = match action_type_override(&variant.attrs) {
            Ok(Some(explicit)) => explicit,
            Ok(None) => screaming_snake_case(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        if type_names.contains(&type_name) {
            return syn::Error::new_spanned(
                variant,
                format!("duplicate action type name `{type_name}`"),
            )
            .to_compile_error()
            .into();
        }

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };
        arms.push(quote! { #pattern => #type_name, });
        type_names.push(type_name);
    }

    let expanded = quote! {
        impl #name {
            /// Type names of every action variant, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#type_names),*];

            /// Returns the type name of this action (e.g. `"ADD_TODO"`)
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                match self {
                    #(#arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[action_type = "..."]` from a variant's attributes
fn action_type_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("action_type")) else {
        return Ok(None);
    };

    if let Meta::NameValue(name_value) = &attr.meta {
        if let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = &name_value.value
        {
            return Ok(Some(value.value()));
        }
    }

    Err(syn::Error::new_spanned(
        attr,
        "expected #[action_type = \"NAME\"]",
    ))
}

/// `AddTodo` -> `ADD_TODO`, `SetHTTPFilter` -> `SET_HTTP_FILTER`
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
