use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use crate::utils;

/// Generates `fn new(...)` taking every non-`Option` field in declaration
/// order, plus a `with_<field>` builder for each `Option` field (initialised
/// to `None`). Named structs only.
pub fn expand(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(name, "New can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(named) = &data.fields else {
        return syn::Error::new_spanned(name, "New requires named fields")
            .to_compile_error()
            .into();
    };

    let mut params = Vec::new();
    let mut inits = Vec::new();
    let mut builders = Vec::new();

    for field in &named.named {
        let ident = field.ident.as_ref().expect("named field");
        if let Some(inner) = utils::option_inner(&field.ty) {
            inits.push(quote! { #ident: None });
            let method = format_ident!("with_{}", ident);
            builders.push(quote! {
                pub fn #method(mut self, #ident: #inner) -> Self {
                    self.#ident = Some(#ident);
                    self
                }
            });
        } else {
            let ty = &field.ty;
            params.push(quote! { #ident: #ty });
            inits.push(quote! { #ident });
        }
    }

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub fn new(#(#params),*) -> Self {
                Self { #(#inits),* }
            }

            #(#builders)*
        }
    };

    TokenStream::from(expanded)
}
