use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

struct CliField {
    ident: syn::Ident,
    long: String,
    parse_with: Option<Path>,
    ty: syn::Type,
}

/// Generates `Self::split_arg` and `Self::apply_cli_option` for a struct of
/// options. Only fields carrying `#[cli(long = "...")]` participate; any
/// other option name falls through so the caller can handle flags by hand.
pub fn expand(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = &input.ident;

    let fields = match collect_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let arms = fields.iter().map(|field| {
        let ident = &field.ident;
        let long = LitStr::new(&field.long, Span::call_site());
        let parse = utils::value_parse_expr(&field.ty, field.parse_with.as_ref());
        quote! {
            #long => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#ident = #parse;
                Ok(true)
            }
        }
    });

    let expanded = quote! {
        impl #struct_ident {
            /// Splits `--name=value` or peeks the next token for `--name value`.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((name, value)) = raw_name.split_once('=') {
                    return (name.to_string(), Some(value.to_string()));
                }
                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next(),
                    _ => None,
                };
                (raw_name.to_string(), value)
            }

            /// Applies one option. Returns `Ok(false)` for names this struct
            /// does not own.
            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<CliField>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions requires named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };

        let mut long: Option<String> = None;
        let mut parse_with: Option<Path> = None;
        for attr in &field.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str(&lit.value())?);
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected long/parse_with"))
            })?;
        }

        if let Some(long) = long {
            fields.push(CliField {
                ident,
                long,
                parse_with,
                ty: field.ty.clone(),
            });
        }
    }

    Ok(fields)
}
