use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

/// For a unit-variant enum, generates `fn parse(&str) -> Result<Self>` that
/// accepts kebab-case names (plus `#[cli(alias = "...")]` spellings) and a
/// matching `Display` impl. The `#[cli_value(option = "...")]` attribute
/// names the CLI option in error messages.
pub fn expand(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = &input.ident;

    let Data::Enum(data) = &input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut option_name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in &input.attrs {
        if !attr.path().is_ident("cli_value") {
            continue;
        }
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                option_name = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
        });
        if let Err(err) = result {
            return err.to_compile_error().into();
        }
    }

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut canonical_names = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.span(), "CliValue only supports unit variants")
                .to_compile_error()
                .into();
        }

        let variant_ident = &variant.ident;
        let mut canonical = utils::to_kebab_case(&variant_ident.to_string());
        let mut spellings: Vec<String> = Vec::new();

        for attr in &variant.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    canonical = lit.value();
                    return Ok(());
                }
                if meta.path.is_ident("alias") {
                    let lit: LitStr = meta.value()?.parse()?;
                    spellings.push(lit.value());
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected name/alias"))
            });
            if let Err(err) = result {
                return err.to_compile_error().into();
            }
        }

        let canonical_lit = LitStr::new(&canonical, Span::call_site());
        let mut patterns = vec![canonical_lit.clone()];
        patterns.extend(
            spellings
                .iter()
                .map(|alias| LitStr::new(alias, Span::call_site())),
        );
        canonical_names.push(canonical);

        parse_arms.push(quote! {
            #(#patterns)|* => Ok(Self::#variant_ident),
        });
        display_arms.push(quote! {
            Self::#variant_ident => #canonical_lit,
        });
    }

    let expected = LitStr::new(&canonical_names.join("|"), Span::call_site());
    let option = LitStr::new(&option_name, Span::call_site());

    let expanded = quote! {
        impl #enum_ident {
            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option, raw, #expected
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let value = match self {
                    #(#display_arms)*
                };
                write!(f, "{value}")
            }
        }
    };

    TokenStream::from(expanded)
}
