use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

/// Generates a `Display` impl that prints every field as an aligned
/// `\tkey = value` line. `#[kv(name = "...")]` overrides the key,
/// `#[kv(fmt = "len"|"path"|"display")]` picks how the value is rendered.
pub fn expand(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = &input.ident;

    let Data::Struct(data) = &input.data else {
        return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(named) = &data.fields else {
        return syn::Error::new(input.span(), "KvDisplay requires named fields")
            .to_compile_error()
            .into();
    };

    let mut keys: Vec<String> = Vec::new();
    let mut values = Vec::new();

    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let mut key = ident.to_string();
        let mut fmt_mode = String::from("display");

        for attr in &field.attrs {
            if !attr.path().is_ident("kv") {
                continue;
            }
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    key = lit.value();
                    return Ok(());
                }
                if meta.path.is_ident("fmt") {
                    let lit: LitStr = meta.value()?.parse()?;
                    fmt_mode = lit.value();
                    return Ok(());
                }
                Err(meta.error("unsupported kv attribute; expected name/fmt"))
            });
            if let Err(err) = result {
                return err.to_compile_error().into();
            }
        }

        values.push(match fmt_mode.as_str() {
            "display" => quote! { &self.#ident },
            "len" => quote! { &self.#ident.len() },
            "path" => quote! { &self.#ident.display() },
            other => {
                return syn::Error::new(field.span(), format!("unsupported kv fmt mode: {other}"))
                    .to_compile_error()
                    .into();
            }
        });
        keys.push(key);
    }

    let widest = keys.iter().map(String::len).max().unwrap_or(0);
    let lines: Vec<String> = keys
        .iter()
        .map(|key| format!("\t{key}{} = {{}}", " ".repeat(widest - key.len())))
        .collect();
    let template = LitStr::new(&format!("\n{}", lines.join("\n")), Span::call_site());

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #template, #(#values),*)
            }
        }
    };

    TokenStream::from(expanded)
}
