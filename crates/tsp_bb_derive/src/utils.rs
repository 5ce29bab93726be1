use quote::quote;
use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

/// `SolverMode` -> `solver-mode`, `X` -> `x`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Returns the `T` of `Option<T>`, accepting the bare, `std::option` and
/// `core::option` spellings.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };

    let is_option = match path.segments.len() {
        1 => path.segments[0].ident == "Option",
        3 => {
            (path.segments[0].ident == "std" || path.segments[0].ident == "core")
                && path.segments[1].ident == "option"
                && path.segments[2].ident == "Option"
        }
        _ => false,
    };
    if !is_option {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &path.segments.last()?.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Expression that turns the raw CLI string `raw` into the field's type,
/// either through a caller-supplied parser or `FromStr`. Errors are reported
/// through the consuming crate's `Error` type.
pub fn value_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    match parse_with {
        Some(parser) => quote! { #parser(&raw)? },
        None => quote! {
            raw.parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        },
    }
}
