//! Implementation of the #[map_structure] macro

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse2, Item, LitStr};

/// Check the key and the decorated item, then pass the item through
pub fn map_structure_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let key: LitStr = match parse2(attr) {
        Ok(key) => key,
        Err(e) => {
            return syn::Error::new(e.span(), "expected a native name, e.g. #[map_structure(\"VkExtent3D\")]")
                .to_compile_error()
        }
    };
    if key.value().trim().is_empty() {
        return syn::Error::new(key.span(), "native name must not be empty").to_compile_error();
    }

    let input: Item = match parse2(item.clone()) {
        Ok(input) => input,
        Err(e) => return e.to_compile_error(),
    };
    match input {
        Item::Struct(_) | Item::Enum(_) | Item::Type(_) | Item::Trait(_) => quote! { #input },
        _ => syn::Error::new_spanned(
            item,
            "#[map_structure] applies to a struct, enum, type alias or trait",
        )
        .to_compile_error(),
    }
}
