use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for the engine's `Component` trait
///
/// The persisted name defaults to the struct name and can be overridden with
/// `#[component(name = "...")]`.
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut component_name = name.to_string();
    for attr in &input.attrs {
        if attr.path().is_ident("component") {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    component_name = value.value();
                    Ok(())
                } else {
                    Err(meta.error("unsupported component attribute"))
                }
            });
            if let Err(err) = parsed {
                return err.to_compile_error().into();
            }
        }
    }

    let expanded = quote! {
        impl #impl_generics ::engine::component_system::Component for #name #ty_generics #where_clause {
            fn component_name() -> &'static str {
                #component_name
            }
        }
    };

    TokenStream::from(expanded)
}
