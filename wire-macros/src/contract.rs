//! Implementation of #[derive(Contract)] proc-macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

pub fn derive_contract_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();

    if input.generics.lifetimes().next().is_some() {
        return syn::Error::new_spanned(
            &input.generics,
            "Contract cannot be derived for types with lifetime parameters",
        )
        .to_compile_error()
        .into();
    }

    let arg_idents: Vec<syn::Ident> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();

    // Bound every type parameter by Contract so instantiations can name
    // their argument contracts
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(crate::Contract));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let id_expr = if arg_idents.is_empty() {
        quote! { crate::ContractId::simple(#name_str) }
    } else {
        quote! {
            crate::ContractId::generic(
                #name_str,
                vec![#(<#arg_idents as crate::Contract>::contract()),*],
            )
        }
    };

    let expanded = quote! {
        impl #impl_generics crate::Contract for #name #ty_generics #where_clause {
            fn contract() -> crate::ContractId {
                #id_expr
            }
        }
    };

    TokenStream::from(expanded)
}
