//! Implementation of #[derive(Injectable)] proc-macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

pub fn derive_injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(crate::Contract));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Some(&fields.named),
            // Dependency-free leaves
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                return syn::Error::new_spanned(
                    &input,
                    "Injectable can only be derived for structs with named fields or unit structs",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Injectable can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    // Parameter contracts in field declaration order
    let param_contracts = fields.iter().flat_map(|fields| fields.iter()).map(|field| {
        let field_type = &field.ty;
        quote! { <#field_type as crate::Contract>::contract() }
    });

    let build_closure = match fields {
        Some(fields) if !fields.is_empty() => {
            let field_inits = fields.iter().map(|field| {
                let field_name = field.ident.as_ref().unwrap();
                let field_type = &field.ty;
                quote! {
                    #field_name: args.take::<#field_type>(
                        &<#field_type as crate::Contract>::contract(),
                    )?
                }
            });
            quote! {
                |mut args: crate::Args| {
                    Ok(crate::Instance::new(Self {
                        #(#field_inits),*
                    }))
                }
            }
        }
        Some(_) => quote! {
            |_args: crate::Args| Ok(crate::Instance::new(Self {}))
        },
        None => quote! {
            |_args: crate::Args| Ok(crate::Instance::new(Self))
        },
    };

    let casts = match parse_implements(&input) {
        Ok(casts) => casts,
        Err(err) => return err.to_compile_error().into(),
    };
    let cast_adds = casts.iter().map(|surfaced_type| {
        quote! {
            .with_cast(
                <#surfaced_type as crate::Contract>::contract(),
                |instance: crate::Instance| {
                    let concrete = instance.downcast::<Self>().map_err(|_| {
                        crate::ResolveError::WrongInstanceType(
                            <Self as crate::Contract>::contract(),
                        )
                    })?;
                    let surfaced: #surfaced_type = Box::new(concrete);
                    Ok(crate::Instance::new(surfaced))
                },
            )
        }
    });

    let expanded = quote! {
        impl #impl_generics crate::Injectable for #name #ty_generics #where_clause {
            fn descriptor() -> crate::TypeDescriptor {
                crate::TypeDescriptor::concrete(<Self as crate::Contract>::contract())
                    .with_constructor(crate::Constructor::new(
                        vec![#(#param_contracts),*],
                        #build_closure,
                    ))
                    #(#cast_adds)*
            }
        }
    };

    TokenStream::from(expanded)
}

/// Parses #[implements(Box<dyn Trait>, ...)] attributes into the listed
/// trait-object types.
fn parse_implements(input: &DeriveInput) -> syn::Result<Vec<syn::Type>> {
    let mut types = Vec::new();
    for attr in &input.attrs {
        if attr.path().is_ident("implements") {
            let parsed = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Type, syn::Token![,]>::parse_terminated,
            )?;
            types.extend(parsed);
        }
    }
    Ok(types)
}
