//! Implementation of the `#[derive(HostObject)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use crate::attrs::{FieldAttrs, TypeAttrs};

pub fn derive_host_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_host_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_host_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let type_name = attrs.name.clone().unwrap_or_else(|| name.to_string());
    let krate = attrs
        .krate
        .as_ref()
        .map_or_else(|| quote!(::fnspec_core), |path| quote!(#path));

    let field_arms = collect_fields(input, &krate)?;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let host_eq = attrs.eq.then(|| {
        quote! {
            fn host_eq(&self, other: &dyn #krate::HostObject) -> bool {
                other.as_any().downcast_ref::<Self>().is_some_and(|other| other == self)
            }
        }
    });

    let display = attrs.display.then(|| {
        quote! {
            fn to_display_string(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(self)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics #krate::HostObject for #name #ty_generics #where_clause {
            fn type_name(&self) -> &str {
                #type_name
            }

            fn field(&self, name: &str) -> ::std::option::Option<#krate::Value> {
                match name {
                    #(#field_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            #host_eq
            #display

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    })
}

/// One match arm per readable field.
fn collect_fields(input: &DeriveInput, krate: &TokenStream2) -> syn::Result<Vec<TokenStream2>> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "HostObject can only be derived for structs",
            ));
        }
    };

    let mut arms = Vec::new();
    if let Fields::Named(named) = fields {
        for field in &named.named {
            let field_attrs = FieldAttrs::from_attrs(&field.attrs)?;
            if !field_attrs.get {
                continue;
            }

            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let exposed = field_attrs.name.unwrap_or_else(|| ident.to_string());

            arms.push(quote! {
                #exposed => ::std::option::Option::Some(#krate::Value::from(
                    ::std::clone::Clone::clone(&self.#ident),
                )),
            });
        }
    }

    Ok(arms)
}
