//! `#[derive(Inject)]` implementation.

use darling::{FromDeriveInput, FromField, ast, util};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Index};

/// The type `#[derive(Inject)]` is applied to.
#[derive(FromDeriveInput)]
#[darling(supports(struct_any, enum_any))]
struct InjectTarget {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<util::Ignored, InjectField>,
}

#[derive(FromField)]
#[darling(forward_attrs(inject))]
struct InjectField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    attrs: Vec<syn::Attribute>,
}

pub(crate) fn derive_inject(input: &DeriveInput) -> darling::Result<TokenStream> {
    if let syn::Data::Union(_) = input.data {
        return Err(darling::Error::unsupported_shape("union").with_span(&input.ident));
    }
    let target = InjectTarget::from_derive_input(input)?;
    let ident = &target.ident;
    let (impl_generics, ty_generics, where_clause) = target.generics.split_for_impl();

    // Enums have nothing to inject into.
    let fields = match &target.data {
        ast::Data::Struct(fields) => fields.fields.as_slice(),
        ast::Data::Enum(_) => &[],
    };

    let mut errors = darling::Error::accumulator();
    let mut assignments = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(attr) = field.attrs.first() else {
            continue;
        };
        if errors
            .handle(attr.meta.require_path_only().map_err(darling::Error::from))
            .is_none()
        {
            continue;
        }
        if field.attrs.len() > 1 {
            errors.push(
                darling::Error::custom("duplicate #[inject] attribute").with_span(&field.attrs[1]),
            );
            continue;
        }

        let (member, name) = match &field.ident {
            Some(name) => (quote!(#name), name.to_string()),
            None => {
                let position = Index::from(index);
                (quote!(#position), index.to_string())
            }
        };
        let ty = &field.ty;
        let required_by = format!("{ident}.{name}");

        assignments.push(quote! {
            self.#member = injector.require_for::<#ty>(#required_by)?;
        });
    }

    errors.finish()?;

    let injector = format_ident!("injector");
    Ok(quote! {
        impl #impl_generics ::wasil::Inject for #ident #ty_generics #where_clause {
            fn inject(&mut self, #injector: &::wasil::Injector) -> ::wasil::Result<()> {
                let _ = &#injector;
                #(#assignments)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> darling::Result<String> {
        let input: DeriveInput = syn::parse2(input).expect("valid item");
        derive_inject(&input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn tagged_named_field_is_assigned() {
        let out = expand(quote! {
            struct Handler {
                #[inject]
                db: Database,
                hits: u64,
            }
        })
        .unwrap();

        assert!(out.contains("self . db = injector . require_for :: < Database > (\"Handler.db\")"));
        assert!(!out.contains("self . hits"));
    }

    #[test]
    fn tuple_field_uses_position() {
        let out = expand(quote! {
            struct Pair(u8, #[inject] String);
        })
        .unwrap();

        assert!(out.contains("self . 1 = injector . require_for :: < String > (\"Pair.1\")"));
    }

    #[test]
    fn enum_gets_noop_impl() {
        let out = expand(quote! {
            enum Mode { Fast, Slow }
        })
        .unwrap();

        assert!(out.contains("impl :: wasil :: Inject for Mode"));
        assert!(!out.contains("require_for"));
    }

    #[test]
    fn generics_are_carried() {
        let out = expand(quote! {
            struct Wrapper<T: Clone> {
                #[inject]
                inner: T,
            }
        })
        .unwrap();

        assert!(out.contains("impl < T : Clone > :: wasil :: Inject for Wrapper < T >"));
    }

    #[test]
    fn union_is_rejected() {
        let err = expand(quote! {
            union Bits { a: u32, b: f32 }
        })
        .unwrap_err();
        assert!(err.to_string().contains("union"));
    }

    #[test]
    fn inject_with_arguments_is_rejected() {
        assert!(expand(quote! {
            struct Handler {
                #[inject(lazy)]
                db: Database,
            }
        })
        .is_err());
    }
}
