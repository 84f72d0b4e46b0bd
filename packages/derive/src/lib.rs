//! Derive macro for tagscrape.
//!
//! `#[derive(Unmarshal)]` on a struct generates the record descriptor: one
//! field entry per struct field, annotated with `#[scrape("...")]`. With the
//! `#[scrape(custom)]` container attribute the type is instead decoded by its
//! own `UnmarshalHtml` implementation.
//!
//! ```ignore
//! #[derive(Default, Unmarshal)]
//! struct Link {
//!     #[scrape(",[href]")]
//!     href: String,
//!     #[scrape("span.label")]
//!     label: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, GenericParam, Generics,
    Index, Lifetime, LifetimeParam, LitStr, Member,
};

const ATTRIBUTE: &str = "scrape";

/// Derives `tagscrape::Unmarshal` (and `tagscrape::Record` for plain structs).
///
/// Field attributes:
/// * `#[scrape("selector,value,...")]` - annotation for the field; fields
///   without one are skipped unless their type decodes raw nodes
///
/// Container attributes:
/// * `#[scrape(custom)]` - decode through the type's `UnmarshalHtml` impl
#[proc_macro_derive(Unmarshal, attributes(scrape))]
pub fn derive_unmarshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if is_custom(&input.attrs)? {
        return Ok(expand_custom(input));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Unmarshal can only be derived for structs, use #[scrape(custom)] for other types",
        ));
    };

    let mut entries = Vec::new();
    for (index, field) in data.fields.iter().enumerate() {
        let (member, name) = match &field.ident {
            Some(ident) => (
                Member::Named(ident.clone()),
                ident.to_string().trim_start_matches("r#").to_string(),
            ),
            None => (Member::Unnamed(Index::from(index)), index.to_string()),
        };
        let tag = field_tag(&field.attrs)?;
        entries.push(quote! {
            ::tagscrape::Field::new(#name, #tag, &mut self.#member)
        });
    }

    let (doc, mut generics) = doc_generics(&input.generics);
    if input.generics.type_params().next().is_some() {
        let where_clause = generics.make_where_clause();
        for field in field_types(&data.fields) {
            where_clause
                .predicates
                .push(parse_quote!(#field: ::tagscrape::Unmarshal<#doc>));
        }
    }

    let name = &input.ident;
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let (_, ty_generics, _) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagscrape::Unmarshal<#doc> for #name #ty_generics #where_clause {
            fn destination(&mut self) -> ::tagscrape::Dest<'_, #doc> {
                ::tagscrape::Dest::Record(self)
            }
        }

        impl #impl_generics ::tagscrape::Record<#doc> for #name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::tagscrape::Field<'_, #doc>> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

fn expand_custom(input: &DeriveInput) -> TokenStream2 {
    let name = &input.ident;
    let (doc, mut generics) = doc_generics(&input.generics);
    let (_, ty_generics, _) = input.generics.split_for_impl();

    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#name #ty_generics: ::tagscrape::UnmarshalHtml<#doc>));

    let (impl_generics, _, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::tagscrape::Unmarshal<#doc> for #name #ty_generics #where_clause {
            fn destination(&mut self) -> ::tagscrape::Dest<'_, #doc> {
                ::tagscrape::Dest::Custom(self)
            }

            fn accepts_raw_nodes() -> bool {
                true
            }
        }
    }
}

/// Document lifetime and the generics of the impl
///
/// A type with a lifetime parameter is decoded from documents of that
/// lifetime, so raw nodes can be stored in it. Otherwise a fresh lifetime is
/// introduced and the impl covers every document.
fn doc_generics(generics: &Generics) -> (Lifetime, Generics) {
    if let Some(param) = generics.lifetimes().next() {
        return (param.lifetime.clone(), generics.clone());
    }

    let doc = Lifetime::new("'__doc", Span::call_site());
    let mut generics = generics.clone();
    generics
        .params
        .insert(0, GenericParam::Lifetime(LifetimeParam::new(doc.clone())));
    (doc, generics)
}

fn field_types(fields: &Fields) -> impl Iterator<Item = &syn::Type> {
    fields.iter().map(|field| &field.ty)
}

fn is_custom(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut custom = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("custom") {
                custom = true;
                Ok(())
            } else {
                Err(meta.error("unknown scrape container attribute, expected `custom`"))
            }
        })?;
    }
    Ok(custom)
}

fn field_tag(attrs: &[Attribute]) -> syn::Result<String> {
    let mut tag = String::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        let lit: LitStr = attr.parse_args()?;
        tag = lit.value();
    }
    Ok(tag)
}
