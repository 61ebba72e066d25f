use crate::decode_column::ColumnMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Ident, ItemStruct};

/// One associated `ColumnRef` constant per field, named after the field, so
/// predicates can reference columns as `Entity::field`.
pub(crate) fn column_trait(
    item: &ItemStruct,
    columns: &[ColumnMetadata],
    table: &str,
    schema: &str,
) -> TokenStream {
    let struct_name = &item.ident;
    let trait_name = Ident::new(&format!("{}ColumnTrait", struct_name), item.span());
    let declarations = columns.iter().map(|c| {
        let ident = &c.ident;
        quote! {
            #[allow(non_upper_case_globals)]
            const #ident: ::quern::ColumnRef;
        }
    });
    let definitions = columns.iter().map(|c| {
        let ident = &c.ident;
        let name = &c.name;
        quote! {
            #[allow(non_upper_case_globals)]
            const #ident: ::quern::ColumnRef = ::quern::ColumnRef {
                name: #name,
                table: #table,
                schema: #schema,
            };
        }
    });
    quote! {
        #[allow(dead_code)]
        trait #trait_name {
            #(#declarations)*
        }
        impl #trait_name for #struct_name {
            #(#definitions)*
        }
    }
}
