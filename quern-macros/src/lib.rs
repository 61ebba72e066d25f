mod column_trait;
mod decode_column;
mod decode_expression;
mod decode_type;
mod evaluated;
mod table_name;

use column_trait::column_trait;
use decode_column::decode_column;
use decode_expression::decode_expression;
use evaluated::mark_evaluated;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Expr, ItemStruct};
use table_name::{schema_name, table_name};

/// Derives the entity bindings for a struct: its static field descriptor
/// table, row construction and decomposition, and one `ColumnRef` constant
/// per field for use inside [`expr!`] predicates.
///
/// The key is taken from `#[quern(key)]` fields; without one, a field named
/// `id` or `{struct_name}id` (case-insensitive) is inferred as the key.
#[proc_macro_derive(Entity, attributes(schema_name, table_name, quern))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let table = table_name(&item);
    let schema = schema_name(&item);
    let mut columns: Vec<_> = item.fields.iter().map(decode_column).collect();
    if !columns.iter().any(|c| c.key) {
        let type_key = format!("{}id", name).to_lowercase();
        let inferred = columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case("id"))
            .or_else(|| {
                columns
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(&type_key))
            });
        if let Some(i) = inferred {
            columns[i].key = true;
        }
    }
    let count = columns.len();
    let field_defs = columns.iter().map(|c| {
        let member = c.ident.to_string();
        let column = &c.name;
        let value = &c.value;
        let nullable = c.nullable;
        let key = c.key;
        let converter = match &c.converter {
            Some(path) => quote!(Some(#path)),
            None => quote!(None),
        };
        quote! {
            ::quern::FieldDef {
                member: #member,
                column_ref: ::quern::ColumnRef {
                    name: #column,
                    table: #table,
                    schema: #schema,
                },
                value: #value,
                nullable: #nullable,
                key: #key,
                converter: #converter,
            }
        }
    });
    let from_row_fields = columns.iter().enumerate().map(|(i, c)| {
        let ident = &c.ident;
        quote!(#ident: mapper.read(row, &fields[#i])?)
    });
    let row_values = columns.iter().map(|c| {
        let ident = &c.ident;
        quote!(::quern::AsValue::as_value(self.#ident.clone()))
    });
    let column = column_trait(&item, &columns, &table, &schema);
    quote! {
        #column

        impl ::quern::FromRow for #name {
            fn from_row(
                row: &::quern::RowLabeled,
                mapper: &mut ::quern::RowMapper,
            ) -> ::quern::Result<Self> {
                let fields = <#name as ::quern::Entity>::fields();
                Ok(Self {
                    #(#from_row_fields,)*
                })
            }
        }

        impl ::quern::Entity for #name {
            fn table_ref() -> &'static ::quern::TableRef {
                static TABLE_REF: ::quern::TableRef = ::quern::TableRef {
                    name: #table,
                    schema: #schema,
                    alias: "",
                };
                &TABLE_REF
            }

            fn fields() -> &'static [::quern::FieldDef] {
                static FIELDS: [::quern::FieldDef; #count] = [#(#field_defs),*];
                &FIELDS
            }

            fn row(&self) -> Vec<::quern::Value> {
                vec![#(#row_values),*]
            }
        }
    }
    .into()
}

/// Translates a Rust expression into the query expression tree. Columns are
/// referenced through the derive's associated constants, `#var` embeds an
/// outer variable's value, `== None` renders as IS NULL, and
/// `contains`/`starts_with`/`ends_with` calls become LIKE patterns.
#[proc_macro]
pub fn expr(input: TokenStream) -> TokenStream {
    let input = mark_evaluated(input.into());
    let expr = match syn::parse2::<Expr>(input) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    decode_expression(&expr).into()
}
