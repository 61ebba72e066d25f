use crate::decode_type::{decode_type, TypeDecoded};
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{parse::ParseBuffer, Field, Ident, LitStr, Path};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
    pub(crate) key: bool,
    pub(crate) converter: Option<Path>,
}

pub(crate) fn decode_column(field: &Field) -> ColumnMetadata {
    let TypeDecoded { value, nullable } = decode_type(&field.ty);
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut metadata = ColumnMetadata {
        name: ident.to_string(),
        ident,
        value,
        nullable,
        key: false,
        converter: None,
    };
    if metadata.name.starts_with('_') {
        metadata.name.remove(0);
    }
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("quern") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `quern`, use it like: `#[quern(attribute = value, ...)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `name`, use it like: `#[quern(name = \"my_column\")]`");
                    };
                    metadata.name = v.value();
                } else if arg.path.is_ident("key") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!("Error while parsing `key`, use it like: `#[quern(key)]`");
                    };
                    metadata.key = true;
                } else if arg.path.is_ident("converter") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Path>) else {
                        panic!("Error while parsing `converter`, use it like: `#[quern(converter = my_function)]`");
                    };
                    metadata.converter = Some(v);
                } else {
                    panic!(
                        "Unknown attribute `{}` inside quern macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    metadata
}
