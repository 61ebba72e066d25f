use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type, TypePath};

pub(crate) struct TypeDecoded {
    /// Prototype [`Value`] tokens describing the column's native type.
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
}

/// Maps a field's Rust type to its column prototype, purely syntactically.
/// `Option<T>` unwraps to T and flags the column nullable; an unrecognized
/// single-segment path is treated as a user enum going through `EnumValue`.
pub(crate) fn decode_type(ty: &Type) -> TypeDecoded {
    if let Type::Reference(reference) = ty {
        return decode_type(&reference.elem);
    }
    let Type::Path(TypePath { path, .. }) = ty else {
        panic!("Unsupported field type `{}`", quote!(#ty));
    };
    let segment = path.segments.last().expect("a type path cannot be empty");
    let name = segment.ident.to_string();
    if name == "Option" {
        let PathArguments::AngleBracketed(args) = &segment.arguments else {
            panic!("`Option` must have an angle bracketed type argument");
        };
        let Some(GenericArgument::Type(inner)) = args.args.first() else {
            panic!("`Option` must wrap a type");
        };
        let mut decoded = decode_type(inner);
        decoded.nullable = true;
        return decoded;
    }
    let value = match name.as_str() {
        "bool" => quote!(::quern::Value::Boolean(None)),
        "i8" => quote!(::quern::Value::Int8(None)),
        "i16" => quote!(::quern::Value::Int16(None)),
        "i32" => quote!(::quern::Value::Int32(None)),
        "i64" => quote!(::quern::Value::Int64(None)),
        "i128" => quote!(::quern::Value::Int128(None)),
        "u8" => quote!(::quern::Value::UInt8(None)),
        "u16" => quote!(::quern::Value::UInt16(None)),
        "u32" => quote!(::quern::Value::UInt32(None)),
        "u64" => quote!(::quern::Value::UInt64(None)),
        "u128" => quote!(::quern::Value::UInt128(None)),
        "f32" => quote!(::quern::Value::Float32(None)),
        "f64" => quote!(::quern::Value::Float64(None)),
        "char" => quote!(::quern::Value::Char(None)),
        "String" | "str" => quote!(::quern::Value::Varchar(None)),
        "Vec" => quote!(::quern::Value::Blob(None)),
        "Decimal" => quote!(::quern::Value::Decimal(None, 0, 0)),
        "Date" => quote!(::quern::Value::Date(None)),
        "Time" => quote!(::quern::Value::Time(None)),
        "PrimitiveDateTime" => quote!(::quern::Value::Timestamp(None)),
        "OffsetDateTime" => quote!(::quern::Value::TimestampWithTimezone(None)),
        "Duration" => quote!(::quern::Value::Int64(None)),
        "Uuid" => quote!(::quern::Value::Uuid(None)),
        _ => quote!(::quern::Value::Enum(None)),
    };
    TypeDecoded {
        value,
        nullable: false,
    }
}
