use serde::{de::DeserializeOwned, Serialize};
use sj_error::FieldError;
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueFormat, PgValueRef},
    types::JsonValue,
    Database, Decode, Encode, Postgres, Type, TypeInfo, ValueRef,
};

use crate::field::{Field, Valuer};
use crate::value::RawValue;

use super::{decode_field, ColumnClass};

pub const JSONB_VERSION: u8 = 1;

/// Maps a PostgreSQL type name to the way it is read.
pub fn column_class(type_name: &str) -> ColumnClass {
    match type_name {
        "JSONB" => ColumnClass::Jsonb,
        "JSON" | "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => ColumnClass::Text,
        "BYTEA" => ColumnClass::Bytes,
        _ => ColumnClass::Unsupported,
    }
}

/// Strips the format version byte from a binary JSONB payload.
pub fn strip_jsonb_version(payload: &[u8]) -> Result<&[u8], FieldError> {
    match payload.split_first() {
        Some((&JSONB_VERSION, json)) => Ok(json),
        Some((&version, _)) => Err(FieldError::InvalidJsonbVersion(version)),
        None => Err(FieldError::InvalidJsonbVersion(0)),
    }
}

impl<T> Type<Postgres> for Field<T> {
    fn type_info() -> PgTypeInfo {
        <JsonValue as Type<Postgres>>::type_info()
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}

// Always sent as binary JSONB; the configured encoding only changes what the
// codec hands over, the payload bytes are the same JSON either way.
impl<'q, T: Serialize> Encode<'q, Postgres> for Field<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.value()? {
            Some(stored) => {
                buf.push(JSONB_VERSION);
                buf.extend_from_slice(stored.as_bytes());
                Ok(IsNull::No)
            }
            None => Ok(IsNull::Yes),
        }
    }
}

/// Turns a non-NULL PostgreSQL payload into the value a field reads.
/// `BYTEA` payloads must already be unescaped.
pub fn raw_value<'a>(
    type_name: &'a str,
    binary: bool,
    payload: &'a [u8],
) -> Result<RawValue<'a>, FieldError> {
    Ok(match column_class(type_name) {
        ColumnClass::Jsonb if binary => RawValue::Bytes(strip_jsonb_version(payload)?),
        ColumnClass::Jsonb | ColumnClass::Text => {
            std::str::from_utf8(payload).map_or(RawValue::Bytes(payload), RawValue::Text)
        }
        ColumnClass::Bytes => RawValue::Bytes(payload),
        ColumnClass::Unsupported => RawValue::Other(type_name),
    })
}

impl<'r, T: DeserializeOwned + Default> Decode<'r, Postgres> for Field<T> {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return decode_field(RawValue::Null);
        }

        let type_name = value.type_info().name().to_owned();
        let binary = matches!(value.format(), PgValueFormat::Binary);
        let bytea;
        let payload = match column_class(&type_name) {
            // Text-format BYTEA arrives hex-escaped.
            ColumnClass::Bytes => {
                bytea = <Vec<u8> as Decode<Postgres>>::decode(value)?;
                bytea.as_slice()
            }
            _ => value.as_bytes()?,
        };
        decode_field(raw_value(&type_name, binary, payload)?)
    }
}
