use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    mysql::{MySqlTypeInfo, MySqlValueRef},
    Database, Decode, Encode, MySql, Type, TypeInfo, ValueRef,
};

use crate::{
    field::{Field, Valuer},
    value::{RawValue, StoredValue},
};

use super::{decode_field, ColumnClass};

/// Maps a MySQL type name to the way it is read.
pub fn column_class(type_name: &str) -> ColumnClass {
    match type_name {
        "JSON" | "ENUM" => ColumnClass::Text,
        name if name.contains("TEXT") || name.contains("CHAR") => ColumnClass::Text,
        name if name.contains("BLOB") || name.contains("BINARY") => ColumnClass::Bytes,
        _ => ColumnClass::Unsupported,
    }
}

impl<T> Type<MySql> for Field<T> {
    fn type_info() -> MySqlTypeInfo {
        <str as Type<MySql>>::type_info()
    }

    fn compatible(_ty: &MySqlTypeInfo) -> bool {
        true
    }
}

impl<'q, T: Serialize> Encode<'q, MySql> for Field<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <MySql as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.value()? {
            Some(StoredValue::Text(text)) => Encode::<MySql>::encode(text, buf),
            Some(StoredValue::Bytes(bytes)) => Encode::<MySql>::encode(bytes, buf),
            None => Ok(IsNull::Yes),
        }
    }
}

/// Turns a non-NULL MySQL payload into the value a field reads.
pub fn raw_value<'a>(type_name: &'a str, payload: &'a [u8]) -> RawValue<'a> {
    match column_class(type_name) {
        ColumnClass::Text => {
            std::str::from_utf8(payload).map_or(RawValue::Bytes(payload), RawValue::Text)
        }
        ColumnClass::Bytes => RawValue::Bytes(payload),
        ColumnClass::Jsonb | ColumnClass::Unsupported => RawValue::Other(type_name),
    }
}

impl<'r, T: DeserializeOwned + Default> Decode<'r, MySql> for Field<T> {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return decode_field(RawValue::Null);
        }

        let type_name = value.type_info().name().to_owned();
        let payload = <&[u8] as Decode<MySql>>::decode(value)?;
        decode_field(raw_value(&type_name, payload))
    }
}
