use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteTypeInfo, SqliteValueRef},
    Database, Decode, Encode, Sqlite, Type, TypeInfo, ValueRef,
};

use crate::{
    field::{Field, Valuer},
    value::{RawValue, StoredValue},
};

use super::{decode_field, ColumnClass};

/// Maps a SQLite storage class to the way it is read.
pub fn column_class(storage_class: &str) -> ColumnClass {
    match storage_class {
        "TEXT" => ColumnClass::Text,
        "BLOB" => ColumnClass::Bytes,
        _ => ColumnClass::Unsupported,
    }
}

impl<T> Type<Sqlite> for Field<T> {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    // Storage classes are checked while decoding so that the field reports
    // which one it got.
    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

impl<'q, T: Serialize> Encode<'q, Sqlite> for Field<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.value()? {
            Some(StoredValue::Text(text)) => Encode::<Sqlite>::encode(text, buf),
            Some(StoredValue::Bytes(bytes)) => Encode::<Sqlite>::encode(bytes, buf),
            None => Ok(IsNull::Yes),
        }
    }
}

impl<'r, T: DeserializeOwned + Default> Decode<'r, Sqlite> for Field<T> {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return decode_field(RawValue::Null);
        }

        let storage_class = value.type_info().name().to_owned();
        match column_class(&storage_class) {
            ColumnClass::Text => {
                let text = <&str as Decode<Sqlite>>::decode(value)?;
                decode_field(RawValue::Text(text))
            }
            ColumnClass::Bytes => {
                let bytes = <&[u8] as Decode<Sqlite>>::decode(value)?;
                decode_field(RawValue::Bytes(bytes))
            }
            ColumnClass::Jsonb | ColumnClass::Unsupported => {
                decode_field(RawValue::Other(&storage_class))
            }
        }
    }
}
