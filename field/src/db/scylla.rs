use std::any::type_name;

use scylla::{
    cql_to_rust::{FromCqlVal, FromCqlValError},
    frame::response::result::{ColumnType, CqlValue},
    serialize::{
        value::{BuiltinSerializationError, BuiltinSerializationErrorKind, SerializeCql},
        writers::WrittenCellProof,
        CellWriter, SerializationError,
    },
};
use serde::{de::DeserializeOwned, Serialize};
use sj_error::FieldError;

use crate::{
    field::{Field, Valuer},
    value::RawValue,
};

use super::ColumnClass;

/// Maps a CQL column type to the way a field is written into it.
pub fn column_class(typ: &ColumnType) -> ColumnClass {
    match typ {
        ColumnType::Text | ColumnType::Ascii => ColumnClass::Text,
        ColumnType::Blob => ColumnClass::Bytes,
        _ => ColumnClass::Unsupported,
    }
}

/// Lowercase variant name of a CQL value, e.g. `timestamp` or `userdefinedtype`.
fn cql_type_name(cql_val: &CqlValue) -> String {
    format!("{cql_val:?}")
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

impl<T: Serialize> SerializeCql for Field<T> {
    fn serialize<'b>(
        &self,
        typ: &ColumnType,
        writer: CellWriter<'b>,
    ) -> Result<WrittenCellProof<'b>, SerializationError> {
        if column_class(typ) == ColumnClass::Unsupported {
            return Err(SerializationError::new(FieldError::unsupported_column_type(
                &format!("{typ:?}"),
            )));
        }

        let stored = match self.value().map_err(SerializationError::new)? {
            Some(stored) => stored,
            None => return Ok(writer.set_null()),
        };
        if matches!(typ, ColumnType::Ascii) && !stored.as_bytes().is_ascii() {
            return Err(SerializationError::new(FieldError::unsupported_column_type(
                "Ascii",
            )));
        }

        writer.set_value(stored.as_bytes()).map_err(|_| {
            SerializationError::new(BuiltinSerializationError {
                rust_name: type_name::<Self>(),
                got: typ.clone(),
                kind: BuiltinSerializationErrorKind::SizeOverflow,
            })
        })
    }
}

impl<T: DeserializeOwned + Default> FromCqlVal<CqlValue> for Field<T> {
    fn from_cql(cql_val: CqlValue) -> Result<Self, FromCqlValError> {
        let decoded = match &cql_val {
            CqlValue::Text(text) | CqlValue::Ascii(text) => Self::from_raw(RawValue::Text(text)),
            CqlValue::Blob(bytes) => Self::from_raw(RawValue::Bytes(bytes)),
            CqlValue::Empty => Self::from_raw(RawValue::Null),
            other => Self::from_raw(RawValue::Other(&cql_type_name(other))),
        };

        decoded.map_err(|err| {
            sj_log::debug("Field", format!("Failed to read CQL value: {err}"));
            match err {
                FieldError::UnsupportedInputType(_) => FromCqlValError::BadCqlType,
                _ => FromCqlValError::BadVal,
            }
        })
    }
}

impl<T: DeserializeOwned + Default> Field<T> {
    /// Reads a nullable CQL cell; NULL yields the default value.
    pub fn from_cql_opt(cql_val: Option<CqlValue>) -> Result<Self, FromCqlValError> {
        match cql_val {
            Some(cql_val) => Self::from_cql(cql_val),
            None => Self::from_raw(RawValue::Null).map_err(|_| FromCqlValError::BadVal),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use scylla::frame::value::CqlTimestamp;

    use super::*;
    use crate::field::as_field;

    fn serialize<T: Serialize>(field: &Field<T>, typ: &ColumnType) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        SerializeCql::serialize(field, typ, CellWriter::new(&mut buf)).ok()?;
        Some(buf)
    }

    #[test]
    fn classifies_column_types() {
        assert_eq!(column_class(&ColumnType::Text), ColumnClass::Text);
        assert_eq!(column_class(&ColumnType::Ascii), ColumnClass::Text);
        assert_eq!(column_class(&ColumnType::Blob), ColumnClass::Bytes);
        assert_eq!(column_class(&ColumnType::Int), ColumnClass::Unsupported);
    }

    #[test]
    fn writes_json_cell() {
        let buf = serialize(&as_field(vec![1]), &ColumnType::Text).unwrap();
        assert_eq!(buf, b"\x00\x00\x00\x03[1]");
    }

    #[test]
    fn json_null_writes_null_cell() {
        let buf = serialize(&Field::<Option<u8>>::new(None), &ColumnType::Blob).unwrap();
        assert_eq!(buf, (-1_i32).to_be_bytes());
    }

    #[test]
    fn rejects_non_text_columns() {
        assert!(serialize(&as_field(1), &ColumnType::Int).is_none());
        assert!(serialize(&as_field("é"), &ColumnType::Ascii).is_none());
        assert!(serialize(&as_field("e"), &ColumnType::Ascii).is_some());
    }

    #[test]
    fn reads_text_and_blob_values() {
        let from_text =
            Field::<HashMap<String, u8>>::from_cql(CqlValue::Text(r#"{"a":1}"#.to_owned()))
                .unwrap();
        let from_blob =
            Field::<HashMap<String, u8>>::from_cql(CqlValue::Blob(br#"{"a":1}"#.to_vec()))
                .unwrap();

        assert_eq!(from_text, from_blob);
        assert_eq!(from_text.get().get("a"), Some(&1));
    }

    #[test]
    fn rejects_other_cql_values() {
        assert!(matches!(
            Field::<Vec<u8>>::from_cql(CqlValue::Int(4)),
            Err(FromCqlValError::BadCqlType)
        ));
        assert!(matches!(
            Field::<Vec<u8>>::from_cql(CqlValue::Text("[".to_owned())),
            Err(FromCqlValError::BadVal)
        ));
    }

    #[test]
    fn names_every_cql_type() {
        assert_eq!(cql_type_name(&CqlValue::BigInt(1)), "bigint");
        assert_eq!(cql_type_name(&CqlValue::Timestamp(CqlTimestamp(0))), "timestamp");
        assert_eq!(cql_type_name(&CqlValue::Tuple(vec![None])), "tuple");
    }

    #[test]
    fn unsupported_value_error_names_its_type() {
        let err = Field::<Vec<u8>>::from_raw(RawValue::Other(&cql_type_name(
            &CqlValue::Timestamp(CqlTimestamp(0)),
        )))
        .unwrap_err();
        assert!(err.is_unsupported_input_type());
        assert!(err.to_string().ends_with("timestamp"));
    }

    #[test]
    fn null_cell_yields_default() {
        let field = Field::<Vec<u8>>::from_cql_opt(None).unwrap();
        assert!(field.is_empty());
    }
}
