use std::ops::{Deref, DerefMut};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sj_error::Result;

use crate::{
    codec::{codec, Codec},
    value::{RawValue, StoredValue},
};

/// Read side of a column binding: fills `self` from a raw column value.
pub trait Scanner {
    fn scan(&mut self, raw: RawValue<'_>) -> Result<()>;
}

/// Write side of a column binding: produces the column value, `None` for
/// SQL NULL.
pub trait Valuer {
    fn value(&self) -> Result<Option<StoredValue>>;
}

/// A value stored as JSON in a single database column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field<T> {
    data: T,
}

impl<T> Field<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn get(&self) -> &T {
        &self.data
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: DeserializeOwned> Field<T> {
    pub fn scan_with(&mut self, codec: &Codec, raw: RawValue<'_>) -> Result<()> {
        sj_log::trace("Field", format!("Scanning {} column value", raw.kind()));
        codec.decode_into(&mut self.data, raw)
    }
}

impl<T: DeserializeOwned + Default> Field<T> {
    /// Decodes into a fresh `T::default()`; SQL NULL yields the default.
    pub fn from_raw(raw: RawValue<'_>) -> Result<Self> {
        let mut field = Self::default();
        field.scan(raw)?;
        Ok(field)
    }
}

impl<T: Serialize> Field<T> {
    pub fn value_with(&self, codec: &Codec) -> Result<Option<StoredValue>> {
        sj_log::trace("Field", "Encoding column value");
        codec.encode(&self.data)
    }
}

impl<T: DeserializeOwned> Scanner for Field<T> {
    fn scan(&mut self, raw: RawValue<'_>) -> Result<()> {
        self.scan_with(&codec(), raw)
    }
}

impl<T: Serialize> Valuer for Field<T> {
    fn value(&self) -> Result<Option<StoredValue>> {
        self.value_with(&codec())
    }
}

impl<T> From<T> for Field<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T> Deref for Field<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for Field<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

impl<T> AsRef<T> for Field<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

pub fn as_field<T>(data: T) -> Field<T> {
    Field::new(data)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use sj_config::codec::{DecodeMode, Encoding};

    use super::*;

    #[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
    struct Settings {
        theme: String,
        volume: u8,
        shortcuts: HashMap<String, String>,
        parent: Option<Box<Settings>>,
    }

    fn settings() -> Settings {
        Settings {
            theme: "dark".to_owned(),
            volume: 7,
            shortcuts: HashMap::from([("save".to_owned(), "ctrl+s".to_owned())]),
            parent: Some(Box::new(Settings {
                theme: "light".to_owned(),
                ..Default::default()
            })),
        }
    }

    fn round_trip<T>(value: T) -> T
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let stored = as_field(value).value().unwrap().expect("non-null json");
        Field::<T>::from_raw(stored.as_raw()).unwrap().into_inner()
    }

    #[test]
    fn get_returns_wrapped_value() {
        let field = as_field(settings());
        assert_eq!(field.get(), &settings());
        assert_eq!(field.volume, 7);
    }

    #[test]
    fn round_trips_values() {
        assert_eq!(round_trip(settings()), settings());
        assert_eq!(round_trip(vec![1_u32, 2, 3]), vec![1, 2, 3]);
        assert_eq!(round_trip("plain".to_owned()), "plain");
        assert_eq!(round_trip(Some(4.5_f64)), Some(4.5));
        assert_eq!(
            round_trip(serde_json::json!({"a": [true, null]})),
            serde_json::json!({"a": [true, null]})
        );
    }

    #[test]
    fn round_trips_through_byte_encoding() {
        let codec = Codec::new(DecodeMode::Strict, Encoding::Bytes);
        let stored = as_field(settings()).value_with(&codec).unwrap().unwrap();
        assert!(matches!(stored, StoredValue::Bytes(_)));

        let mut field = Field::<Settings>::default();
        field.scan_with(&codec, stored.as_raw()).unwrap();
        assert_eq!(field.into_inner(), settings());
    }

    #[test]
    fn none_is_written_as_sql_null() {
        assert_eq!(Field::<Option<Settings>>::new(None).value().unwrap(), None);
    }

    #[test]
    fn null_read_keeps_default() {
        let mut field = Field::<Settings>::default();
        field.scan(RawValue::Null).unwrap();
        assert_eq!(field, Field::default());

        let mut field = as_field(settings());
        field.scan(RawValue::Null).unwrap();
        assert_eq!(field.into_inner(), settings());
    }

    #[test]
    fn stored_json_null_keeps_value() {
        let mut field = as_field(settings());
        field.scan(RawValue::Text("null")).unwrap();
        assert_eq!(field.get(), &settings());

        let mut field = as_field(vec![1_u8]);
        field.scan(RawValue::Bytes(b"null")).unwrap();
        assert_eq!(field.into_inner(), vec![1]);
    }

    #[test]
    fn from_raw_null_is_default() {
        let field = Field::<Vec<String>>::from_raw(RawValue::Null).unwrap();
        assert!(field.is_empty());
    }

    #[test]
    fn integer_input_is_unsupported() {
        let mut field = Field::<Settings>::default();
        let err = field.scan(RawValue::Other("int")).unwrap_err();
        assert!(err.is_unsupported_input_type());
        assert!(err.to_string().ends_with("int"));
    }

    #[test]
    fn malformed_json_depends_on_decode_mode() {
        let mut field = Field::<Settings>::default();
        assert!(field
            .scan(RawValue::Text("{not valid json"))
            .unwrap_err()
            .is_decode());

        let lenient = Codec::new(DecodeMode::Lenient, Encoding::Text);
        let mut field = as_field(settings());
        field
            .scan_with(&lenient, RawValue::Text("{not valid json"))
            .unwrap();
        assert_eq!(field.into_inner(), settings());
    }

    #[test]
    fn unserializable_value_fails_to_encode() {
        let field = as_field(BTreeMap::from([(vec![1_u8], 1)]));
        assert!(field.value().unwrap_err().is_encode());
    }

    #[test]
    fn serializes_transparently_inside_other_structs() {
        #[derive(Serialize, Deserialize)]
        struct Row {
            id: u32,
            settings: Field<Vec<u8>>,
        }

        let json = serde_json::to_string(&Row {
            id: 1,
            settings: as_field(vec![9]),
        })
        .unwrap();
        assert_eq!(json, r#"{"id":1,"settings":[9]}"#);

        let row: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(row.settings.get(), &vec![9]);
    }

    #[test]
    fn deref_mut_edits_in_place() {
        let mut field = Field::from(vec![1]);
        field.push(2);
        field.get_mut().push(3);
        assert_eq!(field.as_ref(), &vec![1, 2, 3]);
    }
}
