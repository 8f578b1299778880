//! Bindings of [`Field`](crate::Field) to the conversion traits of each database layer.

#[cfg(feature = "sqlx")]
use serde::de::DeserializeOwned;
#[cfg(feature = "sqlx")]
use sqlx::error::BoxDynError;

#[cfg(feature = "sqlx")]
use crate::{field::Field, value::RawValue};

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "scylla")]
pub mod scylla;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// How a backend column type is read into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    Text,
    Bytes,
    /// PostgreSQL JSONB, prefixed with a format version in binary transfers.
    Jsonb,
    Unsupported,
}

#[cfg(feature = "sqlx")]
fn decode_field<T>(raw: RawValue<'_>) -> Result<Field<T>, BoxDynError>
where
    T: DeserializeOwned + Default,
{
    Ok(Field::from_raw(raw)?)
}
