/// A column value as the database layer hands it over on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    Null,
    /// Any other runtime type, carrying the backend's name for it.
    Other(&'a str),
}

impl<'a> RawValue<'a> {
    pub fn kind(&self) -> &'a str {
        match *self {
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Null => "null",
            Self::Other(type_name) => type_name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl<'a> From<&'a [u8]> for RawValue<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a, R: Into<RawValue<'a>>> From<Option<R>> for RawValue<'a> {
    fn from(value: Option<R>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

/// What a field hands to the database layer on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl StoredValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn as_raw(&self) -> RawValue<'_> {
        match self {
            Self::Text(text) => RawValue::Text(text),
            Self::Bytes(bytes) => RawValue::Bytes(bytes),
        }
    }
}
