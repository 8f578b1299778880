use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Unsupported input type for JSON field: {0}")]
    UnsupportedInputType(String),

    #[error("Failed to encode JSON field: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode JSON field: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Column type '{0}' can't hold a JSON field")]
    UnsupportedColumnType(String),

    #[error("Unknown JSONB format version {0}")]
    InvalidJsonbVersion(u8),
}

impl FieldError {
    pub fn unsupported_input_type(type_name: &str) -> Self {
        Self::UnsupportedInputType(type_name.to_owned())
    }

    pub fn unsupported_column_type(type_name: &str) -> Self {
        Self::UnsupportedColumnType(type_name.to_owned())
    }

    pub fn is_unsupported_input_type(&self) -> bool {
        matches!(self, Self::UnsupportedInputType(_))
    }

    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
