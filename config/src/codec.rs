use serde::Deserialize;

#[derive(Deserialize, Default, Clone, Copy, Debug)]
pub struct CodecConfig {
    #[serde(default)]
    decode: DecodeMode,
    #[serde(default)]
    encoding: Encoding,
}

impl CodecConfig {
    pub fn new(decode: &DecodeMode, encoding: &Encoding) -> Self {
        Self {
            decode: *decode,
            encoding: *encoding,
        }
    }

    pub fn decode(&self) -> &DecodeMode {
        &self.decode
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }
}

/// What happens when a column holds text that isn't valid JSON.
#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// The parse error is returned to the database layer.
    #[default]
    Strict,
    /// The parse error is logged and dropped, the field keeps its value.
    Lenient,
}

/// Representation handed to the database layer on write.
#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    Text,
    Bytes,
}
