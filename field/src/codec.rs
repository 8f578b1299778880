use std::sync::OnceLock;

use anyhow::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use sj_config::codec::{CodecConfig, DecodeMode, Encoding};
use sj_error::FieldError;

use crate::value::{RawValue, StoredValue};

const JSON_NULL: &str = "null";

static INSTALLED: OnceLock<Codec> = OnceLock::new();

/// Rules for turning values into column JSON and back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    decode: DecodeMode,
    encoding: Encoding,
}

impl Codec {
    pub const fn new(decode: DecodeMode, encoding: Encoding) -> Self {
        Self { decode, encoding }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(*config.decode(), *config.encoding())
    }

    pub fn decode_mode(&self) -> &DecodeMode {
        &self.decode
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Parses `raw` into `target`, replacing its contents. `Null` leaves
    /// `target` untouched.
    pub fn decode_into<T: DeserializeOwned>(
        &self,
        target: &mut T,
        raw: RawValue<'_>,
    ) -> sj_error::Result<()> {
        let json = match raw {
            RawValue::Bytes(bytes) => bytes,
            RawValue::Text(text) => text.as_bytes(),
            RawValue::Null => return Ok(()),
            RawValue::Other(type_name) => {
                sj_log::debug("Field", format!("Rejecting column value of type {type_name}"));
                return Err(FieldError::unsupported_input_type(type_name));
            }
        };

        // A stored JSON null reads like SQL NULL.
        if json.trim_ascii() == JSON_NULL.as_bytes() {
            return Ok(());
        }

        match serde_json::from_slice::<T>(json) {
            Ok(value) => {
                *target = value;
                Ok(())
            }
            Err(err) => match self.decode {
                DecodeMode::Strict => Err(FieldError::Decode(err)),
                DecodeMode::Lenient => {
                    sj_log::warn("Field", format!("Ignoring malformed JSON column value: {err}"));
                    Ok(())
                }
            },
        }
    }

    /// Serializes `value`. A value whose JSON is `null` is stored as SQL NULL
    /// (`None`) instead of the text "null".
    pub fn encode<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> sj_error::Result<Option<StoredValue>> {
        let json = serde_json::to_string(value).map_err(|err| {
            sj_log::error("Field", format!("Failed to encode column value: {err}"));
            FieldError::Encode(err)
        })?;
        if json == JSON_NULL {
            return Ok(None);
        }

        // Some drivers break when raw bytes go into a JSON/JSONB column, so
        // text is the default.
        Ok(Some(match self.encoding {
            Encoding::Text => StoredValue::Text(json),
            Encoding::Bytes => StoredValue::Bytes(json.into_bytes()),
        }))
    }
}

/// Sets the process-wide codec. Only the first call succeeds.
pub fn install(codec: Codec) -> Result<()> {
    INSTALLED
        .set(codec)
        .map_err(|_| Error::msg("A JSON field codec is already installed"))?;
    sj_log::info(
        "Field",
        format!(
            "Installed codec (decode: {:?}, encoding: {:?})",
            codec.decode, codec.encoding
        ),
    );
    Ok(())
}

/// The installed codec, or the strict text codec when none was installed.
pub fn codec() -> Codec {
    INSTALLED.get().copied().unwrap_or_default()
}
