use anyhow::Result;
use sj_config::Config;

pub mod codec;
pub mod db;
pub mod field;
pub mod value;

pub use codec::{codec, install, Codec};
pub use field::{as_field, Field, Scanner, Valuer};
pub use sj_config::codec::{DecodeMode, Encoding};
pub use sj_error::{FieldError, Result as FieldResult};
pub use value::{RawValue, StoredValue};

// tokio only drives the SQLite pool tests.
#[cfg(all(test, not(feature = "sqlite")))]
use tokio as _;

/// Starts logging and installs the configured codec.
pub fn init(config: &Config) -> Result<()> {
    sj_log::init(config.log().display_level(), config.log().level_filter())?;
    install(Codec::from_config(config.codec()))
}
