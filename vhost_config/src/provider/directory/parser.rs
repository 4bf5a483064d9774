//! Format-specific parsing utilities for configuration files.

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Format, Toml},
};
#[cfg(feature = "json5")]
use figment_json5::Json5;
use serde_json::{Map, Value};

use crate::value::ChainTable;
use crate::{ConfigError, ConfigResult};

use super::error::{file_error, invalid_data};

/// Parse a layer file according to its extension into a top-level table.
///
/// TOML is the fallback format. `json` and `json5` files require the `json5`
/// feature.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the contents fail to parse, are not a table,
/// or need a disabled feature.
pub(super) fn parse_table(path: &Utf8Path, data: &str) -> ConfigResult<Map<String, Value>> {
    let ext = path.extension().map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json" | "json5") => {
            #[cfg(feature = "json5")]
            {
                Figment::from(Json5::string(data))
            }
            #[cfg(not(feature = "json5"))]
            {
                return Err(file_error(
                    path,
                    std::io::Error::other(
                        "json5 feature disabled: enable the 'json5' feature to support this file format",
                    ),
                ));
            }
        }
        _ => {
            // Validate TOML first so parse failures carry this file's path.
            toml::from_str::<toml::Value>(data).map_err(|e| file_error(path, e))?;
            Figment::from(Toml::string(data))
        }
    };
    figment
        .extract::<Map<String, Value>>()
        .map_err(|e| file_error(path, ConfigError::gathering(e)))
}

/// Interpret a processor file: each key maps to a processor name or an array
/// of names.
pub(super) fn parse_chains(path: &Utf8Path, table: Map<String, Value>) -> ConfigResult<ChainTable> {
    table
        .into_iter()
        .map(|(key, value)| {
            let names = match value {
                Value::String(name) => vec![name],
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(name) => Ok(name),
                        other => Err(invalid_data(
                            path,
                            format!("processor chain for '{key}' holds a non-string entry: {other}"),
                        )),
                    })
                    .collect::<ConfigResult<Vec<_>>>()?,
                other => {
                    return Err(invalid_data(
                        path,
                        format!("processor chain for '{key}' must be a name or a list, got {other}"),
                    ));
                }
            };
            Ok((key, names))
        })
        .collect()
}
