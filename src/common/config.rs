// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::Error;
use serde::de::DeserializeOwned;
#[allow(deprecated)]
use std::env::home_dir;
use std::fs::read_to_string;
use toml::{Table, Value};

/// Environment variables understood by `DnsManagerConfigBuilder::env`, with the
/// `(section, key)` each one overrides and whether the value is an integer.
const ENV_OVERRIDES: &[(&str, &str, &str, bool)] = &[
    ("HOSTINGER_API_KEY", "hostinger", "api_key", false),
    ("HOSTINGER_API_BASE", "hostinger", "api_base", false),
    ("BASE_DOMAIN", "hostinger", "base_domain", false),
    ("PORT", "server", "port", true),
    ("PROPAGATION_WAIT_SECS", "server", "propagation_wait_secs", true),
];

/// Immutable configuration, loaded once at startup and passed explicitly to
/// whatever needs it.
#[derive(Clone, Debug, Default)]
pub struct DnsManagerConfig {
    debug_enabled: bool,
    table: Table,
}

impl DnsManagerConfig {
    /// Creates a configuration builder.
    pub fn builder() -> DnsManagerConfigBuilder {
        DnsManagerConfigBuilder {
            debug_enabled: false,
            error: None,
            table: None,
        }
    }

    /// Returns `true` if debug is enabled.
    pub fn debug(&self) -> bool {
        self.debug_enabled
    }

    /// Returns configuration parameters.
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Value::Table(self.table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| Error::Config(format!("toml: {e}")))
    }

    /// Returns a copy with one `[section] key = value` replaced. Used to apply
    /// command line overrides on top of file and environment settings.
    pub fn with_value(mut self, section: &str, key: &str, value: Value) -> Self {
        insert_value(&mut self.table, section, key, value);
        self
    }
}

fn insert_value(table: &mut Table, section: &str, key: &str, value: Value) {
    let entry = table
        .entry(section.to_string())
        .or_insert_with(|| Value::Table(Table::new()));
    if !entry.is_table() {
        *entry = Value::Table(Table::new());
    }
    if let Value::Table(entries) = entry {
        entries.insert(key.to_string(), value);
    }
}

/// Layers TOML, environment and explicit values into a `DnsManagerConfig`.
pub struct DnsManagerConfigBuilder {
    debug_enabled: bool,
    error: Option<Error>,
    table: Option<Table>,
}

impl DnsManagerConfigBuilder {
    /// Settings may come from the environment alone, so a builder without any
    /// TOML produces an empty table rather than an error.
    pub fn build(self) -> Result<DnsManagerConfig, Error> {
        if let Some(error) = self.error {
            Err(error)
        } else {
            Ok(DnsManagerConfig {
                debug_enabled: self.debug_enabled,
                table: self.table.unwrap_or_default(),
            })
        }
    }

    pub fn debug(self, debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            ..self
        }
    }

    /// Overlay the process environment (see `ENV_OVERRIDES`).
    pub fn env(self) -> Self {
        self.env_vars(std::env::vars())
    }

    /// Overlay variables from an iterator of `(name, value)`, ignoring names
    /// that are not recognized. Empty values are skipped.
    pub fn env_vars<I: IntoIterator<Item = (String, String)>>(mut self, vars: I) -> Self {
        let mut table = self.table.take().unwrap_or_default();
        for (name, raw) in vars {
            let Some((_, section, key, integer)) =
                ENV_OVERRIDES.iter().find(|(var, ..)| *var == name)
            else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            let value = if *integer {
                match raw.parse::<i64>() {
                    Ok(n) => Value::Integer(n),
                    Err(_) => {
                        if self.error.is_none() {
                            self.error = Some(Error::Config(format!(
                                "{name}: expected an integer, found {raw:?}"
                            )));
                        }
                        continue;
                    }
                }
            } else {
                Value::String(raw)
            };
            insert_value(&mut table, section, key, value);
        }
        Self {
            table: Some(table),
            ..self
        }
    }

    pub fn toml_file(self, file_name: &str) -> Self {
        #[allow(deprecated)]
        let home_path = home_dir()
            .and_then(|pathbuf| pathbuf.to_str().map(|path| format!("{path}/{file_name}")));
        let local_path = if file_name.starts_with('/') {
            file_name.to_string()
        } else {
            format!("./{file_name}")
        };
        let text = home_path
            .and_then(|path| read_to_string(path).ok())
            .or_else(|| read_to_string(&local_path).ok());
        match text {
            Some(text) => self.toml_string(text),
            None => Self {
                error: Some(Error::Config(format!("{local_path}: cannot read"))),
                ..self
            },
        }
    }

    pub fn toml_str(self, toml: &str) -> Self {
        self.toml_string(toml.to_string())
    }

    pub fn toml_string(self, toml: String) -> Self {
        match toml::from_str::<Table>(&toml) {
            Ok(parsed) => {
                let mut table = self.table.clone().unwrap_or_default();
                for (section, value) in parsed {
                    match value {
                        Value::Table(entries) => {
                            for (key, value) in entries {
                                insert_value(&mut table, &section, &key, value);
                            }
                        }
                        value => {
                            table.insert(section, value);
                        }
                    }
                }
                Self {
                    table: Some(table),
                    ..self
                }
            }
            Err(e) => Self {
                error: Some(Error::Config(format!("toml: {e}"))),
                ..self
            },
        }
    }
}
