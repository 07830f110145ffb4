// src/config.rs

//! Typed key/value configuration.
//!
//! A build definition declares its configuration items up front in a
//! [`ConfigRegistry`]; user-supplied `name=value` overrides are then
//! confirmed into an immutable [`Config`]. The confirmed `Config` is cloned
//! into every worker so re-evaluated build definitions see identical values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TaskdagError};

/// A configuration value. The variant of an item's default determines how
/// user-supplied override strings are parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
}

impl ConfigValue {
    /// Parse `raw` as a value of the same kind as `self`.
    fn parse_as_same_kind(&self, name: &str, raw: &str) -> Result<ConfigValue> {
        let invalid = |reason: String| TaskdagError::InvalidConfigValue {
            name: name.to_string(),
            value: raw.to_string(),
            reason,
        };

        match self {
            ConfigValue::Bool(_) => raw
                .parse::<bool>()
                .map(ConfigValue::Bool)
                .map_err(|e| invalid(e.to_string())),
            ConfigValue::Int(_) => raw
                .parse::<i64>()
                .map(ConfigValue::Int)
                .map_err(|e| invalid(e.to_string())),
            ConfigValue::Float(_) => raw
                .parse::<f64>()
                .map(ConfigValue::Float)
                .map_err(|e| invalid(e.to_string())),
            ConfigValue::Str(_) => Ok(ConfigValue::Str(raw.to_string())),
            ConfigValue::Path(_) => Ok(ConfigValue::Path(PathBuf::from(raw))),
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{v}"),
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(v) => write!(f, "{v}"),
            ConfigValue::Path(v) => write!(f, "{}", v.display()),
        }
    }
}

/// A declared configuration item.
#[derive(Debug, Clone)]
pub struct ConfigItem {
    pub name: String,
    pub default: ConfigValue,
    pub help: String,
}

impl ConfigItem {
    pub fn new(
        name: impl Into<String>,
        default: ConfigValue,
        help: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default,
            help: help.into(),
        }
    }
}

/// Catalog of declared configuration items.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    items: BTreeMap<String, ConfigItem>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an item. Declaring the same name twice is a fatal error.
    pub fn add_item(&mut self, item: ConfigItem) -> Result<()> {
        if self.items.contains_key(&item.name) {
            return Err(TaskdagError::DuplicateConfigItem(item.name));
        }
        self.items.insert(item.name.clone(), item);
        Ok(())
    }

    pub fn get_all_items(&self) -> Vec<&ConfigItem> {
        self.items.values().collect()
    }

    /// Confirm the declared items against user-supplied overrides.
    ///
    /// Overriding an undeclared name is fatal; items without an override
    /// fall back to their defaults.
    pub fn confirm(&self, overrides: &BTreeMap<String, String>) -> Result<Config> {
        for name in overrides.keys() {
            if !self.items.contains_key(name) {
                return Err(TaskdagError::UnknownConfigItem(name.clone()));
            }
        }

        let mut values = BTreeMap::new();
        for (name, item) in &self.items {
            let value = match overrides.get(name) {
                Some(raw) => item.default.parse_as_same_kind(name, raw)?,
                None => item.default.clone(),
            };
            values.insert(name.clone(), value);
        }

        Ok(Config { values })
    }
}

/// Immutable confirmed configuration values.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
}

impl Config {
    pub fn get(&self, name: &str) -> Result<&ConfigValue> {
        self.values
            .get(name)
            .ok_or_else(|| TaskdagError::UnknownConfigItem(name.to_string()))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            ConfigValue::Bool(v) => Ok(*v),
            other => Err(self.kind_mismatch(name, "bool", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            ConfigValue::Int(v) => Ok(*v),
            other => Err(self.kind_mismatch(name, "int", other)),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            ConfigValue::Str(v) => Ok(v),
            other => Err(self.kind_mismatch(name, "string", other)),
        }
    }

    pub fn get_path(&self, name: &str) -> Result<&Path> {
        match self.get(name)? {
            ConfigValue::Path(v) => Ok(v),
            other => Err(self.kind_mismatch(name, "path", other)),
        }
    }

    fn kind_mismatch(&self, name: &str, wanted: &str, got: &ConfigValue) -> TaskdagError {
        TaskdagError::InvalidConfigValue {
            name: name.to_string(),
            value: got.to_string(),
            reason: format!("expected a {wanted} value"),
        }
    }
}
