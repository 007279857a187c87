//! # Configuration Bag
//!
//! Generic `section -> key -> value` storage plus strict typed parsers.
//! Plugins read their typed configuration through a [`ConfigSectionReader`],
//! which tracks consumed keys so unknown keys are reported instead of ignored.
//!
//! ## Value syntax
//!
//! - booleans: `true` / `false`
//! - unsigned integers: decimal digits with optional, non-consecutive `'`
//!   separators (`1'000'000`)
//! - mosaic ids: `0x` followed by hex digits (separators allowed)
//! - time spans: integer plus `ms`, `s`, `m` or `h`
//! - keys: 64 hex characters
//! - string sets: comma separated, trimmed, non-empty, unique

use crate::entities::{
    Amount, BlockDuration, Height, Key, MosaicId, NetworkIdentifier, TimeSpan,
};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A value that can be parsed from a configuration string.
pub trait ConfigValue: Sized {
    fn parse_config_value(value: &str) -> Option<Self>;
}

/// Strips digit separators, rejecting leading, trailing or doubled ones.
fn strip_separators(value: &str) -> Option<String> {
    if value.is_empty() || value.starts_with('\'') || value.ends_with('\'') || value.contains("''")
    {
        return None;
    }

    Some(value.chars().filter(|c| *c != '\'').collect())
}

fn parse_decimal(value: &str) -> Option<u64> {
    let digits = strip_separators(value)?;
    let mut result: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(10)?;
        result = result.checked_mul(10)?.checked_add(u64::from(digit))?;
    }

    Some(result)
}

impl ConfigValue for bool {
    fn parse_config_value(value: &str) -> Option<Self> {
        match value {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

macro_rules! impl_unsigned_config_value {
    ($($ty:ty),*) => {
        $(impl ConfigValue for $ty {
            fn parse_config_value(value: &str) -> Option<Self> {
                parse_decimal(value).and_then(|raw| <$ty>::try_from(raw).ok())
            }
        })*
    };
}

impl_unsigned_config_value!(u8, u16, u32, u64);

impl ConfigValue for Amount {
    fn parse_config_value(value: &str) -> Option<Self> {
        parse_decimal(value).map(Amount)
    }
}

impl ConfigValue for Height {
    fn parse_config_value(value: &str) -> Option<Self> {
        parse_decimal(value).map(Height)
    }
}

impl ConfigValue for BlockDuration {
    fn parse_config_value(value: &str) -> Option<Self> {
        parse_decimal(value).map(BlockDuration)
    }
}

impl ConfigValue for MosaicId {
    fn parse_config_value(value: &str) -> Option<Self> {
        let hex_digits = strip_separators(value.strip_prefix("0x")?)?;
        if hex_digits.len() > 16 {
            return None;
        }

        u64::from_str_radix(&hex_digits, 16).ok().map(MosaicId)
    }
}

impl ConfigValue for TimeSpan {
    fn parse_config_value(value: &str) -> Option<Self> {
        if let Some(number) = value.strip_suffix("ms") {
            return parse_decimal(number).map(TimeSpan::from_milliseconds);
        }

        let (number, multiplier) = if let Some(number) = value.strip_suffix('s') {
            (number, 1_000u64)
        } else if let Some(number) = value.strip_suffix('m') {
            (number, 60_000)
        } else if let Some(number) = value.strip_suffix('h') {
            (number, 3_600_000)
        } else {
            return None;
        };

        parse_decimal(number)?
            .checked_mul(multiplier)
            .map(TimeSpan::from_milliseconds)
    }
}

impl ConfigValue for Key {
    fn parse_config_value(value: &str) -> Option<Self> {
        Key::from_hex(value)
    }
}

impl ConfigValue for NetworkIdentifier {
    fn parse_config_value(value: &str) -> Option<Self> {
        match value {
            "mijin" => Some(NetworkIdentifier::MIJIN),
            "mijin-test" => Some(NetworkIdentifier::MIJIN_TEST),
            "public" => Some(NetworkIdentifier::PUBLIC),
            "public-test" => Some(NetworkIdentifier::PUBLIC_TEST),
            _ => u8::parse_config_value(value).map(NetworkIdentifier),
        }
    }
}

impl ConfigValue for String {
    fn parse_config_value(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

impl ConfigValue for BTreeSet<String> {
    fn parse_config_value(value: &str) -> Option<Self> {
        let mut set = BTreeSet::new();
        if value.trim().is_empty() {
            return Some(set);
        }

        for item in value.split(',') {
            let item = item.trim();
            if item.is_empty() || !set.insert(item.to_string()) {
                return None;
            }
        }

        Some(set)
    }
}

/// Sectioned key/value configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationBag {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigurationBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.insert(section, key, value);
        self
    }

    pub fn insert(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Names of all sections.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Opens a reader over `section`.
    pub fn reader(&self, section: &str) -> Result<ConfigSectionReader<'_>, ConfigError> {
        let properties = self
            .sections
            .get(section)
            .ok_or_else(|| ConfigError::MissingSection {
                section: section.to_string(),
            })?;

        Ok(ConfigSectionReader {
            section: section.to_string(),
            properties,
            consumed: BTreeSet::new(),
        })
    }
}

/// Typed reader over one section that remembers which keys were consumed.
#[derive(Debug)]
pub struct ConfigSectionReader<'a> {
    section: String,
    properties: &'a BTreeMap<String, String>,
    consumed: BTreeSet<String>,
}

impl<'a> ConfigSectionReader<'a> {
    /// Reads a required property.
    pub fn get<T: ConfigValue>(&mut self, key: &str) -> Result<T, ConfigError> {
        match self.get_optional(key)? {
            Some(value) => Ok(value),
            None => Err(ConfigError::MissingProperty {
                section: self.section.clone(),
                key: key.to_string(),
            }),
        }
    }

    /// Reads a property, using `default` when it is absent.
    pub fn get_or<T: ConfigValue>(&mut self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.get_optional(key)?.unwrap_or(default))
    }

    fn get_optional<T: ConfigValue>(&mut self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(raw) = self.properties.get(key) else {
            return Ok(None);
        };

        self.consumed.insert(key.to_string());
        T::parse_config_value(raw)
            .map(Some)
            .ok_or_else(|| ConfigError::MalformedProperty {
                section: self.section.clone(),
                key: key.to_string(),
                value: raw.clone(),
            })
    }

    /// Fails if the section holds keys that were never read.
    pub fn finish(self) -> Result<(), ConfigError> {
        let unknown: Vec<String> = self
            .properties
            .keys()
            .filter(|key| !self.consumed.contains(*key))
            .cloned()
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::UnknownProperties {
                section: self.section,
                keys: unknown,
            })
        }
    }
}
