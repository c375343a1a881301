//! Storage and field selectors.
//!
//! Selectors written as strings follow one convention everywhere (CLI,
//! configuration files): `/regex/` is a pattern, `:name` is a symbolic name,
//! anything else is an exact name.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::model_manager::{
    definitions::{DomainType, FieldDescriptor},
    errors::{invalid_selector, Error, Result},
};

/// Picks storages for model generation
#[derive(Debug, Clone)]
pub enum StorageSelector {
    /// Exact storage name
    Name(String),
    /// Symbolic name, compared by string equality
    Symbol(String),
    /// Regular expression matched anywhere in the storage name
    Pattern(Regex),
}

impl StorageSelector {
    /// Selector matching every storage
    pub fn all() -> Self {
        StorageSelector::Pattern(Regex::new(".*").expect("static pattern"))
    }

    pub fn name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(invalid_selector("empty storage name"));
        }
        Ok(StorageSelector::Name(name))
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        compile(pattern).map(StorageSelector::Pattern)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match split_selector(raw)? {
            RawSelector::Pattern(p) => Self::pattern(p),
            RawSelector::Symbol(s) => Ok(StorageSelector::Symbol(s.to_string())),
            RawSelector::Plain(n) => Self::name(n),
        }
    }

    pub fn matches(&self, storage: &str) -> bool {
        match self {
            StorageSelector::Name(name) => name == storage,
            StorageSelector::Symbol(sym) => sym == storage,
            StorageSelector::Pattern(re) => re.is_match(storage),
        }
    }

    /// First selector that matches, in the order given.
    pub fn first_match<'s>(selectors: &'s [StorageSelector], storage: &str) -> Option<&'s Self> {
        selectors.iter().find(|s| s.matches(storage))
    }
}

impl PartialEq for StorageSelector {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StorageSelector::Name(a), StorageSelector::Name(b)) => a == b,
            (StorageSelector::Symbol(a), StorageSelector::Symbol(b)) => a == b,
            (StorageSelector::Pattern(a), StorageSelector::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for StorageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageSelector::Name(name) => write!(f, "{}", name),
            StorageSelector::Symbol(sym) => write!(f, ":{}", sym),
            StorageSelector::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl TryFrom<&serde_json::Value> for StorageSelector {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(raw) => StorageSelector::parse(raw),
            other => Err(invalid_selector(format!("invalid argument: {}", other))),
        }
    }
}

impl Serialize for StorageSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StorageSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        StorageSelector::try_from(&value).map_err(serde::de::Error::custom)
    }
}

/// Picks fields of one storage
#[derive(Debug, Clone)]
pub enum FieldSelector {
    /// Exact field name
    Name(String),
    /// Regular expression matched against the field name
    Pattern(Regex),
    /// Fields of a domain type
    Type(DomainType),
    /// Serial (auto-incrementing primary key) fields
    Serial,
}

impl FieldSelector {
    /// Accepts `/regex/`, `:name`, `type:<DomainType>`, `serial`, or an exact name.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw == "serial" {
            return Ok(FieldSelector::Serial);
        }
        if let Some(ty) = raw.strip_prefix("type:") {
            return DomainType::from_name(ty)
                .map(FieldSelector::Type)
                .ok_or_else(|| invalid_selector(format!("unknown domain type: {}", ty)));
        }
        match split_selector(raw)? {
            RawSelector::Pattern(p) => compile(p).map(FieldSelector::Pattern),
            RawSelector::Symbol(s) | RawSelector::Plain(s) => {
                Ok(FieldSelector::Name(s.to_string()))
            }
        }
    }

    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        match self {
            FieldSelector::Name(name) => *name == field.name,
            FieldSelector::Pattern(re) => re.is_match(&field.name),
            FieldSelector::Type(ty) => *ty == field.domain_type,
            FieldSelector::Serial => field.attributes.is_serial(),
        }
    }
}

enum RawSelector<'a> {
    Pattern(&'a str),
    Symbol(&'a str),
    Plain(&'a str),
}

fn split_selector(raw: &str) -> Result<RawSelector<'_>> {
    if raw.is_empty() {
        return Err(invalid_selector("empty selector"));
    }
    if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
        return Ok(RawSelector::Pattern(&raw[1..raw.len() - 1]));
    }
    if let Some(sym) = raw.strip_prefix(':') {
        if sym.is_empty() {
            return Err(invalid_selector("empty symbol"));
        }
        return Ok(RawSelector::Symbol(sym));
    }
    Ok(RawSelector::Plain(raw))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| invalid_selector(format!("bad pattern /{}/: {}", pattern, e)))
}
