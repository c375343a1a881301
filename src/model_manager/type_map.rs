//! Primitive type name to domain type translation.
//!
//! A dialect table is registered domain-type first, the way a model layer
//! declares "this domain type is stored as that primitive". Reflection needs
//! the opposite direction, so lookups go through an index keyed by the
//! normalized primitive name. When two domain types are registered with the
//! same primitive, the later registration shadows the earlier one.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

use crate::model_manager::{
    definitions::{DomainType, FieldAttributes},
    errors::{Error, Result},
};

/// One row of a dialect table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapEntry {
    pub primitive: &'static str,
    pub domain_type: DomainType,
    /// Default attributes for this domain type (e.g. `length` for strings)
    pub chain: FieldAttributes,
}

/// A raw type string split into its base name and size arguments.
///
/// `VARCHAR(255)` becomes `VARCHAR` with `[255]`; `decimal ( 10, 2 )`
/// becomes `DECIMAL` with `[10, 2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveName {
    pub base: String,
    pub args: Vec<u32>,
}

impl PrimitiveName {
    pub fn parse(raw: &str) -> Self {
        let (head, args) = match raw.find('(') {
            Some(open) => {
                let close = raw[open..].find(')').map(|c| open + c).unwrap_or(raw.len());
                let args = raw[open + 1..close]
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .filter_map(|a| match a.parse::<u32>() {
                        Ok(n) => Some(n),
                        Err(e) => {
                            warn!(raw_type = raw, argument = a, error = %e, "discarding size argument");
                            None
                        }
                    })
                    .collect();
                let mut head = raw[..open].to_string();
                if close < raw.len() {
                    head.push(' ');
                    head.push_str(&raw[close + 1..]);
                }
                (head, args)
            }
            None => (raw.to_string(), Vec::new()),
        };

        let base = head
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        Self { base, args }
    }

    /// Per-column size attributes implied by the arguments.
    pub fn size_attributes(&self, domain_type: DomainType) -> FieldAttributes {
        let mut attrs = FieldAttributes::default();
        match (self.args.as_slice(), domain_type) {
            ([], _) => {}
            ([p], DomainType::Decimal | DomainType::Float) => attrs.precision = Some(*p),
            ([len], _) => attrs.length = Some(*len),
            ([p, s, ..], _) => {
                attrs.precision = Some(*p);
                attrs.scale = Some(*s);
            }
        }
        attrs
    }
}

/// Read-only dialect table with a primitive-name index
#[derive(Debug)]
pub struct TypeMap {
    dialect: &'static str,
    entries: Vec<TypeMapEntry>,
    by_primitive: HashMap<&'static str, usize>,
}

impl TypeMap {
    pub fn new(dialect: &'static str, entries: Vec<TypeMapEntry>) -> Self {
        let mut by_primitive = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            // later registrations shadow earlier ones
            by_primitive.insert(entry.primitive, idx);
        }
        Self {
            dialect,
            entries,
            by_primitive,
        }
    }

    pub fn dialect(&self) -> &'static str {
        self.dialect
    }

    /// Look up an already-normalized primitive name.
    pub fn lookup_primitive(&self, primitive: &str) -> Result<&TypeMapEntry> {
        self.by_primitive
            .get(primitive)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| Error::UnknownPrimitiveType(primitive.to_string()))
    }

    /// Normalize a raw catalog type string, then look it up.
    pub fn lookup_raw(&self, raw_type: &str) -> Result<(PrimitiveName, &TypeMapEntry)> {
        let name = PrimitiveName::parse(raw_type);
        let entry = self.lookup_primitive(&name.base)?;
        Ok((name, entry))
    }

    /// First entry registered for a domain type.
    pub fn entry_for(&self, domain_type: DomainType) -> Option<&TypeMapEntry> {
        self.entries.iter().find(|e| e.domain_type == domain_type)
    }

    pub fn entries(&self) -> &[TypeMapEntry] {
        &self.entries
    }
}

fn entry(primitive: &'static str, domain_type: DomainType) -> TypeMapEntry {
    TypeMapEntry {
        primitive,
        domain_type,
        chain: FieldAttributes::default(),
    }
}

fn entry_with(
    primitive: &'static str,
    domain_type: DomainType,
    chain: FieldAttributes,
) -> TypeMapEntry {
    TypeMapEntry {
        primitive,
        domain_type,
        chain,
    }
}

/// SQLite dialect table
pub static SQLITE_TYPE_MAP: Lazy<TypeMap> = Lazy::new(|| {
    use DomainType::*;

    let string_chain = FieldAttributes {
        length: Some(50),
        ..Default::default()
    };
    let text_chain = FieldAttributes {
        length: Some(65535),
        ..Default::default()
    };
    let decimal_chain = FieldAttributes {
        precision: Some(10),
        scale: Some(0),
        ..Default::default()
    };

    TypeMap::new(
        "sqlite",
        vec![
            entry("INTEGER", Integer),
            entry("INT", Integer),
            entry("BIGINT", Integer),
            entry("SMALLINT", Integer),
            entry("TINYINT", Integer),
            entry("MEDIUMINT", Integer),
            entry_with("VARCHAR", String, string_chain),
            entry("CHAR", String),
            entry("CHARACTER", String),
            entry("NCHAR", String),
            entry("NVARCHAR", String),
            entry("VARCHAR", Class),
            entry_with("TEXT", Text, text_chain.clone()),
            entry_with("CLOB", Text, text_chain),
            entry("FLOAT", Float),
            entry("REAL", Float),
            entry("DOUBLE", Float),
            entry("DOUBLE PRECISION", Float),
            entry_with("DECIMAL", Decimal, decimal_chain.clone()),
            entry_with("NUMERIC", Decimal, decimal_chain),
            entry("TIMESTAMP", Time),
            entry("TIMESTAMP", DateTime),
            entry("DATETIME", DateTime),
            entry("DATE", Date),
            entry("TIME", Time),
            entry("BOOLEAN", Boolean),
            entry("BOOL", Boolean),
            entry("BLOB", Blob),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_size_and_upcases() {
        let name = PrimitiveName::parse("varchar(255)");
        assert_eq!(name.base, "VARCHAR");
        assert_eq!(name.args, vec![255]);

        let name = PrimitiveName::parse(" decimal ( 10, 2 ) ");
        assert_eq!(name.base, "DECIMAL");
        assert_eq!(name.args, vec![10, 2]);

        let name = PrimitiveName::parse("double   precision");
        assert_eq!(name.base, "DOUBLE PRECISION");
        assert!(name.args.is_empty());

        let name = PrimitiveName::parse("");
        assert_eq!(name.base, "");
    }

    #[test]
    fn test_size_attributes() {
        let varchar = PrimitiveName::parse("VARCHAR(70)");
        assert_eq!(varchar.size_attributes(DomainType::String).length, Some(70));

        let decimal = PrimitiveName::parse("DECIMAL(12,4)");
        let attrs = decimal.size_attributes(DomainType::Decimal);
        assert_eq!((attrs.precision, attrs.scale), (Some(12), Some(4)));

        let decimal = PrimitiveName::parse("NUMERIC(8)");
        let attrs = decimal.size_attributes(DomainType::Decimal);
        assert_eq!((attrs.precision, attrs.length), (Some(8), None));
    }

    #[test]
    fn test_out_of_range_size_argument_is_discarded() {
        let huge = PrimitiveName::parse("VARCHAR(4294967296)");
        assert_eq!(huge.base, "VARCHAR");
        assert!(huge.args.is_empty());
        assert_eq!(huge.size_attributes(DomainType::String).length, None);

        let negative = PrimitiveName::parse("varchar(-1)");
        assert!(negative.args.is_empty());

        let partial = PrimitiveName::parse("DECIMAL(10, x)");
        assert_eq!(partial.args, vec![10]);
    }

    #[test]
    fn test_sqlite_lookups() {
        let map = &*SQLITE_TYPE_MAP;
        assert_eq!(map.dialect(), "sqlite");
        assert_eq!(
            map.lookup_primitive("INTEGER").unwrap().domain_type,
            DomainType::Integer
        );
        assert_eq!(
            map.lookup_primitive("TEXT").unwrap().chain.length,
            Some(65535)
        );
        assert_eq!(
            map.lookup_primitive("TIMESTAMP").unwrap().domain_type,
            DomainType::DateTime
        );
        assert_eq!(
            map.lookup_primitive("BOOLEAN").unwrap().domain_type,
            DomainType::Boolean
        );

        assert_eq!(map.entries().first().unwrap().primitive, "INTEGER");
        assert_eq!(
            map.entries()
                .iter()
                .filter(|e| e.primitive == "TIMESTAMP")
                .count(),
            2
        );

        let (name, entry) = map.lookup_raw("decimal(8,2)").unwrap();
        assert_eq!(entry.domain_type, DomainType::Decimal);
        assert_eq!(name.args, vec![8, 2]);
    }

    #[test]
    fn test_varchar_resolves_to_class_placeholder() {
        let map = &*SQLITE_TYPE_MAP;
        assert_eq!(
            map.lookup_primitive("VARCHAR").unwrap().domain_type,
            DomainType::Class
        );
        let string = map.entry_for(DomainType::String).unwrap();
        assert_eq!(string.primitive, "VARCHAR");
        assert_eq!(string.chain.length, Some(50));
    }

    #[test]
    fn test_unknown_primitive() {
        let err = SQLITE_TYPE_MAP.lookup_primitive("JSONB").unwrap_err();
        assert!(matches!(err, Error::UnknownPrimitiveType(ref p) if p == "JSONB"));
        assert!(SQLITE_TYPE_MAP.lookup_raw("geometry(4326)").is_err());
    }
}
