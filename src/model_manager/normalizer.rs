use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model_manager::{
    definitions::{DomainType, FieldAttributes, FieldDescriptor},
    errors::{invalid_column_metadata, Error, Result},
    type_map::{PrimitiveName, TypeMap},
};

/// One column as reported by a dialect's catalog, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawColumn {
    pub name: Option<String>,
    pub raw_type: Option<String>,
    pub primary_key: Option<bool>,
    pub not_null: Option<bool>,
    pub default_literal: Option<String>,
}

/// How the `nullable` attribute is derived from the catalog's NOT NULL flag.
///
/// `Compatibility` reproduces the long-standing reflected data: `nullable`
/// is set to `true` when the column is declared NOT NULL. `Standard` gives
/// the attribute its plain meaning. Serial columns are never nullable in
/// either mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullabilityMode {
    #[default]
    Compatibility,
    Standard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    #[serde(default)]
    pub nullability: NullabilityMode,
    /// Fail on primitives missing from the type map instead of falling back to `String`
    #[serde(default)]
    pub strict_types: bool,
}

/// Turns raw catalog columns into [`FieldDescriptor`]s
#[derive(Debug, Clone, Copy)]
pub struct FieldNormalizer<'a> {
    type_map: &'a TypeMap,
    options: NormalizerOptions,
}

impl<'a> FieldNormalizer<'a> {
    pub fn new(type_map: &'a TypeMap, options: NormalizerOptions) -> Self {
        Self { type_map, options }
    }

    pub fn normalize(&self, column: RawColumn) -> Result<FieldDescriptor> {
        let name = match column.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(invalid_column_metadata("column without a name")),
        };
        let raw_type = column
            .raw_type
            .ok_or_else(|| invalid_column_metadata(format!("column {} has no type", name)))?;
        let primary_key = column.primary_key.ok_or_else(|| {
            invalid_column_metadata(format!("column {} has no primary key flag", name))
        })?;
        let not_null = column.not_null.ok_or_else(|| {
            invalid_column_metadata(format!("column {} has no not-null flag", name))
        })?;

        let (primitive, domain_type, chain) = self.resolve_type(&name, &raw_type)?;

        let mut attrs = primitive.size_attributes(domain_type);
        if primary_key {
            attrs.serial = Some(true);
            attrs.key = Some(true);
        }
        match self.options.nullability {
            NullabilityMode::Compatibility => {
                if not_null && !attrs.is_serial() {
                    attrs.nullable = Some(true);
                }
            }
            NullabilityMode::Standard => {
                attrs.nullable = Some(!not_null && !attrs.is_serial());
            }
        }
        if let Some(literal) = column.default_literal {
            attrs.default = Some(unquote_default(&literal));
        }

        Ok(FieldDescriptor::new(name, domain_type, attrs.merge_chain(&chain)))
    }

    fn resolve_type(
        &self,
        column: &str,
        raw_type: &str,
    ) -> Result<(PrimitiveName, DomainType, FieldAttributes)> {
        match self.type_map.lookup_raw(raw_type) {
            Ok((primitive, entry)) if entry.domain_type == DomainType::Class => {
                // VARCHAR is shadowed by the Class placeholder; reflect it as String.
                debug!(column, raw_type, "downgrading class placeholder to String");
                let chain = self
                    .type_map
                    .entry_for(DomainType::String)
                    .map(|e| e.chain.clone())
                    .unwrap_or_default();
                Ok((primitive, DomainType::String, chain))
            }
            Ok((primitive, entry)) => Ok((primitive, entry.domain_type, entry.chain.clone())),
            Err(Error::UnknownPrimitiveType(primitive)) if !self.options.strict_types => {
                warn!(
                    column,
                    primitive = %primitive,
                    dialect = self.type_map.dialect(),
                    "unknown primitive type, reflecting as String"
                );
                Ok((PrimitiveName::parse(raw_type), DomainType::String, FieldAttributes::default()))
            }
            Err(e) => Err(e),
        }
    }
}

/// Strip one pair of matching surrounding quotes, collapsing doubled inner quotes.
pub fn unquote_default(literal: &str) -> String {
    let trimmed = literal.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            let inner = &trimmed[1..trimmed.len() - 1];
            let doubled = format!("{quote}{quote}");
            return inner.replace(&doubled, &quote.to_string());
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_manager::type_map::SQLITE_TYPE_MAP;

    fn column(name: &str, raw_type: &str) -> RawColumn {
        RawColumn {
            name: Some(name.to_string()),
            raw_type: Some(raw_type.to_string()),
            primary_key: Some(false),
            not_null: Some(false),
            default_literal: None,
        }
    }

    fn normalizer(options: NormalizerOptions) -> FieldNormalizer<'static> {
        FieldNormalizer::new(&SQLITE_TYPE_MAP, options)
    }

    #[test]
    fn test_primary_key_is_serial_and_never_nullable() {
        let mut raw = column("id", "INTEGER");
        raw.primary_key = Some(true);
        raw.not_null = Some(true);

        let field = normalizer(NormalizerOptions::default())
            .normalize(raw.clone())
            .unwrap();
        assert_eq!(field.domain_type, DomainType::Integer);
        assert_eq!(field.attributes.serial, Some(true));
        assert_eq!(field.attributes.key, Some(true));
        assert_eq!(field.attributes.nullable, None);

        let standard = NormalizerOptions {
            nullability: NullabilityMode::Standard,
            ..Default::default()
        };
        let field = normalizer(standard).normalize(raw).unwrap();
        assert_eq!(field.attributes.serial, Some(true));
        assert_eq!(field.attributes.nullable, Some(false));
    }

    #[test]
    fn test_nullability_modes() {
        let mut raw = column("user_id", "INTEGER");
        raw.not_null = Some(true);

        let compat = normalizer(NormalizerOptions::default())
            .normalize(raw.clone())
            .unwrap();
        assert_eq!(compat.attributes.nullable, Some(true));

        let standard = NormalizerOptions {
            nullability: NullabilityMode::Standard,
            ..Default::default()
        };
        let field = normalizer(standard).normalize(raw).unwrap();
        assert_eq!(field.attributes.nullable, Some(false));

        let field = normalizer(standard)
            .normalize(column("note", "TEXT"))
            .unwrap();
        assert_eq!(field.attributes.nullable, Some(true));

        let field = normalizer(NormalizerOptions::default())
            .normalize(column("note", "TEXT"))
            .unwrap();
        assert_eq!(field.attributes.nullable, None);
    }

    #[test]
    fn test_default_unquoting() {
        let mut raw = column("title", "VARCHAR(50)");
        raw.default_literal = Some("'default title'".to_string());
        let field = normalizer(NormalizerOptions::default())
            .normalize(raw)
            .unwrap();
        assert_eq!(field.attributes.default.as_deref(), Some("default title"));

        assert_eq!(unquote_default("'it''s'"), "it's");
        assert_eq!(unquote_default("\"x\""), "x");
        assert_eq!(unquote_default("0"), "0");
        assert_eq!(unquote_default("CURRENT_TIMESTAMP"), "CURRENT_TIMESTAMP");
        assert_eq!(unquote_default("''"), "");
        assert_eq!(unquote_default("'"), "'");
    }

    #[test]
    fn test_varchar_becomes_string_with_column_length() {
        let field = normalizer(NormalizerOptions::default())
            .normalize(column("login", "varchar(70)"))
            .unwrap();
        assert_eq!(field.domain_type, DomainType::String);
        assert_eq!(field.attributes.length, Some(70));

        let field = normalizer(NormalizerOptions::default())
            .normalize(column("login", "VARCHAR"))
            .unwrap();
        assert_eq!(field.attributes.length, Some(50));
    }

    #[test]
    fn test_text_gets_chain_length() {
        let field = normalizer(NormalizerOptions::default())
            .normalize(column("body", "TEXT"))
            .unwrap();
        assert_eq!(field.domain_type, DomainType::Text);
        assert_eq!(field.attributes.length, Some(65535));
    }

    #[test]
    fn test_unknown_type_lenient_and_strict() {
        let field = normalizer(NormalizerOptions::default())
            .normalize(column("payload", "JSONB"))
            .unwrap();
        assert_eq!(field.domain_type, DomainType::String);
        assert!(field.attributes.is_empty());

        let field = normalizer(NormalizerOptions::default())
            .normalize(column("anything", ""))
            .unwrap();
        assert_eq!(field.domain_type, DomainType::String);

        let strict = NormalizerOptions {
            strict_types: true,
            ..Default::default()
        };
        let err = normalizer(strict)
            .normalize(column("payload", "JSONB"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPrimitiveType(ref p) if p == "JSONB"));
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let n = normalizer(NormalizerOptions::default());

        let mut raw = column("x", "INTEGER");
        raw.name = None;
        assert!(matches!(n.normalize(raw), Err(Error::InvalidColumnMetadata(_))));

        let raw = column("", "INTEGER");
        assert!(matches!(n.normalize(raw), Err(Error::InvalidColumnMetadata(_))));

        let mut raw = column("x", "INTEGER");
        raw.raw_type = None;
        assert!(matches!(n.normalize(raw), Err(Error::InvalidColumnMetadata(_))));

        let mut raw = column("x", "INTEGER");
        raw.primary_key = None;
        assert!(matches!(n.normalize(raw), Err(Error::InvalidColumnMetadata(_))));
    }
}
