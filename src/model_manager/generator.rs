use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::{debug, info};

use crate::model_manager::{
    adapters::ReflectionAdapter,
    definitions::{DomainType, FieldDescriptor, GeneratedModelSpec},
    errors::invalid_selector,
    inflection::{DefaultInflector, Inflector},
    scope::DEFAULT_SCOPE,
    selector::{FieldSelector, StorageSelector},
    Result,
};

/// Options for [`ModelGenerator::auto_genclass`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenclassOptions {
    /// Target scope name; `Reflected` when unset
    #[serde(default)]
    pub scope: Option<String>,
    /// Storage selectors, evaluated in order; every storage when empty
    #[serde(default)]
    pub storages: Vec<StorageSelector>,
}

impl GenclassOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn storage(mut self, selector: StorageSelector) -> Self {
        self.storages.push(selector);
        self
    }

    /// Build options from loosely typed selector values, as read from a
    /// config file or another dynamic source. Any value that is not a
    /// selector string fails the whole call.
    pub fn from_values(scope: Option<String>, storages: &[serde_json::Value]) -> Result<Self> {
        let storages = storages
            .iter()
            .map(StorageSelector::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { scope, storages })
    }

    fn scope_name(&self) -> Result<&str> {
        match self.scope.as_deref() {
            None => Ok(DEFAULT_SCOPE),
            Some("") => Err(invalid_selector("empty scope name")),
            Some(scope) => Ok(scope),
        }
    }
}

/// Generates model specs from a reflected schema
pub struct ModelGenerator<'a> {
    adapter: &'a dyn ReflectionAdapter,
    inflector: Box<dyn Inflector>,
}

impl<'a> ModelGenerator<'a> {
    /// Create a new ModelGenerator over an adapter, using [`DefaultInflector`]
    pub fn new(adapter: &'a dyn ReflectionAdapter) -> Self {
        Self::with_inflector(adapter, Box::new(DefaultInflector))
    }

    pub fn with_inflector(adapter: &'a dyn ReflectionAdapter, inflector: Box<dyn Inflector>) -> Self {
        Self { adapter, inflector }
    }

    /// Get the reflection adapter used by this generator
    pub fn adapter(&self) -> &dyn ReflectionAdapter {
        self.adapter
    }

    /// One spec per storage matched by the options' selectors, carrying every
    /// field of that storage. Storages matching nothing are skipped.
    pub async fn auto_genclass(&self, options: &GenclassOptions) -> Result<Vec<GeneratedModelSpec>> {
        // validate before touching the catalog
        let scope = options.scope_name()?.to_string();
        let match_all = [StorageSelector::all()];
        let selectors: &[StorageSelector] = if options.storages.is_empty() {
            &match_all
        } else {
            &options.storages
        };

        let snapshot = self.adapter.storages_and_fields().await?;
        let mut specs = Vec::new();
        for (storage, fields) in snapshot {
            let Some(selector) = StorageSelector::first_match(selectors, &storage) else {
                debug!(storage = %storage, "no selector matched, skipping");
                continue;
            };
            let class_name = self.inflector.classify(&storage);
            info!(
                storage = %storage,
                class = %class_name,
                scope = %scope,
                selector = %selector,
                "generated model"
            );
            specs.push(GeneratedModelSpec {
                storage_name: storage,
                class_name,
                scope: scope.clone(),
                fields,
            });
        }
        Ok(specs)
    }

    /// Fields of `storage` matching any of `selectors`, in catalog order.
    /// An empty selector list selects every field.
    pub async fn reflect(
        &self,
        storage: &str,
        selectors: &[FieldSelector],
    ) -> Result<Vec<FieldDescriptor>> {
        let fields = self.adapter.fields(storage).await?;
        Ok(filter_fields(fields, selectors))
    }
}

/// Keep the fields matching any selector; all of them when `selectors` is empty.
pub fn filter_fields(fields: Vec<FieldDescriptor>, selectors: &[FieldSelector]) -> Vec<FieldDescriptor> {
    if selectors.is_empty() {
        return fields;
    }
    fields
        .into_iter()
        .filter(|field| selectors.iter().any(|s| s.matches(field)))
        .collect()
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

fn rust_type(domain_type: DomainType) -> &'static str {
    match domain_type {
        DomainType::Integer => "i64",
        DomainType::Boolean => "bool",
        DomainType::Float => "f64",
        DomainType::Blob => "Vec<u8>",
        DomainType::String
        | DomainType::Text
        | DomainType::Class
        | DomainType::Decimal
        | DomainType::DateTime
        | DomainType::Date
        | DomainType::Time => "String",
    }
}

fn rust_field_name(name: &str) -> String {
    let ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident == "_" {
        "field".to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", ident)
    } else if ["self", "super", "crate"].contains(&ident.as_str()) {
        // not usable as raw identifiers
        format!("{}_", ident)
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

fn rust_type_name(class_name: &str) -> String {
    let ident: String = class_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if ident.is_empty() || ident == "_" || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("T{}", ident)
    } else if ident == "Self" {
        "Self_".to_string()
    } else {
        ident
    }
}

/// Append `_2`, `_3`, ... until `ident` is unused, then claim it.
fn unique_ident(ident: String, used: &mut HashSet<String>) -> String {
    if used.insert(ident.clone()) {
        return ident;
    }
    let base = ident.trim_start_matches("r#").to_string();
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Render Rust struct definitions for generated specs.
///
/// Serial fields are plain values; every other field is an `Option`.
/// Names that are not valid identifiers are sanitized, clashes get a numeric
/// suffix, and the original name is kept in a `serde(rename)`.
pub fn render_rust(specs: &[GeneratedModelSpec]) -> String {
    let mut code = String::new();
    code.push_str("use serde::{Deserialize, Serialize};\n\n");
    let mut type_names = HashSet::new();
    for spec in specs {
        let type_name = unique_ident(rust_type_name(&spec.class_name), &mut type_names);
        let _ = writeln!(code, "/// Reflected from storage `{}`.", spec.storage_name.replace(['`', '\n', '\r'], "'"));
        code.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
        let _ = writeln!(code, "pub struct {} {{", type_name);
        let mut field_names = HashSet::new();
        for field in &spec.fields {
            let ty = rust_type(field.domain_type);
            let ty = if field.attributes.is_serial() {
                ty.to_string()
            } else {
                format!("Option<{}>", ty)
            };
            let ident = unique_ident(rust_field_name(&field.name), &mut field_names);
            if ident.trim_start_matches("r#") != field.name {
                let _ = writeln!(code, "    #[serde(rename = {:?})]", field.name);
            }
            let _ = writeln!(code, "    pub {}: {},", ident, ty);
        }
        code.push_str("}\n\n");
        let _ = writeln!(code, "impl {} {{", type_name);
        let _ = writeln!(
            code,
            "    pub const STORAGE_NAME: &'static str = {:?};",
            spec.storage_name
        );
        code.push_str("}\n\n");
    }
    code
}
