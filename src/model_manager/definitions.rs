use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized, adapter-independent type of a reflected field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DomainType {
    /// Whole numbers of any width
    Integer,
    /// Bounded character data
    String,
    /// Unbounded character data
    Text,
    /// True/false
    Boolean,
    /// Binary floating point
    Float,
    /// Fixed-point decimal
    Decimal,
    /// Date and time
    DateTime,
    /// Date (without time)
    Date,
    /// Time of day
    Time,
    /// Binary large object
    Blob,
    /// Type-name placeholder; shares its primitive with `String` in some dialects
    Class,
}

impl DomainType {
    /// Parse a domain type name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "integer" => DomainType::Integer,
            "string" => DomainType::String,
            "text" => DomainType::Text,
            "boolean" => DomainType::Boolean,
            "float" => DomainType::Float,
            "decimal" => DomainType::Decimal,
            "datetime" => DomainType::DateTime,
            "date" => DomainType::Date,
            "time" => DomainType::Time,
            "blob" => DomainType::Blob,
            "class" => DomainType::Class,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Constraint attributes attached to a field.
///
/// Unset keys are `None`; a type map's attribute chain only fills keys the
/// column itself left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAttributes {
    /// Auto-incrementing primary key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<bool>,
    /// Part of the primary key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,
    /// Nullability flag, see [`NullabilityMode`](crate::model_manager::NullabilityMode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Default value with any surrounding quotes removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Maximum length for bounded types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl FieldAttributes {
    /// Fill every unset key from `chain`, keeping values already present.
    pub fn merge_chain(mut self, chain: &FieldAttributes) -> Self {
        self.serial = self.serial.or(chain.serial);
        self.key = self.key.or(chain.key);
        self.nullable = self.nullable.or(chain.nullable);
        if self.default.is_none() {
            self.default = chain.default.clone();
        }
        self.length = self.length.or(chain.length);
        self.precision = self.precision.or(chain.precision);
        self.scale = self.scale.or(chain.scale);
        self
    }

    pub fn is_serial(&self) -> bool {
        self.serial == Some(true)
    }

    pub fn is_empty(&self) -> bool {
        *self == FieldAttributes::default()
    }
}

/// One normalized column of a storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub domain_type: DomainType,
    #[serde(default)]
    pub attributes: FieldAttributes,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, domain_type: DomainType, attributes: FieldAttributes) -> Self {
        Self {
            name: name.into(),
            domain_type,
            attributes,
        }
    }
}

/// Storage name to fields, as observed by one reflection call
pub type SchemaSnapshot = BTreeMap<String, Vec<FieldDescriptor>>;

/// A model definition produced by `auto_genclass`, ready to be registered
/// into a [`ModelScope`](crate::model_manager::ModelScope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedModelSpec {
    /// Storage the model is bound to
    pub storage_name: String,
    /// Inflected class name, e.g. `AbstractUser` for `abstract_users`
    pub class_name: String,
    /// Namespace the model belongs to
    pub scope: String,
    /// Every field discovered for the storage
    pub fields: Vec<FieldDescriptor>,
}

impl GeneratedModelSpec {
    /// `Scope::ClassName`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.scope, self.class_name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Sort fields by name so reflection results can be compared.
pub fn sort_fields(mut fields: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    fields.sort_by(|a, b| a.name.cmp(&b.name));
    fields
}
