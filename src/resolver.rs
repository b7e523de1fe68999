use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::parser::OperationItems;

/// Scalar type names that never name a model.
const BASIC_TYPES: &[&str] = &[
    "bool",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "float32",
    "float64",
    "string",
    "complex64",
    "complex128",
    "byte",
    "rune",
    "uintptr",
    "time.Time",
];

/// Check whether a type name is a scalar rather than a model reference
pub fn is_basic_type(type_name: &str) -> bool {
    BASIC_TYPES.contains(&type_name)
}

/// The package a comment block was found in.
///
/// Unqualified type references in response annotations resolve relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageContext {
    name: String,
}

impl PackageContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unknown type '{type_ref}' in package '{package}'")]
    UnknownType { type_ref: String, package: String },

    /// Failure reported by a host-provided resolver, passed through verbatim.
    #[error("{0}")]
    Other(String),
}

/// A field of a model definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProperty {
    pub name: String,
    pub type_name: String,
    pub is_array: bool,
    pub required: bool,
    pub description: Option<String>,
}

impl ModelProperty {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_array: false,
            required: false,
            description: None,
        }
    }

    /// Mark the property as a list of `type_name`
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Serialize for ModelProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if self.is_array {
            map.serialize_entry("type", "array")?;
            map.serialize_entry("items", &OperationItems::for_type(&self.type_name))?;
        } else if is_basic_type(&self.type_name) {
            map.serialize_entry("type", &self.type_name)?;
        } else {
            map.serialize_entry("$ref", &self.type_name)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        map.end()
    }
}

/// A resolved structural type, identified by its canonical id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Model {
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(serialize_with = "serialize_properties")]
    pub properties: Vec<ModelProperty>,
}

fn serialize_properties<S: Serializer>(
    properties: &[ModelProperty],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for property in properties {
        map.serialize_entry(&property.name, property)?;
    }
    map.end()
}

/// Outcome of resolving one type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub model: Model,
    /// Models reachable from `model`, excluding `model` itself, each listed once.
    pub nested: Vec<Model>,
}

/// Turns a type reference written in an annotation into a model definition.
///
/// Implementations are shared between operations compiled in parallel and must
/// resolve the same reference to the same canonical id every time.
pub trait ModelResolver: Send + Sync {
    fn resolve(&self, type_ref: &str, package: &PackageContext)
        -> Result<Resolution, ResolveError>;
}

/// Compute the canonical id for a type reference.
///
/// `model.OrderRow` and `github.com/acme/model.OrderRow` both become
/// `model.OrderRow`; an unqualified `Wishlist` becomes `<package>.Wishlist`.
pub fn canonical_id(type_ref: &str, package: &str) -> String {
    match type_ref.rsplit_once('.') {
        Some((qualifier, name)) => {
            let qualifier = qualifier.rsplit('/').next().unwrap_or(qualifier);
            format!("{qualifier}.{name}")
        }
        None => format!("{package}.{type_ref}"),
    }
}

#[derive(Debug, Clone)]
struct Definition {
    package: String,
    properties: Vec<ModelProperty>,
}

/// In-memory model definitions keyed by canonical id.
///
/// Reads take a shared lock, so any number of operations may resolve at once.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    definitions: RwLock<HashMap<String, Definition>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a type and return its canonical id
    pub fn define(&self, package: &str, name: &str, properties: Vec<ModelProperty>) -> String {
        let id = canonical_id(name, package);
        self.definitions.write().insert(
            id.clone(),
            Definition {
                package: package.to_string(),
                properties,
            },
        );
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }
}

impl ModelResolver for ModelRegistry {
    fn resolve(
        &self,
        type_ref: &str,
        package: &PackageContext,
    ) -> Result<Resolution, ResolveError> {
        let definitions = self.definitions.read();
        let id = canonical_id(type_ref, package.name());
        let definition = definitions
            .get(&id)
            .ok_or_else(|| ResolveError::UnknownType {
                type_ref: type_ref.to_string(),
                package: package.name().to_string(),
            })?;

        let model = materialize(&id, definition);
        let mut seen = HashSet::from([id]);
        let mut nested = Vec::new();
        collect_nested(&definitions, &model, &definition.package, &mut seen, &mut nested)?;

        debug!(model = %model.id, nested = nested.len(), "resolved model");
        Ok(Resolution { model, nested })
    }
}

/// Build a model whose property types point at canonical ids
fn materialize(id: &str, definition: &Definition) -> Model {
    let properties: Vec<ModelProperty> = definition
        .properties
        .iter()
        .map(|property| {
            let mut property = property.clone();
            if !is_basic_type(&property.type_name) {
                property.type_name = canonical_id(&property.type_name, &definition.package);
            }
            property
        })
        .collect();

    Model {
        id: id.to_string(),
        required: properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.clone())
            .collect(),
        properties,
    }
}

fn collect_nested(
    definitions: &HashMap<String, Definition>,
    model: &Model,
    package: &str,
    seen: &mut HashSet<String>,
    nested: &mut Vec<Model>,
) -> Result<(), ResolveError> {
    for property in &model.properties {
        if is_basic_type(&property.type_name) || !seen.insert(property.type_name.clone()) {
            continue;
        }

        let definition =
            definitions
                .get(&property.type_name)
                .ok_or_else(|| ResolveError::UnknownType {
                    type_ref: property.type_name.clone(),
                    package: package.to_string(),
                })?;
        let child = materialize(&property.type_name, definition);
        nested.push(child.clone());
        collect_nested(definitions, &child, &definition.package, seen, nested)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_registry() -> ModelRegistry {
        let registry = ModelRegistry::new();
        registry.define(
            "shop",
            "Wishlist",
            vec![
                ModelProperty::new("id", "int64").required(),
                ModelProperty::new("owner", "Customer"),
                ModelProperty::new("items", "catalog.Product").array(),
            ],
        );
        registry.define("shop", "Customer", vec![ModelProperty::new("name", "string")]);
        registry.define(
            "catalog",
            "Product",
            vec![
                ModelProperty::new("sku", "string"),
                ModelProperty::new("related", "Product").array(),
            ],
        );
        registry
    }

    #[test]
    fn recognizes_basic_types() {
        assert!(is_basic_type("string"));
        assert!(is_basic_type("time.Time"));
        assert!(!is_basic_type("Wishlist"));
        assert!(!is_basic_type("model.OrderRow"));
    }

    #[test]
    fn canonical_id_uses_package_for_unqualified_names() {
        assert_eq!(canonical_id("Wishlist", "shop"), "shop.Wishlist");
        assert_eq!(canonical_id("model.OrderRow", "shop"), "model.OrderRow");
        assert_eq!(
            canonical_id("github.com/acme/model.OrderRow", "shop"),
            "model.OrderRow"
        );
    }

    #[test]
    fn resolves_model_with_nested_dependencies() {
        let registry = shop_registry();
        let resolution = registry
            .resolve("Wishlist", &PackageContext::new("shop"))
            .unwrap();

        assert_eq!(resolution.model.id, "shop.Wishlist");
        assert_eq!(resolution.model.required, vec!["id"]);
        assert_eq!(resolution.model.properties[1].type_name, "shop.Customer");

        let nested: Vec<&str> = resolution.nested.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(nested, vec!["shop.Customer", "catalog.Product"]);
    }

    #[test]
    fn self_references_are_reported_once() {
        let registry = shop_registry();
        let resolution = registry
            .resolve("catalog.Product", &PackageContext::new("shop"))
            .unwrap();
        assert_eq!(resolution.model.id, "catalog.Product");
        assert!(resolution.nested.is_empty());
    }

    #[test]
    fn unknown_type_fails() {
        let registry = shop_registry();
        let error = registry
            .resolve("Basket", &PackageContext::new("shop"))
            .unwrap_err();
        assert_eq!(
            error,
            ResolveError::UnknownType {
                type_ref: "Basket".to_string(),
                package: "shop".to_string(),
            }
        );
    }

    #[test]
    fn unknown_nested_type_fails() {
        let registry = ModelRegistry::new();
        registry.define("shop", "Order", vec![ModelProperty::new("row", "Row")]);
        let error = registry
            .resolve("Order", &PackageContext::new("shop"))
            .unwrap_err();
        assert!(error.to_string().contains("shop.Row"));
    }

    #[test]
    fn define_replaces_existing_definition() {
        let registry = ModelRegistry::new();
        registry.define("shop", "Tag", vec![]);
        registry.define("shop", "Tag", vec![ModelProperty::new("label", "string")]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("shop.Tag"));
        let resolution = registry
            .resolve("Tag", &PackageContext::new("shop"))
            .unwrap();
        assert_eq!(resolution.model.properties.len(), 1);
    }

    #[test]
    fn model_serializes_properties_as_map() {
        let registry = shop_registry();
        let resolution = registry
            .resolve("Wishlist", &PackageContext::new("shop"))
            .unwrap();
        let value = serde_json::to_value(&resolution.model).unwrap();

        assert_eq!(value["id"], "shop.Wishlist");
        assert_eq!(value["required"], serde_json::json!(["id"]));
        assert_eq!(value["properties"]["id"]["type"], "int64");
        assert_eq!(value["properties"]["owner"]["$ref"], "shop.Customer");
        assert_eq!(value["properties"]["items"]["type"], "array");
        assert_eq!(
            value["properties"]["items"]["items"]["$ref"],
            "catalog.Product"
        );
    }
}
