// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Metadata attached to declarations.
//!
//! The engine never sees concrete annotation types. Each piece of metadata is a key (such as
//! `adapter` or `prop-order`) mapped to a value of one of a few shapes. The [`MetadataRegistry`]
//! records, once per process, which shape each well-known key must have and which declarations
//! may carry it.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::{Display, Formatter},
    sync::LazyLock,
};

use serde::{Deserialize, Serialize};

use crate::type_ref::TypeRef;

pub type Metadata = BTreeMap<String, MetadataValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "kebab-case")]
pub enum MetadataValue {
    Marker,
    Bool(bool),
    String(String),
    StringList(Vec<String>),
    TypeRef(TypeRef),
    AdapterPairs(Vec<AdapterPair>),
}

/// A package-level (adapter, target type) association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterPair {
    pub adapter: TypeRef,
    /// Qualified name of the adapted type
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataShape {
    Marker,
    Bool,
    String,
    StringList,
    TypeRef,
    AdapterPairs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataTarget {
    Package,
    Type,
    Field,
    Method,
    Parameter,
    EnumConstant,
}

impl MetadataValue {
    pub fn shape(&self) -> MetadataShape {
        match self {
            MetadataValue::Marker => MetadataShape::Marker,
            MetadataValue::Bool(_) => MetadataShape::Bool,
            MetadataValue::String(_) => MetadataShape::String,
            MetadataValue::StringList(_) => MetadataShape::StringList,
            MetadataValue::TypeRef(_) => MetadataShape::TypeRef,
            MetadataValue::AdapterPairs(_) => MetadataShape::AdapterPairs,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// A marker counts as `true`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Marker => Some(true),
            MetadataValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            MetadataValue::StringList(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_type_ref(&self) -> Option<&TypeRef> {
        match self {
            MetadataValue::TypeRef(typ) => Some(typ),
            _ => None,
        }
    }

    pub fn as_adapter_pairs(&self) -> Option<&[AdapterPair]> {
        match self {
            MetadataValue::AdapterPairs(pairs) => Some(pairs),
            _ => None,
        }
    }
}

impl Display for MetadataShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            MetadataShape::Marker => "a marker",
            MetadataShape::Bool => "a boolean",
            MetadataShape::String => "a string",
            MetadataShape::StringList => "a list of strings",
            MetadataShape::TypeRef => "a type reference",
            MetadataShape::AdapterPairs => "a list of (adapter, type) pairs",
        };
        write!(f, "{description}")
    }
}

impl Display for MetadataTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            MetadataTarget::Package => "package",
            MetadataTarget::Type => "type",
            MetadataTarget::Field => "field",
            MetadataTarget::Method => "method",
            MetadataTarget::Parameter => "parameter",
            MetadataTarget::EnumConstant => "enum constant",
        };
        write!(f, "{description}")
    }
}

/// Well-known metadata keys
pub mod keys {
    pub const ADAPTER: &str = "adapter";
    pub const PACKAGE_ADAPTERS: &str = "package-adapters";
    pub const NAME: &str = "name";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_ID: &str = "schema-id";
    pub const PROP_ORDER: &str = "prop-order";
    pub const ALPHABETICAL: &str = "alphabetical";
    pub const REQUIRED: &str = "required";
    pub const ATTRIBUTE: &str = "attribute";
    pub const VALUE: &str = "value";
    pub const TRANSIENT: &str = "transient";
    pub const ROOT_ELEMENT: &str = "root-element";
    pub const ENUM_VALUE: &str = "enum-value";
    pub const ENUM_DEFAULT: &str = "enum-default";
    pub const WEB_SERVICE: &str = "web-service";
    pub const OPERATION_NAME: &str = "operation-name";
    pub const PARAMETER_STYLE: &str = "parameter-style";
    pub const HEADER: &str = "header";
    pub const EXCLUDE: &str = "exclude";
    pub const REQUEST_WRAPPER: &str = "request-wrapper";
    pub const RESPONSE_WRAPPER: &str = "response-wrapper";
    pub const FAULT_BEAN: &str = "fault-bean";
}

#[derive(Debug, Clone)]
pub struct MetadataSpec {
    pub shape: MetadataShape,
    pub targets: Vec<MetadataTarget>,
}

/// Expected shape and permitted targets of each known metadata key. Keys not registered here are
/// opaque to the engine.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    specs: HashMap<&'static str, MetadataSpec>,
}

static STANDARD_REGISTRY: LazyLock<MetadataRegistry> = LazyLock::new(|| {
    use MetadataShape as S;
    use MetadataTarget::*;

    let mut registry = MetadataRegistry::default();

    registry.register(keys::ADAPTER, S::TypeRef, &[Type, Field, Method, Parameter]);
    registry.register(keys::PACKAGE_ADAPTERS, S::AdapterPairs, &[Package]);
    registry.register(keys::NAME, S::String, &[Type, Field, Method, Parameter]);
    registry.register(keys::NAMESPACE, S::String, &[Package, Type, Field, Method]);
    registry.register(keys::SCHEMA_ID, S::String, &[Package]);
    registry.register(keys::PROP_ORDER, S::StringList, &[Type]);
    registry.register(keys::ALPHABETICAL, S::Bool, &[Type]);
    registry.register(keys::REQUIRED, S::Bool, &[Field, Method, Parameter]);
    registry.register(keys::ATTRIBUTE, S::Marker, &[Field, Method]);
    registry.register(keys::VALUE, S::Marker, &[Field, Method]);
    registry.register(keys::TRANSIENT, S::Marker, &[Type, Field, Method]);
    registry.register(keys::ROOT_ELEMENT, S::Marker, &[Type]);
    registry.register(keys::ENUM_VALUE, S::String, &[EnumConstant]);
    registry.register(keys::ENUM_DEFAULT, S::Marker, &[EnumConstant]);
    registry.register(keys::WEB_SERVICE, S::Marker, &[Type]);
    registry.register(keys::OPERATION_NAME, S::String, &[Method]);
    registry.register(keys::PARAMETER_STYLE, S::String, &[Type, Method]);
    registry.register(keys::HEADER, S::Marker, &[Parameter, Method]);
    registry.register(keys::EXCLUDE, S::Marker, &[Method]);
    registry.register(keys::REQUEST_WRAPPER, S::String, &[Method]);
    registry.register(keys::RESPONSE_WRAPPER, S::String, &[Method]);
    registry.register(keys::FAULT_BEAN, S::String, &[Type]);

    registry
});

impl MetadataRegistry {
    /// The registry of all well-known keys
    pub fn standard() -> &'static MetadataRegistry {
        &STANDARD_REGISTRY
    }

    pub fn register(
        &mut self,
        key: &'static str,
        shape: MetadataShape,
        targets: &[MetadataTarget],
    ) {
        self.specs.insert(
            key,
            MetadataSpec {
                shape,
                targets: targets.to_vec(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&MetadataSpec> {
        self.specs.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn standard_registry_shapes() {
        let registry = MetadataRegistry::standard();

        let adapter = registry.get(keys::ADAPTER).unwrap();
        assert_eq!(adapter.shape, MetadataShape::TypeRef);
        assert!(!adapter.targets.contains(&MetadataTarget::Package));

        let package_adapters = registry.get(keys::PACKAGE_ADAPTERS).unwrap();
        assert_eq!(package_adapters.shape, MetadataShape::AdapterPairs);
        assert_eq!(package_adapters.targets, vec![MetadataTarget::Package]);

        assert!(registry.get("x-vendor-extension").is_none());
    }

    #[multiplatform_test]
    fn marker_is_true() {
        assert_eq!(MetadataValue::Marker.as_bool(), Some(true));
        assert_eq!(MetadataValue::Bool(false).as_bool(), Some(false));
        assert_eq!(MetadataValue::String("true".into()).as_bool(), None);
    }
}
