// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Classification of declarations into type definitions and their assembly into schemas.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use declaration_graph::{
    declaration::{HasMetadata, MemberKind, TypeDeclaration},
    metadata::{MetadataValue, keys},
    type_ref::TypeRef,
};
use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use schema_model::{
    endpoint::Endpoint,
    mapped_arena::MappedArena,
    prefixes::{NamespacePrefixes, WELL_KNOWN_NAMESPACES, XML_SCHEMA_NAMESPACE},
    schema::{Schema, SchemaModel},
    types::{BaseType, EnumValue, Placement, TypeDefinition, TypeDefinitionKind},
};
use tracing::{debug, instrument, warn};

use crate::{context::ResolutionContext, error::ModelBuildingError};

impl<'g> ResolutionContext<'g> {
    /// Whether a declaration can become a type definition of its own
    pub fn is_registrable(&self, declaration: &TypeDeclaration) -> bool {
        let name = declaration.qualified_name.as_str();

        !(self.config.known_type(name).is_some()
            || name == self.config.root_type
            || self.config.is_container(name)
            || self.container_element(&declaration.as_type_ref()).is_some()
            || declaration.is_interface()
            || declaration.has_marker(keys::TRANSIENT)
            || declaration.has_marker(keys::WEB_SERVICE)
            || declaration.get_metadata(keys::ADAPTER).is_some()
            || self.is_converter(declaration))
    }

    pub fn classify(
        &mut self,
        declaration: &'g TypeDeclaration,
    ) -> Result<TypeDefinition, ModelBuildingError> {
        let name = declaration.qualified_name.as_str();

        let (kind, base_type) = if declaration.is_enum() {
            (
                TypeDefinitionKind::Enum {
                    values: enum_values(declaration),
                },
                BaseType::Scalar("string".to_string()),
            )
        } else if let Some(scalar) = self.config.known_type(name) {
            (TypeDefinitionKind::Simple, BaseType::Scalar(scalar.to_string()))
        } else {
            let accessors = self.resolve_accessors(name)?;

            let simple_content = match accessors.as_slice() {
                // A collection of values is not simple content
                [only] if only.placement == Placement::Value && !only.is_collection() => {
                    Some(self.element_base_type(only.wire_type.element()))
                }
                _ => None,
            };

            match simple_content {
                Some(base_type) => (TypeDefinitionKind::Simple, base_type),
                None => {
                    let base_type = self.base_type(declaration);
                    if accessors.is_empty() && base_type == BaseType::Any {
                        (TypeDefinitionKind::Any, BaseType::Any)
                    } else {
                        (TypeDefinitionKind::Object { accessors }, base_type)
                    }
                }
            }
        };

        let wire_name = declaration
            .get_metadata(keys::NAME)
            .and_then(MetadataValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| declaration.simple_name().to_lower_camel_case());

        Ok(TypeDefinition {
            qualified_name: name.to_string(),
            wire_name,
            namespace: self.type_namespace(declaration),
            kind,
            base_type,
            root_element: declaration.has_marker(keys::ROOT_ELEMENT),
            span: declaration.span,
        })
    }

    /// The nearest registrable ancestor, skipping transient ones. `Any` if the chain reaches the
    /// root (or leaves the graph) first.
    fn base_type(&self, declaration: &TypeDeclaration) -> BaseType {
        let graph = self.graph;
        let mut visited = HashSet::new();
        let mut current = declaration;

        while let Some(super_type) = &current.super_type {
            let Some(ancestor) = super_type.name().and_then(|name| graph.get_type(name)) else {
                break;
            };
            if !visited.insert(&ancestor.qualified_name) || self.is_root(super_type) {
                break;
            }

            if self.is_registrable(ancestor) && !self.config.is_excluded(&ancestor.qualified_name)
            {
                return BaseType::Definition(ancestor.qualified_name.clone());
            }
            current = ancestor;
        }

        BaseType::Any
    }

    fn element_base_type(&self, element: &TypeRef) -> BaseType {
        let Some(name) = element.name() else {
            return match self.config.known_type(&element.to_string()) {
                Some(scalar) => BaseType::Scalar(scalar.to_string()),
                None => BaseType::Any,
            };
        };

        if let Some(scalar) = self.config.known_type(name) {
            BaseType::Scalar(scalar.to_string())
        } else if self.is_root(element) || self.graph.get_type(name).is_none() {
            BaseType::Any
        } else {
            BaseType::Definition(name.to_string())
        }
    }

    /// Builds the schema model: every registrable declaration plus everything reachable from
    /// them and from the endpoints, grouped by namespace.
    #[instrument(skip_all)]
    pub fn assemble(
        &mut self,
        endpoints: Vec<Endpoint>,
    ) -> Result<SchemaModel, ModelBuildingError> {
        let graph = self.graph;

        // (qualified name, site referring to it)
        let mut pending: VecDeque<(String, String)> = graph
            .types()
            .filter(|declaration| {
                self.is_registrable(declaration)
                    && !self.config.is_excluded(&declaration.qualified_name)
            })
            .map(|declaration| {
                (
                    declaration.qualified_name.clone(),
                    declaration.qualified_name.clone(),
                )
            })
            .collect();

        for endpoint in &endpoints {
            for operation in &endpoint.operations {
                let site = format!("{}.{}", endpoint.qualified_name, operation.method_name);
                for part in operation.parameters.iter().chain(&operation.result) {
                    if let Some(name) = part.wire_type.element().name() {
                        pending.push_back((name.to_string(), site.clone()));
                    }
                }
            }
        }

        let mut definitions: IndexMap<String, TypeDefinition> = IndexMap::new();

        while let Some((name, site)) = pending.pop_front() {
            if definitions.contains_key(&name)
                || self.config.known_type(&name).is_some()
                || self.config.is_container(&name)
                || name == self.config.root_type
            {
                continue;
            }

            let declaration =
                graph
                    .get_type(&name)
                    .ok_or_else(|| ModelBuildingError::TypeNotFound {
                        site: site.clone(),
                        typ: name.clone(),
                    })?;

            if !self.is_registrable(declaration) {
                debug!("{site}: {name} does not become a type definition");
                continue;
            }

            if site != name && self.config.is_excluded(&name) {
                warn!("{site} refers to excluded type {name}, which is added to the model anyway");
            }

            let definition = self.classify(declaration)?;

            for accessor in definition.accessors() {
                if let Some(element) = accessor.wire_type.element().name() {
                    pending.push_back((
                        element.to_string(),
                        format!("{}.{}", accessor.declared_in, accessor.member_name),
                    ));
                }
            }
            if let BaseType::Definition(base) = &definition.base_type {
                pending.push_back((base.clone(), name.clone()));
            }

            debug!("Added type definition {name} ({})", definition.wire_name);
            definitions.insert(name, definition);
        }

        let mut by_namespace: BTreeMap<String, Vec<TypeDefinition>> = BTreeMap::new();
        for definition in definitions.values() {
            by_namespace
                .entry(definition.namespace.clone())
                .or_default()
                .push(definition.clone());
        }

        let referenced: BTreeMap<String, BTreeSet<String>> = by_namespace
            .iter()
            .map(|(namespace, types)| {
                (
                    namespace.clone(),
                    referenced_namespaces(namespace, types, &definitions),
                )
            })
            .collect();

        let mut prefixes = NamespacePrefixes::new(
            WELL_KNOWN_NAMESPACES.iter().copied().chain(
                self.config
                    .namespaces
                    .iter()
                    .map(|(namespace, prefix)| (namespace.as_str(), prefix.as_str())),
            ),
        );
        let all_namespaces: BTreeSet<&str> = by_namespace
            .keys()
            .map(String::as_str)
            .chain(referenced.values().flatten().map(String::as_str))
            .chain(endpoints.iter().map(|endpoint| endpoint.namespace.as_str()))
            .collect();
        for namespace in all_namespaces {
            prefixes.assign(namespace);
        }

        let mut schemas = vec![];
        for (namespace, mut types) in by_namespace {
            types.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

            let root_types = types
                .iter()
                .filter(|typ| typ.root_element)
                .map(|typ| typ.qualified_name.clone())
                .collect();

            let mut arena = MappedArena::default();
            for typ in types {
                let key = typ.qualified_name.clone();
                arena.add(&key, typ);
            }

            schemas.push(Schema {
                id: self.schema_id(&namespace),
                prefix: prefixes.get(&namespace).map(str::to_string),
                referenced_namespaces: referenced.get(&namespace).cloned().unwrap_or_default(),
                namespace,
                types: arena,
                root_types,
            });
        }

        debug!(
            "Assembled {} schema(s) with {} type definition(s)",
            schemas.len(),
            definitions.len()
        );

        Ok(SchemaModel::new(
            schemas,
            endpoints,
            prefixes,
            self.config.root_type.clone(),
        ))
    }
}

fn enum_values(declaration: &TypeDeclaration) -> Vec<EnumValue> {
    declaration
        .members
        .iter()
        .filter(|member| matches!(member.kind, MemberKind::EnumConstant))
        .map(|constant| EnumValue {
            name: constant.name.clone(),
            wire_label: constant
                .get_metadata(keys::ENUM_VALUE)
                .and_then(MetadataValue::as_str)
                .unwrap_or(&constant.name)
                .to_string(),
            is_default: constant.has_marker(keys::ENUM_DEFAULT),
            span: constant.span,
        })
        .collect()
}

/// Namespaces one level away from the types of a schema: their base types, the types of their
/// accessors, and accessors qualified with another namespace
fn referenced_namespaces(
    namespace: &str,
    types: &[TypeDefinition],
    definitions: &IndexMap<String, TypeDefinition>,
) -> BTreeSet<String> {
    let namespace_of = |name: &str| {
        definitions
            .get(name)
            .map(|definition| definition.namespace.clone())
    };

    let mut referenced = BTreeSet::new();

    for typ in types {
        if let BaseType::Definition(base) = &typ.base_type {
            referenced.extend(namespace_of(base));
        }

        for accessor in typ.accessors() {
            if let Some(element) = accessor.wire_type.element().name() {
                referenced.extend(namespace_of(element));
            }
            if accessor.namespace != typ.namespace {
                referenced.insert(accessor.namespace.clone());
            }
        }
    }

    referenced.remove(namespace);
    referenced.remove(XML_SCHEMA_NAMESPACE);
    referenced
}
