// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolution of the wire-relevant properties of a type.

use std::collections::HashSet;

use declaration_graph::{
    declaration::{HasMetadata, MemberDeclaration, MemberKind, TypeDeclaration},
    metadata::{Metadata, MetadataValue, keys},
    type_ref::TypeRef,
};
use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use schema_model::types::{Accessor, Placement};
use tracing::debug;

use crate::{
    context::ResolutionContext, error::ModelBuildingError, type_context::TypeVariableContext,
};

/// Metadata that turns a non-public field into an accessor
const ACCESSOR_KEYS: &[&str] = &[
    keys::NAME,
    keys::NAMESPACE,
    keys::ATTRIBUTE,
    keys::VALUE,
    keys::ADAPTER,
    keys::REQUIRED,
];

struct Candidate<'g> {
    property: String,
    /// The field, or the getter of a property
    member: &'g MemberDeclaration,
    typ: &'g TypeRef,
    metadata: Metadata,
    read_only: bool,
}

#[derive(Default)]
struct PropertyHalves<'g> {
    first_index: usize,
    getter: Option<&'g MemberDeclaration>,
    setter: Option<&'g MemberDeclaration>,
    transient: bool,
}

impl<'g> ResolutionContext<'g> {
    /// The ordered accessors of a type, including those inherited from transient ancestors
    pub fn resolve_accessors(&mut self, owner: &str) -> Result<Vec<Accessor>, ModelBuildingError> {
        if let Some(accessors) = self.accessors.get(owner) {
            return Ok(accessors.clone());
        }

        let graph = self.graph;
        let declaration = graph
            .get_type(owner)
            .ok_or_else(|| ModelBuildingError::TypeNotFound {
                site: owner.to_string(),
                typ: owner.to_string(),
            })?;
        let namespace = self.type_namespace(declaration);

        let mut accessors = vec![];

        for (ancestor, context) in self.transient_ancestors(declaration).into_iter().rev() {
            self.collect_accessors(owner, &namespace, ancestor, &context, &mut accessors)?;
        }

        let context = self.root_context();
        self.collect_accessors(owner, &namespace, declaration, &context, &mut accessors)?;

        self.order_accessors(declaration, &mut accessors)?;

        debug!("Resolved {} accessor(s) of {owner}", accessors.len());

        self.accessors.insert(owner.to_string(), accessors.clone());
        Ok(accessors)
    }

    /// Consecutive transient ancestors of a declaration, nearest first, each with the context
    /// binding its type parameters
    pub(crate) fn transient_ancestors(
        &self,
        declaration: &'g TypeDeclaration,
    ) -> Vec<(&'g TypeDeclaration, TypeVariableContext)> {
        let graph = self.graph;
        let mut ancestors = vec![];
        let mut visited = HashSet::new();
        let mut context = self.root_context();
        let mut current = declaration;

        while let Some(super_type) = &current.super_type {
            let super_type = context.resolve(super_type);
            let Some(ancestor) = super_type.name().and_then(|name| graph.get_type(name)) else {
                break;
            };
            if !ancestor.has_marker(keys::TRANSIENT) || !visited.insert(&ancestor.qualified_name) {
                break;
            }

            context = context.push(&ancestor.type_parameters, super_type.args());
            ancestors.push((ancestor, context.clone()));
            current = ancestor;
        }

        ancestors
    }

    fn collect_accessors(
        &mut self,
        owner: &str,
        namespace: &str,
        declaring: &'g TypeDeclaration,
        context: &TypeVariableContext,
        accessors: &mut Vec<Accessor>,
    ) -> Result<(), ModelBuildingError> {
        let mut candidates = vec![];
        let mut properties: IndexMap<String, PropertyHalves<'g>> = IndexMap::new();

        for (index, member) in declaring.members.iter().enumerate() {
            if member.is_static {
                continue;
            }
            let transient = member.has_marker(keys::TRANSIENT);

            match &member.kind {
                MemberKind::Field { typ } if !transient => {
                    let annotated = ACCESSOR_KEYS
                        .iter()
                        .any(|key| member.get_metadata(key).is_some());
                    if member.is_public() || annotated {
                        candidates.push((
                            index,
                            Candidate {
                                property: member.name.clone(),
                                member,
                                typ,
                                metadata: member.metadata.clone(),
                                read_only: false,
                            },
                        ));
                    }
                }
                MemberKind::Method {
                    return_type,
                    parameters,
                    ..
                } if member.is_public() => {
                    if let Some(property) =
                        getter_property(&member.name, return_type, parameters.len())
                    {
                        let halves = properties.entry(property).or_insert(PropertyHalves {
                            first_index: index,
                            ..Default::default()
                        });
                        halves.getter = Some(member);
                        halves.transient |= transient;
                    } else if let Some(property) =
                        setter_property(&member.name, return_type, parameters.len())
                    {
                        let halves = properties.entry(property).or_insert(PropertyHalves {
                            first_index: index,
                            ..Default::default()
                        });
                        halves.setter = Some(member);
                        halves.transient |= transient;
                    }
                }
                _ => {}
            }
        }

        for (property, halves) in properties {
            if halves.transient {
                continue;
            }
            let Some(getter) = halves.getter else {
                debug!(
                    "{}.{property}: ignoring property without a getter",
                    declaring.qualified_name
                );
                continue;
            };
            let Some(typ) = getter.value_type() else {
                continue;
            };

            let metadata = merge_metadata(declaring, &property, getter, halves.setter)?;

            let read_only = halves.setter.is_none();
            if read_only && self.container_element(&context.resolve(typ)).is_none() {
                return Err(ModelBuildingError::MissingSetter {
                    owner: declaring.qualified_name.clone(),
                    property,
                });
            }

            candidates.push((
                halves.first_index,
                Candidate {
                    property,
                    member: getter,
                    typ,
                    metadata,
                    read_only,
                },
            ));
        }

        candidates.sort_by_key(|(index, _)| *index);

        for (_, candidate) in candidates {
            let accessor = self.build_accessor(owner, namespace, declaring, context, candidate)?;
            accessors.push(accessor);
        }

        Ok(())
    }

    fn build_accessor(
        &mut self,
        owner: &str,
        namespace: &str,
        declaring: &'g TypeDeclaration,
        context: &TypeVariableContext,
        candidate: Candidate<'g>,
    ) -> Result<Accessor, ModelBuildingError> {
        let Candidate {
            property,
            member,
            typ,
            metadata,
            read_only,
        } = candidate;

        let declared_type = context.resolve(typ);
        let site = format!("{}.{}", declaring.qualified_name, member.name);
        let (wire_type, adapter) = self.wire_type(
            &declared_type,
            Some(&metadata),
            Some(declaring.package.as_str()),
            &site,
        )?;

        let metadata_str = |key: &str| metadata.get(key).and_then(MetadataValue::as_str);
        let has_marker = |key: &str| {
            metadata
                .get(key)
                .and_then(MetadataValue::as_bool)
                .unwrap_or(false)
        };

        let placement = if has_marker(keys::ATTRIBUTE) {
            Placement::Attribute
        } else if has_marker(keys::VALUE) {
            Placement::Value
        } else {
            Placement::Element
        };

        Ok(Accessor {
            owner: owner.to_string(),
            declared_in: declaring.qualified_name.clone(),
            wire_name: metadata_str(keys::NAME).unwrap_or(&property).to_string(),
            namespace: metadata_str(keys::NAMESPACE).unwrap_or(namespace).to_string(),
            simple_name: property,
            member_name: member.name.clone(),
            declared_type,
            wire_type,
            adapter,
            placement,
            required: has_marker(keys::REQUIRED),
            read_only,
            span: member.span,
        })
    }

    /// Orders by the explicit property order if there is one, else alphabetically by wire name if
    /// requested. Otherwise the declaration order stays.
    fn order_accessors(
        &self,
        declaration: &TypeDeclaration,
        accessors: &mut Vec<Accessor>,
    ) -> Result<(), ModelBuildingError> {
        let explicit_order = declaration
            .get_metadata(keys::PROP_ORDER)
            .and_then(MetadataValue::as_string_list)
            .filter(|order| !order.is_empty());

        if let Some(order) = explicit_order {
            let mut positioned = accessors
                .drain(..)
                .map(|accessor| {
                    match order.iter().position(|name| *name == accessor.wire_name) {
                        Some(position) => Ok((position, accessor)),
                        None => Err(ModelBuildingError::PropertyOrder {
                            owner: declaration.qualified_name.clone(),
                            wire_name: accessor.wire_name,
                        }),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            positioned.sort_by_key(|(position, _)| *position);
            accessors.extend(positioned.into_iter().map(|(_, accessor)| accessor));
        } else {
            let alphabetical = declaration
                .get_metadata(keys::ALPHABETICAL)
                .and_then(MetadataValue::as_bool)
                .unwrap_or(self.config.alphabetical);

            if alphabetical {
                accessors.sort_by(|a, b| a.wire_name.cmp(&b.wire_name));
            }
        }

        Ok(())
    }
}

fn getter_property(name: &str, return_type: &TypeRef, parameter_count: usize) -> Option<String> {
    if parameter_count != 0 || return_type.is_void() {
        return None;
    }

    let is_boolean = matches!(return_type.name(), Some("boolean" | "java.lang.Boolean"));

    let rest = name
        .strip_prefix("get")
        .or_else(|| name.strip_prefix("is").filter(|_| is_boolean))?;

    property_name(rest)
}

fn setter_property(name: &str, return_type: &TypeRef, parameter_count: usize) -> Option<String> {
    if parameter_count != 1 || !return_type.is_void() {
        return None;
    }

    property_name(name.strip_prefix("set")?)
}

fn property_name(rest: &str) -> Option<String> {
    rest.starts_with(|c: char| c.is_uppercase())
        .then(|| rest.to_lower_camel_case())
}

/// Metadata of a getter/setter pair. The same key on both halves must have the same value.
fn merge_metadata(
    declaring: &TypeDeclaration,
    property: &str,
    getter: &MemberDeclaration,
    setter: Option<&MemberDeclaration>,
) -> Result<Metadata, ModelBuildingError> {
    let mut merged = getter.metadata.clone();

    let Some(setter) = setter else {
        return Ok(merged);
    };

    for (key, value) in setter.metadata.iter() {
        match merged.get(key) {
            Some(existing) if existing != value => {
                return Err(ModelBuildingError::ConflictingMetadata {
                    owner: declaring.qualified_name.clone(),
                    property: property.to_string(),
                    key: key.clone(),
                    first: getter.name.clone(),
                    second: setter.name.clone(),
                    first_span: getter.span,
                    second_span: setter.span,
                });
            }
            Some(_) => {}
            None => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(merged)
}
