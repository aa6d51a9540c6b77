// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{HashMap, HashSet};

use declaration_graph::{
    declaration::{HasMetadata, TypeDeclaration},
    graph::DeclarationGraph,
    metadata::{MetadataValue, keys},
    type_ref::TypeRef,
};
use schema_model::{types::Accessor, wire::AdapterType};

use crate::{config::BuilderConfig, type_context::TypeVariableContext};

/// State of one resolution pass over a declaration graph.
///
/// Adapters and accessor sets are memoized by declaration identity (qualified name) for the
/// lifetime of the context. A context must not outlive the graph it was created for; a new pass
/// needs a new context.
pub struct ResolutionContext<'g> {
    pub graph: &'g DeclarationGraph,
    pub config: &'g BuilderConfig,
    pub(crate) adapters: HashMap<String, AdapterType>,
    pub(crate) accessors: HashMap<String, Vec<Accessor>>,
}

impl<'g> ResolutionContext<'g> {
    pub fn new(graph: &'g DeclarationGraph, config: &'g BuilderConfig) -> Self {
        Self {
            graph,
            config,
            adapters: HashMap::new(),
            accessors: HashMap::new(),
        }
    }

    pub fn root_context(&self) -> TypeVariableContext {
        TypeVariableContext::new(&self.config.root_type)
    }

    pub fn root_type(&self) -> TypeRef {
        TypeRef::declared(self.config.root_type.clone())
    }

    pub fn is_root(&self, typ: &TypeRef) -> bool {
        typ.name() == Some(self.config.root_type.as_str())
    }

    pub fn get_declaration(&self, typ: &TypeRef) -> Option<&'g TypeDeclaration> {
        typ.name().and_then(|name| self.graph.get_type(name))
    }

    /// Finds `target` among the ancestors of `typ` (super types first, then interfaces) and
    /// returns it parameterized as seen from `typ`.
    pub fn find_supertype(&self, typ: &TypeRef, target: &str) -> Option<TypeRef> {
        self.find_supertype_in(typ, target, &self.root_context())
    }

    /// Same as [`find_supertype`](Self::find_supertype), with variables in `typ` bound by
    /// `context`
    pub fn find_supertype_in(
        &self,
        typ: &TypeRef,
        target: &str,
        context: &TypeVariableContext,
    ) -> Option<TypeRef> {
        let mut pending = vec![(typ.clone(), context.clone())];
        let mut visited = HashSet::new();

        while let Some((current, context)) = pending.pop() {
            let current = context.resolve(&current);
            let Some(name) = current.name() else {
                continue;
            };

            if name == target {
                return Some(current);
            }

            if !visited.insert(name.to_string()) {
                continue;
            }

            let Some(declaration) = self.graph.get_type(name) else {
                continue;
            };

            let context = context.push(&declaration.type_parameters, current.args());

            // Popped in reverse: the super type is explored before the interfaces
            for interface in declaration.interfaces.iter().rev() {
                pending.push((interface.clone(), context.clone()));
            }
            if let Some(super_type) = &declaration.super_type {
                pending.push((super_type.clone(), context));
            }
        }

        None
    }

    /// Whether a value of `typ` can be used where `target` (compared erased) is expected
    pub fn is_assignable(&self, typ: &TypeRef, target: &TypeRef) -> bool {
        if typ.erasure() == target.erasure() {
            return true;
        }

        match (typ, target.name()) {
            (TypeRef::Declared { .. }, Some(target_name)) => {
                target_name == self.config.root_type
                    || self.find_supertype(typ, target_name).is_some()
            }
            _ => false,
        }
    }

    /// Namespace of a type: its own metadata, then its package's, then the empty namespace
    pub fn type_namespace(&self, declaration: &TypeDeclaration) -> String {
        declaration
            .get_metadata(keys::NAMESPACE)
            .and_then(MetadataValue::as_str)
            .or_else(|| {
                self.graph
                    .package_of(declaration)
                    .and_then(|package| package.get_metadata(keys::NAMESPACE))
                    .and_then(MetadataValue::as_str)
            })
            .unwrap_or_default()
            .to_string()
    }

    /// The schema id of a namespace: the `schema-id` of a package in that namespace, or the
    /// namespace itself
    pub fn schema_id(&self, namespace: &str) -> String {
        self.graph
            .packages()
            .filter(|package| {
                package
                    .get_metadata(keys::NAMESPACE)
                    .and_then(MetadataValue::as_str)
                    .unwrap_or_default()
                    == namespace
            })
            .find_map(|package| {
                package
                    .get_metadata(keys::SCHEMA_ID)
                    .and_then(MetadataValue::as_str)
            })
            .unwrap_or(namespace)
            .to_string()
    }

    /// Whether the declaration implements one of the converter contracts
    pub fn is_converter(&self, declaration: &TypeDeclaration) -> bool {
        let typ = TypeRef::declared(declaration.qualified_name.clone());
        self.config
            .converters
            .iter()
            .any(|contract| self.find_supertype(&typ, &contract.interface).is_some())
    }
}
