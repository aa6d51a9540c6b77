// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    endpoint::Endpoint, mapped_arena::MappedArena, prefixes::NamespacePrefixes,
    types::TypeDefinition,
};

/// The type definitions of one namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Schema id (the namespace unless overridden on the package)
    pub id: String,
    pub namespace: String,
    pub prefix: Option<String>,
    pub types: MappedArena<TypeDefinition>,
    /// Qualified names of the root types, sorted
    pub root_types: Vec<String>,
    /// Namespaces this schema refers to, other than its own and the XML schema namespace
    pub referenced_namespaces: BTreeSet<String>,
}

impl Schema {
    pub fn get_type(&self, qualified_name: &str) -> Option<&TypeDefinition> {
        self.types.get_by_key(qualified_name)
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn root_type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.root_types
            .iter()
            .filter_map(|name| self.types.get_by_key(name))
    }
}

/// Everything a generator gets to see
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Sorted by namespace
    pub schemas: Vec<Schema>,
    pub endpoints: Vec<Endpoint>,
    pub prefixes: NamespacePrefixes,
    /// Qualified name of the universal root type
    pub root_type: String,
    schema_index: HashMap<String, usize>,
}

impl SchemaModel {
    pub fn new(
        schemas: Vec<Schema>,
        endpoints: Vec<Endpoint>,
        prefixes: NamespacePrefixes,
        root_type: String,
    ) -> Self {
        let schema_index = schemas
            .iter()
            .enumerate()
            .flat_map(|(index, schema)| {
                schema
                    .type_definitions()
                    .map(move |typ| (typ.qualified_name.clone(), index))
            })
            .collect();

        Self {
            schemas,
            endpoints,
            prefixes,
            root_type,
            schema_index,
        }
    }

    pub fn schema(&self, namespace: &str) -> Option<&Schema> {
        self.schemas
            .iter()
            .find(|schema| schema.namespace == namespace)
    }

    pub fn get_type_definition(&self, qualified_name: &str) -> Option<&TypeDefinition> {
        self.schema_index
            .get(qualified_name)
            .and_then(|index| self.schemas[*index].get_type(qualified_name))
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.type_definitions())
    }
}
