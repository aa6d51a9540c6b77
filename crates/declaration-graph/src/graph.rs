// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    declaration::{HasMetadata, PackageDeclaration, TypeDeclaration},
    metadata::MetadataValue,
};

#[derive(Error, Debug)]
pub enum DeclarationGraphError {
    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("Package '{0}' is declared more than once")]
    DuplicatePackage(String),

    #[error("Could not read the declaration graph: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// The immutable universe of declarations handed over by a front end.
///
/// Declarations are keyed by qualified name, which is also their identity. Iteration is always in
/// name order, so anything computed by walking the graph is reproducible.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeclarationGraph {
    types: BTreeMap<String, TypeDeclaration>,
    packages: BTreeMap<String, PackageDeclaration>,
}

#[derive(Deserialize)]
struct DeclarationGraphSer {
    #[serde(default)]
    types: Vec<TypeDeclaration>,
    #[serde(default)]
    packages: Vec<PackageDeclaration>,
}

impl DeclarationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a graph serialized as `{"types": [...], "packages": [...]}`
    pub fn from_json(json: &str) -> Result<Self, DeclarationGraphError> {
        let ser: DeclarationGraphSer = serde_json::from_str(json)?;

        let mut graph = DeclarationGraph::new();
        for typ in ser.types {
            graph.add_type(typ)?;
        }
        for package in ser.packages {
            graph.add_package(package)?;
        }
        Ok(graph)
    }

    pub fn add_type(&mut self, declaration: TypeDeclaration) -> Result<(), DeclarationGraphError> {
        if self.types.contains_key(&declaration.qualified_name) {
            return Err(DeclarationGraphError::DuplicateType(
                declaration.qualified_name,
            ));
        }
        self.types
            .insert(declaration.qualified_name.clone(), declaration);
        Ok(())
    }

    pub fn add_package(
        &mut self,
        declaration: PackageDeclaration,
    ) -> Result<(), DeclarationGraphError> {
        if self.packages.contains_key(&declaration.name) {
            return Err(DeclarationGraphError::DuplicatePackage(declaration.name));
        }
        self.packages.insert(declaration.name.clone(), declaration);
        Ok(())
    }

    pub fn get_type(&self, qualified_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(qualified_name)
    }

    pub fn get_package(&self, name: &str) -> Option<&PackageDeclaration> {
        self.packages.get(name)
    }

    pub fn package_of(&self, declaration: &TypeDeclaration) -> Option<&PackageDeclaration> {
        self.get_package(&declaration.package)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values()
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageDeclaration> {
        self.packages.values()
    }

    pub fn get_metadata<'a>(
        &self,
        declaration: &'a dyn HasMetadata,
        key: &str,
    ) -> Option<&'a MetadataValue> {
        declaration.get_metadata(key)
    }
}
