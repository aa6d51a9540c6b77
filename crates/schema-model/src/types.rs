// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use codemap::Span;
use declaration_graph::type_ref::TypeRef;
use serde::{Deserialize, Serialize};

use crate::wire::{AdapterType, WireType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Element,
    Attribute,
    /// The simple content of the owning type
    Value,
}

/// A wire-relevant property of a type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accessor {
    /// Qualified name of the owning type definition
    pub owner: String,
    /// Qualified name of the type that declares the member. Differs from `owner` for accessors
    /// inlined from transient ancestors.
    pub declared_in: String,
    /// Property name (field name, or the property name derived from a getter/setter pair)
    pub simple_name: String,
    /// Name of the member that carries the property (the field or the getter)
    pub member_name: String,
    pub wire_name: String,
    pub namespace: String,
    pub declared_type: TypeRef,
    pub wire_type: WireType,
    pub adapter: Option<AdapterType>,
    pub placement: Placement,
    pub required: bool,
    pub read_only: bool,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl Accessor {
    pub fn is_collection(&self) -> bool {
        self.wire_type.is_collection()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub wire_label: String,
    /// The value used for unrecognized wire labels
    pub is_default: bool,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseType {
    /// The universal "any" type
    Any,
    /// A built-in scalar, by wire name
    Scalar(String),
    /// Another type definition, by qualified name
    Definition(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeDefinitionKind {
    Object { accessors: Vec<Accessor> },
    Enum { values: Vec<EnumValue> },
    Simple,
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub qualified_name: String,
    pub wire_name: String,
    pub namespace: String,
    pub kind: TypeDefinitionKind,
    pub base_type: BaseType,
    /// Can be the outermost object of a payload
    pub root_element: bool,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl TypeDefinition {
    pub fn accessors(&self) -> &[Accessor] {
        match &self.kind {
            TypeDefinitionKind::Object { accessors } => accessors,
            _ => &[],
        }
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        match &self.kind {
            TypeDefinitionKind::Enum { values } => values,
            _ => &[],
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeDefinitionKind::Object { .. })
    }

    /// Enum and simple types can be written as text
    pub fn is_simple_content(&self) -> bool {
        matches!(
            self.kind,
            TypeDefinitionKind::Enum { .. } | TypeDefinitionKind::Simple
        )
    }
}
