// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use codemap::Span;
use serde::{Deserialize, Serialize};

use crate::{
    metadata::{Metadata, MetadataTarget, MetadataValue},
    type_ref::{TypeRef, simple_name},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub qualified_name: String,
    pub package: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub super_type: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MemberKind {
    Field {
        typ: TypeRef,
    },
    Method {
        return_type: TypeRef,
        #[serde(default)]
        parameters: Vec<ParameterDeclaration>,
        #[serde(default)]
        throws: Vec<TypeRef>,
    },
    EnumConstant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    pub typ: TypeRef,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDeclaration {
    pub name: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(skip)]
    pub span: Option<Span>,
}

/// Anything metadata can be attached to
pub trait HasMetadata {
    fn metadata(&self) -> &Metadata;
    fn metadata_target(&self) -> MetadataTarget;
    fn span(&self) -> Option<Span>;
    /// Name used in diagnostics
    fn display_name(&self) -> &str;

    fn get_metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata().get(key)
    }

    fn has_marker(&self, key: &str) -> bool {
        self.get_metadata(key)
            .and_then(MetadataValue::as_bool)
            .unwrap_or(false)
    }
}

impl TypeDeclaration {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// A reference to this declaration parameterized by its own type parameters
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.qualified_name.clone(),
            self.type_parameters
                .iter()
                .map(|param| TypeRef::variable(param.clone()))
                .collect(),
        )
    }

    pub fn get_member(&self, name: &str) -> Option<&MemberDeclaration> {
        self.members.iter().find(|member| member.name == name)
    }
}

impl MemberDeclaration {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field { .. })
    }

    /// The field type or the method return type
    pub fn value_type(&self) -> Option<&TypeRef> {
        match &self.kind {
            MemberKind::Field { typ } => Some(typ),
            MemberKind::Method { return_type, .. } => Some(return_type),
            MemberKind::EnumConstant => None,
        }
    }

    pub fn parameters(&self) -> &[ParameterDeclaration] {
        match &self.kind {
            MemberKind::Method { parameters, .. } => parameters,
            _ => &[],
        }
    }

    pub fn throws(&self) -> &[TypeRef] {
        match &self.kind {
            MemberKind::Method { throws, .. } => throws,
            _ => &[],
        }
    }
}

impl HasMetadata for TypeDeclaration {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_target(&self) -> MetadataTarget {
        MetadataTarget::Type
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn display_name(&self) -> &str {
        &self.qualified_name
    }
}

impl HasMetadata for MemberDeclaration {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_target(&self) -> MetadataTarget {
        match self.kind {
            MemberKind::Field { .. } => MetadataTarget::Field,
            MemberKind::Method { .. } => MetadataTarget::Method,
            MemberKind::EnumConstant => MetadataTarget::EnumConstant,
        }
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl HasMetadata for ParameterDeclaration {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_target(&self) -> MetadataTarget {
        MetadataTarget::Parameter
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl HasMetadata for PackageDeclaration {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_target(&self) -> MetadataTarget {
        MetadataTarget::Package
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
