// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Compact builders for declaration graphs used in tests.

use codemap::Span;

use crate::{
    declaration::{
        MemberDeclaration, MemberKind, PackageDeclaration, ParameterDeclaration, TypeDeclaration,
        TypeKind, Visibility,
    },
    graph::DeclarationGraph,
    metadata::{Metadata, MetadataValue},
    type_ref::{TypeRef, package_name},
};

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";

pub fn object() -> TypeRef {
    TypeRef::declared(OBJECT)
}

pub fn string() -> TypeRef {
    TypeRef::declared(STRING)
}

pub struct TypeBuilder {
    declaration: TypeDeclaration,
}

pub fn class(qualified_name: &str) -> TypeBuilder {
    TypeBuilder::new(qualified_name, TypeKind::Class, Some(object()))
}

pub fn interface(qualified_name: &str) -> TypeBuilder {
    TypeBuilder::new(qualified_name, TypeKind::Interface, None)
}

pub fn enumeration(qualified_name: &str) -> TypeBuilder {
    TypeBuilder::new(
        qualified_name,
        TypeKind::Enum,
        Some(TypeRef::generic(
            "java.lang.Enum",
            vec![TypeRef::declared(qualified_name)],
        )),
    )
}

impl TypeBuilder {
    fn new(qualified_name: &str, kind: TypeKind, super_type: Option<TypeRef>) -> Self {
        Self {
            declaration: TypeDeclaration {
                qualified_name: qualified_name.to_string(),
                package: package_name(qualified_name).to_string(),
                kind,
                type_parameters: vec![],
                super_type,
                interfaces: vec![],
                members: vec![],
                metadata: Metadata::new(),
                span: None,
            },
        }
    }

    pub fn type_params(mut self, params: &[&str]) -> Self {
        self.declaration.type_parameters = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn extends(mut self, super_type: TypeRef) -> Self {
        self.declaration.super_type = Some(super_type);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.declaration.interfaces.push(interface);
        self
    }

    pub fn meta(mut self, key: &str, value: MetadataValue) -> Self {
        self.declaration.metadata.insert(key.to_string(), value);
        self
    }

    pub fn member(mut self, member: MemberBuilder) -> Self {
        self.declaration.members.push(member.build());
        self
    }

    /// A getter/setter pair for a bean property
    pub fn property(self, name: &str, typ: TypeRef) -> Self {
        self.member(getter(name, typ.clone())).member(setter(name, typ))
    }

    pub fn build(self) -> TypeDeclaration {
        self.declaration
    }
}

pub struct MemberBuilder {
    member: MemberDeclaration,
}

fn member(name: &str, kind: MemberKind) -> MemberBuilder {
    MemberBuilder {
        member: MemberDeclaration {
            name: name.to_string(),
            kind,
            visibility: Visibility::Public,
            is_static: false,
            metadata: Metadata::new(),
            span: None,
        },
    }
}

pub fn field(name: &str, typ: TypeRef) -> MemberBuilder {
    member(name, MemberKind::Field { typ })
}

pub fn method(
    name: &str,
    return_type: TypeRef,
    parameters: Vec<ParameterDeclaration>,
) -> MemberBuilder {
    member(
        name,
        MemberKind::Method {
            return_type,
            parameters,
            throws: vec![],
        },
    )
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn getter(property: &str, typ: TypeRef) -> MemberBuilder {
    method(&format!("get{}", capitalized(property)), typ, vec![])
}

pub fn setter(property: &str, typ: TypeRef) -> MemberBuilder {
    method(
        &format!("set{}", capitalized(property)),
        TypeRef::Void,
        vec![param("value", typ)],
    )
}

pub fn constant(name: &str) -> MemberBuilder {
    member(name, MemberKind::EnumConstant)
}

pub fn param(name: &str, typ: TypeRef) -> ParameterDeclaration {
    ParameterDeclaration {
        name: name.to_string(),
        typ,
        metadata: Metadata::new(),
        span: None,
    }
}

pub fn param_with(
    name: &str,
    typ: TypeRef,
    metadata: &[(&str, MetadataValue)],
) -> ParameterDeclaration {
    ParameterDeclaration {
        metadata: metadata
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect(),
        ..param(name, typ)
    }
}

impl MemberBuilder {
    pub fn meta(mut self, key: &str, value: MetadataValue) -> Self {
        self.member.metadata.insert(key.to_string(), value);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.member.visibility = visibility;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.member.span = Some(span);
        self
    }

    pub fn static_member(mut self) -> Self {
        self.member.is_static = true;
        self
    }

    pub fn throws(mut self, exception: TypeRef) -> Self {
        if let MemberKind::Method { throws, .. } = &mut self.member.kind {
            throws.push(exception);
        }
        self
    }

    pub fn build(self) -> MemberDeclaration {
        self.member
    }
}

pub struct PackageBuilder {
    package: PackageDeclaration,
}

pub fn package(name: &str) -> PackageBuilder {
    PackageBuilder {
        package: PackageDeclaration {
            name: name.to_string(),
            metadata: Metadata::new(),
            span: None,
        },
    }
}

impl PackageBuilder {
    pub fn meta(mut self, key: &str, value: MetadataValue) -> Self {
        self.package.metadata.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> PackageDeclaration {
        self.package
    }
}

/// Builds a graph out of the given declarations, panicking on duplicates
pub fn graph(types: Vec<TypeBuilder>, packages: Vec<PackageBuilder>) -> DeclarationGraph {
    let mut graph = DeclarationGraph::new();
    for typ in types {
        graph.add_type(typ.build()).unwrap();
    }
    for package in packages {
        graph.add_package(package.build()).unwrap();
    }
    graph
}
