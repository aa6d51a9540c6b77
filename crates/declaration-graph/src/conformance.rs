// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Checks that every well-known metadata key has the registered shape and is attached to a
//! declaration that may carry it.

use codemap_diagnostic::{Diagnostic, Level, SpanLabel, SpanStyle};
use tracing::debug;

use crate::{declaration::HasMetadata, graph::DeclarationGraph, metadata::MetadataRegistry};

/// Collects all metadata violations in the graph. An empty list means the graph conforms.
pub fn check_metadata(graph: &DeclarationGraph, registry: &MetadataRegistry) -> Vec<Diagnostic> {
    let mut errors = vec![];

    for package in graph.packages() {
        check_declaration(package, registry, &mut errors);
    }

    for typ in graph.types() {
        check_declaration(typ, registry, &mut errors);

        for member in typ.members.iter() {
            check_declaration(member, registry, &mut errors);

            for parameter in member.parameters() {
                check_declaration(parameter, registry, &mut errors);
            }
        }
    }

    debug!("Metadata check found {} problem(s)", errors.len());

    errors
}

fn check_declaration(
    declaration: &dyn HasMetadata,
    registry: &MetadataRegistry,
    errors: &mut Vec<Diagnostic>,
) {
    let target = declaration.metadata_target();

    for (key, value) in declaration.metadata().iter() {
        let Some(spec) = registry.get(key) else {
            continue;
        };

        if !spec.targets.contains(&target) {
            errors.push(diagnostic(
                declaration,
                "M001",
                format!(
                    "Metadata '{key}' is not applicable to {target} {}",
                    declaration.display_name()
                ),
            ));
        } else if value.shape() != spec.shape {
            errors.push(diagnostic(
                declaration,
                "M000",
                format!(
                    "Metadata '{key}' on {target} {} must be {}, found {}",
                    declaration.display_name(),
                    spec.shape,
                    value.shape()
                ),
            ));
        }
    }
}

fn diagnostic(declaration: &dyn HasMetadata, code: &str, message: String) -> Diagnostic {
    Diagnostic {
        level: Level::Error,
        message,
        code: Some(code.to_string()),
        spans: declaration
            .span()
            .map(|span| SpanLabel {
                span,
                style: SpanStyle::Primary,
                label: None,
            })
            .into_iter()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{MetadataValue, keys},
        test_support::{class, field, package},
        type_ref::TypeRef,
    };
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn conforming_graph() {
        let mut graph = DeclarationGraph::new();
        graph
            .add_type(
                class("com.example.Thing")
                    .meta(keys::ROOT_ELEMENT, MetadataValue::Marker)
                    .member(field("label", TypeRef::declared("java.lang.String")).meta(
                        keys::NAME,
                        MetadataValue::String("title".into()),
                    ))
                    .build(),
            )
            .unwrap();
        graph
            .add_package(
                package("com.example")
                    .meta(keys::NAMESPACE, MetadataValue::String("urn:a".into()))
                    .build(),
            )
            .unwrap();

        assert!(check_metadata(&graph, MetadataRegistry::standard()).is_empty());
    }

    #[multiplatform_test]
    fn reports_every_violation() {
        let mut graph = DeclarationGraph::new();
        graph
            .add_type(
                class("com.example.Thing")
                    // wrong shape
                    .meta(keys::PROP_ORDER, MetadataValue::String("a".into()))
                    // wrong target
                    .meta(keys::SCHEMA_ID, MetadataValue::String("a".into()))
                    // unknown keys are ignored
                    .meta("x-extension", MetadataValue::Bool(true))
                    .member(
                        field("label", TypeRef::declared("java.lang.String"))
                            .meta(keys::ENUM_DEFAULT, MetadataValue::Marker),
                    )
                    .build(),
            )
            .unwrap();

        let errors = check_metadata(&graph, MetadataRegistry::standard());

        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Metadata 'prop-order' on type com.example.Thing must be a list of strings, found a string",
                "Metadata 'schema-id' is not applicable to type com.example.Thing",
                "Metadata 'enum-default' is not applicable to field label",
            ]
        );
    }
}
