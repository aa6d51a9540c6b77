// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use schema_model::{schema::SchemaModel, types::Placement, validation::ValidationResult};

use super::Validator;

/// Attributes hold text: a scalar, an enum or a simple-content type
pub struct AttributeSimpleType;

impl Validator for AttributeSimpleType {
    fn rule(&self) -> &'static str {
        "attribute-simple-type"
    }

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
        for definition in model.type_definitions() {
            for accessor in definition.accessors() {
                if accessor.placement != Placement::Attribute {
                    continue;
                }

                let element = accessor.wire_type.element();
                let Some(name) = element.name() else {
                    continue;
                };

                let simple = if name == model.root_type {
                    false
                } else {
                    model
                        .get_type_definition(name)
                        .is_none_or(|typ| typ.is_simple_content())
                };

                if !simple {
                    result.add_error(
                        self.rule(),
                        format!(
                            "{}.{}: attribute type {element} is not a simple type",
                            accessor.owner, accessor.simple_name
                        ),
                        &[accessor.span],
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use declaration_graph::{
        metadata::{MetadataValue, keys},
        test_support::*,
        type_ref::TypeRef,
    };
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::validation::test_util::{build_model, render};

    #[multiplatform_test]
    fn attribute_types() {
        let attribute = |name: &str, typ: TypeRef| {
            field(name, typ).meta(keys::ATTRIBUTE, MetadataValue::Marker)
        };

        let graph = graph(
            vec![
                enumeration("a.Color").member(constant("RED")),
                class("a.Address").member(field("street", string())),
                class("a.Item")
                    .member(attribute("id", TypeRef::declared("long")))
                    .member(attribute("color", TypeRef::declared("a.Color")))
                    .member(attribute("address", TypeRef::declared("a.Address")))
                    .member(attribute("anything", object())),
            ],
            vec![],
        );
        let model = build_model(&graph);

        let mut result = ValidationResult::new();
        AttributeSimpleType.validate(&model, &mut result);

        insta::assert_debug_snapshot!(render(result), @r#"
        [
            "error [attribute-simple-type] a.Item.address: attribute type a.Address is not a simple type",
            "error [attribute-simple-type] a.Item.anything: attribute type java.lang.Object is not a simple type",
        ]
        "#);
    }
}
