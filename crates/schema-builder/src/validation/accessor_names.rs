// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use indexmap::IndexMap;
use schema_model::{
    schema::SchemaModel,
    types::{Accessor, BaseType, TypeDefinition},
    validation::ValidationResult,
};

use super::Validator;
use crate::util::join_words;

/// The accessors of a type, including inherited ones, map to distinct wire names
pub struct UniqueAccessorNames;

impl Validator for UniqueAccessorNames {
    fn rule(&self) -> &'static str {
        "unique-accessor-names"
    }

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
        for definition in model.type_definitions().filter(|typ| typ.is_object()) {
            // wire name -> (accessor, declared on this type)
            let mut by_wire_name: IndexMap<&str, Vec<(&Accessor, bool)>> = IndexMap::new();

            for accessor in definition.accessors() {
                by_wire_name
                    .entry(&accessor.wire_name)
                    .or_default()
                    .push((accessor, true));
            }
            for accessor in inherited_accessors(model, definition) {
                by_wire_name
                    .entry(&accessor.wire_name)
                    .or_default()
                    .push((accessor, false));
            }

            for (wire_name, accessors) in by_wire_name {
                // Collisions among inherited accessors are reported on the ancestor
                if accessors.len() < 2 || !accessors.iter().any(|(_, own)| *own) {
                    continue;
                }

                let names: Vec<_> = accessors
                    .iter()
                    .map(|(accessor, _)| format!("{}.{}", accessor.owner, accessor.simple_name))
                    .collect();
                let spans: Vec<_> = accessors.iter().map(|(accessor, _)| accessor.span).collect();

                result.add_error(
                    self.rule(),
                    format!(
                        "Accessors {} have the same wire name '{wire_name}'",
                        join_words(&names, "and")
                    ),
                    &spans,
                );
            }
        }
    }
}

/// Accessors of the base type definitions, nearest first
fn inherited_accessors<'m>(
    model: &'m SchemaModel,
    definition: &TypeDefinition,
) -> Vec<&'m Accessor> {
    let mut inherited = vec![];
    let mut visited = HashSet::from([definition.qualified_name.as_str()]);
    let mut base_type = &definition.base_type;

    while let BaseType::Definition(base) = base_type {
        if !visited.insert(base.as_str()) {
            break;
        }
        let Some(base) = model.get_type_definition(base) else {
            break;
        };

        inherited.extend(base.accessors());
        base_type = &base.base_type;
    }

    inherited
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

    fn validate(model: &SchemaModel) -> Vec<String> {
        let mut result = ValidationResult::new();
        UniqueAccessorNames.validate(model, &mut result);
        render(result)
    }

    #[multiplatform_test]
    fn names_are_case_sensitive() {
        let graph = graph(
            vec![
                class("a.Order")
                    .member(field("status", string()))
                    .member(
                        field("state", string())
                            .meta(keys::NAME, MetadataValue::String("Status".into())),
                    ),
            ],
            vec![],
        );

        assert!(validate(&build_model(&graph)).is_empty());
    }

    #[multiplatform_test]
    fn own_collision() {
        let graph = graph(
            vec![
                class("a.Order")
                    .member(field("status", string()))
                    .member(
                        field("state", string())
                            .meta(keys::NAME, MetadataValue::String("status".into())),
                    ),
            ],
            vec![],
        );

        insta::assert_debug_snapshot!(validate(&build_model(&graph)), @r#"
        [
            "error [unique-accessor-names] Accessors a.Order.status and a.Order.state have the same wire name 'status'",
        ]
        "#);
    }

    #[multiplatform_test]
    fn inherited_collision() {
        let graph = graph(
            vec![
                class("a.Base").member(field("id", string())),
                class("a.Middle")
                    .extends(TypeRef::declared("a.Base"))
                    .member(field("name", string())),
                class("a.Leaf")
                    .extends(TypeRef::declared("a.Middle"))
                    .member(field("id", TypeRef::declared("long"))),
            ],
            vec![],
        );

        insta::assert_debug_snapshot!(validate(&build_model(&graph)), @r#"
        [
            "error [unique-accessor-names] Accessors a.Leaf.id and a.Base.id have the same wire name 'id'",
        ]
        "#);
    }
}
